//! # Domain Module
//!
//! Contains all business logic for the stock register.
//!
//! ## Module Organization
//!
//! - **ledger_service**: The recalculation engine that rebuilds a month of rows
//! - **calendar**: Day counts, weekdays and display names
//! - **register_service**: The month session a presentation layer drives
//! - **summary_service**: Monthly and yearly totals
//! - **export_service**: CSV output of the register and its summary
//! - **models**: Ledger configuration (ration scale, non-serving weekday)
//!
//! ## Business Rules
//!
//! - Every month has exactly one row per calendar day, in date order
//! - Each day opens on the previous day's closing balance
//! - Nothing is consumed on the non-serving weekday or when no students attend
//! - Egg, dhal, chickpea and gram are consumed only on days they are issued
//! - Balances may go negative; over-consumption is not rejected

pub mod calendar;
pub mod export_service;
pub mod ledger_service;
pub mod models;
pub mod register_service;
pub mod summary_service;

pub use calendar::*;
pub use export_service::*;
pub use ledger_service::*;
pub use register_service::*;
pub use summary_service::*;
