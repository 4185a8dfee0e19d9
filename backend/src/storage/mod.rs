//! # Storage Module
//!
//! Handles all data persistence for the stock register.
//!
//! The domain layer only sees the traits in [`traits`]; the JSON-file
//! implementation in [`json`] is the one shipped. Persistence failures never
//! block the user: corrupt months are discarded on load and failed saves are
//! logged by the services that call into this layer.

pub mod json;
pub mod traits;

pub use json::JsonConnection;
pub use traits::{Connection, LedgerConfigStorage, RegisterStorage};
