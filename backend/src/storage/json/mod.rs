//! # JSON Storage Module
//!
//! File-based storage for the stock register. Each month is one JSON document;
//! the ledger configuration is one YAML document at the data root.

pub mod connection;
pub mod ledger_config_repository;
pub mod register_repository;

#[cfg(test)]
pub mod test_utils;

pub use connection::JsonConnection;
pub use ledger_config_repository::LedgerConfigRepository;
pub use register_repository::RegisterRepository;
