pub mod ledger_config;

pub use ledger_config::{LedgerConfig, LedgerConfigError, RationScale};
