//! # Storage Traits
//!
//! This module defines the storage abstraction traits that allow different
//! storage backends to be used interchangeably in the domain layer.

use anyhow::Result;
use shared::{MonthKey, MonthRegister};

use crate::domain::models::LedgerConfig;

/// Trait defining the interface for month register storage operations
///
/// One stored value per month: the computed day rows plus the month's
/// opening balance. Corrupt stored values are discarded by the implementation
/// and reported as absent, so callers only ever see a valid register or `None`.
pub trait RegisterStorage {
    /// Load a month's register. Absent and corrupt are both `Ok(None)`.
    fn load_register(&self, key: MonthKey) -> Result<Option<MonthRegister>>;

    /// Store a month's register, replacing any previous value
    fn save_register(&self, key: MonthKey, register: &MonthRegister) -> Result<()>;

    /// Delete a month's register
    /// Returns true if something was stored for that month
    fn delete_register(&self, key: MonthKey) -> Result<bool>;

    /// Months of a year that have a stored register, in calendar order
    fn list_registers(&self, year: i32) -> Result<Vec<MonthKey>>;
}

/// Trait defining the interface for ledger configuration storage
pub trait LedgerConfigStorage {
    /// Get the ledger configuration, creating the default if none is stored
    fn get_ledger_config(&self) -> Result<LedgerConfig>;

    /// Replace the stored ledger configuration
    fn update_ledger_config(&self, config: &LedgerConfig) -> Result<()>;
}

/// Trait defining the interface for storage connections
///
/// Provides factory methods for creating repositories so the domain layer can
/// work with any storage backend without knowing the implementation details.
pub trait Connection: Clone {
    /// The type of RegisterStorage this connection creates
    type RegisterRepository: RegisterStorage;

    /// The type of LedgerConfigStorage this connection creates
    type LedgerConfigRepository: LedgerConfigStorage;

    /// Create a new register repository for this connection
    fn create_register_repository(&self) -> Self::RegisterRepository;

    /// Create a new ledger config repository for this connection
    fn create_ledger_config_repository(&self) -> Self::LedgerConfigRepository;
}
