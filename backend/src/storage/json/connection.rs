use anyhow::Result;
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};

use super::ledger_config_repository::LedgerConfigRepository;
use super::register_repository::RegisterRepository;
use crate::storage::traits::Connection;

/// JsonConnection manages the data directory the register files live in
#[derive(Clone, Debug)]
pub struct JsonConnection {
    base_directory: PathBuf,
}

impl JsonConnection {
    /// Create a new connection rooted at `base_directory`, creating it if needed
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path)?;
            info!("Created data directory: {}", base_path.display());
        }

        Ok(Self {
            base_directory: base_path,
        })
    }

    /// Create a connection in the default data directory
    /// This uses ~/Documents/Stock Register, or the current directory if no
    /// documents directory can be determined
    pub fn new_default() -> Result<Self> {
        let data_dir = match dirs::document_dir() {
            Some(documents_dir) => documents_dir.join("Stock Register"),
            None => {
                warn!("Could not determine documents directory, using current directory");
                std::env::current_dir()?.join("stock_register_data")
            }
        };

        info!("Using data directory: {}", data_dir.display());
        Self::new(data_dir)
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    /// Directory holding one JSON file per stored month
    pub fn registers_directory(&self) -> PathBuf {
        self.base_directory.join("registers")
    }

    /// Ensure the registers directory exists
    pub fn ensure_registers_directory(&self) -> Result<PathBuf> {
        let dir = self.registers_directory();
        if !dir.exists() {
            fs::create_dir_all(&dir)?;
        }
        Ok(dir)
    }
}

impl Connection for JsonConnection {
    type RegisterRepository = RegisterRepository;
    type LedgerConfigRepository = LedgerConfigRepository;

    fn create_register_repository(&self) -> Self::RegisterRepository {
        RegisterRepository::new(self.clone())
    }

    fn create_ledger_config_repository(&self) -> Self::LedgerConfigRepository {
        LedgerConfigRepository::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_new_creates_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("a").join("b");

        let connection = JsonConnection::new(&nested).unwrap();
        assert!(nested.exists());
        assert_eq!(connection.base_directory(), nested.as_path());
        assert_eq!(connection.registers_directory(), nested.join("registers"));
        assert!(!connection.registers_directory().exists());

        connection.ensure_registers_directory().unwrap();
        assert!(connection.registers_directory().exists());
    }
}
