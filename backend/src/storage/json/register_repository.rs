//! # JSON Register Repository
//!
//! Stores each month of the register as a single JSON document holding the
//! computed day rows and the month's opening balance.
//!
//! ## File Structure
//!
//! ```text
//! data/
//! ├── ledger_config.yaml
//! └── registers/
//!     ├── stock-register-2025-06.json    ← This module manages these files
//!     └── stock-register-2025-07.json
//! ```
//!
//! A file that fails to parse, or whose rows belong to another month, is
//! treated as corrupt: it is deleted and the month is reported as absent.

use anyhow::Result;
use log::{debug, error, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

use shared::{MonthKey, MonthRegister};

use super::connection::JsonConnection;
use crate::storage::traits::RegisterStorage;

#[derive(Clone)]
pub struct RegisterRepository {
    connection: JsonConnection,
}

impl RegisterRepository {
    pub fn new(connection: JsonConnection) -> Self {
        Self { connection }
    }

    fn register_path(&self, key: MonthKey) -> PathBuf {
        self.connection
            .registers_directory()
            .join(format!("{}.json", key.storage_key()))
    }

    fn parse_register(key: MonthKey, content: &[u8]) -> Result<MonthRegister> {
        let register: MonthRegister = serde_json::from_slice(content)?;

        if let Some(stray) = register.day_records.iter().find(|r| !key.contains(r.date)) {
            return Err(anyhow::anyhow!(
                "Register for {} contains a row dated {}",
                key,
                stray.date
            ));
        }

        Ok(register)
    }

    fn discard_corrupt_file(&self, path: &Path) {
        match fs::remove_file(path) {
            Ok(()) => info!("Removed corrupt register file {:?}", path),
            Err(e) => warn!("Failed to remove corrupt register file {:?}: {}", path, e),
        }
    }
}

impl RegisterStorage for RegisterRepository {
    fn load_register(&self, key: MonthKey) -> Result<Option<MonthRegister>> {
        let path = self.register_path(key);

        if !path.exists() {
            debug!("No stored register for {}", key);
            return Ok(None);
        }

        let content = fs::read(&path)?;
        match Self::parse_register(key, &content) {
            Ok(register) => {
                debug!("Loaded register for {} ({} rows)", key, register.day_records.len());
                Ok(Some(register))
            }
            Err(e) => {
                error!("Failed to load register for {}: {}. Discarding stored data.", key, e);
                self.discard_corrupt_file(&path);
                Ok(None)
            }
        }
    }

    fn save_register(&self, key: MonthKey, register: &MonthRegister) -> Result<()> {
        self.connection.ensure_registers_directory()?;

        let path = self.register_path(key);
        let content = serde_json::to_string_pretty(register)?;

        // Atomic write: temp file, then rename over the target
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, content)?;
        fs::rename(&temp_path, &path)?;

        debug!("Saved register for {} to {:?}", key, path);
        Ok(())
    }

    fn delete_register(&self, key: MonthKey) -> Result<bool> {
        let path = self.register_path(key);

        if !path.exists() {
            return Ok(false);
        }

        fs::remove_file(&path)?;
        info!("Deleted register for {}", key);
        Ok(true)
    }

    fn list_registers(&self, year: i32) -> Result<Vec<MonthKey>> {
        let dir = self.connection.registers_directory();
        let mut keys = Vec::new();

        if !dir.exists() {
            return Ok(keys);
        }

        for entry in fs::read_dir(dir)? {
            let path = entry?.path();

            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }

            let key = match path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(MonthKey::from_storage_key)
            {
                Some(key) => key,
                None => continue,
            };

            if key.year == year {
                keys.push(key);
            }
        }

        keys.sort();
        Ok(keys)
    }
}
