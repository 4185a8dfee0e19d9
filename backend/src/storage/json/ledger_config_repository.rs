//! # Ledger Config Repository
//!
//! File-based ledger configuration stored as a single YAML file
//! `ledger_config.yaml` at the root of the data directory.
//!
//! ## YAML Format
//!
//! ```yaml
//! non_serving_weekday: 0
//! ration_scale:
//!   primary:
//!     rice: 0.1
//!     dhal: 0.015
//!     oil: 0.003
//!     salt: 0.002
//!     gram: 0.02
//!     chickpea: 0.02
//!     egg: 1.0
//!   upper_primary:
//!     rice: 0.15
//!     ...
//! ```
//!
//! Missing file: the default configuration is written and returned.

use anyhow::Result;
use log::{debug, info};
use std::fs;
use std::path::PathBuf;

use super::connection::JsonConnection;
use crate::domain::models::LedgerConfig;
use crate::storage::traits::LedgerConfigStorage;

#[derive(Clone)]
pub struct LedgerConfigRepository {
    connection: JsonConnection,
}

impl LedgerConfigRepository {
    pub fn new(connection: JsonConnection) -> Self {
        Self { connection }
    }

    fn config_path(&self) -> PathBuf {
        self.connection.base_directory().join("ledger_config.yaml")
    }

    fn save_config(&self, config: &LedgerConfig) -> Result<()> {
        let config_path = self.config_path();
        let yaml_content = serde_yaml::to_string(config)?;

        let temp_path = config_path.with_extension("tmp");
        fs::write(&temp_path, yaml_content)?;
        fs::rename(&temp_path, &config_path)?;

        debug!("Saved ledger config to {:?}", config_path);
        Ok(())
    }
}

impl LedgerConfigStorage for LedgerConfigRepository {
    fn get_ledger_config(&self) -> Result<LedgerConfig> {
        let config_path = self.config_path();

        if !config_path.exists() {
            let config = LedgerConfig::default();
            self.save_config(&config)?;
            info!("Created default ledger config at {:?}", config_path);
            return Ok(config);
        }

        let yaml_content = fs::read_to_string(&config_path)?;
        let config: LedgerConfig = serde_yaml::from_str(&yaml_content)?;
        config.validate()?;

        debug!("Loaded ledger config from {:?}", config_path);
        Ok(config)
    }

    fn update_ledger_config(&self, config: &LedgerConfig) -> Result<()> {
        config.validate()?;
        self.save_config(config)?;
        info!("Updated ledger config (non-serving weekday {})", config.non_serving_weekday);
        Ok(())
    }
}
