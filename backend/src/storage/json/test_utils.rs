//! Test utilities module for automatic cleanup and consistent test infrastructure
//!
//! This module provides RAII-based cleanup that guarantees test data is removed
//! even if tests panic or fail.

use anyhow::Result;
use std::path::PathBuf;
use tempfile::{Builder, TempDir};

use super::connection::JsonConnection;

/// RAII Test Environment that automatically cleans up on drop
pub struct TestEnvironment {
    /// Kept alive so the directory survives until the environment is dropped
    _temp_dir: TempDir,
    pub connection: JsonConnection,
    pub base_path: PathBuf,
}

impl TestEnvironment {
    pub fn new() -> Result<Self> {
        init_test_logging();

        let temp_dir = Builder::new().prefix("stock_register_test_").tempdir()?;
        let base_path = temp_dir.path().to_path_buf();
        let connection = JsonConnection::new(&base_path)?;

        Ok(TestEnvironment {
            _temp_dir: temp_dir,
            connection,
            base_path,
        })
    }
}

/// Route `log` output through the test harness. Safe to call repeatedly.
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_cleanup() -> Result<()> {
        let base_path;

        {
            let env = TestEnvironment::new()?;
            base_path = env.base_path.clone();
            assert!(base_path.exists());

            std::fs::write(base_path.join("test_file.txt"), "test data")?;
            assert!(base_path.join("test_file.txt").exists());
        }

        assert!(!base_path.exists());
        Ok(())
    }
}
