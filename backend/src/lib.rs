//! # Stock Register Backend
//!
//! All non-UI logic for the noon-meal stock register.
//!
//! ```text
//! Presentation layer
//!     ↓
//! Domain Layer (ledger engine, register session, summaries, export)
//!     ↓
//! Storage Layer (JSON register files, YAML ledger config)
//! ```
//!
//! Everything is synchronous and single-threaded: the presentation layer calls
//! into [`Backend`] after each edit and gets the fully recomputed month back.

pub mod domain;
pub mod storage;

use anyhow::Result;
use log::{info, warn};
use shared::{MonthKey, MonthlySummary, YearlySummary};

use crate::domain::models::LedgerConfig;
use crate::domain::{CalendarService, ExportService, LedgerService, RegisterService, SummaryService};
use crate::storage::{Connection, JsonConnection, LedgerConfigStorage};

/// Main backend struct that orchestrates all services
pub struct Backend {
    pub calendar_service: CalendarService,
    pub ledger_service: LedgerService,
    pub register_service: RegisterService<JsonConnection>,
    pub summary_service: SummaryService,
    pub export_service: ExportService,
    connection: JsonConnection,
}

impl Backend {
    /// Create a backend over the default data directory
    pub fn new() -> Result<Self> {
        Ok(Self::with_connection(JsonConnection::new_default()?))
    }

    /// Create a backend over an explicit data directory connection.
    ///
    /// An unreadable or invalid ledger config falls back to the defaults.
    pub fn with_connection(connection: JsonConnection) -> Self {
        info!("Setting up ledger configuration");
        let config = match connection.create_ledger_config_repository().get_ledger_config() {
            Ok(config) => config,
            Err(e) => {
                warn!("Failed to load ledger config, using defaults: {}", e);
                LedgerConfig::default()
            }
        };

        let ledger_service = LedgerService::with_config(config);
        let register_service = RegisterService::new(&connection, ledger_service.clone());

        Self {
            calendar_service: CalendarService::new(),
            ledger_service,
            register_service,
            summary_service: SummaryService::new(),
            export_service: ExportService::new(),
            connection,
        }
    }

    pub fn connection(&self) -> &JsonConnection {
        &self.connection
    }

    /// Summary of the selected month, if one is selected
    pub fn current_monthly_summary(&self) -> Option<(MonthKey, MonthlySummary)> {
        let key = self.register_service.selected_month()?;
        let register = self.register_service.current()?;
        Some((key, self.summary_service.monthly_summary(&register.day_records)))
    }

    pub fn yearly_summary(&self, year: i32) -> Result<YearlySummary> {
        self.summary_service
            .yearly_summary(year, &self.connection.create_register_repository())
    }
}
