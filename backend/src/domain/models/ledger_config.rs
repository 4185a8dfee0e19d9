//! Domain model for the ledger configuration: the ration scale and the weekly
//! non-serving day.
use serde::{Deserialize, Serialize};
use shared::{Commodity, Stock};

/// Per-student daily consumption rates for each school level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RationScale {
    pub primary: Stock,
    pub upper_primary: Stock,
}

impl Default for RationScale {
    fn default() -> Self {
        Self {
            primary: Stock {
                rice: 0.100,
                dhal: 0.015,
                oil: 0.003,
                salt: 0.002,
                gram: 0.020,
                chickpea: 0.020,
                egg: 1.0,
            },
            upper_primary: Stock {
                rice: 0.150,
                dhal: 0.020,
                oil: 0.005,
                salt: 0.003,
                gram: 0.030,
                chickpea: 0.030,
                egg: 1.0,
            },
        }
    }
}

impl RationScale {
    pub fn primary_rate(&self, commodity: Commodity) -> f64 {
        self.primary.get(commodity)
    }

    pub fn upper_primary_rate(&self, commodity: Commodity) -> f64 {
        self.upper_primary.get(commodity)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// 0 = Sunday, 1 = Monday, ..., 6 = Saturday
    pub non_serving_weekday: u32,
    pub ration_scale: RationScale,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            non_serving_weekday: 0,
            ration_scale: RationScale::default(),
        }
    }
}

impl LedgerConfig {
    pub fn is_valid_day_of_week(day: u32) -> bool {
        day <= 6
    }

    pub fn validate(&self) -> Result<(), LedgerConfigError> {
        if !Self::is_valid_day_of_week(self.non_serving_weekday) {
            return Err(LedgerConfigError::InvalidWeekday(self.non_serving_weekday));
        }

        for commodity in Commodity::ALL {
            for rate in [
                self.ration_scale.primary_rate(commodity),
                self.ration_scale.upper_primary_rate(commodity),
            ] {
                if rate < 0.0 || !rate.is_finite() {
                    return Err(LedgerConfigError::InvalidRate { commodity, rate });
                }
            }
        }

        Ok(())
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum LedgerConfigError {
    #[error("Non-serving weekday must be between 0 (Sunday) and 6 (Saturday), got {0}")]
    InvalidWeekday(u32),
    #[error("Ration rate for {commodity} must be a non-negative number, got {rate}")]
    InvalidRate { commodity: Commodity, rate: f64 },
}
