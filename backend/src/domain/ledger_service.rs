//! Ledger recalculation for the stock register.
//!
//! Rebuilds a month of register rows from the month's opening balance and the
//! raw daily inputs. Every call starts at day 1 and walks forward, so an edit
//! to an early day cascades into every later opening and closing balance.
//!
//! The algorithm, per calendar day:
//! 1. Take the input for that date, or an empty day if none was supplied
//! 2. Mark the day as a holiday if it falls on the non-serving weekday
//! 3. Derive consumption from the headcounts, the ration scale and the issue flags
//! 4. Open with the previous day's closing balance (the month opening on day 1)
//! 5. Close with opening + receipts - consumption, per commodity
//!
//! Balances are never clamped: over-consumption shows up as a negative balance.

use log::{debug, warn};
use shared::{Commodity, DailyInput, DailyRecord, Stock};

use crate::domain::calendar::CalendarService;
use crate::domain::models::LedgerConfig;

/// Service responsible for deriving consumption and walking the balance chain
#[derive(Clone)]
pub struct LedgerService {
    config: LedgerConfig,
    calendar: CalendarService,
}

impl LedgerService {
    pub fn new() -> Self {
        Self::with_config(LedgerConfig::default())
    }

    pub fn with_config(config: LedgerConfig) -> Self {
        Self {
            config,
            calendar: CalendarService::new(),
        }
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Recompute every row of a month (1-12).
    ///
    /// Inputs dated outside the month are ignored; when two inputs share a date
    /// the first one wins. A month outside 1-12 yields no rows.
    pub fn recalculate(
        &self,
        month: u32,
        year: i32,
        opening_balance: &Stock,
        existing_inputs: &[DailyInput],
    ) -> Vec<DailyRecord> {
        let dates = self.calendar.month_dates(month, year);
        if dates.is_empty() {
            warn!("Recalculation requested for invalid month {}/{}", month, year);
            return Vec::new();
        }

        let mut records = Vec::with_capacity(dates.len());
        let mut running_balance = *opening_balance;

        for date in dates {
            let input = existing_inputs
                .iter()
                .find(|input| input.date == date)
                .cloned()
                .unwrap_or_else(|| DailyInput::empty(date));

            let day_of_week = self.calendar.day_of_week(date);
            let is_holiday = self.is_holiday(day_of_week);
            let consumption = self.consumption_for(&input, is_holiday);

            let opening = running_balance;
            let closing = opening + input.stock_received.total() - consumption;
            running_balance = closing;

            records.push(DailyRecord {
                date,
                day_of_week,
                primary_students: input.primary_students,
                upper_primary_students: input.upper_primary_students,
                opening_balance: opening,
                stock_received: input.stock_received,
                consumption,
                closing_balance: closing,
                is_holiday,
                eggs_issued: input.eggs_issued,
                dhal_issued: input.dhal_issued,
                chickpeas_issued: input.chickpeas_issued,
                gram_issued: input.gram_issued,
            });
        }

        debug!("Recalculated {} rows for {}/{}", records.len(), month, year);
        records
    }

    /// True iff the weekday is the configured non-serving day
    pub fn is_holiday(&self, day_of_week: u32) -> bool {
        day_of_week == self.config.non_serving_weekday
    }

    /// Consumption for one day's input
    pub fn consumption_for(&self, input: &DailyInput, is_holiday: bool) -> Stock {
        if is_holiday || input.total_students() == 0 {
            return Stock::zero();
        }

        let scale = &self.config.ration_scale;
        Stock::from_fn(|commodity| {
            if !input.is_issued(commodity) {
                return 0.0;
            }
            input.primary_students as f64 * scale.primary_rate(commodity)
                + input.upper_primary_students as f64 * scale.upper_primary_rate(commodity)
        })
    }

    /// Check a month of rows for chain breaks.
    ///
    /// Returns one message per inconsistency; an empty list means every day
    /// opens on the previous day's closing and closes on its own net flow.
    pub fn validate_chain(&self, records: &[DailyRecord]) -> Vec<String> {
        const EPSILON: f64 = 0.001;
        let mut errors = Vec::new();

        for (index, record) in records.iter().enumerate() {
            if let Some(previous) = index.checked_sub(1).map(|i| &records[i]) {
                for commodity in Commodity::ALL {
                    let expected = previous.closing_balance.get(commodity);
                    let actual = record.opening_balance.get(commodity);
                    if (expected - actual).abs() > EPSILON {
                        errors.push(format!(
                            "{}: {} opens at {:.3} but {} closed at {:.3}",
                            record.date, commodity, actual, previous.date, expected
                        ));
                    }
                }
            }

            let expected_closing =
                record.opening_balance + record.stock_received.total() - record.consumption;
            for commodity in Commodity::ALL {
                let expected = expected_closing.get(commodity);
                let actual = record.closing_balance.get(commodity);
                if (expected - actual).abs() > EPSILON {
                    errors.push(format!(
                        "{}: {} closes at {:.3}, expected {:.3}",
                        record.date, commodity, actual, expected
                    ));
                }
            }
        }

        if !errors.is_empty() {
            warn!("Found {} chain errors across {} rows", errors.len(), records.len());
        }

        errors
    }
}

impl Default for LedgerService {
    fn default() -> Self {
        Self::new()
    }
}
