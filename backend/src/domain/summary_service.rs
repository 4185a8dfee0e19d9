//! Monthly and yearly totals for the stock register.

use anyhow::Result;
use log::{debug, info};
use shared::{DailyRecord, MonthlySummary, Stock, YearlyMonthEntry, YearlySummary};

use crate::storage::RegisterStorage;

#[derive(Clone, Default)]
pub struct SummaryService;

impl SummaryService {
    pub fn new() -> Self {
        Self
    }

    /// Opening, receipts, consumption and closing for one month of rows.
    /// A month with no rows summarizes to all zeros.
    pub fn monthly_summary(&self, records: &[DailyRecord]) -> MonthlySummary {
        let mut total_received = Stock::zero();
        let mut total_consumption = Stock::zero();

        for record in records {
            total_received += record.stock_received.total();
            total_consumption += record.consumption;
        }

        MonthlySummary {
            opening_balance: records.first().map(|r| r.opening_balance).unwrap_or_default(),
            total_received,
            total_consumption,
            closing_balance: records.last().map(|r| r.closing_balance).unwrap_or_default(),
        }
    }

    /// Summaries of every stored month of `year`, plus totals for the year.
    ///
    /// The year opens on the first stored month's opening balance and closes on
    /// the last stored month's closing balance.
    pub fn yearly_summary<S: RegisterStorage>(&self, year: i32, storage: &S) -> Result<YearlySummary> {
        let mut months = Vec::new();

        for key in storage.list_registers(year)? {
            if let Some(register) = storage.load_register(key)? {
                debug!("Including {} in yearly summary", key);
                months.push(YearlyMonthEntry {
                    month: key,
                    summary: self.monthly_summary(&register.day_records),
                });
            }
        }

        let mut totals = MonthlySummary::default();
        if let (Some(first), Some(last)) = (months.first(), months.last()) {
            totals.opening_balance = first.summary.opening_balance;
            totals.closing_balance = last.summary.closing_balance;
        }
        for entry in &months {
            totals.total_received += entry.summary.total_received;
            totals.total_consumption += entry.summary.total_consumption;
        }

        info!("Built yearly summary for {} from {} stored months", year, months.len());
        Ok(YearlySummary { year, months, totals })
    }
}
