//! Export service domain logic for the stock register.
//!
//! Produces CSV for the day-by-day stock register and for the monthly summary,
//! the printable artifacts of the register. Quantities are written at each
//! commodity's display precision: three decimals for bulk goods, whole eggs.

use anyhow::Result;
use log::info;
use shared::{Commodity, ExportDataResponse, MonthKey, MonthRegister, MonthlySummary};

use crate::domain::calendar::CalendarService;

/// Export service that handles all export-related business logic
#[derive(Clone, Default)]
pub struct ExportService {
    calendar: CalendarService,
}

impl ExportService {
    pub fn new() -> Self {
        Self {
            calendar: CalendarService::new(),
        }
    }

    /// One row per day with headcounts and the four balance columns per commodity
    pub fn export_register_csv(&self, key: MonthKey, register: &MonthRegister) -> Result<ExportDataResponse> {
        info!("📄 EXPORT: Exporting stock register for {}", key);

        let mut writer = csv::Writer::from_writer(Vec::new());

        let mut header = vec![
            "date".to_string(),
            "day".to_string(),
            "holiday".to_string(),
            "primary_students".to_string(),
            "upper_primary_students".to_string(),
        ];
        for commodity in Commodity::ALL {
            for column in ["opening", "received", "consumption", "closing"] {
                header.push(format!("{}_{}", commodity.key(), column));
            }
        }
        writer.write_record(&header)?;

        for record in &register.day_records {
            let mut row = vec![
                record.date.format("%Y-%m-%d").to_string(),
                self.calendar.weekday_name(record.day_of_week).to_string(),
                if record.is_holiday { "yes" } else { "no" }.to_string(),
                record.primary_students.to_string(),
                record.upper_primary_students.to_string(),
            ];
            let received = record.stock_received.total();
            for commodity in Commodity::ALL {
                row.push(commodity.format_quantity(record.opening_balance.get(commodity)));
                row.push(commodity.format_quantity(received.get(commodity)));
                row.push(commodity.format_quantity(record.consumption.get(commodity)));
                row.push(commodity.format_quantity(record.closing_balance.get(commodity)));
            }
            writer.write_record(&row)?;
        }

        let csv_content = finish(writer)?;
        let filename = format!("stock_register_{}_{:02}.csv", key.year, key.month);

        info!("✅ EXPORT: Exported {} rows to {}", register.day_records.len(), filename);
        Ok(ExportDataResponse {
            csv_content,
            filename,
            row_count: register.day_records.len(),
        })
    }

    /// One row per commodity with the month's opening, receipts, consumption and closing
    pub fn export_summary_csv(&self, key: MonthKey, summary: &MonthlySummary) -> Result<ExportDataResponse> {
        info!("📄 EXPORT: Exporting monthly summary for {}", key);

        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(["commodity", "unit", "opening", "received", "consumption", "closing"])?;

        for commodity in Commodity::ALL {
            writer.write_record([
                commodity.name().to_string(),
                commodity.unit().to_string(),
                commodity.format_quantity(summary.opening_balance.get(commodity)),
                commodity.format_quantity(summary.total_received.get(commodity)),
                commodity.format_quantity(summary.total_consumption.get(commodity)),
                commodity.format_quantity(summary.closing_balance.get(commodity)),
            ])?;
        }

        Ok(ExportDataResponse {
            csv_content: finish(writer)?,
            filename: format!("monthly_summary_{}_{:02}.csv", key.year, key.month),
            row_count: Commodity::ALL.len(),
        })
    }
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<String> {
    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush CSV export: {}", e))?;
    Ok(String::from_utf8(bytes)?)
}
