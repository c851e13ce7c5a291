//! Tabular export of the ledger.
//!
//! Rows carry pre-formatted strings so any document renderer can lay them out directly. CSV
//! rendering is provided here.

use crate::domain::{Decimal, OperationRecord};
use serde::Serialize;
use std::io::Write;
use thiserror::Error;

/// Column headers, in order.
pub const EXPORT_COLUMNS: [&str; 7] = [
    "Date",
    "Opening Capital",
    "Operated Value",
    "Percentage",
    "Result",
    "Closing Balance",
    "Risk(%)",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFormat {
    /// Prepended to every monetary value.
    pub currency_prefix: String,
    /// chrono format string for the Date column.
    pub date_format: String,
}

impl Default for ExportFormat {
    fn default() -> Self {
        Self {
            currency_prefix: "$".to_string(),
            date_format: "%Y-%m-%d".to_string(),
        }
    }
}

impl ExportFormat {
    pub fn money(&self, value: Decimal) -> String {
        format!("{}{}", self.currency_prefix, value.to_fixed_2())
    }

    pub fn percent(&self, value: Decimal) -> String {
        format!("{}%", value.to_fixed_2())
    }
}

/// One formatted row of the export table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRow {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Opening Capital")]
    pub opening_capital: String,
    #[serde(rename = "Operated Value")]
    pub operated_value: String,
    #[serde(rename = "Percentage")]
    pub percentage: String,
    #[serde(rename = "Result")]
    pub result: String,
    #[serde(rename = "Closing Balance")]
    pub closing_balance: String,
    #[serde(rename = "Risk(%)")]
    pub risk_percent: String,
    /// Whether renderers that colour rows should show this one as a gain.
    #[serde(skip)]
    pub gain: bool,
}

impl ExportRow {
    pub fn from_record(record: &OperationRecord, format: &ExportFormat) -> Self {
        Self {
            date: record.timestamp.format(&format.date_format).to_string(),
            opening_capital: format.money(record.opening_capital),
            operated_value: format.money(record.operated_value),
            percentage: format.percent(record.percentage),
            result: format.money(record.result),
            closing_balance: format.money(record.closing_balance),
            risk_percent: format.percent(record.risk_percent),
            gain: record.is_gain(),
        }
    }

    /// Cells in [`EXPORT_COLUMNS`] order.
    pub fn cells(&self) -> [&str; 7] {
        [
            self.date.as_str(),
            self.opening_capital.as_str(),
            self.operated_value.as_str(),
            self.percentage.as_str(),
            self.result.as_str(),
            self.closing_balance.as_str(),
            self.risk_percent.as_str(),
        ]
    }
}

pub fn build_rows(records: &[OperationRecord], format: &ExportFormat) -> Vec<ExportRow> {
    records
        .iter()
        .map(|record| ExportRow::from_record(record, format))
        .collect()
}

/// Write the header and one row per record as CSV.
pub fn write_csv<W: Write>(
    records: &[OperationRecord],
    format: &ExportFormat,
    writer: W,
) -> Result<(), ExportError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    csv_writer.write_record(EXPORT_COLUMNS)?;
    for row in build_rows(records, format) {
        csv_writer.write_record(row.cells())?;
    }
    csv_writer.flush()?;
    Ok(())
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn record() -> OperationRecord {
        OperationRecord {
            timestamp: Utc.with_ymd_and_hms(2024, 3, 9, 15, 30, 0).unwrap(),
            operated_value: Decimal::from(100),
            percentage: Decimal::from(-20),
            opening_capital: Decimal::from(1050),
            result: Decimal::from(-20),
            closing_balance: Decimal::from(1030),
            risk_percent: Decimal::from(3),
        }
    }

    #[test]
    fn test_row_formatting() {
        let row = ExportRow::from_record(&record(), &ExportFormat::default());
        assert_eq!(
            row.cells(),
            [
                "2024-03-09",
                "$1050.00",
                "$100.00",
                "-20.00%",
                "$-20.00",
                "$1030.00",
                "3.00%"
            ]
        );
    }

    #[test]
    fn test_custom_prefix_and_date_format() {
        let format = ExportFormat {
            currency_prefix: "€".to_string(),
            date_format: "%d/%m/%Y".to_string(),
        };
        let row = ExportRow::from_record(&record(), &format);
        assert_eq!(row.date, "09/03/2024");
        assert_eq!(row.closing_balance, "€1030.00");
    }

    #[test]
    fn test_percent_rounds_to_two_places() {
        let format = ExportFormat::default();
        let third = Decimal::from(1) / Decimal::from(3);
        assert_eq!(format.percent(third), "0.33%");
        assert_eq!(format.money(Decimal::from_parts(12345, 3)), "$12.35");
    }

    #[test]
    fn test_csv_output() {
        let mut out = Vec::new();
        write_csv(&[record()], &ExportFormat::default(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("Date,Opening Capital,Operated Value,Percentage,Result,Closing Balance,Risk(%)")
        );
        assert_eq!(
            lines.next(),
            Some("2024-03-09,$1050.00,$100.00,-20.00%,$-20.00,$1030.00,3.00%")
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_row_json_uses_column_names() {
        let row = ExportRow::from_record(&record(), &ExportFormat::default());
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["Risk(%)"], "3.00%");
        assert_eq!(json["Opening Capital"], "$1050.00");
    }

    #[test]
    fn test_row_gain_flag_follows_result() {
        let format = ExportFormat::default();
        let mut flat = record();
        flat.result = Decimal::zero();

        assert!(!ExportRow::from_record(&record(), &format).gain);
        assert!(ExportRow::from_record(&flat, &format).gain);
        let json = serde_json::to_value(ExportRow::from_record(&flat, &format)).unwrap();
        assert!(json.get("gain").is_none());
    }

    #[test]
    fn test_csv_empty_ledger_has_header_only() {
        let mut out = Vec::new();
        write_csv(&[], &ExportFormat::default(), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 1);
    }
}
