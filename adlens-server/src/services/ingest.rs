//! CSV ingestion
//!
//! Accepts header-row tabular text, normalizes headers, coerces values
//! leniently, and stamps each row with the authenticated owner before the
//! db layer persists it.
//!
//! Numeric policy: a value that fails to parse becomes 0 rather than
//! rejecting the upload. A row without a date lands on the caller-supplied
//! default (today at the HTTP boundary). Both leniencies are load-bearing
//! for existing uploads and are pinned by tests. Parse-level failures
//! (ragged rows etc.) reject the whole file with the parser's diagnostics;
//! nothing is partially ingested.

use adlens_common::db::models::{SaleRecord, SpendRecord};
use csv::StringRecord;
use std::collections::HashMap;
use thiserror::Error;
use uuid::Uuid;

/// Accepted aliases for the spend amount column, first match wins per row
const SPEND_AMOUNT_ALIASES: &[&str] = &["spend_amount", "amount", "spend"];

/// Accepted aliases for the sale amount column
const SALE_AMOUNT_ALIASES: &[&str] = &["sale_amount", "amount", "revenue"];

/// Ingestion errors
#[derive(Debug, Error)]
pub enum IngestError {
    /// Malformed tabular input; carries one diagnostic per bad record
    #[error("Failed to parse CSV")]
    Parse { details: Vec<String> },
}

/// Parse an uploaded spend CSV into owner-stamped records
pub fn parse_spend_rows(
    csv_text: &str,
    owner_id: Uuid,
    default_date: &str,
) -> Result<Vec<SpendRecord>, IngestError> {
    let table = read_table(csv_text)?;

    let rows = table
        .rows()
        .map(|row| SpendRecord {
            owner_id,
            date: row.field("date").unwrap_or(default_date).to_string(),
            spend_amount: lenient_number(row.first_of(SPEND_AMOUNT_ALIASES)),
            campaign_id: row.field("campaign_id").map(str::to_string),
            impressions: row.field("impressions").and_then(|v| v.trim().parse().ok()),
        })
        .collect();

    Ok(rows)
}

/// Parse an uploaded sales CSV into owner-stamped records
pub fn parse_sale_rows(
    csv_text: &str,
    owner_id: Uuid,
    default_date: &str,
) -> Result<Vec<SaleRecord>, IngestError> {
    let table = read_table(csv_text)?;

    let rows = table
        .rows()
        .map(|row| SaleRecord {
            owner_id,
            date: row.field("date").unwrap_or(default_date).to_string(),
            sale_amount: lenient_number(row.first_of(SALE_AMOUNT_ALIASES)),
            order_id: row.field("order_id").map(str::to_string),
            customer_email: row.field("customer_email").map(str::to_string),
        })
        .collect();

    Ok(rows)
}

/// Normalize a header name: trim, lowercase, spaces to underscores
fn normalize_header(header: &str) -> String {
    header.trim().to_lowercase().replace(' ', "_")
}

/// Lenient numeric coercion: unparseable or non-finite becomes 0
fn lenient_number(value: Option<&str>) -> f64 {
    value
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// A parsed table: normalized header index plus raw records
struct Table {
    columns: HashMap<String, usize>,
    records: Vec<StringRecord>,
}

/// One row with header-aware field access
struct RowView<'a> {
    columns: &'a HashMap<String, usize>,
    record: &'a StringRecord,
}

impl Table {
    fn rows(&self) -> impl Iterator<Item = RowView<'_>> {
        self.records.iter().map(|record| RowView {
            columns: &self.columns,
            record,
        })
    }
}

impl RowView<'_> {
    /// Value of a named column; empty cells read as absent
    fn field(&self, name: &str) -> Option<&str> {
        let idx = *self.columns.get(name)?;
        self.record.get(idx).filter(|v| !v.trim().is_empty())
    }

    /// First alias with a non-empty value in this row
    fn first_of(&self, aliases: &[&str]) -> Option<&str> {
        aliases.iter().find_map(|name| self.field(name))
    }
}

/// Read the CSV wholesale, collecting every record-level diagnostic.
/// Any diagnostic rejects the entire upload.
fn read_table(csv_text: &str) -> Result<Table, IngestError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(csv_text.as_bytes());

    let columns: HashMap<String, usize> = match reader.headers() {
        Ok(headers) => headers
            .iter()
            .enumerate()
            .map(|(idx, name)| (normalize_header(name), idx))
            .collect(),
        Err(e) => {
            return Err(IngestError::Parse {
                details: vec![e.to_string()],
            })
        }
    };

    let mut records = Vec::new();
    let mut details = Vec::new();
    for result in reader.records() {
        match result {
            Ok(record) => records.push(record),
            Err(e) => details.push(e.to_string()),
        }
    }

    if !details.is_empty() {
        return Err(IngestError::Parse { details });
    }

    Ok(Table { columns, records })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner() -> Uuid {
        Uuid::nil()
    }

    #[test]
    fn parses_spend_rows_with_canonical_headers() {
        let csv = "date,spend_amount,campaign_id,impressions\n\
                   2024-01-01,100.50,summer,1200\n\
                   2024-01-02,25,winter,\n";
        let rows = parse_spend_rows(csv, owner(), "2024-06-01").unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].date, "2024-01-01");
        assert_eq!(rows[0].spend_amount, 100.50);
        assert_eq!(rows[0].campaign_id.as_deref(), Some("summer"));
        assert_eq!(rows[0].impressions, Some(1200));
        assert_eq!(rows[1].impressions, None);
    }

    #[test]
    fn headers_are_trimmed_lowercased_and_underscored() {
        let csv = " Date , Spend Amount \n2024-01-01,42\n";
        let rows = parse_spend_rows(csv, owner(), "2024-06-01").unwrap();
        assert_eq!(rows[0].date, "2024-01-01");
        assert_eq!(rows[0].spend_amount, 42.0);
    }

    #[test]
    fn amount_aliases_resolve_in_order() {
        let csv = "date,amount\n2024-01-01,7\n";
        let rows = parse_spend_rows(csv, owner(), "2024-06-01").unwrap();
        assert_eq!(rows[0].spend_amount, 7.0);

        let csv = "date,spend\n2024-01-01,9\n";
        let rows = parse_spend_rows(csv, owner(), "2024-06-01").unwrap();
        assert_eq!(rows[0].spend_amount, 9.0);

        // an empty preferred column falls through to the next alias
        let csv = "date,spend_amount,amount\n2024-01-01,,11\n";
        let rows = parse_spend_rows(csv, owner(), "2024-06-01").unwrap();
        assert_eq!(rows[0].spend_amount, 11.0);
    }

    #[test]
    fn unparseable_amount_coerces_to_zero() {
        // deliberate leniency: one bad field must not lose the upload
        let csv = "date,spend_amount\n2024-01-01,N/A\n2024-01-02,50\n";
        let rows = parse_spend_rows(csv, owner(), "2024-06-01").unwrap();
        assert_eq!(rows[0].spend_amount, 0.0);
        assert_eq!(rows[1].spend_amount, 50.0);
    }

    #[test]
    fn missing_date_defaults_to_supplied_day() {
        let csv = "spend_amount\n12.5\n";
        let rows = parse_spend_rows(csv, owner(), "2024-06-15").unwrap();
        assert_eq!(rows[0].date, "2024-06-15");

        // an empty date cell behaves like a missing column
        let csv = "date,spend_amount\n,12.5\n";
        let rows = parse_spend_rows(csv, owner(), "2024-06-15").unwrap();
        assert_eq!(rows[0].date, "2024-06-15");
    }

    #[test]
    fn every_row_is_stamped_with_the_owner() {
        let id = Uuid::new_v4();
        let csv = "date,spend_amount\n2024-01-01,1\n2024-01-02,2\n";
        let rows = parse_spend_rows(csv, id, "2024-06-01").unwrap();
        assert!(rows.iter().all(|r| r.owner_id == id));
    }

    #[test]
    fn ragged_rows_reject_the_whole_upload() {
        let csv = "date,spend_amount\n2024-01-01,10\n2024-01-02,20,extra,fields\n";
        let err = parse_spend_rows(csv, owner(), "2024-06-01").unwrap_err();
        let IngestError::Parse { details } = err;
        assert!(!details.is_empty());
    }

    #[test]
    fn parses_sale_rows() {
        let csv = "date,sale_amount,order_id,customer_email\n\
                   2024-01-01,250,ord-1,a@example.com\n";
        let rows = parse_sale_rows(csv, owner(), "2024-06-01").unwrap();
        assert_eq!(rows[0].sale_amount, 250.0);
        assert_eq!(rows[0].order_id.as_deref(), Some("ord-1"));
        assert_eq!(rows[0].customer_email.as_deref(), Some("a@example.com"));
    }

    #[test]
    fn sale_amount_accepts_revenue_alias() {
        let csv = "date,revenue\n2024-01-01,99.9\n";
        let rows = parse_sale_rows(csv, owner(), "2024-06-01").unwrap();
        assert_eq!(rows[0].sale_amount, 99.9);
    }

    #[test]
    fn empty_file_yields_no_rows() {
        let rows = parse_spend_rows("", owner(), "2024-06-01").unwrap();
        assert!(rows.is_empty());
    }
}
