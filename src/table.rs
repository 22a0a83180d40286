use chrono::{DateTime, Local};
use crate::record::PingRecord;

/// Fixed column headers, present whether or not any rows exist.
pub const COLUMNS: [&str; 3] = ["IP", "Ping Duration", "Last Successful Attempt"];

/// Shown when `time_attempt` is missing or does not parse.
pub const TIME_PLACEHOLDER: &str = "—";

/// One formatted table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    pub ip: String,
    pub duration: String,
    pub last_attempt: String,
}

/// Formatted table contents, ready for painting. The header is implied by
/// [`COLUMNS`] and is never part of `rows`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableView {
    pub rows: Vec<TableRow>,
}

/// Projects records to table rows, one per record in input order. Pure; an
/// empty input yields a header-only table.
pub fn project(records: &[PingRecord]) -> TableView {
    TableView {
        rows: records
            .iter()
            .map(|record| TableRow {
                ip: record.ip.clone(),
                duration: format_duration(record.duration),
                last_attempt: format_last_attempt(record.time_attempt.as_deref()),
            })
            .collect(),
    }
}

/// Microseconds to a millisecond display value with exactly three decimals.
pub fn format_duration(micros: u64) -> String {
    format!("{:.3} ms", micros as f64 / 1000.0)
}

/// ISO-8601 timestamp to the viewer's local date and time. Missing or
/// unparsable input degrades to [`TIME_PLACEHOLDER`] rather than failing the
/// row.
pub fn format_last_attempt(time_attempt: Option<&str>) -> String {
    time_attempt
        .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
        .map(|parsed| parsed.with_timezone(&Local).format("%x %X").to_string())
        .unwrap_or_else(|| TIME_PLACEHOLDER.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(ip: &str, duration: u64, time_attempt: Option<&str>) -> PingRecord {
        PingRecord {
            ip: ip.to_string(),
            duration,
            time_attempt: time_attempt.map(str::to_string),
        }
    }

    #[test]
    fn empty_input_yields_header_only() {
        let view = project(&[]);
        assert!(view.rows.is_empty());
        assert_eq!(COLUMNS.len(), 3);
    }

    #[test]
    fn one_row_per_record_in_input_order() {
        let records = [
            record("1.1.1.1", 1500, Some("2024-01-01T00:00:00Z")),
            record("2.2.2.2", 500, Some("2024-01-01T00:00:01Z")),
        ];
        let view = project(&records);
        assert_eq!(view.rows.len(), 2);
        assert_eq!(view.rows[0].ip, "1.1.1.1");
        assert_eq!(view.rows[1].ip, "2.2.2.2");
    }

    #[test]
    fn duplicate_ips_become_separate_rows() {
        let records = [
            record("1.1.1.1", 100, None),
            record("1.1.1.1", 200, None),
        ];
        let view = project(&records);
        assert_eq!(view.rows.len(), 2);
        assert_eq!(view.rows[0].duration, "0.100 ms");
        assert_eq!(view.rows[1].duration, "0.200 ms");
    }

    #[test]
    fn duration_formats_to_three_decimals() {
        assert_eq!(format_duration(1500), "1.500 ms");
        assert_eq!(format_duration(0), "0.000 ms");
        assert_eq!(format_duration(1), "0.001 ms");
        assert_eq!(format_duration(1_000_000), "1000.000 ms");
    }

    #[test]
    fn valid_timestamp_renders_non_placeholder() {
        let formatted = format_last_attempt(Some("2024-01-01T00:00:00Z"));
        assert_ne!(formatted, TIME_PLACEHOLDER);
        assert!(!formatted.is_empty());
    }

    #[test]
    fn missing_or_garbage_timestamp_renders_placeholder() {
        assert_eq!(format_last_attempt(None), TIME_PLACEHOLDER);
        assert_eq!(format_last_attempt(Some("not a timestamp")), TIME_PLACEHOLDER);
        assert_eq!(format_last_attempt(Some("")), TIME_PLACEHOLDER);
    }

    #[test]
    fn projection_is_idempotent() {
        let records = [
            record("1.1.1.1", 1500, Some("2024-01-01T00:00:00Z")),
            record("2.2.2.2", 500, None),
        ];
        assert_eq!(project(&records), project(&records));
    }
}
