//! CSV layout for validation records.
//!
//! ```text
//! Timestamp,ActualDistance,BLEDistance,RSSI,ErrorDistance,ErrorPercentage,Accuracy
//! 2024-01-01 12:00:00,5.00,5.40,-52,0.40,8.0,Excellent
//! ```
//!
//! Timestamps are written in the device's local time zone.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, Utc};

use crate::validation::{ValidationError, record::ValidationRecord};

pub const HEADER: [&str; 7] = [
    "Timestamp",
    "ActualDistance",
    "BLEDistance",
    "RSSI",
    "ErrorDistance",
    "ErrorPercentage",
    "Accuracy",
];

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.with_timezone(&Local).format(TIMESTAMP_FORMAT).to_string()
}

fn row(record: &ValidationRecord) -> [String; 7] {
    [
        format_timestamp(record.timestamp()),
        format!("{:.2}", record.actual()),
        format!("{:.2}", record.measured()),
        format!("{:.0}", record.rssi()),
        format!("{:.2}", record.error_abs()),
        format!("{:.1}", record.error_pct()),
        record.bucket().to_string(),
    ]
}

/// Header plus one line per record, `\n` terminated.
pub fn to_csv<'a>(records: impl IntoIterator<Item = &'a ValidationRecord>) -> Result<String, ValidationError> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(HEADER)?;
    for record in records {
        writer.write_record(row(record))?;
    }

    let bytes = writer.into_inner().map_err(|e| ValidationError::Io(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| ValidationError::Io(std::io::Error::other(e)))
}

/// `BLE_Validation_<yyyyMMdd_HHmmss>.csv`, stamped with `now` in local time.
pub fn file_name(now: DateTime<Utc>) -> String {
    format!(
        "BLE_Validation_{}.csv",
        now.with_timezone(&Local).format("%Y%m%d_%H%M%S")
    )
}

pub fn write_to_dir(dir: &Path, now: DateTime<Utc>, csv: &str) -> Result<PathBuf, ValidationError> {
    let path = dir.join(file_name(now));
    std::fs::write(&path, csv)?;
    tracing::info!(path = %path.display(), "validation export written");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::record::{AccuracyBucket, ToleranceBands};
    use approx::assert_abs_diff_eq;
    use chrono::{NaiveDateTime, TimeZone};

    fn records(n: usize) -> Vec<ValidationRecord> {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        (0..n)
            .map(|i| {
                let actual = 1.0 + i as f64 * 1.7;
                let measured = actual * 1.08 + 0.013;
                ValidationRecord::new(
                    start + chrono::TimeDelta::seconds(i as i64 * 2),
                    actual,
                    measured,
                    -50.0 - i as f64,
                    &ToleranceBands::default(),
                )
            })
            .collect()
    }

    #[test]
    fn test_header_and_row_format() {
        let record = ValidationRecord::new(
            Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap(),
            5.0,
            5.4,
            -52.0,
            &ToleranceBands::default(),
        );
        let csv = to_csv([&record]).unwrap();
        let lines: Vec<_> = csv.lines().collect();

        assert_eq!(
            lines[0],
            "Timestamp,ActualDistance,BLEDistance,RSSI,ErrorDistance,ErrorPercentage,Accuracy"
        );
        assert_eq!(
            lines[1],
            format!("{},5.00,5.40,-52,0.40,8.0,Excellent", format_timestamp(record.timestamp()))
        );
    }

    #[test]
    fn test_round_trip() {
        let records = records(12);
        let csv = to_csv(&records).unwrap();
        assert_eq!(csv.lines().count(), records.len() + 1);

        let mut reader = csv::Reader::from_reader(csv.as_bytes());
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.iter().collect::<Vec<_>>(), HEADER);

        for (row, record) in reader.records().zip(&records) {
            let row = row.unwrap();
            let timestamp = NaiveDateTime::parse_from_str(&row[0], TIMESTAMP_FORMAT).unwrap();
            assert_eq!(timestamp, record.timestamp().with_timezone(&Local).naive_local());

            assert_abs_diff_eq!(row[1].parse::<f64>().unwrap(), record.actual(), epsilon = 0.005);
            assert_abs_diff_eq!(row[2].parse::<f64>().unwrap(), record.measured(), epsilon = 0.005);
            assert_abs_diff_eq!(row[3].parse::<f64>().unwrap(), record.rssi(), epsilon = 0.5);
            assert_abs_diff_eq!(row[4].parse::<f64>().unwrap(), record.error_abs(), epsilon = 0.005);
            assert_abs_diff_eq!(row[5].parse::<f64>().unwrap(), record.error_pct(), epsilon = 0.05);
            assert_eq!(row[6].parse::<AccuracyBucket>().unwrap(), record.bucket());
        }
    }

    #[test]
    fn test_empty_export_is_header_only() {
        let csv = to_csv(std::iter::empty()).unwrap();
        assert_eq!(csv.lines().count(), 1);
    }

    #[test]
    fn test_write_to_dir() {
        let dir = tempfile::tempdir().unwrap();
        let now = Utc.with_ymd_and_hms(2024, 3, 9, 8, 7, 6).unwrap();

        let path = write_to_dir(dir.path(), now, "Timestamp\n").unwrap();
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("BLE_Validation_"));
        assert!(name.ends_with(".csv"));
        assert_eq!(name.len(), "BLE_Validation_20240309_080706.csv".len());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "Timestamp\n");
    }
}
