use chrono::{DateTime, Days, NaiveDate, NaiveDateTime};

/// Day zero of the 1900 spreadsheet date system.
///
/// Serial 1 is 1900-01-01 only because of the phantom 1900-02-29; anchoring
/// at 1899-12-30 is exact for every serial from 61 (1900-03-01) onwards.
const SERIAL_EPOCH: (i32, u32, u32) = (1899, 12, 30);

/// Largest serial a spreadsheet can hold (9999-12-31).
const MAX_SERIAL: f64 = 2_958_465.0;

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d", "%Y年%m月%d日", "%Y%m%d"];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

// ── DateParser ────────────────────────────────────────────────────────────────

/// Parses the date column of exported usage spreadsheets.
pub struct DateParser;

impl DateParser {
    /// Parse a textual date. Returns `None` for anything unrecognised.
    ///
    /// Handles plain dates (`2025-01-01`, `2025/1/1`, `2025年1月1日`,
    /// `20250101`), date-times with or without `T`, and RFC 3339 strings.
    /// The time of day is discarded.
    pub fn parse_str(s: &str) -> Option<NaiveDate> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }

        for fmt in DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
                return Some(date);
            }
        }

        for fmt in DATETIME_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
                return Some(dt.date());
            }
        }

        DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive())
    }

    /// Convert a spreadsheet serial day number (fraction = time of day).
    pub fn from_serial(serial: f64) -> Option<NaiveDate> {
        if !serial.is_finite() || serial < 1.0 || serial > MAX_SERIAL {
            return None;
        }
        let (y, m, d) = SERIAL_EPOCH;
        let epoch = NaiveDate::from_ymd_opt(y, m, d)?;
        epoch.checked_add_days(Days::new(serial.floor() as u64))
    }
}
