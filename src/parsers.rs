//! Cell-level parsers over raw workbook values.
//!
//! All of these are soft: a value that cannot be read comes back as `None`
//! and the row builder turns it into a warning. The timezone is an explicit
//! parameter so date handling never leans on process-global state.

use calamine::Data;
use chrono::{DateTime, Duration, FixedOffset, NaiveDate};

/// The source sheets are maintained in Korea; a calendar day is anchored to
/// midnight at this offset so it never shifts under UTC storage. Real runs
/// build the offset from settings; tests use this directly.
#[cfg(test)]
pub fn seoul() -> FixedOffset {
    FixedOffset::east_opt(9 * 3600).expect("valid fixed offset")
}

/// Excel epoch is 1899-12-30 (accounting for the 1900 leap year bug).
fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || serial <= 0.0 || serial >= 200_000.0 {
        return None;
    }
    let base = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    base.checked_add_signed(Duration::days(serial as i64))
}

fn compact_to_date(digits: &str) -> Option<NaiveDate> {
    if digits.len() != 8 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let y: i32 = digits[0..4].parse().ok()?;
    let m: u32 = digits[4..6].parse().ok()?;
    let d: u32 = digits[6..8].parse().ok()?;
    NaiveDate::from_ymd_opt(y, m, d)
}

fn text_to_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Some(date) = compact_to_date(raw) {
        return Some(date);
    }
    // YYYY-MM-DD, YYYY.MM.DD, YYYY/MM/DD
    for delim in ['-', '.', '/'] {
        if raw.contains(delim) {
            let parts: Vec<&str> = raw.split(delim).collect();
            if parts.len() == 3 {
                let y = parts[0].trim().parse::<i32>();
                let m = parts[1].trim().parse::<u32>();
                let d = parts[2].trim().parse::<u32>();
                if let (Ok(y), Ok(m), Ok(d)) = (y, m, d) {
                    return NaiveDate::from_ymd_opt(y, m, d);
                }
            }
            break;
        }
    }
    // Anything else that still parses as a date or timestamp.
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.date());
        }
    }
    None
}

/// Parse any of the date shapes the sheets contain: a native date cell, an
/// Excel serial number, compact `YYYYMMDD`, delimited `YYYY-MM-DD` (also `.`
/// and `/`), or a plain timestamp string. The result is midnight of that
/// calendar day at `tz`.
pub fn parse_date(cell: &Data, tz: FixedOffset) -> Option<DateTime<FixedOffset>> {
    let date = match cell {
        Data::DateTime(dt) => serial_to_date(dt.as_f64())?,
        Data::DateTimeIso(s) => text_to_date(s)?,
        Data::Float(f) => serial_to_date(*f)?,
        Data::Int(i) => {
            // An 8-digit integer cell is a compact date, not a serial.
            if (10_000_000..100_000_000).contains(i) {
                compact_to_date(&i.to_string())?
            } else {
                serial_to_date(*i as f64)?
            }
        }
        Data::String(s) => text_to_date(s)?,
        _ => return None,
    };
    date.and_hms_opt(0, 0, 0)
        .and_then(|dt| dt.and_local_timezone(tz).single())
}

/// Numeric cells pass through; strings are stripped of thousands separators,
/// whitespace, and won/₩ markers, with `(...)` read as a negative.
pub fn parse_amount(cell: &Data) -> Option<f64> {
    let value = match cell {
        Data::Float(f) => *f,
        Data::Int(i) => *i as f64,
        Data::String(s) => {
            let s = s.replace(',', "").replace('₩', "").replace('원', "");
            let s = s.trim();
            if let Some(inner) = s.strip_prefix('(').and_then(|v| v.strip_suffix(')')) {
                -inner.trim().parse::<f64>().ok()?
            } else {
                s.parse::<f64>().ok()?
            }
        }
        _ => return None,
    };
    value.is_finite().then_some(value)
}

/// Cell at `index`, or `None` past the end of the row or for an empty cell.
pub fn pick_cell(row: &[Data], index: usize) -> Option<&Data> {
    match row.get(index) {
        Some(Data::Empty) | None => None,
        Some(cell) => Some(cell),
    }
}

/// Trimmed text at `index`; `None` when the cell is missing, non-textual
/// only in the empty sense, or blank after trimming. Numeric cells are
/// rendered as text so an id typed as a number still reads.
pub fn cell_text(row: &[Data], index: usize) -> Option<String> {
    let text = match pick_cell(row, index)? {
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

/// True iff every cell is empty or blank text; used to skip spacer rows.
pub fn is_row_empty(row: &[Data]) -> bool {
    row.iter().all(|cell| match cell {
        Data::Empty => true,
        Data::String(s) => s.trim().is_empty(),
        _ => false,
    })
}
