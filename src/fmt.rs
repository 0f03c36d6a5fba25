fn with_commas(int_part: &str) -> String {
    let mut out = String::new();
    for (i, c) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out.chars().rev().collect()
}

/// Format a won amount with thousands separators: ₩1,234,567
pub fn krw(val: f64) -> String {
    let negative = val < 0.0;
    let rounded = val.abs().round() as i64;
    let formatted = with_commas(&rounded.to_string());
    if negative {
        format!("-₩{formatted}")
    } else {
        format!("₩{formatted}")
    }
}

/// Two-decimal amount with thousands separators, for unit prices that may
/// be in a foreign currency: 1,234.56
pub fn money(val: f64) -> String {
    let negative = val < 0.0;
    let cents = format!("{:.2}", val.abs());
    let (int_part, dec_part) = cents.split_once('.').unwrap_or((cents.as_str(), "00"));
    let formatted = with_commas(int_part);
    if negative {
        format!("-{formatted}.{dec_part}")
    } else {
        format!("{formatted}.{dec_part}")
    }
}

pub fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{size:.1} {}", UNITS[unit])
    }
}
