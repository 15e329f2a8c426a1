//! Unit formatting shared by adapters that report sizes and speeds.

const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Human-readable byte quantity, e.g. `1536 -> "1.5 KB"`.
///
/// Divides by 1024 while the value is at least 1024 and a larger unit
/// exists, then rounds to two decimals. Zero is rendered as `"0 B"`.
pub fn format_bytes(bytes: u64) -> String {
    scale(bytes, "")
}

/// Transfer rate variant of [`format_bytes`], e.g. `2048 -> "2.0 KB/s"`.
///
/// Zero is still rendered as the bare `"0 B"`.
pub fn format_speed(bytes_per_second: u64) -> String {
    scale(bytes_per_second, "/s")
}

/// `uploaded / downloaded` rounded to two decimals; 0 when nothing was
/// downloaded.
pub fn share_ratio(uploaded: u64, downloaded: u64) -> f64 {
    if downloaded == 0 {
        return 0.0;
    }
    round2(uploaded as f64 / downloaded as f64)
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn scale(bytes: u64, suffix: &str) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }

    format!("{} {}{}", decimal(round2(size)), UNITS[unit], suffix)
}

/// Shortest decimal rendering that always keeps one fractional digit
/// (`1.0`, `1.5`, `1.23`).
fn decimal(value: f64) -> String {
    let rendered = value.to_string();
    if rendered.contains('.') || !value.is_finite() {
        rendered
    } else {
        format!("{}.0", rendered)
    }
}
