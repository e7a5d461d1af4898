//! Normalization of calendar display values into comparable numbers.
//!
//! Forecast/previous/actual fields arrive as display strings: "3.2%",
//! "210K", "-1.5M", "1,250". All magnitude comparisons in the bias engine
//! go through [`parse_value`]; anything it cannot read simply disables the
//! numeric adjustment for that event.

/// Parse a calendar display value into a plain float.
///
/// Strips percent signs, thousands separators and whitespace, then applies
/// an exact uppercase magnitude suffix: K = 1e3, M = 1e6, B = 1e9.
/// Returns `None` when no number can be extracted.
pub fn parse_value(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '%' && *c != ',')
        .collect();
    if cleaned.is_empty() {
        return None;
    }

    // Suffix check is case-sensitive on purpose: the feed renders
    // magnitudes as uppercase K/M/B, and "3.2m" is not a magnitude.
    let (digits, mult) = match cleaned.as_bytes().last() {
        Some(b'K') => (&cleaned[..cleaned.len() - 1], 1e3),
        Some(b'M') => (&cleaned[..cleaned.len() - 1], 1e6),
        Some(b'B') => (&cleaned[..cleaned.len() - 1], 1e9),
        _ => (cleaned.as_str(), 1.0),
    };

    digits.parse::<f64>().ok().map(|v| v * mult)
}
