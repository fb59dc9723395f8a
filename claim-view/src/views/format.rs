use chrono::{DateTime, NaiveDateTime};

const RUPEE: char = '₹';

/// Rupee amount with Indian digit grouping, e.g. `₹12,34,567.5`.
pub fn format_currency(amount: f64) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    // At most three fraction digits, trailing zeros dropped
    let scaled = (amount.abs() * 1000.0).round() as u128;
    let whole = scaled / 1000;
    let fraction = scaled % 1000;

    let mut out = format!("{sign}{RUPEE}{}", group_indian(whole));
    if fraction > 0 {
        let digits = format!("{fraction:03}");
        out.push('.');
        out.push_str(digits.trim_end_matches('0'));
    }
    out
}

/// Last three digits, then pairs: 1234567 -> 12,34,567
fn group_indian(value: u128) -> String {
    let digits = value.to_string();
    if digits.len() <= 3 {
        return digits;
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();
    format!("{},{}", groups.join(","), tail)
}

pub fn format_megabytes(bytes: u64) -> String {
    format!("{:.2} MB", bytes as f64 / 1024.0 / 1024.0)
}

/// Accepts RFC 3339 or the offset-less ISO form the backend emits.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    raw.parse::<NaiveDateTime>().ok()
}

pub fn format_date(raw: &str) -> String {
    parse_timestamp(raw)
        .map(|dt| dt.format("%d %b %Y").to_string())
        .unwrap_or_else(|| raw.to_string())
}

pub fn format_datetime(raw: &str) -> String {
    parse_timestamp(raw)
        .map(|dt| dt.format("%d %b %Y %H:%M").to_string())
        .unwrap_or_else(|| raw.to_string())
}

pub fn pluralize(count: u64, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn indian_grouping() {
        assert_eq!(format_currency(0.0), "₹0");
        assert_eq!(format_currency(999.0), "₹999");
        assert_eq!(format_currency(1000.0), "₹1,000");
        assert_eq!(format_currency(100000.0), "₹1,00,000");
        assert_eq!(format_currency(1234567.5), "₹12,34,567.5");
        assert_eq!(format_currency(123456789.0), "₹12,34,56,789");
    }

    #[test]
    fn fraction_is_trimmed_to_three_digits() {
        assert_eq!(format_currency(10.25), "₹10.25");
        assert_eq!(format_currency(10.1234), "₹10.123");
        assert_eq!(format_currency(10.0004), "₹10");
        assert_eq!(format_currency(-1500.5), "-₹1,500.5");
    }

    #[test]
    fn megabytes_two_decimals() {
        assert_eq!(format_megabytes(1024 * 1024), "1.00 MB");
        assert_eq!(format_megabytes(2_621_440), "2.50 MB");
    }

    #[test]
    fn timestamps_from_backend() {
        assert_eq!(format_date("2025-03-04T09:15:00.123456"), "04 Mar 2025");
        assert_eq!(format_datetime("2025-03-04T09:15:00+05:30"), "04 Mar 2025 09:15");
        assert_eq!(format_date("yesterday"), "yesterday");
    }

    #[test]
    fn plural_labels() {
        assert_eq!(pluralize(1, "document"), "1 document");
        assert_eq!(pluralize(0, "document"), "0 documents");
        assert_eq!(pluralize(5, "document"), "5 documents");
    }
}
