use chrono::NaiveDate;

/// Parse an ISO calendar date: exactly four unsigned year digits, then a
/// one- or two-digit month and day. Signed, short and extended years are
/// rejected, as are datetimes and other separators.
pub fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    let mut parts = value.split('-');
    let (year, month, day) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }

    let year = digits(year, 4, 4)?;
    let month = digits(month, 1, 2)?;
    let day = digits(day, 1, 2)?;

    NaiveDate::from_ymd_opt(year as i32, month, day)
}

fn digits(field: &str, min: usize, max: usize) -> Option<u32> {
    if field.len() < min || field.len() > max || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_four_digit_years() {
        assert_eq!(parse_iso_date("2024-01-10"), NaiveDate::from_ymd_opt(2024, 1, 10));
        assert_eq!(parse_iso_date("0999-12-31"), NaiveDate::from_ymd_opt(999, 12, 31));
        assert_eq!(parse_iso_date("2024-1-5"), NaiveDate::from_ymd_opt(2024, 1, 5));
    }

    #[test]
    fn test_rejects_short_signed_and_extended_years() {
        assert_eq!(parse_iso_date("24-01-10"), None);
        assert_eq!(parse_iso_date("+10000-01-01"), None);
        assert_eq!(parse_iso_date("-0044-03-15"), None);
        assert_eq!(parse_iso_date("+2024-01-10"), None);
        assert_eq!(parse_iso_date("20240-01-10"), None);
    }

    #[test]
    fn test_rejects_other_shapes() {
        assert_eq!(parse_iso_date("2024-02-30"), None);
        assert_eq!(parse_iso_date("2024-001-10"), None);
        assert_eq!(parse_iso_date("2024-01-10-01"), None);
        assert_eq!(parse_iso_date("2024-01-10T00:00:00"), None);
        assert_eq!(parse_iso_date("2024/01/10"), None);
        assert_eq!(parse_iso_date("2024-+1-10"), None);
        assert_eq!(parse_iso_date(""), None);
    }
}
