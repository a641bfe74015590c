//! HTTP date parsing and formatting.
//!
//! Accepts the three formats RFC 9110 requires recipients to understand
//! (IMF-fixdate, RFC 850, asctime), the dashed variant common in cookies,
//! and RFC 3339 timestamps.

use chrono::{DateTime, NaiveDateTime, Utc};

// RFC 850 must be tried before the four-digit dashed form.
const NAIVE_FORMATS: &[&str] = &[
    "%A, %d-%b-%y %H:%M:%S GMT",
    "%a, %d-%b-%Y %H:%M:%S GMT",
    "%a %b %e %H:%M:%S %Y",
];

/// Parse a textual date into a UTC timestamp.
pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(value) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Format a timestamp as an IMF-fixdate (`Wed, 09 Jun 2021 10:18:14 GMT`).
pub fn format_http_date(at: &DateTime<Utc>) -> String {
    at.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2021, 6, 9, 10, 18, 14).unwrap()
    }

    #[test]
    fn parses_every_supported_format() {
        let cases = [
            "Wed, 09 Jun 2021 10:18:14 GMT",
            "Wednesday, 09-Jun-21 10:18:14 GMT",
            "Wed Jun  9 10:18:14 2021",
            "Wed, 09-Jun-2021 10:18:14 GMT",
            "2021-06-09T10:18:14Z",
            "2021-06-09T12:18:14+02:00",
        ];
        for case in cases {
            assert_eq!(parse_http_date(case), Some(instant()), "{case}");
        }
    }

    #[test]
    fn rejects_garbage() {
        for case in ["", "   ", "tomorrow", "Wed, 32 Jun 2021 10:18:14 GMT"] {
            assert_eq!(parse_http_date(case), None, "{case}");
        }
    }

    #[test]
    fn formats_imf_fixdate() {
        assert_eq!(format_http_date(&instant()), "Wed, 09 Jun 2021 10:18:14 GMT");
    }
}
