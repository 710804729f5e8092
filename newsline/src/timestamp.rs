use chrono::NaiveDateTime;
use thiserror::Error;

/// Layout of `posted_ist` values once the timezone label is removed,
/// e.g. "May 10, 2025, 3:45 PM".
pub const TIMESTAMP_FORMAT: &str = "%b %d, %Y, %I:%M %p";

/// Label carried by every timestamp in the feed. It is never applied as an offset.
pub const TIMEZONE_LABEL: &str = " IST";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimestampParseError {
    #[error("timestamp is missing or empty")]
    Missing,

    #[error("timestamp '{raw}' does not match 'Mon D, YYYY, h:mm AM|PM IST': {source}")]
    Malformed {
        raw: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("timestamp '{raw}' has year '{year}', expected four digits")]
    Year { raw: String, year: String },
}

impl TimestampParseError {
    /// The offending input, when there was one.
    pub fn raw(&self) -> Option<&str> {
        match self {
            TimestampParseError::Missing => None,
            TimestampParseError::Malformed { raw, .. } | TimestampParseError::Year { raw, .. } => {
                Some(raw)
            }
        }
    }
}

/// Parse a feed timestamp such as "May 10, 2025, 3:45 PM IST".
///
/// The " IST" marker and surrounding whitespace are stripped before matching,
/// and the result is a naive date-time: IST is only a label.
pub fn parse_posted_at(raw: Option<&str>) -> Result<NaiveDateTime, TimestampParseError> {
    let raw = raw.ok_or(TimestampParseError::Missing)?;
    let cleaned = raw.replace(TIMEZONE_LABEL, "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return Err(TimestampParseError::Missing);
    }

    let parsed = NaiveDateTime::parse_from_str(cleaned, TIMESTAMP_FORMAT).map_err(|source| {
        TimestampParseError::Malformed {
            raw: raw.to_string(),
            source,
        }
    })?;

    // %Y also takes short years ("25" parses as 0025)
    let year = cleaned.split(", ").nth(1).unwrap_or_default();
    if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TimestampParseError::Year {
            raw: raw.to_string(),
            year: year.to_string(),
        });
    }
    Ok(parsed)
}

/// Format an instant back into the feed's layout, hour zero-padded, with the " IST" label.
pub fn format_instant(instant: &NaiveDateTime) -> String {
    format!("{}{}", instant.format(TIMESTAMP_FORMAT), TIMEZONE_LABEL)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};

    #[test]
    fn parses_single_digit_hour() {
        let dt = parse_posted_at(Some("May 10, 2025, 3:45 PM IST")).expect("parse");
        assert_eq!(dt.date(), NaiveDate::from_ymd_opt(2025, 5, 10).unwrap());
        assert_eq!(dt.hour(), 15);
        assert_eq!(dt.minute(), 45);
    }

    #[test]
    fn label_is_not_an_offset() {
        let dt = parse_posted_at(Some("May 10, 2025, 2:00 PM IST")).expect("parse");
        assert_eq!(dt.hour(), 14);
    }

    #[test]
    fn label_is_optional_and_whitespace_is_trimmed() {
        let with = parse_posted_at(Some("  May 10, 2025, 11:05 AM IST  ")).expect("with label");
        let without = parse_posted_at(Some("May 10, 2025, 11:05 AM")).expect("without label");
        assert_eq!(with, without);
    }

    #[test]
    fn zero_padded_values_round_trip() {
        for raw in [
            "May 10, 2025, 02:00 PM IST",
            "Jan 01, 2024, 12:00 AM IST",
            "Dec 31, 2023, 11:59 PM IST",
        ] {
            let dt = parse_posted_at(Some(raw)).expect(raw);
            assert_eq!(format_instant(&dt), raw);
        }
    }

    #[test]
    fn formatting_pads_the_hour() {
        let dt = parse_posted_at(Some("May 10, 2025, 2:00 PM IST")).expect("parse");
        assert_eq!(format_instant(&dt), "May 10, 2025, 02:00 PM IST");
    }

    #[test]
    fn missing_and_empty_are_reported_as_missing() {
        assert_eq!(parse_posted_at(None), Err(TimestampParseError::Missing));
        assert_eq!(parse_posted_at(Some("")), Err(TimestampParseError::Missing));
        assert_eq!(parse_posted_at(Some("   ")), Err(TimestampParseError::Missing));
        assert_eq!(parse_posted_at(Some(" IST")), Err(TimestampParseError::Missing));
    }

    #[test]
    fn rejects_values_outside_the_pattern() {
        for raw in [
            "Mai 10, 2025, 2:00 PM IST",
            "May 32, 2025, 2:00 PM IST",
            "Feb 30, 2025, 2:00 PM IST",
            "May 10, 2025, 13:00 PM IST",
            "May 10, 2025, 0:30 AM IST",
            "May 10, 2025, 2:00 IST",
            "2025-05-10T14:00:00",
            "May 10, 2025, 2:00 PM IST extra",
            "May 10, 25, 2:00 PM IST",
            "May 10, 02025, 2:00 PM IST",
        ] {
            match parse_posted_at(Some(raw)) {
                Err(err) => assert_eq!(err.raw(), Some(raw)),
                Ok(dt) => panic!("expected {raw:?} to be rejected, got {dt}"),
            }
        }
    }

    #[test]
    fn short_year_is_not_read_as_an_ancient_date() {
        assert_eq!(
            parse_posted_at(Some("May 10, 25, 2:00 PM IST")),
            Err(TimestampParseError::Year {
                raw: "May 10, 25, 2:00 PM IST".to_string(),
                year: "25".to_string(),
            })
        );
    }
}
