//! GEDCOM date-phrase parsing.

use treesync_core::{DateInfo, DatePrecision, DateQualifier};

/// Parse a GEDCOM date phrase into a [`DateInfo`].
///
/// Handles the common forms:
/// - `15 JAN 1842` (day precision)
/// - `JAN 1842` (month precision)
/// - `1842` (year precision)
/// - qualifiers `ABT`, `CAL`, `EST` (about), `BEF` (before), `AFT` (after)
/// - ranges `BET 1800 AND 1810` (between)
///
/// Returns `None` when no year can be extracted. The original phrase is
/// preserved in `raw`.
pub fn parse_date_phrase(phrase: &str) -> Option<DateInfo> {
    let raw = phrase.trim();
    if raw.is_empty() {
        return None;
    }
    let upper = raw.to_uppercase();

    // BET ... AND ... carries two years.
    if let Some(rest) = upper.strip_prefix("BET ") {
        let mut parts = rest.splitn(2, " AND ");
        let start = parts.next()?.trim();
        let end = parts.next()?.trim();
        let (year, precision, month, day) = parse_date_core(start)?;
        let (year_end, _, _, _) = parse_date_core(end)?;
        return Some(DateInfo {
            precision,
            qualifier: DateQualifier::Between,
            year,
            month,
            day,
            year_end: Some(year_end),
            raw: raw.to_string(),
        });
    }

    let (qualifier, rest) = if let Some(rest) = strip_any(&upper, &["ABT ", "CAL ", "EST "]) {
        (DateQualifier::About, rest)
    } else if let Some(rest) = upper.strip_prefix("BEF ") {
        (DateQualifier::Before, rest)
    } else if let Some(rest) = upper.strip_prefix("AFT ") {
        (DateQualifier::After, rest)
    } else if let Some(rest) = strip_any(&upper, &["FROM ", "TO "]) {
        (DateQualifier::Exact, rest)
    } else {
        (DateQualifier::Exact, upper.as_str())
    };

    let (year, precision, month, day) = parse_date_core(rest.trim())?;
    Some(DateInfo {
        precision,
        qualifier,
        year,
        month,
        day,
        year_end: None,
        raw: raw.to_string(),
    })
}

fn strip_any<'a>(s: &'a str, prefixes: &[&str]) -> Option<&'a str> {
    prefixes.iter().find_map(|p| s.strip_prefix(p))
}

/// Parse `DD MMM YYYY`, `MMM YYYY`, or `YYYY`.
fn parse_date_core(s: &str) -> Option<(i32, DatePrecision, Option<u32>, Option<u32>)> {
    let parts: Vec<&str> = s.split_whitespace().collect();
    match parts.as_slice() {
        [day, month, year] => {
            let day: u32 = day.parse().ok()?;
            let month = month_number(month)?;
            let year: i32 = year.parse().ok()?;
            (1..=31).contains(&day).then_some(())?;
            Some((year, DatePrecision::Day, Some(month), Some(day)))
        }
        [month, year] => {
            let month = month_number(month)?;
            let year: i32 = year.parse().ok()?;
            Some((year, DatePrecision::Month, Some(month), None))
        }
        [year] => {
            let year: i32 = year.parse().ok()?;
            Some((year, DatePrecision::Year, None, None))
        }
        _ => None,
    }
}

fn month_number(s: &str) -> Option<u32> {
    match s {
        "JAN" => Some(1),
        "FEB" => Some(2),
        "MAR" => Some(3),
        "APR" => Some(4),
        "MAY" => Some(5),
        "JUN" => Some(6),
        "JUL" => Some(7),
        "AUG" => Some(8),
        "SEP" => Some(9),
        "OCT" => Some(10),
        "NOV" => Some(11),
        "DEC" => Some(12),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_date() {
        let d = parse_date_phrase("15 JAN 1842").unwrap();
        assert_eq!(d.precision, DatePrecision::Day);
        assert_eq!(d.qualifier, DateQualifier::Exact);
        assert_eq!((d.year, d.month, d.day), (1842, Some(1), Some(15)));
        assert_eq!(d.raw, "15 JAN 1842");
    }

    #[test]
    fn test_month_and_year_precision() {
        let d = parse_date_phrase("JAN 1842").unwrap();
        assert_eq!(d.precision, DatePrecision::Month);
        assert_eq!(d.month, Some(1));
        assert_eq!(d.day, None);

        let d = parse_date_phrase("1842").unwrap();
        assert_eq!(d.precision, DatePrecision::Year);
        assert_eq!(d.month, None);
    }

    #[test]
    fn test_qualifiers() {
        assert_eq!(
            parse_date_phrase("ABT 1850").unwrap().qualifier,
            DateQualifier::About
        );
        assert_eq!(
            parse_date_phrase("EST 1850").unwrap().qualifier,
            DateQualifier::About
        );
        assert_eq!(
            parse_date_phrase("BEF 1900").unwrap().qualifier,
            DateQualifier::Before
        );
        assert_eq!(
            parse_date_phrase("AFT 1900").unwrap().qualifier,
            DateQualifier::After
        );
    }

    #[test]
    fn test_between_range() {
        let d = parse_date_phrase("BET 1800 AND 1810").unwrap();
        assert_eq!(d.qualifier, DateQualifier::Between);
        assert_eq!(d.year, 1800);
        assert_eq!(d.year_end, Some(1810));
    }

    #[test]
    fn test_lowercase_input() {
        let d = parse_date_phrase("abt 15 jan 1842").unwrap();
        assert_eq!(d.qualifier, DateQualifier::About);
        assert_eq!(d.day, Some(15));
        // Raw keeps the original casing.
        assert_eq!(d.raw, "abt 15 jan 1842");
    }

    #[test]
    fn test_unparseable() {
        assert!(parse_date_phrase("").is_none());
        assert!(parse_date_phrase("UNKNOWN").is_none());
        assert!(parse_date_phrase("32 JAN 1842").is_none());
    }
}
