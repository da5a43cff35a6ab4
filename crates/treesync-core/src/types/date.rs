use serde::{Deserialize, Serialize};

use crate::enums::{DatePrecision, DateQualifier};

/// A parsed genealogical date.
///
/// Genealogical sources rarely carry a full calendar date; this type keeps
/// whatever precision the source offered together with the qualifier of the
/// original phrase (`ABT 1850`, `BEF 1900`, `BET 1800 AND 1810`). The
/// original text is preserved for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateInfo {
    pub precision: DatePrecision,
    pub qualifier: DateQualifier,
    pub year: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day: Option<u32>,
    /// Second year of a `Between` range.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year_end: Option<i32>,
    /// Original textual form as it appeared in the source.
    pub raw: String,
}

impl DateInfo {
    /// Construct an exact year-precision date.
    pub fn year(year: i32) -> Self {
        Self {
            precision: DatePrecision::Year,
            qualifier: DateQualifier::Exact,
            year,
            month: None,
            day: None,
            year_end: None,
            raw: year.to_string(),
        }
    }

    /// Construct an exact day-precision date.
    pub fn day(year: i32, month: u32, day: u32) -> Self {
        Self {
            precision: DatePrecision::Day,
            qualifier: DateQualifier::Exact,
            year,
            month: Some(month),
            day: Some(day),
            year_end: None,
            raw: format!("{day} {month} {year}"),
        }
    }

    /// Returns a copy of this date with the given qualifier.
    pub fn with_qualifier(mut self, qualifier: DateQualifier) -> Self {
        self.qualifier = qualifier;
        self
    }
}

impl std::fmt::Display for DateInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_constructor() {
        let d = DateInfo::year(1842);
        assert_eq!(d.precision, DatePrecision::Year);
        assert_eq!(d.qualifier, DateQualifier::Exact);
        assert_eq!(d.year, 1842);
        assert_eq!(d.raw, "1842");
    }

    #[test]
    fn test_day_constructor() {
        let d = DateInfo::day(1842, 1, 15);
        assert_eq!(d.precision, DatePrecision::Day);
        assert_eq!(d.month, Some(1));
        assert_eq!(d.day, Some(15));
    }

    #[test]
    fn test_with_qualifier() {
        let d = DateInfo::year(1850).with_qualifier(DateQualifier::About);
        assert_eq!(d.qualifier, DateQualifier::About);
    }

    #[test]
    fn test_serde_camel_case() {
        let mut d = DateInfo::year(1800);
        d.year_end = Some(1810);
        d.qualifier = DateQualifier::Between;
        let json = serde_json::to_string(&d).unwrap();
        assert!(json.contains(r#""yearEnd":1810"#), "json: {json}");
        assert!(json.contains(r#""qualifier":"Between""#), "json: {json}");
    }
}
