//! Date similarity ladder.

use treesync_core::{DateInfo, DateQualifier};

/// Similarity of two optional dates in `[0, 1]`.
///
/// The neutral rungs: both dates absent scores 0.50, exactly one absent
/// scores 0.30. With both present the score comes from the year-distance
/// ladder, raised by qualifier-aware overrides (`Between` bracketing,
/// satisfied `Before`/`After`, `About` tolerance).
pub fn date_similarity(a: Option<&DateInfo>, b: Option<&DateInfo>) -> f64 {
    let (a, b) = match (a, b) {
        (Some(a), Some(b)) => (a, b),
        (None, None) => return 0.50,
        _ => return 0.30,
    };

    let delta = (a.year - b.year).unsigned_abs();
    let mut score = year_ladder(a, b, delta);

    // Between[start, end] bracketing the other side's year.
    if brackets(a, b.year) || brackets(b, a.year) {
        score = score.max(0.90);
    }
    // Satisfied open-ended qualifiers.
    if open_end_satisfied(a, b.year) || open_end_satisfied(b, a.year) {
        score = score.max(0.85);
    }
    // "About" dates tolerate small year drift.
    if a.qualifier == DateQualifier::About || b.qualifier == DateQualifier::About {
        if delta <= 2 {
            score = score.max(0.85);
        } else if delta <= 5 {
            score = score.max(0.70);
        }
    }

    score
}

fn year_ladder(a: &DateInfo, b: &DateInfo, delta: u32) -> f64 {
    if a.year == b.year {
        return match (a.month, b.month, a.day, b.day) {
            (Some(ma), Some(mb), Some(da), Some(db)) if ma == mb && da == db => 1.00,
            (Some(ma), Some(mb), _, _) if ma == mb => 0.95,
            _ => 0.92,
        };
    }
    match delta {
        1 => 0.88,
        2 => 0.78,
        3 => 0.68,
        4 => 0.58,
        5 => 0.48,
        6..=7 => 0.35,
        8..=10 => 0.20,
        11..=15 => 0.10,
        _ => 0.0,
    }
}

fn brackets(date: &DateInfo, year: i32) -> bool {
    date.qualifier == DateQualifier::Between
        && date
            .year_end
            .is_some_and(|end| date.year <= year && year <= end)
}

fn open_end_satisfied(date: &DateInfo, other_year: i32) -> bool {
    match date.qualifier {
        DateQualifier::Before => other_year < date.year,
        DateQualifier::After => other_year > date.year,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use treesync_core::DateQualifier;

    #[test]
    fn test_missing_rungs() {
        assert_eq!(date_similarity(None, None), 0.50);
        let d = DateInfo::year(1900);
        assert_eq!(date_similarity(Some(&d), None), 0.30);
        assert_eq!(date_similarity(None, Some(&d)), 0.30);
    }

    #[test]
    fn test_exact_and_partial_matches() {
        let a = DateInfo::day(1900, 5, 12);
        let b = DateInfo::day(1900, 5, 12);
        assert_eq!(date_similarity(Some(&a), Some(&b)), 1.00);

        let c = DateInfo::day(1900, 5, 20);
        assert_eq!(date_similarity(Some(&a), Some(&c)), 0.95);

        let d = DateInfo::day(1900, 7, 12);
        assert_eq!(date_similarity(Some(&a), Some(&d)), 0.92);

        let y = DateInfo::year(1900);
        assert_eq!(date_similarity(Some(&a), Some(&y)), 0.92);
    }

    #[test]
    fn test_year_distance_ladder() {
        let base = DateInfo::year(1900);
        let expectations = [
            (1901, 0.88),
            (1902, 0.78),
            (1903, 0.68),
            (1904, 0.58),
            (1905, 0.48),
            (1907, 0.35),
            (1910, 0.20),
            (1915, 0.10),
            (1916, 0.0),
        ];
        for (year, expected) in expectations {
            let other = DateInfo::year(year);
            assert_eq!(
                date_similarity(Some(&base), Some(&other)),
                expected,
                "year {year}"
            );
        }
    }

    #[test]
    fn test_about_raises_small_drift() {
        let about = DateInfo::year(1900).with_qualifier(DateQualifier::About);
        let near = DateInfo::year(1902);
        assert_eq!(date_similarity(Some(&about), Some(&near)), 0.85);

        let farther = DateInfo::year(1904);
        assert_eq!(date_similarity(Some(&about), Some(&farther)), 0.70);

        let far = DateInfo::year(1910);
        assert_eq!(date_similarity(Some(&about), Some(&far)), 0.20);
    }

    #[test]
    fn test_between_brackets() {
        let mut range = DateInfo::year(1800).with_qualifier(DateQualifier::Between);
        range.year_end = Some(1810);
        let inside = DateInfo::year(1805);
        assert_eq!(date_similarity(Some(&range), Some(&inside)), 0.90);
        let outside = DateInfo::year(1830);
        assert_eq!(date_similarity(Some(&range), Some(&outside)), 0.0);
    }

    #[test]
    fn test_before_after() {
        let before = DateInfo::year(1900).with_qualifier(DateQualifier::Before);
        let earlier = DateInfo::year(1890);
        assert_eq!(date_similarity(Some(&before), Some(&earlier)), 0.85);

        let after = DateInfo::year(1900).with_qualifier(DateQualifier::After);
        let later = DateInfo::year(1890);
        // "after 1900" vs 1890 is not satisfied; plain ladder applies.
        assert_eq!(date_similarity(Some(&after), Some(&later)), 0.20);
    }

    #[test]
    fn test_symmetry() {
        let a = DateInfo::year(1900).with_qualifier(DateQualifier::About);
        let b = DateInfo::day(1903, 2, 1);
        assert_eq!(
            date_similarity(Some(&a), Some(&b)),
            date_similarity(Some(&b), Some(&a))
        );
    }
}
