//! Hierarchical place comparison.

use crate::dict::{MatchDictionaries, normalize_place_key};

/// Similarity of two optional place strings in `[0, 1]`.
///
/// Places are split on `,`, `;`, `/` into ordered components (locality
/// first, country last), each component canonicalized through the synonym
/// table. Component agreement is weighted locality 50 / region 30 /
/// country 20, with a +10 bonus when one component list is a subset of the
/// other. Missing rungs mirror the date ladder: both absent 0.50, one
/// absent 0.30.
pub fn place_similarity(a: Option<&str>, b: Option<&str>, dicts: &MatchDictionaries) -> f64 {
    let (a, b) = match (a, b) {
        (Some(a), Some(b)) => (a, b),
        (None, None) => return 0.50,
        _ => return 0.30,
    };

    let ca = components(a, dicts);
    let cb = components(b, dicts);
    if ca.is_empty() || cb.is_empty() {
        return if ca.is_empty() && cb.is_empty() { 0.50 } else { 0.30 };
    }

    let mut points = 0u32;

    // Locality: first component of each.
    if ca[0] == cb[0] {
        points += 50;
    }
    // Country: last component, only meaningful when at least one side has a
    // hierarchy to speak of.
    if (ca.len() >= 2 || cb.len() >= 2) && ca[ca.len() - 1] == cb[cb.len() - 1] {
        points += 20;
    }
    // Region: any agreement between middle components.
    let middle_a = &ca[1..ca.len().saturating_sub(1).max(1)];
    let middle_b = &cb[1..cb.len().saturating_sub(1).max(1)];
    if middle_a.iter().any(|m| middle_b.contains(m)) {
        points += 30;
    }
    // Subset bonus: the shorter list entirely contained in the longer.
    let (short, long) = if ca.len() <= cb.len() { (&ca, &cb) } else { (&cb, &ca) };
    if short.iter().all(|c| long.contains(c)) {
        points += 10;
    }

    f64::from(points.min(100)) / 100.0
}

/// Split a place string into canonicalized components.
fn components(place: &str, dicts: &MatchDictionaries) -> Vec<String> {
    place
        .split([',', ';', '/'])
        .map(normalize_place_key)
        .filter(|c| !c.is_empty())
        .map(|c| canonical(&c, dicts))
        .collect()
}

fn canonical(component: &str, dicts: &MatchDictionaries) -> String {
    match dicts.place_group(component) {
        Some(group) => format!("#{group}"),
        None => component.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sim(a: &str, b: &str) -> f64 {
        let dicts = MatchDictionaries::new();
        place_similarity(Some(a), Some(b), &dicts)
    }

    #[test]
    fn test_missing_rungs() {
        let dicts = MatchDictionaries::new();
        assert_eq!(place_similarity(None, None, &dicts), 0.50);
        assert_eq!(place_similarity(Some("Moscow"), None, &dicts), 0.30);
    }

    #[test]
    fn test_identical_full_hierarchy() {
        assert_eq!(sim("Moscow, Russia", "Moscow, Russia"), 0.80);
    }

    #[test]
    fn test_synonym_canonicalization() {
        // Kiev/Kyiv and Ukraine/Украина collapse to the same groups.
        assert_eq!(sim("Kiev, Ukraine", "Kyiv, Украина"), 0.80);
    }

    #[test]
    fn test_historic_renaming() {
        assert_eq!(sim("Leningrad, Russia", "Saint Petersburg, Russia"), 0.80);
    }

    #[test]
    fn test_subset_of_longer_hierarchy() {
        // Locality matches and the single component is a subset.
        assert_eq!(sim("Moscow", "Moscow, Russia"), 0.60);
    }

    #[test]
    fn test_region_agreement() {
        let score = sim(
            "Tver, Tver Oblast, Russia",
            "Torzhok, Tver Oblast, Russia",
        );
        // Region 30 + country 20, locality differs, no subset.
        assert_eq!(score, 0.50);
    }

    #[test]
    fn test_unrelated_places() {
        assert_eq!(sim("Moscow, Russia", "Warsaw, Poland"), 0.0);
    }

    #[test]
    fn test_symmetry() {
        let dicts = MatchDictionaries::new();
        let a = Some("Moscow");
        let b = Some("Moscow, Russia");
        assert_eq!(
            place_similarity(a, b, &dicts),
            place_similarity(b, a, &dicts)
        );
    }
}
