//! Name normalization, gendered-surname reduction, and transliteration.

use unicode_normalization::UnicodeNormalization;

use crate::dict::MatchDictionaries;

/// Normalize a personal name for comparison: lowercase, strip diacritics,
/// remove hyphens, apostrophes, periods, and internal whitespace.
///
/// Idempotent: applying it twice yields the same string.
pub fn normalize_name(name: &str) -> String {
    name.to_lowercase()
        .nfd()
        .filter(|c| !unicode_normalization::char::is_combining_mark(*c))
        .filter(|c| !matches!(c, '-' | '\'' | '’' | '.') && !c.is_whitespace())
        .collect()
}

/// Reduce a surname to its masculine base form.
///
/// The input is normalized first. Surnames on the exception list are
/// returned unchanged; otherwise the longest matching feminine suffix is
/// replaced by its masculine counterpart. Idempotent: masculine outputs
/// never end in a feminine suffix.
pub fn surname_base(surname: &str, dicts: &MatchDictionaries) -> String {
    let normalized = normalize_name(surname);
    if dicts.is_suffix_exception(&normalized) {
        return normalized;
    }
    for (feminine, masculine) in dicts.suffix_pairs() {
        if let Some(stem) = normalized.strip_suffix(feminine.as_str()) {
            // Do not reduce very short surnames; a bare stem of one or two
            // characters means the "suffix" was most of the name.
            if stem.chars().count() >= 3 {
                return format!("{stem}{masculine}");
            }
        }
    }
    normalized
}

/// Transliterate Cyrillic text to Latin using the longest-match table.
/// Non-Cyrillic characters pass through unchanged. The input should already
/// be normalized.
pub fn to_latin(text: &str, dicts: &MatchDictionaries) -> String {
    let rules = dicts.translit_rules();
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    'outer: while !rest.is_empty() {
        for (source, target) in rules {
            if let Some(tail) = rest.strip_prefix(source.as_str()) {
                out.push_str(target);
                rest = tail;
                continue 'outer;
            }
        }
        let c = rest.chars().next().expect("non-empty rest");
        out.push(c);
        rest = &rest[c.len_utf8()..];
    }
    out
}

/// Normalize a name and bring it to a common (Latin) script for the final
/// string-distance comparison.
pub fn comparable(name: &str, dicts: &MatchDictionaries) -> String {
    to_latin(&normalize_name(name), dicts)
}
