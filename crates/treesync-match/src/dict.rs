//! Embedded matching dictionaries.
//!
//! Name-variant groups, gendered-surname suffix pairs, transliteration
//! rules, and place synonyms are compiled into the binary and assembled once
//! into a [`MatchDictionaries`] value at engine construction. The assembled
//! value is immutable and can be shared across concurrent engine
//! invocations behind an `Arc`.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::normalize::normalize_name;

/// Groups of equivalent given names. Two names are variants iff they land in
/// the same group after normalization. Entries are stored in their source
/// script; lookup keys are normalized.
const NAME_VARIANT_GROUPS: &[&[&str]] = &[
    &["ivan", "john", "johann", "jan", "jean", "иван"],
    &["peter", "pyotr", "petr", "pierre", "piotr", "пётр", "петр"],
    &["maria", "mary", "marie", "marya", "мария"],
    &["alexander", "aleksandr", "alexandr", "oleksandr", "александр"],
    &["mikhail", "michael", "michel", "mykhailo", "михаил"],
    &["nikolai", "nikolay", "nicholas", "mikolaj", "николай"],
    &["ekaterina", "katerina", "catherine", "katherine", "екатерина"],
    &["elizaveta", "elizabeth", "elisabeth", "елизавета"],
    &["anna", "ann", "anne", "hanna", "анна"],
    &["dmitry", "dmitri", "dmitriy", "dmytro", "дмитрий"],
    &["pavel", "paul", "pawel", "павел"],
    &["andrei", "andrey", "andrew", "andrzej", "андрей"],
    &["sergei", "sergey", "serge", "сергей"],
    &["natalia", "natalya", "natalie", "наталья", "наталия"],
    &["olga", "olha", "ольга"],
    &["vasily", "vasiliy", "basil", "wasyl", "василий"],
    &["fyodor", "fedor", "theodore", "фёдор", "федор"],
    &["grigory", "grigoriy", "gregory", "григорий"],
    &["yakov", "jacob", "jakub", "яков"],
    &["evgeny", "evgeniy", "eugene", "yevgeny", "евгений"],
    &["tatiana", "tatyana", "татьяна"],
    &["vladimir", "wladimir", "volodymyr", "владимир"],
];

/// Feminine → masculine surname suffix pairs, longest feminine suffix first.
/// Cyrillic pairs precede their transliterated forms of the same length
/// class so that multi-character matches win.
const SURNAME_SUFFIX_PAIRS: &[(&str, &str)] = &[
    ("цкая", "цкий"),
    ("ская", "ский"),
    ("tskaya", "tskiy"),
    ("skaya", "skiy"),
    ("cka", "cki"),
    ("ska", "ski"),
    ("ова", "ов"),
    ("ева", "ев"),
    ("ина", "ин"),
    ("ына", "ын"),
    ("ova", "ov"),
    ("eva", "ev"),
    ("ina", "in"),
    ("yna", "yn"),
];

/// Surnames whose terminations coincide with a gendered suffix but are not
/// gendered; left unchanged by surname-base reduction. Stored normalized.
const SURNAME_SUFFIX_EXCEPTIONS: &[&str] = &[
    "kalina", "malina", "dolina", "krajina",
    "калина", "малина", "долина",
];

/// Cyrillic → Latin transliteration, multi-character entries first so that
/// longest-match wins. Lowercase only; inputs are normalized before
/// transliteration.
const TRANSLIT_TABLE: &[(&str, &str)] = &[
    ("щ", "shch"),
    ("ж", "zh"),
    ("х", "kh"),
    ("ц", "ts"),
    ("ч", "ch"),
    ("ш", "sh"),
    ("ю", "yu"),
    ("я", "ya"),
    ("а", "a"),
    ("б", "b"),
    ("в", "v"),
    ("г", "g"),
    ("д", "d"),
    ("е", "e"),
    ("з", "z"),
    ("и", "i"),
    ("й", "y"),
    ("к", "k"),
    ("л", "l"),
    ("м", "m"),
    ("н", "n"),
    ("о", "o"),
    ("п", "p"),
    ("р", "r"),
    ("с", "s"),
    ("т", "t"),
    ("у", "u"),
    ("ф", "f"),
    ("ы", "y"),
    ("э", "e"),
    ("ъ", ""),
    ("ь", ""),
];

/// Groups of equivalent place names: translations, transliterations, and
/// historic renamings. Stored normalized; the first entry of each group is
/// the canonical form.
const PLACE_SYNONYM_GROUPS: &[&[&str]] = &[
    &["moscow", "moskva", "москва"],
    &[
        "saint petersburg",
        "st petersburg",
        "petrograd",
        "leningrad",
        "санкт-петербург",
        "петербург",
        "ленинград",
    ],
    &["kyiv", "kiev", "киев", "київ"],
    &["kharkiv", "kharkov", "харьков", "харків"],
    &["odesa", "odessa", "одесса", "одеса"],
    &["lviv", "lvov", "lwow", "lemberg", "львов", "львів"],
    &["vilnius", "vilna", "wilno", "вильнюс", "вильна"],
    &["warsaw", "warszawa", "варшава"],
    &["minsk", "минск"],
    &["russia", "russian federation", "russian empire", "россия"],
    &["ukraine", "украина", "україна"],
    &["belarus", "byelorussia", "беларусь", "белоруссия"],
    &["poland", "polska", "польша"],
    &["lithuania", "lietuva", "литва"],
    &["germany", "deutschland", "германия"],
    &["united states", "usa", "united states of america", "сша"],
];

/// Assembled lookup structures for the fuzzy scorer.
///
/// Built once from the embedded tables; no global state.
#[derive(Debug)]
pub struct MatchDictionaries {
    /// normalized given name → variant group index.
    variant_groups: HashMap<String, usize>,
    /// Feminine → masculine suffix pairs, longest first.
    suffix_pairs: Vec<(String, String)>,
    /// Normalized surnames exempt from suffix reduction.
    suffix_exceptions: HashSet<String>,
    /// Cyrillic → Latin rules, longest source first.
    translit: Vec<(String, String)>,
    /// normalized place component → synonym group index.
    place_groups: HashMap<String, usize>,
}

impl MatchDictionaries {
    pub fn new() -> Self {
        let mut variant_groups = HashMap::new();
        for (index, group) in NAME_VARIANT_GROUPS.iter().enumerate() {
            for name in *group {
                variant_groups.insert(normalize_name(name), index);
            }
        }

        let mut suffix_pairs: Vec<(String, String)> = SURNAME_SUFFIX_PAIRS
            .iter()
            .map(|(f, m)| (normalize_name(f), (*m).to_string()))
            .collect();
        // Longest-first so that e.g. "skaya" wins over "ya"-class suffixes.
        suffix_pairs.sort_by(|a, b| b.0.chars().count().cmp(&a.0.chars().count()));

        let suffix_exceptions = SURNAME_SUFFIX_EXCEPTIONS
            .iter()
            .map(|s| normalize_name(s))
            .collect();

        let mut translit: Vec<(String, String)> = TRANSLIT_TABLE
            .iter()
            .map(|(c, l)| ((*c).to_string(), (*l).to_string()))
            .collect();
        translit.sort_by(|a, b| b.0.chars().count().cmp(&a.0.chars().count()));

        let mut place_groups = HashMap::new();
        for (index, group) in PLACE_SYNONYM_GROUPS.iter().enumerate() {
            for place in *group {
                place_groups.insert(normalize_place_key(place), index);
            }
        }

        Self {
            variant_groups,
            suffix_pairs,
            suffix_exceptions,
            translit,
            place_groups,
        }
    }

    /// Assemble the dictionaries behind an `Arc` for sharing across engines.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Variant group of a normalized given name, if any.
    pub fn variant_group(&self, normalized_name: &str) -> Option<usize> {
        self.variant_groups.get(normalized_name).copied()
    }

    /// Feminine → masculine suffix pairs, longest first.
    pub fn suffix_pairs(&self) -> &[(String, String)] {
        &self.suffix_pairs
    }

    /// Whether a normalized surname is exempt from suffix reduction.
    pub fn is_suffix_exception(&self, normalized_surname: &str) -> bool {
        self.suffix_exceptions.contains(normalized_surname)
    }

    /// Transliteration rules, longest source first.
    pub fn translit_rules(&self) -> &[(String, String)] {
        &self.translit
    }

    /// Synonym group of a normalized place component, if any.
    pub fn place_group(&self, component: &str) -> Option<usize> {
        self.place_groups.get(component).copied()
    }
}

impl Default for MatchDictionaries {
    fn default() -> Self {
        Self::new()
    }
}

/// Key normalization for place synonym lookup: lowercase, diacritics
/// stripped, punctuation collapsed to single spaces.
pub(crate) fn normalize_place_key(s: &str) -> String {
    use unicode_normalization::UnicodeNormalization;
    let lowered: String = s
        .to_lowercase()
        .nfd()
        .filter(|c| !unicode_normalization::char::is_combining_mark(*c))
        .map(|c| if c == '-' || c == '.' { ' ' } else { c })
        .collect();
    lowered.split_whitespace().collect::<Vec<_>>().join(" ")
}
