//! Fuzzy scoring of (source person, destination person) pairs.
//!
//! Purely per-pair; the scorer has no knowledge of the mapping set. The
//! score is a weighted sum over six fields (first name 30, last name 25,
//! birth date 20, birth place 15, death date 5, gender 5), returned with a
//! structured breakdown for explainability. Fields recorded on neither side
//! are excluded and the remaining weights renormalized, so sparse records
//! are not penalized for data nobody recorded.

use std::sync::Arc;

use serde::Serialize;
use strsim::jaro_winkler;
use treesync_core::Person;

use crate::dates::date_similarity;
use crate::dict::MatchDictionaries;
use crate::normalize::{comparable, normalize_name, surname_base};
use crate::places::place_similarity;

const WEIGHT_FIRST_NAME: f64 = 30.0;
const WEIGHT_LAST_NAME: f64 = 25.0;
const WEIGHT_BIRTH_DATE: f64 = 20.0;
const WEIGHT_BIRTH_PLACE: f64 = 15.0;
const WEIGHT_DEATH_DATE: f64 = 5.0;
const WEIGHT_GENDER: f64 = 5.0;

/// Similarity of one side's field against an absent counterpart.
const ONE_SIDED_PENALTY: f64 = 0.30;

/// One field's contribution to a fuzzy score.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreComponent {
    pub field: &'static str,
    pub weighted_points: f64,
    pub detail: String,
}

/// A fuzzy score with its per-field breakdown.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonScore {
    /// Integer score in `[0, 100]`.
    pub score: u8,
    pub breakdown: Vec<ScoreComponent>,
}

/// Scores person pairs against the embedded dictionaries.
#[derive(Debug, Clone)]
pub struct PersonScorer {
    dicts: Arc<MatchDictionaries>,
}

impl PersonScorer {
    pub fn new(dicts: Arc<MatchDictionaries>) -> Self {
        Self { dicts }
    }

    pub fn dictionaries(&self) -> &Arc<MatchDictionaries> {
        &self.dicts
    }

    /// Score a pair of persons. Symmetric: `score(a, b) == score(b, a)`.
    pub fn score(&self, a: &Person, b: &Person) -> PersonScore {
        let mut breakdown = Vec::with_capacity(6);
        let mut earned = 0.0;
        let mut possible = 0.0;

        let fields: [(&'static str, f64, Option<f64>, String); 6] = [
            (
                "firstName",
                WEIGHT_FIRST_NAME,
                self.name_field(a.first_name.as_deref(), b.first_name.as_deref()),
                text_detail(a.first_name.as_deref(), b.first_name.as_deref()),
            ),
            (
                "lastName",
                WEIGHT_LAST_NAME,
                self.surname_field(effective_surname(a), effective_surname(b)),
                text_detail(effective_surname(a), effective_surname(b)),
            ),
            (
                "birthDate",
                WEIGHT_BIRTH_DATE,
                date_field(a.birth_date.as_ref(), b.birth_date.as_ref()),
                date_detail(a.birth_date.as_ref(), b.birth_date.as_ref()),
            ),
            (
                "birthPlace",
                WEIGHT_BIRTH_PLACE,
                self.place_field(a.birth_place.as_deref(), b.birth_place.as_deref()),
                text_detail(a.birth_place.as_deref(), b.birth_place.as_deref()),
            ),
            (
                "deathDate",
                WEIGHT_DEATH_DATE,
                date_field(a.death_date.as_ref(), b.death_date.as_ref()),
                date_detail(a.death_date.as_ref(), b.death_date.as_ref()),
            ),
            (
                "gender",
                WEIGHT_GENDER,
                Some(if a.gender.compatible_with(b.gender) { 1.0 } else { 0.0 }),
                format!("{} vs {}", a.gender, b.gender),
            ),
        ];

        for (field, weight, similarity, detail) in fields {
            match similarity {
                Some(sim) => {
                    let weighted = weight * sim;
                    earned += weighted;
                    possible += weight;
                    breakdown.push(ScoreComponent {
                        field,
                        weighted_points: weighted,
                        detail,
                    });
                }
                None => breakdown.push(ScoreComponent {
                    field,
                    weighted_points: 0.0,
                    detail: "absent on both sides".to_string(),
                }),
            }
        }

        let score = if possible > 0.0 {
            (earned / possible * 100.0).round().clamp(0.0, 100.0) as u8
        } else {
            0
        };
        PersonScore { score, breakdown }
    }

    /// Name-only score in `[0, 100]`: the first- and last-name components of
    /// the full scorer, renormalized to percent. Used by the family-context
    /// child scoring rule.
    pub fn name_score_percent(&self, a: &Person, b: &Person) -> f64 {
        let first = self
            .name_field(a.first_name.as_deref(), b.first_name.as_deref())
            .unwrap_or(0.5);
        let last = self
            .surname_field(effective_surname(a), effective_surname(b))
            .unwrap_or(0.5);
        (WEIGHT_FIRST_NAME * first + WEIGHT_LAST_NAME * last)
            / (WEIGHT_FIRST_NAME + WEIGHT_LAST_NAME)
            * 100.0
    }

    fn name_field(&self, a: Option<&str>, b: Option<&str>) -> Option<f64> {
        match (a, b) {
            (Some(a), Some(b)) => Some(self.given_name_similarity(a, b)),
            (None, None) => None,
            _ => Some(ONE_SIDED_PENALTY),
        }
    }

    fn surname_field(&self, a: Option<&str>, b: Option<&str>) -> Option<f64> {
        match (a, b) {
            (Some(a), Some(b)) => {
                let base_a = surname_base(a, &self.dicts);
                let base_b = surname_base(b, &self.dicts);
                Some(self.given_name_similarity(&base_a, &base_b))
            }
            (None, None) => None,
            _ => Some(ONE_SIDED_PENALTY),
        }
    }

    fn place_field(&self, a: Option<&str>, b: Option<&str>) -> Option<f64> {
        match (a, b) {
            (Some(_), Some(_)) => Some(place_similarity(a, b, &self.dicts)),
            (None, None) => None,
            _ => Some(ONE_SIDED_PENALTY),
        }
    }

    /// Similarity ladder for given names: normalized equality 1.0, known
    /// variants 0.95, transliterated equality 0.90, else Jaro–Winkler on the
    /// script-normalized forms.
    fn given_name_similarity(&self, a: &str, b: &str) -> f64 {
        let na = normalize_name(a);
        let nb = normalize_name(b);
        if na == nb {
            return 1.0;
        }
        if let (Some(ga), Some(gb)) = (
            self.dicts.variant_group(&na),
            self.dicts.variant_group(&nb),
        ) && ga == gb
        {
            return 0.95;
        }
        let la = comparable(a, &self.dicts);
        let lb = comparable(b, &self.dicts);
        if la == lb {
            return 0.90;
        }
        jaro_winkler(&la, &lb)
    }
}

fn date_field(
    a: Option<&treesync_core::DateInfo>,
    b: Option<&treesync_core::DateInfo>,
) -> Option<f64> {
    match (a, b) {
        (Some(_), Some(_)) => Some(date_similarity(a, b)),
        (None, None) => None,
        _ => Some(ONE_SIDED_PENALTY),
    }
}

/// The surname used for comparison: the recorded last name, or the maiden
/// name when no last name survives.
fn effective_surname(p: &Person) -> Option<&str> {
    p.last_name.as_deref().or(p.maiden_name.as_deref())
}

fn text_detail(a: Option<&str>, b: Option<&str>) -> String {
    format!("{} vs {}", a.unwrap_or("-"), b.unwrap_or("-"))
}

fn date_detail(a: Option<&treesync_core::DateInfo>, b: Option<&treesync_core::DateInfo>) -> String {
    format!(
        "{} vs {}",
        a.map_or("-".to_string(), ToString::to_string),
        b.map_or("-".to_string(), ToString::to_string)
    )
}
