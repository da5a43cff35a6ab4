//! The wave engine: breadth-first propagation of mappings from the anchor.
//!
//! The engine owns all mutable state of a run (queue, processed set, mapping
//! set, statistics, traces); trees are read-only throughout. FIFO ordering
//! guarantees that every level-k person is processed before any level-k+1
//! person, which keeps the adaptive thresholds monotone in the amount of
//! structural evidence available.

use std::collections::{BTreeMap, BTreeSet, HashSet, VecDeque};
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tracing::{debug, info};
use treesync_core::{Family, Tree, TreeSyncError};

use crate::dict::MatchDictionaries;
use crate::family::best_family_match;
use crate::member::{FamilyOrientation, ProposedMapping, propose_members};
use crate::result::{
    AggregateStats, AnchorPair, CompareOptions, FamilyMatchTrace, FoundVia, LevelStats,
    MappingSet, PersonMapping, WaveCompareResult,
};
use crate::score::PersonScorer;
use crate::validate;

/// Orchestrates wave comparisons. Cheap to clone per invocation; the
/// dictionaries are shared.
#[derive(Debug, Clone)]
pub struct WaveEngine {
    options: CompareOptions,
    dicts: Arc<MatchDictionaries>,
}

impl WaveEngine {
    /// Create an engine with freshly assembled dictionaries.
    pub fn new(options: CompareOptions) -> Self {
        Self::with_dictionaries(options, MatchDictionaries::shared())
    }

    /// Create an engine sharing pre-assembled dictionaries.
    pub fn with_dictionaries(options: CompareOptions, dicts: Arc<MatchDictionaries>) -> Self {
        Self { options, dicts }
    }

    /// Run the wave comparison between two trees.
    ///
    /// # Errors
    ///
    /// Fails with [`TreeSyncError::AnchorMissing`] when either anchor id is
    /// absent from its tree. Matching failures never error; they are
    /// reported through the result.
    pub fn compare(
        &self,
        source_tree: &Tree,
        destination_tree: &Tree,
        anchor_source_id: &str,
        anchor_destination_id: &str,
    ) -> Result<WaveCompareResult, TreeSyncError> {
        if source_tree.person(anchor_source_id).is_none() {
            return Err(TreeSyncError::AnchorMissing {
                side: "source",
                id: anchor_source_id.to_string(),
            });
        }
        if destination_tree.person(anchor_destination_id).is_none() {
            return Err(TreeSyncError::AnchorMissing {
                side: "destination",
                id: anchor_destination_id.to_string(),
            });
        }

        let run = WaveRun {
            source: source_tree,
            destination: destination_tree,
            options: self.options,
            scorer: PersonScorer::new(Arc::clone(&self.dicts)),
            queue: VecDeque::new(),
            processed: HashSet::new(),
            mappings: MappingSet::new(),
            stats: BTreeMap::new(),
            traces: Vec::new(),
        };
        Ok(run.run(anchor_source_id, anchor_destination_id))
    }
}

/// Convenience wrapper building a one-shot engine.
pub fn compare(
    source_tree: &Tree,
    destination_tree: &Tree,
    anchor_source_id: &str,
    anchor_destination_id: &str,
    options: CompareOptions,
) -> Result<WaveCompareResult, TreeSyncError> {
    WaveEngine::new(options).compare(
        source_tree,
        destination_tree,
        anchor_source_id,
        anchor_destination_id,
    )
}

/// Mutable state of a single comparison run.
struct WaveRun<'t> {
    source: &'t Tree,
    destination: &'t Tree,
    options: CompareOptions,
    scorer: PersonScorer,
    queue: VecDeque<(String, u32)>,
    processed: HashSet<String>,
    mappings: MappingSet,
    stats: BTreeMap<u32, LevelStats>,
    traces: Vec<FamilyMatchTrace>,
}

impl<'t> WaveRun<'t> {
    fn run(mut self, anchor_source_id: &str, anchor_destination_id: &str) -> WaveCompareResult {
        let started = Instant::now();
        let compared_at = Utc::now();

        // The anchor is asserted by the caller; it enters unvalidated.
        self.mappings.insert(PersonMapping {
            source_id: anchor_source_id.to_string(),
            destination_id: anchor_destination_id.to_string(),
            match_score: 100,
            level: 0,
            found_via: FoundVia::Anchor,
            found_in_family_id: None,
            found_from_person_id: None,
            found_at: Utc::now(),
        });
        self.stats.entry(0).or_default().level = 0;
        self.stats.entry(0).or_default().new_mappings = 1;
        self.enqueue(anchor_source_id, 0);

        while let Some((source_id, level)) = self.queue.pop_front() {
            if level >= self.options.max_level {
                continue;
            }
            let level_started = Instant::now();
            {
                let entry = self.stats.entry(level).or_default();
                entry.level = level;
                entry.persons_processed += 1;
            }

            let destination_id = self
                .mappings
                .destination_of(&source_id)
                .map(str::to_string);

            let source = self.source;
            for family in source.families_as_spouse(&source_id) {
                self.process_family(
                    family,
                    FamilyOrientation::AsSpouse,
                    &source_id,
                    destination_id.as_deref(),
                    level,
                );
            }
            for family in source.families_as_child(&source_id) {
                self.process_family(
                    family,
                    FamilyOrientation::AsChild,
                    &source_id,
                    destination_id.as_deref(),
                    level,
                );
            }

            let entry = self.stats.entry(level).or_default();
            entry.duration_ms += level_started.elapsed().as_secs_f64() * 1000.0;
        }

        self.finish(
            anchor_source_id,
            anchor_destination_id,
            compared_at,
            started,
        )
    }

    /// Match one source family against destination candidates and absorb the
    /// accepted member proposals.
    fn process_family(
        &mut self,
        source_family: &'t Family,
        orientation: FamilyOrientation,
        source_id: &str,
        destination_id: Option<&str>,
        level: u32,
    ) {
        let destination = self.destination;
        let candidates: Vec<&'t Family> = match destination_id {
            Some(dst) => match orientation {
                FamilyOrientation::AsSpouse => destination.families_as_spouse(dst),
                FamilyOrientation::AsChild => destination.families_as_child(dst),
            },
            // Unmapped-exploration: infer candidates from destination
            // families of already-mapped relatives.
            None => self.infer_candidates(source_family, orientation, source_id),
        };
        if candidates.is_empty() {
            return;
        }

        {
            let entry = self.stats.entry(level).or_default();
            entry.level = level;
            entry.families_processed += 1;
        }

        let (outcome, candidate_traces) = best_family_match(
            source_family,
            &candidates,
            &self.mappings,
            self.source,
            self.destination,
            &self.scorer,
        );
        self.traces.push(FamilyMatchTrace {
            level,
            source_person_id: source_id.to_string(),
            source_family_id: source_family.id.clone(),
            chosen_destination_family_id: outcome.as_ref().map(|o| o.family.id.clone()),
            candidates: candidate_traces,
        });
        let Some(outcome) = outcome else {
            return;
        };

        let proposals = propose_members(
            source_family,
            outcome.family,
            orientation,
            &self.mappings,
            self.source,
            self.destination,
            &self.scorer,
            self.options.threshold_strategy,
            self.options.base_threshold,
            source_id,
        );

        for proposal in proposals {
            self.commit(proposal, level);
        }

        // Structural expansion through members that stayed unmatched: their
        // own sub-trees may still correspond even though they themselves
        // found no counterpart. This lets the wave jump over one unmatched
        // relative sandwiched between matched ones.
        for member_id in family_members(source_family) {
            if !self.mappings.contains_source(member_id) {
                self.enqueue(member_id, level + 1);
            }
        }
    }

    /// Validate a proposal and, on acceptance, insert and enqueue it.
    fn commit(&mut self, proposal: ProposedMapping, level: u32) {
        if self.mappings.contains_source(&proposal.source_id) {
            return;
        }
        let verdict = validate::check(&proposal, &self.mappings, self.source, self.destination);
        self.mappings.extend_issues(verdict.issues);
        if !verdict.accepted {
            return;
        }

        debug!(
            source = %proposal.source_id,
            destination = %proposal.destination_id,
            score = proposal.match_score,
            via = ?proposal.found_via,
            level = level + 1,
            "mapping accepted"
        );
        let source_id = proposal.source_id.clone();
        self.mappings.insert(PersonMapping {
            source_id: proposal.source_id,
            destination_id: proposal.destination_id,
            match_score: proposal.match_score,
            level: level + 1,
            found_via: proposal.found_via,
            found_in_family_id: Some(proposal.found_in_family_id),
            found_from_person_id: Some(proposal.found_from_person_id),
            found_at: Utc::now(),
        });
        let entry = self.stats.entry(level).or_default();
        entry.new_mappings += 1;
        self.enqueue(&source_id, level + 1);
    }

    /// Candidate destination families for a family of an unmapped person,
    /// in id order. Two sources of evidence: destination families of
    /// already-mapped members of the family itself, and families of the
    /// person's *conjectured images*, destination persons occupying the
    /// same structural slot relative to the person's mapped relatives. The
    /// second path is how the wave jumps over a single unmatched relative
    /// sandwiched between matched ones.
    fn infer_candidates(
        &self,
        source_family: &Family,
        orientation: FamilyOrientation,
        person_id: &str,
    ) -> Vec<&'t Family> {
        let mut ids: BTreeSet<String> = BTreeSet::new();

        // Mapped members of the family itself.
        for spouse in [
            source_family.husband_id.as_deref(),
            source_family.wife_id.as_deref(),
        ]
        .into_iter()
        .flatten()
        {
            if let Some(image) = self.mappings.destination_of(spouse) {
                for family in self.destination.families_as_spouse(image) {
                    ids.insert(family.id.clone());
                }
            }
        }
        for child in &source_family.children_ids {
            if child == person_id {
                continue;
            }
            if let Some(image) = self.mappings.destination_of(child) {
                for family in self.destination.families_as_child(image) {
                    ids.insert(family.id.clone());
                }
            }
        }

        // Families of the person's conjectured images.
        for image in self.conjectured_images(person_id) {
            let families = match orientation {
                FamilyOrientation::AsSpouse => self.destination.families_as_spouse(&image),
                FamilyOrientation::AsChild => self.destination.families_as_child(&image),
            };
            for family in families {
                ids.insert(family.id.clone());
            }
        }

        ids.iter()
            .filter_map(|id| self.destination.family(id))
            .collect()
    }

    /// Destination persons that occupy the same structural slot as an
    /// unmapped source person, derived from its mapped relatives: children
    /// of the mapped parents' destination families, co-spouses and children
    /// of the mapped spouse's or mapped child's destination families.
    fn conjectured_images(&self, person_id: &str) -> BTreeSet<String> {
        let mut images = BTreeSet::new();

        for family in self.source.families_as_child(person_id) {
            for parent in [family.husband_id.as_deref(), family.wife_id.as_deref()]
                .into_iter()
                .flatten()
            {
                if let Some(image) = self.mappings.destination_of(parent) {
                    for dst_family in self.destination.families_as_spouse(image) {
                        for child in &dst_family.children_ids {
                            if !self.mappings.targets_destination(child) {
                                images.insert(child.clone());
                            }
                        }
                    }
                }
            }
        }

        for family in self.source.families_as_spouse(person_id) {
            if let Some(other) = family.other_spouse(person_id)
                && let Some(image) = self.mappings.destination_of(other)
            {
                for dst_family in self.destination.families_as_spouse(image) {
                    for spouse in [
                        dst_family.husband_id.as_deref(),
                        dst_family.wife_id.as_deref(),
                    ]
                    .into_iter()
                    .flatten()
                    {
                        if spouse != image && !self.mappings.targets_destination(spouse) {
                            images.insert(spouse.to_string());
                        }
                    }
                }
            }
            for child in &family.children_ids {
                if let Some(image) = self.mappings.destination_of(child) {
                    for dst_family in self.destination.families_as_child(image) {
                        for spouse in [
                            dst_family.husband_id.as_deref(),
                            dst_family.wife_id.as_deref(),
                        ]
                        .into_iter()
                        .flatten()
                        {
                            if !self.mappings.targets_destination(spouse) {
                                images.insert(spouse.to_string());
                            }
                        }
                    }
                }
            }
        }

        images
    }

    fn enqueue(&mut self, person_id: &str, level: u32) {
        if self.processed.insert(person_id.to_string()) {
            self.queue.push_back((person_id.to_string(), level));
        }
    }

    fn finish(
        self,
        anchor_source_id: &str,
        anchor_destination_id: &str,
        compared_at: chrono::DateTime<Utc>,
        started: Instant,
    ) -> WaveCompareResult {
        let mut validation_issues: Vec<_> = self.source.issues().to_vec();
        validation_issues.extend_from_slice(self.destination.issues());

        let unmatched_source: Vec<String> = self
            .source
            .persons()
            .filter(|p| !self.mappings.contains_source(&p.id))
            .map(|p| p.id.clone())
            .collect();
        let unmatched_destination: Vec<String> = self
            .destination
            .persons()
            .filter(|p| !self.mappings.targets_destination(&p.id))
            .map(|p| p.id.clone())
            .collect();

        let statistics_by_level: Vec<LevelStats> = self.stats.into_values().collect();
        let statistics = AggregateStats {
            source_persons: self.source.person_count() as u32,
            destination_persons: self.destination.person_count() as u32,
            persons_processed: statistics_by_level.iter().map(|s| s.persons_processed).sum(),
            families_processed: statistics_by_level
                .iter()
                .map(|s| s.families_processed)
                .sum(),
            total_mappings: self.mappings.len() as u32,
            max_level_reached: self
                .mappings
                .iter()
                .map(|m| m.level)
                .max()
                .unwrap_or(0),
            duration_ms: started.elapsed().as_secs_f64() * 1000.0,
        };

        info!(
            mappings = statistics.total_mappings,
            unmatched_source = unmatched_source.len(),
            unmatched_destination = unmatched_destination.len(),
            levels = statistics.max_level_reached,
            "wave comparison finished"
        );

        let (mappings, mapping_issues) = self.mappings.into_parts();
        validation_issues.extend(mapping_issues);

        WaveCompareResult {
            source_file: "source".to_string(),
            destination_file: "destination".to_string(),
            compared_at,
            anchors: vec![AnchorPair {
                source_id: anchor_source_id.to_string(),
                destination_id: anchor_destination_id.to_string(),
            }],
            options: self.options,
            mappings,
            unmatched_source,
            unmatched_destination,
            validation_issues,
            statistics_by_level,
            statistics,
            detailed_log: self.traces,
        }
    }
}

/// Every member of a family: spouses then children, in record order.
fn family_members(family: &Family) -> impl Iterator<Item = &str> {
    family
        .husband_id
        .as_deref()
        .into_iter()
        .chain(family.wife_id.as_deref())
        .chain(family.children_ids.iter().map(String::as_str))
}
