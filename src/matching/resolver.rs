// src/matching/resolver.rs - Per-row entity resolution across adjacent sessions
use log::debug;
use std::borrow::Cow;

use crate::matching::similarity::{FuzzyNameScorer, NameScorer};
use crate::matching::window::{scan_window, CandidateIndex};
use crate::models::match_result::{MatchResult, WindowAttempt, WindowOutcome};
use crate::models::records::{MatchKey, TargetRecord};
use crate::utils::constants::{MATCH_ACCEPTANCE_THRESHOLD, WINDOW_OFFSETS};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatcherConfig {
    /// Scores at or above this are accepted.
    pub acceptance_threshold: f64,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            acceptance_threshold: MATCH_ACCEPTANCE_THRESHOLD,
        }
    }
}

/// Resolves one source row against a target table.
///
/// Windows are searched current session first, then the prior and next sessions.
/// The first window whose best candidate clears the threshold wins and later
/// windows are not searched. Ties within a window keep the earliest row.
#[derive(Debug, Clone)]
pub struct RecordMatcher<Sc = FuzzyNameScorer> {
    config: MatcherConfig,
    scorer: Sc,
}

impl RecordMatcher<FuzzyNameScorer> {
    pub fn new(config: MatcherConfig) -> Self {
        Self::with_scorer(config, FuzzyNameScorer)
    }
}

impl Default for RecordMatcher<FuzzyNameScorer> {
    fn default() -> Self {
        Self::new(MatcherConfig::default())
    }
}

impl<Sc: NameScorer> RecordMatcher<Sc> {
    pub fn with_scorer(config: MatcherConfig, scorer: Sc) -> Self {
        Self { config, scorer }
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// Resolve by scanning `targets` for each window.
    pub fn resolve<S, T>(&self, row_index: usize, source: &S, targets: &[T]) -> MatchResult<S, T::Payload>
    where
        S: MatchKey + Clone,
        T: TargetRecord,
    {
        self.resolve_with(row_index, source, targets, |offset| {
            Cow::Owned(scan_window(targets, source, offset))
        })
    }

    /// Resolve using a prebuilt index over `targets`.
    pub fn resolve_indexed<S, T>(
        &self,
        row_index: usize,
        source: &S,
        targets: &[T],
        index: &CandidateIndex,
    ) -> MatchResult<S, T::Payload>
    where
        S: MatchKey + Clone,
        T: TargetRecord,
    {
        self.resolve_with(row_index, source, targets, |offset| {
            Cow::Borrowed(index.window(source, offset))
        })
    }

    fn resolve_with<'w, S, T, F>(
        &self,
        row_index: usize,
        source: &S,
        targets: &[T],
        mut window: F,
    ) -> MatchResult<S, T::Payload>
    where
        S: MatchKey + Clone,
        T: TargetRecord,
        F: FnMut(i32) -> Cow<'w, [usize]>,
    {
        let source_name = source.representative().unwrap_or("");
        let mut closeness = None;
        let mut diagnostics = Vec::with_capacity(WINDOW_OFFSETS.len());

        for offset in WINDOW_OFFSETS {
            let congress = source.congress() + offset;
            let candidates = window(offset);

            let mut best: Option<(usize, f64)> = None;
            for (idx, target) in candidates.iter().filter_map(|&i| targets.get(i).map(|t| (i, t))) {
                let score = self.scorer.score(source_name, target.representative());
                match best {
                    Some((_, best_score)) if score <= best_score => {}
                    _ => best = Some((idx, score)),
                }
            }

            let (best_idx, best_score) = match best {
                Some(b) => b,
                None => {
                    debug!(
                        "[RESOLVE] 🔗 row {}: no candidates for '{}' in congress {} ({} district {})",
                        row_index,
                        source_name,
                        congress,
                        source.state_name(),
                        source.district_code()
                    );
                    diagnostics.push(WindowAttempt {
                        offset,
                        congress,
                        district_code: source.district_code(),
                        candidate_count: 0,
                        best_score: None,
                        best_candidate: None,
                        best_candidate_name: None,
                        outcome: WindowOutcome::NoCandidates,
                    });
                    continue;
                }
            };

            let best_target = &targets[best_idx];
            let best_name = best_target.representative().map(str::to_string);
            closeness = Some(best_score);

            if best_score >= self.config.acceptance_threshold {
                diagnostics.push(WindowAttempt {
                    offset,
                    congress,
                    district_code: source.district_code(),
                    candidate_count: candidates.len(),
                    best_score: Some(best_score),
                    best_candidate: Some(best_idx),
                    best_candidate_name: best_name.clone(),
                    outcome: WindowOutcome::Accepted,
                });
                return MatchResult {
                    row_index,
                    source: source.clone(),
                    payload: Some(best_target.payload()),
                    closeness,
                    matched_period: Some(best_target.period_label()),
                    matched_representative: best_name,
                    matched_row: Some(best_idx),
                    failed: false,
                    diagnostics,
                };
            }

            debug!(
                "[RESOLVE] 🔗 row {}: closest to '{}' in congress {} is '{}' at {:.2}, below {:.1}",
                row_index,
                source_name,
                congress,
                best_name.as_deref().unwrap_or(""),
                best_score,
                self.config.acceptance_threshold
            );
            diagnostics.push(WindowAttempt {
                offset,
                congress,
                district_code: source.district_code(),
                candidate_count: candidates.len(),
                best_score: Some(best_score),
                best_candidate: Some(best_idx),
                best_candidate_name: best_name,
                outcome: WindowOutcome::BelowThreshold,
            });
        }

        debug!(
            "[RESOLVE] 🔗 row {}: '{}' unresolved after {} windows",
            row_index,
            source_name,
            diagnostics.len()
        );
        MatchResult {
            row_index,
            source: source.clone(),
            payload: None,
            closeness,
            matched_period: None,
            matched_representative: None,
            matched_row: None,
            failed: true,
            diagnostics,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::fixtures::{finance, ideology};
    use crate::models::records::FinanceRecord;

    /// Gives every present candidate the same score.
    struct FixedScorer(f64);

    impl NameScorer for FixedScorer {
        fn score(&self, _source: &str, candidate: Option<&str>) -> f64 {
            candidate.map(|_| self.0).unwrap_or(0.0)
        }
    }

    fn outcomes<S, P>(result: &MatchResult<S, P>) -> Vec<(i32, WindowOutcome)> {
        result.diagnostics.iter().map(|a| (a.offset, a.outcome)).collect()
    }

    #[test]
    fn test_end_to_end_smith() {
        let source = ideology("Smith, John A.", 110, "Ohio", 3);
        let targets = vec![finance("SMITH, JOHN A", 110, "Ohio", 3, 50000.0)];

        let result = RecordMatcher::default().resolve(0, &source, &targets);
        assert!(!result.failed);
        let payload = result.payload.as_ref().unwrap();
        assert_eq!(payload.receipts, 50000.0);
        assert!((result.closeness.unwrap() - 100.0).abs() < 1e-9);
        assert_eq!(result.matched_period.as_deref(), Some("2007-2009"));
        assert_eq!(result.matched_representative.as_deref(), Some("SMITH, JOHN A"));
        assert_eq!(result.matched_row, Some(0));
        assert_eq!(outcomes(&result), vec![(0, WindowOutcome::Accepted)]);
        assert_eq!(result.source, source);
    }

    #[test]
    fn test_window_precedence_uses_next_session() {
        let source = ideology("Smith, John A.", 110, "Ohio", 3);
        let targets = vec![
            finance("SMITH, JOHN A", 111, "Ohio", 3, 7.0),
            finance("SMITH, JOHN A", 110, "Ohio", 4, 1.0),
            finance("SMITH, JOHN A", 110, "Iowa", 3, 2.0),
        ];

        let result = RecordMatcher::default().resolve(0, &source, &targets);
        assert!(!result.failed);
        assert_eq!(result.payload.as_ref().unwrap().receipts, 7.0);
        assert_eq!(result.matched_period.as_deref(), Some("2009-2011"));
        assert_eq!(
            outcomes(&result),
            vec![
                (0, WindowOutcome::NoCandidates),
                (-1, WindowOutcome::NoCandidates),
                (1, WindowOutcome::Accepted),
            ]
        );
    }

    #[test]
    fn test_empty_current_window_falls_back_to_prior() {
        let source = ideology("PELOSI, Nancy", 110, "California", 8);
        let targets = vec![
            finance("PELOSI, NANCY", 109, "California", 8, 3.0),
            finance("PELOSI, NANCY", 111, "California", 8, 4.0),
        ];

        let result = RecordMatcher::default().resolve(0, &source, &targets);
        assert_eq!(result.payload.as_ref().unwrap().receipts, 3.0);
        assert_eq!(result.matched_period.as_deref(), Some("2005-2007"));
        assert_eq!(
            outcomes(&result),
            vec![(0, WindowOutcome::NoCandidates), (-1, WindowOutcome::Accepted)]
        );
    }

    #[test]
    fn test_accepted_window_stops_search() {
        let source = ideology("Ryan, Paul", 110, "Wisconsin", 1);
        let targets = vec![
            finance("RYAN, PAUL D", 110, "Wisconsin", 1, 1.0),
            finance("RYAN, PAUL", 109, "Wisconsin", 1, 2.0),
            finance("RYAN, PAUL", 111, "Wisconsin", 1, 3.0),
        ];

        let result = RecordMatcher::default().resolve(0, &source, &targets);
        assert_eq!(result.payload.as_ref().unwrap().receipts, 1.0);
        assert_eq!(result.diagnostics.len(), 1);
    }

    #[test]
    fn test_fallback_exhaustion_marks_failure() {
        let source = ideology("Smith, John", 110, "Ohio", 3);
        let targets = vec![
            finance("DOE, JANE", 110, "Ohio", 3, 1.0),
            finance("SMITH, JOHN", 110, "Ohio", 5, 2.0),
            finance("WILSON, CHARLES", 111, "Ohio", 3, 3.0),
        ];

        let result = RecordMatcher::default().resolve(4, &source, &targets);
        assert!(result.failed);
        assert!(result.payload.is_none());
        assert!(result.matched_period.is_none());
        assert!(result.matched_representative.is_none());
        assert_eq!(result.row_index, 4);
        assert_eq!(result.source, source);
        assert_eq!(
            outcomes(&result),
            vec![
                (0, WindowOutcome::BelowThreshold),
                (-1, WindowOutcome::NoCandidates),
                (1, WindowOutcome::BelowThreshold),
            ]
        );
        // Closeness reflects the last window that had candidates
        let last = result.diagnostics[2].best_score.unwrap();
        assert_eq!(result.closeness, Some(last));
        assert_eq!(result.diagnostics[0].best_candidate_name.as_deref(), Some("DOE, JANE"));
    }

    #[test]
    fn test_threshold_boundary_is_inclusive() {
        let source = ideology("Anyone", 110, "Ohio", 3);
        let targets = vec![finance("SOMEONE", 110, "Ohio", 3, 1.0)];

        let at = RecordMatcher::with_scorer(MatcherConfig::default(), FixedScorer(69.0));
        let result = at.resolve(0, &source, &targets);
        assert!(!result.failed);
        assert_eq!(result.closeness, Some(69.0));

        let below = RecordMatcher::with_scorer(MatcherConfig::default(), FixedScorer(68.99));
        let result = below.resolve(0, &source, &targets);
        assert!(result.failed);
        assert_eq!(result.closeness, Some(68.99));
    }

    #[test]
    fn test_shaw_pair_is_accepted() {
        let source = ideology("SHAW, Eugene Clay, Jr.", 104, "Florida", 22);
        let targets = vec![finance("SHAW, E CLAY JR", 104, "Florida", 22, 12.0)];

        let result = RecordMatcher::default().resolve(0, &source, &targets);
        assert!(!result.failed);
        assert!(result.closeness.unwrap() >= MATCH_ACCEPTANCE_THRESHOLD);
    }

    #[test]
    fn test_ties_keep_first_row() {
        let source = ideology("Smith, John A.", 110, "Ohio", 3);
        let targets = vec![
            finance("DOE, JANE", 110, "Ohio", 3, 0.0),
            finance("SMITH, JOHN A", 110, "Ohio", 3, 1.0),
            finance("SMITH, JOHN A", 110, "Ohio", 3, 2.0),
        ];

        let result = RecordMatcher::default().resolve(0, &source, &targets);
        assert_eq!(result.matched_row, Some(1));
        assert_eq!(result.payload.as_ref().unwrap().receipts, 1.0);
        assert_eq!(result.diagnostics[0].candidate_count, 3);
    }

    #[test]
    fn test_missing_candidate_names_score_zero() {
        let source = ideology("Smith, John", 110, "Ohio", 3);
        let targets = vec![finance("", 110, "Ohio", 3, 1.0)];

        let result = RecordMatcher::default().resolve(0, &source, &targets);
        assert!(result.failed);
        assert_eq!(result.closeness, Some(0.0));
        assert!(result.diagnostics[0].best_candidate_name.is_none());
    }

    #[test]
    fn test_custom_threshold() {
        let source = ideology("GARCIA, Robert", 110, "Texas", 29);
        let targets = vec![finance("GARCIA, SYLVIA", 110, "Texas", 29, 1.0)];

        // Same surname, different person: scores just over the default threshold
        assert!(!RecordMatcher::default().resolve(0, &source, &targets).failed);

        let strict = RecordMatcher::new(MatcherConfig {
            acceptance_threshold: 80.0,
        });
        assert!(strict.resolve(0, &source, &targets).failed);
    }

    #[test]
    fn test_indexed_and_scan_agree() {
        let sources = vec![
            ideology("Smith, John A.", 110, "Ohio", 3),
            ideology("Doe, Jane", 110, "Ohio", 3),
            ideology("Ryan, Paul", 112, "Wisconsin", 1),
        ];
        let targets: Vec<FinanceRecord> = vec![
            finance("SMITH, JOHN A", 110, "Ohio", 3, 1.0),
            finance("DOE, JANE", 109, "Ohio", 3, 2.0),
            finance("RYAN, PAUL D", 113, "Wisconsin", 1, 3.0),
        ];
        let index = CandidateIndex::build(&targets);
        let matcher = RecordMatcher::default();

        for (i, source) in sources.iter().enumerate() {
            let scanned = matcher.resolve(i, source, &targets);
            let indexed = matcher.resolve_indexed(i, source, &targets, &index);
            assert_eq!(scanned.failed, indexed.failed);
            assert_eq!(scanned.payload, indexed.payload);
            assert_eq!(scanned.closeness, indexed.closeness);
            assert_eq!(scanned.diagnostics, indexed.diagnostics);
        }
    }
}
