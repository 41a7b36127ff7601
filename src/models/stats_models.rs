// src/models/stats_models.rs
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::match_result::MatchResult;
use crate::models::records::MatchKey;

/// Aggregate outcome of one fuse over a source table.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FuseStats {
    pub total_rows: usize,
    pub matched: usize,
    pub failed: usize,
    pub matched_current_session: usize,
    pub matched_prior_session: usize,
    pub matched_next_session: usize,
    pub failed_without_candidates: usize,
    pub rows_missing_name: usize,
    pub avg_matched_closeness: f64,
}

impl FuseStats {
    pub fn from_results<S: MatchKey, P>(results: &[MatchResult<S, P>]) -> Self {
        let mut stats = FuseStats {
            total_rows: results.len(),
            ..Default::default()
        };
        let mut closeness_sum = 0.0;

        for result in results {
            if result.source.representative().is_none() {
                stats.rows_missing_name += 1;
            }
            if result.failed {
                stats.failed += 1;
                if result.had_no_candidates() {
                    stats.failed_without_candidates += 1;
                }
                continue;
            }
            stats.matched += 1;
            closeness_sum += result.closeness.unwrap_or(0.0);
            match result.accepted_offset() {
                Some(0) => stats.matched_current_session += 1,
                Some(-1) => stats.matched_prior_session += 1,
                Some(1) => stats.matched_next_session += 1,
                _ => {}
            }
        }

        if stats.matched > 0 {
            stats.avg_matched_closeness = closeness_sum / stats.matched as f64;
        }
        stats
    }

    pub fn match_rate(&self) -> f64 {
        if self.total_rows == 0 {
            0.0
        } else {
            self.matched as f64 / self.total_rows as f64
        }
    }
}

/// Run-level summary, logged at the end and written next to the failure report.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineStats {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub ideology_rows: usize,
    pub finance_rows: usize,
    pub demographic_rows: usize,
    pub output_rows: usize,
    pub fuse: FuseStats,
    pub load_seconds: f64,
    pub resolve_seconds: f64,
    pub total_seconds: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::match_result::{WindowAttempt, WindowOutcome};

    struct Row(Option<&'static str>);

    impl MatchKey for Row {
        fn representative(&self) -> Option<&str> {
            self.0
        }
        fn congress(&self) -> i32 {
            110
        }
        fn state_name(&self) -> &str {
            "Ohio"
        }
        fn district_code(&self) -> i32 {
            3
        }
    }

    fn result(
        row_index: usize,
        name: Option<&'static str>,
        closeness: Option<f64>,
        outcomes: &[(i32, WindowOutcome)],
    ) -> MatchResult<Row, ()> {
        let failed = !outcomes.iter().any(|(_, o)| *o == WindowOutcome::Accepted);
        MatchResult {
            row_index,
            source: Row(name),
            payload: if failed { None } else { Some(()) },
            closeness,
            matched_period: None,
            matched_representative: None,
            matched_row: None,
            failed,
            diagnostics: outcomes
                .iter()
                .map(|(offset, outcome)| WindowAttempt {
                    offset: *offset,
                    congress: 110 + offset,
                    district_code: 3,
                    candidate_count: 0,
                    best_score: None,
                    best_candidate: None,
                    best_candidate_name: None,
                    outcome: *outcome,
                })
                .collect(),
        }
    }

    #[test]
    fn test_fuse_stats_counts() {
        use WindowOutcome::*;
        let results = vec![
            result(0, Some("A"), Some(100.0), &[(0, Accepted)]),
            result(1, Some("B"), Some(80.0), &[(0, NoCandidates), (-1, Accepted)]),
            result(2, None, Some(20.0), &[(0, BelowThreshold), (-1, NoCandidates), (1, NoCandidates)]),
            result(3, Some("D"), None, &[(0, NoCandidates), (-1, NoCandidates), (1, NoCandidates)]),
        ];

        let stats = FuseStats::from_results(&results);
        assert_eq!(stats.total_rows, 4);
        assert_eq!(stats.matched, 2);
        assert_eq!(stats.failed, 2);
        assert_eq!(stats.matched_current_session, 1);
        assert_eq!(stats.matched_prior_session, 1);
        assert_eq!(stats.matched_next_session, 0);
        assert_eq!(stats.failed_without_candidates, 1);
        assert_eq!(stats.rows_missing_name, 1);
        assert!((stats.avg_matched_closeness - 90.0).abs() < 1e-9);
        assert!((stats.match_rate() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_empty_stats() {
        let stats = FuseStats::from_results::<Row, ()>(&[]);
        assert_eq!(stats.total_rows, 0);
        assert_eq!(stats.match_rate(), 0.0);
    }
}
