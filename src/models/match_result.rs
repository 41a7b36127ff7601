// src/models/match_result.rs
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowOutcome {
    /// No target rows share the state, district and shifted congress.
    NoCandidates,
    /// Candidates were scored but the best one fell short of the threshold.
    BelowThreshold,
    Accepted,
}

/// One searched session window for a source row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowAttempt {
    pub offset: i32,
    pub congress: i32,
    pub district_code: i32,
    pub candidate_count: usize,
    pub best_score: Option<f64>,
    /// Row index of the best candidate in the target table.
    pub best_candidate: Option<usize>,
    pub best_candidate_name: Option<String>,
    pub outcome: WindowOutcome,
}

/// Resolution outcome for one source row. Produced once and never updated.
#[derive(Debug, Clone, Serialize)]
pub struct MatchResult<S, P> {
    pub row_index: usize,
    pub source: S,
    /// Target-only fields of the accepted candidate; `None` on failure.
    pub payload: Option<P>,
    /// Best score of the last window that had candidates.
    pub closeness: Option<f64>,
    pub matched_period: Option<String>,
    pub matched_representative: Option<String>,
    pub matched_row: Option<usize>,
    pub failed: bool,
    pub diagnostics: Vec<WindowAttempt>,
}

impl<S, P> MatchResult<S, P> {
    pub fn is_matched(&self) -> bool {
        !self.failed
    }

    /// Offset of the window that produced the accepted match.
    pub fn accepted_offset(&self) -> Option<i32> {
        self.diagnostics
            .iter()
            .find(|a| a.outcome == WindowOutcome::Accepted)
            .map(|a| a.offset)
    }

    /// True when every searched window was empty.
    pub fn had_no_candidates(&self) -> bool {
        self.failed
            && self
                .diagnostics
                .iter()
                .all(|a| a.outcome == WindowOutcome::NoCandidates)
    }
}
