// src/matching/window.rs - Candidate windows by state, district and congress
use std::collections::HashMap;

use crate::models::records::MatchKey;

type WindowKey = (String, i32, i32);

/// Target row indices grouped by (state, district, congress), each group in table order.
#[derive(Debug, Clone, Default)]
pub struct CandidateIndex {
    windows: HashMap<WindowKey, Vec<usize>>,
}

impl CandidateIndex {
    pub fn build<T: MatchKey>(targets: &[T]) -> Self {
        let mut windows: HashMap<WindowKey, Vec<usize>> = HashMap::new();
        for (i, target) in targets.iter().enumerate() {
            windows
                .entry((
                    target.state_name().to_string(),
                    target.district_code(),
                    target.congress(),
                ))
                .or_default()
                .push(i);
        }
        Self { windows }
    }

    /// Rows sharing the source's state and district, `offset` sessions away.
    pub fn window<S: MatchKey>(&self, source: &S, offset: i32) -> &[usize] {
        let key = (
            source.state_name().to_string(),
            source.district_code(),
            source.congress() + offset,
        );
        self.windows.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn window_count(&self) -> usize {
        self.windows.len()
    }
}

/// Linear-scan form of [`CandidateIndex::window`], for one-off lookups without an index.
pub fn scan_window<S: MatchKey, T: MatchKey>(targets: &[T], source: &S, offset: i32) -> Vec<usize> {
    let congress = source.congress() + offset;
    targets
        .iter()
        .enumerate()
        .filter(|(_, t)| {
            t.state_name() == source.state_name()
                && t.district_code() == source.district_code()
                && t.congress() == congress
        })
        .map(|(i, _)| i)
        .collect()
}
