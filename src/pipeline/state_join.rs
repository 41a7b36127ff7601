// src/pipeline/state_join.rs - Demographics per representative session
use std::collections::HashMap;

use crate::models::demographics::{mean_vector, DemographicVector, StateDemographics, DEMOGRAPHIC_WIDTH};
use crate::models::records::YearRange;
use crate::utils::constants::{DEMOGRAPHICS_CUTOFF_YEAR, DEMOGRAPHIC_ROUNDING_DIGITS};

/// State-year demographics grouped by state, years ascending.
#[derive(Debug, Clone, Default)]
pub struct DemographicsTable {
    by_state: HashMap<String, Vec<StateDemographics>>,
}

impl DemographicsTable {
    pub fn new(rows: Vec<StateDemographics>) -> Self {
        let mut by_state: HashMap<String, Vec<StateDemographics>> = HashMap::new();
        for row in rows {
            by_state.entry(row.location.clone()).or_default().push(row);
        }
        for rows in by_state.values_mut() {
            rows.sort_by_key(|r| r.year);
        }
        Self { by_state }
    }

    pub fn state_count(&self) -> usize {
        self.by_state.len()
    }

    /// Demographics for one state over one session.
    ///
    /// Surveys start in 2008, so sessions ending before then take the earliest
    /// year on file. Later sessions average every year inside the range. An
    /// unknown state, or a session with no survey year inside it, is all `None`.
    /// Callers pass the ideology session's range, never the matched FEC filing period.
    pub fn for_session(&self, state: &str, years: YearRange) -> DemographicVector {
        let rows = match self.by_state.get(state) {
            Some(rows) if !rows.is_empty() => rows,
            _ => return [None; DEMOGRAPHIC_WIDTH],
        };

        if years.end < DEMOGRAPHICS_CUTOFF_YEAR {
            let earliest = rows[0].year;
            return mean_vector(
                rows.iter().take_while(|r| r.year == earliest),
                DEMOGRAPHIC_ROUNDING_DIGITS,
            );
        }

        mean_vector(
            rows.iter().filter(|r| years.contains(r.year)),
            DEMOGRAPHIC_ROUNDING_DIGITS,
        )
    }
}
