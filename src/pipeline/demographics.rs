// src/pipeline/demographics.rs - State-year demographic aggregation
use std::collections::{HashMap, HashSet};

use crate::models::demographics::{
    DemographicVector, KffRow, PopulationRow, ReligionRow, StateDemographics, DEMOGRAPHIC_WIDTH,
    KFF_INDICATORS, RELIGION_INDICATORS,
};
use crate::utils::progress_bars::logging::FusionLogger;
use crate::utils::states::closest_known;

/// Census decade a survey year falls under: 2019 -> 2010.
pub fn decennial_year(year: i32) -> i32 {
    year.div_euclid(10) * 10
}

/// Attach decennial population and religion shares to every KFF row.
///
/// Locations missing from the population or religion tables keep `None` in those
/// columns; each is reported once with the closest name on file.
pub fn aggregate_state_demographics(
    kff: &[KffRow],
    population: &[PopulationRow],
    religion: &[ReligionRow],
    logger: &FusionLogger,
) -> Vec<StateDemographics> {
    let population_by_area: HashMap<&str, &PopulationRow> =
        population.iter().map(|p| (p.area.as_str(), p)).collect();
    let religion_by_state: HashMap<&str, &ReligionRow> =
        religion.iter().map(|r| (r.state.as_str(), r)).collect();

    let mut reported: HashSet<(&'static str, String)> = HashSet::new();

    let mut rows = Vec::with_capacity(kff.len());
    for row in kff {
        let mut values: DemographicVector = [None; DEMOGRAPHIC_WIDTH];
        for (slot, value) in values.iter_mut().zip(row.values.iter()) {
            *slot = Some(*value);
        }

        match religion_by_state.get(row.location.as_str()) {
            Some(religion_row) => {
                values[KFF_INDICATORS.len()..KFF_INDICATORS.len() + RELIGION_INDICATORS.len()]
                    .copy_from_slice(&religion_row.values);
            }
            None => report_unknown(&mut reported, logger, "religion", &row.location, &religion_by_state),
        }

        match population_by_area.get(row.location.as_str()) {
            Some(pop) => values[DEMOGRAPHIC_WIDTH - 1] = pop.for_decade(decennial_year(row.year)),
            None => report_unknown(&mut reported, logger, "population", &row.location, &population_by_area),
        }

        rows.push(StateDemographics {
            location: row.location.clone(),
            year: row.year,
            values,
        });
    }
    rows
}

fn report_unknown<V>(
    reported: &mut HashSet<(&'static str, String)>,
    logger: &FusionLogger,
    table: &'static str,
    location: &str,
    known: &HashMap<&str, V>,
) {
    if !reported.insert((table, location.to_string())) {
        return;
    }
    let hint = closest_known(location, known.keys().copied())
        .map(|(name, score)| format!(" (closest: '{}', {:.2})", name, score))
        .unwrap_or_default();
    logger.log_warning(&format!("'{}' not found in {} table{}", location, table, hint));
}
