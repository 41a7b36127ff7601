// src/models/demographics.rs
/// KFF indicators after header cleaning, poverty table first.
pub const KFF_INDICATORS: [&str; 11] = [
    "poverty_children_0-18",
    "poverty_adults_19-64",
    "poverty_65+",
    "total_poverty",
    "white",
    "black",
    "hispanic",
    "asian",
    "american_indian/alaska_native",
    "native_hawaiian/other_pacific_islander",
    "multiple_races",
];

/// Pew belief and tradition shares, as headed in the exported table.
pub const RELIGION_INDICATORS: [&str; 18] = [
    "Believe in God; absolutely certain",
    "Believe in God; fairly certain",
    "Believe in God; not too/not at all certain",
    "Believe in God; don't know",
    "Do not believe in God",
    "Other/don't know if they believe in God",
    "Buddhist",
    "Catholic",
    "Evangelical Protestant",
    "Hindu",
    "Historically Black Protestant",
    "Jehovah's Witness",
    "Jewish",
    "Mainline Protestant",
    "Mormon",
    "Muslim",
    "Orthodox Christian",
    "Unaffiliated (religious \"nones\")",
];

pub const POPULATION_INDICATOR: &str = "population";

pub const DEMOGRAPHIC_WIDTH: usize = KFF_INDICATORS.len() + RELIGION_INDICATORS.len() + 1;

pub type DemographicVector = [Option<f64>; DEMOGRAPHIC_WIDTH];

pub fn demographic_columns() -> impl Iterator<Item = &'static str> {
    KFF_INDICATORS
        .iter()
        .chain(RELIGION_INDICATORS.iter())
        .copied()
        .chain(std::iter::once(POPULATION_INDICATOR))
}

/// Poverty and race shares for one state in one year. Suppressed cells are 0.
#[derive(Debug, Clone, PartialEq)]
pub struct KffRow {
    pub location: String,
    pub year: i32,
    pub values: [f64; 11],
}

/// Decennial census counts for one area.
#[derive(Debug, Clone, PartialEq)]
pub struct PopulationRow {
    pub area: String,
    pub by_decade: Vec<(i32, f64)>,
}

impl PopulationRow {
    pub fn for_decade(&self, decade: i32) -> Option<f64> {
        self.by_decade
            .iter()
            .find(|(year, _)| *year == decade)
            .map(|(_, value)| *value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReligionRow {
    pub state: String,
    pub values: [Option<f64>; 18],
}

/// KFF row enriched with population and religion, one per state and year.
#[derive(Debug, Clone, PartialEq)]
pub struct StateDemographics {
    pub location: String,
    pub year: i32,
    pub values: DemographicVector,
}

/// Column-wise mean over `rows`, skipping missing cells, rounded to `digits` places.
/// A column with no values stays `None`.
pub fn mean_vector<'a, I>(rows: I, digits: i32) -> DemographicVector
where
    I: IntoIterator<Item = &'a StateDemographics>,
{
    let mut sums = [0.0_f64; DEMOGRAPHIC_WIDTH];
    let mut counts = [0_usize; DEMOGRAPHIC_WIDTH];
    for row in rows {
        for (i, value) in row.values.iter().enumerate() {
            if let Some(v) = value {
                sums[i] += v;
                counts[i] += 1;
            }
        }
    }

    let scale = 10_f64.powi(digits);
    let mut out: DemographicVector = [None; DEMOGRAPHIC_WIDTH];
    for i in 0..DEMOGRAPHIC_WIDTH {
        if counts[i] > 0 {
            let mean = sums[i] / counts[i] as f64;
            out[i] = Some((mean * scale).round() / scale);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(year: i32, first: Option<f64>, last: Option<f64>) -> StateDemographics {
        let mut values: DemographicVector = [None; DEMOGRAPHIC_WIDTH];
        values[0] = first;
        values[DEMOGRAPHIC_WIDTH - 1] = last;
        StateDemographics {
            location: "Ohio".to_string(),
            year,
            values,
        }
    }

    #[test]
    fn test_column_layout() {
        let columns: Vec<&str> = demographic_columns().collect();
        assert_eq!(columns.len(), DEMOGRAPHIC_WIDTH);
        assert_eq!(columns[0], "poverty_children_0-18");
        assert_eq!(columns[11], "Believe in God; absolutely certain");
        assert_eq!(columns[DEMOGRAPHIC_WIDTH - 1], "population");
    }

    #[test]
    fn test_mean_vector_skips_missing_and_rounds() {
        let rows = vec![
            row(2009, Some(0.1), None),
            row(2010, Some(0.2), Some(11_536_504.0)),
            row(2011, Some(0.2), None),
        ];
        let mean = mean_vector(rows.iter(), 3);
        assert_eq!(mean[0], Some(0.167));
        assert_eq!(mean[DEMOGRAPHIC_WIDTH - 1], Some(11_536_504.0));
        assert_eq!(mean[1], None);
    }

    #[test]
    fn test_mean_vector_empty() {
        let mean = mean_vector(std::iter::empty::<&StateDemographics>(), 3);
        assert!(mean.iter().all(Option::is_none));
    }

    #[test]
    fn test_population_for_decade() {
        let pop = PopulationRow {
            area: "Ohio".to_string(),
            by_decade: vec![(2010, 11_536_504.0), (2000, 11_353_140.0)],
        };
        assert_eq!(pop.for_decade(2000), Some(11_353_140.0));
        assert_eq!(pop.for_decade(1990), None);
    }
}
