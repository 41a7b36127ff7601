// src/loaders/population.rs - Census resident population by decade
use std::path::Path;

use crate::loaders::{cell, parse_number, LoadError, RawTable, TableLayout};
use crate::models::demographics::PopulationRow;

pub const POPULATION_FILE: &str = "population-change-data-table.csv";

pub const CENSUS_DECADES: [i32; 6] = [2020, 2010, 2000, 1990, 1980, 1970];

fn census_column(decade: i32) -> String {
    format!("Resident Population {} Census", decade)
}

/// Resident population per area for every decade column present in the table.
pub fn load_population(path: &Path) -> Result<Vec<PopulationRow>, LoadError> {
    let table = RawTable::read(
        path,
        TableLayout {
            header_marker: &census_column(CENSUS_DECADES[0]),
            stop_at_footer: true,
        },
    )?;

    // The area column is unlabeled in the published table
    let area_col = table.find_column("Area").unwrap_or(0);
    let decade_cols: Vec<(i32, usize)> = CENSUS_DECADES
        .iter()
        .filter_map(|&decade| table.find_column(&census_column(decade)).map(|c| (decade, c)))
        .collect();

    let rows = table
        .rows
        .iter()
        .filter_map(|row| {
            let area = cell(row, area_col)?;
            let by_decade = decade_cols
                .iter()
                .filter_map(|&(decade, col)| cell(row, col).and_then(parse_number).map(|v| (decade, v)))
                .collect();
            Some(PopulationRow {
                area: area.to_string(),
                by_decade,
            })
        })
        .collect();

    Ok(rows)
}
