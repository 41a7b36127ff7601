// src/loaders/kff.rs - KFF state poverty and race tables
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::loaders::{cell, parse_number, LoadError, RawTable, TableLayout};
use crate::models::demographics::{KffRow, KFF_INDICATORS};
use crate::utils::progress_bars::logging::{FusionLogger, PipelinePhase};

/// Download suffix of each yearly export and the year it covers. 2020 was never published.
pub const KFF_FILE_YEARS: [(&str, i32); 14] = [
    ("", 2022),
    (" (1)", 2021),
    (" (2)", 2019),
    (" (3)", 2018),
    (" (4)", 2017),
    (" (5)", 2016),
    (" (6)", 2015),
    (" (7)", 2014),
    (" (8)", 2013),
    (" (9)", 2012),
    (" (10)", 2011),
    (" (11)", 2010),
    (" (12)", 2009),
    (" (13)", 2008),
];

const NATIONAL_ROW: &str = "United States";

const POVERTY_COLUMNS: [&str; 4] = ["Children 0-18", "Adults 19-64", "65+", "Total"];
const RACE_COLUMNS: [&str; 7] = [
    "White",
    "Black",
    "Hispanic",
    "Asian",
    "American Indian/Alaska Native",
    "Native Hawaiian/Other Pacific Islander",
    "Multiple Races",
];

const LAYOUT: TableLayout<'static> = TableLayout {
    header_marker: "Location",
    stop_at_footer: true,
};

/// KFF header as used downstream: snake case, with a `poverty_` prefix on age brackets.
pub fn kff_column_name(header: &str) -> String {
    let snake = header.trim().to_lowercase().replace(' ', "_");
    if snake == "total" {
        "total_poverty".to_string()
    } else if snake.chars().any(|c| c.is_ascii_digit()) {
        format!("poverty_{}", snake)
    } else {
        snake
    }
}

/// Suppressed ("<.01") and unavailable cells count as 0.
fn kff_value(raw: Option<&str>) -> f64 {
    match raw {
        Some(v) if v.contains('<') => 0.0,
        Some(v) => parse_number(v).unwrap_or(0.0),
        None => 0.0,
    }
}

fn export_path(dir: &Path, table: &str, suffix: &str) -> PathBuf {
    dir.join(table).join(format!("raw_data{}.csv", suffix))
}

pub fn load_kff_dir(dir: &Path) -> Result<Vec<KffRow>, LoadError> {
    let logger = FusionLogger::new(PipelinePhase::Loading);
    let mut rows = Vec::new();
    let mut years_read = 0;

    for (suffix, year) in KFF_FILE_YEARS {
        let poverty = export_path(dir, "poverty", suffix);
        let race = export_path(dir, "race", suffix);
        if !poverty.exists() || !race.exists() {
            logger.log_warning(&format!("KFF tables for {} not found under {}", year, dir.display()));
            continue;
        }
        rows.extend(load_kff_year(&poverty, &race, year)?);
        years_read += 1;
    }

    if years_read == 0 {
        return Err(LoadError::NoInputFiles(dir.to_path_buf()));
    }
    logger.log_data_loaded(rows.len(), "KFF state-year");
    Ok(rows)
}

/// Poverty and race for one year, inner-joined on Location, national row dropped.
pub fn load_kff_year(poverty_path: &Path, race_path: &Path, year: i32) -> Result<Vec<KffRow>, LoadError> {
    let poverty = RawTable::read(poverty_path, LAYOUT)?;
    let race = RawTable::read(race_path, LAYOUT)?;

    let poverty_location = poverty.require("Location")?;
    let race_location = race.require("Location")?;
    let poverty_cols = POVERTY_COLUMNS
        .iter()
        .map(|c| poverty.require(c))
        .collect::<Result<Vec<_>, _>>()?;
    let race_cols = RACE_COLUMNS
        .iter()
        .map(|c| race.require(c))
        .collect::<Result<Vec<_>, _>>()?;

    let race_by_location: HashMap<&str, &Vec<String>> = race
        .rows
        .iter()
        .filter_map(|row| cell(row, race_location).map(|loc| (loc, row)))
        .collect();

    let mut rows = Vec::new();
    for poverty_row in &poverty.rows {
        let location = match cell(poverty_row, poverty_location) {
            Some(loc) if loc != NATIONAL_ROW => loc,
            _ => continue,
        };
        let race_row = match race_by_location.get(location) {
            Some(row) => row,
            None => continue,
        };

        let mut values = [0.0; KFF_INDICATORS.len()];
        for (slot, &col) in values.iter_mut().zip(poverty_cols.iter()) {
            *slot = kff_value(cell(poverty_row, col));
        }
        for (slot, &col) in values[POVERTY_COLUMNS.len()..].iter_mut().zip(race_cols.iter()) {
            *slot = kff_value(cell(race_row, col));
        }

        rows.push(KffRow {
            location: location.to_string(),
            year,
            values,
        });
    }
    Ok(rows)
}
