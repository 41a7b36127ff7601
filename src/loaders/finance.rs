// src/loaders/finance.rs - FEC two-year candidate summary exports
use std::path::{Path, PathBuf};

use crate::loaders::{cell, parse_int, parse_number, LoadError, RawTable, TableLayout};
use crate::models::records::{FinanceRecord, YearRange};
use crate::utils::constants::NO_PARTY_AFFILIATION;
use crate::utils::progress_bars::logging::{FusionLogger, PipelinePhase};
use crate::utils::states::{is_non_voting_territory, state_name_for_abbrev};

pub const FIRST_FILING_YEAR: i32 = 1990;
pub const LAST_FILING_YEAR: i32 = 2020;

/// Seats whose FEC district disagrees with VoteView after redistricting:
/// (cycle, candidate as filed, district VoteView uses).
const DISTRICT_CORRECTIONS: [(&str, &str, i32); 7] = [
    ("2011-2013", "BARBER, RONALD", 8),
    ("2011-2013", "HOCHUL, KATHLEEN COURTNEY", 26),
    ("2001-2003", "HOUGHTON, AMORY", 31),
    ("2017-2019", "LAMB, CONOR", 18),
    ("2001-2003", "TAYLOR, GARY EUGENE (GENE)", 5),
    ("2001-2003", "LATOURETTE, STEVEN C", 19),
    ("1991-1993", "LEVIN, SANDER", 17),
];

const MONEY_COLUMNS: [&str; 7] = [
    "Receipts",
    "Contributions from Individuals",
    "Contributions from PACs and Other Committees",
    "Contributions and Loans from the Candidate",
    "Disbursements",
    "Cash On Hand",
    "Debts",
];

pub fn filing_path(dir: &Path, year: i32) -> PathBuf {
    dir.join(format!("ConCand4_{}_24m.csv", year))
}

/// Every even filing year present under `dir`, oldest first. Missing years are skipped with a warning.
pub fn load_finance_dir(dir: &Path) -> Result<Vec<FinanceRecord>, LoadError> {
    let logger = FusionLogger::new(PipelinePhase::Loading);
    let mut records = Vec::new();
    let mut files_read = 0;

    for year in (FIRST_FILING_YEAR..=LAST_FILING_YEAR).step_by(2) {
        let path = filing_path(dir, year);
        if !path.exists() {
            logger.log_warning(&format!("FEC summary for {} not found at {}", year, path.display()));
            continue;
        }
        let year_records = load_finance_file(&path, year)?;
        logger.log_debug(&format!("{}: {} candidate rows", path.display(), year_records.len()));
        records.extend(year_records);
        files_read += 1;
    }

    if files_read == 0 {
        return Err(LoadError::NoInputFiles(dir.to_path_buf()));
    }
    logger.log_data_loaded(records.len(), "FEC candidate");
    Ok(records)
}

/// One cycle's summary. `year` is the election year in the file name.
pub fn load_finance_file(path: &Path, year: i32) -> Result<Vec<FinanceRecord>, LoadError> {
    let table = RawTable::read(
        path,
        TableLayout {
            header_marker: "Candidate",
            stop_at_footer: false,
        },
    )?;

    let state_col = table.require("State")?;
    let district_col = table.require("District")?;
    let name_col = table.require("Candidate")?;
    let party_col = table.require("Party")?;
    let running_col = table.require("Incumbent/Challenger/Open")?;
    let money_cols = MONEY_COLUMNS
        .iter()
        .map(|name| table.require(name))
        .collect::<Result<Vec<_>, _>>()?;

    let year_range = YearRange::for_filing_year(year);
    let cycle = year_range.to_string();
    let congress = year_range.congress();
    let mut records = Vec::new();

    for row in &table.rows {
        let (name, district) = match (cell(row, name_col), cell(row, district_col).and_then(parse_int)) {
            (Some(n), Some(d)) => (n, d),
            _ => continue,
        };

        let raw_state = cell(row, state_col).unwrap_or("");
        let state_name = match state_name_for_abbrev(raw_state) {
            Some(full) if raw_state.len() == 2 => full.to_string(),
            _ => raw_state.to_string(),
        };
        if state_name.is_empty() || is_non_voting_territory(&state_name) {
            continue;
        }

        // At-large seats are filed as district 00
        let mut district_code = if district == 0 { 1 } else { district };
        if let Some((_, _, corrected)) = DISTRICT_CORRECTIONS
            .iter()
            .find(|(c, n, _)| *c == cycle && *n == name)
        {
            district_code = *corrected;
        }

        let money: Vec<f64> = money_cols
            .iter()
            .map(|&c| cell(row, c).and_then(parse_number).unwrap_or(0.0))
            .collect();

        records.push(FinanceRecord {
            representative: name.to_string(),
            congress,
            state_name,
            district_code,
            year_range,
            party: cell(row, party_col).unwrap_or(NO_PARTY_AFFILIATION).to_string(),
            running_as: cell(row, running_col).unwrap_or("").to_string(),
            receipts: money[0],
            contributions_from_individuals: money[1],
            contributions_from_pacs: money[2],
            contributions_and_loans_from_candidate: money[3],
            disbursements: money[4],
            cash_on_hand: money[5],
            debts: money[6],
        });
    }

    Ok(records)
}
