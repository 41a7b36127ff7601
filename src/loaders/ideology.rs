// src/loaders/ideology.rs - VoteView House member ideology export
use std::path::Path;

use crate::loaders::{cell, parse_int, parse_number, LoadError, RawTable, TableLayout};
use crate::models::records::{IdeologyRecord, YearRange};
use crate::utils::constants::{FIRST_CONGRESS, LAST_CONGRESS};
use crate::utils::progress_bars::logging::{FusionLogger, PipelinePhase};
use crate::utils::states::{is_non_voting_territory, state_name_for_abbrev};

pub const IDEOLOGY_FILE: &str = "member_ideology_house_all_years.csv";

#[derive(Debug, Default, Clone, PartialEq)]
pub struct IdeologyDrops {
    pub other_chamber: usize,
    pub out_of_range: usize,
    pub territory: usize,
    pub unknown_state: usize,
    pub bad_keys: usize,
    pub missing_nominate: usize,
}

/// House members of congresses 101 through 116 in voting states, with a first-dimension score.
pub fn load_ideology(path: &Path) -> Result<Vec<IdeologyRecord>, LoadError> {
    let (records, drops) = load_ideology_with_drops(path)?;

    let logger = FusionLogger::new(PipelinePhase::Loading);
    logger.log_rows_dropped(drops.other_chamber, "not House");
    logger.log_rows_dropped(drops.out_of_range, "outside congresses 101-116");
    logger.log_rows_dropped(drops.territory, "non-voting delegations");
    logger.log_rows_dropped(drops.missing_nominate, "no nominate_dim1");
    logger.log_data_quality_issue("unknown state abbreviations", drops.unknown_state);
    logger.log_data_quality_issue("unparseable congress or district", drops.bad_keys);
    logger.log_data_loaded(records.len(), "VoteView member");

    Ok(records)
}

pub fn load_ideology_with_drops(path: &Path) -> Result<(Vec<IdeologyRecord>, IdeologyDrops), LoadError> {
    let table = RawTable::read(
        path,
        TableLayout {
            header_marker: "bioname",
            stop_at_footer: false,
        },
    )?;

    let congress_col = table.require("congress")?;
    let chamber_col = table.require("chamber")?;
    let district_col = table.require("district_code")?;
    let abbrev_col = table.require("state_abbrev")?;
    let name_col = table.require("bioname")?;
    let dim1_col = table.require("nominate_dim1")?;
    let dim2_col = table.find_column("nominate_dim2");
    let votes_col = table.find_column("nominate_number_of_votes");
    let party_col = table.find_column("party_code");
    let icpsr_col = table.find_column("icpsr");
    let bioguide_col = table.find_column("bioguide_id");
    let born_col = table.find_column("born");
    let died_col = table.find_column("died");

    let mut drops = IdeologyDrops::default();
    let mut records = Vec::new();

    for row in &table.rows {
        if cell(row, chamber_col) != Some("House") {
            drops.other_chamber += 1;
            continue;
        }

        let (congress, district_code) = match (
            cell(row, congress_col).and_then(parse_int),
            cell(row, district_col).and_then(parse_int),
        ) {
            (Some(c), Some(d)) => (c, d),
            _ => {
                drops.bad_keys += 1;
                continue;
            }
        };
        if !(FIRST_CONGRESS..=LAST_CONGRESS).contains(&congress) {
            drops.out_of_range += 1;
            continue;
        }

        let state_abbrev = cell(row, abbrev_col).unwrap_or("");
        let state_name = match state_name_for_abbrev(state_abbrev) {
            Some(name) => name,
            None => {
                drops.unknown_state += 1;
                continue;
            }
        };
        if is_non_voting_territory(state_name) {
            drops.territory += 1;
            continue;
        }

        let nominate_dim1 = match cell(row, dim1_col).and_then(parse_number) {
            Some(v) => v,
            None => {
                drops.missing_nominate += 1;
                continue;
            }
        };

        let year_range = YearRange::for_congress(congress);
        let born = optional_number(row, born_col).map(|v| v as i32);
        let died = optional_number(row, died_col).map(|v| v as i32);
        let age = born.map(|b| match died {
            Some(d) => d - b,
            None => year_range.start - b,
        });

        records.push(IdeologyRecord {
            representative: cell(row, name_col).unwrap_or("").to_string(),
            congress,
            state_name: state_name.to_string(),
            state_abbrev: state_abbrev.to_uppercase(),
            district_code,
            year_range,
            party_code: optional_number(row, party_col).map(|v| v as i32),
            icpsr: optional_number(row, icpsr_col).map(|v| v as i64),
            bioguide_id: bioguide_col.and_then(|c| cell(row, c)).map(str::to_string),
            born,
            age,
            nominate_dim1,
            nominate_dim2: optional_number(row, dim2_col),
            nominate_number_of_votes: optional_number(row, votes_col).unwrap_or(0.0),
        });
    }

    Ok((records, drops))
}

fn optional_number(row: &[String], col: Option<usize>) -> Option<f64> {
    col.and_then(|c| cell(row, c)).and_then(parse_number)
}
