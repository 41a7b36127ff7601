// src/loaders/religion.rs - Pew religious landscape shares by state
use std::path::Path;

use crate::loaders::{cell, parse_percent, LoadError, RawTable, TableLayout};
use crate::models::demographics::{ReligionRow, RELIGION_INDICATORS};

pub const RELIGION_FILE: &str = "religions_by_state.csv";

pub fn load_religion(path: &Path) -> Result<Vec<ReligionRow>, LoadError> {
    let table = RawTable::read(
        path,
        TableLayout {
            header_marker: "State",
            stop_at_footer: true,
        },
    )?;

    let state_col = table.require("State")?;
    let indicator_cols = RELIGION_INDICATORS
        .iter()
        .map(|c| table.require(c))
        .collect::<Result<Vec<_>, _>>()?;

    let rows = table
        .rows
        .iter()
        .filter_map(|row| {
            let state = cell(row, state_col)?;
            let mut values = [None; RELIGION_INDICATORS.len()];
            for (slot, &col) in values.iter_mut().zip(indicator_cols.iter()) {
                *slot = cell(row, col).and_then(parse_percent);
            }
            Some(ReligionRow {
                state: state.to_string(),
                values,
            })
        })
        .collect();

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn header() -> String {
        let mut cols = vec!["State".to_string()];
        cols.extend(RELIGION_INDICATORS.iter().map(|c| format!("\"{}\"", c.replace('"', "\"\""))));
        cols.push("Sample size".to_string());
        cols.join(",")
    }

    #[test]
    fn test_load_religion() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(RELIGION_FILE);
        let mut shares = vec!["61%", "20%", "9%", "1%", "5%", "4%", "< 1%", "18%", "29%"];
        shares.extend(["< 1%", "4%", "1%", "1%", "18%", "1%", "< 1%", "< 1%", "22%"]);
        let contents = format!("{}\nOhio,{},1569\n", header(), shares.join(","));
        fs::write(&path, contents).unwrap();

        let rows = load_religion(&path).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].state, "Ohio");
        assert_eq!(rows[0].values[0], Some(0.61));
        assert_eq!(rows[0].values[6], Some(0.01));
        assert_eq!(rows[0].values[17], Some(0.22));
    }

    #[test]
    fn test_missing_indicator_column() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(RELIGION_FILE);
        fs::write(&path, "State,Buddhist\nOhio,1%\n").unwrap();
        let err = load_religion(&path).unwrap_err();
        assert!(matches!(
            err,
            LoadError::MissingColumn { ref column, .. } if column == "Believe in God; absolutely certain"
        ));
    }
}
