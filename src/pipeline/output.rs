// src/pipeline/output.rs - Analytic CSV and failure audit report
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use crate::models::match_result::{MatchResult, WindowAttempt};
use crate::models::records::{FinancePayload, IdeologyRecord};
use crate::models::stats_models::FuseStats;
use crate::pipeline::finalize::{analytic_headers, AnalyticRow};

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory {}", parent.display()))?;
    }
    Ok(())
}

/// Write the analytic table with a header row. Returns the number of data rows.
pub fn write_analytic_csv(path: &Path, rows: &[AnalyticRow]) -> Result<usize> {
    ensure_parent_dir(path)?;
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Necessary)
        .from_path(path)
        .with_context(|| format!("failed to open {}", path.display()))?;

    writer
        .write_record(analytic_headers())
        .context("failed to write analytic header")?;
    for row in rows {
        writer
            .write_record(row.to_record())
            .with_context(|| format!("failed to write row for {}", row.representative))?;
    }
    writer.flush().context("failed to flush analytic table")?;
    Ok(rows.len())
}

/// A source row that no finance record could be attached to.
#[derive(Debug, Clone, Serialize)]
pub struct FailureEntry {
    pub row_index: usize,
    pub representative: String,
    pub congress: i32,
    pub state_name: String,
    pub district_code: i32,
    pub closeness: Option<f64>,
    pub attempts: Vec<WindowAttempt>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FailureReport {
    pub run_id: String,
    pub generated_at: DateTime<Utc>,
    pub acceptance_threshold: f64,
    pub stats: FuseStats,
    pub failures: Vec<FailureEntry>,
}

impl FailureReport {
    pub fn from_results(
        run_id: &str,
        acceptance_threshold: f64,
        stats: FuseStats,
        results: &[MatchResult<IdeologyRecord, FinancePayload>],
    ) -> Self {
        let failures = results
            .iter()
            .filter(|r| r.failed)
            .map(|r| FailureEntry {
                row_index: r.row_index,
                representative: r.source.representative.clone(),
                congress: r.source.congress,
                state_name: r.source.state_name.clone(),
                district_code: r.source.district_code,
                closeness: r.closeness,
                attempts: r.diagnostics.clone(),
            })
            .collect();

        Self {
            run_id: run_id.to_string(),
            generated_at: Utc::now(),
            acceptance_threshold,
            stats,
            failures,
        }
    }
}

pub fn write_failure_report(path: &Path, report: &FailureReport) -> Result<()> {
    ensure_parent_dir(path)?;
    let file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), report)
        .with_context(|| format!("failed to write failure report to {}", path.display()))?;
    Ok(())
}
