// src/pipeline/mod.rs - End-to-end fusion run
pub mod demographics;
pub mod finalize;
pub mod output;
pub mod state_join;

use anyhow::{Context, Result};
use chrono::Utc;
use indicatif::ProgressBar;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

use crate::loaders::finance::load_finance_dir;
use crate::loaders::ideology::{load_ideology, IDEOLOGY_FILE};
use crate::loaders::kff::load_kff_dir;
use crate::loaders::population::{load_population, POPULATION_FILE};
use crate::loaders::religion::{load_religion, RELIGION_FILE};
use crate::matching::fuser::TableFuser;
use crate::matching::resolver::MatcherConfig;
use crate::models::demographics::{KffRow, PopulationRow, ReligionRow};
use crate::models::records::{FinanceRecord, IdeologyRecord};
use crate::models::stats_models::{FuseStats, PipelineStats};
use crate::utils::config::FusionConfig;
use crate::utils::get_memory_usage;
use crate::utils::progress_bars::logging::{
    log_pipeline_completion, log_pipeline_start, FusionLogger, PipelinePhase,
};
use crate::utils::progress_bars::progress_config::{add_sub_bar, main_bar_style, ProgressConfig};

use demographics::aggregate_state_demographics;
use finalize::assemble_rows;
use output::{write_analytic_csv, write_failure_report, FailureReport};
use state_join::DemographicsTable;

const PIPELINE_PHASES: u64 = 5;

/// Every table the run reads, as loaded and cleaned.
#[derive(Debug, Clone)]
pub struct PipelineInputs {
    pub ideology: Vec<IdeologyRecord>,
    pub finance: Vec<FinanceRecord>,
    pub kff: Vec<KffRow>,
    pub population: Vec<PopulationRow>,
    pub religion: Vec<ReligionRow>,
}

/// Read the five sources from their fixed locations under `data_dir`.
pub fn load_inputs(data_dir: &Path) -> Result<PipelineInputs> {
    let logger = FusionLogger::new(PipelinePhase::Loading);

    logger.log_phase("Loading VoteView members", None);
    let ideology = load_ideology(&data_dir.join(IDEOLOGY_FILE)).context("Failed to load ideology table")?;

    logger.log_phase("Loading FEC candidate summaries", None);
    let finance = load_finance_dir(&data_dir.join("fec")).context("Failed to load FEC summaries")?;

    logger.log_phase("Loading state demographics", None);
    let kff = load_kff_dir(&data_dir.join("kff")).context("Failed to load KFF tables")?;
    let population = load_population(&data_dir.join("census").join(POPULATION_FILE))
        .context("Failed to load census population table")?;
    logger.log_data_loaded(population.len(), "census area");
    let religion =
        load_religion(&data_dir.join("pew").join(RELIGION_FILE)).context("Failed to load religion table")?;
    logger.log_data_loaded(religion.len(), "religion survey");

    Ok(PipelineInputs {
        ideology,
        finance,
        kff,
        population,
        religion,
    })
}

async fn update_main_message(pb: &ProgressBar, phase: &str, progress: &ProgressConfig) {
    if progress.should_show_memory() {
        let memory_mb = get_memory_usage().await;
        pb.set_message(format!("{} (Memory: {} MB)", phase, memory_mb));
    } else {
        pb.set_message(phase.to_string());
    }
}

/// Load, fuse, join and write. Returns the run summary.
pub async fn run_pipeline(config: &FusionConfig, progress: &ProgressConfig) -> Result<PipelineStats> {
    let run_id = Uuid::new_v4().to_string();
    let started_at = Utc::now();
    let run_start = Instant::now();
    log_pipeline_start(&run_id, &config.data_dir.display().to_string());

    let multi_progress = progress.create_multi_progress();
    let main_pb = multi_progress.as_ref().map(|mp| {
        let pb = mp.add(ProgressBar::new(PIPELINE_PHASES));
        pb.set_style(main_bar_style());
        pb.set_message("Initializing pipeline...");
        pb
    });

    // Phase 1: load
    if let Some(pb) = &main_pb {
        update_main_message(pb, "Phase 1: Loading source tables", progress).await;
    }
    let load_logger = FusionLogger::new(PipelinePhase::Loading);
    load_logger.log_start(&run_id);
    let data_dir = config.data_dir.clone();
    let inputs = tokio::task::spawn_blocking(move || load_inputs(&data_dir))
        .await
        .context("Loading task panicked")??;
    let load_seconds = run_start.elapsed().as_secs_f64();
    load_logger.log_completion(
        inputs.ideology.len() + inputs.finance.len() + inputs.kff.len(),
        "ideology, finance and KFF rows loaded",
    );
    if let Some(pb) = &main_pb {
        pb.inc(1);
    }

    // Phase 2: demographics
    if let Some(pb) = &main_pb {
        update_main_message(pb, "Phase 2: Aggregating state demographics", progress).await;
    }
    let demo_logger = FusionLogger::new(PipelinePhase::Demographics);
    let state_rows = aggregate_state_demographics(&inputs.kff, &inputs.population, &inputs.religion, &demo_logger);
    let demographic_rows = state_rows.len();
    let demographics = DemographicsTable::new(state_rows);
    demo_logger.log_completion(demographic_rows, &format!("state-years across {} states", demographics.state_count()));
    if let Some(pb) = &main_pb {
        pb.inc(1);
    }

    // Phase 3: entity resolution
    if let Some(pb) = &main_pb {
        update_main_message(pb, "Phase 3: Resolving representatives", progress).await;
    }
    let resolve_logger = FusionLogger::new(PipelinePhase::Resolution);
    resolve_logger.log_start(&run_id);
    let resolve_start = Instant::now();
    let ideology_rows = inputs.ideology.len();
    let finance_rows = inputs.finance.len();
    let sources = Arc::new(inputs.ideology);
    let targets = Arc::new(inputs.finance);

    let resolve_pb = add_sub_bar(
        progress,
        multi_progress.as_ref(),
        ideology_rows as u64,
        resolve_logger.emoji(),
        "Resolving representatives...",
    );
    let fuser = TableFuser::new(MatcherConfig {
        acceptance_threshold: config.acceptance_threshold,
    })
    .with_parallelism(config.workers, config.batch_size);
    let results = fuser
        .fuse_parallel(sources, targets, resolve_pb.clone(), progress.should_show_memory())
        .await
        .context("Representative resolution failed")?;
    if let Some(pb) = &resolve_pb {
        pb.finish_and_clear();
    }

    let fuse_stats = FuseStats::from_results(&results);
    resolve_logger.log_fuse_summary(&fuse_stats);
    resolve_logger.log_data_quality_issue("ideology rows without a representative name", fuse_stats.rows_missing_name);
    let resolve_seconds = resolve_start.elapsed().as_secs_f64();
    if let Some(pb) = &main_pb {
        pb.inc(1);
    }

    // Phase 4: state join and finalization
    if let Some(pb) = &main_pb {
        update_main_message(pb, "Phase 4: Joining state demographics", progress).await;
    }
    let join_logger = FusionLogger::new(PipelinePhase::StateJoin);
    let rows = assemble_rows(&results, &demographics);
    let without_demographics = rows
        .iter()
        .filter(|r| r.demographics.iter().all(Option::is_none))
        .count();
    join_logger.log_data_quality_issue("rows without state demographics", without_demographics);
    join_logger.log_completion(rows.len(), "analytic rows assembled");
    if let Some(pb) = &main_pb {
        pb.inc(1);
    }

    // Phase 5: output
    if let Some(pb) = &main_pb {
        update_main_message(pb, "Phase 5: Writing outputs", progress).await;
    }
    let output_logger = FusionLogger::new(PipelinePhase::Output);
    let output_rows = write_analytic_csv(&config.output_path, &rows)
        .with_context(|| format!("Failed to write {}", config.output_path.display()))?;
    output_logger.log_phase("Analytic table written", Some(&config.output_path.display().to_string()));

    if let Some(path) = &config.failures_report {
        let report = FailureReport::from_results(&run_id, config.acceptance_threshold, fuse_stats.clone(), &results);
        write_failure_report(path, &report)?;
        output_logger.log_phase(
            "Failure report written",
            Some(&format!("{} rows → {}", report.failures.len(), path.display())),
        );
    }
    if let Some(pb) = &main_pb {
        pb.inc(1);
        pb.finish_with_message("Pipeline complete");
    }

    log_pipeline_completion(&run_id, output_rows, &config.output_path.display().to_string());

    Ok(PipelineStats {
        run_id,
        started_at,
        finished_at: Utc::now(),
        ideology_rows,
        finance_rows,
        demographic_rows,
        output_rows,
        fuse: fuse_stats,
        load_seconds,
        resolve_seconds,
        total_seconds: run_start.elapsed().as_secs_f64(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loaders::finance::filing_path;
    use crate::models::demographics::RELIGION_INDICATORS;
    use std::fs;
    use tempfile::tempdir;

    const IDEOLOGY: &str = "congress,chamber,icpsr,state_icpsr,district_code,state_abbrev,party_code,bioname,bioguide_id,born,died,nominate_dim1,nominate_dim2,nominate_number_of_votes\n\
111,House,20901,24,9,OH,100,\"KAPTUR, Marcy\",K000009,1946,,-0.356,-0.107,1150\n\
111,House,20902,24,3,OH,100,\"TURNER, Michael\",T000463,1960,,0.21,0.3,1100\n\
111,Senate,20903,24,0,OH,200,\"VOINOVICH, George\",V000126,1936,2016,0.2,0.1,600\n";

    const FEC_2010: &str = "\"24-Month Candidate Summary\"\n\
Candidate,Office,State,District,Party,\"Incumbent/\nChallenger/Open\",Receipts,\"Contributions \nfrom Individuals\",\"Contributions \nfrom PACs and \nOther Committees\",\"Contributions \nand Loans from \nthe Candidate\",Disbursements,Cash On Hand,Debts\n\
\"KAPTUR, MARCY\",H,OH,09,DEMOCRATIC PARTY,INCUMBENT,\"$1,000\",$600,$300,$0,$900,$100,$0\n";

    const POVERTY: &str = "\"Poverty Rate by Age\"\n\"Timeframe: 2010\"\nLocation,Children 0-18,Adults 19-64,65+,Total,Footnotes\nOhio,0.2,0.14,0.08,0.14,\n";
    const RACE: &str = "\"Race\"\n\"Timeframe: 2010\"\nLocation,White,Black,Hispanic,Asian,American Indian/Alaska Native,Native Hawaiian/Other Pacific Islander,Multiple Races,Total,Footnotes\nOhio,0.8,0.12,0.03,0.02,<.01,<.01,0.02,1,\n";

    fn write_fixture_tree(root: &Path) {
        fs::write(root.join(IDEOLOGY_FILE), IDEOLOGY).unwrap();

        fs::create_dir_all(root.join("fec")).unwrap();
        fs::write(filing_path(&root.join("fec"), 2010), FEC_2010).unwrap();

        for table in ["poverty", "race"] {
            fs::create_dir_all(root.join("kff").join(table)).unwrap();
        }
        fs::write(root.join("kff/poverty/raw_data (11).csv"), POVERTY).unwrap();
        fs::write(root.join("kff/race/raw_data (11).csv"), RACE).unwrap();

        fs::create_dir_all(root.join("census")).unwrap();
        fs::write(
            root.join("census").join(POPULATION_FILE),
            "Area,Resident Population 2020 Census,Resident Population 2010 Census\nOhio,\"11,799,448\",\"11,536,504\"\n",
        )
        .unwrap();

        fs::create_dir_all(root.join("pew")).unwrap();
        let header: Vec<String> = std::iter::once("State".to_string())
            .chain(RELIGION_INDICATORS.iter().map(|c| format!("\"{}\"", c.replace('"', "\"\""))))
            .collect();
        let shares = vec!["5%"; RELIGION_INDICATORS.len()].join(",");
        fs::write(
            root.join("pew").join(RELIGION_FILE),
            format!("{}\nOhio,{}\n", header.join(","), shares),
        )
        .unwrap();
    }

    #[test]
    fn test_load_inputs_missing_file_has_context() {
        let dir = tempdir().unwrap();
        let err = load_inputs(dir.path()).unwrap_err();
        assert!(err.to_string().contains("ideology"));
    }

    #[tokio::test]
    async fn test_run_pipeline_end_to_end() {
        let dir = tempdir().unwrap();
        write_fixture_tree(dir.path());

        let config = FusionConfig {
            data_dir: dir.path().to_path_buf(),
            output_path: dir.path().join("out").join("fused.csv"),
            failures_report: Some(dir.path().join("out").join("failures.json")),
            workers: 2,
            batch_size: 1,
            ..FusionConfig::default()
        };
        let progress = ProgressConfig {
            enabled: false,
            detailed: false,
            show_memory: false,
        };

        let stats = run_pipeline(&config, &progress).await.unwrap();
        assert_eq!(stats.ideology_rows, 2);
        assert_eq!(stats.finance_rows, 1);
        assert_eq!(stats.output_rows, 2);
        assert_eq!(stats.fuse.matched, 1);
        assert_eq!(stats.fuse.failed, 1);

        let mut reader = csv::Reader::from_path(&config.output_path).unwrap();
        let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 2);
        assert_eq!(&records[0][0], "KAPTUR, Marcy");
        assert_eq!(&records[0][3], "DEMOCRATIC PARTY");
        assert_eq!(&records[0][17], "1000");
        // 2009-2011 session averages the 2010 survey
        assert_eq!(&records[0][24], "0.2");
        assert_eq!(&records[1][3], "No Party Affiliation");

        let report = fs::read_to_string(config.failures_report.as_ref().unwrap()).unwrap();
        assert!(report.contains("TURNER, Michael"));
    }
}
