// src/main.rs
use anyhow::Result;
use clap::Parser;
use log::info;
use std::path::PathBuf;

use fusion_lib::pipeline::run_pipeline;
use fusion_lib::utils::config::FusionConfig;
use fusion_lib::utils::env::load_env;
use fusion_lib::utils::progress_bars::progress_config::ProgressConfig;

#[derive(Parser)]
#[command(author, version, about = "Fuse VoteView, FEC and state demographic tables into one analytic table", long_about = None)]
struct Args {
    /// Directory holding the source exports (overrides FUSION_DATA_DIR)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Analytic CSV to write (overrides FUSION_OUTPUT)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Write a JSON audit of unresolved rows here (overrides FUSION_FAILURES_REPORT)
    #[arg(long)]
    failures_report: Option<PathBuf>,

    /// Concurrent resolution batches
    #[arg(long)]
    workers: Option<usize>,

    /// Rows per resolution batch
    #[arg(long)]
    batch_size: Option<usize>,

    /// Minimum closeness (0-100) for accepting a finance match
    #[arg(long)]
    threshold: Option<f64>,
}

impl Args {
    fn apply(self, mut config: FusionConfig) -> FusionConfig {
        if let Some(dir) = self.data_dir {
            config.data_dir = dir;
        }
        if let Some(output) = self.output {
            config.output_path = output;
        }
        if self.failures_report.is_some() {
            config.failures_report = self.failures_report;
        }
        if let Some(workers) = self.workers.filter(|w| *w > 0) {
            config.workers = workers;
        }
        if let Some(batch_size) = self.batch_size.filter(|b| *b > 0) {
            config.batch_size = batch_size;
        }
        if let Some(threshold) = self.threshold.filter(|t| (0.0..=100.0).contains(t)) {
            config.acceptance_threshold = threshold;
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    load_env();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = args.apply(FusionConfig::from_env());
    config.log_config();

    let progress = ProgressConfig::from_env();
    info!(
        "Progress tracking: enabled={}, detailed={}",
        progress.enabled, progress.detailed
    );

    let stats = run_pipeline(&config, &progress).await?;

    info!(
        "Resolved {}/{} representatives ({:.1}%), {} failed",
        stats.fuse.matched,
        stats.fuse.total_rows,
        stats.fuse.match_rate() * 100.0,
        stats.fuse.failed
    );
    info!(
        "Timing: load {:.2}s, resolve {:.2}s, total {:.2}s",
        stats.load_seconds, stats.resolve_seconds, stats.total_seconds
    );
    info!(
        "Run {} finished at {}",
        stats.run_id,
        stats.finished_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    Ok(())
}
