// src/utils/progress_bars/logging.rs - Logging helpers for pipeline phases
use log::{debug, info, warn};
use std::time::Instant;

use crate::models::stats_models::FuseStats;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelinePhase {
    Loading,
    Demographics,
    Resolution,
    StateJoin,
    Output,
}

impl PipelinePhase {
    fn label(&self) -> (&'static str, &'static str) {
        match self {
            PipelinePhase::Loading => ("LOAD", "📥"),
            PipelinePhase::Demographics => ("DEMOGRAPHICS", "🗺️"),
            PipelinePhase::Resolution => ("RESOLVE", "🔗"),
            PipelinePhase::StateJoin => ("STATE_JOIN", "🧮"),
            PipelinePhase::Output => ("OUTPUT", "💾"),
        }
    }
}

#[derive(Clone)]
pub struct FusionLogger {
    phase_name: &'static str,
    phase_emoji: &'static str,
    start_time: Instant,
}

impl FusionLogger {
    pub fn new(phase: PipelinePhase) -> Self {
        let (phase_name, phase_emoji) = phase.label();
        Self {
            phase_name,
            phase_emoji,
            start_time: Instant::now(),
        }
    }

    pub fn emoji(&self) -> &'static str {
        self.phase_emoji
    }

    pub fn log_start(&self, run_id: &str) {
        info!(
            "[{}] {} 🚀 Starting {} phase (run ID: {})",
            self.phase_name,
            self.phase_emoji,
            self.phase_name.to_lowercase(),
            run_id
        );
    }

    pub fn log_phase(&self, step: &str, details: Option<&str>) {
        let elapsed = self.start_time.elapsed();
        match details {
            Some(details) => info!(
                "[{}] {} 🔄 Step: {} - {} [+{:.1}s]",
                self.phase_name,
                self.phase_emoji,
                step,
                details,
                elapsed.as_secs_f32()
            ),
            None => info!(
                "[{}] {} 🔄 Step: {} [+{:.1}s]",
                self.phase_name,
                self.phase_emoji,
                step,
                elapsed.as_secs_f32()
            ),
        }
    }

    pub fn log_data_loaded(&self, count: usize, data_type: &str) {
        info!(
            "[{}] {} 📊 Loaded {} {} records",
            self.phase_name, self.phase_emoji, count, data_type
        );
    }

    pub fn log_rows_dropped(&self, count: usize, reason: &str) {
        if count > 0 {
            info!(
                "[{}] {} 🚫 Dropped {} rows ({})",
                self.phase_name, self.phase_emoji, count, reason
            );
        }
    }

    pub fn log_batch_processing_start(&self, total_rows: usize, batch_size: usize, workers: usize) {
        let batch_count = (total_rows + batch_size - 1) / batch_size.max(1);
        info!(
            "[{}] {} ⚙️  Resolving {} rows in {} batches (batch size: {}, workers: {})",
            self.phase_name, self.phase_emoji, total_rows, batch_count, batch_size, workers
        );
    }

    pub fn log_batch_progress(&self, batch_num: usize, total_batches: usize, rows_in_batch: usize) {
        if batch_num % 5 == 0 || batch_num == 1 || batch_num == total_batches {
            info!(
                "[{}] {} 📦 Batch {}/{} ({} rows)",
                self.phase_name, self.phase_emoji, batch_num, total_batches, rows_in_batch
            );
        }
    }

    pub fn log_fuse_summary(&self, stats: &FuseStats) {
        let duration = self.start_time.elapsed();
        info!(
            "[{}] {} 🎉 COMPLETED: {}/{} rows matched ({:.1}%) in {:.2?}",
            self.phase_name,
            self.phase_emoji,
            stats.matched,
            stats.total_rows,
            stats.match_rate() * 100.0,
            duration
        );
        info!(
            "[{}] {} 📊 Matches by window: current {}, prior {}, next {}; avg closeness {:.2}",
            self.phase_name,
            self.phase_emoji,
            stats.matched_current_session,
            stats.matched_prior_session,
            stats.matched_next_session,
            stats.avg_matched_closeness
        );
        if stats.failed > 0 {
            warn!(
                "[{}] {} ⚠️  {} rows unresolved ({} had no candidates in any window)",
                self.phase_name, self.phase_emoji, stats.failed, stats.failed_without_candidates
            );
        }
    }

    pub fn log_completion(&self, rows: usize, what: &str) {
        info!(
            "[{}] {} ✅ {} {} in {:.2?}",
            self.phase_name,
            self.phase_emoji,
            rows,
            what,
            self.start_time.elapsed()
        );
    }

    pub fn log_data_quality_issue(&self, issue_type: &str, count: usize) {
        if count > 0 {
            warn!(
                "[{}] {} ⚠️  Data quality: {} instances of {}",
                self.phase_name, self.phase_emoji, count, issue_type
            );
        }
    }

    pub fn log_warning(&self, message: &str) {
        warn!("[{}] {} ⚠️  {}", self.phase_name, self.phase_emoji, message);
    }

    pub fn log_debug(&self, message: &str) {
        debug!("[{}] {} {}", self.phase_name, self.phase_emoji, message);
    }
}

pub fn log_pipeline_start(run_id: &str, data_dir: &str) {
    info!("🏛️  House representative fusion pipeline starting");
    info!("   Run ID: {}", run_id);
    info!("   Source data: {}", data_dir);
}

pub fn log_pipeline_completion(run_id: &str, output_rows: usize, output_path: &str) {
    info!("=== Pipeline Summary ===");
    info!("Run ID: {}", run_id);
    info!("Analytic rows written: {} → {}", output_rows, output_path);
}
