// src/utils/config.rs

use log::info;
use std::env;
use std::path::PathBuf;

use crate::utils::constants::MATCH_ACCEPTANCE_THRESHOLD;

/// Run configuration for the fusion pipeline, read from the environment and
/// overridable from the command line.
#[derive(Debug, Clone)]
pub struct FusionConfig {
    /// Root directory holding the exported source tables
    pub data_dir: PathBuf,
    /// Where the analytic table is written
    pub output_path: PathBuf,
    /// Optional JSON audit of rows that failed entity resolution
    pub failures_report: Option<PathBuf>,
    /// Concurrent resolution batches
    pub workers: usize,
    /// Rows per resolution batch
    pub batch_size: usize,
    pub acceptance_threshold: f64,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("fresh_data"),
            output_path: PathBuf::from("representatives_fused.csv"),
            failures_report: None,
            workers: num_cpus::get().max(1),
            batch_size: 500,
            acceptance_threshold: MATCH_ACCEPTANCE_THRESHOLD,
        }
    }
}

impl FusionConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            data_dir: env::var("FUSION_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            output_path: env::var("FUSION_OUTPUT")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_path),
            failures_report: env::var("FUSION_FAILURES_REPORT")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from),
            workers: env::var("FUSION_WORKERS")
                .ok()
                .and_then(|s| s.parse::<usize>().ok())
                .filter(|w| *w > 0)
                .unwrap_or(defaults.workers),
            batch_size: env::var("FUSION_BATCH_SIZE")
                .ok()
                .and_then(|s| s.parse::<usize>().ok())
                .filter(|b| *b > 0)
                .unwrap_or(defaults.batch_size),
            acceptance_threshold: env::var("MATCH_ACCEPTANCE_THRESHOLD")
                .ok()
                .and_then(|s| s.parse::<f64>().ok())
                .filter(|t| (0.0..=100.0).contains(t))
                .unwrap_or(defaults.acceptance_threshold),
        }
    }

    pub fn log_config(&self) {
        info!("⚙️  Data directory: {}", self.data_dir.display());
        info!("⚙️  Output table: {}", self.output_path.display());
        match &self.failures_report {
            Some(path) => info!("⚙️  Failure audit report: {}", path.display()),
            None => info!("⚙️  Failure audit report disabled"),
        }
        info!(
            "⚙️  Resolution: {} workers, batches of {}, acceptance threshold {:.1}",
            self.workers, self.batch_size, self.acceptance_threshold
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FusionConfig::default();
        assert_eq!(config.data_dir, PathBuf::from("fresh_data"));
        assert!(config.failures_report.is_none());
        assert!(config.workers >= 1);
        assert_eq!(config.batch_size, 500);
        assert_eq!(config.acceptance_threshold, 69.0);
    }

    #[test]
    fn test_env_config() {
        env::set_var("FUSION_DATA_DIR", "/tmp/house");
        env::set_var("FUSION_OUTPUT", "/tmp/out.csv");
        env::set_var("FUSION_FAILURES_REPORT", "/tmp/failures.json");
        env::set_var("FUSION_WORKERS", "3");
        env::set_var("FUSION_BATCH_SIZE", "0");
        env::set_var("MATCH_ACCEPTANCE_THRESHOLD", "250");

        let config = FusionConfig::from_env();
        assert_eq!(config.data_dir, PathBuf::from("/tmp/house"));
        assert_eq!(config.output_path, PathBuf::from("/tmp/out.csv"));
        assert_eq!(config.failures_report, Some(PathBuf::from("/tmp/failures.json")));
        assert_eq!(config.workers, 3);
        // Out-of-range values fall back to defaults
        assert_eq!(config.batch_size, 500);
        assert_eq!(config.acceptance_threshold, 69.0);

        env::remove_var("FUSION_DATA_DIR");
        env::remove_var("FUSION_OUTPUT");
        env::remove_var("FUSION_FAILURES_REPORT");
        env::remove_var("FUSION_WORKERS");
        env::remove_var("FUSION_BATCH_SIZE");
        env::remove_var("MATCH_ACCEPTANCE_THRESHOLD");
    }
}
