// src/matching/fuser.rs - Table-level fusion of source rows with target payloads
use anyhow::{Context, Result};
use indicatif::ProgressBar;
use std::sync::Arc;

use crate::matching::resolver::{MatcherConfig, RecordMatcher};
use crate::matching::similarity::{FuzzyNameScorer, NameScorer};
use crate::matching::window::CandidateIndex;
use crate::models::match_result::MatchResult;
use crate::models::records::{MatchKey, TargetRecord};
use crate::utils::get_memory_usage;
use crate::utils::progress_bars::logging::{FusionLogger, PipelinePhase};

const DEFAULT_BATCH_SIZE: usize = 500;

/// Applies a [`RecordMatcher`] to every row of a source table.
///
/// Output has one result per source row, in source order. Target rows are never
/// consumed: several source rows may resolve to the same target.
pub struct TableFuser<Sc = FuzzyNameScorer> {
    matcher: Arc<RecordMatcher<Sc>>,
    workers: usize,
    batch_size: usize,
}

impl TableFuser<FuzzyNameScorer> {
    pub fn new(config: MatcherConfig) -> Self {
        Self::with_matcher(RecordMatcher::new(config))
    }
}

impl<Sc: NameScorer + 'static> TableFuser<Sc> {
    pub fn with_matcher(matcher: RecordMatcher<Sc>) -> Self {
        Self {
            matcher: Arc::new(matcher),
            workers: num_cpus::get().max(1),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// Concurrent batches and rows per batch for [`TableFuser::fuse_parallel`].
    pub fn with_parallelism(mut self, workers: usize, batch_size: usize) -> Self {
        self.workers = workers.max(1);
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn fuse<S, T>(&self, sources: &[S], targets: &[T]) -> Vec<MatchResult<S, T::Payload>>
    where
        S: MatchKey + Clone,
        T: TargetRecord,
    {
        let index = CandidateIndex::build(targets);
        sources
            .iter()
            .enumerate()
            .map(|(i, source)| self.matcher.resolve_indexed(i, source, targets, &index))
            .collect()
    }

    /// Same results as [`TableFuser::fuse`], with rows sharded across blocking worker tasks.
    pub async fn fuse_parallel<S, T>(
        &self,
        sources: Arc<Vec<S>>,
        targets: Arc<Vec<T>>,
        progress: Option<ProgressBar>,
        show_memory: bool,
    ) -> Result<Vec<MatchResult<S, T::Payload>>>
    where
        S: MatchKey + Clone + Send + Sync + 'static,
        T: TargetRecord + Send + Sync + 'static,
    {
        let logger = FusionLogger::new(PipelinePhase::Resolution);
        let index = Arc::new(CandidateIndex::build(&targets));
        logger.log_debug(&format!(
            "Indexed {} target rows into {} windows",
            targets.len(),
            index.window_count()
        ));

        let total_rows = sources.len();
        let chunk_rows = self.batch_size * self.workers;
        let total_chunks = (total_rows + chunk_rows - 1) / chunk_rows;
        logger.log_batch_processing_start(total_rows, self.batch_size, self.workers);

        let mut results = Vec::with_capacity(total_rows);
        for (chunk_idx, chunk_start) in (0..total_rows).step_by(chunk_rows).enumerate() {
            let chunk_end = (chunk_start + chunk_rows).min(total_rows);

            let mut batch_futures = Vec::new();
            for batch_start in (chunk_start..chunk_end).step_by(self.batch_size) {
                let batch_end = (batch_start + self.batch_size).min(chunk_end);
                let matcher = Arc::clone(&self.matcher);
                let sources = Arc::clone(&sources);
                let targets = Arc::clone(&targets);
                let index = Arc::clone(&index);

                batch_futures.push(tokio::task::spawn_blocking(move || {
                    (batch_start..batch_end)
                        .map(|i| matcher.resolve_indexed(i, &sources[i], &targets, &index))
                        .collect::<Vec<_>>()
                }));
            }

            let batch_results = futures::future::join_all(batch_futures).await;
            for (i, batch) in batch_results.into_iter().enumerate() {
                let batch = batch.with_context(|| {
                    format!("resolution batch {} of chunk {} failed", i + 1, chunk_idx + 1)
                })?;
                results.extend(batch);
            }

            logger.log_batch_progress(chunk_idx + 1, total_chunks, chunk_end - chunk_start);
            if let Some(pb) = &progress {
                pb.inc((chunk_end - chunk_start) as u64);
                if show_memory && chunk_idx % 5 == 0 {
                    let current_memory = get_memory_usage().await;
                    pb.set_message(format!(
                        "Resolving representatives... (Memory: {} MB)",
                        current_memory
                    ));
                }
            }
        }

        results.sort_by_key(|r| r.row_index);
        anyhow::ensure!(
            results.len() == total_rows,
            "fused {} rows from {} source rows",
            results.len(),
            total_rows
        );
        Ok(results)
    }
}
