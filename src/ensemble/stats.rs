use std::time::{Duration, Instant};

/// Statistics for one ensemble call.
#[derive(Debug, Clone)]
pub struct PipelineStats {
    /// Wall-clock time for the whole call.
    pub total_time: Duration,
    /// Number of texts processed.
    pub items_processed: usize,
}

impl PipelineStats {
    /// Begin timing; call before the first classifier runs.
    pub(crate) fn start() -> PipelineStatsBuilder {
        PipelineStatsBuilder {
            start_time: Instant::now(),
        }
    }
}

/// In-flight timer, turned into [`PipelineStats`] once the call completes.
pub(crate) struct PipelineStatsBuilder {
    start_time: Instant,
}

impl PipelineStatsBuilder {
    /// Stop the clock and record how many texts went through.
    pub fn finish(self, items_processed: usize) -> PipelineStats {
        PipelineStats {
            total_time: self.start_time.elapsed(),
            items_processed,
        }
    }
}
