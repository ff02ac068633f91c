mod types;

pub use types::{MetricsSnapshot, RoundMetrics};

use std::sync::{Arc, Mutex};

use crate::utils::lock;

const MAX_RECENT_ROUNDS: usize = 20;

/// Counters for data collection rounds. Clones share the same counters.
#[derive(Clone, Default)]
pub struct MetricsCollector {
    inner: Arc<Mutex<MetricsState>>,
}

#[derive(Default)]
struct MetricsState {
    recent_rounds: Vec<RoundMetrics>,
    round_count: u64,
    records_written: u64,
    rejected_count: u64,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_round(&self, metrics: RoundMetrics) {
        let mut state = lock(&self.inner);

        state.round_count += 1;
        state.records_written += metrics.records_written as u64;
        state.recent_rounds.push(metrics);

        if state.recent_rounds.len() > MAX_RECENT_ROUNDS {
            state.recent_rounds.remove(0);
        }
    }

    pub fn record_rejected(&self) {
        lock(&self.inner).rejected_count += 1;
    }

    pub fn get_snapshot(&self) -> MetricsSnapshot {
        let state = lock(&self.inner);
        MetricsSnapshot {
            recent_rounds: state.recent_rounds.clone(),
            round_count: state.round_count,
            records_written: state.records_written,
            rejected_count: state.rejected_count,
        }
    }

    pub fn reset(&self) {
        *lock(&self.inner) = MetricsState::default();
    }
}
