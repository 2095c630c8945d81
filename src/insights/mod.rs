//! Derived summaries over a user's records: next-cycle prediction and the
//! cycle / symptom statistics. Everything here is pure and takes records the
//! store has already scoped, sorted and windowed.

pub mod cycle_stats;
pub mod prediction;
pub mod rounding;
pub mod symptoms;

use serde::Serialize;

pub use cycle_stats::{compute_cycle_stats, CycleStats};
pub use prediction::{predict_next_cycle, Confidence, Prediction};
pub use symptoms::{compute_symptom_stats, SymptomStats, SymptomSummary};

pub const NO_CYCLES_MESSAGE: &str = "No cycles logged yet";
pub const NO_LOGS_MESSAGE: &str = "No logs found in this period";

/// `stats: null` plus a message means "no data yet", which is distinct from
/// stats whose individual fields are null.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsEnvelope<T> {
    pub stats: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

impl<T> StatsEnvelope<T> {
    pub fn new(stats: Option<T>, empty_message: &'static str) -> Self {
        let message = stats.is_none().then_some(empty_message);
        Self { stats, message }
    }
}

impl StatsEnvelope<CycleStats> {
    pub fn cycles(stats: Option<CycleStats>) -> Self {
        Self::new(stats, NO_CYCLES_MESSAGE)
    }
}

impl StatsEnvelope<SymptomStats> {
    pub fn symptoms(stats: Option<SymptomStats>) -> Self {
        Self::new(stats, NO_LOGS_MESSAGE)
    }
}
