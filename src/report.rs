use chrono::NaiveDate;
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::config::Config;
use crate::error::Result;
use crate::insights::{
    compute_cycle_stats, compute_symptom_stats, predict_next_cycle, CycleStats, Prediction,
    StatsEnvelope, SymptomStats,
};
use crate::models::{CycleRecord, SymptomLog};
use crate::records::window_start;
use crate::store;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub prediction: Option<Prediction>,
    pub cycle_stats: StatsEnvelope<CycleStats>,
    pub symptom_stats: StatsEnvelope<SymptomStats>,
}

impl Report {
    /// `history` feeds the predictor, `recent_cycles` the cycle statistics;
    /// both are actual cycles, newest first. `logs` is one symptom window.
    pub fn from_records(
        history: &[CycleRecord],
        recent_cycles: &[CycleRecord],
        logs: &[SymptomLog],
    ) -> Result<Self> {
        Ok(Self {
            prediction: predict_next_cycle(history)?,
            cycle_stats: StatsEnvelope::cycles(compute_cycle_stats(recent_cycles)),
            symptom_stats: StatsEnvelope::symptoms(compute_symptom_stats(logs)),
        })
    }
}

pub async fn build(pool: &PgPool, config: &Config, user_id: Uuid, days: i64, today: NaiveDate) -> Result<Report> {
    let since = window_start(today, days)?;

    let history = store::cycles::recent_actual_cycles(pool, user_id, config.prediction_history).await?;
    let recent_cycles = store::cycles::recent_actual_cycles(pool, user_id, config.cycle_stats_limit).await?;
    let logs = store::symptoms::logs_since(pool, user_id, since).await?;

    tracing::debug!(
        %user_id,
        cycles = recent_cycles.len(),
        logs = logs.len(),
        %since,
        "building report"
    );

    Report::from_records(&history, &recent_cycles, &logs)
}
