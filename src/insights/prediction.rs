use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use super::rounding::rounded_mean;
use crate::error::{Result, TrackerError};
use crate::models::CycleRecord;

pub const DEFAULT_CYCLE_LENGTH: u32 = 28;

/// How many of the most recent cycle lengths feed the average.
const RECENT_CYCLES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    fn from_history(actual_cycles: usize) -> Self {
        match actual_cycles {
            n if n >= 3 => Confidence::High,
            2 => Confidence::Medium,
            _ => Confidence::Low,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    pub predicted_start_date: NaiveDate,
    pub predicted_cycle_length: u32,
    pub confidence: Confidence,
    pub based_on_cycles: usize,
}

/// Forecast the next cycle from records ordered most recent first.
///
/// The average covers the latest three length-bearing actual cycles and falls
/// back to 28 days. The projection is anchored on the most recent actual
/// record, whether or not it has a length yet; without one there is no
/// forecast.
pub fn predict_next_cycle(cycles: &[CycleRecord]) -> Result<Option<Prediction>> {
    if cycles.is_empty() {
        return Ok(None);
    }

    let actual_lengths: Vec<u32> = cycles
        .iter()
        .filter(|c| !c.is_predicted)
        .filter_map(|c| c.cycle_length)
        .collect();

    let recent = &actual_lengths[..actual_lengths.len().min(RECENT_CYCLES)];
    let average = rounded_mean(recent).unwrap_or(DEFAULT_CYCLE_LENGTH);

    let Some(last_cycle) = cycles.iter().find(|c| !c.is_predicted) else {
        return Ok(None);
    };

    let predicted_start_date = last_cycle
        .start_date
        .checked_add_days(Days::new(u64::from(average)))
        .ok_or_else(|| {
            TrackerError::DateOutOfRange(format!(
                "{} + {average} days",
                last_cycle.start_date
            ))
        })?;

    Ok(Some(Prediction {
        predicted_start_date,
        predicted_cycle_length: average,
        confidence: Confidence::from_history(actual_lengths.len()),
        based_on_cycles: actual_lengths.len(),
    }))
}
