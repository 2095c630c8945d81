use std::ops::RangeInclusive;

use chrono::NaiveDate;
use serde::Serialize;

use super::rounding::rounded_mean;
use crate::models::CycleRecord;

/// Cycle lengths outside this window count as irregular.
pub const NORMAL_CYCLE_DAYS: RangeInclusive<u32> = 21..=35;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleStats {
    pub total_cycles_logged: usize,
    pub average_cycle_length: Option<u32>,
    pub shortest_cycle: Option<u32>,
    pub longest_cycle: Option<u32>,
    pub average_period_length: Option<u32>,
    pub irregular_cycles: usize,
    pub last_cycle_date: Option<NaiveDate>,
}

/// Summarise the most recent actual cycles (most recent first). `None` when
/// there is nothing logged at all.
pub fn compute_cycle_stats(cycles: &[CycleRecord]) -> Option<CycleStats> {
    let latest = cycles.first()?;

    let cycle_lengths: Vec<u32> = cycles.iter().filter_map(|c| c.cycle_length).collect();
    let period_lengths: Vec<u32> = cycles.iter().filter_map(|c| c.period_length).collect();

    Some(CycleStats {
        total_cycles_logged: cycles.len(),
        average_cycle_length: rounded_mean(&cycle_lengths),
        shortest_cycle: cycle_lengths.iter().copied().min(),
        longest_cycle: cycle_lengths.iter().copied().max(),
        average_period_length: rounded_mean(&period_lengths),
        irregular_cycles: cycle_lengths
            .iter()
            .filter(|&&len| !NORMAL_CYCLE_DAYS.contains(&len))
            .count(),
        last_cycle_date: Some(latest.start_date),
    })
}
