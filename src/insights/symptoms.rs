use std::collections::BTreeMap;

use serde::Serialize;

use super::rounding::round_to;
use crate::models::{Mood, SymptomLog, SymptomName};

pub const DEFAULT_WINDOW_DAYS: i64 = 30;
pub const TOP_SYMPTOMS: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SymptomSummary {
    pub name: SymptomName,
    pub count: usize,
    pub average_severity: f64,
    /// Percentage of logged days in the window on which the symptom appeared.
    pub frequency: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SymptomStats {
    pub total_logs_in_period: usize,
    pub top_symptoms: Vec<SymptomSummary>,
    pub mood_distribution: BTreeMap<Mood, usize>,
    /// Divided by every log in the window.
    pub average_energy_level: Option<f64>,
    /// Divided only by logs that recorded sleep.
    pub average_sleep_hours: Option<f64>,
}

#[derive(Default)]
struct Tally {
    count: usize,
    total_severity: u32,
}

/// Summarise the logs of one window. `None` when the window is empty.
pub fn compute_symptom_stats(logs: &[SymptomLog]) -> Option<SymptomStats> {
    if logs.is_empty() {
        return None;
    }

    // first-encounter order, kept as the tie-break for equal counts
    let mut tallies: Vec<(SymptomName, Tally)> = Vec::new();
    let mut mood_distribution = BTreeMap::new();
    let mut total_energy = 0u32;
    let mut total_sleep = 0.0;
    let mut sleep_count = 0usize;

    for log in logs {
        for entry in &log.symptoms {
            let idx = match tallies.iter().position(|(name, _)| *name == entry.name) {
                Some(idx) => idx,
                None => {
                    tallies.push((entry.name, Tally::default()));
                    tallies.len() - 1
                }
            };
            let tally = &mut tallies[idx].1;
            tally.count += 1;
            tally.total_severity += u32::from(entry.severity);
        }

        if let Some(mood) = log.mood {
            *mood_distribution.entry(mood).or_insert(0) += 1;
        }
        if let Some(energy) = log.energy_level {
            total_energy += u32::from(energy);
        }
        if let Some(sleep) = log.sleep_hours {
            total_sleep += sleep;
            sleep_count += 1;
        }
    }

    let total_logs = logs.len();

    let mut top_symptoms: Vec<SymptomSummary> = tallies
        .into_iter()
        .map(|(name, tally)| SymptomSummary {
            name,
            count: tally.count,
            average_severity: round_to(f64::from(tally.total_severity) / tally.count as f64, 1),
            frequency: round_to(tally.count as f64 / total_logs as f64 * 100.0, 0) as u32,
        })
        .collect();
    top_symptoms.sort_by(|a, b| b.count.cmp(&a.count));
    top_symptoms.truncate(TOP_SYMPTOMS);

    Some(SymptomStats {
        total_logs_in_period: total_logs,
        top_symptoms,
        mood_distribution,
        average_energy_level: Some(round_to(f64::from(total_energy) / total_logs as f64, 1)),
        average_sleep_hours: (sleep_count > 0)
            .then(|| round_to(total_sleep / sleep_count as f64, 1)),
    })
}
