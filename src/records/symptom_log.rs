use std::collections::HashSet;
use std::ops::RangeInclusive;

use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use super::check_notes;
use crate::error::{Result, TrackerError};
use crate::models::{Exercise, Mood, SymptomEntry, SymptomLog, SymptomName};

pub const MAX_LOG_NOTES: usize = 1000;
pub const DEFAULT_SEVERITY: u8 = 3;
pub const DEFAULT_ENERGY: u8 = 5;

const SEVERITY: RangeInclusive<u8> = 1..=5;
const ENERGY: RangeInclusive<u8> = 1..=10;
const SLEEP_HOURS: RangeInclusive<f64> = 0.0..=24.0;

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct NewSymptomEntry {
    pub name: SymptomName,
    pub severity: Option<u8>,
}

impl From<NewSymptomEntry> for SymptomEntry {
    fn from(entry: NewSymptomEntry) -> Self {
        SymptomEntry {
            name: entry.name,
            severity: entry.severity.unwrap_or(DEFAULT_SEVERITY),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSymptomLog {
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub symptoms: Vec<NewSymptomEntry>,
    pub mood: Option<Mood>,
    pub energy_level: Option<u8>,
    pub sleep_hours: Option<f64>,
    pub water_intake: Option<u32>,
    pub exercise: Option<Exercise>,
    pub notes: Option<String>,
}

impl NewSymptomLog {
    /// Fill defaults and validate. The log is dated `today` unless a date was
    /// supplied.
    pub fn into_log(self, user_id: Uuid, today: NaiveDate) -> Result<SymptomLog> {
        let log = SymptomLog {
            id: Uuid::new_v4(),
            user_id,
            date: self.date.unwrap_or(today),
            symptoms: self.symptoms.into_iter().map(SymptomEntry::from).collect(),
            mood: Some(self.mood.unwrap_or_default()),
            energy_level: Some(self.energy_level.unwrap_or(DEFAULT_ENERGY)),
            sleep_hours: self.sleep_hours,
            water_intake: self.water_intake.unwrap_or(0),
            exercise: self.exercise.unwrap_or_default(),
            notes: self.notes,
        };
        validate(&log)?;
        Ok(log)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymptomLogUpdate {
    pub date: Option<NaiveDate>,
    pub symptoms: Option<Vec<NewSymptomEntry>>,
    pub mood: Option<Mood>,
    pub energy_level: Option<u8>,
    pub sleep_hours: Option<f64>,
    pub water_intake: Option<u32>,
    pub exercise: Option<Exercise>,
    pub notes: Option<String>,
}

impl SymptomLogUpdate {
    /// Merge into `log`, validating the merged result first.
    pub fn apply(self, log: &mut SymptomLog) -> Result<()> {
        let mut merged = log.clone();
        if let Some(date) = self.date {
            merged.date = date;
        }
        if let Some(symptoms) = self.symptoms {
            merged.symptoms = symptoms.into_iter().map(SymptomEntry::from).collect();
        }
        if self.mood.is_some() {
            merged.mood = self.mood;
        }
        if self.energy_level.is_some() {
            merged.energy_level = self.energy_level;
        }
        if self.sleep_hours.is_some() {
            merged.sleep_hours = self.sleep_hours;
        }
        if let Some(water) = self.water_intake {
            merged.water_intake = water;
        }
        if let Some(exercise) = self.exercise {
            merged.exercise = exercise;
        }
        if self.notes.is_some() {
            merged.notes = self.notes;
        }

        validate(&merged)?;
        *log = merged;
        Ok(())
    }
}

/// Range and uniqueness checks shared by creation, updates and the store's
/// row conversion.
pub fn validate(log: &SymptomLog) -> Result<()> {
    let mut seen = HashSet::new();
    for entry in &log.symptoms {
        if !SEVERITY.contains(&entry.severity) {
            return Err(TrackerError::Validation(format!(
                "severity of {} must be between 1 and 5, got {}",
                entry.name, entry.severity
            )));
        }
        if !seen.insert(entry.name) {
            return Err(TrackerError::Validation(format!(
                "symptom {} listed more than once",
                entry.name
            )));
        }
    }

    if let Some(energy) = log.energy_level {
        if !ENERGY.contains(&energy) {
            return Err(TrackerError::Validation(format!(
                "energy level must be between 1 and 10, got {energy}"
            )));
        }
    }
    if let Some(sleep) = log.sleep_hours {
        if !SLEEP_HOURS.contains(&sleep) {
            return Err(TrackerError::Validation(format!(
                "sleep hours must be between 0 and 24, got {sleep}"
            )));
        }
    }

    check_notes(log.notes.as_deref(), MAX_LOG_NOTES)
}

/// Reject a second log on `day`. `existing` are the user's logs on that day;
/// `except` lets an update keep its own date.
pub fn ensure_day_free(day: NaiveDate, existing: &[SymptomLog], except: Option<Uuid>) -> Result<()> {
    match existing
        .iter()
        .find(|log| log.date == day && Some(log.id) != except)
    {
        Some(log) => Err(TrackerError::DuplicateDay {
            day,
            existing: log.id,
        }),
        None => Ok(()),
    }
}
