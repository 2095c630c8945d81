use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use super::check_notes;
use crate::error::{Result, TrackerError};
use crate::models::{CycleRecord, FlowIntensity};

pub const MAX_CYCLE_NOTES: usize = 500;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCycle {
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub flow_intensity: FlowIntensity,
    pub notes: Option<String>,
}

impl NewCycle {
    /// Build an actual cycle. `previous_start` is the start of the user's most
    /// recent actual cycle beginning on or before this one, if any. A second
    /// cycle on that same start date is refused.
    pub fn into_record(self, user_id: Uuid, previous_start: Option<NaiveDate>) -> Result<CycleRecord> {
        check_notes(self.notes.as_deref(), MAX_CYCLE_NOTES)?;
        if previous_start == Some(self.start_date) {
            return Err(TrackerError::Validation(format!(
                "a cycle already starts on {}",
                self.start_date
            )));
        }

        let cycle_length = previous_start
            .map(|prev| days_between(prev, self.start_date))
            .transpose()?;

        Ok(CycleRecord {
            id: Uuid::new_v4(),
            user_id,
            start_date: self.start_date,
            end_date: self.end_date,
            cycle_length,
            period_length: period_length(self.start_date, self.end_date)?,
            flow_intensity: self.flow_intensity,
            notes: self.notes,
            is_predicted: false,
        })
    }
}

/// Partial edit of a stored cycle. Absent fields are left alone.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleUpdate {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub cycle_length: Option<u32>,
    pub flow_intensity: Option<FlowIntensity>,
    pub notes: Option<String>,
}

impl CycleUpdate {
    /// Apply to `record`, recomputing the period length when either end of
    /// the period moves. Leaves `record` untouched on error.
    pub fn apply(self, record: &mut CycleRecord) -> Result<()> {
        if let Some(notes) = &self.notes {
            check_notes(Some(notes.as_str()), MAX_CYCLE_NOTES)?;
        }
        if self.cycle_length == Some(0) {
            return Err(TrackerError::Validation(
                "cycle length must be at least one day".into(),
            ));
        }

        let start_date = self.start_date.unwrap_or(record.start_date);
        let end_date = self.end_date.or(record.end_date);
        let period_length = if self.start_date.is_some() || self.end_date.is_some() {
            period_length(start_date, end_date)?
        } else {
            record.period_length
        };

        record.start_date = start_date;
        record.end_date = end_date;
        record.period_length = period_length;
        if let Some(cycle_length) = self.cycle_length {
            record.cycle_length = Some(cycle_length);
        }
        if let Some(flow) = self.flow_intensity {
            record.flow_intensity = flow;
        }
        if self.notes.is_some() {
            record.notes = self.notes;
        }
        Ok(())
    }
}

/// Inclusive day span of a period, `None` while the end is unknown.
pub fn period_length(start: NaiveDate, end: Option<NaiveDate>) -> Result<Option<u32>> {
    match end {
        None => Ok(None),
        Some(end) if end < start => Err(TrackerError::Validation(format!(
            "end date {end} precedes start date {start}"
        ))),
        Some(end) => Ok(Some(days_between(start, end)? + 1)),
    }
}

fn days_between(earlier: NaiveDate, later: NaiveDate) -> Result<u32> {
    u32::try_from((later - earlier).num_days()).map_err(|_| {
        TrackerError::Validation(format!("{later} precedes {earlier}"))
    })
}
