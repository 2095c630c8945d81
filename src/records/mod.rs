//! Rules applied when records are created or edited, before they reach the
//! store: derived lengths, field validation and the one-log-per-day rule.

pub mod cycle;
pub mod symptom_log;

use chrono::{Days, NaiveDate};

use crate::error::{Result, TrackerError};

pub use cycle::{CycleUpdate, NewCycle};
pub use symptom_log::{ensure_day_free, NewSymptomEntry, NewSymptomLog, SymptomLogUpdate};

/// First day of a trailing window of `days` days ending today.
pub fn window_start(today: NaiveDate, days: i64) -> Result<NaiveDate> {
    let days = u64::try_from(days)
        .map_err(|_| TrackerError::Validation(format!("window of {days} days")))?;
    today
        .checked_sub_days(Days::new(days))
        .ok_or_else(|| TrackerError::DateOutOfRange(format!("{today} - {days} days")))
}

fn check_notes(notes: Option<&str>, limit: usize) -> Result<()> {
    match notes {
        Some(text) if text.chars().count() > limit => Err(TrackerError::Validation(format!(
            "notes cannot exceed {limit} characters"
        ))),
        _ => Ok(()),
    }
}
