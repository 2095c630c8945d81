use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use super::{db_error, to_column};
use crate::error::{Result, TrackerError};
use crate::models::{SymptomEntry, SymptomLog};
use crate::records::symptom_log::validate;
use crate::records::{ensure_day_free, NewSymptomLog, SymptomLogUpdate};

/// Symptoms are kept as a JSONB array and parsed leniently, so an unknown name
/// is reported as a malformed record rather than a column decode failure.
#[derive(Debug, Deserialize)]
struct StoredSymptom {
    name: String,
    severity: i64,
}

#[derive(Debug, sqlx::FromRow)]
struct SymptomLogRow {
    id: Uuid,
    user_id: Uuid,
    logged_on: NaiveDate,
    symptoms: Json<Vec<StoredSymptom>>,
    mood: Option<String>,
    energy_level: Option<i16>,
    sleep_hours: Option<f64>,
    water_intake: i32,
    exercise: String,
    notes: Option<String>,
}

impl TryFrom<SymptomLogRow> for SymptomLog {
    type Error = TrackerError;

    fn try_from(row: SymptomLogRow) -> Result<Self> {
        let symptoms = row
            .symptoms
            .0
            .into_iter()
            .map(|s| -> Result<SymptomEntry> {
                Ok(SymptomEntry {
                    name: s.name.parse()?,
                    severity: u8::try_from(s.severity).map_err(|_| {
                        TrackerError::Malformed(format!("severity {} of {}", s.severity, s.name))
                    })?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let log = SymptomLog {
            id: row.id,
            user_id: row.user_id,
            date: row.logged_on,
            symptoms,
            mood: row.mood.as_deref().map(str::parse).transpose()?,
            energy_level: row
                .energy_level
                .map(|v| {
                    u8::try_from(v)
                        .map_err(|_| TrackerError::Malformed(format!("energy level {v}")))
                })
                .transpose()?,
            sleep_hours: row.sleep_hours,
            water_intake: u32::try_from(row.water_intake)
                .map_err(|_| TrackerError::Malformed(format!("water intake {}", row.water_intake)))?,
            exercise: row.exercise.parse()?,
            notes: row.notes,
        };

        validate(&log).map_err(|e| TrackerError::Malformed(format!("log {}: {e}", log.id)))?;
        Ok(log)
    }
}

fn into_logs(rows: Vec<SymptomLogRow>) -> Result<Vec<SymptomLog>> {
    rows.into_iter().map(SymptomLog::try_from).collect()
}

/// Every log of the user dated on or after `since`, newest first.
pub async fn logs_since(pool: &PgPool, user_id: Uuid, since: NaiveDate) -> Result<Vec<SymptomLog>> {
    let rows = sqlx::query_as::<_, SymptomLogRow>(
        r#"
        SELECT id, user_id, logged_on, symptoms, mood, energy_level, sleep_hours,
               water_intake, exercise, notes
        FROM symptom_logs
        WHERE user_id = $1 AND logged_on >= $2
        ORDER BY logged_on DESC
        "#,
    )
    .bind(user_id)
    .bind(since)
    .fetch_all(pool)
    .await
    .map_err(db_error("fetch symptom logs"))?;

    into_logs(rows)
}

pub async fn logs_on(pool: &PgPool, user_id: Uuid, day: NaiveDate) -> Result<Vec<SymptomLog>> {
    let rows = sqlx::query_as::<_, SymptomLogRow>(
        "SELECT id, user_id, logged_on, symptoms, mood, energy_level, sleep_hours,
                water_intake, exercise, notes
         FROM symptom_logs WHERE user_id = $1 AND logged_on = $2",
    )
    .bind(user_id)
    .bind(day)
    .fetch_all(pool)
    .await
    .map_err(db_error("fetch symptom log by day"))?;

    into_logs(rows)
}

pub async fn fetch_log(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<Option<SymptomLog>> {
    let row = sqlx::query_as::<_, SymptomLogRow>(
        "SELECT id, user_id, logged_on, symptoms, mood, energy_level, sleep_hours,
                water_intake, exercise, notes
         FROM symptom_logs WHERE id = $1 AND user_id = $2",
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
    .map_err(db_error("fetch symptom log"))?;

    row.map(SymptomLog::try_from).transpose()
}

/// Create the day's log. A second log on the same day is refused with the id
/// of the one already there.
pub async fn insert_log(pool: &PgPool, user_id: Uuid, input: NewSymptomLog, today: NaiveDate) -> Result<SymptomLog> {
    let log = input.into_log(user_id, today)?;
    ensure_day_free(log.date, &logs_on(pool, user_id, log.date).await?, None)?;

    let inserted = sqlx::query(
        "INSERT INTO symptom_logs
            (id, user_id, logged_on, symptoms, mood, energy_level, sleep_hours,
             water_intake, exercise, notes)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
    )
    .bind(log.id)
    .bind(log.user_id)
    .bind(log.date)
    .bind(Json(&log.symptoms))
    .bind(log.mood.map(|m| m.as_str()))
    .bind(log.energy_level.map(i16::from))
    .bind(log.sleep_hours)
    .bind(to_column("water_intake", log.water_intake)?)
    .bind(log.exercise.as_str())
    .bind(log.notes.as_deref())
    .execute(pool)
    .await;
    if let Err(e) = inserted {
        return Err(day_conflict(pool, user_id, log.date, None, e, "insert symptom log").await);
    }

    tracing::info!(log = %log.id, day = %log.date, symptoms = log.symptoms.len(), "symptoms logged");
    Ok(log)
}

pub async fn update_log(pool: &PgPool, user_id: Uuid, id: Uuid, update: SymptomLogUpdate) -> Result<SymptomLog> {
    let mut log = fetch_log(pool, user_id, id)
        .await?
        .ok_or(TrackerError::NotFound("Log"))?;
    let original_day = log.date;
    update.apply(&mut log)?;

    if log.date != original_day {
        ensure_day_free(log.date, &logs_on(pool, user_id, log.date).await?, Some(log.id))?;
    }

    let updated = sqlx::query(
        "UPDATE symptom_logs
         SET logged_on = $3, symptoms = $4, mood = $5, energy_level = $6, sleep_hours = $7,
             water_intake = $8, exercise = $9, notes = $10
         WHERE id = $1 AND user_id = $2",
    )
    .bind(log.id)
    .bind(user_id)
    .bind(log.date)
    .bind(Json(&log.symptoms))
    .bind(log.mood.map(|m| m.as_str()))
    .bind(log.energy_level.map(i16::from))
    .bind(log.sleep_hours)
    .bind(to_column("water_intake", log.water_intake)?)
    .bind(log.exercise.as_str())
    .bind(log.notes.as_deref())
    .execute(pool)
    .await;
    if let Err(e) = updated {
        return Err(day_conflict(pool, user_id, log.date, Some(log.id), e, "update symptom log").await);
    }

    Ok(log)
}

/// A concurrent write can claim the day between `ensure_day_free` and the
/// write itself; the unique constraint catches it and it is reported the same
/// way as the up-front check.
async fn day_conflict(
    pool: &PgPool,
    user_id: Uuid,
    day: NaiveDate,
    except: Option<Uuid>,
    err: sqlx::Error,
    context: &'static str,
) -> TrackerError {
    let unique_violation = err
        .as_database_error()
        .is_some_and(|db_err| db_err.is_unique_violation());
    if unique_violation {
        match logs_on(pool, user_id, day).await {
            Ok(existing) => {
                if let Err(duplicate) = ensure_day_free(day, &existing, except) {
                    return duplicate;
                }
            }
            Err(lookup) => return lookup,
        }
    }
    db_error(context)(err)
}

pub async fn delete_log(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<()> {
    let result = sqlx::query("DELETE FROM symptom_logs WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await
        .map_err(db_error("delete symptom log"))?;

    if result.rows_affected() == 0 {
        return Err(TrackerError::NotFound("Log"));
    }
    Ok(())
}
