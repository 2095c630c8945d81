use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use super::{day_count, db_error, to_column};
use crate::error::{Result, TrackerError};
use crate::models::CycleRecord;
use crate::records::{CycleUpdate, NewCycle};

#[derive(Debug, sqlx::FromRow)]
struct CycleRow {
    id: Uuid,
    user_id: Uuid,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
    cycle_length: Option<i32>,
    period_length: Option<i32>,
    flow_intensity: String,
    notes: Option<String>,
    is_predicted: bool,
}

impl TryFrom<CycleRow> for CycleRecord {
    type Error = TrackerError;

    fn try_from(row: CycleRow) -> Result<Self> {
        if let Some(end) = row.end_date {
            if end < row.start_date {
                return Err(TrackerError::Malformed(format!(
                    "cycle {} ends {} before it starts {}",
                    row.id, end, row.start_date
                )));
            }
        }

        Ok(CycleRecord {
            id: row.id,
            user_id: row.user_id,
            start_date: row.start_date,
            end_date: row.end_date,
            cycle_length: row
                .cycle_length
                .map(|v| day_count("cycle_length", v))
                .transpose()?,
            period_length: row
                .period_length
                .map(|v| day_count("period_length", v))
                .transpose()?,
            flow_intensity: row.flow_intensity.parse()?,
            notes: row.notes,
            is_predicted: row.is_predicted,
        })
    }
}

fn into_records(rows: Vec<CycleRow>) -> Result<Vec<CycleRecord>> {
    rows.into_iter().map(CycleRecord::try_from).collect()
}

/// The user's most recent actual cycles, newest first.
pub async fn recent_actual_cycles(pool: &PgPool, user_id: Uuid, limit: u32) -> Result<Vec<CycleRecord>> {
    let rows = sqlx::query_as::<_, CycleRow>(
        r#"
        SELECT id, user_id, start_date, end_date, cycle_length, period_length,
               flow_intensity, notes, is_predicted
        FROM cycles
        WHERE user_id = $1 AND is_predicted = FALSE
        ORDER BY start_date DESC
        LIMIT $2
        "#,
    )
    .bind(user_id)
    .bind(i64::from(limit))
    .fetch_all(pool)
    .await
    .map_err(db_error("fetch recent cycles"))?;

    into_records(rows)
}

/// Start of the latest actual cycle beginning on or before `date`.
pub async fn latest_actual_start_on_or_before(
    pool: &PgPool,
    user_id: Uuid,
    date: NaiveDate,
) -> Result<Option<NaiveDate>> {
    sqlx::query_scalar::<_, NaiveDate>(
        "SELECT start_date FROM cycles
         WHERE user_id = $1 AND is_predicted = FALSE AND start_date <= $2
         ORDER BY start_date DESC
         LIMIT 1",
    )
    .bind(user_id)
    .bind(date)
    .fetch_optional(pool)
    .await
    .map_err(db_error("fetch previous cycle"))
}

pub async fn fetch_cycle(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<Option<CycleRecord>> {
    let row = sqlx::query_as::<_, CycleRow>(
        "SELECT id, user_id, start_date, end_date, cycle_length, period_length,
                flow_intensity, notes, is_predicted
         FROM cycles WHERE id = $1 AND user_id = $2",
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
    .map_err(db_error("fetch cycle"))?;

    row.map(CycleRecord::try_from).transpose()
}

/// Log an actual cycle, deriving its lengths from the previous actual cycle.
pub async fn insert_cycle(pool: &PgPool, user_id: Uuid, cycle: NewCycle) -> Result<CycleRecord> {
    let previous = latest_actual_start_on_or_before(pool, user_id, cycle.start_date).await?;
    let record = cycle.into_record(user_id, previous)?;

    sqlx::query(
        "INSERT INTO cycles
            (id, user_id, start_date, end_date, cycle_length, period_length,
             flow_intensity, notes, is_predicted)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
    )
    .bind(record.id)
    .bind(record.user_id)
    .bind(record.start_date)
    .bind(record.end_date)
    .bind(optional_column("cycle_length", record.cycle_length)?)
    .bind(optional_column("period_length", record.period_length)?)
    .bind(record.flow_intensity.as_str())
    .bind(record.notes.as_deref())
    .bind(record.is_predicted)
    .execute(pool)
    .await
    .map_err(db_error("insert cycle"))?;

    tracing::info!(cycle = %record.id, cycle_length = ?record.cycle_length, "cycle logged");
    Ok(record)
}

/// Edit one of the user's cycles. Other cycles keep their stored lengths.
pub async fn update_cycle(pool: &PgPool, user_id: Uuid, id: Uuid, update: CycleUpdate) -> Result<CycleRecord> {
    let mut record = fetch_cycle(pool, user_id, id)
        .await?
        .ok_or(TrackerError::NotFound("Cycle"))?;
    update.apply(&mut record)?;

    sqlx::query(
        "UPDATE cycles
         SET start_date = $3, end_date = $4, cycle_length = $5, period_length = $6,
             flow_intensity = $7, notes = $8
         WHERE id = $1 AND user_id = $2",
    )
    .bind(record.id)
    .bind(user_id)
    .bind(record.start_date)
    .bind(record.end_date)
    .bind(optional_column("cycle_length", record.cycle_length)?)
    .bind(optional_column("period_length", record.period_length)?)
    .bind(record.flow_intensity.as_str())
    .bind(record.notes.as_deref())
    .execute(pool)
    .await
    .map_err(db_error("update cycle"))?;

    Ok(record)
}

pub async fn delete_cycle(pool: &PgPool, user_id: Uuid, id: Uuid) -> Result<()> {
    let result = sqlx::query("DELETE FROM cycles WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await
        .map_err(db_error("delete cycle"))?;

    match result.rows_affected() {
        0 => Err(TrackerError::NotFound("Cycle")),
        _ => Ok(()),
    }
}

fn optional_column(column: &str, value: Option<u32>) -> Result<Option<i32>> {
    value.map(|v| to_column(column, v)).transpose()
}
