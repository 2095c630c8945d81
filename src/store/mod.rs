//! PostgreSQL persistence. Every query is scoped by `user_id`; rows are turned
//! into domain records with `TryFrom`, so a corrupt row surfaces as
//! `TrackerError::Malformed` instead of reaching the insights.

pub mod cycles;
pub mod symptoms;

use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::config::Config;
use crate::error::{Result, TrackerError};

pub async fn connect(config: &Config) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await
        .map_err(db_error("connect"))?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("🧠 Database ready ({} max connections)", config.max_connections);

    Ok(pool)
}

/// Log a failed query the same way for every call site, then wrap it.
fn db_error(context: &'static str) -> impl Fn(sqlx::Error) -> TrackerError {
    move |e| {
        if let Some(db_err) = e.as_database_error() {
            tracing::error!("❌ {} failed: {}", context, db_err.message());

            if let Some(code) = db_err.code() {
                tracing::info!("ℹ️ SQLSTATE code: {}", code);
            }

            if let Some(constraint) = db_err.constraint() {
                tracing::info!("🔒 Constraint violated: {}", constraint);
            }
        } else {
            tracing::error!("❌ {} failed: {}", context, e);
        }
        TrackerError::Database(e)
    }
}

fn day_count(column: &str, value: i32) -> Result<u32> {
    u32::try_from(value)
        .map_err(|_| TrackerError::Malformed(format!("{column} is negative ({value})")))
}

fn to_column(column: &str, value: u32) -> Result<i32> {
    i32::try_from(value)
        .map_err(|_| TrackerError::Validation(format!("{column} too large ({value})")))
}
