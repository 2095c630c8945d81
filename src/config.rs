use std::{env, fmt::Display, str::FromStr};

use tracing::info;

use crate::error::{Result, TrackerError};
use crate::insights::symptoms::DEFAULT_WINDOW_DAYS;

pub struct Config {
    pub database_url: String,
    pub max_connections: u32,
    /// Trailing window for symptom statistics.
    pub symptom_window_days: i64,
    /// Actual cycles summarised by the cycle statistics.
    pub cycle_stats_limit: u32,
    /// Actual cycles handed to the predictor.
    pub prediction_history: u32,
}

impl Config {
    /// Read from the process environment. Call `dotenvy::dotenv()` first to
    /// pick up a `.env` file.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .map_err(|_| TrackerError::Config("DATABASE_URL must be set".into()))?,
            max_connections: load("DATABASE_MAX_CONNECTIONS", 5)?,
            symptom_window_days: load("SYMPTOM_WINDOW_DAYS", DEFAULT_WINDOW_DAYS)?,
            cycle_stats_limit: load("CYCLE_STATS_LIMIT", 12)?,
            prediction_history: load("PREDICTION_HISTORY", 6)?,
        })
    }
}

fn load<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr + Display,
    T::Err: Display,
{
    parse_var(key, env::var(key).ok(), default)
}

fn parse_var<T>(key: &str, raw: Option<String>, default: T) -> Result<T>
where
    T: FromStr + Display,
    T::Err: Display,
{
    match raw {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| TrackerError::Config(format!("invalid {key} value `{raw}`: {e}"))),
        None => {
            info!("{key} not set, using default: {default}");
            Ok(default)
        }
    }
}
