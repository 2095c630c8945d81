use anyhow::{Context, Result};
use blosom_backend::{config::Config, report, store};
use chrono::Utc;
use dotenvy::dotenv;
use std::env;
use uuid::Uuid;

const USAGE: &str = "usage: blosom_backend <user-id> [days]";

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = Config::from_env()?;

    let mut args = env::args().skip(1);
    let user_id: Uuid = args
        .next()
        .context(USAGE)?
        .parse()
        .context("user id must be a UUID")?;
    let days = match args.next() {
        Some(raw) => raw.parse().context("days must be a whole number")?,
        None => config.symptom_window_days,
    };

    let pool = store::connect(&config).await?;
    let today = Utc::now().date_naive();
    tracing::info!("🌸 Building report for {} over {} days", user_id, days);

    let report = report::build(&pool, &config, user_id, days, today).await?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
