//! Store round trips against a real database. Run with
//! `DATABASE_URL=postgres://... cargo test -- --ignored`; each test gets a
//! fresh database with the crate's migrations applied.

use blosom_backend::config::Config;
use blosom_backend::insights::Confidence;
use blosom_backend::models::{Mood, SymptomName};
use blosom_backend::records::{CycleUpdate, NewCycle, NewSymptomEntry, NewSymptomLog, SymptomLogUpdate};
use blosom_backend::store::{cycles, symptoms};
use blosom_backend::{report, TrackerError};
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn new_cycle(start: &str, end: Option<&str>) -> NewCycle {
    NewCycle {
        start_date: date(start),
        end_date: end.map(date),
        flow_intensity: Default::default(),
        notes: None,
    }
}

fn new_log(day: &str, symptoms: &[(SymptomName, u8)]) -> NewSymptomLog {
    NewSymptomLog {
        date: Some(date(day)),
        symptoms: symptoms
            .iter()
            .map(|&(name, severity)| NewSymptomEntry {
                name,
                severity: Some(severity),
            })
            .collect(),
        ..NewSymptomLog::default()
    }
}

async fn log_cycles(pool: &PgPool, user: Uuid, starts: &[&str]) {
    for start in starts {
        cycles::insert_cycle(pool, user, new_cycle(start, None)).await.unwrap();
    }
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL and a local Postgres"]
async fn insert_derives_lengths_from_previous_actual_cycle(pool: PgPool) {
    let user = Uuid::new_v4();
    let first = cycles::insert_cycle(&pool, user, new_cycle("2026-01-01", Some("2026-01-05")))
        .await
        .unwrap();
    assert_eq!(first.cycle_length, None);
    assert_eq!(first.period_length, Some(5));

    let second = cycles::insert_cycle(&pool, user, new_cycle("2026-01-29", None)).await.unwrap();
    assert_eq!(second.cycle_length, Some(28));

    let stored = cycles::fetch_cycle(&pool, user, second.id).await.unwrap().unwrap();
    assert_eq!(stored, second);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL and a local Postgres"]
async fn repeated_start_date_is_refused(pool: PgPool) {
    let user = Uuid::new_v4();
    log_cycles(&pool, user, &["2026-01-01", "2026-01-29", "2026-02-26"]).await;

    let err = cycles::insert_cycle(&pool, user, new_cycle("2026-02-26", None))
        .await
        .unwrap_err();
    assert!(matches!(err, TrackerError::Validation(_)));

    let recent = cycles::recent_actual_cycles(&pool, user, 12).await.unwrap();
    assert_eq!(recent.len(), 3);
    assert!(recent.iter().all(|c| c.cycle_length != Some(0)));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL and a local Postgres"]
async fn cycles_are_scoped_to_their_owner(pool: PgPool) {
    let owner = Uuid::new_v4();
    let stranger = Uuid::new_v4();
    let cycle = cycles::insert_cycle(&pool, owner, new_cycle("2026-01-01", None)).await.unwrap();

    assert_eq!(cycles::fetch_cycle(&pool, stranger, cycle.id).await.unwrap(), None);
    assert!(cycles::recent_actual_cycles(&pool, stranger, 12).await.unwrap().is_empty());
    assert!(matches!(
        cycles::update_cycle(&pool, stranger, cycle.id, CycleUpdate::default()).await,
        Err(TrackerError::NotFound("Cycle"))
    ));
    assert!(matches!(
        cycles::delete_cycle(&pool, stranger, cycle.id).await,
        Err(TrackerError::NotFound("Cycle"))
    ));

    // the owner's history never feeds a stranger's lengths
    let other = cycles::insert_cycle(&pool, stranger, new_cycle("2026-01-20", None)).await.unwrap();
    assert_eq!(other.cycle_length, None);
    assert!(cycles::fetch_cycle(&pool, owner, cycle.id).await.unwrap().is_some());
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL and a local Postgres"]
async fn editing_one_cycle_leaves_the_others_alone(pool: PgPool) {
    let user = Uuid::new_v4();
    log_cycles(&pool, user, &["2026-01-01", "2026-01-29", "2026-02-28"]).await;
    let before = cycles::recent_actual_cycles(&pool, user, 12).await.unwrap();
    let middle = before[1].id;

    let edited = cycles::update_cycle(
        &pool,
        user,
        middle,
        CycleUpdate {
            start_date: Some(date("2026-01-27")),
            end_date: Some(date("2026-01-31")),
            ..CycleUpdate::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(edited.period_length, Some(5));
    assert_eq!(edited.cycle_length, Some(28));

    let after = cycles::recent_actual_cycles(&pool, user, 12).await.unwrap();
    assert_eq!(after[0], before[0]);
    assert_eq!(after[2], before[2]);
    assert_eq!(after[1], edited);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL and a local Postgres"]
async fn deleted_cycle_is_gone(pool: PgPool) {
    let user = Uuid::new_v4();
    let cycle = cycles::insert_cycle(&pool, user, new_cycle("2026-01-01", None)).await.unwrap();

    cycles::delete_cycle(&pool, user, cycle.id).await.unwrap();
    assert_eq!(cycles::fetch_cycle(&pool, user, cycle.id).await.unwrap(), None);
    assert!(matches!(
        cycles::delete_cycle(&pool, user, cycle.id).await,
        Err(TrackerError::NotFound("Cycle"))
    ));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL and a local Postgres"]
async fn second_log_on_a_day_names_the_first(pool: PgPool) {
    let user = Uuid::new_v4();
    let today = date("2026-10-16");
    let first = symptoms::insert_log(&pool, user, new_log("2026-10-16", &[]), today)
        .await
        .unwrap();

    match symptoms::insert_log(&pool, user, new_log("2026-10-16", &[]), today).await {
        Err(TrackerError::DuplicateDay { day, existing }) => {
            assert_eq!(day, today);
            assert_eq!(existing, first.id);
        }
        other => panic!("expected a duplicate day, got {other:?}"),
    }

    // another user's log on the same day is fine
    symptoms::insert_log(&pool, Uuid::new_v4(), new_log("2026-10-16", &[]), today)
        .await
        .unwrap();
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL and a local Postgres"]
async fn racing_logs_for_one_day_leave_a_single_winner(pool: PgPool) {
    let user = Uuid::new_v4();
    let today = date("2026-10-16");

    let (a, b) = tokio::join!(
        symptoms::insert_log(&pool, user, new_log("2026-10-16", &[]), today),
        symptoms::insert_log(&pool, user, new_log("2026-10-16", &[]), today),
    );
    let (winner, loser) = match (a, b) {
        (Ok(winner), Err(loser)) | (Err(loser), Ok(winner)) => (winner, loser),
        other => panic!("expected exactly one log to be written, got {other:?}"),
    };
    assert!(matches!(
        loser,
        TrackerError::DuplicateDay { existing, .. } if existing == winner.id
    ));
    assert_eq!(symptoms::logs_on(&pool, user, today).await.unwrap().len(), 1);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL and a local Postgres"]
async fn moving_a_log_onto_a_taken_day_is_refused(pool: PgPool) {
    let user = Uuid::new_v4();
    let today = date("2026-10-16");
    let taken = symptoms::insert_log(&pool, user, new_log("2026-10-15", &[]), today)
        .await
        .unwrap();
    let log = symptoms::insert_log(&pool, user, new_log("2026-10-16", &[]), today)
        .await
        .unwrap();

    let err = symptoms::update_log(
        &pool,
        user,
        log.id,
        SymptomLogUpdate {
            date: Some(date("2026-10-15")),
            ..SymptomLogUpdate::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, TrackerError::DuplicateDay { existing, .. } if existing == taken.id));

    let edited = symptoms::update_log(
        &pool,
        user,
        log.id,
        SymptomLogUpdate {
            mood: Some(Mood::Great),
            ..SymptomLogUpdate::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(edited.mood, Some(Mood::Great));
    assert_eq!(symptoms::fetch_log(&pool, user, log.id).await.unwrap(), Some(edited));
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL and a local Postgres"]
async fn logs_are_scoped_to_their_owner(pool: PgPool) {
    let owner = Uuid::new_v4();
    let stranger = Uuid::new_v4();
    let today = date("2026-10-16");
    let log = symptoms::insert_log(&pool, owner, new_log("2026-10-16", &[]), today)
        .await
        .unwrap();

    assert_eq!(symptoms::fetch_log(&pool, stranger, log.id).await.unwrap(), None);
    assert!(symptoms::logs_since(&pool, stranger, date("2026-01-01")).await.unwrap().is_empty());
    assert!(matches!(
        symptoms::update_log(&pool, stranger, log.id, SymptomLogUpdate::default()).await,
        Err(TrackerError::NotFound("Log"))
    ));
    assert!(matches!(
        symptoms::delete_log(&pool, stranger, log.id).await,
        Err(TrackerError::NotFound("Log"))
    ));

    symptoms::delete_log(&pool, owner, log.id).await.unwrap();
    assert_eq!(symptoms::fetch_log(&pool, owner, log.id).await.unwrap(), None);
}

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL and a local Postgres"]
async fn report_reads_only_the_window(pool: PgPool) {
    let user = Uuid::new_v4();
    let today = date("2026-03-27");
    log_cycles(&pool, user, &["2026-01-01", "2026-01-29", "2026-02-28", "2026-03-26"]).await;
    symptoms::insert_log(&pool, user, new_log("2026-03-20", &[(SymptomName::Cramps, 4)]), today)
        .await
        .unwrap();
    symptoms::insert_log(&pool, user, new_log("2026-01-02", &[(SymptomName::Acne, 2)]), today)
        .await
        .unwrap();

    let config = Config {
        database_url: String::new(),
        max_connections: 1,
        symptom_window_days: 30,
        cycle_stats_limit: 12,
        prediction_history: 6,
    };
    let report = report::build(&pool, &config, user, 30, today).await.unwrap();

    let prediction = report.prediction.unwrap();
    assert_eq!(prediction.predicted_cycle_length, 28);
    assert_eq!(prediction.confidence, Confidence::High);
    assert_eq!(prediction.predicted_start_date, date("2026-04-23"));

    assert_eq!(report.cycle_stats.stats.unwrap().total_cycles_logged, 4);

    let symptom_stats = report.symptom_stats.stats.unwrap();
    assert_eq!(symptom_stats.total_logs_in_period, 1);
    assert_eq!(symptom_stats.top_symptoms[0].name, SymptomName::Cramps);
}
