pub mod config;
pub mod error;
pub mod insights;
pub mod models;
pub mod records;
pub mod report;
pub mod store;

pub use error::{Result, TrackerError};
