//! Storage repositories
//!
//! Provides the data access layer for the daily log file.

pub mod daily_log;

pub use daily_log::DailyLogRepository;
