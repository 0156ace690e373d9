//! Business logic services
//!
//! Services encapsulate business logic and coordinate between
//! the engine, the risk model and the repositories.

pub mod analysis;
pub mod daily_log;

pub use analysis::AnalysisService;
pub use daily_log::DailyLogService;
