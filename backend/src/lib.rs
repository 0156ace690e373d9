//! LifeMode Backend Library
//!
//! This library exposes the backend modules for use in tests and the
//! training binary.

pub mod config;
pub mod error;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod training;
