//! Grade computation for the Beninese school system.
//!
//! The [`grading`] module holds the pure averaging rules; [`grading::bulletin`]
//! assembles report cards on top of it and exposes them over HTTP.

pub mod config;
pub mod error;
pub mod grading;
pub mod telemetry;
