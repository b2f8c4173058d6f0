//! Core engine for the public job board: posting lifecycle, listing
//! visibility, hiring reports, and intake notifications.
//!
//! The HTTP surface lives in [`jobs::router`]; the deployable binary in
//! `services/api` wires it to a store, telemetry, and metrics.

pub mod config;
pub mod error;
pub mod jobs;
pub mod telemetry;
