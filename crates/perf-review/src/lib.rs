//! Performance review scoring engine.
//!
//! Managers score employees against rubric metrics, HR normalizes each scoring period across
//! manager cohorts, applies adjustment terms, and publishes the final grade. The numeric pipeline
//! lives in [`review::scoring`]; the rest of the crate is the storage seam, service facade, and
//! HTTP surface the host application wires together.

pub mod config;
pub mod error;
pub mod review;
pub mod telemetry;
