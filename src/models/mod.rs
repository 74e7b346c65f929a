//! Data models
//!
//! Report structures produced by a benchmark run.

pub mod result;

pub use result::{Measurement, RunReport, TrialSeries};
