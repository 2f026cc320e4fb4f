//! Admission review core: grade normalisation, course equivalence, requirement
//! checks, transcript merging and merit-point averages.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
