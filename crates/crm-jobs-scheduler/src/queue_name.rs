//! Well-known queue names.
//!
//! Advisory only: any string is accepted as a queue, legality is up to the
//! execution engine.

/// Processed every run of the job runner.
pub const Q0: &str = "q0";

/// Processed every minute.
pub const Q1: &str = "q1";

/// Email sending, processed every run.
pub const E0: &str = "e0";

/// All well-known queue names.
pub const ALL: [&str; 3] = [Q0, Q1, E0];
