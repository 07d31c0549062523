//! Logging setup shared by the budget-orb binaries and tests.
//!
//! Everything here wraps `tracing-subscriber`: a human-readable formatter for
//! development, a JSON formatter for log shipping, and a file sink for the
//! interactive dashboard, which owns the terminal and cannot log to it.

pub mod logging;
