//! Time utilities for the Cambio pipeline.

use chrono::{DateTime, Utc};

/// A timestamp with timezone (always UTC for Cambio).
pub type Timestamp = DateTime<Utc>;

/// Get the current timestamp.
pub fn now() -> Timestamp {
    Utc::now()
}
