//! Server-side timestamp assignment.

use chrono::{DateTime, Duration, Utc};
use std::sync::{Mutex, PoisonError};

/// Hands out write timestamps that never go backwards and never repeat
/// within one process, so "newest first" ordering is total.
#[derive(Debug, Default)]
pub struct ServerClock {
    last: Mutex<Option<DateTime<Utc>>>,
}

impl ServerClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> DateTime<Utc> {
        let mut last = self.last.lock().unwrap_or_else(PoisonError::into_inner);
        let mut now = Utc::now();
        if let Some(previous) = *last {
            if now <= previous {
                now = previous + Duration::microseconds(1);
            }
        }
        *last = Some(now);
        now
    }
}
