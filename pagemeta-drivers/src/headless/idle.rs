//! Network-idle detection over WebDriver.
//!
//! WebDriver exposes no network events, so the page is polled with
//! [`NETWORK_PROBE`]: the document ready state plus the number of finished
//! resource loads. The page counts as idle once it is `complete` and no new
//! resource has finished for the configured quiet window.

use serde::Deserialize;
use std::time::{Duration, Instant};

/// Script returning an [`IdleProbe`] as JSON.
pub const NETWORK_PROBE: &str = r#"
    return {
        ready_state: document.readyState,
        resources: performance.getEntriesByType('resource').length
    };
"#;

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct IdleProbe {
    pub ready_state: String,
    pub resources: u64,
}

#[derive(Debug, Clone)]
pub struct IdleTracker {
    quiet: Duration,
    complete: bool,
    last_resources: Option<u64>,
    last_change: Option<Instant>,
}

impl IdleTracker {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            complete: false,
            last_resources: None,
            last_change: None,
        }
    }

    /// Feed one probe sample; returns `true` once the page is idle.
    pub fn observe(&mut self, probe: &IdleProbe, now: Instant) -> bool {
        let complete = probe.ready_state == "complete";
        let changed =
            !complete || !self.complete || self.last_resources != Some(probe.resources);
        self.complete = complete;
        if changed {
            self.last_resources = Some(probe.resources);
            self.last_change = Some(now);
            return false;
        }
        self.last_change
            .is_some_and(|since| now.saturating_duration_since(since) >= self.quiet)
    }
}
