use std::time::{Duration, Instant};

pub const DEFAULT_DEBOUNCE_MS: u64 = 100;

/// Collapses bursts of target key presses into one logical trigger.
///
/// Keyboard hardware and OS key repeat can deliver several key-down events for one physical
/// press. Once a trigger has been accepted, further triggers are rejected until `min_interval`
/// has elapsed. There is no timer behind this: the gate is only evaluated when a key event
/// arrives.
#[derive(Debug, Clone)]
pub struct DebounceGate {
    min_interval: Duration,
    /// `None` while idle, i.e. no trigger has been accepted yet.
    last_accepted: Option<Instant>,
}

impl Default for DebounceGate {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_DEBOUNCE_MS))
    }
}

impl DebounceGate {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_accepted: None,
        }
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    pub fn last_accepted(&self) -> Option<Instant> {
        self.last_accepted
    }

    /// Whether a trigger observed at `now` should be acted upon.
    ///
    /// A `now` earlier than the last acceptance counts as no time elapsed.
    pub fn should_accept(&self, now: Instant) -> bool {
        match self.last_accepted {
            None => true,
            Some(last) => now.saturating_duration_since(last) > self.min_interval,
        }
    }

    /// Must be called after `should_accept` returned true and the trigger was acted upon.
    pub fn record_accepted(&mut self, now: Instant) {
        self.last_accepted = Some(now);
    }
}
