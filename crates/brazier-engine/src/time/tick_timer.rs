use std::time::{Duration, Instant};

/// Nominal 60 Hz cadence.
pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_millis(16);

/// Periodic deadline source for the simulation tick.
///
/// Delivers at most one tick per poll. A late poll yields a single tick and
/// re-arms the deadline one period after *that* poll; missed periods are not
/// replayed, so a stalled loop makes the simulation run slower rather than
/// burst.
///
/// `Instant`s are passed in rather than read internally so the cadence is
/// testable without sleeping.
#[derive(Debug, Clone)]
pub struct TickTimer {
    period: Duration,
    next: Option<Instant>,
}

impl TickTimer {
    /// Creates a stopped timer with the given period.
    pub fn new(period: Duration) -> Self {
        debug_assert!(!period.is_zero(), "tick period must be non-zero");
        Self { period, next: None }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_running(&self) -> bool {
        self.next.is_some()
    }

    /// Starts (or restarts) the cadence; the first tick is due one period after `now`.
    pub fn start(&mut self, now: Instant) {
        self.next = Some(now + self.period);
    }

    /// Changes the period and restarts from `now`.
    pub fn restart_with(&mut self, period: Duration, now: Instant) {
        self.period = period;
        self.start(now);
    }

    /// Stops the cadence; polls return `false` until the next `start`.
    pub fn stop(&mut self) {
        self.next = None;
    }

    /// Next instant a tick is due, if running.
    pub fn deadline(&self) -> Option<Instant> {
        self.next
    }

    /// Returns `true` when a tick is due at `now` and re-arms the deadline.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.next {
            Some(due) if now >= due => {
                self.next = Some(now + self.period);
                true
            }
            _ => false,
        }
    }
}

impl Default for TickTimer {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_PERIOD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const P: Duration = DEFAULT_TICK_PERIOD;

    #[test]
    fn stopped_timer_never_fires() {
        let mut t = TickTimer::default();
        let now = Instant::now();
        assert!(!t.poll(now + P * 10));
        assert!(t.deadline().is_none());
    }

    #[test]
    fn fires_once_period_elapsed() {
        let mut t = TickTimer::default();
        let t0 = Instant::now();
        t.start(t0);

        assert!(!t.poll(t0 + P / 2));
        assert!(t.poll(t0 + P));
        assert_eq!(t.deadline(), Some(t0 + P * 2));
    }

    #[test]
    fn late_poll_does_not_catch_up() {
        let mut t = TickTimer::default();
        let t0 = Instant::now();
        t.start(t0);

        // Five periods late: exactly one tick, next deadline measured from the poll.
        let late = t0 + P * 5;
        assert!(t.poll(late));
        assert!(!t.poll(late));
        assert_eq!(t.deadline(), Some(late + P));
    }

    #[test]
    fn stop_freezes_cadence() {
        let mut t = TickTimer::default();
        let t0 = Instant::now();
        t.start(t0);
        t.stop();
        assert!(!t.is_running());
        assert!(!t.poll(t0 + P * 3));
    }

    #[test]
    fn restart_with_changes_period() {
        let mut t = TickTimer::default();
        let t0 = Instant::now();
        t.restart_with(Duration::from_millis(100), t0);
        assert!(!t.poll(t0 + P));
        assert!(t.poll(t0 + Duration::from_millis(100)));
    }
}
