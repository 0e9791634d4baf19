//! Cancellable deadlines for the single-threaded event loop.
//!
//! Nothing here sleeps or spawns: the loop asks every timer for its deadline,
//! polls the terminal until the earliest one, then lets each timer decide
//! whether it fired. A cancelled timer has no deadline and never fires.

use std::time::{Duration, Instant};

/// A recurring deadline, like a browser `setInterval`.
#[derive(Debug)]
pub struct Interval {
    period: Duration,
    next: Option<Instant>,
}

/// A deadline that moves back every time it is triggered and fires once,
/// `delay` after the last trigger.
#[derive(Debug)]
pub struct Debounce {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Interval {
    pub fn new(period: Duration) -> Self {
        Interval { period, next: None }
    }

    pub fn start(&mut self, now: Instant) {
        self.next = Some(now + self.period);
    }

    pub fn cancel(&mut self) {
        self.next = None;
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.next
    }

    /// Pushes the pending deadline back by `by`. No effect when cancelled.
    pub fn postpone(&mut self, by: Duration) {
        self.next = self.next.map(|due| due + by);
    }

    /// Returns `true` at most once per call when the deadline has passed. The
    /// next period starts from `now`, so a late poll never produces a burst.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.next {
            Some(due) if due <= now => {
                self.next = Some(now + self.period);
                true
            }
            _ => false,
        }
    }
}

impl Debounce {
    pub fn new(delay: Duration) -> Self {
        Debounce { delay, deadline: None }
    }

    pub fn trigger(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(due) if due <= now => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// The earliest of a set of optional deadlines.
pub fn earliest<I>(deadlines: I) -> Option<Instant>
where
    I: IntoIterator<Item = Option<Instant>>,
{
    deadlines.into_iter().flatten().min()
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn interval_fires_once_per_period() {
        let t0 = Instant::now();
        let mut interval = Interval::new(100 * MS);
        assert!(!interval.fire(t0 + 500 * MS));

        interval.start(t0);
        assert!(!interval.fire(t0 + 99 * MS));
        assert!(interval.fire(t0 + 100 * MS));
        assert!(!interval.fire(t0 + 150 * MS));
        assert!(interval.fire(t0 + 200 * MS));
    }

    #[test]
    fn late_interval_does_not_burst() {
        let t0 = Instant::now();
        let mut interval = Interval::new(100 * MS);
        interval.start(t0);
        assert!(interval.fire(t0 + 1_000 * MS));
        assert!(!interval.fire(t0 + 1_050 * MS));
        assert_eq!(interval.deadline(), Some(t0 + 1_100 * MS));
    }

    #[test]
    fn cancelled_interval_never_fires() {
        let t0 = Instant::now();
        let mut interval = Interval::new(100 * MS);
        interval.start(t0);
        interval.cancel();
        assert_eq!(interval.deadline(), None);
        assert!(!interval.fire(t0 + 1_000 * MS));
    }

    #[test]
    fn postponed_interval_waits_once_then_keeps_its_period() {
        let t0 = Instant::now();
        let mut interval = Interval::new(100 * MS);
        interval.postpone(50 * MS);
        assert_eq!(interval.deadline(), None);

        interval.start(t0);
        interval.postpone(50 * MS);
        assert!(!interval.fire(t0 + 120 * MS));
        assert!(interval.fire(t0 + 150 * MS));
        assert_eq!(interval.deadline(), Some(t0 + 250 * MS));
    }

    #[test]
    fn debounce_restarts_on_every_trigger() {
        let t0 = Instant::now();
        let mut debounce = Debounce::new(150 * MS);
        debounce.trigger(t0);
        debounce.trigger(t0 + 100 * MS);
        assert!(!debounce.fire(t0 + 200 * MS));
        assert!(debounce.fire(t0 + 250 * MS));
        assert!(!debounce.fire(t0 + 400 * MS));
    }

    #[test]
    fn cancelled_debounce_never_fires() {
        let t0 = Instant::now();
        let mut debounce = Debounce::new(150 * MS);
        debounce.trigger(t0);
        debounce.cancel();
        assert!(!debounce.fire(t0 + 1_000 * MS));
    }

    #[test]
    fn earliest_skips_cancelled_timers() {
        let t0 = Instant::now();
        assert_eq!(earliest([None, Some(t0 + 5 * MS), Some(t0 + 2 * MS)]), Some(t0 + 2 * MS));
        assert_eq!(earliest([None, None]), None);
    }
}
