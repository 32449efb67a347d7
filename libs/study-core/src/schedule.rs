//! Single-slot delayed action.
//!
//! Sessions hold one `PendingAction` and the host polls it with the current time.
//! Scheduling replaces whatever was pending; cancelling drops it unfired.

use chrono::{DateTime, Duration, Utc};

#[derive(Debug, Clone, PartialEq)]
struct Scheduled<A> {
    action: A,
    due: DateTime<Utc>,
}

/// Holds at most one action waiting for its deadline.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingAction<A> {
    slot: Option<Scheduled<A>>,
}

impl<A> Default for PendingAction<A> {
    fn default() -> Self {
        Self { slot: None }
    }
}

impl<A> PendingAction<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `action` to fire `delay_ms` after `now`, returning any action it displaced.
    pub fn schedule(&mut self, action: A, now: DateTime<Utc>, delay_ms: u32) -> Option<A> {
        let due = now + Duration::milliseconds(i64::from(delay_ms));
        self.slot
            .replace(Scheduled { action, due })
            .map(|previous| previous.action)
    }

    /// Drop the pending action, if any.
    pub fn cancel(&mut self) -> Option<A> {
        self.slot.take().map(|s| s.action)
    }

    pub fn is_pending(&self) -> bool {
        self.slot.is_some()
    }

    pub fn pending(&self) -> Option<&A> {
        self.slot.as_ref().map(|s| &s.action)
    }

    pub fn due_at(&self) -> Option<DateTime<Utc>> {
        self.slot.as_ref().map(|s| s.due)
    }

    /// Take the action if its deadline has passed.
    pub fn take_due(&mut self, now: DateTime<Utc>) -> Option<A> {
        let due = self.due_at()?;
        if due <= now {
            self.slot.take().map(|s| s.action)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap()
    }

    fn ms(n: i64) -> Duration {
        Duration::milliseconds(n)
    }

    #[test]
    fn fires_only_after_deadline() {
        let mut pending = PendingAction::new();
        pending.schedule("clear", t0(), 500);
        assert_eq!(pending.take_due(t0() + ms(499)), None);
        assert_eq!(pending.take_due(t0() + ms(500)), Some("clear"));
        assert!(!pending.is_pending());
    }

    #[test]
    fn fires_once() {
        let mut pending = PendingAction::new();
        pending.schedule("advance", t0(), 2000);
        assert_eq!(pending.take_due(t0() + ms(5000)), Some("advance"));
        assert_eq!(pending.take_due(t0() + ms(6000)), None);
    }

    #[test]
    fn reschedule_replaces() {
        let mut pending = PendingAction::new();
        pending.schedule("first", t0(), 500);
        let displaced = pending.schedule("second", t0() + ms(100), 500);
        assert_eq!(displaced, Some("first"));
        assert_eq!(pending.take_due(t0() + ms(550)), None);
        assert_eq!(pending.take_due(t0() + ms(600)), Some("second"));
    }

    #[test]
    fn cancel_prevents_firing() {
        let mut pending = PendingAction::new();
        pending.schedule("next", t0(), 1800);
        assert_eq!(pending.cancel(), Some("next"));
        assert_eq!(pending.take_due(t0() + ms(10_000)), None);
    }
}
