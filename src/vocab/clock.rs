//! Injectable time and identifier sources
//!
//! Scheduling and due filtering never read the wall clock directly; they ask
//! a [`Clock`]. New card ids come from an [`IdGenerator`].

use std::cell::Cell;
use std::rc::Rc;

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

/// Source of the current instant
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Source of fresh card identifiers
pub trait IdGenerator {
    fn new_id(&self) -> String;
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same instant, so a test can keep a handle while the
/// store owns another.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Rc::new(Cell::new(start)),
        }
    }

    pub fn set(&self, instant: DateTime<Utc>) {
        self.now.set(instant);
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }
}

/// Random v4 UUIDs
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn new_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Predictable ids of the form `{prefix}-{n}`, starting at 1
#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    next: Rc<Cell<u64>>,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: Rc::new(Cell::new(1)),
        }
    }
}

impl IdGenerator for SequentialIds {
    fn new_id(&self) -> String {
        let n = self.next.get();
        self.next.set(n + 1);
        format!("{}-{}", self.prefix, n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_clones_share_time() {
        let start = DateTime::<Utc>::UNIX_EPOCH;
        let clock = ManualClock::new(start);
        let handle = clock.clone();

        handle.advance(Duration::days(2));

        assert_eq!(clock.now(), start + Duration::days(2));
    }

    #[test]
    fn test_sequential_ids() {
        let ids = SequentialIds::new("w");
        assert_eq!(ids.new_id(), "w-1");
        assert_eq!(ids.new_id(), "w-2");
    }

    #[test]
    fn test_uuid_ids_are_unique() {
        let ids = UuidGenerator;
        assert_ne!(ids.new_id(), ids.new_id());
    }
}
