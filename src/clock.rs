//! Wall-clock access for signing and report timestamps.

use time::{OffsetDateTime, UtcOffset};

/// Source of the current time.
///
/// Signing needs UTC; report rows are stamped in the operator's local zone.
pub trait Clock: Send + Sync {
    fn now_utc(&self) -> OffsetDateTime;

    fn now_local(&self) -> OffsetDateTime {
        self.now_utc()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }

    fn now_local(&self) -> OffsetDateTime {
        // The local offset cannot always be determined (e.g. multi-threaded on
        // some unix targets); fall back to UTC rather than failing the run.
        OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
    }
}

/// A clock frozen at one instant, with an optional local offset.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    at: OffsetDateTime,
    local_offset: UtcOffset,
}

impl FixedClock {
    pub fn new(at: OffsetDateTime) -> Self {
        Self {
            at: at.to_offset(UtcOffset::UTC),
            local_offset: UtcOffset::UTC,
        }
    }

    pub fn with_local_offset(mut self, offset: UtcOffset) -> Self {
        self.local_offset = offset;
        self
    }
}

impl Clock for FixedClock {
    fn now_utc(&self) -> OffsetDateTime {
        self.at
    }

    fn now_local(&self) -> OffsetDateTime {
        self.at.to_offset(self.local_offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{datetime, offset};

    #[test]
    fn fixed_clock_shifts_local_time_only() {
        let clock = FixedClock::new(datetime!(2024-03-05 23:30:00 UTC)).with_local_offset(offset!(+9));
        assert_eq!(clock.now_utc(), datetime!(2024-03-05 23:30:00 UTC));
        assert_eq!(clock.now_local(), datetime!(2024-03-06 08:30:00 +9));
    }
}
