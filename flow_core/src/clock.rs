//! Wall-clock hour source for the time-of-day palette.

use chrono::Timelike;

/// Supplies the current hour of day (0–23).
pub trait Clock {
    fn hour(&self) -> u32;
}

/// The host's local time.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn hour(&self) -> u32 {
        chrono::Local::now().hour()
    }
}

/// Always reports the same hour.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedClock(pub u32);

impl Clock for FixedClock {
    fn hour(&self) -> u32 {
        self.0 % 24
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_hour_in_range() {
        assert!(LocalClock.hour() < 24);
    }

    #[test]
    fn fixed_clock_wraps() {
        assert_eq!(FixedClock(8).hour(), 8);
        assert_eq!(FixedClock(26).hour(), 2);
    }
}
