//! Rental period value object and the booking overlap rule.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A closed time interval `[start, end]` an item is booked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RentalPeriod {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl RentalPeriod {
    /// Build a period, returning `None` when `end` precedes `start`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Option<Self> {
        (end >= start).then_some(Self { start, end })
    }

    /// Two periods overlap when `self.start <= other.end && self.end >= other.start`.
    ///
    /// Both ends are inclusive: a booking ending at the exact instant another
    /// begins still conflicts with it.
    pub fn overlaps(&self, other: &RentalPeriod) -> bool {
        self.start <= other.end && self.end >= other.start
    }
}
