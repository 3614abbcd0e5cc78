//! Time source
//!
//! Every time-dependent domain operation takes a `Clock`. The business
//! calendar (which date it is "today") is evaluated in the clock's UTC
//! offset, so daily and monthly limit resets follow local midnight.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Offset, Utc};

use super::YearMonth;

pub trait Clock {
    /// Current instant.
    fn now(&self) -> DateTime<Utc>;

    /// Offset of the business calendar.
    fn offset(&self) -> FixedOffset {
        Utc.fix()
    }

    /// Current business date.
    fn today(&self) -> NaiveDate {
        self.now().with_timezone(&self.offset()).date_naive()
    }

    /// Current business month.
    fn current_month(&self) -> YearMonth {
        YearMonth::from_date(self.today())
    }

    /// Business date of an arbitrary instant.
    fn date_of(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.offset()).date_naive()
    }
}

/// Wall-clock time in a fixed business offset.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    offset: FixedOffset,
}

impl SystemClock {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    pub fn utc() -> Self {
        Self { offset: Utc.fix() }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::utc()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn offset(&self) -> FixedOffset {
        self.offset
    }
}

/// A clock frozen at one instant. Used to replay persisted state and to
/// simulate date rollovers.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    now: DateTime<Utc>,
    offset: FixedOffset,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now,
            offset: Utc.fix(),
        }
    }

    pub fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = offset;
        self
    }

    /// A new clock moved forward by `by`.
    pub fn advance(&self, by: Duration) -> Self {
        Self {
            now: self.now + by,
            offset: self.offset,
        }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }

    fn offset(&self) -> FixedOffset {
        self.offset
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }

    fn offset(&self) -> FixedOffset {
        (**self).offset()
    }
}
