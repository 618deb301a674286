use chrono::{DateTime, Local, TimeZone};

/// Source of "now".
///
/// The zone of the returned reading is the calendar every boundary is
/// computed in. Callers read the clock once per operation.
pub trait Clock {
    type Zone: TimeZone;

    fn now(&self) -> DateTime<Self::Zone>;
}

/// Wall clock in the host's local zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    type Zone = Local;

    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone)]
pub struct FixedClock<Tz: TimeZone> {
    now: DateTime<Tz>,
}

impl<Tz: TimeZone> FixedClock<Tz> {
    pub fn new(now: DateTime<Tz>) -> Self {
        Self { now }
    }
}

impl<Tz: TimeZone> Clock for FixedClock<Tz> {
    type Zone = Tz;

    fn now(&self) -> DateTime<Tz> {
        self.now.clone()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    type Zone = C::Zone;

    fn now(&self) -> DateTime<C::Zone> {
        (**self).now()
    }
}
