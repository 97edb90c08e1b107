//! Calendar day windows.

use chrono::{DateTime, Days, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, TimeZone, Utc};

/// A run of consecutive calendar days ending at `end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    end: NaiveDate,
    len: u32,
}

impl DayWindow {
    /// A window covering a single day.
    #[must_use]
    pub fn single(day: NaiveDate) -> Self {
        Self { end: day, len: 1 }
    }

    /// A window covering `len` days up to and including `end`.
    ///
    /// A zero length is treated as one day.
    #[must_use]
    pub fn trailing(end: NaiveDate, len: u32) -> Self {
        Self {
            end,
            len: len.max(1),
        }
    }

    /// Today, in local time.
    #[must_use]
    pub fn today() -> Self {
        Self::single(Local::now().date_naive())
    }

    /// The most recent day of the window.
    #[must_use]
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of days in the window.
    #[must_use]
    pub fn len(&self) -> u32 {
        self.len
    }

    /// Always false; a window holds at least one day.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The days of the window, most recent first.
    #[must_use]
    pub fn days(&self) -> Vec<NaiveDate> {
        (0..u64::from(self.len))
            .map_while(|offset| self.end.checked_sub_days(Days::new(offset)))
            .collect()
    }

    /// Returns `[day 00:00:00, day 23:59:59]` in local time as UTC instants.
    #[must_use]
    pub fn bounds(day: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
        Self::bounds_in(day, &Local)
    }

    /// Returns `[day 00:00:00, day 23:59:59]` in `tz` as UTC instants.
    ///
    /// Both ends are inclusive. A wall-clock time skipped by a DST change
    /// resolves to the first valid instant after it.
    #[must_use]
    pub fn bounds_in<Tz: TimeZone>(day: NaiveDate, tz: &Tz) -> (DateTime<Utc>, DateTime<Utc>) {
        let start = day.and_time(NaiveTime::MIN);
        let end = day
            .and_hms_opt(23, 59, 59)
            .unwrap_or_else(|| day.and_time(NaiveTime::MIN));
        (resolve(tz, start, true), resolve(tz, end, false))
    }
}

fn resolve<Tz: TimeZone>(tz: &Tz, local: NaiveDateTime, earliest: bool) -> DateTime<Utc> {
    let mut candidate = local;
    // DST gaps are at most a couple of hours; step forward until valid.
    for _ in 0..4 {
        let resolved = tz.from_local_datetime(&candidate);
        let instant = if earliest {
            resolved.earliest()
        } else {
            resolved.latest()
        };
        if let Some(instant) = instant {
            return instant.with_timezone(&Utc);
        }
        candidate += TimeDelta::minutes(30);
    }
    Utc.from_utc_datetime(&local)
}
