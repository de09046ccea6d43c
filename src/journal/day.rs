use chrono::{DateTime, Duration, FixedOffset, Local, NaiveDate, NaiveTime, Utc};

/// Where a calendar day starts and ends for streaks and calendar buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayBoundary {
    /// Wall-clock midnight in the server's local timezone.
    Local,
    /// Midnight at a pinned UTC offset.
    Fixed(FixedOffset),
}

impl Default for DayBoundary {
    fn default() -> Self {
        Self::Local
    }
}

impl DayBoundary {
    /// Build from an offset in minutes east of UTC. `None` means server local time.
    pub fn from_offset_minutes(minutes: Option<i32>) -> Option<Self> {
        match minutes {
            None => Some(Self::Local),
            Some(m) => FixedOffset::east_opt(m.checked_mul(60)?).map(Self::Fixed),
        }
    }

    pub fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        match self {
            Self::Local => instant.with_timezone(&Local).date_naive(),
            Self::Fixed(offset) => instant.with_timezone(offset).date_naive(),
        }
    }

    pub fn today(&self, now: DateTime<Utc>) -> NaiveDate {
        self.local_date(now)
    }
}

/// UTC window `[start, end)` that contains every instant whose local date can
/// fall in the given month, for any offset within a day of UTC.
///
/// Used to narrow the database query; exact month membership is decided by
/// [`DayBoundary::local_date`].
pub fn month_fetch_window(year: i32, month: u32) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };

    let start = (first - Duration::days(1)).and_time(NaiveTime::MIN).and_utc();
    let end = (next + Duration::days(1)).and_time(NaiveTime::MIN).and_utc();
    Some((start, end))
}
