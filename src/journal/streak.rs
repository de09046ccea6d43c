use std::collections::BTreeSet;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use super::day::DayBoundary;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreakResult {
    pub streak: u32,
    pub last_check_in: Option<DateTime<Utc>>,
    pub total_entries: u64,
}

/// Count consecutive check-in days, anchored at the day of the most recent
/// entry. The streak is broken (0) once that day is more than one day before
/// today.
pub fn calculate_streak(
    timestamps: &[DateTime<Utc>],
    now: DateTime<Utc>,
    days: &DayBoundary,
) -> StreakResult {
    let Some(latest) = timestamps.iter().max().copied() else {
        return StreakResult::default();
    };

    let total_entries = timestamps.len() as u64;
    let latest_day = days.local_date(latest);
    let days_since_latest = (days.today(now) - latest_day).num_days();

    if days_since_latest > 1 {
        return StreakResult {
            streak: 0,
            last_check_in: Some(latest),
            total_entries,
        };
    }

    let distinct: BTreeSet<_> = timestamps.iter().map(|ts| days.local_date(*ts)).collect();

    let mut streak = 0u32;
    let mut expected = latest_day;
    for day in distinct.iter().rev() {
        if *day != expected {
            break;
        }
        streak += 1;
        expected -= Duration::days(1);
    }

    StreakResult {
        streak,
        last_check_in: Some(latest),
        total_entries,
    }
}
