use std::collections::BTreeMap;

use chrono::{Datelike, SecondsFormat};
use serde::Serialize;
use uuid::Uuid;

use super::day::DayBoundary;
use crate::models::journal_entry::CalendarRow;

pub const PREVIEW_CHARS: usize = 100;
pub const UNKNOWN_MOOD: &str = "Unknown";

const MIN_YEAR: i32 = 1900;
const MAX_YEAR: i32 = 2100;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid month or year: {month}/{year}")]
pub struct InvalidRange {
    pub month: i64,
    pub year: i64,
}

/// A validated (month, year) pair inside the supported policy bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarMonth {
    month: u32,
    year: i32,
}

impl CalendarMonth {
    pub fn new(month: i64, year: i64) -> Result<Self, InvalidRange> {
        let in_range = (1..=12).contains(&month)
            && (i64::from(MIN_YEAR)..=i64::from(MAX_YEAR)).contains(&year);
        if !in_range {
            return Err(InvalidRange { month, year });
        }
        Ok(Self {
            month: month as u32,
            year: year as i32,
        })
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn year(&self) -> i32 {
        self.year
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntrySummary {
    pub id: Uuid,
    pub time: String,
    pub mood: String,
    pub anxiety_level: i32,
    pub preview: String,
}

impl From<&CalendarRow> for EntrySummary {
    fn from(row: &CalendarRow) -> Self {
        let mood = match row.mood.as_deref() {
            Some(m) if !m.is_empty() => m.to_string(),
            _ => UNKNOWN_MOOD.to_string(),
        };
        Self {
            id: row.id,
            time: row.created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            mood,
            anxiety_level: row.anxiety_level.unwrap_or(0),
            preview: row
                .content
                .as_deref()
                .map(|c| c.chars().take(PREVIEW_CHARS).collect())
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayBucket {
    pub date: u32,
    pub has_entry: bool,
    pub entries: Vec<EntrySummary>,
}

/// Result of looking up one day of a [`MonthCalendar`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DaySlot<'a> {
    Empty,
    Entries(&'a DayBucket),
}

/// Sparse day-of-month -> bucket mapping. Serializes as a JSON object keyed
/// by day number; days without entries are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MonthCalendar {
    days: BTreeMap<u32, DayBucket>,
}

impl MonthCalendar {
    pub fn day(&self, day: u32) -> DaySlot<'_> {
        match self.days.get(&day) {
            Some(bucket) => DaySlot::Entries(bucket),
            None => DaySlot::Empty,
        }
    }

    pub fn days_with_entries(&self) -> impl Iterator<Item = u32> + '_ {
        self.days.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

/// Bucket the entries that fall in `month` by local day-of-month.
pub fn aggregate_month(rows: &[CalendarRow], month: CalendarMonth, days: &DayBoundary) -> MonthCalendar {
    let mut in_month: Vec<(u32, &CalendarRow)> = rows
        .iter()
        .filter_map(|row| {
            let date = days.local_date(row.created_at);
            (date.year() == month.year && date.month() == month.month).then(|| (date.day(), row))
        })
        .collect();
    in_month.sort_by_key(|(_, row)| row.created_at);

    let mut calendar = MonthCalendar::default();
    for (day, row) in in_month {
        calendar
            .days
            .entry(day)
            .or_insert_with(|| DayBucket {
                date: day,
                has_entry: true,
                entries: Vec::new(),
            })
            .entries
            .push(EntrySummary::from(row));
    }
    calendar
}
