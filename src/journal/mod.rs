//! Derived views over a user's journal entries: check-in streaks and the
//! per-day calendar. Everything here is pure; handlers fetch the rows and
//! pass them in together with the reference time.

pub mod calendar;
pub mod day;
pub mod streak;

pub use calendar::{aggregate_month, CalendarMonth, DayBucket, DaySlot, InvalidRange, MonthCalendar};
pub use day::DayBoundary;
pub use streak::{calculate_streak, StreakResult};
