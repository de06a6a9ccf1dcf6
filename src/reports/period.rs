//! Report periods
//!
//! The aggregation functions take explicit instants. This module maps the
//! periods people ask for (today, this week, this month) onto those instants.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc, Weekday};
use std::fmt;

/// An inclusive time window `[start, end]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ReportWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// A window that contains every instant
    pub fn all_time() -> Self {
        Self {
            start: DateTime::<Utc>::MIN_UTC,
            end: DateTime::<Utc>::MAX_UTC,
        }
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at <= self.end
    }
}

impl fmt::Display for ReportWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::all_time() {
            return write!(f, "all time");
        }
        write!(
            f,
            "{} to {}",
            self.start.format("%Y-%m-%d %H:%M"),
            self.end.format("%Y-%m-%d %H:%M")
        )
    }
}

/// The period a report covers, relative to an anchor date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportPeriod {
    Day,
    Week,
    #[default]
    Month,
    All,
}

impl ReportPeriod {
    /// Parse a period name: day, week, month or all
    pub fn parse(s: &str) -> Result<Self, PeriodParseError> {
        match s.trim().to_lowercase().as_str() {
            "day" | "d" | "today" => Ok(Self::Day),
            "week" | "w" => Ok(Self::Week),
            "month" | "m" => Ok(Self::Month),
            "all" | "a" => Ok(Self::All),
            _ => Err(PeriodParseError::Unknown(s.trim().to_string())),
        }
    }

    /// The window of this period containing `anchor`
    ///
    /// Weeks start on `week_start`. The end is one nanosecond before the next
    /// period begins, so consecutive windows never overlap.
    pub fn window(&self, anchor: NaiveDate, week_start: Weekday) -> ReportWindow {
        let (first, next) = match self {
            Self::Day => (anchor, anchor + Duration::days(1)),
            Self::Week => {
                let offset = (anchor.weekday().num_days_from_sunday() + 7
                    - week_start.num_days_from_sunday())
                    % 7;
                let first = anchor - Duration::days(i64::from(offset));
                (first, first + Duration::days(7))
            }
            Self::Month => {
                let first = month_start(anchor);
                (first, month_start(first + Duration::days(31)))
            }
            Self::All => return ReportWindow::all_time(),
        };

        ReportWindow::new(
            start_of_day(first),
            start_of_day(next) - Duration::nanoseconds(1),
        )
    }
}

impl fmt::Display for ReportPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Day => write!(f, "Day"),
            Self::Week => write!(f, "Week"),
            Self::Month => write!(f, "Month"),
            Self::All => write!(f, "All time"),
        }
    }
}

/// Map a settings value (0 = Sunday, 1 = Monday, ...) to a weekday
pub fn weekday_from_index(index: u8) -> Weekday {
    match index % 7 {
        0 => Weekday::Sun,
        1 => Weekday::Mon,
        2 => Weekday::Tue,
        3 => Weekday::Wed,
        4 => Weekday::Thu,
        5 => Weekday::Fri,
        _ => Weekday::Sat,
    }
}

fn month_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.day0()))
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

/// Error type for period parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeriodParseError {
    Unknown(String),
}

impl fmt::Display for PeriodParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown(s) => write!(
                f,
                "Unknown report period '{}'. Use day, week, month or all",
                s
            ),
        }
    }
}

impl std::error::Error for PeriodParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn midnight(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_day_window() {
        let window = ReportPeriod::Day.window(ymd(2025, 3, 14), Weekday::Mon);
        assert_eq!(window.start, midnight(2025, 3, 14));
        assert!(window.contains(midnight(2025, 3, 15) - Duration::nanoseconds(1)));
        assert!(!window.contains(midnight(2025, 3, 15)));
    }

    #[test]
    fn test_week_window_respects_first_day() {
        // 2025-03-14 is a Friday
        let monday = ReportPeriod::Week.window(ymd(2025, 3, 14), Weekday::Mon);
        assert_eq!(monday.start, midnight(2025, 3, 10));
        assert!(!monday.contains(midnight(2025, 3, 17)));

        let sunday = ReportPeriod::Week.window(ymd(2025, 3, 14), Weekday::Sun);
        assert_eq!(sunday.start, midnight(2025, 3, 9));

        let on_start = ReportPeriod::Week.window(ymd(2025, 3, 10), Weekday::Mon);
        assert_eq!(on_start.start, midnight(2025, 3, 10));
    }

    #[test]
    fn test_month_window() {
        let feb = ReportPeriod::Month.window(ymd(2024, 2, 29), Weekday::Mon);
        assert_eq!(feb.start, midnight(2024, 2, 1));
        assert!(feb.contains(midnight(2024, 2, 29)));
        assert!(!feb.contains(midnight(2024, 3, 1)));

        let dec = ReportPeriod::Month.window(ymd(2024, 12, 31), Weekday::Mon);
        assert_eq!(dec.end, midnight(2025, 1, 1) - Duration::nanoseconds(1));
    }

    #[test]
    fn test_all_window() {
        let window = ReportPeriod::All.window(ymd(2025, 1, 1), Weekday::Mon);
        assert!(window.contains(midnight(1970, 1, 1)));
        assert_eq!(window.to_string(), "all time");
    }

    #[test]
    fn test_parse() {
        assert_eq!(ReportPeriod::parse("Week"), Ok(ReportPeriod::Week));
        assert_eq!(ReportPeriod::parse("m"), Ok(ReportPeriod::Month));
        assert!(ReportPeriod::parse("fortnight").is_err());
    }

    #[test]
    fn test_weekday_from_index() {
        assert_eq!(weekday_from_index(0), Weekday::Sun);
        assert_eq!(weekday_from_index(1), Weekday::Mon);
        assert_eq!(weekday_from_index(8), Weekday::Mon);
    }
}
