use std::fmt;
use std::iter::successors;
use std::str::FromStr;
use thiserror::Error;
use time::{
    Date, Duration,
    Month::{self, December, January},
    Weekday::{self, Friday, Monday, Saturday, Sunday, Thursday, Tuesday, Wednesday},
};

pub(crate) const DAYS_IN_WEEK: usize = 7;

const MONTHS_IN_YEAR: i32 = 12;

#[derive(Copy, Clone, Debug, Eq, Error, PartialEq)]
#[error("reached the end of time")]
pub(crate) struct OutOfTimeError;

/// The weekday shown in the first column of every week
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct WeekStart(Weekday);

impl WeekStart {
    pub(crate) fn new(first: Weekday) -> WeekStart {
        WeekStart(first)
    }

    pub(crate) fn first_weekday(self) -> Weekday {
        self.0
    }

    /// Returns the 0-based column in which `wd` is displayed
    pub(crate) fn column(self, wd: Weekday) -> usize {
        let offset = (7 + wd.number_days_from_monday() - self.0.number_days_from_monday()) % 7;
        usize::from(offset)
    }

    /// Iterate over the seven weekdays in column order
    pub(crate) fn weekdays(self) -> impl Iterator<Item = Weekday> {
        successors(Some(self.0), |wd| Some(wd.next())).take(DAYS_IN_WEEK)
    }

    pub(crate) fn start_of_week(self, date: Date) -> Option<Date> {
        let back = i64::try_from(self.column(date.weekday())).ok()?;
        add_days(date, -back)
    }

    pub(crate) fn end_of_week(self, date: Date) -> Option<Date> {
        let forth = i64::try_from(DAYS_IN_WEEK - 1 - self.column(date.weekday())).ok()?;
        add_days(date, forth)
    }
}

impl Default for WeekStart {
    fn default() -> WeekStart {
        WeekStart::new(Sunday)
    }
}

impl fmt::Display for WeekStart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.first_weekday())
    }
}

impl FromStr for WeekStart {
    type Err = ParseWeekStartError;

    // Accepts full weekday names and unambiguous prefixes of at least two
    // letters, ignoring case
    fn from_str(s: &str) -> Result<WeekStart, ParseWeekStartError> {
        let needle = s.trim().to_ascii_lowercase();
        if needle.len() < 2 {
            return Err(ParseWeekStartError(s.to_owned()));
        }
        let mut matches = WeekStart(Monday).weekdays().filter(|wd| {
            wd.to_string()
                .to_ascii_lowercase()
                .starts_with(needle.as_str())
        });
        match (matches.next(), matches.next()) {
            (Some(wd), None) => Ok(WeekStart(wd)),
            _ => Err(ParseWeekStartError(s.to_owned())),
        }
    }
}

#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("invalid weekday: {0:?}")]
pub(crate) struct ParseWeekStartError(String);

pub(crate) fn start_of_month(date: Date) -> Date {
    date.replace_day(1).unwrap_or(date)
}

pub(crate) fn end_of_month(date: Date) -> Date {
    // The day after December 31 may be past the end of time, so December is
    // computed directly.
    let last = if date.month() == December {
        Date::from_calendar_date(date.year(), December, 31).ok()
    } else {
        Date::from_calendar_date(date.year(), date.month().next(), 1)
            .ok()
            .and_then(Date::previous_day)
    };
    last.unwrap_or(date)
}

pub(crate) fn add_days(date: Date, days: i64) -> Option<Date> {
    date.checked_add(Duration::days(days))
}

pub(crate) fn add_weeks(date: Date, weeks: i64) -> Option<Date> {
    date.checked_add(Duration::weeks(weeks))
}

/// Move `months` calendar months from `date`, keeping the day of the month
/// but clamping it to the length of the target month
pub(crate) fn add_months(date: Date, months: i32) -> Option<Date> {
    let index = date
        .year()
        .checked_mul(MONTHS_IN_YEAR)?
        .checked_add(i32::from(u8::from(date.month())) - 1)?
        .checked_add(months)?;
    let year = index.div_euclid(MONTHS_IN_YEAR);
    let month = u8::try_from(index.rem_euclid(MONTHS_IN_YEAR) + 1).ok()?;
    let month = Month::try_from(month).ok()?;
    let first = Date::from_calendar_date(year, month, 1).ok()?;
    let day = date.day().min(end_of_month(first).day());
    first.replace_day(day).ok()
}

pub(crate) fn same_day(a: Date, b: Date) -> bool {
    a == b
}

pub(crate) fn same_month(a: Date, b: Date) -> bool {
    (a.year(), a.month()) == (b.year(), b.month())
}

pub(crate) fn is_weekend(date: Date) -> bool {
    matches!(date.weekday(), Saturday | Sunday)
}

/// Iterate over every date from `start` through `end`, inclusive
pub(crate) fn days_through(start: Date, end: Date) -> impl Iterator<Item = Date> {
    successors(Some(start), |&d| d.next_day()).take_while(move |&d| d <= end)
}

pub(crate) fn weekday_abbrev(wd: Weekday) -> &'static str {
    match wd {
        Monday => "Mon",
        Tuesday => "Tue",
        Wednesday => "Wed",
        Thursday => "Thu",
        Friday => "Fri",
        Saturday => "Sat",
        Sunday => "Sun",
    }
}

pub(crate) fn month_abbrev(month: Month) -> &'static str {
    match month {
        January => "Jan",
        Month::February => "Feb",
        Month::March => "Mar",
        Month::April => "Apr",
        Month::May => "May",
        Month::June => "Jun",
        Month::July => "Jul",
        Month::August => "Aug",
        Month::September => "Sep",
        Month::October => "Oct",
        Month::November => "Nov",
        December => "Dec",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn test_month_bounds() {
        assert_eq!(start_of_month(date!(2024 - 02 - 17)), date!(2024 - 02 - 01));
        assert_eq!(end_of_month(date!(2024 - 02 - 17)), date!(2024 - 02 - 29));
        assert_eq!(end_of_month(date!(2023 - 02 - 01)), date!(2023 - 02 - 28));
        assert_eq!(end_of_month(date!(1900 - 02 - 10)), date!(1900 - 02 - 28));
        assert_eq!(end_of_month(date!(2000 - 02 - 10)), date!(2000 - 02 - 29));
        assert_eq!(end_of_month(date!(2023 - 04 - 30)), date!(2023 - 04 - 30));
        assert_eq!(end_of_month(date!(2023 - 12 - 05)), date!(2023 - 12 - 31));
        assert_eq!(end_of_month(date!(9999 - 12 - 05)), date!(9999 - 12 - 31));
    }

    #[test]
    fn test_week_bounds_sunday() {
        let ws = WeekStart::default();
        assert_eq!(ws.start_of_week(date!(2024 - 06 - 13)), Some(date!(2024 - 06 - 09)));
        assert_eq!(ws.end_of_week(date!(2024 - 06 - 13)), Some(date!(2024 - 06 - 15)));
        assert_eq!(ws.start_of_week(date!(2024 - 06 - 09)), Some(date!(2024 - 06 - 09)));
        assert_eq!(ws.end_of_week(date!(2024 - 06 - 15)), Some(date!(2024 - 06 - 15)));
    }

    #[test]
    fn test_week_bounds_monday() {
        let ws = WeekStart::new(Monday);
        assert_eq!(ws.start_of_week(date!(2024 - 06 - 09)), Some(date!(2024 - 06 - 03)));
        assert_eq!(ws.end_of_week(date!(2024 - 06 - 09)), Some(date!(2024 - 06 - 09)));
        assert_eq!(ws.start_of_week(date!(2024 - 06 - 10)), Some(date!(2024 - 06 - 10)));
    }

    #[test]
    fn test_week_bounds_at_end_of_time() {
        let ws = WeekStart::default();
        assert_eq!(ws.end_of_week(Date::MAX), None);
        assert_eq!(ws.start_of_week(Date::MIN), None);
    }

    #[test]
    fn test_columns() {
        let ws = WeekStart::new(Saturday);
        assert_eq!(ws.column(Saturday), 0);
        assert_eq!(ws.column(Sunday), 1);
        assert_eq!(ws.column(Friday), 6);
        assert_eq!(
            ws.weekdays().collect::<Vec<_>>(),
            [Saturday, Sunday, Monday, Tuesday, Wednesday, Thursday, Friday]
        );
        for wd in ws.weekdays() {
            assert_eq!(ws.weekdays().position(|w| w == wd), Some(ws.column(wd)));
        }
    }

    #[test]
    fn test_add_months_clamps() {
        assert_eq!(add_months(date!(2024 - 01 - 31), 1), Some(date!(2024 - 02 - 29)));
        assert_eq!(add_months(date!(2023 - 01 - 31), 1), Some(date!(2023 - 02 - 28)));
        assert_eq!(add_months(date!(2024 - 03 - 31), -1), Some(date!(2024 - 02 - 29)));
        assert_eq!(add_months(date!(2024 - 01 - 15), 2), Some(date!(2024 - 03 - 15)));
        assert_eq!(add_months(date!(2024 - 12 - 15), 1), Some(date!(2025 - 01 - 15)));
        assert_eq!(add_months(date!(2024 - 01 - 15), -1), Some(date!(2023 - 12 - 15)));
        assert_eq!(add_months(date!(2024 - 05 - 31), -15), Some(date!(2023 - 02 - 28)));
        assert_eq!(add_months(date!(9999 - 12 - 01), 1), None);
    }

    #[test]
    fn test_add_days_and_weeks() {
        assert_eq!(add_days(date!(2024 - 02 - 28), 1), Some(date!(2024 - 02 - 29)));
        assert_eq!(add_days(date!(2024 - 03 - 01), -1), Some(date!(2024 - 02 - 29)));
        assert_eq!(add_weeks(date!(2024 - 12 - 28), 1), Some(date!(2025 - 01 - 04)));
        assert_eq!(add_weeks(date!(2024 - 01 - 03), -1), Some(date!(2023 - 12 - 27)));
        assert_eq!(add_days(Date::MAX, 1), None);
    }

    #[test]
    fn test_comparisons() {
        assert!(same_day(date!(2024 - 06 - 13), date!(2024 - 06 - 13)));
        assert!(!same_day(date!(2024 - 06 - 13), date!(2023 - 06 - 13)));
        assert!(same_month(date!(2024 - 06 - 01), date!(2024 - 06 - 30)));
        assert!(!same_month(date!(2024 - 06 - 01), date!(2023 - 06 - 01)));
    }

    #[test]
    fn test_is_weekend() {
        // 2024-06-09 is a Sunday
        let expected = [true, false, false, false, false, false, true];
        for (d, want) in days_through(date!(2024 - 06 - 09), date!(2024 - 06 - 15)).zip(expected) {
            assert_eq!(is_weekend(d), want, "{d}");
        }
    }

    #[test]
    fn test_days_through() {
        let days = days_through(date!(2023 - 12 - 30), date!(2024 - 01 - 02)).collect::<Vec<_>>();
        assert_eq!(
            days,
            [
                date!(2023 - 12 - 30),
                date!(2023 - 12 - 31),
                date!(2024 - 01 - 01),
                date!(2024 - 01 - 02),
            ]
        );
        assert_eq!(days_through(Date::MAX, Date::MAX).count(), 1);
    }

    #[test]
    fn test_parse_week_start() {
        assert_eq!("sun".parse::<WeekStart>(), Ok(WeekStart::new(Sunday)));
        assert_eq!("Monday".parse::<WeekStart>(), Ok(WeekStart::new(Monday)));
        assert_eq!("SA".parse::<WeekStart>(), Ok(WeekStart::new(Saturday)));
        assert_eq!("th".parse::<WeekStart>(), Ok(WeekStart::new(Thursday)));
        assert!("t".parse::<WeekStart>().is_err());
        assert!("s".parse::<WeekStart>().is_err());
        assert!("funday".parse::<WeekStart>().is_err());
        assert!("".parse::<WeekStart>().is_err());
    }

    #[test]
    fn test_abbrevs() {
        assert_eq!(weekday_abbrev(Wednesday), "Wed");
        assert_eq!(month_abbrev(Month::June), "Jun");
    }
}
