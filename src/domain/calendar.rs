use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone};

/// Reduces a date or timestamp to the calendar day it falls on.
///
/// Due dates and the selected day are compared by calendar day only, so any
/// time-of-day component is dropped here. Zoned timestamps keep the day as
/// seen in their own zone.
pub trait CalendarDay {
    fn calendar_day(&self) -> NaiveDate;
}

impl CalendarDay for NaiveDate {
    fn calendar_day(&self) -> NaiveDate {
        *self
    }
}

impl CalendarDay for NaiveDateTime {
    fn calendar_day(&self) -> NaiveDate {
        self.date()
    }
}

impl<Tz: TimeZone> CalendarDay for DateTime<Tz> {
    fn calendar_day(&self) -> NaiveDate {
        self.date_naive()
    }
}

impl<T: CalendarDay + ?Sized> CalendarDay for &T {
    fn calendar_day(&self) -> NaiveDate {
        (**self).calendar_day()
    }
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parses a stored due date. Accepts a plain `YYYY-MM-DD` day or a full
/// RFC 3339 timestamp; anything else is rejected rather than guessed.
pub fn parse_calendar_day(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.calendar_day()))
}

pub fn format_calendar_day(day: NaiveDate) -> String {
    day.format("%Y-%m-%d").to_string()
}
