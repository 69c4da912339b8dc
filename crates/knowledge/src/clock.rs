use chrono::{Datelike, Local, NaiveDateTime, Timelike};

use crate::tables::{MONTHS_TR, WEEKDAYS_TR};

/// Source of "now" for the date/time and today's-observance answers.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// "19 Ekim 2026 Pazartesi 14:05"
pub fn format_long_tr(dt: NaiveDateTime) -> String {
    format!(
        "{} {} {} {} {:02}:{:02}",
        dt.day(),
        MONTHS_TR[dt.month0() as usize],
        dt.year(),
        WEEKDAYS_TR[dt.weekday().num_days_from_monday() as usize],
        dt.hour(),
        dt.minute(),
    )
}

/// "19 Ekim", the key format of the observance calendar.
pub fn format_day_month_tr(dt: NaiveDateTime) -> String {
    format!("{} {}", dt.day(), MONTHS_TR[dt.month0() as usize])
}
