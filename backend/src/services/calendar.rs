use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;
use thiserror::Error;

use crate::config::CalendarSettings;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalendarError {
    #[error("invalid year/month: {year}/{month}")]
    InvalidMonth { year: i32, month: u32 },
}

/// Working-day calendar: fixed holidays, Sundays and every other Saturday.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarRules {
    fixed_holidays: BTreeSet<NaiveDate>,
    saturday_anchor: Option<NaiveDate>,
}

impl CalendarRules {
    pub fn new(
        fixed_holidays: impl IntoIterator<Item = NaiveDate>,
        saturday_anchor: Option<NaiveDate>,
    ) -> Self {
        Self {
            fixed_holidays: fixed_holidays.into_iter().collect(),
            saturday_anchor,
        }
    }

    pub fn from_settings(settings: &CalendarSettings) -> Self {
        Self::new(settings.fixed_holidays.iter().copied(), settings.saturday_anchor)
    }

    pub fn classify(&self, date: NaiveDate) -> DayDecision {
        if self.fixed_holidays.contains(&date) {
            return DayDecision::off(DayReason::FixedHoliday);
        }

        match date.weekday() {
            Weekday::Sun => DayDecision::off(DayReason::Sunday),
            Weekday::Sat => match self.saturday_anchor {
                Some(anchor) if saturday_is_off(date, anchor) => {
                    DayDecision::off(DayReason::AlternateSaturday)
                }
                _ => DayDecision::working(DayReason::WorkingSaturday),
            },
            _ => DayDecision::working(DayReason::Workday),
        }
    }

    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.classify(date).is_holiday
    }

    pub fn list_month(&self, year: i32, month: u32) -> Result<Vec<CalendarDay>, CalendarError> {
        Ok(days_of_month(year, month)?
            .into_iter()
            .map(|date| {
                let decision = self.classify(date);
                CalendarDay {
                    date,
                    day: date.day(),
                    weekday: weekday_label(date.weekday()),
                    is_holiday: decision.is_holiday,
                    reason: decision.reason,
                    label: decision.reason.label(),
                }
            })
            .collect())
    }

    /// Number of days in the month that are not holidays.
    pub fn workdays_in_month(&self, year: i32, month: u32) -> Result<u32, CalendarError> {
        let count = days_of_month(year, month)?
            .into_iter()
            .filter(|date| !self.is_holiday(*date))
            .count();
        Ok(count as u32)
    }
}

impl Default for CalendarRules {
    fn default() -> Self {
        Self::from_settings(&CalendarSettings::default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayDecision {
    pub is_holiday: bool,
    pub reason: DayReason,
}

impl DayDecision {
    fn off(reason: DayReason) -> Self {
        Self {
            is_holiday: true,
            reason,
        }
    }

    fn working(reason: DayReason) -> Self {
        Self {
            is_holiday: false,
            reason,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DayReason {
    FixedHoliday,
    Sunday,
    AlternateSaturday,
    WorkingSaturday,
    Workday,
}

impl DayReason {
    pub fn label(&self) -> &'static str {
        match self {
            DayReason::FixedHoliday => "public holiday",
            DayReason::Sunday => "sunday",
            DayReason::AlternateSaturday => "saturday off",
            DayReason::WorkingSaturday => "working saturday",
            DayReason::Workday => "working day",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub day: u32,
    pub weekday: &'static str,
    pub is_holiday: bool,
    pub reason: DayReason,
    pub label: &'static str,
}

/// First day of the month and first day of the next month.
pub fn month_bounds(year: i32, month: u32) -> Result<(NaiveDate, NaiveDate), CalendarError> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or(CalendarError::InvalidMonth { year, month })?;

    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };

    let end = NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .ok_or(CalendarError::InvalidMonth { year, month })?;

    Ok((start, end))
}

pub fn days_of_month(year: i32, month: u32) -> Result<Vec<NaiveDate>, CalendarError> {
    let (start, end) = month_bounds(year, month)?;
    Ok(start.iter_days().take_while(|date| *date < end).collect())
}

/// January 1st and December 31st of the year.
pub fn year_bounds(year: i32) -> Result<(NaiveDate, NaiveDate), CalendarError> {
    let start = NaiveDate::from_ymd_opt(year, 1, 1)
        .ok_or(CalendarError::InvalidMonth { year, month: 1 })?;
    let end = NaiveDate::from_ymd_opt(year, 12, 31)
        .ok_or(CalendarError::InvalidMonth { year, month: 12 })?;
    Ok((start, end))
}

fn saturday_is_off(date: NaiveDate, anchor: NaiveDate) -> bool {
    let weeks = ((date - anchor).num_days() as f64 / 7.0).round() as i64;
    weeks.abs() % 2 == 1
}

fn weekday_label(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Sun => "CN",
        Weekday::Mon => "T2",
        Weekday::Tue => "T3",
        Weekday::Wed => "T4",
        Weekday::Thu => "T5",
        Weekday::Fri => "T6",
        Weekday::Sat => "T7",
    }
}
