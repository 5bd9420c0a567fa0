use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::attendance::{AttendanceCell, OnsitePlace};

use super::{
    calendar::{days_of_month, CalendarError, CalendarRules},
    day_decoder::{decode, DayBreakdown},
};

const WEEKDAY_OT_RATE: f64 = 1.5;
const WEEKDAY_WEEKEND_OT_RATE: f64 = 2.0;
const HOLIDAY_RATE: f64 = 2.0;
const HOLIDAY_OT_WEEKEND_RATE: f64 = 2.5;

/// One employee's totals for a month, in hours.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MonthlyAggregate {
    pub total_standard: f64,
    pub total_ot: f64,
    pub total_ot_weekend: f64,
    pub total_converted_ot: f64,
    pub total_onsite_in: f64,
    pub total_onsite_out: f64,
    /// Leave used in this month.
    pub total_leave: f64,
    pub total_work: f64,
}

impl MonthlyAggregate {
    pub fn total_onsite(&self) -> f64 {
        self.total_onsite_in + self.total_onsite_out
    }

    fn add_day(&mut self, day: &DayBreakdown, is_holiday: bool) {
        if is_holiday {
            let worked = day.standard + day.ot;
            self.total_converted_ot +=
                worked * HOLIDAY_RATE + day.ot_weekend * HOLIDAY_OT_WEEKEND_RATE;
            self.total_ot_weekend += worked + day.ot_weekend;
        } else {
            self.total_standard += day.standard;
            self.total_leave += day.leave;
            self.total_ot += day.ot;
            self.total_ot_weekend += day.ot_weekend;
            if day.ot > 0.0 {
                self.total_converted_ot += day.ot * WEEKDAY_OT_RATE;
            }
            if day.ot_weekend > 0.0 {
                self.total_converted_ot += day.ot_weekend * WEEKDAY_WEEKEND_OT_RATE;
            }
        }

        if day.onsite_hours > 0.0 {
            match day.onsite_place {
                OnsitePlace::OutOfProvince => self.total_onsite_out += day.onsite_hours,
                OnsitePlace::InProvince | OnsitePlace::Unset => {
                    self.total_onsite_in += day.onsite_hours
                }
            }
        }
    }
}

/// Reduces one employee's cells over every calendar day of the month. Cells
/// dated outside the month are ignored; days without a cell contribute
/// nothing.
pub fn aggregate(
    year: i32,
    month: u32,
    cells: &BTreeMap<NaiveDate, AttendanceCell>,
    rules: &CalendarRules,
) -> Result<MonthlyAggregate, CalendarError> {
    let mut totals = MonthlyAggregate::default();

    for date in days_of_month(year, month)? {
        let is_holiday = rules.is_holiday(date);
        let day = decode(cells.get(&date), is_holiday);
        totals.add_day(&day, is_holiday);
    }

    totals.total_work = totals.total_standard + totals.total_leave + totals.total_converted_ot;
    Ok(totals)
}
