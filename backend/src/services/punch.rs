//! Turns raw time-clock punches into daily attendance rows.

use std::collections::{BTreeMap, HashMap};

use chrono::{NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::{
    config::PunchSettings,
    models::{
        attendance::{AttendanceRow, CellKey},
        employee::HOURS_PER_DAY,
    },
    types::EmployeeId,
};

const LUNCH_BREAK_HOURS: f64 = 1.0;
const LUNCH_THRESHOLD_HOURS: f64 = 4.0;
const OT_CHECKOUT_HOUR: u32 = 18;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPunch {
    pub device_user: u32,
    pub timestamp: NaiveDateTime,
}

/// Hours derived from one employee's punches on one day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PunchDay {
    pub key: CellKey,
    pub check_in: NaiveTime,
    pub check_out: Option<NaiveTime>,
    pub standard_hours: f64,
    pub ot_hours: f64,
}

impl PunchDay {
    /// Overlays the punch figures on the stored row, keeping any leave or
    /// onsite information already entered for that day.
    pub fn apply_to(&self, existing: Option<&AttendanceRow>) -> AttendanceRow {
        let mut row = existing.cloned().unwrap_or_else(|| AttendanceRow {
            employee_id: self.key.employee_id,
            date: self.key.date,
            standard_hours: 0.0,
            ot_hours: 0.0,
            ot_weekend: 0.0,
            leave_hours: 0.0,
            is_onsite: false,
            onsite_mode: 0,
            onsite_place: 0,
            check_in: None,
            check_out: None,
        });
        row.check_in = Some(self.check_in);
        row.check_out = self.check_out;
        row.standard_hours = self.standard_hours;
        row.ot_hours = self.ot_hours;
        row
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PunchSummary {
    pub days: Vec<PunchDay>,
    /// Punches from device users with no configured employee code.
    pub unknown_device_users: usize,
    /// Punches mapped to a code that matches no employee.
    pub unknown_codes: usize,
}

pub fn summarize(
    punches: &[RawPunch],
    settings: &PunchSettings,
    employees_by_code: &HashMap<String, EmployeeId>,
) -> PunchSummary {
    let mut summary = PunchSummary::default();
    let mut grouped: BTreeMap<CellKey, Vec<NaiveDateTime>> = BTreeMap::new();

    for punch in punches {
        let Some(code) = settings.code_for(punch.device_user) else {
            summary.unknown_device_users += 1;
            continue;
        };
        let Some(employee_id) = employees_by_code.get(code) else {
            summary.unknown_codes += 1;
            continue;
        };
        grouped
            .entry(CellKey::new(*employee_id, punch.timestamp.date()))
            .or_default()
            .push(punch.timestamp);
    }

    summary.days = grouped
        .into_iter()
        .map(|(key, mut times)| {
            times.sort();
            summarize_day(key, &times)
        })
        .collect();
    summary
}

/// `times` must be sorted and non-empty.
fn summarize_day(key: CellKey, times: &[NaiveDateTime]) -> PunchDay {
    let first = times[0];
    let last = times[times.len() - 1];

    let mut day = PunchDay {
        key,
        check_in: first.time(),
        check_out: None,
        standard_hours: 0.0,
        ot_hours: 0.0,
    };

    if times.len() < 2 || last <= first {
        return day;
    }

    let span = (last - first).num_seconds() as f64 / 3600.0;
    let net = if span > LUNCH_THRESHOLD_HOURS {
        span - LUNCH_BREAK_HOURS
    } else {
        span
    };

    day.check_out = Some(last.time());
    day.standard_hours = round2(net).clamp(0.0, HOURS_PER_DAY);
    if last.hour() >= OT_CHECKOUT_HOUR && net > HOURS_PER_DAY {
        day.ot_hours = round2(net - HOURS_PER_DAY);
    }
    day
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
