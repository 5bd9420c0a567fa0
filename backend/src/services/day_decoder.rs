//! Turns a stored or entered attendance cell into the hour figures the
//! aggregator works with, plus the cosmetic grid view and the dashboard
//! presence status.

use chrono::{NaiveTime, Timelike};
use serde::Serialize;

use crate::{
    config::PresenceSettings,
    models::{
        attendance::{AttendanceCell, AttendanceRow, DetailedCell, OnsiteMode, OnsitePlace},
        employee::HOURS_PER_DAY,
    },
};

const HALF_DAY_HOURS: f64 = 4.0;
const LATE_CHECKOUT_HOUR: u32 = 18;

/// Normalized hours of one day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DayBreakdown {
    pub standard: f64,
    pub ot: f64,
    pub ot_weekend: f64,
    pub leave: f64,
    pub onsite_hours: f64,
    pub onsite_place: OnsitePlace,
}

/// A missing cell contributes nothing.
pub fn decode(cell: Option<&AttendanceCell>, is_holiday: bool) -> DayBreakdown {
    match cell {
        None => DayBreakdown::default(),
        Some(AttendanceCell::Legacy(hours)) => legacy_breakdown(*hours, is_holiday),
        Some(AttendanceCell::Detailed(detail)) => DayBreakdown {
            standard: detail.standard,
            ot: detail.ot,
            ot_weekend: detail.ot_weekend,
            leave: detail.leave,
            onsite_hours: onsite_hours(detail),
            onsite_place: detail.onsite_place,
        },
    }
}

fn legacy_breakdown(hours: f64, is_holiday: bool) -> DayBreakdown {
    if is_holiday {
        DayBreakdown {
            ot_weekend: hours,
            ..DayBreakdown::default()
        }
    } else {
        DayBreakdown {
            standard: hours,
            ..DayBreakdown::default()
        }
    }
}

/// Onsite days count their base hours only, never overtime.
pub fn onsite_hours(detail: &DetailedCell) -> f64 {
    match detail.onsite_mode {
        OnsiteMode::FullDay => HOURS_PER_DAY,
        OnsiteMode::HalfDay => HALF_DAY_HOURS,
        OnsiteMode::None if detail.onsite => detail.standard,
        OnsiteMode::None => 0.0,
    }
}

/// Rewrites any cell as a detailed entry, reinterpreting legacy numbers the
/// same way [`decode`] does.
pub fn to_detailed(cell: &AttendanceCell, is_holiday: bool) -> DetailedCell {
    match cell {
        AttendanceCell::Detailed(detail) => detail.clone(),
        AttendanceCell::Legacy(hours) => {
            let breakdown = legacy_breakdown(*hours, is_holiday);
            DetailedCell {
                standard: breakdown.standard,
                ot_weekend: breakdown.ot_weekend,
                ..DetailedCell::default()
            }
        }
    }
}

/// What the editor starts from when a day has no entry.
pub fn default_cell(is_holiday: bool) -> DetailedCell {
    DetailedCell {
        standard: if is_holiday { 0.0 } else { HOURS_PER_DAY },
        ..DetailedCell::default()
    }
}

/// A full day of leave leaves no room for worked hours.
pub fn normalize_entry(mut cell: DetailedCell) -> DetailedCell {
    if cell.leave >= HOURS_PER_DAY {
        cell.standard = 0.0;
        cell.ot = 0.0;
    }
    cell
}

/// Presentation of one grid cell. Never feeds back into totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DayDisplay {
    Empty,
    FullLeave,
    HalfLeave {
        worked: f64,
    },
    Onsite {
        full_day: bool,
        place: OnsitePlace,
        place_label: &'static str,
        extra_ot: f64,
        weekend_ot: bool,
    },
    Hours {
        regular: f64,
        overtime: Option<f64>,
    },
}

pub fn display(cell: Option<&AttendanceCell>, is_holiday: bool) -> DayDisplay {
    let detail = match cell {
        None => return DayDisplay::Empty,
        Some(AttendanceCell::Legacy(hours)) => {
            return if *hours > 0.0 {
                DayDisplay::Hours {
                    regular: *hours,
                    overtime: None,
                }
            } else {
                DayDisplay::Empty
            };
        }
        Some(AttendanceCell::Detailed(detail)) => detail,
    };

    if detail.leave == HOURS_PER_DAY {
        return DayDisplay::FullLeave;
    }
    if detail.leave == HALF_DAY_HOURS {
        return DayDisplay::HalfLeave {
            worked: detail.standard,
        };
    }
    if detail.onsite_mode != OnsiteMode::None {
        return DayDisplay::Onsite {
            full_day: detail.onsite_mode == OnsiteMode::FullDay,
            place: detail.onsite_place,
            place_label: detail.onsite_place.label(),
            extra_ot: detail.ot + detail.ot_weekend,
            weekend_ot: detail.ot_weekend > 0.0,
        };
    }

    if is_holiday {
        let total = detail.standard + detail.ot + detail.ot_weekend;
        return hours_or_empty(total.round());
    }

    let raw_total = detail.standard + detail.ot;
    if raw_total > HOURS_PER_DAY && checked_out_late(detail.check_out) {
        let excess = (raw_total - HOURS_PER_DAY).round();
        return DayDisplay::Hours {
            regular: HOURS_PER_DAY,
            overtime: (excess > 0.0).then_some(excess),
        };
    }

    hours_or_empty(raw_total.round())
}

fn hours_or_empty(hours: f64) -> DayDisplay {
    if hours > 0.0 {
        DayDisplay::Hours {
            regular: hours,
            overtime: None,
        }
    } else {
        DayDisplay::Empty
    }
}

fn checked_out_late(check_out: Option<NaiveTime>) -> bool {
    check_out.is_some_and(|time| time.hour() >= LATE_CHECKOUT_HOUR)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PresenceStatus {
    Present,
    Leave,
    Onsite,
    Absent,
}

pub fn presence_status(
    row: Option<&AttendanceRow>,
    employee_code: &str,
    settings: &PresenceSettings,
) -> PresenceStatus {
    let status = match row {
        None => PresenceStatus::Absent,
        Some(row) if row.leave_hours > 0.0 => PresenceStatus::Leave,
        Some(row) if row.is_onsite || row.onsite_mode > 0 => PresenceStatus::Onsite,
        Some(row) if row.standard_hours > 0.0 || row.check_in.is_some() => {
            PresenceStatus::Present
        }
        Some(_) => PresenceStatus::Absent,
    };

    if status == PresenceStatus::Absent && settings.is_exempt(employee_code) {
        PresenceStatus::Present
    } else {
        status
    }
}

pub fn is_late(check_in: Option<NaiveTime>, settings: &PresenceSettings) -> bool {
    check_in.is_some_and(|time| time > settings.late_after)
}

/// Head counts for one day of the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PresenceSummary {
    pub present: u32,
    pub leave: u32,
    pub onsite: u32,
    pub absent: u32,
    pub late: u32,
}

impl PresenceSummary {
    pub fn record(&mut self, status: PresenceStatus, late: bool) {
        match status {
            PresenceStatus::Present => self.present += 1,
            PresenceStatus::Leave => self.leave += 1,
            PresenceStatus::Onsite => self.onsite += 1,
            PresenceStatus::Absent => self.absent += 1,
        }
        if late {
            self.late += 1;
        }
    }

    pub fn total(&self) -> u32 {
        self.present + self.leave + self.onsite + self.absent
    }
}
