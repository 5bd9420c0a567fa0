//! Monthly timekeeping sheet as CSV, one row per employee.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use crate::{
    models::{
        attendance::{AttendanceCell, DetailedCell, OnsiteMode},
        employee::Employee,
    },
    utils::csv::{format_number, CsvDocument, CsvField},
};

use super::{aggregation::MonthlyAggregate, payroll::OvertimeSplit};

const FIXED_HEADERS: [&str; 15] = [
    "STT",
    "Họ Tên",
    "Phòng Ban",
    "Mã NV",
    "Công (Giờ)",
    "Phép SD (Giờ)",
    "Phép tồn (Giờ)",
    "OT Thường",
    "OT Ngày nghỉ",
    "OT Q.Đổi",
    "OT tính lương",
    "OT tính phụ cấp",
    "Onsite Nội thành",
    "Onsite Ngoại thành",
    "Tổng công",
];

/// Everything the sheet needs for one employee.
pub struct ExportRow<'a> {
    pub employee: &'a Employee,
    pub aggregate: MonthlyAggregate,
    pub leave_remaining_hours: f64,
    pub overtime: OvertimeSplit,
    pub cells: &'a BTreeMap<NaiveDate, AttendanceCell>,
}

pub fn file_name(year: i32, month: u32) -> String {
    format!("Bang_Cham_Cong_Thang_{}_{}.csv", month, year)
}

/// Short code written into a day column.
pub fn day_code(cell: &AttendanceCell) -> String {
    match cell {
        AttendanceCell::Legacy(hours) => format_number(*hours),
        AttendanceCell::Detailed(detail) => detailed_code(detail),
    }
}

fn detailed_code(detail: &DetailedCell) -> String {
    if detail.leave == 8.0 {
        return "P_Full".to_string();
    }
    if detail.leave == 4.0 {
        return "P_Half".to_string();
    }
    match detail.onsite_mode {
        OnsiteMode::FullDay => return "OS_Full".to_string(),
        OnsiteMode::HalfDay => return "OS_Half".to_string(),
        OnsiteMode::None => {}
    }

    let mut parts = Vec::new();
    if detail.standard > 0.0 {
        parts.push(format_number(detail.standard));
    }
    if detail.ot > 0.0 {
        parts.push(format!("OT:{}", format_number(detail.ot)));
    }
    if detail.ot_weekend > 0.0 {
        parts.push(format!("OT_W:{}", format_number(detail.ot_weekend)));
    }
    parts.join(" ")
}

/// Reads a day code back into the entry it stands for. Free-form hour codes
/// are not parsed.
pub fn parse_day_code(code: &str) -> Option<DetailedCell> {
    let cell = match code.trim() {
        "P_Full" => DetailedCell {
            leave: 8.0,
            ..DetailedCell::default()
        },
        "P_Half" => DetailedCell {
            leave: 4.0,
            standard: 4.0,
            ..DetailedCell::default()
        },
        "OS_Full" => DetailedCell {
            standard: 8.0,
            onsite_mode: OnsiteMode::FullDay,
            ..DetailedCell::default()
        },
        "OS_Half" => DetailedCell {
            standard: 4.0,
            onsite_mode: OnsiteMode::HalfDay,
            ..DetailedCell::default()
        },
        _ => return None,
    };
    Some(cell)
}

pub fn render(days: &[NaiveDate], rows: &[ExportRow<'_>]) -> anyhow::Result<Vec<u8>> {
    let mut doc = CsvDocument::new();

    let mut header: Vec<CsvField> = FIXED_HEADERS.iter().map(|h| (*h).into()).collect();
    header.extend(days.iter().map(|day| format!("Ngày {}", day.day()).into()));
    doc.write_row(&header)?;

    for (index, row) in rows.iter().enumerate() {
        let totals = &row.aggregate;
        let mut fields: Vec<CsvField> = vec![
            ((index + 1) as i64).into(),
            row.employee.full_name.clone().into(),
            row.employee.department_name().into(),
            row.employee.code.clone().into(),
            totals.total_standard.round().into(),
            totals.total_leave.round().into(),
            row.leave_remaining_hours.round().into(),
            totals.total_ot.round().into(),
            totals.total_ot_weekend.round().into(),
            (row.overtime.salary_hours + row.overtime.allowance_hours).into(),
            row.overtime.salary_hours.into(),
            row.overtime.allowance_hours.into(),
            totals.total_onsite_in.round().into(),
            totals.total_onsite_out.round().into(),
            totals.total_work.round().into(),
        ];
        fields.extend(days.iter().map(|day| {
            row.cells
                .get(day)
                .map(day_code)
                .unwrap_or_default()
                .into()
        }));
        doc.write_row(&fields)?;
    }

    Ok(doc.finish()?)
}
