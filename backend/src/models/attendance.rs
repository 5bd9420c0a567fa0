use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::types::EmployeeId;

/// One stored attendance row, keyed by `(employee_id, date)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct AttendanceRow {
    pub employee_id: EmployeeId,
    pub date: NaiveDate,
    pub standard_hours: f64,
    pub ot_hours: f64,
    pub ot_weekend: f64,
    pub leave_hours: f64,
    pub is_onsite: bool,
    pub onsite_mode: i16,
    pub onsite_place: i16,
    pub check_in: Option<NaiveTime>,
    pub check_out: Option<NaiveTime>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellKey {
    pub employee_id: EmployeeId,
    pub date: NaiveDate,
}

impl CellKey {
    pub fn new(employee_id: EmployeeId, date: NaiveDate) -> Self {
        Self { employee_id, date }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i16", into = "i16")]
pub enum OnsiteMode {
    #[default]
    None,
    HalfDay,
    FullDay,
}

impl TryFrom<i16> for OnsiteMode {
    type Error = String;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(OnsiteMode::None),
            1 => Ok(OnsiteMode::HalfDay),
            2 => Ok(OnsiteMode::FullDay),
            other => Err(format!("unknown onsite mode {}", other)),
        }
    }
}

impl From<OnsiteMode> for i16 {
    fn from(mode: OnsiteMode) -> Self {
        match mode {
            OnsiteMode::None => 0,
            OnsiteMode::HalfDay => 1,
            OnsiteMode::FullDay => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i16", into = "i16")]
pub enum OnsitePlace {
    #[default]
    Unset,
    InProvince,
    OutOfProvince,
}

impl TryFrom<i16> for OnsitePlace {
    type Error = String;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(OnsitePlace::Unset),
            1 => Ok(OnsitePlace::InProvince),
            2 => Ok(OnsitePlace::OutOfProvince),
            other => Err(format!("unknown onsite place {}", other)),
        }
    }
}

impl From<OnsitePlace> for i16 {
    fn from(place: OnsitePlace) -> Self {
        match place {
            OnsitePlace::Unset => 0,
            OnsitePlace::InProvince => 1,
            OnsitePlace::OutOfProvince => 2,
        }
    }
}

impl OnsitePlace {
    pub fn label(&self) -> &'static str {
        match self {
            OnsitePlace::Unset => "",
            OnsitePlace::InProvince => "Trong tỉnh",
            OnsitePlace::OutOfProvince => "Ngoài tỉnh",
        }
    }
}

/// Full attendance entry for one day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetailedCell {
    pub standard: f64,
    pub ot: f64,
    pub ot_weekend: f64,
    pub leave: f64,
    pub onsite_mode: OnsiteMode,
    pub onsite_place: OnsitePlace,
    /// Pre-`onsite_mode` boolean flag kept for old rows.
    pub onsite: bool,
    pub check_in: Option<NaiveTime>,
    pub check_out: Option<NaiveTime>,
}

/// A day's attendance as entered: either an old bare-hours number or a full
/// entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttendanceCell {
    Legacy(f64),
    Detailed(DetailedCell),
}

impl From<DetailedCell> for AttendanceCell {
    fn from(cell: DetailedCell) -> Self {
        AttendanceCell::Detailed(cell)
    }
}

impl AttendanceRow {
    pub fn key(&self) -> CellKey {
        CellKey::new(self.employee_id, self.date)
    }

    /// Rows with unknown enum codes fall back to "none"/"unset".
    pub fn to_cell(&self) -> AttendanceCell {
        let onsite_mode = OnsiteMode::try_from(self.onsite_mode).unwrap_or_default();
        AttendanceCell::Detailed(DetailedCell {
            standard: self.standard_hours,
            ot: self.ot_hours,
            ot_weekend: self.ot_weekend,
            leave: self.leave_hours,
            onsite_mode,
            onsite_place: OnsitePlace::try_from(self.onsite_place).unwrap_or_default(),
            onsite: onsite_mode == OnsiteMode::None && self.is_onsite,
            check_in: self.check_in,
            check_out: self.check_out,
        })
    }

    pub fn from_cell(key: CellKey, cell: &DetailedCell) -> Self {
        Self {
            employee_id: key.employee_id,
            date: key.date,
            standard_hours: cell.standard,
            ot_hours: cell.ot,
            ot_weekend: cell.ot_weekend,
            leave_hours: cell.leave,
            is_onsite: cell.onsite || cell.onsite_mode != OnsiteMode::None,
            onsite_mode: cell.onsite_mode.into(),
            onsite_place: cell.onsite_place.into(),
            check_in: cell.check_in,
            check_out: cell.check_out,
        }
    }

    /// All-zero rows without punches carry no information.
    pub fn is_blank(&self) -> bool {
        self.standard_hours == 0.0
            && self.ot_hours == 0.0
            && self.ot_weekend == 0.0
            && self.leave_hours == 0.0
            && self.onsite_mode == 0
            && !self.is_onsite
            && self.check_in.is_none()
            && self.check_out.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_number_deserializes_as_legacy_cell() {
        let cell: AttendanceCell = serde_json::from_str("7.5").unwrap();
        assert_eq!(cell, AttendanceCell::Legacy(7.5));
    }

    #[test]
    fn object_deserializes_as_detailed_cell_with_defaults() {
        let cell: AttendanceCell =
            serde_json::from_str(r#"{"standard": 8, "onsite_mode": 2, "onsite_place": 2}"#)
                .unwrap();
        match cell {
            AttendanceCell::Detailed(detail) => {
                assert_eq!(detail.standard, 8.0);
                assert_eq!(detail.ot, 0.0);
                assert_eq!(detail.onsite_mode, OnsiteMode::FullDay);
                assert_eq!(detail.onsite_place, OnsitePlace::OutOfProvince);
                assert!(detail.check_out.is_none());
            }
            other => panic!("expected detailed cell, got {:?}", other),
        }
    }

    #[test]
    fn unknown_onsite_mode_is_rejected() {
        let result = serde_json::from_str::<DetailedCell>(r#"{"onsite_mode": 5}"#);
        assert!(result.is_err());
    }

    #[test]
    fn row_round_trips_through_detailed_cell() {
        let key = CellKey::new(
            EmployeeId::new(),
            NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
        );
        let detail = DetailedCell {
            standard: 8.0,
            ot: 1.5,
            onsite_mode: OnsiteMode::HalfDay,
            onsite_place: OnsitePlace::InProvince,
            check_out: NaiveTime::from_hms_opt(18, 30, 0),
            ..DetailedCell::default()
        };
        let row = AttendanceRow::from_cell(key, &detail);
        assert!(row.is_onsite);
        assert_eq!(row.onsite_mode, 1);
        assert_eq!(row.key(), key);
        assert_eq!(row.to_cell(), AttendanceCell::Detailed(detail));
    }

    #[test]
    fn legacy_onsite_flag_survives_only_without_mode() {
        let key = CellKey::new(
            EmployeeId::new(),
            NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
        );
        let mut row = AttendanceRow::from_cell(key, &DetailedCell::default());
        row.is_onsite = true;
        match row.to_cell() {
            AttendanceCell::Detailed(detail) => assert!(detail.onsite),
            other => panic!("unexpected {:?}", other),
        }
        assert!(!row.is_blank());
    }
}
