//! Common validation rules shared across request payloads.

use validator::ValidationError;

use crate::models::attendance::DetailedCell;

const MAX_HOURS_PER_DAY: f64 = 24.0;

/// Leave is taken in half or full days only.
pub fn validate_leave_hours(hours: f64) -> Result<(), ValidationError> {
    if hours == 0.0 || hours == 4.0 || hours == 8.0 {
        Ok(())
    } else {
        Err(ValidationError::new("leave_hours_not_0_4_or_8"))
    }
}

/// Validates that a single hour figure fits in one day.
pub fn validate_day_hours(hours: f64) -> Result<(), ValidationError> {
    if !hours.is_finite() || !(0.0..=MAX_HOURS_PER_DAY).contains(&hours) {
        return Err(ValidationError::new("hours_out_of_range"));
    }
    Ok(())
}

/// All hour fields of an entry, and their sum, must fit in one day.
pub fn validate_cell(cell: &DetailedCell) -> Result<(), ValidationError> {
    for hours in [cell.standard, cell.ot, cell.ot_weekend, cell.leave] {
        validate_day_hours(hours)?;
    }
    validate_leave_hours(cell.leave)?;
    if cell.standard + cell.ot + cell.ot_weekend + cell.leave > MAX_HOURS_PER_DAY {
        return Err(ValidationError::new("day_total_exceeds_24_hours"));
    }
    Ok(())
}
