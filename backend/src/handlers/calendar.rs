use axum::{
    extract::{Query, State},
    Json,
};
use serde::Serialize;
use validator::Validate;

use crate::{error::AppError, services::calendar::CalendarDay, state::AppState};

use super::common::MonthQuery;

#[derive(Debug, Serialize)]
pub struct CalendarResponse {
    pub year: i32,
    pub month: u32,
    pub workdays: u32,
    pub days: Vec<CalendarDay>,
}

pub async fn get_month_calendar(
    State(state): State<AppState>,
    Query(q): Query<MonthQuery>,
) -> Result<Json<CalendarResponse>, AppError> {
    q.validate()?;
    let rules = state.calendar();
    Ok(Json(CalendarResponse {
        year: q.year,
        month: q.month,
        workdays: rules.workdays_in_month(q.year, q.month)?,
        days: rules.list_month(q.year, q.month)?,
    }))
}
