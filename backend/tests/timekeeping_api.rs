mod support;

use axum::http::Method;
use hrportal_backend::models::attendance::AttendanceRow;
use serde_json::json;
use support::{date, employee, worked_row, TestApp};

#[tokio::test]
async fn calendar_lists_month_with_alternate_saturdays() {
    let app = TestApp::new(vec![], vec![]);
    let (status, body) = app.get_json("/api/calendar?year=2026&month=3").await;

    assert_eq!(status, 200);
    assert_eq!(body["workdays"], 24);
    let days = body["days"].as_array().expect("days");
    assert_eq!(days.len(), 31);
    assert_eq!(days[0]["is_holiday"], true);
    assert_eq!(days[0]["reason"], "sunday");
    assert_eq!(days[6]["reason"], "working_saturday");
    assert_eq!(days[13]["reason"], "alternate_saturday");
    assert_eq!(days[13]["label"], "saturday off");
    assert_eq!(days[6]["label"], "working saturday");
    assert_eq!(days[1]["weekday"], "T2");
}

#[tokio::test]
async fn out_of_range_month_is_rejected() {
    let app = TestApp::new(vec![], vec![]);
    let (status, body) = app.get_json("/api/timekeeping?year=2026&month=13").await;

    assert_eq!(status, 400);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn grid_follows_roster_and_aggregates_each_employee() {
    let binh = employee("NV002", "Vũ Thanh Bình", None);
    let toan = employee("NV010", "Phan Thanh Toàn", None);
    let hidden = employee("NV018", "Nguyễn Văn Ẩn", None);
    let rows = vec![
        worked_row(binh.id, date(2026, 3, 2), 8.0, 2.0),
        // Sunday work counts as weekend overtime.
        worked_row(binh.id, date(2026, 3, 1), 4.0, 0.0),
        worked_row(toan.id, date(2026, 3, 3), 8.0, 0.0),
    ];
    let app = TestApp::new(vec![binh.clone(), toan.clone(), hidden], rows);

    let (status, body) = app.get_json("/api/timekeeping?year=2026&month=3").await;
    assert_eq!(status, 200);
    assert_eq!(body["workdays"], 24);

    let employees = body["employees"].as_array().expect("employees");
    assert_eq!(employees.len(), 2);
    assert_eq!(employees[0]["full_name"], "Phan Thanh Toàn");
    assert_eq!(employees[1]["full_name"], "Vũ Thanh Bình");

    let aggregate = &employees[1]["aggregate"];
    assert_eq!(aggregate["total_standard"], 8.0);
    assert_eq!(aggregate["total_ot"], 2.0);
    assert_eq!(aggregate["total_ot_weekend"], 4.0);
    assert_eq!(aggregate["total_converted_ot"], 2.0 * 1.5 + 4.0 * 2.0);
    assert_eq!(aggregate["total_work"], 8.0 + 11.0);

    let days = employees[1]["days"].as_array().expect("days");
    assert_eq!(days.len(), 31);
    assert_eq!(days[1]["display"]["kind"], "hours");
    assert_eq!(days[1]["display"]["regular"], 10.0);
    assert_eq!(days[4]["display"]["kind"], "empty");

    // The editor opens on the stored entry, or a full day on empty workdays.
    assert_eq!(days[1]["entry"]["standard"], 8.0);
    assert_eq!(days[1]["entry"]["ot"], 2.0);
    assert_eq!(days[4]["entry"]["standard"], 8.0);
    assert_eq!(days[7]["entry"]["standard"], 0.0);
    assert_eq!(employees[1]["leave"]["base_quota_hours"], 96.0);
}

#[tokio::test]
async fn full_day_leave_drops_worked_hours_on_save() {
    let emp = employee("NV001", "Phan Thanh Toàn", None);
    let app = TestApp::new(vec![emp.clone()], vec![]);

    let (status, body) = app
        .send_json(
            Method::PUT,
            "/api/attendance",
            json!({
                "employee_id": emp.id,
                "date": "2026-03-02",
                "cell": { "standard": 8.0, "ot": 1.0, "leave": 8.0 }
            }),
        )
        .await;

    assert_eq!(status, 200);
    assert_eq!(body["upserted"], 1);
    let row = app.attendance.get(emp.id, date(2026, 3, 2)).expect("stored");
    assert_eq!(row.leave_hours, 8.0);
    assert_eq!(row.standard_hours, 0.0);
    assert_eq!(row.ot_hours, 0.0);
}

#[tokio::test]
async fn saving_an_empty_cell_deletes_it() {
    let emp = employee("NV001", "Phan Thanh Toàn", None);
    let on = date(2026, 3, 2);
    let app = TestApp::new(vec![emp.clone()], vec![worked_row(emp.id, on, 8.0, 0.0)]);

    let (status, body) = app
        .send_json(
            Method::PUT,
            "/api/attendance",
            json!({ "employee_id": emp.id, "date": "2026-03-02", "cell": {} }),
        )
        .await;

    assert_eq!(status, 200);
    assert_eq!(body["deleted"], 1);
    assert!(app.attendance.get(emp.id, on).is_none());
}

#[tokio::test]
async fn leave_must_be_half_or_full_day() {
    let emp = employee("NV001", "Phan Thanh Toàn", None);
    let app = TestApp::new(vec![emp.clone()], vec![]);

    let (status, body) = app
        .send_json(
            Method::PUT,
            "/api/attendance",
            json!({ "employee_id": emp.id, "date": "2026-03-02", "cell": { "leave": 2.0 } }),
        )
        .await;

    assert_eq!(status, 400);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(app.attendance.len(), 0);
}

#[tokio::test]
async fn bulk_upsert_then_bulk_delete() {
    let a = employee("NV001", "Phan Thanh Toàn", None);
    let b = employee("NV002", "Vũ Thanh Bình", None);
    let app = TestApp::new(vec![a.clone(), b.clone()], vec![]);
    let keys = json!([
        { "employee_id": a.id, "date": "2026-03-02" },
        { "employee_id": a.id, "date": "2026-03-03" },
        { "employee_id": b.id, "date": "2026-03-02" }
    ]);

    let (status, body) = app
        .send_json(
            Method::POST,
            "/api/attendance/bulk",
            json!({ "keys": keys, "cell": { "onsite_mode": 2, "onsite_place": 2 } }),
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["upserted"], 3);
    let row = app.attendance.get(b.id, date(2026, 3, 2)).expect("stored");
    assert_eq!(row.onsite_mode, 2);
    assert!(row.is_onsite);

    let (_, grid) = app.get_json("/api/timekeeping?year=2026&month=3").await;
    let binh = grid["employees"]
        .as_array()
        .and_then(|rows| rows.iter().find(|r| r["code"] == "NV002"))
        .expect("NV002");
    assert_eq!(binh["days"][1]["display"]["kind"], "onsite");
    assert_eq!(binh["days"][1]["display"]["place_label"], "Ngoài tỉnh");

    let (status, body) = app
        .send_json(
            Method::POST,
            "/api/attendance/bulk-delete",
            json!({ "keys": keys }),
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["deleted"], 3);
    assert_eq!(app.attendance.len(), 0);
}

#[tokio::test]
async fn single_cell_delete_uses_query_key() {
    let emp = employee("NV001", "Phan Thanh Toàn", None);
    let on = date(2026, 3, 5);
    let app = TestApp::new(vec![emp.clone()], vec![worked_row(emp.id, on, 8.0, 0.0)]);

    let uri = format!("/api/attendance?employee_id={}&date=2026-03-05", emp.id);
    let (status, body) = app.call(Method::DELETE, &uri).await;

    assert_eq!(status, 200);
    assert_eq!(body["deleted"], 1);
    assert!(app.attendance.get(emp.id, on).is_none());
}

#[tokio::test]
async fn failed_save_reports_dirty_cells_and_keeps_store() {
    let emp = employee("NV001", "Phan Thanh Toàn", None);
    let on = date(2026, 3, 2);
    let original: AttendanceRow = worked_row(emp.id, on, 8.0, 0.0);
    let app = TestApp::new(vec![emp.clone()], vec![original.clone()]);
    app.attendance.fail_writes(true);

    let (status, body) = app
        .send_json(
            Method::PUT,
            "/api/attendance",
            json!({
                "employee_id": emp.id,
                "date": "2026-03-02",
                "cell": { "standard": 4.0, "leave": 4.0 }
            }),
        )
        .await;

    assert_eq!(status, 500);
    assert_eq!(body["code"], "SAVE_FAILED");
    assert_eq!(body["details"]["dirty"][0]["date"], "2026-03-02");
    assert_eq!(app.attendance.get(emp.id, on), Some(original));
}

#[tokio::test]
async fn responses_carry_request_id() {
    let app = TestApp::new(vec![], vec![]);
    let response = app
        .request(Method::GET, "/api/calendar?year=2026&month=3", None)
        .await;
    assert!(response.headers().contains_key("x-request-id"));
}
