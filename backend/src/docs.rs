#![allow(dead_code)] // OpenAPI doc stubs are only referenced by utoipa macros.

use crate::handlers::{
    common::MonthQuery,
    dashboard::PresenceQuery,
    leave::{
        LeaveQuery, ResetQuotasRequest, ResetQuotasResponse, UpdateQuotaRequest,
        UpdateQuotaResponse,
    },
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        calendar_doc,
        timekeeping_doc,
        export_doc,
        upsert_cell_doc,
        bulk_upsert_doc,
        delete_cell_doc,
        bulk_delete_doc,
        import_punches_doc,
        list_leave_doc,
        update_quota_doc,
        reset_quotas_doc,
        payroll_doc,
        payslip_doc,
        send_all_doc,
        presence_doc
    ),
    components(schemas(
        UpdateQuotaRequest,
        UpdateQuotaResponse,
        ResetQuotasRequest,
        ResetQuotasResponse
    )),
    tags(
        (name = "Calendar", description = "Lịch làm việc và ngày nghỉ"),
        (name = "Timekeeping", description = "Bảng chấm công và chỉnh sửa ô công"),
        (name = "Leave", description = "Phép năm"),
        (name = "Payroll", description = "Tính lương và phiếu lương"),
        (name = "Dashboard", description = "Tình hình đi làm trong ngày")
    )
)]
pub struct ApiDoc;

#[utoipa::path(
    get,
    path = "/api/calendar",
    params(MonthQuery),
    responses(
        (status = 200, description = "Ngày trong tháng và số ngày công", body = serde_json::Value),
        (status = 400, description = "Tháng/năm không hợp lệ")
    ),
    tag = "Calendar"
)]
fn calendar_doc() {}

#[utoipa::path(
    get,
    path = "/api/timekeeping",
    params(MonthQuery),
    responses((status = 200, description = "Bảng chấm công theo tháng", body = serde_json::Value)),
    tag = "Timekeeping"
)]
fn timekeeping_doc() {}

#[utoipa::path(
    get,
    path = "/api/export",
    params(MonthQuery),
    responses((status = 200, description = "File CSV bảng chấm công", content_type = "text/csv")),
    tag = "Timekeeping"
)]
fn export_doc() {}

#[utoipa::path(
    put,
    path = "/api/attendance",
    request_body = serde_json::Value,
    responses(
        (status = 200, body = serde_json::Value),
        (status = 500, description = "Lưu thất bại, ô công được hoàn lại")
    ),
    tag = "Timekeeping"
)]
fn upsert_cell_doc() {}

#[utoipa::path(
    post,
    path = "/api/attendance/bulk",
    request_body = serde_json::Value,
    responses((status = 200, body = serde_json::Value)),
    tag = "Timekeeping"
)]
fn bulk_upsert_doc() {}

#[utoipa::path(
    delete,
    path = "/api/attendance",
    params(
        ("employee_id" = String, Query, description = "Mã nhân viên (UUID)"),
        ("date" = String, Query, description = "Ngày YYYY-MM-DD")
    ),
    responses((status = 200, body = serde_json::Value)),
    tag = "Timekeeping"
)]
fn delete_cell_doc() {}

#[utoipa::path(
    post,
    path = "/api/attendance/bulk-delete",
    request_body = serde_json::Value,
    responses((status = 200, body = serde_json::Value)),
    tag = "Timekeeping"
)]
fn bulk_delete_doc() {}

#[utoipa::path(
    post,
    path = "/api/attendance/punches",
    request_body = serde_json::Value,
    responses((status = 200, description = "Kết quả đồng bộ máy chấm công", body = serde_json::Value)),
    tag = "Timekeeping"
)]
fn import_punches_doc() {}

#[utoipa::path(
    get,
    path = "/api/leave",
    params(LeaveQuery),
    responses((status = 200, body = serde_json::Value)),
    tag = "Leave"
)]
fn list_leave_doc() {}

#[utoipa::path(
    put,
    path = "/api/employees/{id}/leave-quota",
    params(("id" = String, Path, description = "Mã nhân viên (UUID)")),
    request_body = UpdateQuotaRequest,
    responses(
        (status = 200, body = UpdateQuotaResponse),
        (status = 404, description = "Không tìm thấy nhân viên")
    ),
    tag = "Leave"
)]
fn update_quota_doc() {}

#[utoipa::path(
    post,
    path = "/api/leave/reset",
    request_body = ResetQuotasRequest,
    responses(
        (status = 200, body = ResetQuotasResponse),
        (status = 400, description = "Chưa xác nhận")
    ),
    tag = "Leave"
)]
fn reset_quotas_doc() {}

#[utoipa::path(
    post,
    path = "/api/payroll",
    request_body = serde_json::Value,
    responses((status = 200, body = serde_json::Value)),
    tag = "Payroll"
)]
fn payroll_doc() {}

#[utoipa::path(
    post,
    path = "/api/payroll/payslip",
    request_body = serde_json::Value,
    responses((status = 200, description = "Phiếu lương HTML", content_type = "text/html")),
    tag = "Payroll"
)]
fn payslip_doc() {}

#[utoipa::path(
    post,
    path = "/api/payroll/send-all",
    request_body = serde_json::Value,
    responses((status = 200, description = "Số phiếu đã gửi, lỗi và bỏ qua", body = serde_json::Value)),
    tag = "Payroll"
)]
fn send_all_doc() {}

#[utoipa::path(
    get,
    path = "/api/dashboard/presence",
    params(PresenceQuery),
    responses((status = 200, body = serde_json::Value)),
    tag = "Dashboard"
)]
fn presence_doc() {}
