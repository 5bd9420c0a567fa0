pub mod config;
pub mod db;
pub mod docs;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod services;
pub mod state;
pub mod types;
pub mod utils;
pub mod validation;

use axum::{
    http::Method,
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/api/calendar", get(handlers::calendar::get_month_calendar))
        .route(
            "/api/timekeeping",
            get(handlers::timekeeping::get_timekeeping),
        )
        .route("/api/export", get(handlers::timekeeping::export_timekeeping))
        .route(
            "/api/attendance",
            put(handlers::attendance::upsert_cell).delete(handlers::attendance::delete_cell),
        )
        .route(
            "/api/attendance/bulk",
            post(handlers::attendance::bulk_upsert_cells),
        )
        .route(
            "/api/attendance/bulk-delete",
            post(handlers::attendance::bulk_delete_cells),
        )
        .route(
            "/api/attendance/punches",
            post(handlers::attendance::import_punches),
        )
        .route("/api/leave", get(handlers::leave::list_leave))
        .route(
            "/api/employees/{id}/leave-quota",
            put(handlers::leave::update_leave_quota),
        )
        .route("/api/leave/reset", post(handlers::leave::reset_leave_quotas))
        .route("/api/payroll", post(handlers::payroll::compute_payroll))
        .route(
            "/api/payroll/payslip",
            post(handlers::payroll::render_payslip),
        )
        .route(
            "/api/payroll/send-all",
            post(handlers::payroll::send_all_payslips),
        )
        .route(
            "/api/dashboard/presence",
            get(handlers::dashboard::get_presence),
        )
        .with_state(state);

    Router::new()
        .merge(api)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", docs::ApiDoc::openapi()))
        .layer(axum_middleware::from_fn(
            middleware::logging::log_error_responses,
        ))
        .layer(axum_middleware::from_fn(middleware::request_id::request_id))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods([
                            Method::GET,
                            Method::POST,
                            Method::PUT,
                            Method::DELETE,
                            Method::OPTIONS,
                        ])
                        .allow_headers(Any)
                        .max_age(std::time::Duration::from_secs(24 * 60 * 60)),
                ),
        )
}
