use axum::{
    body::Body,
    http::Request,
    routing::get,
    Extension, Router,
};
use hrportal_backend::middleware::request_id::{request_id, RequestId};
use tower::ServiceExt;
use uuid::Uuid;

fn echo_router() -> Router {
    Router::new()
        .route(
            "/echo",
            get(|Extension(id): Extension<RequestId>| async move { id.0 }),
        )
        .layer(axum::middleware::from_fn(request_id))
}

#[tokio::test]
async fn fresh_id_is_issued_and_exposed_to_handlers() {
    let response = echo_router()
        .oneshot(Request::builder().uri("/echo").body(Body::empty()).unwrap())
        .await
        .unwrap();

    let id = response
        .headers()
        .get("x-request-id")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(Uuid::parse_str(&id).is_ok());

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(body, id.as_bytes());
}

#[tokio::test]
async fn client_id_is_echoed() {
    let response = echo_router()
        .oneshot(
            Request::builder()
                .uri("/echo")
                .header("x-request-id", "portal-req-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response.headers().get("x-request-id").unwrap(),
        "portal-req-123"
    );
}

#[tokio::test]
async fn malformed_client_id_is_replaced() {
    let response = echo_router()
        .oneshot(
            Request::builder()
                .uri("/echo")
                .header("x-request-id", "bad id with spaces")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let id = response.headers().get("x-request-id").unwrap().to_str().unwrap();
    assert!(Uuid::parse_str(id).is_ok());
}
