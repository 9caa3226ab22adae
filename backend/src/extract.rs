//! Request extractors that reject with the `AppError` envelope

use axum::extract::{
    rejection::{JsonRejection, PathRejection, QueryRejection},
    FromRequest, FromRequestParts,
};

use crate::error::AppError;

/// JSON body
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Query string
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);

/// Path parameters
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        routing::{get, post},
        Json, Router,
    };
    use rust_decimal::Decimal;
    use serde::Deserialize;
    use tower::ServiceExt;
    use uuid::Uuid;

    #[derive(Deserialize)]
    struct Entry {
        quantity: Decimal,
    }

    #[derive(Deserialize)]
    struct Filter {
        page: Option<u32>,
    }

    fn app() -> Router {
        Router::new()
            .route(
                "/entries",
                post(|ApiJson(entry): ApiJson<Entry>| async move { Json(entry.quantity) })
                    .get(|ApiQuery(filter): ApiQuery<Filter>| async move { Json(filter.page) }),
            )
            .route(
                "/entries/:id",
                get(|ApiPath(id): ApiPath<Uuid>| async move { Json(id) }),
            )
    }

    async fn error_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_bad_json_uses_error_envelope() {
        let response = app()
            .oneshot(
                Request::post("/entries")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"quantity":"lots"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = error_body(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn test_missing_content_type_uses_error_envelope() {
        let response = app()
            .oneshot(
                Request::post("/entries")
                    .body(Body::from(r#"{"quantity":"1"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error_body(response).await["success"], false);
    }

    #[tokio::test]
    async fn test_bad_query_and_path_use_error_envelope() {
        let response = app()
            .oneshot(Request::get("/entries?page=first").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error_body(response).await["error"]["code"], "BAD_REQUEST");

        let response = app()
            .oneshot(Request::get("/entries/not-a-uuid").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error_body(response).await["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn test_valid_requests_pass_through() {
        let response = app()
            .oneshot(
                Request::post("/entries")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"quantity":"2.5"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
