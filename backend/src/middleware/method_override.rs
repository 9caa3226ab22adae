//! `POST ...?_method=PUT` rewriting for form-style clients
//!
//! Must wrap the whole router: once a route has matched, changing the
//! method no longer has any effect.

use axum::http::{Method, Request};

const OVERRIDE_PARAM: &str = "_method";

/// Replace the method of a POST request carrying `_method=PUT|PATCH|DELETE`
pub fn method_override<B>(mut request: Request<B>) -> Request<B> {
    if request.method() == Method::POST {
        if let Some(method) = request.uri().query().and_then(override_target) {
            tracing::debug!(%method, path = %request.uri().path(), "Method override");
            *request.method_mut() = method;
        }
    }
    request
}

fn override_target(query: &str) -> Option<Method> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == OVERRIDE_PARAM)
        .and_then(|(_, value)| match value.to_ascii_uppercase().as_str() {
            "PUT" => Some(Method::PUT),
            "PATCH" => Some(Method::PATCH),
            "DELETE" => Some(Method::DELETE),
            _ => None,
        })
}
