//! Cross-origin headers for the notification endpoint.
//!
//! The browser subscribes with `withCredentials: true`, so the allowed origin
//! must be the single configured application origin rather than `*`.
//! `tower_http::cors::CorsLayer` refuses to pair credentials with wildcard
//! allow-headers, so the headers are stamped directly on every response.

use axum::http::header::{
    ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_EXPOSE_HEADERS,
};
use axum::http::HeaderValue;
use axum::Router;
use tower_http::set_header::SetResponseHeaderLayer;

/// Methods the endpoint answers cross-origin.
pub const ALLOWED_METHODS: &str = "OPTIONS, GET";

/// Apply the cross-origin headers for `origin` to every response of `router`.
pub(crate) fn with_cors<S>(router: Router<S>, origin: HeaderValue) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_ORIGIN,
            origin,
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_CREDENTIALS,
            HeaderValue::from_static("true"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOWED_METHODS),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_EXPOSE_HEADERS,
            HeaderValue::from_static("*"),
        ))
}
