//! Response header middleware.
//!
//! Adds to every response:
//! - X-Content-Type-Options
//! - Referrer-Policy
//!
//! No Content-Security-Policy is set: pages embed author HTML and load
//! their stylesheet from a CDN.

use axum::http::HeaderValue;
use axum::http::header::{HeaderName, REFERRER_POLICY, X_CONTENT_TYPE_OPTIONS};
use tower_http::set_header::SetResponseHeaderLayer;

/// Referrer-Policy header value.
const REFERRER: &str = "strict-origin-when-cross-origin";

/// Create layer that adds X-Content-Type-Options header.
pub(crate) fn content_type_options_layer() -> SetResponseHeaderLayer<HeaderValue> {
    overriding(X_CONTENT_TYPE_OPTIONS, "nosniff")
}

/// Create layer that adds Referrer-Policy header.
pub(crate) fn referrer_policy_layer() -> SetResponseHeaderLayer<HeaderValue> {
    overriding(REFERRER_POLICY, REFERRER)
}

fn overriding(name: HeaderName, value: &'static str) -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::overriding(name, HeaderValue::from_static(value))
}
