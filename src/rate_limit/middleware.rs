//! Rate-limit middleware
//!
//! Wraps the router; unprotected paths pass straight through.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use tracing::warn;

use crate::models::RateLimitedResponse;
use crate::rate_limit::{FixedWindowLimiter, RateDecision};

/// Client id used when neither a forwarded address nor a peer address is known.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Axum middleware enforcing [`FixedWindowLimiter`] on protected paths.
pub async fn rate_limit_middleware(
    State(limiter): State<Arc<FixedWindowLimiter>>,
    req: Request,
    next: Next,
) -> Response {
    let path = req.uri().path().to_string();
    if !limiter.is_protected(&path) {
        return next.run(req).await;
    }

    let client = client_id(&req);
    match limiter.check(&client, &path) {
        RateDecision::Allowed { .. } => next.run(req).await,
        RateDecision::Limited { retry_after } => {
            warn!(client = %client, path = %path, "rate limit exceeded");
            too_many_requests(retry_after.as_millis() as u64)
        }
    }
}

/// Identifies the caller: first `X-Forwarded-For` hop, then the peer address.
pub fn client_id(req: &Request) -> String {
    let forwarded = req
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    if let Some(addr) = forwarded {
        return addr.to_string();
    }

    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

fn too_many_requests(retry_after_ms: u64) -> Response {
    let mut response = (
        StatusCode::TOO_MANY_REQUESTS,
        Json(RateLimitedResponse::default()),
    )
        .into_response();

    let retry_after_secs = retry_after_ms.div_ceil(1000).max(1);
    if let Ok(value) = HeaderValue::from_str(&retry_after_secs.to_string()) {
        response.headers_mut().insert(header::RETRY_AFTER, value);
    }
    response
}
