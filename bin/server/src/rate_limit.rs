//! Per-client admission control for the training routes.

use crate::error::ApiError;
use axum::{
    extract::{ConnectInfo, FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Response},
};
use medtrain_ratelimit::{Admission, RateLimiter};
use medtrain_training::TrainingError;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::time::Duration;

/// Bucket used when a request carries no identifying information.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Identity a request is rate limited under.
///
/// The first `X-Forwarded-For` entry wins, then the TCP peer address, then
/// [`UNKNOWN_CLIENT`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientId(pub String);

impl<S> FromRequestParts<S> for ClientId
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let forwarded = parts
            .headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty());

        if let Some(client) = forwarded {
            return Ok(ClientId(client.to_string()));
        }

        if let Some(ConnectInfo(addr)) = parts.extensions.get::<ConnectInfo<SocketAddr>>() {
            return Ok(ClientId(addr.ip().to_string()));
        }

        Ok(ClientId(UNKNOWN_CLIENT.to_string()))
    }
}

/// Middleware that refuses requests once a client exhausts its quota.
pub async fn rate_limit(
    State(limiter): State<RateLimiter>,
    ClientId(client): ClientId,
    request: Request,
    next: Next,
) -> Response {
    match limiter.check_and_record(&client) {
        Admission::Allowed { .. } => next.run(request).await,
        Admission::Rejected { retry_after, .. } => {
            tracing::warn!(client_id = %client, "rate limit exceeded");
            ApiError::from(TrainingError::RateLimited {
                remaining: limiter.remaining(&client),
                retry_after_secs: whole_seconds(retry_after),
            })
            .into_response()
        }
    }
}

fn whole_seconds(d: Duration) -> u64 {
    d.as_secs() + u64::from(d.subsec_nanos() > 0)
}
