// src/utils/access.rs

use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::Next,
    response::Response,
};
use subtle::ConstantTimeEq;

use crate::{config::Config, error::AppError};

/// Axum Middleware: leaderboard access gate.
///
/// If no shared secret is configured, every request passes (public mode).
/// If one is configured, the request must carry it as
/// 'Authorization: Bearer <secret>'. The comparison is constant-time; this
/// gate is the only access control in the system.
///
/// The rejection message is deliberately distinct from Moodle's own
/// "Access control exception" so operators can tell which layer refused.
pub async fn access_middleware(
    State(config): State<Config>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let Some(secret) = &config.leaderboard_secret else {
        return Ok(next.run(req).await);
    };

    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let token = match auth_header {
        Some(header) if header.starts_with("Bearer ") => &header[7..],
        _ => {
            return Err(AppError::Unauthorized(
                "Unauthorized (invalid leaderboard secret)".to_string(),
            ));
        }
    };

    if bool::from(token.as_bytes().ct_eq(secret.as_bytes())) {
        Ok(next.run(req).await)
    } else {
        Err(AppError::Unauthorized(
            "Unauthorized (invalid leaderboard secret)".to_string(),
        ))
    }
}
