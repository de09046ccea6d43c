use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{authorization::Bearer, Authorization, HeaderMapExt};
use uuid::Uuid;

use crate::auth::jwt::verify_token;
use crate::config::Config;
use crate::error::AppError;
use crate::AppState;

#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
}

fn authenticate(headers: &HeaderMap, config: &Config) -> Result<AuthUser, AppError> {
    let bearer = headers
        .typed_get::<Authorization<Bearer>>()
        .ok_or(AppError::Unauthorized)?;

    let token_data = verify_token(bearer.token(), config)?;

    Ok(AuthUser {
        id: token_data.claims.sub,
    })
}

pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_user = authenticate(req.headers(), &state.config)?;
    req.extensions_mut().insert(auth_user);
    Ok(next.run(req).await)
}

/// Attaches an [`AuthUser`] when a valid bearer token is present and lets the
/// request through either way.
pub async fn optional_auth(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    match authenticate(req.headers(), &state.config) {
        Ok(auth_user) => {
            req.extensions_mut().insert(auth_user);
        }
        Err(_) => {
            tracing::debug!(path = %req.uri().path(), "No valid session, continuing anonymously");
        }
    }
    next.run(req).await
}
