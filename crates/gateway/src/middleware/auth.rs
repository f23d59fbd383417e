//! Bearer token authentication middleware.

use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, Request},
    middleware::Next,
    response::Response,
};

use common::AppError;
use domain::{constants::BEARER_SCHEME, UserProfile};

use crate::state::AppState;

/// Profile of the user the request's token was issued to.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub UserProfile);

/// Resolves the bearer token and stores the caller's profile in the request
/// extensions. Rejects with 401 when the header is missing or the token does
/// not resolve to an existing user.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_token(&request).ok_or(AppError::Unauthenticated)?;

    let profile = state.auth_service.resolve_current_user(&token).await?;

    request.extensions_mut().insert(CurrentUser(profile));

    Ok(next.run(request).await)
}

/// Extract the bearer token from the Authorization header.
///
/// The scheme is matched case-insensitively.
fn extract_token(request: &Request<Body>) -> Option<String> {
    let header = request.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = header.split_once(' ')?;

    if !scheme.eq_ignore_ascii_case(BEARER_SCHEME) {
        return None;
    }

    let token = token.trim();
    (!token.is_empty()).then(|| token.to_string())
}
