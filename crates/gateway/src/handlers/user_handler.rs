//! User handlers.

use axum::{extract::Extension, response::Json, routing::get, Router};

use domain::UserProfile;

use crate::middleware::CurrentUser;
use crate::state::AppState;

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_current_user))
}

/// Get the profile of the token holder
#[utoipa::path(
    get,
    path = "/users/me",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user profile", body = UserProfile),
        (status = 401, description = "Missing, invalid or expired token")
    )
)]
pub async fn get_current_user(
    Extension(CurrentUser(profile)): Extension<CurrentUser>,
) -> Json<UserProfile> {
    Json(profile)
}
