//! OpenAPI documentation.

use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

use auth_core::{SignupResponse, TokenResponse};
use domain::UserProfile;

use crate::handlers::auth_handler::{LoginRequest, SignupRequest};

/// API documentation struct.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::auth_handler::signup,
        crate::handlers::auth_handler::login,
        crate::handlers::user_handler::get_current_user,
    ),
    components(
        schemas(
            SignupRequest,
            LoginRequest,
            SignupResponse,
            TokenResponse,
            UserProfile,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Signup and login"),
        (name = "Users", description = "Authenticated user endpoints"),
    )
)]
pub struct ApiDoc;

/// Security scheme modifier.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
