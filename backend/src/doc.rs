//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every inbound HTTP path, the request and response
//! bodies they use, and the session cookie security scheme. The document is
//! served by Swagger UI in debug builds and printed by
//! `cargo run --bin openapi-dump` for external tooling.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::ErrorCode;
use crate::domain::error::ErrorDto;
use crate::inbound::http::bands::{BandResponse, LikeResponse, NewBandRequest, YearInput};
use crate::inbound::http::session::Theme;
use crate::inbound::http::theme::ThemeBody;
use crate::inbound::http::users::{LoginRequest, RegisterRequest, UserResponse};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login or /api/v1/register.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Bandstand API",
        description = "Band catalogue: browse, filter, like, and contribute bands.",
        license(name = "ISC", url = "https://opensource.org/license/isc-license-txt")
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::bands::list_bands,
        crate::inbound::http::bands::list_genres,
        crate::inbound::http::bands::get_band,
        crate::inbound::http::bands::add_band,
        crate::inbound::http::bands::toggle_like,
        crate::inbound::http::users::register,
        crate::inbound::http::users::login,
        crate::inbound::http::users::logout,
        crate::inbound::http::users::current_user,
        crate::inbound::http::theme::get_theme,
        crate::inbound::http::theme::set_theme,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        BandResponse,
        NewBandRequest,
        YearInput,
        LikeResponse,
        RegisterRequest,
        LoginRequest,
        UserResponse,
        Theme,
        ThemeBody,
        ErrorDto,
        ErrorCode
    )),
    tags(
        (name = "bands", description = "Catalogue browsing, submissions and likes"),
        (name = "users", description = "Registration and sessions"),
        (name = "preferences", description = "Per-session display preferences"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
