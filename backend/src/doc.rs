//! OpenAPI document for the HTTP surface.
//!
//! Registers the assets and health paths, the error envelope schemas, and the
//! session cookie security scheme. Swagger UI serves it in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::assets::{AssetPayload, AssetsResponse};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};

struct SessionCookieAddon;

impl Modify for SessionCookieAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default)
            .add_security_scheme(
                "SessionCookie",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                    "session",
                    "Signed session cookie scoped to the request subdomain.",
                ))),
            );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SessionCookieAddon),
    info(
        title = "Gears users API",
        description = "Asset listing for signed-in viewers plus health probes."
    ),
    servers((url = "/", description = "Relative to the deployment base URL")),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::assets::list_assets,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(AssetPayload, AssetsResponse, ErrorSchema, ErrorCodeSchema)),
    tags(
        (name = "assets", description = "Assets owned by the signed-in viewer"),
        (name = "health", description = "Orchestration probes")
    )
)]
pub struct ApiDoc;
