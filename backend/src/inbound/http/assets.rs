//! Assets API handlers.
//!
//! ```text
//! GET /api/v1/assets
//! ```

use actix_web::{get, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::Asset;
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// JSON shape of a single asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AssetPayload {
    /// Asset identifier.
    pub id: Uuid,
    /// Public URL of the stored file.
    #[schema(example = "https://assets.example.com/uploads/marker.png")]
    pub public_url: String,
    /// Sharing scope.
    #[schema(example = "user_asset")]
    pub kind: String,
}

/// Response body for `GET /api/v1/assets`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AssetsResponse {
    /// Number of entries in `assets`.
    pub total_entries: usize,
    /// Presented assets.
    pub assets: Vec<AssetPayload>,
}

impl From<Vec<AssetPayload>> for AssetsResponse {
    fn from(assets: Vec<AssetPayload>) -> Self {
        Self {
            total_entries: assets.len(),
            assets,
        }
    }
}

/// Renders domain assets as JSON payloads.
pub struct AssetPresenter;

impl AssetPresenter {
    /// Present one asset.
    pub fn to_hash(asset: &Asset) -> AssetPayload {
        AssetPayload {
            id: *asset.id.as_uuid(),
            public_url: asset.public_url.clone(),
            kind: asset.kind.as_str().to_owned(),
        }
    }

    /// Present a collection, preserving order.
    pub fn collection_to_hash(assets: &[Asset]) -> Vec<AssetPayload> {
        assets.iter().map(Self::to_hash).collect()
    }
}

/// List the current viewer's assets.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use gears_backend::inbound::http::assets::list_assets;
///
/// let app = App::new().service(list_assets);
/// ```
#[utoipa::path(
    get,
    path = "/api/v1/assets",
    responses(
        (status = 200, description = "Assets owned by the viewer", body = AssetsResponse),
        (status = 301, description = "Redirect to the https URL"),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Plain HTTP for a non-GET request", body = ErrorSchema),
        (status = 503, description = "Asset store unavailable", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["assets"],
    operation_id = "listAssets"
)]
#[get("/assets")]
pub async fn list_assets(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<AssetsResponse>> {
    let user_id = session.require_user_id()?;
    let assets = state.assets.list_assets(&user_id).await?;
    Ok(web::Json(AssetPresenter::collection_to_hash(&assets).into()))
}
