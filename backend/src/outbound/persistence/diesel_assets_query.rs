//! PostgreSQL-backed `AssetsQuery` implementation.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::AssetsQuery;
use crate::domain::{Asset, AssetId, AssetKind, Error, UserId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::AssetRow;
use super::pool::{DbPool, PoolError};
use super::schema::assets;

const ASSET_STORE_UNAVAILABLE: &str = "asset store unavailable";

/// Diesel-backed implementation of the `AssetsQuery` port.
#[derive(Clone)]
pub struct DieselAssetsQuery {
    pool: DbPool,
}

impl DieselAssetsQuery {
    /// Create a new query adapter with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_unavailable(error: PoolError) -> Error {
    map_pool_error(error, |message| {
        Error::service_unavailable(format!("{ASSET_STORE_UNAVAILABLE}: {message}"))
    })
}

fn row_to_asset(row: AssetRow) -> Asset {
    let kind = AssetKind::parse(&row.kind).unwrap_or_else(|| {
        warn!(
            value = row.kind.as_str(),
            asset_id = %row.id,
            "unrecognised asset kind, treating as user asset"
        );
        AssetKind::UserAsset
    });

    Asset {
        id: AssetId::from_uuid(row.id),
        user_id: UserId::from_uuid(row.user_id),
        public_url: row.public_url,
        kind,
        created_at: row.created_at,
    }
}

#[async_trait]
impl AssetsQuery for DieselAssetsQuery {
    async fn list_assets(&self, user_id: &UserId) -> Result<Vec<Asset>, Error> {
        let mut conn = self.pool.get().await.map_err(pool_unavailable)?;

        let rows: Vec<AssetRow> = assets::table
            .filter(assets::user_id.eq(user_id.as_uuid()))
            .order(assets::created_at.asc())
            .select(AssetRow::as_select())
            .load(&mut conn)
            .await
            .map_err(|err| {
                map_diesel_error(
                    err,
                    |message| Error::internal(format!("asset query failed: {message}")),
                    |message| Error::service_unavailable(format!("{ASSET_STORE_UNAVAILABLE}: {message}")),
                )
            })?;

        Ok(rows.into_iter().map(row_to_asset).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use chrono::Utc;
    use rstest::rstest;
    use uuid::Uuid;

    fn row(kind: &str) -> AssetRow {
        AssetRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            public_url: "https://assets.example.com/a.png".to_owned(),
            kind: kind.to_owned(),
            created_at: Utc::now(),
        }
    }

    #[rstest]
    #[case("organization_asset", AssetKind::OrganizationAsset)]
    #[case("user_asset", AssetKind::UserAsset)]
    #[case("legacy", AssetKind::UserAsset)]
    fn row_converts_kind(#[case] raw: &str, #[case] expected: AssetKind) {
        let source = row(raw);
        let user_id = source.user_id;

        let asset = row_to_asset(source);

        assert_eq!(asset.kind, expected);
        assert_eq!(asset.user_id.as_uuid(), &user_id);
        assert_eq!(asset.public_url, "https://assets.example.com/a.png");
    }

    #[rstest]
    fn pool_failures_do_not_echo_connection_details() {
        let error = pool_unavailable(PoolError::checkout(
            "connection to server at \"10.0.0.5\", port 5432 failed",
        ));

        assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
        assert_eq!(error.message(), "asset store unavailable: database pool unavailable");
    }
}
