//! Driving port for listing a user's assets.
//!
//! HTTP handlers use this port to fetch assets without importing outbound
//! persistence concerns.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Asset, AssetId, AssetKind, Error, UserId};

/// Domain use-case port for listing assets.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AssetsQuery: Send + Sync {
    /// Return every asset owned by `user_id`, oldest first.
    async fn list_assets(&self, user_id: &UserId) -> Result<Vec<Asset>, Error>;
}

/// Fixture assets query used when no database is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureAssetsQuery;

#[async_trait]
impl AssetsQuery for FixtureAssetsQuery {
    async fn list_assets(&self, user_id: &UserId) -> Result<Vec<Asset>, Error> {
        const FIXTURE_ASSET_ID: Uuid = Uuid::from_u128(0x6b1f_0c2e_4a7d_4e0b_9c55_2f3a_8d1e_7c40);

        Ok(vec![Asset {
            id: AssetId::from_uuid(FIXTURE_ASSET_ID),
            user_id: *user_id,
            public_url: "https://assets.example.com/uploads/marker.png".to_owned(),
            kind: AssetKind::UserAsset,
            created_at: DateTime::<Utc>::default(),
        }])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixture_assets_belong_to_the_caller() {
        let user_id = UserId::random();

        let assets = FixtureAssetsQuery
            .list_assets(&user_id)
            .await
            .expect("fixture assets");

        assert_eq!(assets.len(), 1);
        assert!(assets.iter().all(|asset| asset.user_id == user_id));
    }
}
