//! User-owned assets (uploaded images and icons used in maps).

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::UserId;

/// Stable asset identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(Uuid);

impl AssetId {
    /// Wrap an already-parsed UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Generate a new random identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where an asset is shared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    /// Private to the owning user.
    UserAsset,
    /// Shared with every member of the owner's organization.
    OrganizationAsset,
}

impl AssetKind {
    /// Column value used by the record store.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UserAsset => "user_asset",
            Self::OrganizationAsset => "organization_asset",
        }
    }

    /// Parse a stored column value.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "user_asset" => Some(Self::UserAsset),
            "organization_asset" => Some(Self::OrganizationAsset),
            _ => None,
        }
    }
}

/// Asset owned by a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    /// Primary key.
    pub id: AssetId,
    /// Owner.
    pub user_id: UserId,
    /// Publicly reachable URL of the stored file.
    pub public_url: String,
    /// Sharing scope.
    pub kind: AssetKind,
    /// Upload time.
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(AssetKind::UserAsset)]
    #[case(AssetKind::OrganizationAsset)]
    fn kind_parses_its_own_column_value(#[case] kind: AssetKind) {
        assert_eq!(AssetKind::parse(kind.as_str()), Some(kind));
    }

    #[rstest]
    fn kind_rejects_unknown_values() {
        assert_eq!(AssetKind::parse("avatar"), None);
    }
}
