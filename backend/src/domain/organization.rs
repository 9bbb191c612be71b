//! Organization projection and persisted record.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::QuotaInBytes;

/// Persisted organization as loaded by the record store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizationRecord {
    /// Primary key.
    pub id: Uuid,
    /// Organization name, unique across the platform.
    pub name: String,
    /// Quota assigned to new builders when no explicit quota is requested.
    pub default_quota_in_bytes: QuotaInBytes,
}

/// Read-only organization view handed to gear extensions.
///
/// Only the name is exposed; quotas and seats stay behind the record store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    name: String,
}

impl Organization {
    /// Project a persisted organization.
    #[must_use]
    pub fn from_record(record: &OrganizationRecord) -> Self {
        Self {
            name: record.name.clone(),
        }
    }

    /// Organization name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }
}
