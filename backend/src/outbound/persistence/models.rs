//! Internal Diesel row structs.
//!
//! These types mirror the table layout and never leave the persistence
//! module; repositories convert them to domain records.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{assets, organizations, users};

/// Row struct for reading from the organizations table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = organizations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct OrganizationRow {
    pub id: Uuid,
    pub name: String,
    pub default_quota_in_bytes: i64,
}

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub organization_id: Option<Uuid>,
    pub feature_flags: Vec<String>,
    pub quota_in_bytes: i64,
    pub viewer: bool,
    pub dashboard_viewed_at: Option<DateTime<Utc>>,
    pub google_sign_in: bool,
    pub last_password_change_date: Option<DateTime<Utc>>,
}

/// Changeset written when a user's role changes.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct UserRoleUpdate {
    pub viewer: bool,
    pub quota_in_bytes: i64,
}

/// Row struct for reading from the assets table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = assets)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AssetRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub public_url: String,
    pub kind: String,
    pub created_at: DateTime<Utc>,
}
