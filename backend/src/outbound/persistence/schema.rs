//! Diesel table definitions for the PostgreSQL schema.
//!
//! Migrations live with the platform database and are not managed here; keep
//! these definitions in step with them (`diesel print-schema` regenerates
//! them from a live database).

diesel::table! {
    /// Organizations users can belong to.
    organizations (id) {
        /// Primary key.
        id -> Uuid,
        /// Unique organization name.
        name -> Varchar,
        /// Quota granted to new builders when none is requested.
        default_quota_in_bytes -> Int8,
    }
}

diesel::table! {
    /// User accounts.
    users (id) {
        /// Primary key.
        id -> Uuid,
        /// Account name, doubles as the user's subdomain.
        username -> Varchar,
        /// Contact address.
        email -> Varchar,
        /// Owning organization.
        organization_id -> Nullable<Uuid>,
        /// Enabled feature flag names.
        feature_flags -> Array<Text>,
        /// Assigned storage quota.
        quota_in_bytes -> Int8,
        /// Editing disabled when true.
        viewer -> Bool,
        /// First dashboard visit.
        dashboard_viewed_at -> Nullable<Timestamptz>,
        /// Created through Google sign-in.
        google_sign_in -> Bool,
        /// Last local password change.
        last_password_change_date -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Files uploaded by users.
    assets (id) {
        /// Primary key.
        id -> Uuid,
        /// Owner.
        user_id -> Uuid,
        /// Public URL of the stored file.
        public_url -> Text,
        /// `user_asset` or `organization_asset`.
        kind -> Varchar,
        /// Upload time.
        created_at -> Timestamptz,
    }
}

diesel::joinable!(users -> organizations (organization_id));
diesel::joinable!(assets -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(organizations, users, assets);
