//! User projection, persisted record, and supporting value types.
//!
//! [`UserRecord`] is the mutable shape the record store loads and saves.
//! [`User`] is the immutable projection handed to gear extensions; it is
//! rebuilt from a record on every call and never cached.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Organization, OrganizationRecord, ValidationErrors};

/// Validation errors returned by the value-type constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    /// The identifier was an empty string.
    EmptyId,
    /// The identifier was not a UUID.
    InvalidId,
    /// The username was empty.
    EmptyUsername,
    /// The username exceeded [`USERNAME_MAX`] characters.
    UsernameTooLong {
        /// Maximum permitted length.
        max: usize,
    },
    /// The username is not usable as a subdomain label.
    UsernameInvalidCharacters,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "user id must not be empty"),
            Self::InvalidId => write!(f, "user id must be a valid UUID"),
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::UsernameTooLong { max } => {
                write!(f, "username must be at most {max} characters")
            }
            Self::UsernameInvalidCharacters => write!(
                f,
                "username may only contain lowercase letters, numbers, or inner hyphens",
            ),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid);

impl UserId {
    /// Validate and construct a [`UserId`] from textual input.
    ///
    /// # Errors
    /// Returns [`UserValidationError::EmptyId`] or
    /// [`UserValidationError::InvalidId`] for unusable input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let id = id.as_ref();
        if id.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(UserValidationError::InvalidId);
        }
        Uuid::parse_str(id)
            .map(Self)
            .map_err(|_| UserValidationError::InvalidId)
    }

    /// Wrap an already-parsed UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Generate a new random [`UserId`].
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

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0.to_string()
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Maximum allowed length for a username; usernames double as DNS labels.
pub const USERNAME_MAX: usize = 63;

static USERNAME_RE: OnceLock<Regex> = OnceLock::new();

fn username_regex() -> &'static Regex {
    USERNAME_RE.get_or_init(|| {
        // Length is enforced separately; this constrains the label shape.
        let pattern = "^[a-z0-9](?:[a-z0-9-]*[a-z0-9])?$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("username regex failed to compile: {error}"))
    })
}

/// Account name, also used as the user's subdomain.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Validate and construct a [`Username`].
    ///
    /// # Errors
    /// Returns a [`UserValidationError`] when the value is empty, too long, or
    /// not a valid subdomain label.
    pub fn new(username: impl Into<String>) -> Result<Self, UserValidationError> {
        let username = username.into();
        if username.is_empty() {
            return Err(UserValidationError::EmptyUsername);
        }
        if username.chars().count() > USERNAME_MAX {
            return Err(UserValidationError::UsernameTooLong { max: USERNAME_MAX });
        }
        if !username_regex().is_match(&username) {
            return Err(UserValidationError::UsernameInvalidCharacters);
        }
        Ok(Self(username))
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl TryFrom<String> for Username {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Storage quota in bytes.
///
/// Signed to match the database column; negative values are representable so
/// the record validation can reject them with a field error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuotaInBytes(i64);

impl QuotaInBytes {
    /// No quota at all; the only valid quota for viewers.
    pub const ZERO: Self = Self(0);

    /// Wrap a raw byte count.
    #[must_use]
    pub const fn new(bytes: i64) -> Self {
        Self(bytes)
    }

    /// Raw byte count.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for QuotaInBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The two mutually exclusive user roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Read-only access, no storage quota.
    Viewer,
    /// Full editing rights with an assigned quota.
    Builder,
}

impl UserRole {
    /// Derive the role from the persisted `viewer` flag.
    #[must_use]
    pub const fn from_viewer_flag(viewer: bool) -> Self {
        if viewer { Self::Viewer } else { Self::Builder }
    }

    /// Stable lowercase name used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Viewer => "viewer",
            Self::Builder => "builder",
        }
    }
}

/// Persisted user as loaded by the record store.
///
/// Fields are public because the service mutates a loaded record and hands it
/// back to the store; the store runs [`UserRecord::apply_role_invariants`]
/// and [`UserRecord::validate`] before writing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    /// Primary key.
    pub id: UserId,
    /// Account name.
    pub username: Username,
    /// Contact address.
    pub email: String,
    /// Owning organization, if the user belongs to one.
    pub organization: Option<OrganizationRecord>,
    /// Enabled feature flag names.
    pub feature_flags: BTreeSet<String>,
    /// Assigned storage quota.
    pub quota_in_bytes: QuotaInBytes,
    /// Editing disabled when true.
    pub viewer: bool,
    /// First dashboard visit, unset until the user opens it.
    pub dashboard_viewed_at: Option<DateTime<Utc>>,
    /// Account was created through Google sign-in.
    pub google_sign_in: bool,
    /// Last time a local password was set.
    pub last_password_change_date: Option<DateTime<Utc>>,
}

impl UserRecord {
    /// Build a standalone builder record with no quota and no organization.
    #[must_use]
    pub fn new(id: UserId, username: Username, email: impl Into<String>) -> Self {
        Self {
            id,
            username,
            email: email.into(),
            organization: None,
            feature_flags: BTreeSet::new(),
            quota_in_bytes: QuotaInBytes::ZERO,
            viewer: false,
            dashboard_viewed_at: None,
            google_sign_in: false,
            last_password_change_date: None,
        }
    }

    /// Current role derived from the `viewer` flag.
    #[must_use]
    pub const fn role(&self) -> UserRole {
        UserRole::from_viewer_flag(self.viewer)
    }

    /// Whether the user may change their email address.
    ///
    /// Accounts created through Google sign-in have no local password until
    /// one is set explicitly; until then the address is owned by Google.
    #[must_use]
    pub fn can_change_email(&self) -> bool {
        !self.google_sign_in || self.last_password_change_date.is_some()
    }

    /// Normalise fields that follow from the role. Viewers hold no quota.
    pub fn apply_role_invariants(&mut self) {
        if self.viewer {
            self.quota_in_bytes = QuotaInBytes::ZERO;
        }
    }

    /// Check record-level constraints enforced on every save.
    ///
    /// # Errors
    /// Returns every failing field with its messages.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if !is_plausible_email(&self.email) {
            errors.add("email", "is not a valid address");
        }
        if self.quota_in_bytes < QuotaInBytes::ZERO {
            errors.add("quota_in_bytes", "must be greater than or equal to 0");
        }
        if self.viewer && self.quota_in_bytes != QuotaInBytes::ZERO {
            errors.add("quota_in_bytes", "must be 0 for viewers");
        }

        errors.into_result()
    }
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !domain.contains('@') && domain.contains('.')
        }
        None => false,
    }
}

/// Read-only user view handed to gear extensions.
///
/// ## Invariants
/// - Built from a [`UserRecord`] at the moment of projection; later changes to
///   the record are not reflected.
/// - `viewer` and the quota follow the record's role invariants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    id: UserId,
    username: Username,
    email: String,
    organization: Option<Organization>,
    feature_flags: BTreeSet<String>,
    can_change_email: bool,
    quota_in_bytes: QuotaInBytes,
    viewer: bool,
}

impl User {
    /// Project a persisted user, including its organization when present.
    #[must_use]
    pub fn from_record(record: &UserRecord) -> Self {
        Self {
            id: record.id,
            username: record.username.clone(),
            email: record.email.clone(),
            organization: record.organization.as_ref().map(Organization::from_record),
            feature_flags: record.feature_flags.clone(),
            can_change_email: record.can_change_email(),
            quota_in_bytes: record.quota_in_bytes,
            viewer: record.viewer,
        }
    }

    /// Stable user identifier.
    #[must_use]
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Account name.
    #[must_use]
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Contact address.
    #[must_use]
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Owning organization, if any.
    #[must_use]
    pub fn organization(&self) -> Option<&Organization> {
        self.organization.as_ref()
    }

    /// Enabled feature flag names.
    #[must_use]
    pub fn feature_flags(&self) -> &BTreeSet<String> {
        &self.feature_flags
    }

    /// Whether a feature flag is enabled for this user.
    #[must_use]
    pub fn has_feature_flag(&self, flag: &str) -> bool {
        self.feature_flags.contains(flag)
    }

    /// Whether the user may change their email address.
    #[must_use]
    pub fn can_change_email(&self) -> bool {
        self.can_change_email
    }

    /// Assigned storage quota.
    #[must_use]
    pub fn quota_in_bytes(&self) -> QuotaInBytes {
        self.quota_in_bytes
    }

    /// Editing disabled when true.
    #[must_use]
    pub fn viewer(&self) -> bool {
        self.viewer
    }

    /// Role derived from the `viewer` flag.
    #[must_use]
    pub const fn role(&self) -> UserRole {
        UserRole::from_viewer_flag(self.viewer)
    }
}
