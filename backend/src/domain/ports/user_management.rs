//! Driving port exposing user role management to gear extensions.
//!
//! Extensions call this port in-process; [`UsersService`] is the production
//! implementation.
//!
//! [`UsersService`]: crate::domain::UsersService

use async_trait::async_trait;

use crate::domain::{QuotaInBytes, User, UserId, UsersServiceError};

use super::IdentityResolver;

/// Domain use-case port for reading and changing user roles.
#[async_trait]
pub trait UserManagement: Send + Sync {
    /// Project the user authenticated for the current request.
    ///
    /// Returns `Ok(None)` when the resolver reports no identity.
    async fn logged_user(
        &self,
        resolver: &dyn IdentityResolver,
    ) -> Result<Option<User>, UsersServiceError>;

    /// Turn an existing user into a viewer.
    async fn make_viewer(&self, user_id: &UserId) -> Result<User, UsersServiceError>;

    /// Turn an existing user into a builder.
    ///
    /// Without an explicit quota the organization default applies.
    async fn make_builder(
        &self,
        user_id: &UserId,
        quota_in_bytes: Option<QuotaInBytes>,
    ) -> Result<User, UsersServiceError>;
}
