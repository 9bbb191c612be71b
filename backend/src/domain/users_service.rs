//! Users domain service.
//!
//! Implements the [`UserManagement`] driving port: it loads a persisted user,
//! applies a role transition, hands the record back to the store, and returns
//! a fresh [`User`] projection.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, info};

use crate::domain::ports::{
    IdentityResolver, UserManagement, UserRecordRepository, UserRecordRepositoryError,
};
use crate::domain::{Error, QuotaInBytes, User, UserId, UserRecord, ValidationErrors};

/// Failures surfaced by [`UsersService`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UsersServiceError {
    /// No record exists for the requested id.
    #[error("{kind} {id} not found")]
    RecordNotFound {
        /// Record type that was looked up.
        kind: &'static str,
        /// Identifier that missed.
        id: String,
    },
    /// The store rejected the mutated record.
    #[error("validation failed: {errors}")]
    ValidationFailed {
        /// Field-level failures.
        errors: ValidationErrors,
    },
    /// The store could not be reached or the query failed.
    #[error("user storage failed: {message}")]
    Storage {
        /// Adapter-provided description.
        message: String,
    },
}

impl UsersServiceError {
    fn user_not_found(id: &UserId) -> Self {
        Self::RecordNotFound {
            kind: "User",
            id: id.to_string(),
        }
    }
}

impl From<UserRecordRepositoryError> for UsersServiceError {
    fn from(error: UserRecordRepositoryError) -> Self {
        match error {
            UserRecordRepositoryError::Validation { errors } => Self::ValidationFailed { errors },
            UserRecordRepositoryError::NotFound { id } => Self::RecordNotFound { kind: "User", id },
            UserRecordRepositoryError::Connection { message }
            | UserRecordRepositoryError::Query { message } => Self::Storage { message },
        }
    }
}

impl From<UsersServiceError> for Error {
    fn from(error: UsersServiceError) -> Self {
        match error {
            UsersServiceError::RecordNotFound { kind, id } => {
                Error::not_found(format!("{kind} not found"))
                    .with_details(json!({ "kind": kind, "id": id }))
            }
            UsersServiceError::ValidationFailed { errors } => {
                Error::invalid_request("validation failed")
                    .with_details(json!({ "errors": errors }))
            }
            UsersServiceError::Storage { message } => {
                debug!(%message, "user storage failure");
                Error::service_unavailable("user storage unavailable")
            }
        }
    }
}

/// Role transitions on persisted users.
#[derive(Clone)]
pub struct UsersService<R> {
    user_repo: Arc<R>,
}

impl<R> UsersService<R> {
    /// Create a new service backed by the given repository.
    pub fn new(user_repo: Arc<R>) -> Self {
        Self { user_repo }
    }
}

impl<R> UsersService<R>
where
    R: UserRecordRepository,
{
    async fn load(&self, user_id: &UserId) -> Result<UserRecord, UsersServiceError> {
        self.user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| UsersServiceError::user_not_found(user_id))
    }

    async fn persist(&self, record: &UserRecord) -> Result<User, UsersServiceError> {
        match self.user_repo.save(record).await {
            Ok(()) => {}
            Err(UserRecordRepositoryError::Validation { errors }) => {
                debug!(user_id = %record.id, %errors, "user record rejected");
                return Err(UsersServiceError::ValidationFailed { errors });
            }
            Err(other) => return Err(other.into()),
        }

        // Reload so the projection reflects what the store actually kept.
        let saved = self.load(&record.id).await?;
        info!(
            user_id = %saved.id,
            role = saved.role().as_str(),
            "user role updated"
        );
        Ok(User::from_record(&saved))
    }
}

#[async_trait]
impl<R> UserManagement for UsersService<R>
where
    R: UserRecordRepository,
{
    async fn logged_user(
        &self,
        resolver: &dyn IdentityResolver,
    ) -> Result<Option<User>, UsersServiceError> {
        let Some(user_id) = resolver.authenticated_user_id() else {
            return Ok(None);
        };
        let record = self.load(&user_id).await?;
        Ok(Some(User::from_record(&record)))
    }

    async fn make_viewer(&self, user_id: &UserId) -> Result<User, UsersServiceError> {
        let mut record = self.load(user_id).await?;
        record.viewer = true;
        self.persist(&record).await
    }

    async fn make_builder(
        &self,
        user_id: &UserId,
        quota_in_bytes: Option<QuotaInBytes>,
    ) -> Result<User, UsersServiceError> {
        let mut record = self.load(user_id).await?;
        record.viewer = false;

        let quota = quota_in_bytes.or_else(|| {
            record
                .organization
                .as_ref()
                .map(|organization| organization.default_quota_in_bytes)
        });
        let Some(quota) = quota else {
            let mut errors = ValidationErrors::new();
            errors.add("quota_in_bytes", "can't be blank");
            debug!(user_id = %record.id, %errors, "builder quota missing");
            return Err(UsersServiceError::ValidationFailed { errors });
        };
        record.quota_in_bytes = quota;

        self.persist(&record).await
    }
}

#[cfg(test)]
#[path = "users_service_tests.rs"]
mod tests;
