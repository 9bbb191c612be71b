//! Port for loading and saving persisted user records.
//!
//! Adapters own the record-level rules: before writing they run
//! [`UserRecord::apply_role_invariants`] and then [`UserRecord::validate`],
//! rejecting invalid records with [`UserRecordRepositoryError::Validation`].

use async_trait::async_trait;

use crate::domain::{UserId, UserRecord, ValidationErrors};

use super::define_port_error;

define_port_error! {
    /// Errors raised by user record repository adapters.
    pub enum UserRecordRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "user repository query failed: {message}",
        /// No row matched the record being saved.
        NotFound { id: String } =>
            "user {id} not found",
        /// The record broke a field-level rule and was not written.
        Validation { errors: ValidationErrors } =>
            "user record is invalid: {errors}",
    }
}

/// Port for user record storage and retrieval.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRecordRepository: Send + Sync {
    /// Fetch a user together with its organization.
    ///
    /// Returns `None` when no user has the given id.
    async fn find_by_id(
        &self,
        id: &UserId,
    ) -> Result<Option<UserRecord>, UserRecordRepositoryError>;

    /// Persist the mutable fields of an existing record.
    ///
    /// Fails with [`UserRecordRepositoryError::NotFound`] when the user was
    /// deleted after it was loaded.
    async fn save(&self, record: &UserRecord) -> Result<(), UserRecordRepositoryError>;
}

/// Fixture implementation for running without a database.
///
/// Lookups always miss. Saves enforce the record rules and then discard the
/// record, so callers still see validation failures.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUserRecordRepository;

#[async_trait]
impl UserRecordRepository for FixtureUserRecordRepository {
    async fn find_by_id(
        &self,
        _id: &UserId,
    ) -> Result<Option<UserRecord>, UserRecordRepositoryError> {
        Ok(None)
    }

    async fn save(&self, record: &UserRecord) -> Result<(), UserRecordRepositoryError> {
        let mut normalised = record.clone();
        normalised.apply_role_invariants();
        normalised
            .validate()
            .map_err(|errors| UserRecordRepositoryError::Validation { errors })
    }
}
