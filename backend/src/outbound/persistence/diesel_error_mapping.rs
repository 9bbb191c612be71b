//! Shared Diesel error mapping for the repositories in this module.

use tracing::debug;

use super::pool::PoolError;

/// Coarse classification of a Diesel failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DieselFailure {
    /// The connection dropped mid-operation.
    Connection(&'static str),
    /// Anything else; the statement failed.
    Query(&'static str),
}

/// Log a Diesel error at `debug` and classify it.
///
/// Database messages are logged but never returned, so callers can surface
/// the result without leaking SQL details.
pub(crate) fn classify_diesel_error(error: &diesel::result::Error) -> DieselFailure {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => DieselFailure::Query("record not found"),
        DieselError::QueryBuilderError(_) => DieselFailure::Query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            DieselFailure::Connection("database connection error")
        }
        _ => DieselFailure::Query("database error"),
    }
}

/// Map a Diesel error through repository-specific constructors.
pub(crate) fn map_diesel_error<E, Q, C>(error: diesel::result::Error, query: Q, connection: C) -> E
where
    Q: FnOnce(&'static str) -> E,
    C: FnOnce(&'static str) -> E,
{
    match classify_diesel_error(&error) {
        DieselFailure::Connection(message) => connection(message),
        DieselFailure::Query(message) => query(message),
    }
}

/// Map a pool error through a repository-specific connection constructor.
///
/// The pool's own text can name hosts and roles, so it only reaches the log.
pub(crate) fn map_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(&'static str) -> E,
{
    debug!(%error, "database pool unavailable");
    connection("database pool unavailable")
}
