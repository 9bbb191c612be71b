//! Domain primitives, aggregates, and services for the users gear.
//!
//! Purpose: define the read-only projections handed to gear extensions, the
//! persisted record shapes the store works with, the user lifecycle events,
//! and the services that mediate role changes. Types here stay transport
//! agnostic; inbound adapters map them to HTTP payloads.
//!
//! Public surface:
//! - Error (alias to `error::Error`): transport-agnostic error payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - User / Organization - immutable projections of persisted records.
//! - UserRecord / OrganizationRecord - mutable persisted shapes.
//! - UserCreationEvent / UserLoginEvent - gear lifecycle events.
//! - UsersService - viewer/builder role transitions.

pub mod asset;
pub mod error;
pub mod organization;
pub mod ports;
pub mod trace_id;
pub mod user;
pub mod user_events;
pub mod users_service;
pub mod validation;

pub use self::asset::{Asset, AssetId, AssetKind};
pub use self::error::{Error, ErrorCode};
pub use self::organization::{Organization, OrganizationRecord};
pub use self::trace_id::TraceId;
pub use self::user::{
    QuotaInBytes, User, UserId, UserRecord, UserRole, UserValidationError, Username,
};
pub use self::user_events::{
    CreatedVia, UnknownCreationChannel, UserCreationEvent, UserEvent, UserLoginEvent,
};
pub use self::users_service::{UsersService, UsersServiceError};
pub use self::validation::ValidationErrors;

/// HTTP header name used to propagate trace identifiers.
pub const TRACE_ID_HEADER: &str = "trace-id";
