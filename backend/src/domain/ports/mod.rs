//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`UserRecordRepository`, `UserEventPublisher`) are implemented
//! by outbound adapters. Driving ports (`UserManagement`, `AssetsQuery`) are
//! called by inbound adapters and gear extensions.

mod macros;
pub(crate) use macros::define_port_error;

mod assets_query;
mod identity_resolver;
mod user_event_publisher;
mod user_management;
mod user_record_repository;

#[cfg(test)]
pub use assets_query::MockAssetsQuery;
pub use assets_query::{AssetsQuery, FixtureAssetsQuery};
#[cfg(test)]
pub use identity_resolver::MockIdentityResolver;
pub use identity_resolver::{FixtureIdentityResolver, IdentityResolver};
pub use user_event_publisher::{UserEventPublishError, UserEventPublisher};
pub use user_management::UserManagement;
#[cfg(test)]
pub use user_record_repository::MockUserRecordRepository;
pub use user_record_repository::{
    FixtureUserRecordRepository, UserRecordRepository, UserRecordRepositoryError,
};
