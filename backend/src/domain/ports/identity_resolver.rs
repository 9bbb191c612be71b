//! Port resolving the authenticated identity of the current request.
//!
//! The domain never reads sessions or hostnames itself; inbound adapters
//! resolve them and hand the result to the service through this trait.

use crate::domain::UserId;

/// Maps request context to an authenticated user id.
#[cfg_attr(test, mockall::automock)]
pub trait IdentityResolver: Send + Sync {
    /// Authenticated user for the current request, if any.
    fn authenticated_user_id(&self) -> Option<UserId>;
}

/// Resolver returning a fixed answer; used by tests and tooling.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FixtureIdentityResolver(pub Option<UserId>);

impl IdentityResolver for FixtureIdentityResolver {
    fn authenticated_user_id(&self) -> Option<UserId> {
        self.0
    }
}
