//! Session helpers keeping handlers free of framework-specific logic.
//!
//! Each user works under their own subdomain, so the authenticated user id
//! is stored under a key scoped by the request subdomain. A cookie issued for
//! `ada.gears.example` does not authenticate requests to `bob.gears.example`.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::ports::IdentityResolver;
use crate::domain::{Error, UserId};

const USER_ID_KEY: &str = "user_id";

/// Minimum number of host labels for the first one to count as a subdomain.
const SUBDOMAIN_MIN_LABELS: usize = 3;

/// Subdomain of the request host, if the host has one.
///
/// Ports are ignored. Bare hosts such as `localhost` or `gears.example` have
/// no subdomain.
pub fn request_subdomain(host: &str) -> Option<String> {
    let hostname = host.rsplit_once(':').map_or(host, |(name, _port)| name);
    if hostname.parse::<std::net::IpAddr>().is_ok() {
        return None;
    }
    let mut labels = hostname.split('.');
    let first = labels.next().filter(|label| !label.is_empty())?;
    if labels.count() + 1 < SUBDOMAIN_MIN_LABELS {
        return None;
    }
    Some(first.to_ascii_lowercase())
}

fn scoped_key(subdomain: Option<&str>) -> String {
    match subdomain {
        Some(subdomain) => format!("{USER_ID_KEY}.{subdomain}"),
        None => USER_ID_KEY.to_owned(),
    }
}

/// Subdomain-scoped view over the Actix session.
#[derive(Clone)]
pub struct SessionContext {
    session: Session,
    subdomain: Option<String>,
}

impl SessionContext {
    /// Wrap an Actix session for the given request subdomain.
    pub fn new(session: Session, subdomain: Option<String>) -> Self {
        Self { session, subdomain }
    }

    /// Subdomain this session view is scoped to.
    pub fn subdomain(&self) -> Option<&str> {
        self.subdomain.as_deref()
    }

    /// Persist the authenticated user's id for this subdomain.
    pub fn persist_user(&self, user_id: &UserId) -> Result<(), Error> {
        self.session
            .insert(scoped_key(self.subdomain()), user_id.to_string())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Current user id for this subdomain, if present and well formed.
    pub fn user_id(&self) -> Result<Option<UserId>, Error> {
        let raw = self
            .session
            .get::<String>(&scoped_key(self.subdomain()))
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        let Some(raw) = raw else {
            return Ok(None);
        };
        match UserId::new(raw) {
            Ok(id) => Ok(Some(id)),
            Err(error) => {
                warn!(%error, "invalid user id in session cookie");
                Ok(None)
            }
        }
    }

    /// Require an authenticated user id or return `401 Unauthorized`.
    pub fn require_user_id(&self) -> Result<UserId, Error> {
        self.user_id()?
            .ok_or_else(|| Error::unauthorized("login required"))
    }

    /// Resolve the identity once so it can cross await points.
    pub fn identity(&self) -> Result<SessionIdentity, Error> {
        self.user_id().map(SessionIdentity)
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let subdomain = request_subdomain(req.connection_info().host());
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(|session| SessionContext::new(session, subdomain)) })
    }
}

/// Identity resolved from the session cookie for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionIdentity(Option<UserId>);

impl IdentityResolver for SessionIdentity {
    fn authenticated_user_id(&self) -> Option<UserId> {
        self.0
    }
}
