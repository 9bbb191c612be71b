//! Lifecycle events delivered to gear extensions.
//!
//! Events stay transport agnostic. Publishers hand them to the
//! [`UserEventPublisher`](crate::domain::ports::UserEventPublisher) port and
//! subscribers decide how to react.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::user::{User, UserRecord};

/// Channel through which an account was created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CreatedVia {
    /// SAML single sign-on.
    Saml,
    /// LDAP directory login.
    Ldap,
    /// Public organization sign-up page.
    OrgSignup,
    /// Public API.
    Api,
    /// HTTP header authentication.
    HttpAuthentication,
    /// Created by an organization administrator.
    OrgAdmin,
    /// Created by a platform superadmin.
    Superadmin,
}

impl CreatedVia {
    /// Every channel in declaration order.
    pub const ALL: [Self; 7] = [
        Self::Saml,
        Self::Ldap,
        Self::OrgSignup,
        Self::Api,
        Self::HttpAuthentication,
        Self::OrgAdmin,
        Self::Superadmin,
    ];

    /// Wire name of the channel.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Saml => "saml",
            Self::Ldap => "ldap",
            Self::OrgSignup => "org_signup",
            Self::Api => "api",
            Self::HttpAuthentication => "http_authentication",
            Self::OrgAdmin => "org_admin",
            Self::Superadmin => "superadmin",
        }
    }
}

impl fmt::Display for CreatedVia {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parsing failure for [`CreatedVia`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown user creation channel: {0}")]
pub struct UnknownCreationChannel(pub String);

impl FromStr for CreatedVia {
    type Err = UnknownCreationChannel;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|channel| channel.as_str() == value)
            .ok_or_else(|| UnknownCreationChannel(value.to_owned()))
    }
}

/// Emitted once when an account is created.
///
/// The user is projected at construction, so later changes to the source
/// record do not leak into the event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCreationEvent {
    created_via: CreatedVia,
    user: User,
}

impl UserCreationEvent {
    /// Build the event from the freshly created record.
    #[must_use]
    pub fn new(created_via: CreatedVia, record: &UserRecord) -> Self {
        Self {
            created_via,
            user: User::from_record(record),
        }
    }

    /// Creation channel.
    #[must_use]
    pub fn created_via(&self) -> CreatedVia {
        self.created_via
    }

    /// Projected user.
    #[must_use]
    pub fn user(&self) -> &User {
        &self.user
    }
}

/// Emitted on every successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserLoginEvent {
    user: UserRecord,
}

impl UserLoginEvent {
    /// Wrap the record of the user that just logged in.
    #[must_use]
    pub fn new(user: UserRecord) -> Self {
        Self { user }
    }

    /// Record as given at login time.
    #[must_use]
    pub fn user(&self) -> &UserRecord {
        &self.user
    }

    /// True while the user has never opened their dashboard.
    #[must_use]
    pub fn first_login(&self) -> bool {
        self.user.dashboard_viewed_at.is_none()
    }
}

/// User lifecycle events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserEvent {
    /// An account was created.
    Created(UserCreationEvent),
    /// A user logged in.
    LoggedIn(UserLoginEvent),
}

impl UserEvent {
    /// Stable event name used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Created(_) => "user_created",
            Self::LoggedIn(_) => "user_logged_in",
        }
    }

    /// Identifier of the user the event refers to.
    #[must_use]
    pub fn user_id(&self) -> &crate::domain::UserId {
        match self {
            Self::Created(event) => event.user().id(),
            Self::LoggedIn(event) => &event.user().id,
        }
    }
}

impl From<UserCreationEvent> for UserEvent {
    fn from(event: UserCreationEvent) -> Self {
        Self::Created(event)
    }
}

impl From<UserLoginEvent> for UserEvent {
    fn from(event: UserLoginEvent) -> Self {
        Self::LoggedIn(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{UserId, Username};
    use chrono::Utc;
    use rstest::{fixture, rstest};

    #[fixture]
    fn record() -> UserRecord {
        let mut record = UserRecord::new(
            UserId::random(),
            Username::new("grace").expect("fixture username"),
            "grace@example.com",
        );
        record.viewer = true;
        record
    }

    #[rstest]
    fn creation_event_preserves_channel_and_projection_for_every_channel(record: UserRecord) {
        for channel in CreatedVia::ALL {
            let event = UserCreationEvent::new(channel, &record);

            assert_eq!(event.created_via(), channel);
            assert_eq!(event.user().id(), &record.id);
            assert_eq!(event.user().username(), &record.username);
            assert_eq!(event.user().email(), record.email);
            assert_eq!(event.user().viewer(), record.viewer);
        }
    }

    #[rstest]
    fn creation_event_ignores_later_record_changes(mut record: UserRecord) {
        let event = UserCreationEvent::new(CreatedVia::Api, &record);
        record.email = "other@example.com".to_owned();

        assert_eq!(event.user().email(), "grace@example.com");
    }

    #[rstest]
    #[case(CreatedVia::Saml, "saml")]
    #[case(CreatedVia::Ldap, "ldap")]
    #[case(CreatedVia::OrgSignup, "org_signup")]
    #[case(CreatedVia::Api, "api")]
    #[case(CreatedVia::HttpAuthentication, "http_authentication")]
    #[case(CreatedVia::OrgAdmin, "org_admin")]
    #[case(CreatedVia::Superadmin, "superadmin")]
    fn channel_wire_names_match_serde_and_parse(#[case] channel: CreatedVia, #[case] wire: &str) {
        assert_eq!(channel.as_str(), wire);
        assert_eq!(wire.parse::<CreatedVia>(), Ok(channel));
        assert_eq!(
            serde_json::to_value(channel).expect("serialises"),
            serde_json::json!(wire)
        );
    }

    #[rstest]
    fn unknown_channel_is_rejected() {
        let error = "facebook".parse::<CreatedVia>().expect_err("unknown");
        assert_eq!(error, UnknownCreationChannel("facebook".to_owned()));
        assert_eq!(error.to_string(), "unknown user creation channel: facebook");
    }

    #[rstest]
    #[case(None, true)]
    #[case(Some(Utc::now()), false)]
    fn first_login_follows_dashboard_visit(
        mut record: UserRecord,
        #[case] viewed_at: Option<chrono::DateTime<Utc>>,
        #[case] expected: bool,
    ) {
        record.dashboard_viewed_at = viewed_at;
        assert_eq!(UserLoginEvent::new(record).first_login(), expected);
    }

    #[rstest]
    fn event_names_and_user_ids(record: UserRecord) {
        let created: UserEvent = UserCreationEvent::new(CreatedVia::Saml, &record).into();
        let logged_in: UserEvent = UserLoginEvent::new(record.clone()).into();

        assert_eq!(created.name(), "user_created");
        assert_eq!(logged_in.name(), "user_logged_in");
        assert_eq!(created.user_id(), &record.id);
        assert_eq!(logged_in.user_id(), &record.id);
    }
}
