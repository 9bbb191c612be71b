//! Server settings loaded via OrthoConfig.
//!
//! Values come from CLI flags, `GEARS_*` environment variables, and config
//! files. Optional fields fall back to defaults in their accessors; the
//! boolean switches carry their defaults on the field.

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::path::{Path, PathBuf};
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use gears_backend::outbound::persistence::PoolConfig;

const DEFAULT_BIND_ADDR: SocketAddr = SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, 8080));
const DEFAULT_SESSION_KEY_FILE: &str = "/var/run/secrets/session_key";

/// Runtime settings for the HTTP server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "GEARS")]
pub struct ServerSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<SocketAddr>,
    /// PostgreSQL URL; fixtures are served when unset.
    pub database_url: Option<String>,
    /// File holding the session signing key material.
    pub session_key_file: Option<PathBuf>,
    /// Allow a generated session key when the key file is unreadable.
    #[ortho_config(default = false)]
    pub session_allow_ephemeral: bool,
    /// Mark the session cookie `Secure`.
    #[ortho_config(default = true)]
    pub cookie_secure: bool,
    /// Redirect or refuse plain-HTTP API requests.
    #[ortho_config(default = true)]
    pub require_tls: bool,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
    /// Seconds to wait for a pooled connection.
    pub db_checkout_timeout_secs: Option<u64>,
}

impl ServerSettings {
    /// Listening address, `0.0.0.0:8080` by default.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr.unwrap_or(DEFAULT_BIND_ADDR)
    }

    /// Configured database URL, if any.
    #[must_use]
    pub fn database_url(&self) -> Option<&str> {
        self.database_url.as_deref().filter(|url| !url.trim().is_empty())
    }

    /// Session key path.
    #[must_use]
    pub fn session_key_file(&self) -> &Path {
        self.session_key_file
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_SESSION_KEY_FILE))
    }

    /// Whether a temporary key may be generated. Debug builds always allow it.
    #[must_use]
    pub fn session_allow_ephemeral(&self) -> bool {
        cfg!(debug_assertions) || self.session_allow_ephemeral
    }

    /// Whether the session cookie carries the `Secure` attribute.
    #[must_use]
    pub fn cookie_secure(&self) -> bool {
        self.cookie_secure
    }

    /// Whether the API scope enforces `https`.
    #[must_use]
    pub fn require_tls(&self) -> bool {
        self.require_tls
    }

    /// Pool settings for `database_url`, or `None` when persistence is off.
    #[must_use]
    pub fn pool_config(&self) -> Option<PoolConfig> {
        let mut config = PoolConfig::new(self.database_url()?);
        if let Some(max_size) = self.db_max_connections {
            config = config.with_max_size(max_size);
        }
        if let Some(secs) = self.db_checkout_timeout_secs {
            config = config.with_connection_timeout(Duration::from_secs(secs));
        }
        Some(config)
    }
}
