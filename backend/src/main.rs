//! Backend entry-point: loads settings, wires ports, and runs the HTTP server.

mod server;

use actix_web::cookie::Key;
use actix_web::web;
use color_eyre::eyre::{Context, Result, eyre};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use gears_backend::inbound::http::health::HealthState;
use gears_backend::outbound::persistence::DbPool;
use server::{ServerSettings, build_app_ports, create_server};

/// Minimum key material accepted by `Key::derive_from`.
const MIN_SESSION_KEY_BYTES: usize = 32;

fn load_session_key(settings: &ServerSettings) -> Result<Key> {
    let path = settings.session_key_file();
    match std::fs::read(path) {
        Ok(bytes) if bytes.len() >= MIN_SESSION_KEY_BYTES => Ok(Key::derive_from(&bytes)),
        Ok(bytes) => Err(eyre!(
            "session key at {} has {} bytes; at least {MIN_SESSION_KEY_BYTES} are required",
            path.display(),
            bytes.len()
        )),
        Err(error) if settings.session_allow_ephemeral() => {
            warn!(path = %path.display(), %error, "using temporary session key");
            Ok(Key::generate())
        }
        Err(error) => Err(eyre!(
            "failed to read session key at {}: {error}",
            path.display()
        )),
    }
}

#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(error) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(%error, "tracing init failed");
    }

    let settings = ServerSettings::load().wrap_err("failed to load server settings")?;
    let key = load_session_key(&settings)?;

    let pool = match settings.pool_config() {
        Some(config) => Some(
            DbPool::new(config)
                .await
                .wrap_err("failed to build database pool")?,
        ),
        None => {
            info!("no database configured; serving fixture data");
            None
        }
    };

    let health_state = web::Data::new(HealthState::new());
    let ports = build_app_ports(pool.as_ref());
    let user_events = ports.user_events.clone();
    let server = create_server(health_state, &settings, ports, key)
        .wrap_err("failed to start http server")?;
    let outcome = server.await.wrap_err("http server terminated");
    user_events.close();
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use rstest::rstest;
    use tempfile::NamedTempFile;

    fn settings_for(path: &std::path::Path) -> ServerSettings {
        ServerSettings {
            bind_addr: None,
            database_url: None,
            session_key_file: Some(path.to_path_buf()),
            session_allow_ephemeral: false,
            cookie_secure: true,
            require_tls: true,
            db_max_connections: None,
            db_checkout_timeout_secs: None,
        }
    }

    #[rstest]
    fn key_is_derived_from_file_contents() {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(&[7_u8; 64]).expect("write key");

        let first = load_session_key(&settings_for(file.path())).expect("key loads");
        let second = load_session_key(&settings_for(file.path())).expect("key loads");

        assert_eq!(first.master(), second.master());
    }

    #[rstest]
    fn short_key_material_is_rejected() {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(b"too short").expect("write key");

        match load_session_key(&settings_for(file.path())) {
            Ok(_) => panic!("short key material was accepted"),
            Err(err) => assert!(err.to_string().contains("at least 32")),
        }
    }
}
