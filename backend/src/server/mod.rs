//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerSettings;
pub use state_builders::{AppPorts, build_app_ports};

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::info;

use gears_backend::Trace;
#[cfg(debug_assertions)]
use gears_backend::doc::ApiDoc;
use gears_backend::inbound::http::assets::list_assets;
use gears_backend::inbound::http::health::{HealthState, live, ready};
use gears_backend::middleware::RequireTls;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

/// Per-worker inputs to [`build_app`].
#[derive(Clone)]
pub struct AppDependencies {
    /// Readiness flag flipped by [`create_server`].
    pub health_state: web::Data<HealthState>,
    /// Port implementations.
    pub ports: AppPorts,
    /// Session signing and encryption key.
    pub key: Key,
    /// `Secure` attribute on the session cookie.
    pub cookie_secure: bool,
    /// Enforce `https` on the API scope.
    pub require_tls: bool,
}

/// Assemble the application: sessions and TLS enforcement on `/api/v1`,
/// trace ids everywhere, health probes, and Swagger UI in debug builds.
pub fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        ports,
        key,
        cookie_secure,
        require_tls,
    } = deps;

    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(SameSite::Lax)
        .session_lifecycle(
            PersistentSession::default().session_ttl(actix_web::cookie::time::Duration::hours(2)),
        )
        .build();

    // Outermost wrap runs first, so TLS is checked before the session loads.
    let api = web::scope("/api/v1")
        .wrap(session)
        .wrap(RequireTls::new(require_tls))
        .service(list_assets);

    let app = App::new()
        .app_data(health_state)
        .app_data(ports.http_state)
        .app_data(ports.users)
        .app_data(ports.user_publisher)
        .app_data(ports.user_events)
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Bind and start the HTTP server.
///
/// Readiness is flipped once the listener is bound.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    settings: &ServerSettings,
    ports: AppPorts,
    key: Key,
) -> std::io::Result<Server> {
    let deps = AppDependencies {
        health_state: health_state.clone(),
        ports,
        key,
        cookie_secure: settings.cookie_secure(),
        require_tls: settings.require_tls(),
    };
    let bind_addr = settings.bind_addr();

    let server = HttpServer::new(move || build_app(deps.clone()))
        .bind(bind_addr)?
        .run();

    info!(%bind_addr, require_tls = settings.require_tls(), "server listening");
    health_state.mark_ready();
    Ok(server)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::{StatusCode, header};
    use actix_web::test as actix_test;
    use rstest::rstest;

    fn deps(require_tls: bool) -> AppDependencies {
        AppDependencies {
            health_state: web::Data::new(HealthState::new()),
            ports: build_app_ports(None),
            key: Key::generate(),
            cookie_secure: false,
            require_tls,
        }
    }

    #[rstest]
    #[actix_web::test]
    async fn plain_http_api_requests_are_redirected() {
        let app = actix_test::init_service(build_app(deps(true))).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/assets")
                .insert_header((header::HOST, "ada.gears.example"))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::MOVED_PERMANENTLY);
        assert!(res.headers().contains_key("trace-id"));
    }

    #[rstest]
    #[actix_web::test]
    async fn anonymous_https_requests_are_unauthorised() {
        let app = actix_test::init_service(build_app(deps(true))).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/v1/assets")
                .insert_header(("X-Forwarded-Proto", "https"))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[rstest]
    #[actix_web::test]
    async fn health_checks_skip_tls_enforcement() {
        let app = actix_test::init_service(build_app(deps(true))).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/health/live").to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
    }
}
