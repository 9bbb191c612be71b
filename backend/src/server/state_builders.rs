//! Builders wiring ports to Diesel adapters or fixtures.

use std::sync::Arc;

use actix_web::web;
use tracing::info;

use gears_backend::domain::UsersService;
use gears_backend::domain::ports::{
    AssetsQuery, FixtureAssetsQuery, FixtureUserRecordRepository, UserEventPublisher,
    UserManagement,
};
use gears_backend::inbound::http::state::HttpState;
use gears_backend::outbound::events::InProcUserEventBus;
use gears_backend::outbound::persistence::{
    DbPool, DieselAssetsQuery, DieselUserRecordRepository,
};

/// Shared application data registered on every worker.
///
/// `users` and `user_events` form the in-process surface that gear
/// extensions resolve through `web::Data`.
#[derive(Clone)]
pub struct AppPorts {
    /// Ports used by HTTP handlers.
    pub http_state: web::Data<HttpState>,
    /// Role management backed by [`UsersService`].
    pub users: web::Data<dyn UserManagement>,
    /// Publishing side of `user_events`.
    pub user_publisher: web::Data<dyn UserEventPublisher>,
    /// Bus handing out subscriptions to user lifecycle events.
    pub user_events: web::Data<InProcUserEventBus>,
}

fn build_assets(pool: Option<&DbPool>) -> Arc<dyn AssetsQuery> {
    match pool {
        Some(pool) => Arc::new(DieselAssetsQuery::new(pool.clone())),
        None => Arc::new(FixtureAssetsQuery),
    }
}

fn build_users(pool: Option<&DbPool>) -> Arc<dyn UserManagement> {
    match pool {
        Some(pool) => Arc::new(UsersService::new(Arc::new(DieselUserRecordRepository::new(
            pool.clone(),
        )))),
        None => Arc::new(UsersService::new(Arc::new(FixtureUserRecordRepository))),
    }
}

/// Build all ports, using Diesel when `pool` is present.
#[must_use]
pub fn build_app_ports(pool: Option<&DbPool>) -> AppPorts {
    info!(persistence = pool.is_some(), "wiring application ports");
    let bus = Arc::new(InProcUserEventBus::default());
    let publisher: Arc<dyn UserEventPublisher> = bus.clone();
    AppPorts {
        http_state: web::Data::new(HttpState::new(build_assets(pool))),
        users: web::Data::from(build_users(pool)),
        user_publisher: web::Data::from(publisher),
        user_events: web::Data::from(bus),
    }
}
