//! Shared HTTP adapter state.
//!
//! Handlers receive this through `actix_web::web::Data` and only depend on
//! domain ports, so they stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{AssetsQuery, FixtureAssetsQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Lists a viewer's assets.
    pub assets: Arc<dyn AssetsQuery>,
}

impl HttpState {
    /// Construct state from port implementations.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use gears_backend::domain::ports::FixtureAssetsQuery;
    /// use gears_backend::inbound::http::state::HttpState;
    ///
    /// let state = HttpState::new(Arc::new(FixtureAssetsQuery));
    /// let _assets = state.assets.clone();
    /// ```
    pub fn new(assets: Arc<dyn AssetsQuery>) -> Self {
        Self { assets }
    }
}

impl Default for HttpState {
    fn default() -> Self {
        Self::new(Arc::new(FixtureAssetsQuery))
    }
}
