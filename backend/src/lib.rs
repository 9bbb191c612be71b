//! Users gear backend.
//!
//! The [`domain`] module holds the user projections, lifecycle events, and the
//! role-management service gear extensions call in-process. [`inbound`]
//! exposes the assets endpoint over HTTP, and [`outbound`] implements the
//! ports with Diesel and an in-process event bus.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
