//! Request middleware for tracing and transport enforcement.

pub mod tls;
pub mod trace;

pub use tls::RequireTls;
pub use trace::Trace;
