//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **events**: in-process broadcast bus for user lifecycle events
//!
//! Adapters translate between domain types and infrastructure
//! representations. They contain no business logic.

pub mod events;
pub mod persistence;
