//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repositories translate between Diesel rows and domain records and hold no
//! business rules beyond the record checks the domain asks stores to run.
//! Row structs (`models`) and table definitions (`schema`) stay private to
//! this module.
//!
//! # Example
//!
//! ```no_run
//! use gears_backend::outbound::persistence::{DbPool, DieselUserRecordRepository, PoolConfig};
//!
//! # async fn wire() -> Result<(), gears_backend::outbound::persistence::PoolError> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/gears")).await?;
//! let repo = DieselUserRecordRepository::new(pool);
//! # let _ = repo;
//! # Ok(())
//! # }
//! ```

mod diesel_assets_query;
mod diesel_error_mapping;
mod diesel_user_record_repository;
mod models;
mod pool;
mod schema;

pub use diesel_assets_query::DieselAssetsQuery;
pub use diesel_user_record_repository::DieselUserRecordRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
