//! Infrastructure Database Layer
//!
//! PostgreSQL persistence for the brokerage, built on SQLx.
//!
//! # Architecture
//!
//! The crate follows the repository pattern:
//!
//! - [`pool`]: connection pool configuration and schema migrations
//! - [`repositories`]: SQL for insured persons, vehicles and policies, returning
//!   plain row types
//! - [`adapters`]: [`PostgresBrokerageStore`], which implements the
//!   `BrokerageStore` port on top of the repositories and runs every
//!   multi-record write in a single transaction
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool, run_migrations, DatabaseConfig, PostgresBrokerageStore};
//!
//! let pool = create_pool(DatabaseConfig::new("postgres://localhost/brokerage")).await?;
//! run_migrations(&pool).await?;
//! let store = PostgresBrokerageStore::new(pool);
//! ```

pub mod pool;
pub mod error;
pub mod repositories;
pub mod adapters;

pub use pool::{create_pool, create_pool_from_url, run_migrations, DatabaseConfig, DatabasePool};
pub use error::DatabaseError;
pub use adapters::PostgresBrokerageStore;
