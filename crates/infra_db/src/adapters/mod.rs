//! Domain Adapters
//!
//! Implementations of domain ports on top of the PostgreSQL repositories.
//!
//! # Usage
//!
//! ```rust,ignore
//! use infra_db::adapters::PostgresBrokerageStore;
//! use domain_policy::BrokerageStore;
//!
//! let store = PostgresBrokerageStore::new(pool);
//! let insured = store.get_insured(InsuredId::new(1)).await?;
//! ```

pub mod brokerage;

pub use brokerage::PostgresBrokerageStore;
