//! Repository implementations for brokerage records
//!
//! Repositories hold the SQL. They take and return plain row types; turning
//! rows into domain entities is the adapter's job.
//!
//! Reads run against the pool. Writes that belong to a larger unit of work
//! take a `&mut PgConnection` so the caller can run them inside its own
//! transaction.

pub mod insured;
pub mod policy;

pub use insured::{InsuredRepository, InsuredRow};
pub use policy::{PolicyDetailsRow, PolicyRepository, PolicyRow, VehicleRow};
