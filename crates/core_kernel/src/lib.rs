//! Core Kernel - Foundational types for the brokerage system
//!
//! This crate provides the building blocks shared by every other crate:
//! - Identifiers for insured persons, vehicles and policies
//! - Money and commission-rate types with exact decimal arithmetic
//! - Per-field validation of submitted form values
//! - Port abstractions implemented by storage adapters

pub mod money;
pub mod identifiers;
pub mod validation;
pub mod ports;
pub mod error;

pub use money::{Money, CommissionRate, MoneyError};
pub use identifiers::{InsuredId, VehicleId, PolicyCode};
pub use validation::{FieldMap, FieldErrors, FieldReader, ChoiceCode};
pub use ports::{
    PortError, DomainPort, HealthCheckable, HealthCheckResult, AdapterHealth,
};
pub use error::CoreError;
