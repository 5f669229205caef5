//! Request handlers, one module per resource

pub mod health;
pub mod insured;
pub mod policy;
pub mod report;
