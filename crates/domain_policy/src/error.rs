//! Brokerage domain errors
//!
//! Every failed operation reports one of these and leaves stored state as it
//! was before the call.

use thiserror::Error;

use core_kernel::{FieldErrors, PolicyCode, PortError};

/// Errors returned by [`crate::services::BrokerageService`]
#[derive(Debug, Error)]
pub enum BrokerageError {
    /// The referenced record does not exist
    #[error("{entity} not found: {id}")]
    NotFound {
        entity: String,
        id: String,
    },

    /// The submission failed field validation
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    /// A policy with this code is already registered
    #[error("Policy code already registered: {0}")]
    DuplicateKey(PolicyCode),

    /// An edit tried to change a policy's code
    #[error("Policy code cannot be changed (stored {stored}, submitted {submitted})")]
    CodeImmutable {
        stored: PolicyCode,
        submitted: String,
    },

    /// The store failed for a reason unrelated to the request
    #[error("Store error: {0}")]
    Store(PortError),
}

impl BrokerageError {
    /// Creates a NotFound error for any displayable id
    pub fn not_found(entity: impl Into<String>, id: impl std::fmt::Display) -> Self {
        BrokerageError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Returns the field messages if this is a validation failure
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            BrokerageError::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

impl From<FieldErrors> for BrokerageError {
    fn from(errors: FieldErrors) -> Self {
        BrokerageError::Validation(errors)
    }
}

impl From<PortError> for BrokerageError {
    fn from(error: PortError) -> Self {
        match error {
            PortError::NotFound { entity_type, id } => BrokerageError::NotFound {
                entity: entity_type,
                id,
            },
            other => BrokerageError::Store(other),
        }
    }
}
