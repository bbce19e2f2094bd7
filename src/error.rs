//! Error types for the Travel Advance & Expense Settlement Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur during advance and claim processing.

use thiserror::Error;

/// The main error type for the engine.
///
/// All operations in the engine return this error type, making it easy
/// to handle errors consistently throughout the application. The variants
/// fall into five recoverable kinds (validation, state transition, conflict,
/// not found, dependency) plus configuration-load failures.
///
/// # Example
///
/// ```
/// use advance_engine::error::EngineError;
///
/// let error = EngineError::NotFound {
///     kind: "travel_advance".to_string(),
///     id: "7c9e6679-7425-40de-944b-e07fc1f90ae7".to_string(),
/// };
/// assert_eq!(
///     error.to_string(),
///     "travel_advance not found: 7c9e6679-7425-40de-944b-e07fc1f90ae7"
/// );
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed or failed validation.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse or validation error.
        message: String,
    },

    /// Input failed a precondition the caller can correct and retry.
    #[error("Validation failed for '{field}': {message}")]
    Validation {
        /// The field or parameter that was invalid.
        field: String,
        /// A description of the violated precondition.
        message: String,
    },

    /// An operation was invoked against an entity not in the required
    /// predecessor state. Never silently coerced.
    #[error("Cannot {operation} a {entity} in state '{current}'")]
    StateTransition {
        /// The entity kind the operation targeted.
        entity: String,
        /// The operation that was attempted.
        operation: String,
        /// The entity's actual current state.
        current: String,
    },

    /// Concurrent modification detected: the entity moved to an unexpected
    /// state between read and write. Caller should reload and retry.
    #[error("Conflict on {entity} {id}: expected state '{expected}', found '{found}'")]
    Conflict {
        /// The entity kind.
        entity: String,
        /// The entity id.
        id: String,
        /// The state the caller expected to find.
        expected: String,
        /// The state actually persisted.
        found: String,
    },

    /// A referenced entity id does not resolve.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// The entity kind that was looked up.
        kind: String,
        /// The id that did not resolve.
        id: String,
    },

    /// An external collaborator (entity store, file upload, notification)
    /// failed. The engine's own state remains consistent.
    #[error("Dependency '{dependency}' failed: {message}")]
    Dependency {
        /// The collaborator that failed.
        dependency: String,
        /// A description of the failure.
        message: String,
    },
}

impl EngineError {
    /// Convenience constructor for validation errors.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        EngineError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Convenience constructor for not-found errors.
    pub fn not_found(kind: impl Into<String>, id: impl ToString) -> Self {
        EngineError::NotFound {
            kind: kind.into(),
            id: id.to_string(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_displays_path() {
        let error = EngineError::ConfigNotFound {
            path: "/missing/rates.yaml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found: /missing/rates.yaml"
        );
    }

    #[test]
    fn test_validation_displays_field_and_message() {
        let error = EngineError::validation("amount", "must be greater than zero");
        assert_eq!(
            error.to_string(),
            "Validation failed for 'amount': must be greater than zero"
        );
    }

    #[test]
    fn test_state_transition_displays_operation_and_state() {
        let error = EngineError::StateTransition {
            entity: "travel_advance".to_string(),
            operation: "disburse".to_string(),
            current: "requested".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Cannot disburse a travel_advance in state 'requested'"
        );
    }

    #[test]
    fn test_conflict_displays_expected_and_found() {
        let error = EngineError::Conflict {
            entity: "travel_advance".to_string(),
            id: "adv_1".to_string(),
            expected: "disbursed".to_string(),
            found: "settled".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Conflict on travel_advance adv_1: expected state 'disbursed', found 'settled'"
        );
    }

    #[test]
    fn test_not_found_displays_kind_and_id() {
        let error = EngineError::not_found("expense_claim", "claim_9");
        assert_eq!(error.to_string(), "expense_claim not found: claim_9");
    }

    #[test]
    fn test_dependency_displays_collaborator() {
        let error = EngineError::Dependency {
            dependency: "receipt_store".to_string(),
            message: "upload rejected".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Dependency 'receipt_store' failed: upload rejected"
        );
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_not_found() -> EngineResult<()> {
            Err(EngineError::not_found("travel_request", "tr_1"))
        }

        fn propagates_error() -> EngineResult<()> {
            returns_not_found()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
