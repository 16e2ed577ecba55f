//! Unified error types for the domain layer
//!
//! The capability manager itself never fails: invalid handles and duplicate
//! insertions are absorbed as no-ops. Errors only surface at the configuration
//! and registration boundary.

use thiserror::Error;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// Validation failed (e.g., invalid settings values)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Parse error (for value objects)
    #[error("Parse error: {0}")]
    Parse(String),

    /// No capability class is registered under the given name
    #[error("Unknown capability class: {0}")]
    UnknownCapabilityClass(String),

    /// A capability class with the same name is already registered
    #[error("Capability class already registered: {0}")]
    DuplicateCapabilityClass(String),
}

impl DomainError {
    /// Creates a validation error for settings or invariant violations.
    ///
    /// # Example
    /// ```ignore
    /// if !interval.is_finite() {
    ///     return Err(DomainError::validation("update interval must be finite"));
    /// }
    /// ```
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Creates a parse error for string-to-type conversion failures.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Create an unknown capability class error
    pub fn unknown_capability_class(name: impl Into<String>) -> Self {
        Self::UnknownCapabilityClass(name.into())
    }

    /// Create a duplicate capability class error
    pub fn duplicate_capability_class(name: impl Into<String>) -> Self {
        Self::DuplicateCapabilityClass(name.into())
    }
}
