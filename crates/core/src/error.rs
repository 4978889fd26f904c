//! Report error model.

use thiserror::Error;

/// Result type used across the reporting layer.
pub type ReportResult<T> = Result<T, ReportError>;

/// Reporting error.
///
/// A closed set: every failure a report computation can surface maps to one of
/// these kinds. Variants carry structured context (entity, operation) rather
/// than free-text wrapping so callers can branch on them.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ReportError {
    /// A single-entity lookup found no matching row.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    /// The underlying data source failed during a read.
    ///
    /// Never retried inside this core; retry policy belongs to the source.
    #[error("fetch failed during {operation}: {message}")]
    FetchFailure {
        operation: &'static str,
        message: String,
    },

    /// The invoking context was cancelled (or timed out) mid-computation.
    #[error("operation cancelled: {operation}")]
    Cancelled { operation: &'static str },
}

impl ReportError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn fetch(operation: &'static str, message: impl Into<String>) -> Self {
        Self::FetchFailure {
            operation,
            message: message.into(),
        }
    }

    pub fn cancelled(operation: &'static str) -> Self {
        Self::Cancelled { operation }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }

    /// Operation or entity name the error is attributed to.
    pub fn context(&self) -> &'static str {
        match self {
            Self::NotFound { entity, .. } => entity,
            Self::FetchFailure { operation, .. } => operation,
            Self::Cancelled { operation } => operation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_renders_entity_and_id() {
        let err = ReportError::not_found("order", 10248);
        assert_eq!(err.to_string(), "order 10248 not found");
        assert!(err.is_not_found());
        assert_eq!(err.context(), "order");
    }

    #[test]
    fn fetch_failure_keeps_operation() {
        let err = ReportError::fetch("fetch_orders", "database is locked");
        assert_eq!(
            err.to_string(),
            "fetch failed during fetch_orders: database is locked"
        );
        assert!(!err.is_cancelled());
        assert_eq!(err.context(), "fetch_orders");
    }

    #[test]
    fn cancelled_is_distinct_from_other_kinds() {
        let err = ReportError::cancelled("customer_growth");
        assert!(err.is_cancelled());
        assert!(!err.is_not_found());
    }
}
