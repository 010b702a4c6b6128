//! Domain error types
//!
//! Failures of the catalog read path, independent of the HTTP layer.

use std::fmt;

#[derive(Debug)]
pub enum DomainError {
    /// No catalog entry matches the given key
    NotFound(String),
    /// Query or connection failure in the store
    Database(String),
    /// A persisted row did not have the shape the read path expects
    Mapping(String),
    /// A value computed from valid rows was unusable
    Internal(String),
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainError::NotFound(what) => write!(f, "{} not found", what),
            DomainError::Database(msg) => write!(f, "Database error: {}", msg),
            DomainError::Mapping(msg) => write!(f, "Mapping error: {}", msg),
            DomainError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}

impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        DomainError::Database(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_the_missing_entry() {
        let err = DomainError::NotFound("Book abc".to_string());
        assert_eq!(err.to_string(), "Book abc not found");
    }

    #[test]
    fn test_db_errors_map_to_database() {
        let err: DomainError = sea_orm::DbErr::Custom("locked".to_string()).into();
        assert!(matches!(err, DomainError::Database(ref msg) if msg.contains("locked")));
    }
}
