//! Repository trait definitions
//!
//! These traits define the read-only contract for catalog access.
//! Implementations live in the infrastructure layer.

use async_trait::async_trait;

use super::DomainError;
use crate::models::{Book, User, UserBook};

/// Repository trait for Book entity
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// All books, newest first, each with its per-user reading records
    async fn list_books(&self) -> Result<Vec<Book>, DomainError>;

    /// Find a single book by its id, falling back to its slug
    async fn find_by_id_or_slug(&self, key: &str) -> Result<Option<Book>, DomainError>;
}

/// Repository trait for UserBook join records
#[async_trait]
pub trait UserBookRepository: Send + Sync {
    /// All reading records with their book and owning user
    async fn list_user_books(&self) -> Result<Vec<UserBook>, DomainError>;
}

/// Repository trait for User entity
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// All users ordered by username
    async fn list_users(&self) -> Result<Vec<User>, DomainError>;
}
