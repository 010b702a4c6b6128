//! Application state containing repositories and shared resources

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::domain::{BookRepository, UserBookRepository, UserRepository};
use crate::infrastructure::config::Config;
use crate::infrastructure::{SeaOrmBookRepository, SeaOrmUserBookRepository, SeaOrmUserRepository};
use crate::services::{CoverLoader, DisplayNames};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub book_repo: Arc<dyn BookRepository>,
    pub user_book_repo: Arc<dyn UserBookRepository>,
    pub user_repo: Arc<dyn UserRepository>,
    /// Username -> display name mapping from configuration
    pub display_names: Arc<DisplayNames>,
    /// HTTP client for cover downloads
    pub covers: CoverLoader,
}

impl AppState {
    /// Create a new AppState with all repositories initialized
    pub fn new(db: DatabaseConnection, config: &Config) -> Self {
        Self::with_parts(
            db,
            config.display_names.clone(),
            CoverLoader::new(config.cover_timeout),
        )
    }

    pub fn with_parts(
        db: DatabaseConnection,
        display_names: DisplayNames,
        covers: CoverLoader,
    ) -> Self {
        Self {
            book_repo: Arc::new(SeaOrmBookRepository::new(db.clone())),
            user_book_repo: Arc::new(SeaOrmUserBookRepository::new(db.clone())),
            user_repo: Arc::new(SeaOrmUserRepository::new(db)),
            display_names: Arc::new(display_names),
            covers,
        }
    }
}
