//! SeaORM implementation of BookRepository

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

use crate::domain::{BookRepository, DomainError};
use crate::models::book::{self, Column, Entity as BookEntity};
use crate::models::user::Entity as UserEntity;
use crate::models::user_book::{self, Entity as UserBookEntity};
use crate::models::{Book, ReadingRecord};

/// SeaORM-based implementation of BookRepository
pub struct SeaOrmBookRepository {
    db: DatabaseConnection,
}

impl SeaOrmBookRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Reading records keyed by book id, oldest record first
    async fn readings_by_book(
        &self,
        book_id: Option<&str>,
    ) -> Result<HashMap<String, Vec<ReadingRecord>>, DomainError> {
        let mut query = UserBookEntity::find().order_by_asc(user_book::Column::CreatedAt);
        if let Some(id) = book_id {
            query = query.filter(user_book::Column::BookId.eq(id));
        }

        let rows = query.find_also_related(UserEntity).all(&self.db).await?;

        let mut readings: HashMap<String, Vec<ReadingRecord>> = HashMap::new();
        for (record, owner) in rows {
            let owner = owner.ok_or_else(|| {
                DomainError::Mapping(format!(
                    "user_books.{} references missing user {}",
                    record.id, record.user_id
                ))
            })?;
            let reading = ReadingRecord::from_model(&record, &owner)?;
            readings.entry(record.book_id).or_default().push(reading);
        }

        Ok(readings)
    }

    fn to_dto(
        model: book::Model,
        readings: &mut HashMap<String, Vec<ReadingRecord>>,
    ) -> Result<Book, DomainError> {
        let own = readings.remove(&model.id).unwrap_or_default();
        Book::from_model(model, own)
    }
}

#[async_trait]
impl BookRepository for SeaOrmBookRepository {
    async fn list_books(&self) -> Result<Vec<Book>, DomainError> {
        let models = BookEntity::find()
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await?;

        let mut readings = self.readings_by_book(None).await?;

        let mut books = models
            .into_iter()
            .map(|model| Self::to_dto(model, &mut readings))
            .collect::<Result<Vec<_>, _>>()?;

        // Stored timestamps mix formats and offsets, so order on the parsed value.
        books.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        tracing::debug!("Loaded {} books", books.len());
        Ok(books)
    }

    async fn find_by_id_or_slug(&self, key: &str) -> Result<Option<Book>, DomainError> {
        if let Some(model) = BookEntity::find_by_id(key.to_string()).one(&self.db).await? {
            let mut readings = self.readings_by_book(Some(&model.id)).await?;
            return Self::to_dto(model, &mut readings).map(Some);
        }

        // Slugs are derived, not stored, so resolve them against the catalog.
        let found = self
            .list_books()
            .await?
            .into_iter()
            .find(|book| book.slug == key);
        Ok(found)
    }
}
