//! SeaORM implementation of UserBookRepository

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder};

use crate::domain::{DomainError, UserBookRepository};
use crate::models::book::Entity as BookEntity;
use crate::models::user::Entity as UserEntity;
use crate::models::user_book::{Column, Entity as UserBookEntity};
use crate::models::{Book, User, UserBook};

pub struct SeaOrmUserBookRepository {
    db: DatabaseConnection,
}

impl SeaOrmUserBookRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserBookRepository for SeaOrmUserBookRepository {
    async fn list_user_books(&self) -> Result<Vec<UserBook>, DomainError> {
        let rows = UserBookEntity::find()
            .order_by_asc(Column::Id)
            .find_also_related(BookEntity)
            .all(&self.db)
            .await?;

        let users: HashMap<String, User> = UserEntity::find()
            .all(&self.db)
            .await?
            .into_iter()
            .map(|model| (model.id.clone(), User::from(model)))
            .collect();

        let mut user_books = Vec::with_capacity(rows.len());
        for (record, book) in rows {
            let book = book.ok_or_else(|| {
                DomainError::Mapping(format!(
                    "user_books.{} references missing book {}",
                    record.id, record.book_id
                ))
            })?;
            let user = users.get(&record.user_id).cloned().ok_or_else(|| {
                DomainError::Mapping(format!(
                    "user_books.{} references missing user {}",
                    record.id, record.user_id
                ))
            })?;

            user_books.push(UserBook::from_parts(record, user, Book::try_from(book)?)?);
        }

        user_books.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(user_books)
    }
}
