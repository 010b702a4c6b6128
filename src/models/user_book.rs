use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{parse_optional_timestamp, parse_timestamp, Book, User};
use crate::domain::DomainError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user_books")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub book_id: String,
    pub status: String, // 'WANT_TO_READ', 'READING', 'FINISHED', 'DROPPED'
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::book::Entity",
        from = "Column::BookId",
        to = "super::book::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Book,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::book::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Book.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReadingStatus {
    WantToRead,
    Reading,
    Finished,
    Dropped,
}

impl ReadingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReadingStatus::WantToRead => "WANT_TO_READ",
            ReadingStatus::Reading => "READING",
            ReadingStatus::Finished => "FINISHED",
            ReadingStatus::Dropped => "DROPPED",
        }
    }

    /// Human label, e.g. `WANT_TO_READ` -> `want to read`
    pub fn label(&self) -> String {
        self.as_str().replace('_', " ").to_lowercase()
    }
}

impl fmt::Display for ReadingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReadingStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "WANT_TO_READ" => Ok(ReadingStatus::WantToRead),
            "READING" => Ok(ReadingStatus::Reading),
            "FINISHED" => Ok(ReadingStatus::Finished),
            "DROPPED" => Ok(ReadingStatus::Dropped),
            other => Err(DomainError::Mapping(format!(
                "unknown reading status {:?}",
                other
            ))),
        }
    }
}

/// A user's reading record as seen from its book
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ReadingRecord {
    pub id: String,
    pub user_id: String,
    pub username: String,
    pub status: ReadingStatus,
    pub status_label: String,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

impl ReadingRecord {
    /// Map a stored row plus its owning user's row.
    pub fn from_model(model: &Model, owner: &super::user::Model) -> Result<Self, DomainError> {
        if model.user_id != owner.id {
            return Err(DomainError::Mapping(format!(
                "user_books.{} belongs to {}, not {}",
                model.id, model.user_id, owner.id
            )));
        }

        let status: ReadingStatus = model.status.parse()?;

        Ok(Self {
            id: model.id.clone(),
            user_id: model.user_id.clone(),
            username: owner.username.clone(),
            status,
            status_label: status.label(),
            start_date: parse_optional_timestamp(
                "user_books.start_date",
                model.start_date.as_deref(),
            )?,
            end_date: parse_optional_timestamp("user_books.end_date", model.end_date.as_deref())?,
        })
    }
}

// DTO for API responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserBook {
    pub id: String,
    pub user_id: String,
    pub book_id: String,
    pub status: ReadingStatus,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub user: User,
    pub book: Book,
}

impl UserBook {
    /// Join a stored record with its already-mapped user and book.
    pub fn from_parts(model: Model, user: User, book: Book) -> Result<Self, DomainError> {
        if model.book_id != book.id {
            return Err(DomainError::Mapping(format!(
                "user_books.{} references book {}, got {}",
                model.id, model.book_id, book.id
            )));
        }

        Ok(Self {
            status: model.status.parse()?,
            start_date: parse_optional_timestamp(
                "user_books.start_date",
                model.start_date.as_deref(),
            )?,
            end_date: parse_optional_timestamp("user_books.end_date", model.end_date.as_deref())?,
            created_at: parse_timestamp("user_books.created_at", &model.created_at)?,
            updated_at: parse_timestamp("user_books.updated_at", &model.updated_at)?,
            id: model.id,
            user_id: model.user_id,
            book_id: model.book_id,
            user,
            book,
        })
    }
}
