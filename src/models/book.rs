use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::user_book::ReadingRecord;
use super::parse_timestamp;
use crate::domain::DomainError;
use crate::services::derived::{generate_slug, string_to_color};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "books")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub title: String,
    pub author: Option<String>,
    pub image_url: Option<String>,
    pub isbn: Option<String>,
    pub description: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user_book::Entity")]
    UserBooks,
}

impl Related<super::user_book::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserBooks.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// DTO for API responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Book {
    pub id: String,
    pub title: String,
    pub author: Option<String>,
    pub image_url: Option<String>,
    pub isbn: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Deterministic `#RRGGBB` derived from the title
    pub color: String,
    /// URL-safe identifier derived from title and author
    pub slug: String,
    /// Per-user reading records attached to this book
    #[serde(default)]
    pub readings: Vec<ReadingRecord>,
}

impl Book {
    /// Map a stored row into a view-ready book, computing derived fields.
    pub fn from_model(model: Model, readings: Vec<ReadingRecord>) -> Result<Self, DomainError> {
        let created_at = parse_timestamp("books.created_at", &model.created_at)?;
        let updated_at = parse_timestamp("books.updated_at", &model.updated_at)?;

        Ok(Self {
            color: string_to_color(&model.title),
            slug: generate_slug(&model.title, model.author.as_deref()),
            id: model.id,
            title: model.title,
            author: model.author,
            image_url: model.image_url,
            isbn: model.isbn,
            description: model.description,
            created_at,
            updated_at,
            readings,
        })
    }

    /// The first reading record logged by `username`, if any
    pub fn reading_for(&self, username: &str) -> Option<&ReadingRecord> {
        self.readings.iter().find(|r| r.username == username)
    }

    /// Whether `key` names this book by id or by slug
    pub fn matches_key(&self, key: &str) -> bool {
        self.id == key || self.slug == key
    }
}

impl TryFrom<Model> for Book {
    type Error = DomainError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Book::from_model(model, Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(title: &str, author: Option<&str>) -> Model {
        Model {
            id: "b1".to_string(),
            title: title.to_string(),
            author: author.map(str::to_string),
            image_url: None,
            isbn: Some("9780441172719".to_string()),
            description: None,
            created_at: "2024-01-02T03:04:05Z".to_string(),
            updated_at: "2024-01-02T03:04:05Z".to_string(),
        }
    }

    #[test]
    fn test_derived_fields_recomputed_from_title_and_author() {
        let book = Book::try_from(model("Dune", Some("Frank Herbert"))).unwrap();
        assert_eq!(book.slug, "dune-frank-herbert");
        assert_eq!(book.color, string_to_color("Dune"));
        assert!(book.matches_key("b1"));
        assert!(book.matches_key("dune-frank-herbert"));
        assert!(!book.matches_key("dune"));
    }

    #[test]
    fn test_bad_timestamp_fails_loudly() {
        let mut row = model("Dune", None);
        row.updated_at = "yesterday".to_string();
        let err = Book::try_from(row).unwrap_err();
        assert!(matches!(err, DomainError::Mapping(ref msg) if msg.contains("books.updated_at")));
    }
}
