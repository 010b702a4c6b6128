use chrono::{DateTime, Duration, TimeZone, Utc};
use sea_orm::*;
use uuid::Uuid;

use crate::models::{book, user, user_book};

struct DemoBook {
    title: &'static str,
    author: &'static str,
    isbn: &'static str,
    description: &'static str,
}

const DEMO_BOOKS: [DemoBook; 4] = [
    DemoBook {
        title: "Dune",
        author: "Frank Herbert",
        isbn: "9780441172719",
        description: "A spice planet story.",
    },
    DemoBook {
        title: "The Left Hand of Darkness",
        author: "Ursula K. Le Guin",
        isbn: "9780441478125",
        description: "An envoy on a world of ambisexual people.",
    },
    DemoBook {
        title: "Foundation",
        author: "Isaac Asimov",
        isbn: "9780553293357",
        description: "Psychohistory and the fall of an empire.",
    },
    DemoBook {
        title: "The Hobbit",
        author: "J.R.R. Tolkien",
        isbn: "9780547928227",
        description: "There and back again.",
    },
];

/// (username, book title, status, finished months before now)
const DEMO_READINGS: [(&str, &str, &str, Option<i64>); 5] = [
    ("alice", "Dune", "FINISHED", Some(1)),
    ("alice", "Foundation", "READING", None),
    ("alice", "The Hobbit", "FINISHED", Some(3)),
    ("bob", "The Left Hand of Darkness", "DROPPED", Some(2)),
    ("bob", "Dune", "WANT_TO_READ", None),
];

/// Insert demo users, books and reading records. Existing rows are kept, so
/// running it twice is harmless.
pub async fn seed_demo_data(db: &DatabaseConnection) -> Result<(), DbErr> {
    let base = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).single().unwrap_or_else(Utc::now);

    // 1. Create Users
    for username in ["alice", "bob"] {
        ensure_user(db, username).await?;
    }

    // 2. Create Books, oldest first so the newest-first listing is stable
    for (offset, demo) in DEMO_BOOKS.iter().enumerate() {
        let created = base - Duration::days(30 * (DEMO_BOOKS.len() - offset) as i64);
        ensure_book(db, demo, created).await?;
    }

    // 3. Reading records
    for (username, title, status, finished) in DEMO_READINGS {
        let Some(owner) = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(db)
            .await?
        else {
            continue;
        };
        let Some(target) = book::Entity::find()
            .filter(book::Column::Title.eq(title))
            .one(db)
            .await?
        else {
            continue;
        };

        let exists = user_book::Entity::find()
            .filter(user_book::Column::UserId.eq(owner.id.clone()))
            .filter(user_book::Column::BookId.eq(target.id.clone()))
            .one(db)
            .await?
            .is_some();
        if exists {
            continue;
        }

        let end_date = finished.map(|months| (base - Duration::days(30 * months)).to_rfc3339());
        let record = user_book::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            user_id: Set(owner.id),
            book_id: Set(target.id),
            status: Set(status.to_owned()),
            start_date: Set(None),
            end_date: Set(end_date),
            created_at: Set(Utc::now().to_rfc3339()),
            updated_at: Set(Utc::now().to_rfc3339()),
        };
        record.insert(db).await?;
    }

    tracing::debug!("Seeded {} demo books", DEMO_BOOKS.len());
    Ok(())
}

async fn ensure_user(db: &DatabaseConnection, username: &str) -> Result<(), DbErr> {
    let existing = user::Entity::find()
        .filter(user::Column::Username.eq(username))
        .one(db)
        .await?;
    if existing.is_some() {
        return Ok(());
    }

    let now = Utc::now().to_rfc3339();
    user::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        external_id: Set(format!("demo_{}", username)),
        username: Set(username.to_owned()),
        created_at: Set(now.clone()),
        updated_at: Set(now),
    }
    .insert(db)
    .await?;
    Ok(())
}

async fn ensure_book(
    db: &DatabaseConnection,
    demo: &DemoBook,
    created: DateTime<Utc>,
) -> Result<(), DbErr> {
    let existing = book::Entity::find()
        .filter(book::Column::Title.eq(demo.title))
        .one(db)
        .await?;
    if existing.is_some() {
        return Ok(());
    }

    book::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        title: Set(demo.title.to_owned()),
        author: Set(Some(demo.author.to_owned())),
        image_url: Set(Some(format!(
            "https://covers.openlibrary.org/b/isbn/{}-M.jpg",
            demo.isbn
        ))),
        isbn: Set(Some(demo.isbn.to_owned())),
        description: Set(Some(demo.description.to_owned())),
        created_at: Set(created.to_rfc3339()),
        updated_at: Set(created.to_rfc3339()),
    }
    .insert(db)
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::db::init_db;

    #[tokio::test]
    async fn test_seed_twice_keeps_one_copy() {
        let db = init_db("sqlite::memory:").await.unwrap();
        seed_demo_data(&db).await.unwrap();
        seed_demo_data(&db).await.unwrap();

        assert_eq!(book::Entity::find().count(&db).await.unwrap(), 4);
        assert_eq!(user::Entity::find().count(&db).await.unwrap(), 2);
        assert_eq!(user_book::Entity::find().count(&db).await.unwrap(), 5);
    }
}
