//! Grouping of a user's books for the filtered list view

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Book, ReadingStatus};

/// Title of the group holding books the user is reading right now
pub const CURRENTLY_READING: &str = "Currently Reading";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BookGroup {
    pub title: String,
    pub books: Vec<Book>,
}

/// Group the books `username` has logged.
///
/// Books being read come first, in collection order. The rest are sorted
/// newest first by the user's end date (or the book's creation date when the
/// record has none) and bucketed by month, e.g. `"March 2024"`.
pub fn group_for_user(books: &[Book], username: &str) -> Vec<BookGroup> {
    let mut reading = Vec::new();
    let mut dated: Vec<(DateTime<Utc>, &Book)> = Vec::new();

    for book in books {
        let Some(record) = book.reading_for(username) else {
            continue;
        };

        if record.status == ReadingStatus::Reading {
            reading.push(book.clone());
        } else {
            dated.push((record.end_date.unwrap_or(book.created_at), book));
        }
    }

    // Stable, so equal dates keep collection order.
    dated.sort_by(|a, b| b.0.cmp(&a.0));

    let mut groups = Vec::new();
    if !reading.is_empty() {
        groups.push(BookGroup {
            title: CURRENTLY_READING.to_string(),
            books: reading,
        });
    }

    let mut months: Vec<BookGroup> = Vec::new();
    for (date, book) in dated {
        let title = date.format("%B %Y").to_string();
        match months.iter_mut().find(|g| g.title == title) {
            Some(group) => group.books.push(book.clone()),
            None => months.push(BookGroup {
                title,
                books: vec![book.clone()],
            }),
        }
    }
    groups.extend(months);

    groups
}
