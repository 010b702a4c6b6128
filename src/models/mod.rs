pub mod book;
pub mod user;
pub mod user_book;

pub use book::Book;
pub use user::User;
pub use user_book::{ReadingRecord, ReadingStatus, UserBook};

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::domain::DomainError;

/// Parse a stored timestamp column.
///
/// Rows written by the app use RFC 3339; rows written by SQLite's
/// `datetime('now')` use `YYYY-MM-DD HH:MM:SS` in UTC. Anything else is a
/// shape mismatch.
pub(crate) fn parse_timestamp(field: &str, value: &str) -> Result<DateTime<Utc>, DomainError> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|_| DomainError::Mapping(format!("{} is not a timestamp: {:?}", field, value)))
}

pub(crate) fn parse_optional_timestamp(
    field: &str,
    value: Option<&str>,
) -> Result<Option<DateTime<Utc>>, DomainError> {
    value.map(|v| parse_timestamp(field, v)).transpose()
}
