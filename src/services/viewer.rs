//! View state for the book browser
//!
//! One controller instance owns the ordered collection plus which book is on
//! screen, whether the grid (list view) is shown, the active user filter and
//! the colors derived from the on-screen cover. Every transition runs to
//! completion; URL changes go through an injected [`History`] and always
//! replace the current entry.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::display_names::DisplayNames;
use super::grouping::{group_for_user, BookGroup};
use super::palette::{Rgb, Scheme, TextColor};
use crate::models::Book;

/// Horizontal travel a swipe must exceed to navigate
pub const SWIPE_THRESHOLD: f64 = 50.0;

/// Browser location as far as the viewer cares: `/book/{id}?username={name}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Location {
    /// Book id (or slug) from the path
    pub book: Option<String>,
    /// Active user filter from the `username` query parameter
    pub username: Option<String>,
}

impl Location {
    /// Parse a path with optional query. Accepts `/book/{id}`, `/{slug}` and `/`.
    pub fn parse(url: &str) -> Self {
        let url = url.split_once('#').map_or(url, |(before, _)| before);
        let (path, query) = url.split_once('?').unwrap_or((url, ""));

        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let book = match segments.as_slice() {
            ["book", id] => Some(*id),
            ["book"] => None,
            [slug] => Some(*slug),
            _ => None,
        }
        .map(|raw| {
            urlencoding::decode(raw)
                .map(|decoded| decoded.into_owned())
                .unwrap_or_else(|_| raw.to_string())
        });

        let username = url::form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == "username")
            .map(|(_, value)| value.into_owned())
            .filter(|value| !value.is_empty());

        Self { book, username }
    }

    pub fn to_url(&self) -> String {
        let mut out = match &self.book {
            Some(id) => format!("/book/{}", urlencoding::encode(id)),
            None => "/".to_string(),
        };

        if let Some(username) = &self.username {
            out.push('?');
            out.push_str(
                &url::form_urlencoded::Serializer::new(String::new())
                    .append_pair("username", username)
                    .finish(),
            );
        }

        out
    }
}

/// Navigation surface. Routine navigation never adds entries.
pub trait History {
    fn replace(&mut self, url: &str);
}

/// History that remembers every replacement, newest last
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordingHistory {
    entries: Vec<String>,
}

impl RecordingHistory {
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn current(&self) -> Option<&str> {
        self.entries.last().map(String::as_str)
    }

    pub fn into_entries(self) -> Vec<String> {
        self.entries
    }
}

impl History for RecordingHistory {
    fn replace(&mut self, url: &str) {
        self.entries.push(url.to_string());
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "ArrowLeft" => Some(Key::Left),
            "ArrowRight" => Some(Key::Right),
            "ArrowUp" => Some(Key::Up),
            "ArrowDown" => Some(Key::Down),
            _ => None,
        }
    }
}

/// Discrete input delivered to the controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ViewEvent {
    Key { key: String },
    Swipe { start_x: f64, end_x: f64 },
    Select { book_id: String },
    ToggleList,
    Filter { username: Option<String> },
    /// Result of color extraction for `book_id`; `rgb` is `None` on failure
    Color { book_id: String, rgb: Option<Rgb> },
}

/// Serializable picture of the controller for rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ViewSnapshot {
    /// No books: render the loading/empty placeholder
    pub placeholder: bool,
    pub total: usize,
    pub current_index: Option<usize>,
    pub current: Option<Book>,
    pub is_list_view: bool,
    pub selected_user: Option<String>,
    pub selected_user_display_name: Option<String>,
    pub background_color: Option<String>,
    pub text_color: Option<TextColor>,
    pub location: String,
    /// Present while a user filter is active
    pub groups: Option<Vec<BookGroup>>,
}

pub struct ViewController<H: History> {
    books: Vec<Book>,
    current_index: usize,
    list_view: bool,
    selected_user: Option<String>,
    scheme: Option<Scheme>,
    location: Location,
    history: H,
}

impl<H: History> ViewController<H> {
    pub fn new(books: Vec<Book>, location: Location, history: H) -> Self {
        let current_index = location
            .book
            .as_deref()
            .and_then(|key| books.iter().position(|b| b.matches_key(key)))
            .unwrap_or_else(|| {
                if let Some(key) = &location.book {
                    tracing::debug!("Book {:?} from location not in collection", key);
                }
                0
            });

        let selected_user = location.username.clone();

        Self {
            books,
            current_index,
            list_view: selected_user.is_some(),
            selected_user,
            scheme: None,
            location,
            history,
        }
    }

    pub fn current_index(&self) -> Option<usize> {
        (!self.books.is_empty()).then_some(self.current_index)
    }

    pub fn current(&self) -> Option<&Book> {
        self.books.get(self.current_index)
    }

    pub fn is_list_view(&self) -> bool {
        self.list_view
    }

    pub fn selected_user(&self) -> Option<&str> {
        self.selected_user.as_deref()
    }

    pub fn scheme(&self) -> Option<Scheme> {
        self.scheme
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    pub fn into_history(self) -> H {
        self.history
    }

    pub fn advance(&mut self) {
        if self.books.is_empty() {
            return;
        }
        let next = (self.current_index + 1) % self.books.len();
        self.move_to(next);
    }

    pub fn retreat(&mut self) {
        if self.books.is_empty() {
            return;
        }
        let len = self.books.len();
        let prev = (self.current_index + len - 1) % len;
        self.move_to(prev);
    }

    /// Arrow keys navigate the detail view; the grid ignores them.
    pub fn key(&mut self, key: Key) {
        if self.list_view {
            return;
        }
        match key {
            Key::Right | Key::Down => self.advance(),
            Key::Left | Key::Up => self.retreat(),
        }
    }

    /// A swipe to the left (finger moving from right to left) advances.
    pub fn swipe(&mut self, start_x: f64, end_x: f64) {
        let distance = start_x - end_x;
        if distance > SWIPE_THRESHOLD {
            self.advance();
        } else if distance < -SWIPE_THRESHOLD {
            self.retreat();
        }
    }

    /// Open `book_id` in the detail view. Returns false when it is unknown.
    pub fn select(&mut self, book_id: &str) -> bool {
        let Some(index) = self.books.iter().position(|b| b.id == book_id) else {
            tracing::debug!("Ignoring selection of unknown book {}", book_id);
            return false;
        };

        self.current_index = index;
        self.list_view = false;
        self.sync_book_url();
        true
    }

    pub fn toggle_list_view(&mut self) {
        self.list_view = !self.list_view;
    }

    pub fn set_filter(&mut self, username: Option<String>) {
        let username = username.filter(|u| !u.is_empty());
        self.selected_user = username.clone();
        self.location.username = username;
        self.history.replace(&self.location.to_url());
    }

    /// Feed a color-extraction result for `book_id`.
    ///
    /// Results for any book other than the one on screen are dropped. A failed
    /// extraction (`None`) falls back to the book's generated color. Returns
    /// whether the scheme was updated.
    pub fn apply_color(&mut self, book_id: &str, dominant: Option<Rgb>) -> bool {
        let Some(book) = self.current() else {
            return false;
        };
        if book.id != book_id {
            tracing::debug!(
                "Discarding stale color for {} (showing {})",
                book_id,
                book.id
            );
            return false;
        }

        let Some(dominant) = dominant.or_else(|| Rgb::from_hex(&book.color)) else {
            return false;
        };

        self.scheme = Some(Scheme::from_dominant(dominant));
        true
    }

    pub fn dispatch(&mut self, event: ViewEvent) {
        match event {
            ViewEvent::Key { key } => match Key::from_name(&key) {
                Some(key) => self.key(key),
                None => tracing::trace!("Ignoring key {}", key),
            },
            ViewEvent::Swipe { start_x, end_x } => self.swipe(start_x, end_x),
            ViewEvent::Select { book_id } => {
                self.select(&book_id);
            }
            ViewEvent::ToggleList => self.toggle_list_view(),
            ViewEvent::Filter { username } => self.set_filter(username),
            ViewEvent::Color { book_id, rgb } => {
                self.apply_color(&book_id, rgb);
            }
        }
    }

    /// Groups for the active filter, recomputed on every call
    pub fn groups(&self) -> Option<Vec<BookGroup>> {
        self.selected_user
            .as_deref()
            .map(|username| group_for_user(&self.books, username))
    }

    pub fn snapshot(&self, names: &DisplayNames) -> ViewSnapshot {
        ViewSnapshot {
            placeholder: self.books.is_empty(),
            total: self.books.len(),
            current_index: self.current_index(),
            current: self.current().cloned(),
            is_list_view: self.list_view,
            selected_user: self.selected_user.clone(),
            selected_user_display_name: self
                .selected_user
                .as_deref()
                .map(|u| names.display_name(u).to_string()),
            background_color: self.scheme.map(|s| s.background.to_css()),
            text_color: self.scheme.map(|s| s.text),
            location: self.location.to_url(),
            groups: self.groups(),
        }
    }

    fn move_to(&mut self, index: usize) {
        if index == self.current_index {
            return;
        }
        self.current_index = index;
        if !self.list_view {
            self.sync_book_url();
        }
    }

    fn sync_book_url(&mut self) {
        let Some(id) = self.current().map(|b| b.id.clone()) else {
            return;
        };
        self.location.book = Some(id);
        self.history.replace(&self.location.to_url());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ReadingStatus;
    use crate::services::grouping::tests::{book, logged};
    use crate::services::grouping::CURRENTLY_READING;
    use chrono::{TimeZone, Utc};

    fn books(n: usize) -> Vec<Book> {
        (1..=n)
            .map(|i| {
                book(
                    &i.to_string(),
                    &format!("Title {}", i),
                    Utc.with_ymd_and_hms(2024, 1, i as u32, 0, 0, 0).unwrap(),
                )
            })
            .collect()
    }

    fn controller(n: usize, url: &str) -> ViewController<RecordingHistory> {
        ViewController::new(books(n), Location::parse(url), RecordingHistory::default())
    }

    #[test]
    fn test_location_parse_and_render() {
        let loc = Location::parse("/book/abc%20def?username=alice&x=1#top");
        assert_eq!(loc.book.as_deref(), Some("abc def"));
        assert_eq!(loc.username.as_deref(), Some("alice"));
        assert_eq!(loc.to_url(), "/book/abc%20def?username=alice");

        let slug = Location::parse("/dune-frank-herbert");
        assert_eq!(slug.book.as_deref(), Some("dune-frank-herbert"));

        assert_eq!(Location::parse("/book"), Location::default());
        assert_eq!(Location::parse("/book/?username=bob").book, None);

        let root = Location::parse("/?username=");
        assert_eq!(root, Location::default());
        assert_eq!(root.to_url(), "/");
    }

    #[test]
    fn test_initial_book_from_location() {
        let c = controller(3, "/book/2");
        assert_eq!(c.current_index(), Some(1));
        assert!(!c.is_list_view());
        assert!(c.history().entries().is_empty());
    }

    #[test]
    fn test_initial_book_by_slug() {
        let c = controller(3, "/title-3");
        assert_eq!(c.current_index(), Some(2));
    }

    #[test]
    fn test_unknown_initial_book_is_ignored() {
        let c = controller(3, "/book/nope");
        assert_eq!(c.current_index(), Some(0));
    }

    #[test]
    fn test_username_forces_list_view() {
        let c = controller(3, "/?username=alice");
        assert!(c.is_list_view());
        assert_eq!(c.selected_user(), Some("alice"));
    }

    #[test]
    fn test_wraps_in_both_directions() {
        for n in 1..5 {
            let mut c = controller(n, "/");
            c.retreat();
            assert_eq!(c.current_index(), Some(n - 1));
            c.advance();
            assert_eq!(c.current_index(), Some(0));
        }
    }

    #[test]
    fn test_down_then_up_example() {
        let mut c = controller(2, "/book/2");
        assert_eq!(c.current_index(), Some(1));
        c.key(Key::Down);
        assert_eq!(c.current_index(), Some(0));
        c.key(Key::Up);
        assert_eq!(c.current_index(), Some(1));
        assert_eq!(c.history().entries(), ["/book/1", "/book/2"]);
    }

    #[test]
    fn test_keys_suspended_in_list_view() {
        let mut c = controller(3, "/");
        c.toggle_list_view();
        c.key(Key::Right);
        assert_eq!(c.current_index(), Some(0));
        assert!(c.history().entries().is_empty());
    }

    #[test]
    fn test_swipe_threshold() {
        let mut c = controller(3, "/");
        c.swipe(100.0, 50.0);
        assert_eq!(c.current_index(), Some(0));
        c.swipe(50.0, 100.0);
        assert_eq!(c.current_index(), Some(0));

        c.swipe(100.0, 49.0);
        assert_eq!(c.current_index(), Some(1));
        c.swipe(49.0, 100.0);
        assert_eq!(c.current_index(), Some(0));
    }

    #[test]
    fn test_navigation_in_list_view_does_not_touch_url() {
        let mut c = controller(3, "/");
        c.toggle_list_view();
        c.swipe(200.0, 0.0);
        assert_eq!(c.current_index(), Some(1));
        assert!(c.history().entries().is_empty());
    }

    #[test]
    fn test_select_leaves_list_view_and_replaces_url() {
        let mut c = controller(3, "/?username=alice");
        assert!(c.select("3"));
        assert_eq!(c.current_index(), Some(2));
        assert!(!c.is_list_view());
        assert_eq!(c.history().current(), Some("/book/3?username=alice"));

        assert!(!c.select("missing"));
        assert_eq!(c.current_index(), Some(2));
    }

    #[test]
    fn test_toggle_keeps_index() {
        let mut c = controller(3, "/book/3");
        c.toggle_list_view();
        assert!(c.is_list_view());
        c.toggle_list_view();
        assert!(!c.is_list_view());
        assert_eq!(c.current_index(), Some(2));
    }

    #[test]
    fn test_filter_rewrites_query() {
        let mut c = controller(2, "/book/1");
        c.set_filter(Some("bob".to_string()));
        assert_eq!(c.history().current(), Some("/book/1?username=bob"));
        c.set_filter(None);
        assert_eq!(c.history().current(), Some("/book/1"));
        assert_eq!(c.selected_user(), None);
    }

    #[test]
    fn test_stale_color_is_discarded() {
        let mut c = controller(2, "/");
        c.advance();
        assert!(!c.apply_color("1", Some(Rgb::new(10, 20, 30))));
        assert_eq!(c.scheme(), None);

        assert!(c.apply_color("2", Some(Rgb::new(10, 20, 30))));
        let scheme = c.scheme().unwrap();
        assert_eq!(scheme, Scheme::from_dominant(Rgb::new(10, 20, 30)));
        assert_eq!(scheme.text, TextColor::White);
    }

    #[test]
    fn test_failed_extraction_uses_generated_color() {
        let mut c = controller(1, "/");
        assert!(c.apply_color("1", None));
        let generated = Rgb::from_hex(&c.current().unwrap().color).unwrap();
        assert_eq!(c.scheme(), Some(Scheme::from_dominant(generated)));
    }

    #[test]
    fn test_empty_collection_is_a_placeholder() {
        let mut c = controller(0, "/book/1");
        assert_eq!(c.current_index(), None);
        assert!(c.current().is_none());
        c.advance();
        c.retreat();
        c.key(Key::Left);
        assert!(!c.apply_color("1", None));

        let snapshot = c.snapshot(&DisplayNames::default());
        assert!(snapshot.placeholder);
        assert_eq!(snapshot.current_index, None);
        assert!(c.history().entries().is_empty());
    }

    #[test]
    fn test_dispatch_and_snapshot_with_groups() {
        let mut all = books(2);
        all[0] = logged(all[0].clone(), "alice", ReadingStatus::Reading, None);
        all[1] = logged(all[1].clone(), "bob", ReadingStatus::Finished, None);

        let names = DisplayNames::parse(Some(r#"{"alice": "Alice"}"#));
        let mut c = ViewController::new(all, Location::default(), RecordingHistory::default());

        c.dispatch(ViewEvent::ToggleList);
        c.dispatch(ViewEvent::Filter {
            username: Some("alice".to_string()),
        });
        let snapshot = c.snapshot(&names);
        assert_eq!(snapshot.selected_user_display_name.as_deref(), Some("Alice"));
        let groups = snapshot.groups.unwrap();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].title, CURRENTLY_READING);
        assert_eq!(groups[0].books[0].id, "1");

        c.dispatch(ViewEvent::Select {
            book_id: "2".to_string(),
        });
        c.dispatch(ViewEvent::Key {
            key: "Enter".to_string(),
        });
        c.dispatch(ViewEvent::Key {
            key: "ArrowRight".to_string(),
        });
        assert_eq!(c.current_index(), Some(0));
        assert_eq!(c.location().to_url(), "/book/1?username=alice");
    }
}
