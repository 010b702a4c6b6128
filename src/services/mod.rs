//! Services Layer
//!
//! Pure view logic: derived book fields, palette extraction, list grouping
//! and the view-state controller. Nothing here touches the database.

pub mod derived;
pub mod display_names;
pub mod grouping;
pub mod palette;
pub mod viewer;

// Re-export for convenience
pub use display_names::DisplayNames;
pub use grouping::{group_for_user, BookGroup};
pub use palette::{CoverLoader, PaletteError, Rgb, Scheme, TextColor};
pub use viewer::{History, Key, Location, RecordingHistory, ViewController, ViewEvent, ViewSnapshot};
