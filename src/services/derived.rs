//! Derived book fields
//!
//! Pure helpers turning persisted `(title, author)` into the values the
//! catalog renders. Nothing here is stored; every read recomputes them.

/// Build a URL-safe slug from a title and optional author.
///
/// `"Dune"`, `Some("Frank Herbert")` becomes `"dune-frank-herbert"`.
pub fn generate_slug(title: &str, author: Option<&str>) -> String {
    let base = format!("{}-{}", title, author.unwrap_or("")).to_lowercase();

    let mut slug = String::with_capacity(base.len());
    let mut pending_separator = false;
    for c in base.chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            pending_separator = false;
            slug.push(c);
        } else {
            pending_separator = true;
        }
    }

    slug
}

/// Hash a string into a stable `#RRGGBB` color.
///
/// Folds UTF-16 code units with `hash = code + (hash << 5) - hash` in 32-bit
/// wrapping arithmetic and keeps the low 24 bits.
pub fn string_to_color(value: &str) -> String {
    let hash = value.encode_utf16().fold(0i32, |hash, code| {
        i32::from(code).wrapping_add(hash.wrapping_shl(5).wrapping_sub(hash))
    });

    format!("#{:06X}", hash & 0x00ff_ffff)
}
