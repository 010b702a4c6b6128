//! Username -> display name mapping supplied through configuration

use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayNames {
    names: HashMap<String, String>,
}

impl DisplayNames {
    /// Parse a flat JSON object of strings, e.g. `{"alice": "Alice L."}`.
    ///
    /// Absent or malformed input yields an empty mapping, so every user is
    /// shown by raw username.
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
            return Self::default();
        };

        match serde_json::from_str::<HashMap<String, String>>(raw) {
            Ok(names) => {
                tracing::debug!("Loaded {} display names", names.len());
                Self { names }
            }
            Err(e) => {
                tracing::warn!("Ignoring malformed display names: {}", e);
                Self::default()
            }
        }
    }

    pub fn display_name<'a>(&'a self, username: &'a str) -> &'a str {
        self.names.get(username).map(String::as_str).unwrap_or(username)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl From<HashMap<String, String>> for DisplayNames {
    fn from(names: HashMap<String, String>) -> Self {
        Self { names }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flat_mapping() {
        let names = DisplayNames::parse(Some(r#"{"alice": "Alice L.", "bob": "Bobby"}"#));
        assert_eq!(names.len(), 2);
        assert_eq!(names.display_name("alice"), "Alice L.");
        assert_eq!(names.display_name("carol"), "carol");
    }

    #[test]
    fn test_malformed_or_absent_falls_back_to_raw() {
        let inputs = [
            None,
            Some(""),
            Some("   "),
            Some("not json"),
            Some(r#"{"alice": 3}"#),
            Some("[]"),
        ];
        for raw in inputs {
            let names = DisplayNames::parse(raw);
            assert!(names.is_empty(), "{raw:?}");
            assert_eq!(names.display_name("alice"), "alice");
        }
    }
}
