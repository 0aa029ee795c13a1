//! A single titled block of rich-text content.
//!
//! A section's title is plain text and never contains a line break; its
//! content is HTML markup kept verbatim. The persisted form joins the two with
//! the first `\n`, so titles are normalized on the way in to keep that split
//! unambiguous.

#[cfg(test)]
#[path = "section_test.rs"]
mod section_test;

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::consts::{DEFAULT_TITLE, MENU_FALLBACK_PREFIX};

/// Reference to a live section.
///
/// Ids are generated when a section enters the store and are not persisted;
/// a reference to a deleted section is stale and every operation treats it as
/// a no-op.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SectionId(Uuid);

impl SectionId {
    /// Generate a fresh random id.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an id previously produced by `Display` (e.g. a `data-section-id`
    /// attribute).
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        Uuid::parse_str(raw.trim()).ok().map(Self)
    }
}

impl Default for SectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Title plus freeform HTML content.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Plain-text heading; may be empty.
    pub title: String,
    /// HTML markup, possibly containing image references.
    pub content: String,
}

impl Default for Section {
    fn default() -> Self {
        Self { title: DEFAULT_TITLE.to_owned(), content: String::new() }
    }
}

impl Section {
    /// Build a section from a title and content, normalizing the title.
    #[must_use]
    pub fn new(title: &str, content: &str) -> Self {
        Self { title: normalize_title(title), content: content.to_owned() }
    }

    /// Split raw `"title\ncontent"` text on the first line break.
    ///
    /// Text without a line break is all title.
    #[must_use]
    pub fn from_raw(raw: &str) -> Self {
        match raw.split_once('\n') {
            Some((title, content)) => Self { title: title.to_owned(), content: content.to_owned() },
            None => Self { title: raw.to_owned(), content: String::new() },
        }
    }

    /// Persisted `"title\ncontent"` form.
    #[must_use]
    pub fn to_raw(&self) -> String {
        format!("{}\n{}", self.title, self.content)
    }

    /// Menu label: the trimmed title, or `"Раздел {index + 1}"` when blank.
    #[must_use]
    pub fn display_label(&self, index: usize) -> String {
        let trimmed = self.title.trim();
        if trimmed.is_empty() {
            format!("{MENU_FALLBACK_PREFIX} {}", index + 1)
        } else {
            trimmed.to_owned()
        }
    }
}

/// Collapse line breaks in a title into spaces.
#[must_use]
pub fn normalize_title(title: &str) -> String {
    if title.contains(['\n', '\r']) {
        title.replace("\r\n", " ").replace(['\n', '\r'], " ")
    } else {
        title.to_owned()
    }
}
