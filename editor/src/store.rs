//! In-memory ordered section list and its persisted form.
//!
//! The store owns document order. Structural changes (add, delete, retitle,
//! wholesale replacement) bump `structure_revision`; programmatic content
//! rewrites bump the per-section revision so views re-render that section.
//! Plain typing goes through [`SectionStore::set_content`], which bumps
//! neither, since the browser already shows what was typed.
//!
//! Persistence goes through [`KeyValueStore`]: `localStorage` in the browser,
//! [`MemoryStorage`] in tests. The stored value is a JSON array of
//! `"title\ncontent"` strings under [`STORAGE_KEY`].

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::collections::HashMap;

use crate::consts::STORAGE_KEY;
use crate::error::StorageError;
use crate::section::{Section, SectionId, normalize_title};

/// Ordered list of `"title\ncontent"` strings.
pub type PersistedDocument = Vec<String>;

/// Process-wide string key-value store.
pub trait KeyValueStore {
    /// Read the value for `key`, if any.
    fn get_item(&self, key: &str) -> Option<String>;

    /// Write `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the store is unavailable or refuses the
    /// write.
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// `HashMap`-backed [`KeyValueStore`].
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

#[derive(Clone, Debug)]
struct Entry {
    id: SectionId,
    section: Section,
    revision: u64,
}

/// Ordered sections with stable ids.
#[derive(Clone, Debug, Default)]
pub struct SectionStore {
    entries: Vec<Entry>,
    structure_revision: u64,
}

impl SectionStore {
    /// Empty store. Use [`SectionStore::deserialize`] or
    /// [`SectionStore::load`] to get the seeded default section.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Counter bumped on every change that affects the navigation menu.
    #[must_use]
    pub fn structure_revision(&self) -> u64 {
        self.structure_revision
    }

    /// Sections in document order.
    pub fn iter(&self) -> impl Iterator<Item = (SectionId, &Section)> {
        self.entries.iter().map(|e| (e.id, &e.section))
    }

    /// Section ids in document order.
    #[must_use]
    pub fn ids(&self) -> Vec<SectionId> {
        self.entries.iter().map(|e| e.id).collect()
    }

    #[must_use]
    pub fn contains(&self, id: SectionId) -> bool {
        self.position(id).is_some()
    }

    /// Zero-based document position of `id`.
    #[must_use]
    pub fn position(&self, id: SectionId) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }

    #[must_use]
    pub fn get(&self, id: SectionId) -> Option<&Section> {
        self.entries.iter().find(|e| e.id == id).map(|e| &e.section)
    }

    /// Render revision of one section; changes whenever its content was
    /// rewritten programmatically.
    #[must_use]
    pub fn revision(&self, id: SectionId) -> Option<u64> {
        self.entries.iter().find(|e| e.id == id).map(|e| e.revision)
    }

    /// Append a section parsed from raw `"title\ncontent"` text.
    ///
    /// `None` or an empty string appends the default untitled section.
    pub fn add_section(&mut self, raw: Option<&str>) -> SectionId {
        let section = match raw {
            Some(raw) if !raw.is_empty() => Section::from_raw(raw),
            _ => Section::default(),
        };
        self.push(section)
    }

    /// Append an already-built section.
    pub fn push(&mut self, section: Section) -> SectionId {
        let id = SectionId::new();
        self.entries.push(Entry { id, section, revision: 0 });
        self.structure_revision += 1;
        id
    }

    /// Remove the section `id`. Returns `false` for a stale reference.
    pub fn delete_section(&mut self, id: SectionId) -> bool {
        let Some(index) = self.position(id) else {
            return false;
        };
        self.entries.remove(index);
        self.structure_revision += 1;
        true
    }

    /// Replace the title of `id`. Line breaks are collapsed into spaces.
    pub fn set_title(&mut self, id: SectionId, title: &str) -> bool {
        let Some(entry) = self.entries.iter_mut().find(|e| e.id == id) else {
            return false;
        };
        let title = normalize_title(title);
        if entry.section.title != title {
            entry.section.title = title;
            self.structure_revision += 1;
        }
        true
    }

    /// Record content the user typed. Does not trigger a re-render.
    pub fn set_content(&mut self, id: SectionId, content: &str) -> bool {
        let Some(entry) = self.entries.iter_mut().find(|e| e.id == id) else {
            return false;
        };
        content.clone_into(&mut entry.section.content);
        true
    }

    /// Rewrite content programmatically and bump the section's revision.
    pub fn replace_content(&mut self, id: SectionId, content: String) -> bool {
        let Some(entry) = self.entries.iter_mut().find(|e| e.id == id) else {
            return false;
        };
        entry.section.content = content;
        entry.revision += 1;
        true
    }

    /// Apply `rewrite` to every section's content, bumping revisions of the
    /// sections it changed. Returns the number of changed sections.
    pub fn rewrite_contents<F>(&mut self, mut rewrite: F) -> usize
    where
        F: FnMut(&str) -> String,
    {
        let mut changed = 0;
        for entry in &mut self.entries {
            let next = rewrite(&entry.section.content);
            if next != entry.section.content {
                entry.section.content = next;
                entry.revision += 1;
                changed += 1;
            }
        }
        changed
    }

    /// Replace every section. An empty list seeds one default section.
    pub fn replace_all(&mut self, sections: Vec<Section>) {
        self.entries.clear();
        for section in sections {
            self.entries.push(Entry { id: SectionId::new(), section, revision: 0 });
        }
        if self.entries.is_empty() {
            self.entries.push(Entry { id: SectionId::new(), section: Section::default(), revision: 0 });
        }
        self.structure_revision += 1;
    }

    /// Each section as `"title\ncontent"`, in order.
    #[must_use]
    pub fn serialize(&self) -> PersistedDocument {
        self.entries.iter().map(|e| e.section.to_raw()).collect()
    }

    /// Replace the list from a persisted document.
    ///
    /// An empty document seeds exactly one default section.
    pub fn deserialize(&mut self, doc: &[String]) {
        self.replace_all(doc.iter().map(|raw| Section::from_raw(raw)).collect());
    }

    /// Write the serialized document under [`STORAGE_KEY`].
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if serialization fails or the store
    /// rejects the write.
    pub fn persist<S>(&self, storage: &mut S) -> Result<(), StorageError>
    where
        S: KeyValueStore + ?Sized,
    {
        let raw = serde_json::to_string(&self.serialize())?;
        storage.set_item(STORAGE_KEY, &raw)
    }

    /// Read the document stored under [`STORAGE_KEY`].
    ///
    /// A missing or unparseable value behaves as an empty document.
    pub fn load<S>(&mut self, storage: &S)
    where
        S: KeyValueStore + ?Sized,
    {
        let doc = match storage.get_item(STORAGE_KEY) {
            Some(raw) => serde_json::from_str::<PersistedDocument>(&raw).unwrap_or_else(|e| {
                log::warn!("ignoring unparseable persisted sections: {e}");
                Vec::new()
            }),
            None => Vec::new(),
        };
        self.deserialize(&doc);
    }
}
