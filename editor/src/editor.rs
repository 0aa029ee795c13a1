//! Section editor controller.
//!
//! SYSTEM CONTEXT
//! ==============
//! The browser client owns one `SectionEditor` per open knowledge base. DOM
//! events are translated into calls on it (add, delete, title edits, typing,
//! image picks) and the client re-renders from [`SectionEditor::views`] and
//! [`SectionEditor::menu`]. Nothing here touches the DOM.
//!
//! DESIGN
//! ======
//! - The section under the caret is an explicit `Option<SectionId>` kept by a
//!   [`SelectionTracker`] and passed into operations that need it.
//! - Export and upload first resolve every distinct image source to its inline
//!   PNG form, then rewrite the markup from that map. Upload resolves all
//!   sources concurrently and sends nothing until every one succeeded.
//! - Upload works on `&self` and hands back the resolved map, so callers can
//!   run it on a snapshot and apply the result to the live editor afterwards.
//!
//! TRADE-OFFS
//! ==========
//! Menu rebuilds are full rebuilds. Documents hold tens of sections, so
//! diffing the menu is not worth it.

#[cfg(test)]
#[path = "editor_test.rs"]
mod editor_test;

use std::collections::HashMap;

use futures::future::try_join_all;

use crate::codec::{ImageFetcher, ImageResolver, InlineImage, inline_source, inline_source_async};
use crate::consts::EXPORT_FILE_NAME;
use crate::error::{ImageLoadError, StorageError, UploadError};
use crate::image_block::{ImageId, container_ids, remove_container, render_image_block, replace_container_src};
use crate::markup::{body_inner, image_sources, parse_sections, rewrite_image_sources};
use crate::section::{Section, SectionId};
use crate::store::{KeyValueStore, SectionStore};
use crate::upload::{UploadRequest, Uploader};
use crate::view::{MenuEntry, SectionView, menu_entries, render_page, render_sections, section_views};

/// Original image source mapped to its inline PNG form.
pub type InlinedSources = HashMap<String, InlineImage>;

/// A document offered for download.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportFile {
    pub file_name: &'static str,
    pub contents: String,
}

/// Controller over one section document.
#[derive(Clone, Debug, Default)]
pub struct SectionEditor {
    store: SectionStore,
    menu: Vec<MenuEntry>,
    menu_builds: u64,
    uploading: bool,
}

impl SectionEditor {
    /// Editor over `store`, with its menu built.
    #[must_use]
    pub fn new(store: SectionStore) -> Self {
        let mut editor = Self { store, ..Self::default() };
        editor.update_menu();
        editor
    }

    /// Editor over the document persisted in `storage`.
    #[must_use]
    pub fn load<S>(storage: &S) -> Self
    where
        S: KeyValueStore + ?Sized,
    {
        let mut store = SectionStore::new();
        store.load(storage);
        Self::new(store)
    }

    #[must_use]
    pub fn store(&self) -> &SectionStore {
        &self.store
    }

    /// Navigation menu, as of the last [`SectionEditor::update_menu`].
    #[must_use]
    pub fn menu(&self) -> &[MenuEntry] {
        &self.menu
    }

    /// How many times the menu has been rebuilt.
    #[must_use]
    pub fn menu_builds(&self) -> u64 {
        self.menu_builds
    }

    /// View records for every section.
    #[must_use]
    pub fn views(&self, editable: bool) -> Vec<SectionView> {
        section_views(&self.store, editable)
    }

    /// Rebuild the navigation menu from the current order and titles.
    pub fn update_menu(&mut self) {
        self.menu = menu_entries(&self.store);
        self.menu_builds += 1;
    }

    /// Append a section from raw `"title\ncontent"` text.
    pub fn add_section(&mut self, raw: Option<&str>) -> SectionId {
        let id = self.store.add_section(raw);
        self.update_menu();
        id
    }

    /// Remove section `id` and persist the result. A stale id changes
    /// nothing and writes nothing.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the section was removed but persisting
    /// failed.
    pub fn delete_section<S>(&mut self, id: SectionId, storage: &mut S) -> Result<bool, StorageError>
    where
        S: KeyValueStore + ?Sized,
    {
        if !self.store.delete_section(id) {
            return Ok(false);
        }
        self.update_menu();
        self.persist(storage)?;
        Ok(true)
    }

    /// Apply a title edit. The menu is rebuilt only when the title changed.
    pub fn set_title(&mut self, id: SectionId, title: &str) -> bool {
        let before = self.store.structure_revision();
        let found = self.store.set_title(id, title);
        if self.store.structure_revision() != before {
            self.update_menu();
        }
        found
    }

    /// Record markup the user typed into section `id`.
    pub fn sync_content(&mut self, id: SectionId, content: &str) -> bool {
        self.store.set_content(id, content)
    }

    /// Replace the whole document, e.g. with sections read from a team page.
    pub fn replace_document(&mut self, sections: Vec<Section>) {
        self.store.replace_all(sections);
        self.update_menu();
    }

    /// Write the document to `storage`.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if serialization or the write fails.
    pub fn persist<S>(&self, storage: &mut S) -> Result<(), StorageError>
    where
        S: KeyValueStore + ?Sized,
    {
        self.store.persist(storage)
    }

    /// Append an image container to the tracked section.
    ///
    /// With no tracked section, or a stale one, nothing changes and `None`
    /// is returned.
    pub fn insert_image(&mut self, active: Option<SectionId>, data_url: &str) -> Option<ImageId> {
        let id = active?;
        let section = self.store.get(id)?;
        let image = ImageId::new();
        let content = format!("{}{}", section.content, render_image_block(image, data_url));
        self.store.replace_content(id, content);
        Some(image)
    }

    /// Overwrite the source of image `image` in place.
    pub fn replace_image(&mut self, image: ImageId, data_url: &str) -> bool {
        self.edit_container(image, |content| replace_container_src(content, image, data_url))
    }

    /// Remove image `image` together with its controls.
    pub fn delete_image_container(&mut self, image: ImageId) -> bool {
        self.edit_container(image, |content| remove_container(content, image))
    }

    fn edit_container<F>(&mut self, image: ImageId, edit: F) -> bool
    where
        F: FnOnce(&str) -> Option<String>,
    {
        let Some((id, content)) = self
            .store
            .iter()
            .find(|(_, section)| container_ids(&section.content).contains(&image))
            .and_then(|(id, section)| edit(&section.content).map(|content| (id, content)))
        else {
            return false;
        };
        self.store.replace_content(id, content)
    }

    /// Distinct image sources across all sections, in document order.
    #[must_use]
    pub fn image_sources(&self) -> Vec<String> {
        let mut seen = Vec::new();
        for (_, section) in self.store.iter() {
            for src in image_sources(&section.content) {
                if !seen.contains(&src) {
                    seen.push(src);
                }
            }
        }
        seen
    }

    /// Rewrite every image source found in `inlined`. Returns the number of
    /// sections that changed.
    pub fn apply_inlined(&mut self, inlined: &InlinedSources) -> usize {
        apply_to_store(&mut self.store, inlined)
    }

    /// Inline every image with already-loaded resources and render the page.
    ///
    /// # Errors
    ///
    /// Returns the first [`ImageLoadError`]; the document is left untouched.
    pub fn export_to_file<R>(&mut self, resolver: &R, title: &str) -> Result<ExportFile, ImageLoadError>
    where
        R: ImageResolver + ?Sized,
    {
        let mut inlined = InlinedSources::new();
        for src in self.image_sources() {
            let image = inline_source(resolver, &src)?;
            inlined.insert(src, image);
        }
        self.apply_inlined(&inlined);
        Ok(ExportFile { file_name: EXPORT_FILE_NAME, contents: render_page(&self.store, title) })
    }

    /// Replace the document with an exported or hand-written page.
    ///
    /// Section wrappers are read back as sections; a page without any becomes
    /// one default-titled section holding its body. Returns the section count.
    pub fn import_from_file(&mut self, text: &str) -> usize {
        let mut sections = parse_sections(text);
        if sections.is_empty() {
            let body = body_inner(text).trim();
            if !body.is_empty() {
                sections.push(Section { content: body.to_owned(), ..Section::default() });
            }
        }
        self.replace_document(sections);
        self.store.len()
    }

    /// Resolve every image source to inline PNG, all concurrently.
    ///
    /// # Errors
    ///
    /// Returns the first [`ImageLoadError`].
    pub async fn inline_images_async<F>(&self, fetcher: &F) -> Result<InlinedSources, ImageLoadError>
    where
        F: ImageFetcher + ?Sized,
    {
        let sources = self.image_sources();
        let images = try_join_all(sources.iter().map(|src| inline_source_async(fetcher, src))).await?;
        Ok(sources.into_iter().zip(images).collect())
    }

    /// Inline every image, then send the sections container markup.
    ///
    /// The request is built only after every image resolved; an image
    /// failure aborts before anything is sent. Returns the resolved sources
    /// for [`SectionEditor::apply_inlined`].
    ///
    /// # Errors
    ///
    /// Returns [`UploadError::Image`] if any image failed, or the uploader's
    /// error.
    pub async fn upload_content<F, U>(
        &self,
        fetcher: &F,
        uploader: &U,
        team_id: &str,
        session_id: &str,
    ) -> Result<InlinedSources, UploadError>
    where
        F: ImageFetcher + ?Sized,
        U: Uploader + ?Sized,
    {
        let inlined = self.inline_images_async(fetcher).await?;
        log::debug!("upload: {} image source(s) inlined", inlined.len());

        let mut staged = self.store.clone();
        apply_to_store(&mut staged, &inlined);
        let request = UploadRequest {
            team_id: team_id.to_owned(),
            session_id: session_id.to_owned(),
            body: render_sections(&staged),
        };
        uploader.upload(&request).await?;
        Ok(inlined)
    }

    /// Mark an upload as started.
    ///
    /// # Errors
    ///
    /// Returns [`UploadError::InFlight`] while an earlier upload is running.
    pub fn begin_upload(&mut self) -> Result<(), UploadError> {
        if self.uploading {
            return Err(UploadError::InFlight);
        }
        self.uploading = true;
        Ok(())
    }

    /// Mark the running upload as finished, whatever its outcome.
    pub fn end_upload(&mut self) {
        self.uploading = false;
    }

    #[must_use]
    pub fn is_uploading(&self) -> bool {
        self.uploading
    }
}

fn apply_to_store(store: &mut SectionStore, inlined: &InlinedSources) -> usize {
    if inlined.is_empty() {
        return 0;
    }
    store.rewrite_contents(|content| {
        rewrite_image_sources(content, |src| {
            inlined.get(src).filter(|image| image.as_str() != src).map(|image| image.as_str().to_owned())
        })
    })
}

/// Section under the caret, recomputed on every selection change.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SelectionTracker {
    active: Option<SectionId>,
}

impl SelectionTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn active(&self) -> Option<SectionId> {
        self.active
    }

    /// Feed the section the caret resolved to. A caret outside every section
    /// (toolbar, file picker) keeps the previous section.
    pub fn observe(&mut self, resolved: Option<SectionId>) {
        if resolved.is_some() {
            self.active = resolved;
        }
    }

    /// Drop the tracked section if it is no longer in `store`.
    pub fn retain_in(&mut self, store: &SectionStore) {
        if self.active.is_some_and(|id| !store.contains(id)) {
            self.active = None;
        }
    }
}
