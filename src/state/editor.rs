//! Open knowledge-base state: the section editor plus its page chrome.
//!
//! DESIGN
//! ======
//! `EditorState` wraps the `editor` crate's `SectionEditor` with what only
//! the page cares about: which team is open, whether the user may edit, the
//! image picker flow, and a single status line. Rendering keys off
//! [`EditorState::layout`], so typing (which does not bump revisions) never
//! re-renders a section under the caret.
//!
//! Opening a team is asynchronous. `pending_team` names the one open the
//! page still wants; a fetch that finishes for any other team is dropped.

#[cfg(test)]
#[path = "editor_test.rs"]
mod editor_test;

use editor::editor::InlinedSources;
use editor::error::{ImageLoadError, StorageError, UploadError};
use editor::image_block::{ImageId, ImageInsertion, ImageTarget};
use editor::store::KeyValueStore;
use editor::{Section, SectionEditor, SectionId, SectionStore};

/// Status shown while an upload runs.
pub const UPLOADING_STATUS: &str = "Загрузка на сервер...";
/// Status shown after a successful upload.
pub const UPLOADED_STATUS: &str = "Сохранено на сервере";
/// Status shown when image insertion is requested with no section under the caret.
pub const NO_SECTION_STATUS: &str = "Поставьте курсор в раздел, чтобы вставить изображение";

/// Where the open document came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DocumentSource {
    /// Sections embedded in the team page.
    Server,
    /// The locally persisted document.
    Local,
}

/// State of the editor page.
#[derive(Clone, Debug, Default)]
pub struct EditorState {
    pub editor: SectionEditor,
    pub team_id: Option<String>,
    pub editable: bool,
    pub insertion: ImageInsertion,
    pub status: Option<String>,
    pub loading: bool,
    pub pending_team: Option<String>,
}

impl EditorState {
    /// Start opening `team_id`. Returns `false` when it is already open or
    /// already being fetched; any other pending open is superseded.
    pub fn begin_open(&mut self, team_id: &str) -> bool {
        let current = self.pending_team.as_deref().or(self.team_id.as_deref());
        if current == Some(team_id) {
            return false;
        }
        self.pending_team = Some(team_id.to_owned());
        self.loading = true;
        self.status = None;
        true
    }

    /// Finish an open started with [`begin_open`](Self::begin_open). A result
    /// for a team that is no longer pending is discarded and yields `None`.
    pub fn finish_open<S>(
        &mut self,
        team_id: &str,
        editable: bool,
        page_sections: Vec<Section>,
        local: &S,
    ) -> Option<DocumentSource>
    where
        S: KeyValueStore + ?Sized,
    {
        if self.pending_team.as_deref() != Some(team_id) {
            return None;
        }
        self.pending_team = None;
        Some(self.open_team(team_id, editable, page_sections, local))
    }

    /// Open `team_id`. Sections read from its page win; a page without any
    /// falls back to the locally persisted document.
    pub fn open_team<S>(&mut self, team_id: &str, editable: bool, page_sections: Vec<Section>, local: &S) -> DocumentSource
    where
        S: KeyValueStore + ?Sized,
    {
        self.team_id = Some(team_id.to_owned());
        self.editable = editable;
        self.insertion.reset();
        self.loading = false;
        if page_sections.is_empty() {
            self.editor = SectionEditor::load(local);
            DocumentSource::Local
        } else {
            let mut store = SectionStore::new();
            store.replace_all(page_sections);
            self.editor = SectionEditor::new(store);
            DocumentSource::Server
        }
    }

    /// Render keys: one `(id, revision)` per section, in order.
    #[must_use]
    pub fn layout(&self) -> Vec<(SectionId, u64)> {
        self.editor
            .store()
            .iter()
            .map(|(id, _)| (id, self.editor.store().revision(id).unwrap_or_default()))
            .collect()
    }

    /// Persist the document, recording a failure in the status line.
    pub fn persist_to<S>(&mut self, storage: &mut S)
    where
        S: KeyValueStore + ?Sized,
    {
        if let Err(e) = self.editor.persist(storage) {
            log::error!("failed to persist sections: {e}");
            self.status = Some(storage_status(&e));
        }
    }

    /// Arm the picker for an image appended to `active`. Without a tracked
    /// section nothing happens apart from a hint in the status line.
    pub fn request_image(&mut self, active: Option<SectionId>) -> bool {
        let Some(section) = active.filter(|id| self.editor.store().contains(*id)) else {
            self.status = Some(NO_SECTION_STATUS.to_owned());
            return false;
        };
        self.insertion.arm(ImageTarget::Section(section))
    }

    /// Arm the picker to replace the source of `image`.
    pub fn request_replace(&mut self, image: ImageId) -> bool {
        self.insertion.arm(ImageTarget::Replace(image))
    }

    /// The picker closed with `file_name` (or nothing). Returns whether a read
    /// should start.
    pub fn image_picked(&mut self, file_name: Option<String>) -> bool {
        self.insertion.choose(file_name) && self.insertion.begin_encoding()
    }

    /// Write a freshly read image into the document at the armed target.
    /// Returns the selector of the block to focus after an insertion.
    pub fn place_image(&mut self, data_url: &str) -> Option<String> {
        let placed = match self.insertion.target() {
            Some(ImageTarget::Section(section)) => self.editor.insert_image(Some(section), data_url),
            Some(ImageTarget::Replace(id)) => self.editor.replace_image(id, data_url).then_some(id),
            None => None,
        };
        let Some(id) = placed else {
            log::warn!("image target vanished before the read finished");
            self.insertion.reset();
            return None;
        };
        let inserted = matches!(self.insertion.target(), Some(ImageTarget::Section(_)));
        self.insertion.finish(id);
        inserted.then(|| id.focus_selector())
    }

    /// Reading the picked image failed.
    pub fn image_failed(&mut self, err: &ImageLoadError) {
        log::error!("failed to read image: {err}");
        self.insertion.reset();
        self.status = Some(image_status(err));
    }

    /// Apply the outcome of an upload started with `begin_upload`.
    pub fn finish_upload(&mut self, result: &Result<InlinedSources, UploadError>) {
        self.editor.end_upload();
        if let Ok(inlined) = result {
            self.editor.apply_inlined(inlined);
        }
        self.status = Some(upload_status(result));
    }
}

/// Status line for an upload outcome.
#[must_use]
pub fn upload_status<T>(result: &Result<T, UploadError>) -> String {
    match result {
        Ok(_) => UPLOADED_STATUS.to_owned(),
        Err(UploadError::InFlight) => "Загрузка уже выполняется".to_owned(),
        Err(UploadError::Image(e)) => format!("Не удалось подготовить изображение: {e}"),
        Err(e) => format!("Ошибка загрузки: {e}"),
    }
}

/// Status line for a failed image read.
#[must_use]
pub fn image_status(err: &ImageLoadError) -> String {
    format!("Не удалось прочитать изображение: {err}")
}

/// Status line for a failed local save.
#[must_use]
pub fn storage_status(err: &StorageError) -> String {
    format!("Не удалось сохранить локально: {err}")
}

/// Status line after an import.
#[must_use]
pub fn import_status(sections: usize) -> String {
    format!("Импортировано разделов: {sections}")
}
