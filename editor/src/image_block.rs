//! Inserted image containers and the picker state machine.
//!
//! An inserted image lives inside section content as a container element:
//!
//! ```text
//! div.image-container[data-image-id]
//!   img.inserted-image            (50% width, auto height)
//!   div.image-btn-container
//!     button.delete-image-btn     "Удалить"
//!     button.replace-image-btn    "Заменить"
//! div.editor-text[data-block-id]  empty block the caret moves into
//! ```
//!
//! The container id is written into the markup, so it survives persistence
//! and every later edit of the image goes through it.
//!
//! Picking a file is asynchronous and may be cancelled, so the flow is a small
//! state machine: `Idle → Armed → FileChosen → Encoding → Inserted`. A cancel
//! while armed leaves it armed and touches nothing.

#[cfg(test)]
#[path = "image_block_test.rs"]
mod image_block_test;

use std::fmt;

use uuid::Uuid;

use crate::consts::{CONTINUE_PLACEHOLDER, DELETE_IMAGE_LABEL, INSERTED_IMAGE_WIDTH, REPLACE_IMAGE_LABEL};
use crate::markup::{ElementSpan, escape_attr, find_element, find_elements, remove_span, rewrite_image_sources};
use crate::section::SectionId;

/// Class of the element wrapping an inserted image and its controls.
pub const CONTAINER_CLASS: &str = "image-container";
/// Class of the delete control.
pub const DELETE_BUTTON_CLASS: &str = "delete-image-btn";
/// Class of the replace control.
pub const REPLACE_BUTTON_CLASS: &str = "replace-image-btn";
/// Attribute carrying the container id on the container and its controls.
pub const IMAGE_ID_ATTR: &str = "data-image-id";
/// Attribute carrying the container id on the block that follows it.
pub const BLOCK_ID_ATTR: &str = "data-block-id";

/// Reference to one inserted image container.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ImageId(Uuid);

impl ImageId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        Uuid::parse_str(raw.trim()).ok().map(Self)
    }

    /// CSS selector of the editable block inserted after this image.
    #[must_use]
    pub fn focus_selector(&self) -> String {
        format!("[{BLOCK_ID_ATTR}=\"{}\"]", self.0)
    }
}

impl Default for ImageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Markup of an image container followed by an empty continuation block.
#[must_use]
pub fn render_image_block(id: ImageId, src: &str) -> String {
    format!(
        concat!(
            r#"<div class="{container}" {id_attr}="{id}">"#,
            r#"<img class="inserted-image" src="{src}" style="width: {width}; height: auto;">"#,
            r#"<div class="image-btn-container">"#,
            r#"<button class="{delete}" type="button" {id_attr}="{id}">{delete_label}</button>"#,
            r#"<button class="{replace}" type="button" {id_attr}="{id}">{replace_label}</button>"#,
            "</div></div>",
            r#"<div class="editor-text" placeholder="{placeholder}" {block_attr}="{id}"></div>"#
        ),
        container = CONTAINER_CLASS,
        id_attr = IMAGE_ID_ATTR,
        id = id,
        src = escape_attr(src),
        width = INSERTED_IMAGE_WIDTH,
        delete = DELETE_BUTTON_CLASS,
        delete_label = DELETE_IMAGE_LABEL,
        replace = REPLACE_BUTTON_CLASS,
        replace_label = REPLACE_IMAGE_LABEL,
        placeholder = CONTINUE_PLACEHOLDER,
        block_attr = BLOCK_ID_ATTR,
    )
}

/// Span of the container `id` inside `html`.
#[must_use]
pub fn find_container(html: &str, id: ImageId) -> Option<ElementSpan> {
    let wanted = id.to_string();
    find_element(html, |t| {
        t.has_class(html, CONTAINER_CLASS) && t.attr_value(html, IMAGE_ID_ATTR).as_deref() == Some(wanted.as_str())
    })
    .map(|(_, span)| span)
}

/// Ids of every container in `html`, in source order.
#[must_use]
pub fn container_ids(html: &str) -> Vec<ImageId> {
    find_elements(html, |t| t.has_class(html, CONTAINER_CLASS))
        .into_iter()
        .filter_map(|(tag, _)| tag.attr_value(html, IMAGE_ID_ATTR))
        .filter_map(|raw| ImageId::parse(&raw))
        .collect()
}

/// Overwrite the image source inside container `id`.
///
/// Returns `None` when the container is not in `html`.
#[must_use]
pub fn replace_container_src(html: &str, id: ImageId, src: &str) -> Option<String> {
    let span = find_container(html, id)?;
    let rewritten = rewrite_image_sources(span.outer(html), |_| Some(src.to_owned()));
    Some(format!("{}{rewritten}{}", &html[..span.start], &html[span.end..]))
}

/// Cut container `id` (image plus controls) out of `html`.
///
/// The continuation block after it stays, since it may already hold text.
#[must_use]
pub fn remove_container(html: &str, id: ImageId) -> Option<String> {
    find_container(html, id).map(|span| remove_span(html, span))
}

/// What a picked file will be used for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageTarget {
    /// Append a new container to this section.
    Section(SectionId),
    /// Overwrite the source of an existing container.
    Replace(ImageId),
}

/// Progress of one image pick.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum InsertionState {
    /// No picker open.
    #[default]
    Idle,
    /// The file picker is open.
    Armed { target: ImageTarget },
    /// A file was picked and is about to be read.
    FileChosen { target: ImageTarget, file_name: String },
    /// The file is being read as a data URL.
    Encoding { target: ImageTarget },
    /// The image landed in the document.
    Inserted { target: ImageTarget, image: ImageId },
}

/// Drives [`InsertionState`]. Transitions that do not apply to the current
/// state are ignored and return `false`.
#[derive(Clone, Debug, Default)]
pub struct ImageInsertion {
    state: InsertionState,
}

impl ImageInsertion {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> &InsertionState {
        &self.state
    }

    /// Target of the pick in progress.
    #[must_use]
    pub fn target(&self) -> Option<ImageTarget> {
        match &self.state {
            InsertionState::Idle => None,
            InsertionState::Armed { target }
            | InsertionState::FileChosen { target, .. }
            | InsertionState::Encoding { target }
            | InsertionState::Inserted { target, .. } => Some(*target),
        }
    }

    /// Open the picker for `target`. Allowed from `Idle` and `Inserted`, and
    /// from `Armed` to retarget an open picker.
    pub fn arm(&mut self, target: ImageTarget) -> bool {
        match self.state {
            InsertionState::Idle | InsertionState::Armed { .. } | InsertionState::Inserted { .. } => {
                self.state = InsertionState::Armed { target };
                true
            }
            InsertionState::FileChosen { .. } | InsertionState::Encoding { .. } => false,
        }
    }

    /// The picker closed. `None` means nothing was chosen, which keeps the
    /// machine armed.
    pub fn choose(&mut self, file_name: Option<String>) -> bool {
        let InsertionState::Armed { target } = self.state else {
            return false;
        };
        if let Some(file_name) = file_name {
            self.state = InsertionState::FileChosen { target, file_name };
        }
        true
    }

    /// Reading the chosen file has started.
    pub fn begin_encoding(&mut self) -> bool {
        let InsertionState::FileChosen { target, .. } = self.state else {
            return false;
        };
        self.state = InsertionState::Encoding { target };
        true
    }

    /// The image was written into the document.
    pub fn finish(&mut self, image: ImageId) -> bool {
        let InsertionState::Encoding { target } = self.state else {
            return false;
        };
        self.state = InsertionState::Inserted { target, image };
        true
    }

    /// Drop the pick in progress (read failure, nothing tracked).
    pub fn reset(&mut self) {
        self.state = InsertionState::Idle;
    }
}
