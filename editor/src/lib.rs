//! Section document model for the team knowledge-base editor.
//!
//! This crate holds everything about the knowledge-base document that does not
//! need a live browser: the ordered list of titled sections, its persisted
//! form, inline image encoding, markup scanning, and the controller that
//! applies editing operations. The `knowledgebase` client wires DOM events,
//! `localStorage`, file pickers and HTTP into the traits defined here.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`section`] | `Section` value and the `SectionId` reference type |
//! | [`store`] | Ordered `SectionStore` and the `KeyValueStore` persistence seam |
//! | [`codec`] | Image resource to inline PNG data URL conversion |
//! | [`markup`] | Tag scanning, image source rewriting, section extraction |
//! | [`view`] | Declarative section/menu view records and markup rendering |
//! | [`image_block`] | Inserted image container markup and the picker state machine |
//! | [`editor`] | `SectionEditor` controller and active-section tracking |
//! | [`upload`] | Upload request shape and the `Uploader` seam |
//! | [`format`] | Inline formatting commands |
//! | [`consts`] | Fixed labels, keys and file names |
//! | [`error`] | Error types |

pub mod codec;
pub mod consts;
pub mod editor;
pub mod error;
pub mod format;
pub mod image_block;
pub mod markup;
pub mod section;
pub mod store;
pub mod upload;
pub mod view;

pub use editor::{SectionEditor, SelectionTracker};
pub use error::{ImageLoadError, StorageError, UploadError};
pub use section::{Section, SectionId};
pub use store::{KeyValueStore, MemoryStorage, PersistedDocument, SectionStore};
