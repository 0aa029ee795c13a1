//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components render the editor chrome and the editable sections, reading
//! shared state from context and routing user operations through
//! `pages::editor::EditorActions`.

pub mod editor_toolbar;
pub mod section_block;
pub mod section_menu;
