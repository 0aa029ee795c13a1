//! Declarative view records and markup rendering.
//!
//! The browser client renders [`SectionView`] and [`MenuEntry`] records with
//! Leptos; export and upload render the same records to markup strings with
//! [`render_sections`] and [`render_page`]. Rendering is a pure function of
//! the store, so the same document always yields the same markup.

#[cfg(test)]
#[path = "view_test.rs"]
mod view_test;

use crate::consts::{MENU_ID, SECTIONS_CONTAINER_ID};
use crate::markup::{escape_attr, escape_text};
use crate::section::SectionId;
use crate::store::SectionStore;

/// Everything needed to draw one section.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SectionView {
    pub id: SectionId,
    /// Element id used as the scroll/anchor target.
    pub anchor: String,
    pub title: String,
    pub content: String,
    /// Bumped whenever the content was rewritten outside the browser.
    pub revision: u64,
    pub editable: bool,
}

/// One navigation menu entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MenuEntry {
    pub id: SectionId,
    pub anchor: String,
    pub label: String,
}

/// Element id of a section wrapper.
#[must_use]
pub fn anchor_for(id: SectionId) -> String {
    format!("section-{id}")
}

/// View records for every section, in document order.
#[must_use]
pub fn section_views(store: &SectionStore, editable: bool) -> Vec<SectionView> {
    store
        .iter()
        .map(|(id, section)| SectionView {
            id,
            anchor: anchor_for(id),
            title: section.title.clone(),
            content: section.content.clone(),
            revision: store.revision(id).unwrap_or_default(),
            editable,
        })
        .collect()
}

/// Menu entries: trimmed title, or `"Раздел {n}"` for blank titles.
#[must_use]
pub fn menu_entries(store: &SectionStore) -> Vec<MenuEntry> {
    store
        .iter()
        .enumerate()
        .map(|(index, (id, section))| MenuEntry { id, anchor: anchor_for(id), label: section.display_label(index) })
        .collect()
}

/// Markup of one section wrapper.
#[must_use]
pub fn render_section(view: &SectionView) -> String {
    let editable = if view.editable { r#" contenteditable="true""# } else { "" };
    let id = view.id.to_string();
    format!(
        concat!(
            r#"<div class="section-wrapper" id="{anchor}" data-section-id="{id}">"#,
            r#"<h2 class="section-title"{editable}>{title}</h2>"#,
            r#"<div class="editor"{editable} data-section-id="{id}">{content}</div>"#,
            "</div>"
        ),
        anchor = escape_attr(&view.anchor),
        id = id,
        editable = editable,
        title = escape_text(&view.title),
        content = view.content,
    )
}

/// Children of the sections container, as stored on the backend.
#[must_use]
pub fn render_sections(store: &SectionStore) -> String {
    section_views(store, false).iter().map(render_section).collect()
}

/// Navigation menu markup with in-page anchor links.
#[must_use]
pub fn render_menu(store: &SectionStore) -> String {
    menu_entries(store)
        .iter()
        .map(|entry| {
            format!(
                r##"<a class="menu-item" href="#{}">{}</a>"##,
                escape_attr(&entry.anchor),
                escape_text(&entry.label)
            )
        })
        .collect()
}

/// Standalone HTML page holding the menu and every section.
#[must_use]
pub fn render_page(store: &SectionStore, title: &str) -> String {
    format!(
        concat!(
            "<!DOCTYPE html>\n",
            "<html lang=\"ru\">\n",
            "<head>\n",
            "<meta charset=\"utf-8\">\n",
            "<title>{title}</title>\n",
            "</head>\n",
            "<body>\n",
            "<nav id=\"{menu_id}\">{menu}</nav>\n",
            "<div id=\"{sections_id}\">{sections}</div>\n",
            "</body>\n",
            "</html>\n"
        ),
        title = escape_text(title),
        menu_id = MENU_ID,
        menu = render_menu(store),
        sections_id = SECTIONS_CONTAINER_ID,
        sections = render_sections(store),
    )
}
