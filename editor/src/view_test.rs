use super::*;
use crate::markup::parse_sections;
use crate::section::Section;

fn sample_store() -> SectionStore {
    let mut store = SectionStore::new();
    store.add_section(Some("Intro\n<p>hi</p>"));
    store.add_section(Some("   \n<p>untitled</p>"));
    store.add_section(Some("A < B\n<img src=\"data:image/png;base64,AA==\">"));
    store
}

// =============================================================
// Menu
// =============================================================

#[test]
fn menu_has_one_entry_per_section() {
    let store = sample_store();
    assert_eq!(menu_entries(&store).len(), store.len());
}

#[test]
fn menu_labels_use_title_or_position() {
    let store = sample_store();
    let labels: Vec<String> = menu_entries(&store).into_iter().map(|e| e.label).collect();
    assert_eq!(labels, vec!["Intro", "Раздел 2", "A < B"]);
}

#[test]
fn menu_anchor_matches_section_anchor() {
    let store = sample_store();
    let views = section_views(&store, true);
    let menu = menu_entries(&store);
    for (view, entry) in views.iter().zip(&menu) {
        assert_eq!(view.anchor, entry.anchor);
        assert_eq!(view.id, entry.id);
    }
}

// =============================================================
// Section rendering
// =============================================================

#[test]
fn render_section_snapshot() {
    let mut store = SectionStore::new();
    let id = store.add_section(Some("Intro & more\n<p>hi</p>"));
    let view = &section_views(&store, true)[0];
    let expected = format!(
        concat!(
            r#"<div class="section-wrapper" id="section-{id}" data-section-id="{id}">"#,
            r#"<h2 class="section-title" contenteditable="true">Intro &amp; more</h2>"#,
            r#"<div class="editor" contenteditable="true" data-section-id="{id}"><p>hi</p></div>"#,
            "</div>"
        ),
        id = id
    );
    assert_eq!(render_section(view), expected);
}

#[test]
fn render_sections_is_idempotent() {
    let store = sample_store();
    assert_eq!(render_sections(&store), render_sections(&store));
}

#[test]
fn render_sections_omits_contenteditable() {
    let store = sample_store();
    assert!(!render_sections(&store).contains("contenteditable"));
}

#[test]
fn rendered_sections_parse_back_to_same_document() {
    let store = sample_store();
    let parsed = parse_sections(&render_sections(&store));
    let original: Vec<Section> = store.iter().map(|(_, s)| s.clone()).collect();
    assert_eq!(parsed, original);
}

// =============================================================
// Page rendering
// =============================================================

#[test]
fn render_page_wraps_menu_and_sections() {
    let store = sample_store();
    let page = render_page(&store, "База знаний");
    assert!(page.starts_with("<!DOCTYPE html>"));
    assert!(page.contains("<title>База знаний</title>"));
    assert!(page.contains(r##"<nav id="menu"><a class="menu-item" href="#section-"##));
    assert!(page.contains(&format!(r#"<div id="sections">{}</div>"#, render_sections(&store))));
}

#[test]
fn rendered_page_parses_back_to_same_document() {
    let store = sample_store();
    let parsed = parse_sections(&render_page(&store, "t"));
    assert_eq!(parsed.len(), 3);
    assert_eq!(parsed[2].title, "A < B");
}

#[test]
fn section_views_carry_revision() {
    let mut store = SectionStore::new();
    let id = store.add_section(None);
    store.replace_content(id, "<p>x</p>".to_owned());
    assert_eq!(section_views(&store, false)[0].revision, 1);
}
