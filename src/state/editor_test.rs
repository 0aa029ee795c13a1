use std::collections::HashMap;

use editor::consts::DEFAULT_TITLE;
use editor::image_block::ImageTarget;
use editor::store::MemoryStorage;

use super::*;

// =============================================================
// Opening a team
// =============================================================

#[test]
fn open_team_prefers_page_sections() {
    let mut state = EditorState::default();
    let source = state.open_team("t1", true, vec![Section::new("Intro", "<p>hi</p>")], &MemoryStorage::new());
    assert_eq!(source, DocumentSource::Server);
    assert_eq!(state.team_id.as_deref(), Some("t1"));
    assert!(state.editable);
    assert_eq!(state.editor.store().serialize(), vec!["Intro\n<p>hi</p>".to_owned()]);
    assert_eq!(state.editor.menu().len(), 1);
}

#[test]
fn open_team_falls_back_to_local_document() {
    let mut local = MemoryStorage::new();
    local.set_item("sections", r#"["Saved\n<p>x</p>","Two\n"]"#).unwrap();
    let mut state = EditorState::default();
    assert_eq!(state.open_team("t1", false, Vec::new(), &local), DocumentSource::Local);
    assert_eq!(state.editor.store().len(), 2);
    assert!(!state.editable);
}

#[test]
fn open_team_without_anything_seeds_default_section() {
    let mut state = EditorState::default();
    state.open_team("t1", true, Vec::new(), &MemoryStorage::new());
    let titles: Vec<String> = state.editor.store().iter().map(|(_, s)| s.title.clone()).collect();
    assert_eq!(titles, vec![DEFAULT_TITLE.to_owned()]);
}

// =============================================================
// Switching teams
// =============================================================

#[test]
fn begin_open_skips_team_already_open_or_pending() {
    let mut state = EditorState::default();
    assert!(state.begin_open("a"));
    assert!(state.loading);
    assert!(!state.begin_open("a"));
    assert!(state.finish_open("a", true, Vec::new(), &MemoryStorage::new()).is_some());
    assert!(!state.begin_open("a"));
}

#[test]
fn superseded_open_is_dropped() {
    let mut state = EditorState::default();
    assert!(state.begin_open("a"));
    assert!(state.begin_open("b"));

    let late = state.finish_open("a", true, vec![Section::new("A", "")], &MemoryStorage::new());
    assert_eq!(late, None);
    assert_eq!(state.team_id, None);
    assert!(state.loading);

    let source = state.finish_open("b", false, vec![Section::new("B", "<p>b</p>")], &MemoryStorage::new());
    assert_eq!(source, Some(DocumentSource::Server));
    assert_eq!(state.team_id.as_deref(), Some("b"));
    assert!(!state.loading);
    assert!(!state.editable);
    assert_eq!(state.editor.store().serialize(), vec!["B\n<p>b</p>".to_owned()]);
}

#[test]
fn leaving_an_open_team_then_returning_refetches_it() {
    let (mut state, _) = opened();
    assert!(state.begin_open("t2"));
    assert!(state.begin_open("t1"));
    assert_eq!(state.finish_open("t2", true, Vec::new(), &MemoryStorage::new()), None);
    assert_eq!(state.team_id.as_deref(), Some("t1"));
    assert!(state.finish_open("t1", true, vec![Section::new("Fresh", "")], &MemoryStorage::new()).is_some());
    assert_eq!(state.editor.store().serialize(), vec!["Fresh\n".to_owned()]);
}

// =============================================================
// Layout keys
// =============================================================

#[test]
fn layout_changes_only_on_programmatic_rewrites() {
    let mut state = EditorState::default();
    state.open_team("t1", true, vec![Section::new("A", "")], &MemoryStorage::new());
    let id = state.editor.store().ids()[0];
    let before = state.layout();

    state.editor.sync_content(id, "<p>typed</p>");
    assert_eq!(state.layout(), before);

    state.editor.insert_image(Some(id), "data:image/png;base64,AA==");
    assert_eq!(state.layout(), vec![(id, 1)]);
}

// =============================================================
// Image picker flow
// =============================================================

const PIXEL: &str = "data:image/png;base64,AA==";

fn opened() -> (EditorState, SectionId) {
    let mut state = EditorState::default();
    state.open_team("t1", true, vec![Section::new("A", "<p>a</p>")], &MemoryStorage::new());
    let id = state.editor.store().ids()[0];
    (state, id)
}

#[test]
fn request_image_without_section_only_sets_hint() {
    let (mut state, _) = opened();
    let before = state.editor.store().serialize();
    assert!(!state.request_image(None));
    assert_eq!(state.insertion.target(), None);
    assert_eq!(state.status.as_deref(), Some(NO_SECTION_STATUS));
    assert_eq!(state.editor.store().serialize(), before);
}

#[test]
fn request_image_with_stale_section_is_refused() {
    let (mut state, _) = opened();
    assert!(!state.request_image(Some(SectionId::new())));
}

#[test]
fn picked_image_lands_in_armed_section() {
    let (mut state, id) = opened();
    assert!(state.request_image(Some(id)));
    assert!(!state.image_picked(None));
    assert_eq!(state.insertion.target(), Some(ImageTarget::Section(id)));
    assert!(state.image_picked(Some("cat.png".to_owned())));

    let focus = state.place_image(PIXEL).expect("focus selector");
    let content = state.editor.store().get(id).unwrap().content.clone();
    assert!(content.starts_with("<p>a</p>"));
    assert!(content.contains(PIXEL));
    let image = editor::image_block::container_ids(&content)[0];
    assert_eq!(focus, image.focus_selector());
    assert!(matches!(state.insertion.state(), editor::image_block::InsertionState::Inserted { .. }));
}

#[test]
fn replace_flow_swaps_source_without_focus() {
    let (mut state, id) = opened();
    let image = state.editor.insert_image(Some(id), "/old.png").unwrap();
    assert!(state.request_replace(image));
    assert!(state.image_picked(Some("new.png".to_owned())));
    assert_eq!(state.place_image(PIXEL), None);
    let content = state.editor.store().get(id).unwrap().content.clone();
    assert!(content.contains(PIXEL));
    assert!(!content.contains("/old.png"));
}

#[test]
fn place_image_after_section_deleted_resets() {
    let (mut state, id) = opened();
    state.request_image(Some(id));
    state.image_picked(Some("cat.png".to_owned()));
    state.editor.delete_section(id, &mut MemoryStorage::new()).unwrap();
    assert_eq!(state.place_image(PIXEL), None);
    assert_eq!(state.insertion.target(), None);
}

#[test]
fn image_failure_resets_and_reports() {
    let (mut state, id) = opened();
    state.request_image(Some(id));
    state.image_picked(Some("cat.png".to_owned()));
    state.image_failed(&ImageLoadError::Decode("bad header".to_owned()));
    assert_eq!(state.insertion.target(), None);
    assert_eq!(
        state.status.as_deref(),
        Some("Не удалось прочитать изображение: failed to decode image: bad header")
    );
}

// =============================================================
// Upload bookkeeping
// =============================================================

#[test]
fn finish_upload_releases_guard_and_reports() {
    let mut state = EditorState::default();
    state.editor.begin_upload().unwrap();
    state.finish_upload(&Ok(HashMap::new()));
    assert!(!state.editor.is_uploading());
    assert_eq!(state.status.as_deref(), Some(UPLOADED_STATUS));
}

#[test]
fn finish_upload_failure_keeps_document() {
    let mut state = EditorState::default();
    state.open_team("t1", true, vec![Section::new("A", r#"<img src="/a.png">"#)], &MemoryStorage::new());
    let before = state.editor.store().serialize();
    state.editor.begin_upload().unwrap();
    state.finish_upload(&Err(UploadError::UnexpectedStatus(500)));
    assert_eq!(state.editor.store().serialize(), before);
    assert_eq!(state.status.as_deref(), Some("Ошибка загрузки: unexpected status: 500"));
}

#[test]
fn upload_status_names_in_flight_refusal() {
    assert_eq!(upload_status::<()>(&Err(UploadError::InFlight)), "Загрузка уже выполняется");
}

#[test]
fn persist_failure_sets_status() {
    struct Full;
    impl KeyValueStore for Full {
        fn get_item(&self, _key: &str) -> Option<String> {
            None
        }
        fn set_item(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Write("quota".to_owned()))
        }
    }
    let mut state = EditorState::default();
    state.persist_to(&mut Full);
    assert_eq!(state.status.as_deref(), Some("Не удалось сохранить локально: storage write rejected: quota"));
}

#[test]
fn import_status_counts_sections() {
    assert_eq!(import_status(3), "Импортировано разделов: 3");
}
