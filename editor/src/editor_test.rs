use std::cell::RefCell;
use std::io::Cursor;
use std::task::{Context, Poll};

use async_trait::async_trait;
use futures::channel::oneshot;
use futures::executor::block_on;
use futures::task::noop_waker_ref;
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};

use super::*;
use crate::codec::is_inline_png;
use crate::consts::{DEFAULT_TITLE, STORAGE_KEY};
use crate::store::MemoryStorage;

fn png_bytes() -> Vec<u8> {
    let img = RgbaImage::from_pixel(2, 2, Rgba([0, 128, 255, 255]));
    let mut buffer = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(img).write_to(&mut buffer, ImageFormat::Png).unwrap();
    buffer.into_inner()
}

fn empty_editor() -> SectionEditor {
    SectionEditor::new(SectionStore::new())
}

fn two_image_editor() -> SectionEditor {
    let mut editor = empty_editor();
    editor.add_section(Some(r#"One
<p>a</p><img src="/static/a.png">"#));
    editor.add_section(Some(r#"Two
<img src="/static/b.png"><p>b</p>"#));
    editor
}

fn inline_count(html: &str) -> usize {
    html.matches("data:image/png;base64,").count()
}

struct MapResolver(HashMap<String, Vec<u8>>);

impl ImageResolver for MapResolver {
    fn resolve(&self, src: &str) -> Result<Vec<u8>, ImageLoadError> {
        self.0.get(src).cloned().ok_or_else(|| ImageLoadError::Unreadable(src.to_owned()))
    }
}

/// Fetcher whose loads complete only when the test sends the bytes.
struct ChannelFetcher {
    pending: RefCell<HashMap<String, oneshot::Receiver<Vec<u8>>>>,
}

#[async_trait(?Send)]
impl ImageFetcher for ChannelFetcher {
    async fn fetch(&self, src: &str) -> Result<Vec<u8>, ImageLoadError> {
        let rx = self.pending.borrow_mut().remove(src).ok_or_else(|| ImageLoadError::Unreadable(src.to_owned()))?;
        rx.await.map_err(|_| ImageLoadError::Fetch { src: src.to_owned(), reason: "cancelled".to_owned() })
    }
}

struct StaticFetcher;

#[async_trait(?Send)]
impl ImageFetcher for StaticFetcher {
    async fn fetch(&self, src: &str) -> Result<Vec<u8>, ImageLoadError> {
        if src.contains("broken") {
            return Err(ImageLoadError::Fetch { src: src.to_owned(), reason: "404".to_owned() });
        }
        Ok(png_bytes())
    }
}

#[derive(Default)]
struct RecordingUploader {
    requests: RefCell<Vec<UploadRequest>>,
    reject_with: Option<u16>,
}

#[async_trait(?Send)]
impl Uploader for RecordingUploader {
    async fn upload(&self, request: &UploadRequest) -> Result<(), UploadError> {
        self.requests.borrow_mut().push(request.clone());
        match self.reject_with {
            Some(status) => Err(UploadError::UnexpectedStatus(status)),
            None => Ok(()),
        }
    }
}

// =============================================================
// Loading and menu
// =============================================================

#[test]
fn load_from_empty_storage_seeds_default_section() {
    let editor = SectionEditor::load(&MemoryStorage::new());
    let sections: Vec<&Section> = editor.store().iter().map(|(_, s)| s).collect();
    assert_eq!(sections, vec![&Section::default()]);
    assert_eq!(sections[0].title, DEFAULT_TITLE);
    assert_eq!(editor.menu().len(), 1);
}

#[test]
fn add_section_appends_and_rebuilds_menu() {
    let mut editor = SectionEditor::load(&MemoryStorage::new());
    let builds = editor.menu_builds();
    let id = editor.add_section(Some("Second\n<p>x</p>"));
    assert_eq!(editor.store().ids().last(), Some(&id));
    assert_eq!(editor.menu_builds(), builds + 1);
    assert_eq!(editor.menu().len(), editor.store().len());
    assert_eq!(editor.menu()[1].label, "Second");
}

#[test]
fn add_section_on_empty_store_serializes_raw_text() {
    let mut editor = empty_editor();
    editor.add_section(Some("Intro\n<p>hi</p>"));
    assert_eq!(editor.store().serialize(), vec!["Intro\n<p>hi</p>".to_owned()]);
}

#[test]
fn set_title_rebuilds_menu_only_on_change() {
    let mut editor = empty_editor();
    let id = editor.add_section(None);
    let builds = editor.menu_builds();

    assert!(editor.set_title(id, DEFAULT_TITLE));
    assert_eq!(editor.menu_builds(), builds);

    assert!(editor.set_title(id, "  "));
    assert_eq!(editor.menu_builds(), builds + 1);
    assert_eq!(editor.menu()[0].label, "Раздел 1");
}

#[test]
fn sync_content_does_not_bump_revision() {
    let mut editor = empty_editor();
    let id = editor.add_section(None);
    assert!(editor.sync_content(id, "<p>typed</p>"));
    assert_eq!(editor.store().get(id).unwrap().content, "<p>typed</p>");
    assert_eq!(editor.store().revision(id), Some(0));
}

// =============================================================
// Deletion and tracking
// =============================================================

#[test]
fn deleting_tracked_section_keeps_order_and_persists() {
    let mut editor = empty_editor();
    let a = editor.add_section(Some("A\n"));
    let b = editor.add_section(Some("B\n"));
    let c = editor.add_section(Some("C\n"));
    let mut tracker = SelectionTracker::new();
    tracker.observe(Some(b));

    let mut storage = MemoryStorage::new();
    assert!(editor.delete_section(b, &mut storage).unwrap());
    tracker.retain_in(editor.store());

    assert_eq!(editor.store().ids(), vec![a, c]);
    assert_eq!(editor.menu().len(), 2);
    assert_eq!(tracker.active(), None);
    assert_eq!(storage.get_item(STORAGE_KEY).as_deref(), Some(r#"["A\n","C\n"]"#));
}

#[test]
fn deleting_stale_section_writes_nothing() {
    let mut editor = empty_editor();
    let id = editor.add_section(None);
    let mut storage = MemoryStorage::new();
    editor.delete_section(id, &mut storage).unwrap();
    let builds = editor.menu_builds();

    assert!(!editor.delete_section(id, &mut storage).unwrap());
    assert_eq!(editor.menu_builds(), builds);
    assert_eq!(storage.get_item(STORAGE_KEY).as_deref(), Some("[]"));
}

#[test]
fn tracker_ignores_unresolved_carets() {
    let id = SectionId::new();
    let mut tracker = SelectionTracker::new();
    tracker.observe(Some(id));
    tracker.observe(None);
    assert_eq!(tracker.active(), Some(id));
}

// =============================================================
// Images
// =============================================================

#[test]
fn insert_image_without_tracked_section_is_a_no_op() {
    let mut editor = empty_editor();
    let id = editor.add_section(Some("A\n<p>x</p>"));
    let before = editor.store().serialize();

    assert_eq!(editor.insert_image(None, "data:image/png;base64,AA=="), None);
    assert_eq!(editor.insert_image(Some(SectionId::new()), "data:image/png;base64,AA=="), None);
    assert_eq!(editor.store().serialize(), before);
    assert_eq!(editor.store().revision(id), Some(0));
}

#[test]
fn insert_image_appends_container_to_tracked_section() {
    let mut editor = empty_editor();
    let id = editor.add_section(Some("A\n<p>x</p>"));
    let image = editor.insert_image(Some(id), "data:image/png;base64,AA==").unwrap();

    let content = &editor.store().get(id).unwrap().content;
    assert!(content.starts_with("<p>x</p><div class=\"image-container\""));
    assert!(content.ends_with(&format!("data-block-id=\"{image}\"></div>")));
    assert_eq!(container_ids(content), vec![image]);
    assert_eq!(editor.store().revision(id), Some(1));
}

#[test]
fn replace_image_overwrites_source_in_place() {
    let mut editor = empty_editor();
    let id = editor.add_section(None);
    let image = editor.insert_image(Some(id), "data:image/png;base64,AA==").unwrap();

    assert!(editor.replace_image(image, "data:image/png;base64,BB=="));
    assert_eq!(editor.image_sources(), vec!["data:image/png;base64,BB==".to_owned()]);
    assert!(!editor.replace_image(ImageId::new(), "data:image/png;base64,CC=="));
}

#[test]
fn delete_image_container_removes_image_and_controls() {
    let mut editor = empty_editor();
    let id = editor.add_section(None);
    let image = editor.insert_image(Some(id), "data:image/png;base64,AA==").unwrap();

    assert!(editor.delete_image_container(image));
    let content = &editor.store().get(id).unwrap().content;
    assert!(editor.image_sources().is_empty());
    assert!(!content.contains("delete-image-btn"));
    assert!(!editor.delete_image_container(image));
}

// =============================================================
// Export / import
// =============================================================

#[test]
fn export_inlines_every_image() {
    let mut editor = two_image_editor();
    let resolver = MapResolver(HashMap::from([
        ("/static/a.png".to_owned(), png_bytes()),
        ("/static/b.png".to_owned(), png_bytes()),
    ]));
    let file = editor.export_to_file(&resolver, "База знаний").unwrap();

    assert_eq!(file.file_name, "base.html");
    assert_eq!(inline_count(&file.contents), 2);
    assert!(!file.contents.contains("/static/"));
    assert!(editor.image_sources().iter().all(|src| is_inline_png(src)));
}

#[test]
fn export_failure_leaves_document_untouched() {
    let mut editor = two_image_editor();
    let before = editor.store().serialize();
    let resolver = MapResolver(HashMap::from([("/static/a.png".to_owned(), png_bytes())]));

    let err = editor.export_to_file(&resolver, "t").unwrap_err();
    assert_eq!(err, ImageLoadError::Unreadable("/static/b.png".to_owned()));
    assert_eq!(editor.store().serialize(), before);
}

#[test]
fn import_restores_exported_document() {
    let mut editor = empty_editor();
    editor.add_section(Some("Intro\n<p>hi</p><img src=\"data:image/png;base64,AA==\">"));
    editor.add_section(Some("\n<ul><li>x</li></ul>"));
    let file = editor.export_to_file(&MapResolver(HashMap::new()), "t").unwrap();

    let mut other = empty_editor();
    assert_eq!(other.import_from_file(&file.contents), 2);
    assert_eq!(other.store().serialize(), editor.store().serialize());
    assert_eq!(other.menu().len(), 2);
}

#[test]
fn import_plain_page_becomes_one_section() {
    let mut editor = two_image_editor();
    editor.import_from_file("<html><body>\n<p>loose text</p>\n</body></html>");
    assert_eq!(editor.store().serialize(), vec![format!("{DEFAULT_TITLE}\n<p>loose text</p>")]);
}

#[test]
fn import_empty_page_seeds_default_section() {
    let mut editor = two_image_editor();
    assert_eq!(editor.import_from_file(""), 1);
    assert_eq!(editor.store().iter().next().map(|(_, s)| s.clone()), Some(Section::default()));
}

// =============================================================
// Upload
// =============================================================

#[test]
fn upload_waits_for_every_pending_image() {
    let editor = two_image_editor();
    let (tx_a, rx_a) = oneshot::channel();
    let (tx_b, rx_b) = oneshot::channel();
    let fetcher = ChannelFetcher {
        pending: RefCell::new(HashMap::from([
            ("/static/a.png".to_owned(), rx_a),
            ("/static/b.png".to_owned(), rx_b),
        ])),
    };
    let uploader = RecordingUploader::default();
    let mut cx = Context::from_waker(noop_waker_ref());

    let mut upload = Box::pin(editor.upload_content(&fetcher, &uploader, "team-1", "session-1"));
    assert!(upload.as_mut().poll(&mut cx).is_pending());

    tx_a.send(png_bytes()).unwrap();
    assert!(upload.as_mut().poll(&mut cx).is_pending());
    assert!(uploader.requests.borrow().is_empty());

    tx_b.send(png_bytes()).unwrap();
    let Poll::Ready(Ok(inlined)) = upload.as_mut().poll(&mut cx) else {
        panic!("upload should finish once both images resolved");
    };
    drop(upload);

    let requests = uploader.requests.borrow();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].team_id, "team-1");
    assert_eq!(requests[0].session_id, "session-1");
    assert_eq!(inline_count(&requests[0].body), 2);
    assert!(!requests[0].body.contains("/static/"));
    assert!(!requests[0].body.contains("contenteditable"));
    assert_eq!(inlined.len(), 2);
}

#[test]
fn upload_leaves_live_document_until_applied() {
    let mut editor = two_image_editor();
    let uploader = RecordingUploader::default();
    let inlined = block_on(editor.upload_content(&StaticFetcher, &uploader, "t", "s")).unwrap();

    assert_eq!(editor.image_sources(), vec!["/static/a.png".to_owned(), "/static/b.png".to_owned()]);
    assert_eq!(editor.apply_inlined(&inlined), 2);
    assert!(editor.image_sources().iter().all(|src| is_inline_png(src)));
}

#[test]
fn upload_aborts_before_sending_when_an_image_fails() {
    let mut editor = two_image_editor();
    editor.add_section(Some("Three\n<img src=\"/static/broken.png\">"));
    let uploader = RecordingUploader::default();

    let err = block_on(editor.upload_content(&StaticFetcher, &uploader, "t", "s")).unwrap_err();
    assert!(matches!(err, UploadError::Image(ImageLoadError::Fetch { .. })));
    assert!(uploader.requests.borrow().is_empty());
}

#[test]
fn upload_reports_unexpected_status() {
    let editor = two_image_editor();
    let uploader = RecordingUploader { reject_with: Some(500), ..RecordingUploader::default() };
    let err = block_on(editor.upload_content(&StaticFetcher, &uploader, "t", "s")).unwrap_err();
    assert!(matches!(err, UploadError::UnexpectedStatus(500)));
}

#[test]
fn upload_without_images_sends_markup_as_is() {
    let mut editor = empty_editor();
    editor.add_section(Some("A\n<p>plain</p>"));
    let uploader = RecordingUploader::default();
    let inlined = block_on(editor.upload_content(&StaticFetcher, &uploader, "t", "s")).unwrap();
    assert!(inlined.is_empty());
    assert_eq!(uploader.requests.borrow()[0].body, render_sections(editor.store()));
}

#[test]
fn second_upload_is_refused_while_one_is_running() {
    let mut editor = empty_editor();
    editor.begin_upload().unwrap();
    assert!(matches!(editor.begin_upload(), Err(UploadError::InFlight)));
    editor.end_upload();
    assert!(editor.begin_upload().is_ok());
}
