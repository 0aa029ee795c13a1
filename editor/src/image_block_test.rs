use super::*;
use crate::markup::image_sources;

// =============================================================
// Markup
// =============================================================

#[test]
fn render_image_block_snapshot() {
    let id = ImageId::new();
    let expected = format!(
        concat!(
            r#"<div class="image-container" data-image-id="{id}">"#,
            r#"<img class="inserted-image" src="data:image/png;base64,AA==" style="width: 50%; height: auto;">"#,
            r#"<div class="image-btn-container">"#,
            r#"<button class="delete-image-btn" type="button" data-image-id="{id}">Удалить</button>"#,
            r#"<button class="replace-image-btn" type="button" data-image-id="{id}">Заменить</button>"#,
            "</div></div>",
            r#"<div class="editor-text" placeholder="Продолжайте писать..." data-block-id="{id}"></div>"#
        ),
        id = id
    );
    assert_eq!(render_image_block(id, "data:image/png;base64,AA=="), expected);
}

#[test]
fn focus_selector_targets_continuation_block() {
    let id = ImageId::new();
    assert_eq!(id.focus_selector(), format!("[data-block-id=\"{id}\"]"));
}

#[test]
fn image_id_parse_round_trips() {
    let id = ImageId::new();
    assert_eq!(ImageId::parse(&id.to_string()), Some(id));
    assert_eq!(ImageId::parse("nope"), None);
}

#[test]
fn container_ids_lists_containers_in_order() {
    let (a, b) = (ImageId::new(), ImageId::new());
    let html = format!("<p>x</p>{}{}", render_image_block(a, "a.png"), render_image_block(b, "b.png"));
    assert_eq!(container_ids(&html), vec![a, b]);
}

#[test]
fn replace_container_src_touches_only_that_image() {
    let (a, b) = (ImageId::new(), ImageId::new());
    let html = format!("{}{}", render_image_block(a, "a.png"), render_image_block(b, "b.png"));
    let out = replace_container_src(&html, b, "data:image/png;base64,QQ==").unwrap();
    assert_eq!(image_sources(&out), vec!["a.png".to_owned(), "data:image/png;base64,QQ==".to_owned()]);
    assert_eq!(out.len(), html.len() - "b.png".len() + "data:image/png;base64,QQ==".len());
}

#[test]
fn remove_container_keeps_continuation_block() {
    let id = ImageId::new();
    let html = format!("<p>before</p>{}", render_image_block(id, "a.png"));
    let out = remove_container(&html, id).unwrap();
    assert!(image_sources(&out).is_empty());
    assert!(out.starts_with("<p>before</p><div class=\"editor-text\""));
    assert!(container_ids(&out).is_empty());
}

#[test]
fn unknown_container_is_none() {
    let html = render_image_block(ImageId::new(), "a.png");
    assert_eq!(remove_container(&html, ImageId::new()), None);
    assert_eq!(replace_container_src(&html, ImageId::new(), "b.png"), None);
}

// =============================================================
// State machine
// =============================================================

#[test]
fn full_insertion_walks_every_state() {
    let section = SectionId::new();
    let image = ImageId::new();
    let mut flow = ImageInsertion::new();
    assert_eq!(flow.state(), &InsertionState::Idle);

    assert!(flow.arm(ImageTarget::Section(section)));
    assert!(flow.choose(Some("cat.png".to_owned())));
    assert_eq!(
        flow.state(),
        &InsertionState::FileChosen { target: ImageTarget::Section(section), file_name: "cat.png".to_owned() }
    );
    assert!(flow.begin_encoding());
    assert!(flow.finish(image));
    assert_eq!(flow.state(), &InsertionState::Inserted { target: ImageTarget::Section(section), image });
}

#[test]
fn cancel_keeps_machine_armed() {
    let target = ImageTarget::Replace(ImageId::new());
    let mut flow = ImageInsertion::new();
    flow.arm(target);
    assert!(flow.choose(None));
    assert_eq!(flow.state(), &InsertionState::Armed { target });
}

#[test]
fn out_of_order_transitions_are_ignored() {
    let mut flow = ImageInsertion::new();
    assert!(!flow.choose(Some("x.png".to_owned())));
    assert!(!flow.begin_encoding());
    assert!(!flow.finish(ImageId::new()));
    assert_eq!(flow.state(), &InsertionState::Idle);
}

#[test]
fn arming_during_encoding_is_refused() {
    let mut flow = ImageInsertion::new();
    flow.arm(ImageTarget::Section(SectionId::new()));
    flow.choose(Some("x.png".to_owned()));
    flow.begin_encoding();
    assert!(!flow.arm(ImageTarget::Section(SectionId::new())));
    flow.reset();
    assert_eq!(flow.target(), None);
}
