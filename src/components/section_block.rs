//! One section: editable title plus the content region.
//!
//! SYSTEM CONTEXT
//! ==============
//! The browser owns the content while the user types. Input events copy the
//! region's markup back into the store without re-rendering; a block is only
//! rebuilt when the page re-keys it after a programmatic rewrite.
//!
//! Image controls live inside the content markup, so their clicks are
//! delegated from the region and resolved through the `data-image-id`
//! attribute.

#[cfg(test)]
#[path = "section_block_test.rs"]
mod section_block_test;

use editor::image_block::{DELETE_BUTTON_CLASS, IMAGE_ID_ATTR, ImageId, REPLACE_BUTTON_CLASS};
use editor::view::SectionView;
use leptos::prelude::*;

use crate::pages::editor::EditorActions;

/// Click on an image control.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ImageAction {
    Delete(ImageId),
    Replace(ImageId),
}

/// Classify a control from its `class` and `data-image-id` attributes.
fn image_action(class_attr: &str, image_attr: Option<&str>) -> Option<ImageAction> {
    let image = ImageId::parse(image_attr?)?;
    let mut classes = class_attr.split_ascii_whitespace();
    if classes.clone().any(|c| c == DELETE_BUTTON_CLASS) {
        Some(ImageAction::Delete(image))
    } else if classes.any(|c| c == REPLACE_BUTTON_CLASS) {
        Some(ImageAction::Replace(image))
    } else {
        None
    }
}

fn clicked_image_action(ev: &leptos::ev::MouseEvent) -> Option<ImageAction> {
    #[cfg(feature = "csr")]
    {
        use wasm_bindgen::JsCast;

        let target = ev.target()?.dyn_into::<web_sys::Element>().ok()?;
        let button = target.closest(&format!("button[{IMAGE_ID_ATTR}]")).ok().flatten()?;
        image_action(&button.class_name(), button.get_attribute(IMAGE_ID_ATTR).as_deref())
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = (ev, IMAGE_ID_ATTR);
        None
    }
}

fn target_markup(ev: &leptos::ev::Event) -> Option<String> {
    #[cfg(feature = "csr")]
    {
        use wasm_bindgen::JsCast;

        ev.target()?.dyn_into::<web_sys::Element>().ok().map(|el| el.inner_html())
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = ev;
        None
    }
}

fn target_text(ev: &leptos::ev::Event) -> Option<String> {
    #[cfg(feature = "csr")]
    {
        use wasm_bindgen::JsCast;

        ev.target()?.dyn_into::<web_sys::HtmlElement>().ok().map(|el| el.inner_text())
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = ev;
        None
    }
}

#[component]
pub fn SectionBlock(section: SectionView) -> impl IntoView {
    let actions = expect_context::<EditorActions>();
    let id = section.id;
    let editable = section.editable.then_some("true");

    let on_title_input = move |ev: leptos::ev::Event| {
        if let Some(title) = target_text(&ev) {
            actions.set_title(id, &title);
        }
    };
    let on_content_input = move |ev: leptos::ev::Event| {
        if let Some(content) = target_markup(&ev) {
            actions.sync_content(id, &content);
        }
    };
    let read_only = !section.editable;
    let on_content_click = move |ev: leptos::ev::MouseEvent| {
        if read_only {
            return;
        }
        match clicked_image_action(&ev) {
            Some(ImageAction::Delete(image)) => {
                ev.prevent_default();
                actions.delete_image(image);
            }
            Some(ImageAction::Replace(image)) => {
                ev.prevent_default();
                actions.start_image_replace(image);
            }
            None => {}
        }
    };

    view! {
        <div class="section-wrapper" id=section.anchor data-section-id=id.to_string()>
            <h2 class="section-title" contenteditable=editable on:input=on_title_input>
                {section.title}
            </h2>
            <div
                class="editor"
                contenteditable=editable
                data-section-id=id.to_string()
                inner_html=section.content
                on:input=on_content_input
                on:click=on_content_click
            ></div>
        </div>
    }
}
