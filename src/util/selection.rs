//! Caret tracking and other direct DOM interaction for the section editor.
//!
//! SYSTEM CONTEXT
//! ==============
//! Section content is edited in place through `contenteditable`, so a few
//! things happen outside Leptos' view tree: resolving which section holds the
//! caret, focusing the block appended after an inserted image, smooth
//! scrolling to a section, and browser formatting commands.

#[cfg(test)]
#[path = "selection_test.rs"]
mod selection_test;

use editor::format::FormatCommand;
use editor::{SectionId, SelectionTracker};
use leptos::prelude::*;

/// Attribute carrying the section id on editable regions.
pub const SECTION_ID_ATTR: &str = "data-section-id";

/// Selector of the region that makes a caret "inside a section".
#[cfg(any(test, feature = "csr"))]
fn caret_region_selector() -> String {
    format!(".editor[{SECTION_ID_ATTR}]")
}

/// Section id carried by an editable region's attribute value.
#[must_use]
pub fn section_from_attr(value: Option<String>) -> Option<SectionId> {
    value.as_deref().and_then(SectionId::parse)
}

/// The section whose `.editor` region holds the caret right now.
pub fn caret_section() -> Option<SectionId> {
    #[cfg(feature = "csr")]
    {
        use wasm_bindgen::JsCast;

        let selection = web_sys::window()?.get_selection().ok().flatten()?;
        let node = selection.anchor_node()?;
        let element = match node.dyn_ref::<web_sys::Element>() {
            Some(element) => element.clone(),
            None => node.parent_element()?,
        };
        let region = element.closest(&caret_region_selector()).ok().flatten()?;
        section_from_attr(region.get_attribute(SECTION_ID_ATTR))
    }
    #[cfg(not(feature = "csr"))]
    {
        None
    }
}

/// Feed every `selectionchange` into `tracker` for the rest of the page's
/// life. Install once, from the root component.
pub fn install_selection_tracking(tracker: RwSignal<SelectionTracker>) {
    #[cfg(feature = "csr")]
    {
        use wasm_bindgen::JsCast;
        use wasm_bindgen::closure::Closure;

        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        let on_change = Closure::wrap(Box::new(move || {
            let resolved = caret_section();
            if resolved.is_some() && tracker.get_untracked().active() != resolved {
                tracker.update(|t| t.observe(resolved));
            }
        }) as Box<dyn FnMut()>);
        if document
            .add_event_listener_with_callback("selectionchange", on_change.as_ref().unchecked_ref())
            .is_ok()
        {
            on_change.forget();
        }
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = tracker;
    }
}

/// Smoothly scroll the element with id `anchor` into view.
pub fn scroll_to_anchor(anchor: &str) {
    #[cfg(feature = "csr")]
    {
        let Some(element) = web_sys::window().and_then(|w| w.document()).and_then(|d| d.get_element_by_id(anchor))
        else {
            return;
        };
        let options = web_sys::ScrollIntoViewOptions::new();
        options.set_behavior(web_sys::ScrollBehavior::Smooth);
        element.scroll_into_view_with_scroll_into_view_options(&options);
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = anchor;
    }
}

/// Put the caret into the first element matching `selector`.
pub fn focus_selector(selector: &str) {
    #[cfg(feature = "csr")]
    {
        use wasm_bindgen::JsCast;

        let Some(element) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.query_selector(selector).ok().flatten())
            .and_then(|el| el.dyn_into::<web_sys::HtmlElement>().ok())
        else {
            return;
        };
        let _ = element.focus();
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = selector;
    }
}

/// Apply a formatting command to the current selection.
pub fn exec_format(command: FormatCommand) -> bool {
    #[cfg(feature = "csr")]
    {
        use wasm_bindgen::JsCast;

        web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.dyn_into::<web_sys::HtmlDocument>().ok())
            .and_then(|d| d.exec_command(command.exec_name()).ok())
            .unwrap_or(false)
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = command;
        false
    }
}

/// Open the file picker behind the hidden input `input_id`.
pub fn open_picker(input_id: &str) {
    #[cfg(feature = "csr")]
    {
        use wasm_bindgen::JsCast;

        if let Some(input) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(input_id))
            .and_then(|el| el.dyn_into::<web_sys::HtmlElement>().ok())
        {
            input.click();
        }
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = input_id;
    }
}
