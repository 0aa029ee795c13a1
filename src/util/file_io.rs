//! Reading files picked through `<input type="file">`.
//!
//! Reads go through the promise-based `Blob` API and are awaited with
//! `wasm-bindgen-futures`. Outside the browser there are no files to read.

#![allow(clippy::unused_async)]

use editor::codec::{InlineImage, encode};
use editor::error::ImageLoadError;

/// A file picked by the user.
#[cfg(feature = "csr")]
pub type PickedFile = web_sys::File;

/// A file picked by the user.
#[cfg(not(feature = "csr"))]
pub type PickedFile = ();

/// First file selected in the input with element id `input_id`, clearing the
/// input so the same file can be picked again.
pub fn take_picked_file(input_id: &str) -> Option<PickedFile> {
    #[cfg(feature = "csr")]
    {
        use wasm_bindgen::JsCast;

        let input = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(input_id))
            .and_then(|el| el.dyn_into::<web_sys::HtmlInputElement>().ok())?;
        let file = input.files().and_then(|files| files.get(0));
        input.set_value("");
        file
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = input_id;
        None
    }
}

/// Name of a picked file.
pub fn file_name(file: &PickedFile) -> String {
    #[cfg(feature = "csr")]
    {
        file.name()
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = file;
        String::new()
    }
}

/// Raw bytes of `file`.
///
/// # Errors
///
/// Returns [`ImageLoadError::Unreadable`] if the browser refuses the read.
pub async fn read_bytes(file: &PickedFile) -> Result<Vec<u8>, ImageLoadError> {
    #[cfg(feature = "csr")]
    {
        let buffer = wasm_bindgen_futures::JsFuture::from(file.array_buffer())
            .await
            .map_err(|e| ImageLoadError::Unreadable(format!("{}: {e:?}", file.name())))?;
        Ok(js_sys::Uint8Array::new(&buffer).to_vec())
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = file;
        Err(ImageLoadError::Unreadable("no file access outside the browser".to_owned()))
    }
}

/// Read a picked image and produce its inline PNG form.
///
/// # Errors
///
/// Returns an [`ImageLoadError`] if the file cannot be read or decoded.
pub async fn read_image(file: &PickedFile) -> Result<InlineImage, ImageLoadError> {
    let bytes = read_bytes(file).await?;
    encode(&bytes)
}

/// Text content of `file`.
///
/// # Errors
///
/// Returns a description of the failure if the browser refuses the read.
pub async fn read_text(file: &PickedFile) -> Result<String, String> {
    #[cfg(feature = "csr")]
    {
        let value = wasm_bindgen_futures::JsFuture::from(file.text())
            .await
            .map_err(|e| format!("{}: {e:?}", file.name()))?;
        value.as_string().ok_or_else(|| format!("{}: not text", file.name()))
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = file;
        Err("no file access outside the browser".to_owned())
    }
}
