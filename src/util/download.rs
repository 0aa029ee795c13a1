//! Offering generated documents as file downloads.

use editor::editor::ExportFile;

/// MIME type of exported pages.
pub const EXPORT_MIME: &str = "text/html";

/// Hand `file` to the browser as a download.
///
/// # Errors
///
/// Returns a description of the failing browser call.
pub fn offer_download(file: &ExportFile) -> Result<(), String> {
    #[cfg(feature = "csr")]
    {
        use wasm_bindgen::{JsCast, JsValue};
        use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

        let document = web_sys::window().and_then(|w| w.document()).ok_or("no document")?;
        let parts = js_sys::Array::of1(&JsValue::from_str(&file.contents));
        let options = BlobPropertyBag::new();
        options.set_type(EXPORT_MIME);
        let blob = Blob::new_with_str_sequence_and_options(&parts, &options).map_err(|e| format!("{e:?}"))?;
        let url = Url::create_object_url_with_blob(&blob).map_err(|e| format!("{e:?}"))?;

        let anchor = document
            .create_element("a")
            .map_err(|e| format!("{e:?}"))?
            .dyn_into::<HtmlAnchorElement>()
            .map_err(|_| "anchor element expected".to_owned())?;
        anchor.set_href(&url);
        anchor.set_download(file.file_name);
        anchor.click();
        Url::revoke_object_url(&url).map_err(|e| format!("{e:?}"))
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = file;
        Err("downloads need a browser".to_owned())
    }
}
