//! Synchronous pixel access to images already shown on the page.
//!
//! Export inlines images without another network round-trip: the rendered
//! `<img>` is drawn onto an offscreen canvas and read back as PNG. A
//! cross-origin image without CORS permission taints the canvas, and the
//! read-back fails with `ImageLoadError::Unreadable`.

use editor::codec::ImageResolver;
#[cfg(feature = "csr")]
use editor::codec::data_url_bytes;
use editor::error::ImageLoadError;

/// [`ImageResolver`] over the images rendered in the current document.
#[derive(Clone, Copy, Debug, Default)]
pub struct DomImageResolver;

impl ImageResolver for DomImageResolver {
    fn resolve(&self, src: &str) -> Result<Vec<u8>, ImageLoadError> {
        #[cfg(feature = "csr")]
        {
            read_rendered_image(src)
        }
        #[cfg(not(feature = "csr"))]
        {
            Err(ImageLoadError::Unreadable(src.to_owned()))
        }
    }
}

#[cfg(feature = "csr")]
fn read_rendered_image(src: &str) -> Result<Vec<u8>, ImageLoadError> {
    use wasm_bindgen::JsCast;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

    let unreadable = || ImageLoadError::Unreadable(src.to_owned());
    let document = web_sys::window().and_then(|w| w.document()).ok_or_else(unreadable)?;

    let images = document.images();
    let img = (0..images.length())
        .filter_map(|i| images.item(i))
        .filter_map(|el| el.dyn_into::<HtmlImageElement>().ok())
        .find(|img| img.get_attribute("src").as_deref() == Some(src))
        .ok_or_else(unreadable)?;
    if !img.complete() || img.natural_width() == 0 {
        return Err(unreadable());
    }

    let canvas = document
        .create_element("canvas")
        .ok()
        .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        .ok_or_else(unreadable)?;
    canvas.set_width(img.natural_width());
    canvas.set_height(img.natural_height());
    let ctx = canvas
        .get_context("2d")
        .ok()
        .flatten()
        .and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
        .ok_or_else(unreadable)?;
    ctx.draw_image_with_html_image_element(&img, 0.0, 0.0).map_err(|_| unreadable())?;

    let url = canvas.to_data_url().map_err(|_| unreadable())?;
    data_url_bytes(&url)
}
