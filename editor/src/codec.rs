//! Image resource to inline PNG conversion.
//!
//! Every image leaving the editor (export, upload) must be self-contained, so
//! sources are normalized to `data:image/png;base64,…`. Pixel data is decoded
//! with `image` and re-encoded as RGBA PNG, which keeps the output
//! deterministic for a given input.
//!
//! Sources come in three flavors (see [`classify`]): PNG data URLs are already
//! inline and kept verbatim, other data URLs are decoded locally, and external
//! URLs are loaded through an [`ImageResolver`] (synchronous, pixels already in
//! the page) or an [`ImageFetcher`] (asynchronous, loads the resource fresh).

#[cfg(test)]
#[path = "codec_test.rs"]
mod codec_test;

use std::io::Cursor;

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use image::{DynamicImage, ImageFormat};

use crate::consts::PNG_DATA_URL_PREFIX;
use crate::error::ImageLoadError;

/// A self-contained PNG data URL, directly assignable as an image `src`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct InlineImage(String);

impl InlineImage {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for InlineImage {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Where an image source points.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceKind {
    /// Already a PNG data URL.
    InlinePng,
    /// A data URL in some other format.
    InlineOther,
    /// A remote or relative URL.
    External,
}

/// Classify an image `src` attribute value.
#[must_use]
pub fn classify(src: &str) -> SourceKind {
    let trimmed = src.trim_start();
    if trimmed.starts_with(PNG_DATA_URL_PREFIX) {
        SourceKind::InlinePng
    } else if trimmed.get(..5).is_some_and(|scheme| scheme.eq_ignore_ascii_case("data:")) {
        SourceKind::InlineOther
    } else {
        SourceKind::External
    }
}

/// Whether `src` needs no conversion before export or upload.
#[must_use]
pub fn is_inline_png(src: &str) -> bool {
    classify(src) == SourceKind::InlinePng
}

/// Synchronous access to image resources already loaded in the page.
pub trait ImageResolver {
    /// Encoded bytes of the image behind `src`.
    ///
    /// # Errors
    ///
    /// Returns an [`ImageLoadError`] if the resource cannot be read.
    fn resolve(&self, src: &str) -> Result<Vec<u8>, ImageLoadError>;
}

/// Resolver for contexts with no loaded external images.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoExternalImages;

impl ImageResolver for NoExternalImages {
    fn resolve(&self, src: &str) -> Result<Vec<u8>, ImageLoadError> {
        Err(ImageLoadError::Unreadable(src.to_owned()))
    }
}

/// Asynchronous loader that fetches an image resource fresh.
#[async_trait(?Send)]
pub trait ImageFetcher {
    /// Load the encoded bytes of the image behind `src`.
    ///
    /// # Errors
    ///
    /// Returns an [`ImageLoadError`] if the resource cannot be loaded.
    async fn fetch(&self, src: &str) -> Result<Vec<u8>, ImageLoadError>;
}

/// Decode an image resource and produce its inline PNG form.
///
/// # Errors
///
/// Returns [`ImageLoadError::Unreadable`] for an empty resource,
/// [`ImageLoadError::Decode`] for bytes that are not a supported image, and
/// [`ImageLoadError::Encode`] if PNG encoding fails.
pub fn encode(resource: &[u8]) -> Result<InlineImage, ImageLoadError> {
    if resource.is_empty() {
        return Err(ImageLoadError::Unreadable("empty image resource".to_owned()));
    }
    let decoded = image::load_from_memory(resource).map_err(|e| ImageLoadError::Decode(e.to_string()))?;
    let rgba = DynamicImage::ImageRgba8(decoded.to_rgba8());

    let mut buffer = Cursor::new(Vec::new());
    rgba.write_to(&mut buffer, ImageFormat::Png)
        .map_err(|e| ImageLoadError::Encode(e.to_string()))?;

    Ok(InlineImage(format!("{PNG_DATA_URL_PREFIX}{}", STANDARD.encode(buffer.into_inner()))))
}

/// Load `src` through `fetcher`, then [`encode`] it.
///
/// # Errors
///
/// Propagates the fetcher's error or the encode error.
pub async fn encode_async<F>(fetcher: &F, src: &str) -> Result<InlineImage, ImageLoadError>
where
    F: ImageFetcher + ?Sized,
{
    let bytes = fetcher.fetch(src).await?;
    encode(&bytes)
}

/// The inline form is already displayable; decoding is the identity.
#[must_use]
pub fn decode(inline: &InlineImage) -> &str {
    inline.as_str()
}

/// Decode the payload of a base64 `data:` URL.
///
/// # Errors
///
/// Returns [`ImageLoadError::MalformedDataUrl`] if `src` is not a base64 data
/// URL or its payload is not valid base64.
pub fn data_url_bytes(src: &str) -> Result<Vec<u8>, ImageLoadError> {
    let trimmed = src.trim();
    let rest = trimmed
        .get(..5)
        .filter(|scheme| scheme.eq_ignore_ascii_case("data:"))
        .map(|_| &trimmed[5..])
        .ok_or(ImageLoadError::MalformedDataUrl)?;
    let (meta, payload) = rest.split_once(',').ok_or(ImageLoadError::MalformedDataUrl)?;
    if !meta.to_ascii_lowercase().ends_with(";base64") {
        return Err(ImageLoadError::MalformedDataUrl);
    }
    let compact: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    STANDARD.decode(compact).map_err(|_| ImageLoadError::MalformedDataUrl)
}

/// Produce the inline PNG form of `src` using already-loaded resources.
///
/// # Errors
///
/// Returns an [`ImageLoadError`] if the source cannot be read or encoded.
pub fn inline_source<R>(resolver: &R, src: &str) -> Result<InlineImage, ImageLoadError>
where
    R: ImageResolver + ?Sized,
{
    match classify(src) {
        SourceKind::InlinePng => Ok(InlineImage(src.trim().to_owned())),
        SourceKind::InlineOther => encode(&data_url_bytes(src)?),
        SourceKind::External => encode(&resolver.resolve(src)?),
    }
}

/// Produce the inline PNG form of `src`, fetching external resources fresh.
///
/// # Errors
///
/// Returns an [`ImageLoadError`] if the source cannot be loaded or encoded.
pub async fn inline_source_async<F>(fetcher: &F, src: &str) -> Result<InlineImage, ImageLoadError>
where
    F: ImageFetcher + ?Sized,
{
    match classify(src) {
        SourceKind::InlinePng => Ok(InlineImage(src.trim().to_owned())),
        SourceKind::InlineOther => encode(&data_url_bytes(src)?),
        SourceKind::External => encode_async(fetcher, src).await,
    }
}
