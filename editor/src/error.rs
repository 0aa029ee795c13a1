//! Error types for the document model.
//!
//! Every failure is handled where the operation was started: the client logs
//! it or reflects it in a single status element. Nothing here is retried.

use thiserror::Error;

/// An image resource could not be turned into its inline form.
///
/// Rejects the encode that produced it and aborts the enclosing export or
/// upload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImageLoadError {
    /// The resource exists but yields no readable pixel data (for example a
    /// cross-origin image without CORS permission).
    #[error("image is not readable: {0}")]
    Unreadable(String),
    /// Loading the resource failed before any bytes arrived.
    #[error("failed to load image {src}: {reason}")]
    Fetch { src: String, reason: String },
    /// The bytes are not an image format the codec understands.
    #[error("failed to decode image: {0}")]
    Decode(String),
    /// Re-encoding the decoded pixels as PNG failed.
    #[error("failed to encode image: {0}")]
    Encode(String),
    /// A `data:` source that is not base64 encoded or has no payload.
    #[error("malformed data url")]
    MalformedDataUrl,
}

/// Writing the persisted document failed.
#[derive(Debug, Error)]
pub enum StorageError {
    /// No key-value store is reachable (private mode, no window).
    #[error("storage is unavailable")]
    Unavailable,
    /// The store refused the write (quota exceeded and similar).
    #[error("storage write rejected: {0}")]
    Write(String),
    /// The document could not be serialized to JSON.
    #[error("failed to serialize document: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Uploading the sections container failed.
#[derive(Debug, Error)]
pub enum UploadError {
    /// An image could not be inlined; nothing was sent.
    #[error(transparent)]
    Image(#[from] ImageLoadError),
    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(String),
    /// The backend answered with a non-2xx status.
    #[error("unexpected status: {0}")]
    UnexpectedStatus(u16),
    /// Another upload for this editor has not finished yet.
    #[error("an upload is already in progress")]
    InFlight,
}
