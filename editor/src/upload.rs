//! Upload request shape and the transport seam.

use async_trait::async_trait;

use crate::consts::{SESSION_HEADER, TEAM_HEADER, UPLOAD_CONTENT_TYPE};
use crate::error::UploadError;

/// Sections container markup addressed to one team.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadRequest {
    pub team_id: String,
    pub session_id: String,
    /// Markup with every image source inlined.
    pub body: String,
}

impl UploadRequest {
    /// Request headers, in send order.
    #[must_use]
    pub fn headers(&self) -> [(&'static str, &str); 3] {
        [
            (SESSION_HEADER, self.session_id.as_str()),
            (TEAM_HEADER, self.team_id.as_str()),
            ("Content-Type", UPLOAD_CONTENT_TYPE),
        ]
    }
}

/// Sends an [`UploadRequest`] to the backend.
#[async_trait(?Send)]
pub trait Uploader {
    /// POST the request. Resolves once the backend answered with 2xx.
    ///
    /// # Errors
    ///
    /// Returns [`UploadError::Network`] when no response arrived and
    /// [`UploadError::UnexpectedStatus`] for any non-2xx answer.
    async fn upload(&self, request: &UploadRequest) -> Result<(), UploadError>;
}
