//! REST calls against the knowledge-base backend.
//!
//! Browser build (`csr`): real HTTP via `gloo-net`.
//! Native build: every call fails with `ApiError::Unavailable` so the rest of
//! the crate compiles and tests without a browser.
//!
//! ERROR HANDLING
//! ==============
//! Calls return `Result`s; callers decide whether a failure is shown inline
//! (sign-in) or logged with a status line (everything else).

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use async_trait::async_trait;
use editor::codec::ImageFetcher;
#[cfg(feature = "csr")]
use editor::consts::SESSION_HEADER;
use editor::error::{ImageLoadError, UploadError};
use editor::upload::{UploadRequest, Uploader};

use super::error::ApiError;
use super::types::{Session, TeamsListing};
use crate::config::ClientConfig;

#[cfg(any(test, feature = "csr"))]
fn sign_in_endpoint(config: &ClientConfig) -> String {
    config.endpoint("sign_in")
}

#[cfg(any(test, feature = "csr"))]
fn teams_endpoint(config: &ClientConfig) -> String {
    config.endpoint("base/teams")
}

#[cfg(any(test, feature = "csr"))]
fn team_endpoint(config: &ClientConfig, team_id: &str) -> String {
    config.endpoint(&format!("base/{team_id}"))
}

#[cfg(any(test, feature = "csr"))]
fn upload_endpoint(config: &ClientConfig) -> String {
    config.endpoint("base/upload")
}

#[cfg(any(test, feature = "csr"))]
fn fetch_failed_reason(status: u16) -> String {
    format!("image request failed: {status}")
}

#[cfg(feature = "csr")]
fn network_error(err: &gloo_net::Error) -> ApiError {
    ApiError::Network(err.to_string())
}

/// Exchange credentials for a bearer token and, when the backend sends one,
/// a session id.
///
/// # Errors
///
/// Returns [`ApiError::Auth`] for rejected credentials, or a network,
/// status or decode error.
pub async fn sign_in(config: &ClientConfig, login: &str, password: &str) -> Result<Session, ApiError> {
    #[cfg(feature = "csr")]
    {
        let payload = super::types::SignInRequest { login: login.to_owned(), password: password.to_owned() };
        let resp = gloo_net::http::Request::post(&sign_in_endpoint(config))
            .json(&payload)
            .map_err(|e| network_error(&e))?
            .send()
            .await
            .map_err(|e| network_error(&e))?;
        if !resp.ok() {
            return Err(ApiError::from_status(resp.status()));
        }
        let session_id = resp.headers().get(SESSION_HEADER);
        if session_id.is_none() {
            log::warn!("sign-in response carried no {SESSION_HEADER} header");
        }
        let body: super::types::SignInResponse =
            resp.json().await.map_err(|e| ApiError::Decode(e.to_string()))?;
        Ok(Session { token: Some(body.regular_token), session_id })
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = (config, login, password);
        Err(ApiError::Unavailable)
    }
}

/// Load the teams page and extract the team list from it.
///
/// # Errors
///
/// Returns [`ApiError::Auth`] for an expired token, a network or status
/// error, or [`ApiError::Decode`] if the page lacks the team map.
pub async fn fetch_teams(config: &ClientConfig, session: &Session) -> Result<TeamsListing, ApiError> {
    #[cfg(feature = "csr")]
    {
        let resp = gloo_net::http::Request::get(&teams_endpoint(config))
            .header(SESSION_HEADER, session.session_id.as_deref().unwrap_or_default())
            .header("Authorization", session.token.as_deref().unwrap_or_default())
            .send()
            .await
            .map_err(|e| network_error(&e))?;
        if !resp.ok() {
            return Err(ApiError::from_status(resp.status()));
        }
        let html = resp.text().await.map_err(|e| ApiError::Decode(e.to_string()))?;
        TeamsListing::parse(&html)
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = (config, session);
        Err(ApiError::Unavailable)
    }
}

/// Load a team's page and return the markup it embeds.
///
/// # Errors
///
/// Returns a network or status error.
pub async fn fetch_team_page(config: &ClientConfig, team_id: &str, session_id: &str) -> Result<String, ApiError> {
    #[cfg(feature = "csr")]
    {
        let resp = gloo_net::http::Request::get(&team_endpoint(config, team_id))
            .header(SESSION_HEADER, session_id)
            .send()
            .await
            .map_err(|e| network_error(&e))?;
        if !resp.ok() {
            return Err(ApiError::from_status(resp.status()));
        }
        resp.text().await.map_err(|e| ApiError::Decode(e.to_string()))
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = (config, team_id, session_id);
        Err(ApiError::Unavailable)
    }
}

/// Posts the sections container to `<base>/base/upload`.
#[derive(Clone, Debug, Default)]
pub struct HttpUploader {
    pub config: ClientConfig,
}

#[async_trait(?Send)]
impl Uploader for HttpUploader {
    async fn upload(&self, request: &UploadRequest) -> Result<(), UploadError> {
        #[cfg(feature = "csr")]
        {
            let mut builder = gloo_net::http::Request::post(&upload_endpoint(&self.config));
            for (name, value) in request.headers() {
                builder = builder.header(name, value);
            }
            let resp = builder
                .body(request.body.clone())
                .map_err(|e| UploadError::Network(e.to_string()))?
                .send()
                .await
                .map_err(|e| UploadError::Network(e.to_string()))?;
            if !resp.ok() {
                return Err(UploadError::UnexpectedStatus(resp.status()));
            }
            Ok(())
        }
        #[cfg(not(feature = "csr"))]
        {
            let _ = request;
            Err(UploadError::Network(ApiError::Unavailable.to_string()))
        }
    }
}

/// Loads image resources fresh over HTTP.
#[derive(Clone, Copy, Debug, Default)]
pub struct HttpImageFetcher;

#[async_trait(?Send)]
impl ImageFetcher for HttpImageFetcher {
    async fn fetch(&self, src: &str) -> Result<Vec<u8>, ImageLoadError> {
        #[cfg(feature = "csr")]
        {
            let fetch_error = |reason: String| ImageLoadError::Fetch { src: src.to_owned(), reason };
            let resp = gloo_net::http::Request::get(src)
                .send()
                .await
                .map_err(|e| fetch_error(e.to_string()))?;
            if !resp.ok() {
                return Err(fetch_error(fetch_failed_reason(resp.status())));
            }
            resp.binary().await.map_err(|e| fetch_error(e.to_string()))
        }
        #[cfg(not(feature = "csr"))]
        {
            Err(ImageLoadError::Fetch { src: src.to_owned(), reason: ApiError::Unavailable.to_string() })
        }
    }
}
