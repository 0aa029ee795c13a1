//! Build-time client configuration.
//!
//! The backend is mounted under a path prefix shared by every endpoint. It
//! defaults to `/knowledgebase2` and can be overridden when building the WASM
//! bundle by setting `KB_BASE_PATH`.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

/// Path prefix used when `KB_BASE_PATH` is not set at build time.
pub const DEFAULT_BASE_PATH: &str = "/knowledgebase2";

/// Where the backend lives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    base_path: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(option_env!("KB_BASE_PATH").unwrap_or(DEFAULT_BASE_PATH))
    }
}

impl ClientConfig {
    /// Config for `base_path`. Trailing slashes are dropped; an empty prefix
    /// means the backend is mounted at the origin root.
    #[must_use]
    pub fn new(base_path: &str) -> Self {
        let trimmed = base_path.trim().trim_end_matches('/');
        let base_path = if trimmed.is_empty() || trimmed.starts_with('/') {
            trimmed.to_owned()
        } else {
            format!("/{trimmed}")
        };
        Self { base_path }
    }

    #[must_use]
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Absolute path of `path` under the base path.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_path, path.trim_start_matches('/'))
    }
}
