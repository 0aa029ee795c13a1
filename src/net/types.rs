//! Request/response shapes for the backend.
//!
//! DESIGN
//! ======
//! Sign-in speaks JSON. The team endpoints answer with server-rendered HTML
//! pages, so their "schema" is a handful of well-known elements: `teams-data`
//! (a JSON map of teams), `session_id`, and the `section-wrapper` blocks of a
//! previously uploaded knowledge base. The parsers here pull exactly those out.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use std::collections::HashMap;

use editor::Section;
use editor::markup::{extract_element_text, parse_sections};
use serde::{Deserialize, Serialize};

use super::error::ApiError;

/// Element id holding the JSON team map on the teams page.
pub const TEAMS_DATA_ID: &str = "teams-data";
/// Element id holding the refreshed session id on the teams page.
pub const SESSION_ID_ELEMENT: &str = "session_id";

/// `POST /sign_in` body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SignInRequest {
    pub login: String,
    pub password: String,
}

/// `POST /sign_in` success body.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct SignInResponse {
    pub regular_token: String,
}

/// Credentials kept in local storage after sign-in.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
    pub token: Option<String>,
    pub session_id: Option<String>,
}

/// One entry of the `teams-data` map.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct TeamInfo {
    pub name: String,
    #[serde(default)]
    pub is_admin: bool,
}

/// A team the signed-in user belongs to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Team {
    pub id: String,
    pub name: String,
    pub is_admin: bool,
}

/// What the teams page tells us.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TeamsListing {
    /// Teams sorted by name, then id.
    pub teams: Vec<Team>,
    /// Session id the backend wants used from now on.
    pub session_id: Option<String>,
}

impl TeamsListing {
    /// Extract the team map and session id from a teams page.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Decode`] if the page has no `teams-data` element or
    /// its text is not a JSON team map.
    pub fn parse(html: &str) -> Result<Self, ApiError> {
        let raw = extract_element_text(html, TEAMS_DATA_ID)
            .ok_or_else(|| ApiError::Decode(format!("no #{TEAMS_DATA_ID} element")))?;
        let map: HashMap<String, TeamInfo> =
            serde_json::from_str(raw.trim()).map_err(|e| ApiError::Decode(e.to_string()))?;

        let mut teams: Vec<Team> = map
            .into_iter()
            .map(|(id, info)| Team { id, name: info.name, is_admin: info.is_admin })
            .collect();
        teams.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));

        let session_id = extract_element_text(html, SESSION_ID_ELEMENT)
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty());
        Ok(Self { teams, session_id })
    }

    #[must_use]
    pub fn find(&self, team_id: &str) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == team_id)
    }
}

/// Sections embedded in a team page. Empty when nothing was uploaded yet.
#[must_use]
pub fn team_page_sections(html: &str) -> Vec<Section> {
    parse_sections(html)
}
