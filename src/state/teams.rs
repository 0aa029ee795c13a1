//! Team list state for the teams page and editor access checks.

#[cfg(test)]
#[path = "teams_test.rs"]
mod teams_test;

use crate::net::types::{Team, TeamsListing};

/// Teams of the signed-in user.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TeamsState {
    pub listing: Option<TeamsListing>,
    pub loading: bool,
    pub error: Option<String>,
}

impl TeamsState {
    #[must_use]
    pub fn teams(&self) -> &[Team] {
        self.listing.as_ref().map(|l| l.teams.as_slice()).unwrap_or_default()
    }

    #[must_use]
    pub fn team(&self, team_id: &str) -> Option<&Team> {
        self.listing.as_ref().and_then(|l| l.find(team_id))
    }

    /// Whether the user may edit `team_id`'s knowledge base. Unknown teams
    /// are read-only.
    #[must_use]
    pub fn can_edit(&self, team_id: &str) -> bool {
        self.team(team_id).is_some_and(|t| t.is_admin)
    }

    /// The list has been fetched (successfully or not).
    #[must_use]
    pub fn settled(&self) -> bool {
        !self.loading && (self.listing.is_some() || self.error.is_some())
    }
}
