//! The remote API port.
//!
//! [`TeamsApi`] is the only way handlers reach GitHub. The `github` crate
//! implements it over HTTP; tests implement it in memory.
//!
//! Conditional reads take the `If-None-Match` value as an argument. An
//! implementation must not keep it between calls, so a single client can be
//! shared by concurrently running handlers.

use async_trait::async_trait;

use crate::errors::ApiError;
use crate::identifiers::{ETag, OrgName, TeamId};
use crate::types::{Conditional, Membership, Team, TeamRequest, TeamRole};

/// Team and team-membership operations of the GitHub REST API.
#[async_trait]
pub trait TeamsApi: Send + Sync {
    /// Creates a team in `org`.
    async fn create_team(&self, org: &OrgName, team: &TeamRequest) -> Result<Team, ApiError>;

    /// Fetches a team, sending `if_none_match` as a precondition when present.
    async fn get_team(
        &self,
        id: TeamId,
        if_none_match: Option<&ETag>,
    ) -> Result<Conditional<Team>, ApiError>;

    /// Replaces a team's editable settings with those of `team`.
    async fn edit_team(&self, id: TeamId, team: &Team) -> Result<Team, ApiError>;

    /// Deletes a team.
    async fn delete_team(&self, id: TeamId) -> Result<(), ApiError>;

    /// Adds `username` to a team (or updates a pending invitation) with `role`.
    async fn add_team_membership(
        &self,
        team_id: TeamId,
        username: &str,
        role: TeamRole,
    ) -> Result<Membership, ApiError>;

    /// Fetches a membership, sending `if_none_match` as a precondition when present.
    async fn get_team_membership(
        &self,
        team_id: TeamId,
        username: &str,
        if_none_match: Option<&ETag>,
    ) -> Result<Conditional<Membership>, ApiError>;

    /// Removes `username` from a team.
    async fn remove_team_membership(&self, team_id: TeamId, username: &str) -> Result<(), ApiError>;
}
