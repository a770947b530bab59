//! `github_team_membership`: a user's membership in a team.
//!
//! GitHub cannot change a membership in place, so every attribute forces
//! replacement and this handler has no update callback.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, instrument, warn};

use crate::api::TeamsApi;
use crate::conditional::{fetch_membership, ETAG_ATTRIBUTE};
use crate::errors::Result;
use crate::identifiers::MembershipId;
use crate::record::ResourceData;
use crate::resource::Resource;
use crate::schema::{Attribute, ResourceSchema};
use crate::types::{Conditional, TeamRole};

/// Attribute declarations for `github_team_membership`.
pub static MEMBERSHIP_SCHEMA: ResourceSchema = ResourceSchema {
    type_name: "github_team_membership",
    attributes: &[
        Attribute::required("team_id").force_new(),
        Attribute::required("username").force_new(),
        Attribute::optional("role", Some("member"))
            .force_new()
            .one_of(TeamRole::VALUES),
        Attribute::computed(ETAG_ATTRIBUTE),
    ],
};

/// Extracts the team id and username from a membership's API URL.
///
/// The team id is the segment after a `teams` segment and the username the
/// segment after a `memberships` segment. A missing marker (or a marker in
/// last position) leaves the corresponding value empty.
pub fn team_and_user_from_url(url: &str) -> (String, String) {
    let mut team = String::new();
    let mut user = String::new();

    let segments: Vec<&str> = url.split('/').collect();
    for pair in segments.windows(2) {
        match pair[0] {
            "teams" => team = pair[1].to_string(),
            "memberships" => user = pair[1].to_string(),
            _ => {}
        }
    }
    (team, user)
}

/// Handler for team memberships.
pub struct TeamMembershipResource {
    api: Arc<dyn TeamsApi>,
}

impl TeamMembershipResource {
    /// Creates a handler that manages memberships through `api`.
    pub fn new(api: Arc<dyn TeamsApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Resource for TeamMembershipResource {
    fn schema(&self) -> &'static ResourceSchema {
        &MEMBERSHIP_SCHEMA
    }

    #[instrument(name = "team_membership_create", skip_all)]
    async fn create(&self, d: &mut ResourceData) -> Result<()> {
        MEMBERSHIP_SCHEMA.apply_defaults(d);
        MEMBERSHIP_SCHEMA.validate(d)?;
        let id = MembershipId::new(d.get("team_id"), d.get("username"))?;
        let team_id = id.team()?;
        let role: TeamRole = d.get("role").parse()?;

        self.api
            .add_team_membership(team_id, &id.username, role)
            .await?;
        info!(team_id = %team_id, username = %id.username, role = %role, "Added team membership");
        d.set_id(id.to_string());

        self.read(d).await
    }

    #[instrument(name = "team_membership_read", skip_all, fields(id = %d.id()))]
    async fn read(&self, d: &mut ResourceData) -> Result<()> {
        let id = MembershipId::parse(d.id())?;
        let team_id = id.team()?;

        let (membership, etag) =
            match fetch_membership(self.api.as_ref(), team_id, &id.username, d).await {
                Ok(Conditional::NotModified { .. }) => return Ok(()),
                Ok(Conditional::Modified { value, etag }) => (value, etag),
                Err(err) => {
                    warn!(error = %err, "Team membership could not be read; removing it from state");
                    d.clear_id();
                    return Ok(());
                }
            };

        let (team, user) = match team_and_user_from_url(&membership.url) {
            (team, user) if !team.is_empty() && !user.is_empty() => (team, user),
            _ => {
                warn!(
                    url = %membership.url,
                    "Membership URL does not name a team and user; keeping the requested values"
                );
                (id.team_id, id.username)
            }
        };

        d.set("username", user);
        d.set("role", membership.role.as_str());
        d.set("team_id", team);
        d.set(ETAG_ATTRIBUTE, etag.map(|e| e.to_string()).unwrap_or_default());
        Ok(())
    }

    #[instrument(name = "team_membership_delete", skip_all, fields(id = %d.id()))]
    async fn delete(&self, d: &mut ResourceData) -> Result<()> {
        let id = MembershipId::new(d.get("team_id"), d.get("username"))?;
        self.api
            .remove_team_membership(id.team()?, &id.username)
            .await?;
        info!(team_id = %id.team_id, username = %id.username, "Removed team membership");
        d.clear_id();
        Ok(())
    }

    async fn import(&self, id: &str) -> Result<ResourceData> {
        MembershipId::parse(id)?;
        Ok(ResourceData::with_id(id))
    }
}
