//! `github_team`: lifecycle of a single organization team.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, instrument, warn};

use crate::api::TeamsApi;
use crate::conditional::{fetch_team, team_from_record, ETAG_ATTRIBUTE};
use crate::errors::Result;
use crate::identifiers::{OrgName, TeamId};
use crate::record::ResourceData;
use crate::resource::Resource;
use crate::schema::{Attribute, ResourceSchema};
use crate::types::{Conditional, Privacy, TeamRequest};

/// Attribute declarations for `github_team`.
pub static TEAM_SCHEMA: ResourceSchema = ResourceSchema {
    type_name: "github_team",
    attributes: &[
        Attribute::required("name"),
        Attribute::optional("description", None),
        Attribute::optional("privacy", Some("secret")).one_of(Privacy::VALUES),
        Attribute::computed(ETAG_ATTRIBUTE),
    ],
};

/// Handler for teams owned by one organization.
pub struct TeamResource {
    api: Arc<dyn TeamsApi>,
    org: OrgName,
}

impl TeamResource {
    /// Creates a handler that manages teams of `org` through `api`.
    pub fn new(api: Arc<dyn TeamsApi>, org: OrgName) -> Self {
        Self { api, org }
    }
}

/// Reads the desired team settings out of a validated record.
fn desired_team(d: &ResourceData) -> Result<TeamRequest> {
    Ok(TeamRequest {
        name: d.get("name").to_string(),
        description: d.get("description").to_string(),
        privacy: d.get("privacy").parse()?,
    })
}

#[async_trait]
impl Resource for TeamResource {
    fn schema(&self) -> &'static ResourceSchema {
        &TEAM_SCHEMA
    }

    #[instrument(name = "team_create", skip_all, fields(org = %self.org))]
    async fn create(&self, d: &mut ResourceData) -> Result<()> {
        TEAM_SCHEMA.apply_defaults(d);
        TEAM_SCHEMA.validate(d)?;
        let request = desired_team(d)?;

        let team = self.api.create_team(&self.org, &request).await?;
        info!(team_id = %team.id, name = %team.name, "Created team");
        d.set_id(team.id.to_string());

        self.read(d).await
    }

    #[instrument(name = "team_read", skip_all, fields(id = %d.id()))]
    async fn read(&self, d: &mut ResourceData) -> Result<()> {
        let id = TeamId::parse(d.id())?;

        let fetched = match fetch_team(self.api.as_ref(), id, d).await {
            Ok(fetched) => fetched,
            Err(err) => {
                warn!(team_id = %id, error = %err, "Team could not be read; removing it from state");
                d.clear_id();
                return Ok(());
            }
        };

        if fetched.cached {
            debug!(team_id = %id, "Team not modified; keeping stored fields");
        }
        let team = fetched.value;
        d.set("description", team.description.unwrap_or_default());
        d.set("name", team.name);
        d.set("privacy", team.privacy.unwrap_or_default().as_str());
        d.set(
            ETAG_ATTRIBUTE,
            fetched.etag.map(|e| e.to_string()).unwrap_or_default(),
        );
        Ok(())
    }

    #[instrument(name = "team_update", skip_all, fields(id = %d.id()))]
    async fn update(&self, d: &mut ResourceData) -> Result<()> {
        TEAM_SCHEMA.apply_defaults(d);
        TEAM_SCHEMA.validate(d)?;
        let desired = desired_team(d)?;
        let id = TeamId::parse(d.id())?;

        // Uncached: the edit must start from the server's current object.
        let mut team = match self.api.get_team(id, None).await {
            Ok(Conditional::Modified { value, .. }) => value,
            Ok(Conditional::NotModified { .. }) => team_from_record(id, d),
            Err(err) if err.is_not_found() => {
                warn!(team_id = %id, "Team vanished before update; removing it from state");
                d.clear_id();
                return Ok(());
            }
            Err(err) => return Err(err.into()),
        };
        team.apply(&desired);

        let edited = self.api.edit_team(id, &team).await?;
        info!(team_id = %edited.id, "Updated team");
        d.set_id(edited.id.to_string());

        self.read(d).await
    }

    #[instrument(name = "team_delete", skip_all, fields(id = %d.id()))]
    async fn delete(&self, d: &mut ResourceData) -> Result<()> {
        let id = TeamId::parse(d.id())?;
        self.api.delete_team(id).await?;
        info!(team_id = %id, "Deleted team");
        d.clear_id();
        Ok(())
    }
}
