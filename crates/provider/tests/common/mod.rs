//! In-memory `TeamsApi` used by the handler tests.
//!
//! Every stored entity carries a version; its ETag is derived from that
//! version, so any server-side change invalidates previously issued ETags.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use provider::{
    ApiError, Conditional, ETag, Membership, OrgName, Team, TeamId, TeamRequest, TeamRole,
    TeamsApi,
};

#[derive(Default)]
struct State {
    next_id: u64,
    teams: BTreeMap<u64, (Team, u64)>,
    memberships: BTreeMap<(u64, String), (Membership, u64)>,
    calls: Vec<String>,
    failures: BTreeMap<&'static str, ApiError>,
}

/// A GitHub stand-in that keeps teams and memberships in memory.
pub struct FakeTeamsApi {
    state: Mutex<State>,
}

impl FakeTeamsApi {
    /// Creates an empty fake; the first created team gets `first_id`.
    pub fn starting_at(first_id: u64) -> Self {
        Self {
            state: Mutex::new(State {
                next_id: first_id,
                ..State::default()
            }),
        }
    }

    /// Every call made so far, as `operation` or `operation:detail`.
    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Makes every subsequent call to `operation` fail with `error`.
    pub fn fail(&self, operation: &'static str, error: ApiError) {
        self.state.lock().unwrap().failures.insert(operation, error);
    }

    /// Returns the team as the server currently sees it.
    pub fn team(&self, id: u64) -> Option<Team> {
        self.state.lock().unwrap().teams.get(&id).map(|(t, _)| t.clone())
    }

    /// Returns the membership as the server currently sees it.
    pub fn membership(&self, team: u64, user: &str) -> Option<Membership> {
        self.state
            .lock()
            .unwrap()
            .memberships
            .get(&(team, user.to_string()))
            .map(|(m, _)| m.clone())
    }

    /// Simulates someone editing the team outside of the provider.
    pub fn rename_out_of_band(&self, id: u64, name: &str) {
        let mut state = self.state.lock().unwrap();
        if let Some((team, version)) = state.teams.get_mut(&id) {
            team.name = name.to_string();
            *version += 1;
        }
    }

    /// Simulates someone deleting the team outside of the provider.
    pub fn delete_out_of_band(&self, id: u64) {
        let mut state = self.state.lock().unwrap();
        state.teams.remove(&id);
        state.memberships.retain(|(team, _), _| *team != id);
    }

    /// Simulates a role change made outside of the provider.
    pub fn change_role_out_of_band(&self, team: u64, user: &str, role: TeamRole) {
        let mut state = self.state.lock().unwrap();
        if let Some((membership, version)) = state.memberships.get_mut(&(team, user.to_string())) {
            membership.role = role;
            *version += 1;
        }
    }

    /// Replaces the URL the server reports for a membership.
    pub fn set_membership_url(&self, team: u64, user: &str, url: &str) {
        let mut state = self.state.lock().unwrap();
        if let Some((membership, version)) = state.memberships.get_mut(&(team, user.to_string())) {
            membership.url = url.to_string();
            *version += 1;
        }
    }

    fn begin(state: &mut State, operation: &'static str, detail: String) -> Result<(), ApiError> {
        state.calls.push(if detail.is_empty() {
            operation.to_string()
        } else {
            format!("{operation}:{detail}")
        });
        match state.failures.get(operation) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

fn team_etag(id: u64, version: u64) -> ETag {
    ETag::new(format!("\"team-{id}-v{version}\"")).expect("non-empty etag")
}

fn membership_etag(team: u64, user: &str, version: u64) -> ETag {
    ETag::new(format!("\"membership-{team}-{user}-v{version}\"")).expect("non-empty etag")
}

fn precondition(etag: Option<&ETag>) -> String {
    etag.map(|e| e.to_string()).unwrap_or_else(|| "none".to_string())
}

#[async_trait]
impl TeamsApi for FakeTeamsApi {
    async fn create_team(&self, org: &OrgName, request: &TeamRequest) -> Result<Team, ApiError> {
        let mut state = self.state.lock().unwrap();
        Self::begin(&mut state, "create_team", org.to_string())?;
        let id = state.next_id;
        state.next_id += 1;
        let team = Team {
            id: TeamId::new(id),
            name: request.name.clone(),
            description: if request.description.is_empty() {
                None
            } else {
                Some(request.description.clone())
            },
            privacy: Some(request.privacy),
        };
        state.teams.insert(id, (team.clone(), 1));
        Ok(team)
    }

    async fn get_team(
        &self,
        id: TeamId,
        if_none_match: Option<&ETag>,
    ) -> Result<Conditional<Team>, ApiError> {
        let mut state = self.state.lock().unwrap();
        Self::begin(&mut state, "get_team", format!("{id}:{}", precondition(if_none_match)))?;
        let (team, version) = state
            .teams
            .get(&id.as_u64())
            .cloned()
            .ok_or_else(|| ApiError::NotFound {
                resource: format!("/teams/{id}"),
            })?;
        let etag = team_etag(id.as_u64(), version);
        if if_none_match == Some(&etag) {
            return Ok(Conditional::NotModified { etag: Some(etag) });
        }
        Ok(Conditional::Modified {
            value: team,
            etag: Some(etag),
        })
    }

    async fn edit_team(&self, id: TeamId, team: &Team) -> Result<Team, ApiError> {
        let mut state = self.state.lock().unwrap();
        Self::begin(&mut state, "edit_team", id.to_string())?;
        let (stored, version) = state
            .teams
            .get_mut(&id.as_u64())
            .ok_or_else(|| ApiError::NotFound {
                resource: format!("/teams/{id}"),
            })?;
        let request = team.to_request();
        stored.name = request.name;
        stored.description = Some(request.description);
        stored.privacy = Some(request.privacy);
        *version += 1;
        Ok(stored.clone())
    }

    async fn delete_team(&self, id: TeamId) -> Result<(), ApiError> {
        let mut state = self.state.lock().unwrap();
        Self::begin(&mut state, "delete_team", id.to_string())?;
        state
            .teams
            .remove(&id.as_u64())
            .map(|_| ())
            .ok_or_else(|| ApiError::NotFound {
                resource: format!("/teams/{id}"),
            })
    }

    async fn add_team_membership(
        &self,
        team_id: TeamId,
        username: &str,
        role: TeamRole,
    ) -> Result<Membership, ApiError> {
        let mut state = self.state.lock().unwrap();
        Self::begin(&mut state, "add_team_membership", format!("{team_id}:{username}:{role}"))?;
        if !state.teams.contains_key(&team_id.as_u64()) {
            return Err(ApiError::NotFound {
                resource: format!("/teams/{team_id}"),
            });
        }
        let membership = Membership {
            url: format!("https://api.github.com/teams/{team_id}/memberships/{username}"),
            role,
            state: Some("active".to_string()),
        };
        state
            .memberships
            .insert((team_id.as_u64(), username.to_string()), (membership.clone(), 1));
        Ok(membership)
    }

    async fn get_team_membership(
        &self,
        team_id: TeamId,
        username: &str,
        if_none_match: Option<&ETag>,
    ) -> Result<Conditional<Membership>, ApiError> {
        let mut state = self.state.lock().unwrap();
        Self::begin(
            &mut state,
            "get_team_membership",
            format!("{team_id}:{username}:{}", precondition(if_none_match)),
        )?;
        let (membership, version) = state
            .memberships
            .get(&(team_id.as_u64(), username.to_string()))
            .cloned()
            .ok_or_else(|| ApiError::NotFound {
                resource: format!("/teams/{team_id}/memberships/{username}"),
            })?;
        let etag = membership_etag(team_id.as_u64(), username, version);
        if if_none_match == Some(&etag) {
            return Ok(Conditional::NotModified { etag: Some(etag) });
        }
        Ok(Conditional::Modified {
            value: membership,
            etag: Some(etag),
        })
    }

    async fn remove_team_membership(&self, team_id: TeamId, username: &str) -> Result<(), ApiError> {
        let mut state = self.state.lock().unwrap();
        Self::begin(&mut state, "remove_team_membership", format!("{team_id}:{username}"))?;
        state
            .memberships
            .remove(&(team_id.as_u64(), username.to_string()))
            .map(|_| ())
            .ok_or_else(|| ApiError::NotFound {
                resource: format!("/teams/{team_id}/memberships/{username}"),
            })
    }
}
