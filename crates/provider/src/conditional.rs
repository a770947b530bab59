//! Conditional-fetch helper shared by the resource handlers.
//!
//! A read sends the ETag stored in the record as `If-None-Match`. The answer
//! is one of:
//!
//! 1. *Not modified*: the stored fields are still accurate; the entity is
//!    rebuilt from them.
//! 2. *Fresh*: the server's representation and its new ETag are returned.
//! 3. *Error*: propagated. Read callbacks treat it as "resource gone".

use tracing::debug;

use crate::api::TeamsApi;
use crate::errors::ApiError;
use crate::identifiers::{ETag, TeamId};
use crate::record::ResourceData;
use crate::types::{Conditional, Membership, Team};

/// Record attribute holding the last seen ETag.
pub const ETAG_ATTRIBUTE: &str = "etag";

/// An entity obtained through a conditional fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fetched<T> {
    /// The fresh or reconstructed entity.
    pub value: T,
    /// The ETag to store alongside it.
    pub etag: Option<ETag>,
    /// `true` when `value` was rebuilt from local state after a 304.
    pub cached: bool,
}

/// Returns the ETag stored in the record, if any.
pub fn stored_etag(d: &ResourceData) -> Option<ETag> {
    ETag::new(d.get(ETAG_ATTRIBUTE))
}

/// Turns a conditional response into an entity.
///
/// On a 304 the entity comes from `reconstruct`, and the stored ETag is kept
/// unless the server echoed a new one.
pub fn resolve<T>(
    response: Conditional<T>,
    stored: Option<ETag>,
    reconstruct: impl FnOnce() -> T,
) -> Fetched<T> {
    match response {
        Conditional::NotModified { etag } => Fetched {
            value: reconstruct(),
            etag: etag.or(stored),
            cached: true,
        },
        Conditional::Modified { value, etag } => Fetched {
            value,
            etag,
            cached: false,
        },
    }
}

/// Rebuilds a team from the fields stored in its record.
pub fn team_from_record(id: TeamId, d: &ResourceData) -> Team {
    Team {
        id,
        name: d.get("name").to_string(),
        description: Some(d.get("description").to_string()),
        privacy: d.get("privacy").parse().ok(),
    }
}

/// Fetches a team, reusing the record's fields when the server reports 304.
///
/// # Errors
///
/// Propagates any [`ApiError`] from the remote call, including not-found.
pub async fn fetch_team(
    api: &dyn TeamsApi,
    id: TeamId,
    d: &ResourceData,
) -> Result<Fetched<Team>, ApiError> {
    let stored = stored_etag(d);
    let response = api.get_team(id, stored.as_ref()).await?;
    Ok(resolve(response, stored, || team_from_record(id, d)))
}

/// Fetches a membership with the record's ETag as precondition.
///
/// Memberships are never reconstructed: on a 304 the caller leaves the record
/// untouched.
///
/// # Errors
///
/// Propagates any [`ApiError`] from the remote call, including not-found.
pub async fn fetch_membership(
    api: &dyn TeamsApi,
    team_id: TeamId,
    username: &str,
    d: &ResourceData,
) -> Result<Conditional<Membership>, ApiError> {
    let stored = stored_etag(d);
    let response = api
        .get_team_membership(team_id, username, stored.as_ref())
        .await?;
    if response.is_not_modified() {
        debug!(team_id = %team_id, username, "Membership not modified");
    }
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Privacy;

    fn record() -> ResourceData {
        ResourceData::with_id("5")
            .attr("name", "infra")
            .attr("description", "ops")
            .attr("privacy", "closed")
            .attr("etag", "\"e1\"")
    }

    #[test]
    fn not_modified_rebuilds_from_stored_fields() {
        let d = record();
        let fetched = resolve(
            Conditional::NotModified { etag: None },
            stored_etag(&d),
            || team_from_record(TeamId::new(5), &d),
        );
        assert!(fetched.cached);
        assert_eq!(fetched.etag, ETag::new("\"e1\""));
        assert_eq!(fetched.value.name, "infra");
        assert_eq!(fetched.value.description.as_deref(), Some("ops"));
        assert_eq!(fetched.value.privacy, Some(Privacy::Closed));
    }

    #[test]
    fn modified_returns_server_value_and_new_etag() {
        let server = Team {
            id: TeamId::new(5),
            name: "platform".into(),
            description: None,
            privacy: Some(Privacy::Secret),
        };
        let fetched = resolve(
            Conditional::Modified {
                value: server.clone(),
                etag: ETag::new("\"e2\""),
            },
            ETag::new("\"e1\""),
            || unreachable!("fresh responses are never reconstructed"),
        );
        assert!(!fetched.cached);
        assert_eq!(fetched.value, server);
        assert_eq!(fetched.etag, ETag::new("\"e2\""));
    }

    #[test]
    fn empty_stored_etag_sends_no_precondition() {
        assert_eq!(stored_etag(&ResourceData::new()), None);
    }
}
