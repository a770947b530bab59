//! Value types exchanged with the remote API.
//!
//! These mirror the JSON shapes of the GitHub REST API closely enough to be
//! (de)serialised directly by the infrastructure adapter, while using the
//! domain newtypes from [`crate::identifiers`] for anything with identity.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ProviderError;
use crate::identifiers::{ETag, TeamId};

// ---------------------------------------------------------------------------
// Enumerations
// ---------------------------------------------------------------------------

/// Visibility of a team within its organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Privacy {
    /// Visible only to organization owners and team members.
    #[default]
    Secret,
    /// Visible to every member of the organization.
    Closed,
}

impl Privacy {
    /// Every accepted spelling, in declaration order.
    pub const VALUES: &'static [&'static str] = &["secret", "closed"];

    /// Returns the wire/record spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Secret => "secret",
            Self::Closed => "closed",
        }
    }
}

impl FromStr for Privacy {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "secret" => Ok(Self::Secret),
            "closed" => Ok(Self::Closed),
            other => Err(ProviderError::InvalidAttribute {
                attribute: "privacy".to_string(),
                value: other.to_string(),
                message: format!("expected one of {:?}", Self::VALUES),
            }),
        }
    }
}

impl std::fmt::Display for Privacy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role of a user within a team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TeamRole {
    /// Regular team member.
    #[default]
    Member,
    /// Can manage team membership and settings.
    Maintainer,
}

impl TeamRole {
    /// Every accepted spelling, in declaration order.
    pub const VALUES: &'static [&'static str] = &["member", "maintainer"];

    /// Returns the wire/record spelling.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Member => "member",
            Self::Maintainer => "maintainer",
        }
    }
}

impl FromStr for TeamRole {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "member" => Ok(Self::Member),
            "maintainer" => Ok(Self::Maintainer),
            other => Err(ProviderError::InvalidAttribute {
                attribute: "role".to_string(),
                value: other.to_string(),
                message: format!("expected one of {:?}", Self::VALUES),
            }),
        }
    }
}

impl std::fmt::Display for TeamRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Teams
// ---------------------------------------------------------------------------

/// A team as returned by the remote API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    /// Remote-assigned identifier.
    pub id: TeamId,
    /// Display name.
    pub name: String,
    /// Free-form description; GitHub returns `null` when unset.
    #[serde(default)]
    pub description: Option<String>,
    /// Team visibility.
    #[serde(default)]
    pub privacy: Option<Privacy>,
}

impl Team {
    /// Overlays desired settings onto this server-side object.
    pub fn apply(&mut self, desired: &TeamRequest) {
        self.name = desired.name.clone();
        self.description = Some(desired.description.clone());
        self.privacy = Some(desired.privacy);
    }

    /// Builds the request body that would reproduce this team's settings.
    pub fn to_request(&self) -> TeamRequest {
        TeamRequest {
            name: self.name.clone(),
            description: self.description.clone().unwrap_or_default(),
            privacy: self.privacy.unwrap_or_default(),
        }
    }
}

/// Settings sent when creating or editing a team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRequest {
    /// Display name.
    pub name: String,
    /// Description (empty string when unset).
    pub description: String,
    /// Visibility.
    pub privacy: Privacy,
}

// ---------------------------------------------------------------------------
// Memberships
// ---------------------------------------------------------------------------

/// A team membership as returned by the remote API.
///
/// The payload identifies the team and user only through [`Membership::url`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    /// Self-referential API URL of the membership.
    pub url: String,
    /// The member's role in the team.
    pub role: TeamRole,
    /// `active` or `pending` (invitation not yet accepted).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

// ---------------------------------------------------------------------------
// Conditional responses
// ---------------------------------------------------------------------------

/// Outcome of a conditional GET.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Conditional<T> {
    /// The server confirmed the supplied `If-None-Match` value is current (304).
    NotModified {
        /// The `ETag` header echoed by the server, if any.
        etag: Option<ETag>,
    },
    /// The server returned a full representation.
    Modified {
        /// The fetched entity.
        value: T,
        /// The `ETag` header of the response, if any.
        etag: Option<ETag>,
    },
}

impl<T> Conditional<T> {
    /// Returns `true` for a 304 answer.
    pub fn is_not_modified(&self) -> bool {
        matches!(self, Self::NotModified { .. })
    }
}
