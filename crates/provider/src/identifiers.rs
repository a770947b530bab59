//! Newtype identifiers and the string encodings used by the declarative layer.
//!
//! The declarative record stores every value as text. Remote team ids are
//! numeric, so [`TeamId`] is the only place where the decimal encoding is
//! produced ([`std::fmt::Display`]) or consumed ([`TeamId::parse`]). Handlers
//! convert at their edges and work with the native type in between.
//!
//! Memberships have no single natural key; [`MembershipId`] joins the team id
//! and username with [`TWO_PART_ID_DELIMITER`].

use serde::{Deserialize, Serialize};

use crate::errors::ProviderError;

/// Delimiter joining the two halves of a composite identifier.
pub const TWO_PART_ID_DELIMITER: char = ':';

/// Longest login GitHub accepts.
const MAX_LOGIN_LEN: usize = 39;

/// Returns `true` if `login` is a well-formed GitHub user login.
///
/// Logins use ASCII letters, digits, and hyphens, and do not start with a
/// hyphen.
pub fn is_valid_login(login: &str) -> bool {
    !login.is_empty()
        && login.len() <= MAX_LOGIN_LEN
        && !login.starts_with('-')
        && login.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
}

// ---------------------------------------------------------------------------
// Macro for String-wrapped newtypes.
// Generates: struct, new() returning Option<Self>, as_str(), Display.
// ---------------------------------------------------------------------------
macro_rules! string_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            /// Creates a new value, returning `None` if it is empty.
            pub fn new(value: impl Into<String>) -> Option<Self> {
                let v = value.into();
                if v.is_empty() { None } else { Some(Self(v)) }
            }

            /// Returns the value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

string_id! {
    /// Login of the GitHub organization that owns the managed teams.
    OrgName
}

string_id! {
    /// Opaque version token returned by GitHub in the `ETag` header.
    ///
    /// Sent back as `If-None-Match` to turn a read into a conditional GET.
    ETag
}

// ---------------------------------------------------------------------------
// Team id
// ---------------------------------------------------------------------------

/// Numeric identifier GitHub assigns to a team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamId(u64);

impl TeamId {
    /// Creates a new identifier from a raw integer.
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the underlying integer value.
    pub fn as_u64(self) -> u64 {
        self.0
    }

    /// Decodes the decimal form stored in a declarative record.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::InvalidId`] unless `value` is exactly the
    /// form [`std::fmt::Display`] produces: ASCII digits with no sign,
    /// whitespace, or leading zero.
    pub fn parse(value: &str) -> Result<Self, ProviderError> {
        let invalid = |message: String| ProviderError::InvalidId {
            id: value.to_string(),
            message,
        };
        if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid("expected a numeric team id".to_string()));
        }
        if value.len() > 1 && value.starts_with('0') {
            return Err(invalid("team id must not have leading zeros".to_string()));
        }
        value
            .parse::<u64>()
            .map(Self)
            .map_err(|e| invalid(format!("expected a numeric team id: {e}")))
    }
}

impl std::fmt::Display for TeamId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Composite ids
// ---------------------------------------------------------------------------

/// Joins two key parts into a single composite identifier.
pub fn build_two_part_id(first: &str, second: &str) -> String {
    format!("{first}{TWO_PART_ID_DELIMITER}{second}")
}

/// Splits a composite identifier produced by [`build_two_part_id`].
///
/// # Errors
///
/// Returns [`ProviderError::InvalidId`] unless `id` contains exactly one
/// delimiter.
pub fn parse_two_part_id(id: &str) -> Result<(String, String), ProviderError> {
    let mut parts = id.split(TWO_PART_ID_DELIMITER);
    match (parts.next(), parts.next(), parts.next()) {
        (Some(first), Some(second), None) => Ok((first.to_string(), second.to_string())),
        _ => Err(ProviderError::InvalidId {
            id: id.to_string(),
            message: format!("expected exactly two parts separated by '{TWO_PART_ID_DELIMITER}'"),
        }),
    }
}

/// Identity of a team membership: the (team, user) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MembershipId {
    /// Decimal team id, as stored in the `team_id` attribute.
    pub team_id: String,
    /// GitHub login of the member.
    pub username: String,
}

impl MembershipId {
    /// Creates a membership id.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::InvalidId`] if either part contains
    /// [`TWO_PART_ID_DELIMITER`], or if `username` is not a valid GitHub
    /// login (see [`is_valid_login`]).
    pub fn new(team_id: impl Into<String>, username: impl Into<String>) -> Result<Self, ProviderError> {
        let team_id = team_id.into();
        let username = username.into();
        for part in [&team_id, &username] {
            if part.contains(TWO_PART_ID_DELIMITER) {
                return Err(ProviderError::InvalidId {
                    id: part.clone(),
                    message: format!("must not contain '{TWO_PART_ID_DELIMITER}'"),
                });
            }
        }
        if !is_valid_login(&username) {
            return Err(ProviderError::InvalidId {
                id: username,
                message: "not a GitHub login (letters, digits and '-')".to_string(),
            });
        }
        Ok(Self { team_id, username })
    }

    /// Decodes a composite id string.
    ///
    /// # Errors
    ///
    /// See [`parse_two_part_id`] and [`MembershipId::new`].
    pub fn parse(id: &str) -> Result<Self, ProviderError> {
        let (team_id, username) = parse_two_part_id(id)?;
        Self::new(team_id, username)
    }

    /// Decodes the numeric team id half.
    ///
    /// # Errors
    ///
    /// See [`TeamId::parse`].
    pub fn team(&self) -> Result<TeamId, ProviderError> {
        TeamId::parse(&self.team_id)
    }
}

impl std::fmt::Display for MembershipId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&build_two_part_id(&self.team_id, &self.username))
    }
}
