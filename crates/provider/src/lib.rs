//! Resource handlers for managing GitHub organization teams declaratively.
//!
//! This crate maps the create/read/update/delete/import callbacks of a
//! declarative infrastructure host onto the GitHub teams API. Each handler
//! reads desired state out of a [`ResourceData`] record, calls the remote API
//! through the [`TeamsApi`] port, and writes the confirmed state (including the
//! response ETag) back into the record.
//!
//! ## Architectural Layer
//!
//! **Domain + port definitions.** This crate has no I/O dependencies. The
//! `github` crate supplies the HTTP implementation of [`TeamsApi`].
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | `TeamId`, `OrgName`, `ETag`, composite `MembershipId` |
//! | [`types`] | API value types (`Team`, `Membership`, `Privacy`, `TeamRole`, `Conditional`) |
//! | [`errors`] | `ApiError`, `ProviderError` |
//! | [`record`] | The declarative record (`ResourceData`) |
//! | [`schema`] | Attribute declarations, defaults, validation |
//! | [`api`] | The `TeamsApi` port |
//! | [`conditional`] | ETag-aware fetch helper |
//! | [`team`], [`membership`] | The two resource handlers |
//! | [`registry`] | Resource type name → handler |

pub mod api;
pub mod conditional;
pub mod errors;
pub mod identifiers;
pub mod membership;
pub mod record;
pub mod registry;
pub mod resource;
pub mod schema;
pub mod team;
pub mod types;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use api::TeamsApi;
pub use errors::{ApiError, ProviderError, Result};
pub use identifiers::{
    build_two_part_id, is_valid_login, parse_two_part_id, ETag, MembershipId, OrgName, TeamId,
    TWO_PART_ID_DELIMITER,
};
pub use membership::{team_and_user_from_url, TeamMembershipResource, MEMBERSHIP_SCHEMA};
pub use record::ResourceData;
pub use registry::Provider;
pub use resource::Resource;
pub use schema::{Attribute, AttributeKind, ResourceSchema};
pub use team::{TeamResource, TEAM_SCHEMA};
pub use types::{Conditional, Membership, Privacy, Team, TeamRequest, TeamRole};
