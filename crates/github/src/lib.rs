//! GitHub REST API infrastructure adapter.
//!
//! Implements the [`provider::TeamsApi`] port with [`GithubClient`], a thin
//! `reqwest` wrapper over the team and team-membership endpoints.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** This crate must not contain domain rules. HTTP status
//! mapping, header handling, and JSON decoding live here; the [`provider`]
//! crate sees only [`provider::TeamsApi`] and [`provider::ApiError`].
//!
//! ## Conditional requests
//!
//! `get_team` and `get_team_membership` send the caller's ETag as
//! `If-None-Match` and report a `304 Not Modified` as
//! [`provider::Conditional::NotModified`]. The ETag is never stored on the
//! client.

pub mod client;
pub mod config;
pub mod errors;

pub use client::GithubClient;
pub use config::{ClientConfig, DEFAULT_API_VERSION, DEFAULT_BASE_URL};
pub use errors::ClientError;
