//! gh-teams CLI entry point.
//!
//! This binary is the composition root for the workspace. Responsibilities:
//!
//! 1. **Parse configuration**: load `.gh-teams/config.toml` (or `--config`)
//!    and apply command-line and environment overrides.
//! 2. **Wire observability**: configure `tracing-subscriber` with a pretty or
//!    JSON layer and, when an endpoint is configured, an OpenTelemetry OTLP
//!    exporter. All `tracing` spans emitted by every crate flow through it.
//! 3. **Construct infrastructure**: create the [`github::GithubClient`] and
//!    inject it into the [`provider::Provider`] registry.
//! 4. **Drive one lifecycle callback**: `create`, `read`, `update`, `delete`,
//!    or `import` a resource at an address, persisting the resulting record to
//!    the JSON state file.

mod config;
mod state;
mod telemetry;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use provider::{
    AttributeKind, Resource, ResourceData, ResourceSchema, MEMBERSHIP_SCHEMA, TEAM_SCHEMA,
};
use tracing::{info, warn};

use crate::config::{FileConfig, LogFormat, Overrides, Settings};
use crate::state::{Address, StateFile};

/// Manage GitHub teams and team memberships declaratively.
#[derive(Debug, Parser)]
#[command(name = "gh-teams", version, about)]
struct Cli {
    /// Config file (default: .gh-teams/config.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// GitHub organization that owns the teams.
    #[arg(long = "org", env = "GITHUB_ORGANIZATION", global = true)]
    organization: Option<String>,

    /// GitHub API token.
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true, global = true)]
    token: Option<String>,

    /// GitHub API root, e.g. a GitHub Enterprise `/api/v3` URL.
    #[arg(long, env = "GITHUB_BASE_URL", global = true)]
    base_url: Option<String>,

    /// JSON state file holding resource records.
    #[arg(long, global = true)]
    state: Option<PathBuf>,

    /// Log filter directive used when RUST_LOG is unset.
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[arg(long, value_enum, global = true)]
    log_format: Option<LogFormat>,

    /// OTLP/gRPC collector to export spans to.
    #[arg(long, env = "OTEL_EXPORTER_OTLP_ENDPOINT", global = true)]
    otlp_endpoint: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create the remote entity for a new address.
    Create {
        /// `<resource_type>.<name>`
        address: Address,
        /// Attribute assignment `key=value`; repeatable.
        #[arg(long = "set", value_parser = parse_assignment)]
        set: Vec<(String, String)>,
    },
    /// Refresh a record from GitHub.
    Read { address: Address },
    /// Change attributes of an existing record.
    Update {
        address: Address,
        #[arg(long = "set", value_parser = parse_assignment)]
        set: Vec<(String, String)>,
    },
    /// Delete the remote entity and forget the record.
    Delete { address: Address },
    /// Adopt an existing remote entity by its identifier.
    Import {
        address: Address,
        /// Team id, or `team_id:username` for memberships.
        id: String,
    },
    /// Print the attribute schema of a resource type.
    Schema { resource_type: String },
    /// List addresses in the state file.
    List,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            organization: self.organization.clone(),
            token: self.token.clone(),
            base_url: self.base_url.clone(),
            state: self.state.clone(),
            log_level: self.log_level.clone(),
            log_format: self.log_format,
            otlp_endpoint: self.otlp_endpoint.clone(),
        }
    }
}

fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got '{raw}'")),
    }
}

fn schema_for(type_name: &str) -> anyhow::Result<&'static ResourceSchema> {
    [&TEAM_SCHEMA, &MEMBERSHIP_SCHEMA]
        .into_iter()
        .find(|schema| schema.type_name == type_name)
        .with_context(|| format!("unknown resource type '{type_name}'"))
}

/// Copies the user-settable attributes of `d` into a fresh record.
fn replacement_record(schema: &ResourceSchema, d: &ResourceData) -> ResourceData {
    let mut fresh = ResourceData::new();
    for (key, value) in d.attributes() {
        let computed = schema
            .attribute(key)
            .is_some_and(|attribute| attribute.kind == AttributeKind::Computed);
        if !computed {
            fresh.set(key, value);
        }
    }
    fresh
}

fn print_record(d: &ResourceData) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(d)?);
    Ok(())
}

fn print_schema(schema: &ResourceSchema) {
    println!("{}", schema.type_name);
    for attribute in schema.attributes {
        let kind = match attribute.kind {
            AttributeKind::Required => "required".to_string(),
            AttributeKind::Optional { default: Some(d) } => format!("optional, default \"{d}\""),
            AttributeKind::Optional { default: None } => "optional".to_string(),
            AttributeKind::Computed => "computed".to_string(),
        };
        let mut line = format!("  {:<12} {kind}", attribute.name);
        if attribute.force_new {
            line.push_str(", forces replacement");
        }
        if let Some(allowed) = attribute.allowed {
            line.push_str(&format!(", one of [{}]", allowed.join(", ")));
        }
        println!("{line}");
    }
}

async fn run(command: Command, settings: &Settings) -> anyhow::Result<()> {
    let mut state = StateFile::load(&settings.state_path)?;

    match command {
        Command::Schema { resource_type } => {
            print_schema(schema_for(&resource_type)?);
            return Ok(());
        }
        Command::List => {
            for address in state.addresses() {
                println!("{address}");
            }
            return Ok(());
        }
        Command::Create { address, set } => {
            if state.get(&address).is_some_and(ResourceData::exists) {
                bail!("{address} already exists; use update or delete it first");
            }
            let provider = settings.connect()?;
            let resource = provider.resource(&address.resource_type)?;
            let mut d = ResourceData::new();
            for (key, value) in set {
                d.set(key, value);
            }
            resource.create(&mut d).await?;
            info!(%address, id = d.id(), "Created");
            print_record(&d)?;
            state.insert(&address, d);
        }
        Command::Read { address } => {
            let provider = settings.connect()?;
            let resource = provider.resource(&address.resource_type)?;
            let mut d = stored(&state, &address)?.clone();
            resource.read(&mut d).await?;
            if d.exists() {
                print_record(&d)?;
                state.insert(&address, d);
            } else {
                warn!(%address, "Remote entity is gone; removing it from state");
                state.remove(&address);
            }
        }
        Command::Update { address, set } => {
            let provider = settings.connect()?;
            let resource = provider.resource(&address.resource_type)?;
            let current = stored(&state, &address)?.clone();
            let d = update(
                resource.as_ref(),
                &address,
                current,
                set,
                &mut state,
                &settings.state_path,
            )
            .await?;
            if d.exists() {
                print_record(&d)?;
                state.insert(&address, d);
            } else {
                warn!(%address, "Remote entity is gone; removing it from state");
                state.remove(&address);
            }
        }
        Command::Delete { address } => {
            let provider = settings.connect()?;
            let resource = provider.resource(&address.resource_type)?;
            let mut d = stored(&state, &address)?.clone();
            resource.delete(&mut d).await?;
            info!(%address, "Deleted");
            state.remove(&address);
        }
        Command::Import { address, id } => {
            let provider = settings.connect()?;
            let resource = provider.resource(&address.resource_type)?;
            let mut d = resource.import(&id).await?;
            resource.read(&mut d).await?;
            if !d.exists() {
                bail!("no {} with id '{id}' was found", address.resource_type);
            }
            info!(%address, id = d.id(), "Imported");
            print_record(&d)?;
            state.insert(&address, d);
        }
    }

    state.save(&settings.state_path)
}

fn stored<'a>(state: &'a StateFile, address: &Address) -> anyhow::Result<&'a ResourceData> {
    state
        .get(address)
        .with_context(|| format!("{address} is not in the state file"))
}

/// Applies `set` to a stored record, in place when the resource type allows
/// it and by delete + create otherwise.
///
/// During a replacement the record leaves `state` (and the file at
/// `state_path`) as soon as the delete succeeds, so a failed create leaves
/// no entry pointing at the deleted entity.
async fn update(
    resource: &dyn Resource,
    address: &Address,
    current: ResourceData,
    set: Vec<(String, String)>,
    state: &mut StateFile,
    state_path: &Path,
) -> anyhow::Result<ResourceData> {
    let mut d = current.clone();
    for (key, value) in set {
        d.set(key, value);
    }

    if resource.supports_update() {
        resource.update(&mut d).await?;
        return Ok(d);
    }

    if d == current {
        return Ok(d);
    }
    info!(%address, "Attributes force replacement");
    let mut replacement = replacement_record(resource.schema(), &d);
    let mut old = current;
    resource.delete(&mut old).await?;
    state.remove(address);
    state.save(state_path)?;

    resource.create(&mut replacement).await.with_context(|| {
        format!("{address} was deleted but could not be re-created; it is no longer in the state file")
    })?;
    Ok(replacement)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let file = FileConfig::load(cli.config.as_deref())?;
    let settings = Settings::resolve(file, cli.overrides());
    let telemetry = telemetry::init(&settings.logging)?;

    let result = run(cli.command, &settings).await;
    if let Err(err) = &result {
        tracing::error!(error = %err, "Command failed");
    }

    telemetry.shutdown();
    result
}
