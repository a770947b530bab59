//! CLI configuration.
//!
//! Settings come from an optional TOML file and are overridden by command-line
//! flags (which clap also fills from environment variables). The file is
//! looked up at `--config`, or at [`DEFAULT_CONFIG_PATH`] when that exists.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context};
use github::{ClientConfig, GithubClient};
use provider::{OrgName, Provider};
use serde::Deserialize;

/// Config file consulted when `--config` is not given.
pub const DEFAULT_CONFIG_PATH: &str = ".gh-teams/config.toml";

/// State file used when none is configured.
pub const DEFAULT_STATE_PATH: &str = "gh-teams.state.json";

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable, multi-line.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

/// `[logging]` table of the config file.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingSection {
    pub level: Option<String>,
    pub format: Option<LogFormat>,
    pub otlp_endpoint: Option<String>,
}

/// Contents of the TOML config file.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub organization: Option<String>,
    pub token: Option<String>,
    pub base_url: Option<String>,
    pub state: Option<PathBuf>,
    pub logging: LoggingSection,
}

impl FileConfig {
    /// Parses a config document.
    pub fn from_toml(text: &str) -> anyhow::Result<Self> {
        toml::from_str(text).context("invalid config file")
    }

    /// Loads `explicit`, or the default path if it exists, or an empty config.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        let path = match explicit {
            Some(path) => path,
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => Path::new(DEFAULT_CONFIG_PATH),
            None => return Ok(Self::default()),
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("in {}", path.display()))
    }
}

/// Values given on the command line or through the environment.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub organization: Option<String>,
    pub token: Option<String>,
    pub base_url: Option<String>,
    pub state: Option<PathBuf>,
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
    pub otlp_endpoint: Option<String>,
}

/// Resolved logging settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub level: String,
    pub format: LogFormat,
    /// OTLP/gRPC collector; tracing spans are exported only when set.
    pub otlp_endpoint: Option<String>,
}

/// Fully resolved settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub organization: Option<String>,
    pub client: ClientConfig,
    pub state_path: PathBuf,
    pub logging: LoggingConfig,
}

impl Settings {
    /// Merges file values with overrides; overrides win.
    pub fn resolve(file: FileConfig, overrides: Overrides) -> Self {
        let mut client = ClientConfig::default();
        if let Some(base_url) = overrides.base_url.or(file.base_url) {
            client.base_url = base_url;
        }
        client.token = overrides.token.or(file.token);

        Self {
            organization: overrides.organization.or(file.organization),
            client,
            state_path: overrides
                .state
                .or(file.state)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_PATH)),
            logging: LoggingConfig {
                level: overrides
                    .log_level
                    .or(file.logging.level)
                    .unwrap_or_else(|| "info".to_string()),
                format: overrides
                    .log_format
                    .or(file.logging.format)
                    .unwrap_or_default(),
                otlp_endpoint: overrides.otlp_endpoint.or(file.logging.otlp_endpoint),
            },
        }
    }

    /// Builds the GitHub client and the resource registry.
    ///
    /// Only commands that talk to GitHub call this, so `schema` and `list`
    /// work without credentials.
    pub fn connect(&self) -> anyhow::Result<Provider> {
        let Some(org) = self.organization.as_deref().and_then(OrgName::new) else {
            bail!("no GitHub organization configured; pass --org or set GITHUB_ORGANIZATION");
        };
        if self.client.token.as_deref().unwrap_or("").is_empty() {
            bail!("no GitHub token configured; pass --token or set GITHUB_TOKEN");
        }
        let client = GithubClient::new(&self.client).context("building GitHub client")?;
        Ok(Provider::new(Arc::new(client), org))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
organization = "acme"
token = "from-file"
state = "state/teams.json"

[logging]
level = "debug"
format = "json"
"#;

    #[test]
    fn file_values_apply_when_not_overridden() {
        let settings = Settings::resolve(FileConfig::from_toml(SAMPLE).unwrap(), Overrides::default());
        assert_eq!(settings.organization.as_deref(), Some("acme"));
        assert_eq!(settings.client.token.as_deref(), Some("from-file"));
        assert_eq!(settings.client.base_url, github::DEFAULT_BASE_URL);
        assert_eq!(settings.state_path, PathBuf::from("state/teams.json"));
        assert_eq!(settings.logging.level, "debug");
        assert_eq!(settings.logging.format, LogFormat::Json);
        assert_eq!(settings.logging.otlp_endpoint, None);
    }

    #[test]
    fn overrides_win_over_file_values() {
        let overrides = Overrides {
            organization: Some("other".into()),
            token: Some("from-env".into()),
            base_url: Some("https://ghe.example.com/api/v3".into()),
            log_format: Some(LogFormat::Pretty),
            ..Overrides::default()
        };
        let settings = Settings::resolve(FileConfig::from_toml(SAMPLE).unwrap(), overrides);
        assert_eq!(settings.organization.as_deref(), Some("other"));
        assert_eq!(settings.client.token.as_deref(), Some("from-env"));
        assert_eq!(settings.client.base_url, "https://ghe.example.com/api/v3");
        assert_eq!(settings.logging.format, LogFormat::Pretty);
        assert_eq!(settings.logging.level, "debug");
    }

    #[test]
    fn defaults_apply_without_any_config() {
        let settings = Settings::resolve(FileConfig::default(), Overrides::default());
        assert_eq!(settings.state_path, PathBuf::from(DEFAULT_STATE_PATH));
        assert_eq!(settings.logging.level, "info");
        assert_eq!(settings.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(FileConfig::from_toml("organisation = \"typo\"").is_err());
    }

    #[test]
    fn connect_requires_organization_and_token() {
        let missing_org = Settings::resolve(FileConfig::default(), Overrides::default());
        assert!(missing_org.connect().is_err());

        let missing_token = Settings::resolve(
            FileConfig::default(),
            Overrides {
                organization: Some("acme".into()),
                ..Overrides::default()
            },
        );
        let err = missing_token.connect().err().unwrap();
        assert!(err.to_string().contains("token"));

        let complete = Settings::resolve(
            FileConfig::default(),
            Overrides {
                organization: Some("acme".into()),
                token: Some("t".into()),
                ..Overrides::default()
            },
        );
        assert!(complete.connect().is_ok());
    }

    #[test]
    fn load_reads_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, SAMPLE).unwrap();
        let file = FileConfig::load(Some(&path)).unwrap();
        assert_eq!(file.organization.as_deref(), Some("acme"));
        assert!(FileConfig::load(Some(&dir.path().join("missing.toml"))).is_err());
    }
}
