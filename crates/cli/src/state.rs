//! JSON state file holding one declarative record per resource address.

use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;

use anyhow::{bail, Context};
use provider::ResourceData;
use serde::{Deserialize, Serialize};

/// `<resource type>.<instance name>`, e.g. `github_team.infra`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Address {
    pub resource_type: String,
    pub name: String,
}

impl FromStr for Address {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('.') {
            Some((resource_type, name)) if !resource_type.is_empty() && !name.is_empty() => {
                Ok(Self {
                    resource_type: resource_type.to_string(),
                    name: name.to_string(),
                })
            }
            _ => bail!("invalid address '{s}': expected <resource_type>.<name>"),
        }
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.resource_type, self.name)
    }
}

/// All records known to the CLI.
#[derive(Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateFile {
    #[serde(default)]
    resources: BTreeMap<String, ResourceData>,
}

impl StateFile {
    /// Reads the state file; a missing file is an empty state.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading state file {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing state file {}", path.display()))
    }

    /// Writes the state file, replacing it atomically.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, serde_json::to_string_pretty(self)?)
            .with_context(|| format!("writing {}", tmp.display()))?;
        std::fs::rename(&tmp, path).with_context(|| format!("replacing {}", path.display()))
    }

    pub fn get(&self, address: &Address) -> Option<&ResourceData> {
        self.resources.get(&address.to_string())
    }

    pub fn insert(&mut self, address: &Address, record: ResourceData) {
        self.resources.insert(address.to_string(), record);
    }

    pub fn remove(&mut self, address: &Address) -> Option<ResourceData> {
        self.resources.remove(&address.to_string())
    }

    pub fn addresses(&self) -> impl Iterator<Item = &str> {
        self.resources.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_parses_type_and_name() {
        let address: Address = "github_team_membership.infra-bob".parse().unwrap();
        assert_eq!(address.resource_type, "github_team_membership");
        assert_eq!(address.name, "infra-bob");
        assert_eq!(address.to_string(), "github_team_membership.infra-bob");
    }

    #[test]
    fn address_requires_both_parts() {
        assert!("github_team".parse::<Address>().is_err());
        assert!(".infra".parse::<Address>().is_err());
        assert!("github_team.".parse::<Address>().is_err());
    }

    #[test]
    fn missing_file_loads_as_empty_state() {
        let dir = tempfile::tempdir().unwrap();
        let state = StateFile::load(&dir.path().join("none.json")).unwrap();
        assert_eq!(state.addresses().count(), 0);
    }

    #[test]
    fn save_then_load_preserves_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("state.json");
        let address: Address = "github_team.infra".parse().unwrap();

        let mut state = StateFile::default();
        state.insert(
            &address,
            ResourceData::with_id("123")
                .attr("name", "infra")
                .attr("etag", "\"e1\""),
        );
        state.save(&path).unwrap();

        let loaded = StateFile::load(&path).unwrap();
        assert_eq!(loaded, state);
        assert_eq!(loaded.get(&address).unwrap().id(), "123");
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn remove_drops_the_record() {
        let address: Address = "github_team.infra".parse().unwrap();
        let mut state = StateFile::default();
        state.insert(&address, ResourceData::with_id("1"));
        assert!(state.remove(&address).is_some());
        assert!(state.get(&address).is_none());
    }
}
