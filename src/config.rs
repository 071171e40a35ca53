use std::fs;
use std::path::PathBuf;

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

use crate::domain::{OrganismInput, OrganismRequest, collect_requests};
use crate::error::G2koError;
use crate::kegg::KeggSettings;

pub const DEFAULT_CONFIG_FILE: &str = "g2ko.json";
pub const DEFAULT_OUTPUT_FILE: &str = "g2ko_output.txt";

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub schema_version: Option<u32>,
    #[serde(default)]
    pub organisms: Vec<OrganismEntry>,
    #[serde(default)]
    pub include_functions: Option<bool>,
    #[serde(default)]
    pub output: Option<String>,
    #[serde(default)]
    pub kegg: Option<KeggSettings>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(untagged)]
pub enum OrganismEntry {
    Shorthand(String),
    Detailed(OrganismEntryObject),
}

#[derive(Debug, Deserialize, Serialize)]
pub struct OrganismEntryObject {
    pub code: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub schema_version: u32,
    pub organisms: Vec<OrganismRequest>,
    pub include_functions: bool,
    pub output: Utf8PathBuf,
    pub kegg: KeggSettings,
}

pub struct ConfigLoader;

impl ConfigLoader {
    pub fn resolve(path: Option<&str>) -> Result<ResolvedConfig, G2koError> {
        let config_path = match path {
            Some(path) => PathBuf::from(path),
            None => PathBuf::from(DEFAULT_CONFIG_FILE),
        };

        if path.is_none() && !config_path.exists() {
            return Err(G2koError::MissingConfig);
        }

        let content = fs::read_to_string(&config_path)
            .map_err(|_| G2koError::ConfigRead(config_path.clone()))?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|err| G2koError::ConfigParse(err.to_string()))?;

        Self::resolve_config(config)
    }

    pub fn resolve_config(config: Config) -> Result<ResolvedConfig, G2koError> {
        let schema_version = config.schema_version.unwrap_or(1);

        let rows = config
            .organisms
            .into_iter()
            .map(|entry| match entry {
                OrganismEntry::Shorthand(code) => OrganismInput::new(code, None),
                OrganismEntry::Detailed(obj) => OrganismInput::new(obj.code, obj.name),
            })
            .collect::<Vec<_>>();
        let organisms = collect_requests(&rows)?;

        let kegg = config.kegg.unwrap_or_default().bounded();
        if !kegg.base_url.starts_with("https://") {
            return Err(G2koError::ConfigParse(format!(
                "kegg.base_url must use https: {}",
                kegg.base_url
            )));
        }

        Ok(ResolvedConfig {
            schema_version,
            organisms,
            include_functions: config.include_functions.unwrap_or(true),
            output: Utf8PathBuf::from(
                config
                    .output
                    .unwrap_or_else(|| DEFAULT_OUTPUT_FILE.to_string()),
            ),
            kegg,
        })
    }
}

impl ResolvedConfig {
    /// Organisms listed in the config, or `None` when the list is empty so
    /// the caller can ask for them instead.
    pub fn requests(&self) -> Option<&[OrganismRequest]> {
        (!self.organisms.is_empty()).then_some(self.organisms.as_slice())
    }
}
