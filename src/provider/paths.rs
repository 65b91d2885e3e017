//! Resource names and endpoints of the Discovery Engine API

use crate::config::ProviderSettings;
use crate::error::ProviderError;
use once_cell::sync::Lazy;
use regex::Regex;

static ID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_-]*$").unwrap());

/// Validated identifiers of one data store and its serving configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataStorePath {
    project: String,
    location: String,
    data_store: String,
    serving_config: String,
}

impl DataStorePath {
    /// Validate identifiers; malformed ones never reach the network
    pub fn new(
        project: &str,
        location: &str,
        data_store: &str,
        serving_config: &str,
    ) -> Result<Self, ProviderError> {
        for (label, value) in [
            ("project id", project),
            ("location", location),
            ("data store id", data_store),
            ("serving config", serving_config),
        ] {
            if !ID_RE.is_match(value) {
                return Err(ProviderError::InvalidConfiguration(format!(
                    "malformed {}: {:?}",
                    label, value
                )));
            }
        }

        Ok(Self {
            project: project.to_string(),
            location: location.to_string(),
            data_store: data_store.to_string(),
            serving_config: serving_config.to_string(),
        })
    }

    pub fn from_settings(settings: &ProviderSettings) -> Result<Self, ProviderError> {
        Self::new(
            &settings.project_id,
            &settings.location,
            &settings.data_store_id,
            &settings.serving_config,
        )
    }

    /// `projects/{project}/locations/{location}/dataStores/{data_store}`
    pub fn data_store(&self) -> String {
        format!(
            "projects/{}/locations/{}/dataStores/{}",
            self.project, self.location, self.data_store
        )
    }

    /// `.../dataStores/{data_store}/servingConfigs/{serving_config}`
    pub fn serving_config(&self) -> String {
        format!("{}/servingConfigs/{}", self.data_store(), self.serving_config)
    }

    pub fn location(&self) -> &str {
        &self.location
    }
}

/// API host for a location: regional locations use a prefixed host
pub fn default_endpoint(location: &str) -> String {
    if location == "global" {
        "https://discoveryengine.googleapis.com".to_string()
    } else {
        format!("https://{}-discoveryengine.googleapis.com", location)
    }
}
