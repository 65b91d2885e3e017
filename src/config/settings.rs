//! Settings structures for discovery-search configuration

use crate::search::{QueryExpansionCondition, SpellCorrectionMode};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main settings structure matching settings.yml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub server: ServerSettings,
    pub provider: ProviderSettings,
    pub search: SearchSettings,
    pub conversation: ConversationSettings,
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: Settings = serde_yaml::from_str(&content)?;
        Ok(settings)
    }

    /// Merge with environment variables (DISCOVERY_* prefix)
    pub fn merge_env(&mut self) {
        if let Ok(val) = std::env::var("DISCOVERY_DEBUG") {
            self.general.debug = val.parse().unwrap_or(false);
        }
        if let Ok(val) = std::env::var("DISCOVERY_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Ok(val) = std::env::var("DISCOVERY_BIND_ADDRESS") {
            self.server.bind_address = val;
        }
        if let Ok(val) = std::env::var("DISCOVERY_MODE") {
            if let Ok(mode) = val.parse() {
                self.server.mode = mode;
            }
        }
        if let Ok(val) = std::env::var("DISCOVERY_PROJECT_ID") {
            self.provider.project_id = val;
        }
        if let Ok(val) = std::env::var("DISCOVERY_LOCATION") {
            self.provider.location = val;
        }
        if let Ok(val) = std::env::var("DISCOVERY_DATA_STORE_ID") {
            self.provider.data_store_id = val;
        }
        if let Ok(val) = std::env::var("DISCOVERY_SERVING_CONFIG") {
            self.provider.serving_config = val;
        }
        if let Ok(val) = std::env::var("DISCOVERY_ENDPOINT") {
            self.provider.endpoint = Some(val);
        }
        if let Ok(val) = std::env::var("DISCOVERY_ACCESS_TOKEN") {
            self.provider.access_token = Some(val);
        }
    }
}

/// General settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Enable debug logging
    pub debug: bool,
}

/// What `POST /search` does
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServerMode {
    /// Single-shot search returning normalized results and a summary
    #[default]
    Search,
    /// Multi-turn conversation
    Conversation,
}

impl std::str::FromStr for ServerMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "search" => Ok(Self::Search),
            "conversation" | "converse" => Ok(Self::Conversation),
            other => Err(anyhow::anyhow!("unknown server mode: {}", other)),
        }
    }
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Server port
    pub port: u16,
    /// Bind address
    pub bind_address: String,
    /// Behaviour of the search endpoint
    pub mode: ServerMode,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: 8000,
            bind_address: "0.0.0.0".to_string(),
            mode: ServerMode::default(),
        }
    }
}

/// Where and how to reach the search provider
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    /// Cloud project id
    pub project_id: String,
    /// Location: "global", "us" or "eu"
    pub location: String,
    /// Data store id
    pub data_store_id: String,
    /// Serving configuration name
    pub serving_config: String,
    /// Endpoint override (scheme and host)
    pub endpoint: Option<String>,
    /// Bearer token attached to every request
    pub access_token: Option<String>,
    /// Request timeout in seconds
    pub request_timeout: f64,
    /// Retries for transient failures (0 disables)
    pub max_retries: u32,
    /// Initial retry delay in milliseconds, doubled on each attempt
    pub retry_backoff_ms: u64,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            location: "global".to_string(),
            data_store_id: String::new(),
            serving_config: "default_config".to_string(),
            endpoint: None,
            access_token: None,
            request_timeout: 30.0,
            max_retries: 0,
            retry_backoff_ms: 500,
        }
    }
}

/// Content search options for single-shot queries
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Results per page
    pub page_size: u32,
    /// Return snippets with each result
    pub return_snippet: bool,
    /// Number of top results the summary is built from
    pub summary_result_count: u32,
    /// Add citations to the summary
    pub include_citations: bool,
    /// Skip summaries for adversarial queries
    pub ignore_adversarial_query: bool,
    /// Skip summaries for queries that do not seek one
    pub ignore_non_summary_seeking_query: bool,
    /// Query expansion condition
    pub query_expansion: QueryExpansionCondition,
    /// Spell correction mode
    pub spell_correction: SpellCorrectionMode,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            page_size: 10,
            return_snippet: true,
            summary_result_count: 5,
            include_citations: true,
            ignore_adversarial_query: true,
            ignore_non_summary_seeking_query: true,
            query_expansion: QueryExpansionCondition::Auto,
            spell_correction: SpellCorrectionMode::Auto,
        }
    }
}

/// Multi-turn conversation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversationSettings {
    /// Number of top results each reply is built from
    pub summary_result_count: u32,
    /// Add citations to replies
    pub include_citations: bool,
    /// Word that ends a dialogue locally
    pub exit_word: String,
    /// Match the exit word case-sensitively
    pub exit_case_sensitive: bool,
    /// Idle time in seconds before a server-side dialogue is forgotten
    pub session_idle_timeout: u64,
    /// Maximum concurrent dialogues kept by the server
    pub max_sessions: u64,
}

impl Default for ConversationSettings {
    fn default() -> Self {
        Self {
            summary_result_count: 3,
            include_citations: true,
            exit_word: "exit".to_string(),
            exit_case_sensitive: false,
            session_idle_timeout: 1800,
            max_sessions: 10_000,
        }
    }
}
