//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for roadbook.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::data::Category;

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Where category resources come from.
    pub data: DataConfig,

    /// Hash router settings.
    pub router: RouterConfig,

    /// Search limits.
    pub search: SearchConfig,

    /// HTTP surface used by `roadbook serve`.
    pub server: ServerConfig,

    /// Logging settings.
    pub observability: ObservabilityConfig,

    /// Static dataset description.
    pub metadata: Metadata,
}

/// Kind of data source backing the loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// One resource per category, fetched over HTTP relative to `base_url`.
    Http,
    /// One file per category under `root`.
    #[default]
    File,
    /// A single document under `root` whose `data` object holds every category.
    Unified,
}

/// Data source configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DataConfig {
    pub source: SourceKind,

    /// Base URL for [`SourceKind::Http`].
    pub base_url: String,

    /// Root directory for [`SourceKind::File`] and [`SourceKind::Unified`].
    pub root: String,

    /// Path of the unified document, relative to `root`.
    pub unified_path: String,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,

    /// Per-category resource paths.
    pub paths: CategoryPaths,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            source: SourceKind::File,
            base_url: "http://localhost:8000/".to_string(),
            root: ".".to_string(),
            unified_path: "datasets/dataset-unified.json".to_string(),
            timeout_secs: 10,
            paths: CategoryPaths::default(),
        }
    }
}

/// Resource path for every category.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CategoryPaths {
    pub locations: String,
    pub guides: String,
    pub routes: String,
    pub costs: String,
    pub contacts: String,
    pub tips: String,
}

impl CategoryPaths {
    pub fn get(&self, category: Category) -> &str {
        match category {
            Category::Locations => &self.locations,
            Category::Guides => &self.guides,
            Category::Routes => &self.routes,
            Category::Costs => &self.costs,
            Category::Contacts => &self.contacts,
            Category::Tips => &self.tips,
        }
    }
}

impl Default for CategoryPaths {
    fn default() -> Self {
        Self {
            locations: "datasets/mvp-locations-curated.json".to_string(),
            guides: "datasets/dataset-guides.json".to_string(),
            routes: "datasets/dataset-routes.json".to_string(),
            costs: "datasets/dataset-costs.json".to_string(),
            contacts: "datasets/dataset-contacts.json".to_string(),
            tips: "datasets/dataset-tips.json".to_string(),
        }
    }
}

/// Router configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Route used for empty or unknown fragments.
    pub default_route: String,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            default_route: "home".to_string(),
        }
    }
}

/// Search configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Cap applied after all category passes.
    pub max_results: usize,

    /// Description length (in characters) before truncation.
    pub description_chars: usize,

    /// Queries shorter than this are not searched by the search surface.
    pub min_query_chars: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_results: 50,
            description_chars: 150,
            min_query_chars: 2,
        }
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1:8080").
    pub bind_address: String,

    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    pub log_format: LogFormat,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}

/// Static description of the dataset.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all(serialize = "camelCase"))]
pub struct Metadata {
    pub project: String,
    pub data_version: String,
    pub description: String,
}

impl Default for Metadata {
    fn default() -> Self {
        Self {
            project: "Ultimate Motorhome Knowledge Library".to_string(),
            data_version: "2.0-categorized".to_string(),
            description: "Categorized dataset with lazy loading".to_string(),
        }
    }
}
