//! Site configuration.
//!
//! Loaded from YAML or JSON. Keys are snake_case; the camelCase spellings
//! used by front-end configs (`primaryColor`, `socialLinks`, ...) are
//! accepted as aliases. Every field has a default.

use crate::route::DEFAULT_DOCS_ROOT;
use docblog_render::RenderOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::{fs, io};
use thiserror::Error;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// YAML syntax or shape error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON syntax or shape error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File extension is neither YAML nor JSON.
    #[error("Unsupported config file format: {}", .0.display())]
    UnsupportedFormat(PathBuf),
}

/// Loader settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderOptions {
    /// Prefix stripped from source paths before computing routes.
    #[serde(alias = "docsRoot")]
    pub docs_root: String,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            docs_root: DEFAULT_DOCS_ROOT.to_string(),
        }
    }
}

/// Colour scheme the site starts in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    /// Light scheme.
    Light,
    /// Dark scheme.
    #[default]
    Dark,
}

/// Theme settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Accent colour as a CSS colour string.
    #[serde(alias = "primaryColor")]
    pub primary_color: String,
    /// Initial colour scheme.
    #[serde(alias = "defaultMode")]
    pub default_mode: ThemeMode,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            primary_color: "#197fe6".to_string(),
            default_mode: ThemeMode::Dark,
        }
    }
}

/// Search box settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Whether the search box is shown.
    pub enabled: bool,
    /// Placeholder text.
    pub placeholder: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            placeholder: "Search docs...".to_string(),
        }
    }
}

/// Footer or header link to an external profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLink {
    /// Icon name or glyph.
    pub icon: String,
    /// Target URL.
    pub link: String,
}

/// Site-wide configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Site title.
    pub title: String,
    /// One-line description.
    pub description: String,
    /// Logo path.
    pub logo: String,
    /// Theme settings.
    pub theme: ThemeConfig,
    /// Search settings.
    pub search: SearchConfig,
    /// External profile links.
    #[serde(alias = "socialLinks")]
    pub social_links: Vec<SocialLink>,
    /// Loader settings.
    pub docs: LoaderOptions,
    /// Markdown rendering settings.
    pub render: RenderOptions,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Blog".to_string(),
            description: "A minimalist documentation blog.".to_string(),
            logo: "/logo.svg".to_string(),
            theme: ThemeConfig::default(),
            search: SearchConfig::default(),
            social_links: Vec::new(),
            docs: LoaderOptions::default(),
            render: RenderOptions::default(),
        }
    }
}

impl SiteConfig {
    /// Parses YAML.
    pub fn from_yaml_str(input: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(input)?)
    }

    /// Parses JSON.
    pub fn from_json_str(input: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(input)?)
    }

    /// Loads a config file, choosing the format from its extension
    /// (`.yaml`, `.yml` or `.json`).
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if the format
    /// is unsupported.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        let parse: fn(&str) -> Result<Self, ConfigError> = match extension.as_deref() {
            Some("yaml" | "yml") => Self::from_yaml_str,
            Some("json") => Self::from_json_str,
            _ => return Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        };

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("Loading site config from {}", path.display());
        parse(&content)
    }
}
