//! Configuration module for tokenfield-rs
//!
//! This module handles:
//! - Binding catalogs (`.toml` files with `[variables]` and `[paths]` tables)
//! - Widget display settings ([`settings::WidgetSettings`])
//! - Demo application state persistence (theme, language, last catalog)
//!
//! # App Data Location
//!
//! Application state is stored in the platform-appropriate location:
//! - **Linux**: `~/.local/share/dev.tokenfield.tokenfield-rs/`
//! - **macOS**: `~/Library/Application Support/dev.tokenfield.tokenfield-rs/`
//! - **Windows**: `%APPDATA%\dev.tokenfield.tokenfield-rs\`
//!
//! # Catalog format
//!
//! ```toml
//! [variables]
//! BASE_URL = "https://api.example.com"
//! API_KEY = "secret"
//!
//! [paths]
//! user_id = "42"
//! ```
//!
//! Entry order in the file is the order suggestions are offered in.

pub mod settings;

pub use settings::*;

use crate::error::{Result, ResultExt, TokenFieldError};
use crate::i18n::Language;
use crate::types::{dedup_by_key, PathBinding, VariableBinding};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application identifier for data directories
pub const APP_ID: &str = "dev.tokenfield.tokenfield-rs";

/// App state filename
pub const APP_STATE_FILE: &str = "app_state.json";

// ==================== App Data Directory ====================

/// Get the application data directory path
pub fn app_data_dir() -> Option<PathBuf> {
    dirs_next::data_dir().map(|p| p.join(APP_ID))
}

/// Ensure the app data directory exists
pub fn ensure_app_data_dir() -> Result<PathBuf> {
    let dir = app_data_dir().ok_or_else(|| {
        TokenFieldError::Config("Could not determine app data directory".to_string())
    })?;

    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| {
            TokenFieldError::Config(format!("Failed to create app data directory: {}", e))
        })?;
    }

    Ok(dir)
}

/// Get the path to the app state file
pub fn app_state_path() -> Option<PathBuf> {
    app_data_dir().map(|p| p.join(APP_STATE_FILE))
}

// ==================== Binding Catalog ====================

/// Variables and path placeholders known to the field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BindingCatalog {
    pub variables: Vec<VariableBinding>,
    pub paths: Vec<PathBinding>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    variables: toml::Table,
    #[serde(default)]
    paths: toml::Table,
}

/// Catalog values are strings; other TOML scalars are kept in their TOML spelling
fn value_to_string(value: toml::Value) -> String {
    match value {
        toml::Value::String(s) => s,
        other => other.to_string(),
    }
}

impl BindingCatalog {
    /// Build a catalog, dropping later duplicates of a key
    pub fn new(variables: Vec<VariableBinding>, paths: Vec<PathBinding>) -> Self {
        Self {
            variables: dedup_by_key(variables, |b| &b.key),
            paths: dedup_by_key(paths, |b| &b.key),
        }
    }

    /// Parse a catalog from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        let file: CatalogFile = toml::from_str(content)
            .map_err(|e| TokenFieldError::Catalog(format!("Invalid catalog: {}", e)))?;

        let variables = file
            .variables
            .into_iter()
            .map(|(key, value)| VariableBinding::new(key, value_to_string(value)))
            .collect();
        let paths = file
            .paths
            .into_iter()
            .map(|(key, value)| PathBinding::new(key, value_to_string(value)))
            .collect();

        Ok(Self::new(variables, paths))
    }

    /// Serialize the catalog as TOML
    pub fn to_toml(&self) -> Result<String> {
        let mut file = CatalogFile::default();
        for binding in &self.variables {
            file.variables
                .insert(binding.key.clone(), toml::Value::String(binding.value.clone()));
        }
        for binding in &self.paths {
            file.paths
                .insert(binding.key.clone(), toml::Value::String(binding.value.clone()));
        }
        Ok(toml::to_string_pretty(&file)?)
    }

    /// Load a catalog file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog {:?}", path))?;
        let catalog = Self::from_toml(&content)?;
        tracing::debug!(
            variables = catalog.variables.len(),
            paths = catalog.paths.len(),
            "Loaded catalog from {:?}",
            path
        );
        Ok(catalog)
    }

    /// Load a catalog file, returning an empty catalog on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load catalog, using an empty one: {}", e);
            Self::default()
        })
    }

    /// Save the catalog to a file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = self.to_toml()?;
        std::fs::write(path.as_ref(), content).context("Failed to write catalog")
    }

    /// Catalog used by the demo when nothing else is configured
    pub fn sample() -> Self {
        Self::new(
            vec![
                VariableBinding::new("BASE_URL", "https://api.example.com"),
                VariableBinding::new("base_token", "tok_live_4f9a"),
                VariableBinding::new("API_KEY", "sk-test-123"),
                VariableBinding::new("user_id", "1001"),
                VariableBinding::new("user_name", "alice"),
                VariableBinding::new("EMPTY_VALUE", ""),
            ],
            vec![
                PathBinding::new("id", "42"),
                PathBinding::new("project_id", "p-7"),
                PathBinding::new("run", "2024-11-03"),
            ],
        )
    }
}

// ==================== App State ====================

/// Persistent state of the demo application
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppState {
    /// Version for future migration support
    #[serde(default = "default_app_state_version")]
    pub version: u32,

    /// Enable dark mode
    #[serde(default = "default_true")]
    pub dark_mode: bool,

    /// UI language
    #[serde(default)]
    pub language: Language,

    /// Last loaded catalog file
    #[serde(default)]
    pub last_catalog_path: Option<PathBuf>,

    /// Text left in the field at exit
    #[serde(default)]
    pub last_text: String,
}

fn default_app_state_version() -> u32 {
    1
}

fn default_true() -> bool {
    true
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            version: 1,
            dark_mode: true,
            language: Language::detect(),
            last_catalog_path: None,
            last_text: String::new(),
        }
    }
}

impl AppState {
    /// Load app state from the default location
    pub fn load() -> Result<Self> {
        let path = app_state_path().ok_or_else(|| {
            TokenFieldError::Config("Could not determine app state path".to_string())
        })?;
        Self::load_from(path)
    }

    /// Load app state from a specific file; a missing file yields defaults
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| TokenFieldError::Config(format!("Failed to read app state: {}", e)))?;

        serde_json::from_str(&content)
            .map_err(|e| TokenFieldError::Config(format!("Failed to parse app state: {}", e)))
    }

    /// Load app state, returning defaults on any error
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!("Failed to load app state, using defaults: {}", e);
            Self::default()
        })
    }

    /// Save app state to the default location
    pub fn save(&self) -> Result<()> {
        let dir = ensure_app_data_dir()?;
        self.save_to(dir.join(APP_STATE_FILE))
    }

    /// Save app state to a specific file
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            TokenFieldError::Config(format!("Failed to serialize app state: {}", e))
        })?;

        std::fs::write(path.as_ref(), content)
            .map_err(|e| TokenFieldError::Config(format!("Failed to write app state: {}", e)))
    }

    /// Last catalog path, if the file still exists
    pub fn get_last_catalog(&self) -> Option<&Path> {
        self.last_catalog_path
            .as_ref()
            .filter(|p| p.exists())
            .map(|p| p.as_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_preserves_file_order() {
        let catalog = BindingCatalog::from_toml(
            r#"
            [variables]
            zeta = "z"
            alpha = "a"
            mid = 5

            [paths]
            id = "42"
            "#,
        )
        .unwrap();

        let keys: Vec<_> = catalog.variables.iter().map(|b| b.key.as_str()).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
        assert_eq!(catalog.variables[2].value, "5");
        assert_eq!(catalog.paths, vec![PathBinding::new("id", "42")]);
    }

    #[test]
    fn test_catalog_missing_tables() {
        let catalog = BindingCatalog::from_toml("").unwrap();
        assert!(catalog.variables.is_empty());
        assert!(catalog.paths.is_empty());
    }

    #[test]
    fn test_invalid_catalog() {
        let err = BindingCatalog::from_toml("[variables\n").unwrap_err();
        assert!(matches!(err, TokenFieldError::Catalog(_)));
    }

    #[test]
    fn test_catalog_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.toml");

        let catalog = BindingCatalog::sample();
        catalog.save(&path).unwrap();
        assert_eq!(BindingCatalog::load(&path).unwrap(), catalog);
    }

    #[test]
    fn test_app_state_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::load_from(dir.path().join("app_state.json")).unwrap();
        assert!(state.dark_mode);
        assert!(state.last_catalog_path.is_none());
    }

    #[test]
    fn test_app_state_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app_state.json");

        let state = AppState {
            dark_mode: false,
            language: Language::SimplifiedChinese,
            last_text: "{{BASE_URL}}/users/:id".to_string(),
            ..Default::default()
        };
        state.save_to(&path).unwrap();

        let loaded = AppState::load_from(&path).unwrap();
        assert!(!loaded.dark_mode);
        assert_eq!(loaded.language, Language::SimplifiedChinese);
        assert_eq!(loaded.last_text, state.last_text);
    }

    #[test]
    fn test_get_last_catalog_filters_missing() {
        let state = AppState {
            last_catalog_path: Some(PathBuf::from("/definitely/not/here.toml")),
            ..Default::default()
        };
        assert!(state.get_last_catalog().is_none());
    }
}
