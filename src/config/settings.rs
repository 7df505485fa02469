//! Display and behaviour settings for the token field
//!
//! These settings only affect presentation (font, colours, popup size).
//! Tokenizing, matching and commit behaviour are fixed and do not depend
//! on anything in here.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ResultExt, TokenFieldError};

/// Settings for [`crate::frontend::TokenField`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetSettings {
    /// Font size in points, shared by the text surface and the overlay
    pub font_size: f32,

    /// Use the monospace font family instead of proportional
    pub monospace: bool,

    /// Rows shown in the suggestion popup before it scrolls
    pub max_visible_suggestions: usize,

    /// Show each candidate's current value next to its key
    pub show_value_preview: bool,

    /// Placeholder shown while the field is empty
    pub hint_text: String,

    /// RGB colour of `{{variable}}` tokens
    pub variable_color: [u8; 3],

    /// RGB colour of `:path` tokens
    pub path_color: [u8; 3],

    /// Underline tokens that have no binding
    pub underline_unresolved: bool,
}

impl Default for WidgetSettings {
    fn default() -> Self {
        Self {
            font_size: 14.0,
            monospace: false,
            max_visible_suggestions: 8,
            show_value_preview: true,
            hint_text: String::new(),
            variable_color: [86, 156, 214],
            path_color: [206, 145, 120],
            underline_unresolved: true,
        }
    }
}

impl WidgetSettings {
    /// Load settings from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings {:?}", path))?;
        let settings: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse settings {:?}", path))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings, returning defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load widget settings, using defaults: {}", e);
            Self::default()
        })
    }

    /// Save settings as TOML
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize settings")?;
        std::fs::write(path.as_ref(), content).context("Failed to write settings")
    }

    /// Reject values the widget cannot render
    pub fn validate(&self) -> Result<()> {
        if !self.font_size.is_finite() || self.font_size <= 0.0 {
            return Err(TokenFieldError::Config(format!(
                "font_size must be positive, got {}",
                self.font_size
            )));
        }
        if self.max_visible_suggestions == 0 {
            return Err(TokenFieldError::Config(
                "max_visible_suggestions must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn font_id(&self) -> egui::FontId {
        if self.monospace {
            egui::FontId::monospace(self.font_size)
        } else {
            egui::FontId::proportional(self.font_size)
        }
    }

    pub fn variable_color32(&self) -> egui::Color32 {
        let [r, g, b] = self.variable_color;
        egui::Color32::from_rgb(r, g, b)
    }

    pub fn path_color32(&self) -> egui::Color32 {
        let [r, g, b] = self.path_color;
        egui::Color32::from_rgb(r, g, b)
    }
}
