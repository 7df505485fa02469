//! Frontend module for egui UI
//!
//! This module provides the token field widget and a small demo application
//! that plays the role of the surrounding product: it owns the raw value,
//! supplies the binding catalog and a resolver, and listens for changes.
//!
//! # Main Types
//!
//! - [`TokenField`] - The token-aware single-line input widget
//! - [`TokenFieldState`] - Per-instance derived state (suggestions, caret)
//! - [`TokenFieldApp`] - Demo application implementing [`eframe::App`]
//!
//! # Submodules
//!
//! - [`overlay`] - Segment layout, scroll sync and token hit rectangles
//! - [`token_field`] - The widget itself
//! - [`widgets`] - Tooltip and suggestion row widgets

pub mod overlay;
pub mod token_field;
pub mod widgets;

pub use token_field::{TokenField, TokenFieldState};
pub use widgets::{SuggestionRow, TokenTooltip};

use std::collections::VecDeque;
use std::path::PathBuf;

use egui::RichText;
use rust_i18n::t;

use crate::config::{AppState, BindingCatalog, WidgetSettings};
use crate::i18n::{self, Language};
use crate::resolve::CatalogResolver;
use crate::tokenizer::tokenize;
use crate::types::SegmentKind;

/// Number of change notifications kept in the log
const MAX_CHANGE_LOG: usize = 20;

/// Demo application hosting one token field
pub struct TokenFieldApp {
    app_state: AppState,
    settings: WidgetSettings,
    catalog: BindingCatalog,
    catalog_path: Option<PathBuf>,

    /// Raw value owned by the caller
    text: String,
    field_state: TokenFieldState,

    /// Most recent change notifications, newest first
    changes: VecDeque<String>,
}

impl TokenFieldApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        app_state: AppState,
        settings: WidgetSettings,
        catalog: BindingCatalog,
        catalog_path: Option<PathBuf>,
    ) -> Self {
        i18n::set_language(app_state.language);

        let text = if app_state.last_text.is_empty() {
            "{{BASE_URL}}/users/:id?token={{base_token}}".to_string()
        } else {
            app_state.last_text.clone()
        };

        Self {
            app_state,
            settings,
            catalog,
            catalog_path,
            text,
            field_state: TokenFieldState::new(),
            changes: VecDeque::with_capacity(MAX_CHANGE_LOG),
        }
    }

    /// Change notification from the field
    fn on_change(&mut self) {
        tracing::debug!(value = %self.text, "token field changed");
        if self.changes.len() == MAX_CHANGE_LOG {
            self.changes.pop_back();
        }
        self.changes.push_front(self.text.clone());
    }

    fn reload_catalog(&mut self) {
        let Some(path) = self.catalog_path.clone() else {
            return;
        };
        match BindingCatalog::load(&path) {
            Ok(catalog) => {
                self.catalog = catalog;
                self.app_state.last_catalog_path = Some(path);
            }
            Err(e) => tracing::warn!("Failed to reload catalog: {}", e),
        }
    }

    fn menu_bar(&mut self, ui: &mut egui::Ui) {
        egui::MenuBar::new().ui(ui, |ui| {
            ui.menu_button(t!("app.view"), |ui| {
                if ui
                    .checkbox(&mut self.app_state.dark_mode, t!("app.dark_mode"))
                    .changed()
                {
                    let visuals = if self.app_state.dark_mode {
                        egui::Visuals::dark()
                    } else {
                        egui::Visuals::light()
                    };
                    ui.ctx().set_visuals(visuals);
                }

                ui.separator();
                ui.label(t!("app.language"));
                for lang in Language::all() {
                    if ui
                        .radio(self.app_state.language == *lang, lang.display_name())
                        .clicked()
                    {
                        self.app_state.language = *lang;
                        i18n::set_language(*lang);
                        ui.close();
                    }
                }
            });

            ui.menu_button(t!("app.catalog"), |ui| {
                let can_reload = self.catalog_path.is_some();
                if ui
                    .add_enabled(can_reload, egui::Button::new(t!("app.reload_catalog")))
                    .clicked()
                {
                    self.reload_catalog();
                    ui.close();
                }
            });
        });
    }

    fn catalog_grid(&self, ui: &mut egui::Ui) {
        ui.columns(2, |columns| {
            columns[0].strong(t!("app.variables"));
            egui::Grid::new("variables_grid")
                .striped(true)
                .show(&mut columns[0], |ui| {
                    for binding in &self.catalog.variables {
                        ui.monospace(&binding.key);
                        ui.label(&binding.value);
                        ui.end_row();
                    }
                });

            columns[1].strong(t!("app.paths"));
            egui::Grid::new("paths_grid")
                .striped(true)
                .show(&mut columns[1], |ui| {
                    for binding in &self.catalog.paths {
                        ui.monospace(format!(":{}", binding.key));
                        ui.label(&binding.value);
                        ui.end_row();
                    }
                });
        });
    }
}

impl eframe::App for TokenFieldApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| self.menu_bar(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading(t!("app.title"));
            ui.add_space(8.0);

            ui.label(t!("app.request_url"));
            let variables = &self.catalog.variables;
            let resolver = CatalogResolver::new(variables);
            let response = TokenField::new(&mut self.text, &mut self.field_state, "request_url")
                .variables(variables)
                .paths(&self.catalog.paths)
                .resolver(&resolver)
                .settings(&self.settings)
                .desired_width(ui.available_width())
                .show(ui);
            if response.changed() {
                self.on_change();
            }

            ui.add_space(8.0);
            ui.horizontal_wrapped(|ui| {
                ui.label(RichText::new(t!("app.raw_value")).strong());
                for segment in tokenize(&self.text) {
                    let text = RichText::new(&segment.content).monospace();
                    match segment.kind {
                        SegmentKind::Text => ui.label(text),
                        SegmentKind::Variable => {
                            ui.label(text.color(self.settings.variable_color32()))
                        }
                        SegmentKind::PathVariable => {
                            ui.label(text.color(self.settings.path_color32()))
                        }
                    };
                }
            });

            ui.separator();
            self.catalog_grid(ui);

            ui.separator();
            ui.strong(t!("app.changes"));
            egui::ScrollArea::vertical()
                .max_height(200.0)
                .show(ui, |ui| {
                    for change in &self.changes {
                        ui.monospace(change);
                    }
                });
        });
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.field_state.cancel();
        self.app_state.last_text = self.text.clone();

        if let Err(e) = self.app_state.save() {
            tracing::warn!("Failed to save app state: {}", e);
        }
    }
}
