//! Small widgets used by the token field
//!
//! - [`TokenTooltip`] - Hover card for a token: decorated text, kind and value
//! - [`SuggestionRow`] - One selectable candidate in the suggestion popup

use egui::{Color32, Response, RichText, Sense, Ui, Widget};
use rust_i18n::t;

use crate::types::{Resolution, Segment, SegmentKind, VariableBinding};

/// Tooltip body for a hovered token
pub struct TokenTooltip<'a> {
    segment: &'a Segment,
    resolution: &'a Resolution,
    accent: Color32,
}

impl<'a> TokenTooltip<'a> {
    pub fn new(segment: &'a Segment, resolution: &'a Resolution) -> Self {
        Self {
            segment,
            resolution,
            accent: Color32::LIGHT_BLUE,
        }
    }

    /// Colour of the token text in the tooltip header
    pub fn with_accent(mut self, accent: Color32) -> Self {
        self.accent = accent;
        self
    }
}

impl Widget for TokenTooltip<'_> {
    fn ui(self, ui: &mut Ui) -> Response {
        ui.vertical(|ui| {
            ui.horizontal(|ui| {
                ui.label(
                    RichText::new(&self.segment.content)
                        .monospace()
                        .color(self.accent),
                );
                let kind = match self.segment.kind {
                    SegmentKind::PathVariable => t!("token_field.path_variable"),
                    _ => t!("token_field.variable"),
                };
                ui.label(RichText::new(kind).small().color(Color32::GRAY));
            });

            match self.resolution {
                Resolution::Found(value) if value.is_empty() => {
                    ui.label(RichText::new(t!("token_field.empty_value")).italics());
                }
                Resolution::Found(value) => {
                    ui.label(RichText::new(value).monospace());
                }
                Resolution::NotFound => {
                    ui.colored_label(Color32::YELLOW, format!("⚠ {}", t!("token_field.not_found")));
                }
            }
        })
        .response
    }
}

/// One candidate row in the suggestion popup
pub struct SuggestionRow<'a> {
    binding: &'a VariableBinding,
    highlighted: bool,
    show_value: bool,
    key_color: Color32,
    scroll_into_view: bool,
}

impl<'a> SuggestionRow<'a> {
    pub fn new(binding: &'a VariableBinding, highlighted: bool) -> Self {
        Self {
            binding,
            highlighted,
            show_value: true,
            key_color: Color32::LIGHT_BLUE,
            scroll_into_view: false,
        }
    }

    pub fn show_value(mut self, show_value: bool) -> Self {
        self.show_value = show_value;
        self
    }

    pub fn key_color(mut self, color: Color32) -> Self {
        self.key_color = color;
        self
    }

    /// Scroll the popup so this row is visible
    pub fn scroll_into_view(mut self, scroll: bool) -> Self {
        self.scroll_into_view = scroll;
        self
    }
}

impl Widget for SuggestionRow<'_> {
    fn ui(self, ui: &mut Ui) -> Response {
        let bg_color = if self.highlighted {
            ui.visuals().selection.bg_fill
        } else {
            Color32::TRANSPARENT
        };

        let inner = egui::Frame::new().fill(bg_color).show(ui, |ui| {
            ui.set_min_width(ui.available_width());
            ui.horizontal(|ui| {
                ui.label(
                    RichText::new(&self.binding.key)
                        .color(self.key_color)
                        .monospace(),
                );
                if self.show_value {
                    let preview = if self.binding.value.is_empty() {
                        t!("token_field.empty_value").to_string()
                    } else {
                        self.binding.value.clone()
                    };
                    ui.label(RichText::new(preview).small().color(Color32::GRAY));
                }
            });
        });

        let response = ui.interact(
            inner.response.rect,
            ui.id().with(("suggestion", &self.binding.key)),
            Sense::click(),
        );
        if self.scroll_into_view {
            response.scroll_to_me(None);
        }
        response
    }
}
