//! Token field widget
//!
//! A single-line text input that highlights `{{variable}}` and `:path`
//! references, shows their resolved values on hover and offers variable
//! suggestions while a `{{` reference is being typed.
//!
//! # Surfaces
//!
//! Two things are drawn at the same position every frame:
//!
//! 1. An `egui::TextEdit` with transparent text. It owns the caret,
//!    selection, clipboard, IME and keyboard handling.
//! 2. An overlay galley built from [`tokenize`] output with the same font,
//!    painted at the TextEdit's galley position and clipped to its text area.
//!    Because the position is read back from the TextEdit in the same pass,
//!    the overlay scrolls with it before anything is painted.
//!
//! While suggestions are open, Up/Down/Escape act before the `TextEdit` runs.
//! Enter and Tab are also taken from the input before it runs, but the commit
//! happens afterwards, against the text and caret as edited in this frame.
//!
//! Token spans get their own click targets: clicking one moves the caret to
//! the clicked character (or the token end when hit-testing fails) and
//! focuses the field. Plain text has no target, so clicks there go straight
//! to the TextEdit.
//!
//! # Usage
//!
//! ```ignore
//! let response = TokenField::new(&mut self.url, &mut self.url_state, "url")
//!     .variables(&catalog.variables)
//!     .paths(&catalog.paths)
//!     .resolver(&|token: &str| env.lookup(token))
//!     .settings(&settings)
//!     .show(ui);
//!
//! if response.changed() {
//!     // typed or committed a suggestion; `self.url` holds the new value
//! }
//! ```

use egui::{
    text::{CCursor, CCursorRange},
    text_edit::TextEditState,
    Color32, CursorIcon, EventFilter, Id, Key, Modifiers, Order, Pos2, Rect, Sense, Stroke, Ui,
};

use super::overlay::{build_overlay_job, token_spans, OverlayStyle, ScrollSync};
use super::widgets::{SuggestionRow, TokenTooltip};
use crate::config::WidgetSettings;
use crate::position::{offset_from_click, popup_x, FontMeasure, GalleyHitTest};
use crate::resolve::{resolve_segment, VariableResolver};
use crate::suggest::{KeyOutcome, SuggestionKey, SuggestionState};
use crate::tokenizer::tokenize;
use crate::types::{PathBinding, Resolution, VariableBinding};

/// Per-instance state of a token field
///
/// Holds only derived data (suggestions, last caret, scroll offset). The raw
/// value itself stays with the caller.
#[derive(Debug, Clone, Default)]
pub struct TokenFieldState {
    suggestions: SuggestionState,
    last_caret: Option<usize>,
    /// Caret to apply at the start of the next frame
    pending_caret: Option<usize>,
    scroll: ScrollSync,
    popup_rect: Option<Rect>,
    /// Highlight moved by keyboard; scroll it into view once
    scroll_to_highlight: bool,
}

impl TokenFieldState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current suggestion state (read-only)
    pub fn suggestions(&self) -> &SuggestionState {
        &self.suggestions
    }

    /// Caret position seen in the last frame
    pub fn caret(&self) -> Option<usize> {
        self.last_caret
    }

    /// Whether a caret move is waiting for the next frame
    pub fn has_pending_caret(&self) -> bool {
        self.pending_caret.is_some()
    }

    /// Focus the field and put the caret at `caret` (a character offset) on
    /// the next frame
    pub fn request_caret(&mut self, caret: usize) {
        self.pending_caret = Some(caret);
    }

    /// Screen rect of the suggestion popup, if it was shown last frame
    pub fn popup_rect(&self) -> Option<Rect> {
        self.popup_rect
    }

    /// Drop the popup and any pending caret restore
    pub fn cancel(&mut self) {
        self.suggestions.reset();
        self.pending_caret = None;
        self.popup_rect = None;
    }

    /// Apply a committed suggestion: write the new value and queue the caret.
    ///
    /// Returns `true` when `text` was modified.
    fn apply_outcome(&mut self, outcome: KeyOutcome, text: &mut String) -> bool {
        match outcome {
            KeyOutcome::Committed(commit) => {
                *text = commit.text;
                self.last_caret = Some(commit.caret);
                self.pending_caret = Some(commit.caret);
                self.popup_rect = None;
                true
            }
            KeyOutcome::Dismissed => {
                self.popup_rect = None;
                false
            }
            KeyOutcome::Navigated => {
                self.scroll_to_highlight = true;
                false
            }
            KeyOutcome::Ignored | KeyOutcome::NothingToCommit => false,
        }
    }
}

/// Keys intercepted while suggestions are open, in the order they are applied
const SUGGESTION_KEYS: [(Key, SuggestionKey); 5] = [
    (Key::Escape, SuggestionKey::Escape),
    (Key::Enter, SuggestionKey::Enter),
    (Key::Tab, SuggestionKey::Tab),
    (Key::ArrowDown, SuggestionKey::ArrowDown),
    (Key::ArrowUp, SuggestionKey::ArrowUp),
];

/// Focus filter while suggestions are open: arrows, Tab and Escape stay with
/// the field instead of moving or dropping focus
const MATCHING_FILTER: EventFilter = EventFilter {
    tab: true,
    horizontal_arrows: true,
    vertical_arrows: true,
    escape: true,
};

/// Token-aware single-line text input
pub struct TokenField<'a> {
    text: &'a mut String,
    state: &'a mut TokenFieldState,
    id_salt: Id,
    variables: &'a [VariableBinding],
    paths: &'a [PathBinding],
    resolver: Option<&'a dyn VariableResolver>,
    settings: Option<&'a WidgetSettings>,
    desired_width: Option<f32>,
}

impl<'a> TokenField<'a> {
    pub fn new(
        text: &'a mut String,
        state: &'a mut TokenFieldState,
        id_salt: impl std::hash::Hash,
    ) -> Self {
        Self {
            text,
            state,
            id_salt: Id::new(id_salt),
            variables: &[],
            paths: &[],
            resolver: None,
            settings: None,
            desired_width: None,
        }
    }

    /// Variables offered as suggestions (and used for tooltips without a resolver)
    pub fn variables(mut self, variables: &'a [VariableBinding]) -> Self {
        self.variables = variables;
        self
    }

    /// Path placeholders, resolved by exact name
    pub fn paths(mut self, paths: &'a [PathBinding]) -> Self {
        self.paths = paths;
        self
    }

    /// Resolver for variable tooltips; receives tokens like `{{name}}`
    pub fn resolver(mut self, resolver: &'a dyn VariableResolver) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn settings(mut self, settings: &'a WidgetSettings) -> Self {
        self.settings = Some(settings);
        self
    }

    pub fn desired_width(mut self, width: f32) -> Self {
        self.desired_width = Some(width);
        self
    }

    /// Show the field. The response is marked changed on typing and on commits.
    pub fn show(self, ui: &mut Ui) -> egui::Response {
        let Self {
            text,
            state,
            id_salt,
            variables,
            paths,
            resolver,
            settings,
            desired_width,
        } = self;

        let default_settings;
        let settings = match settings {
            Some(settings) => settings,
            None => {
                default_settings = WidgetSettings::default();
                &default_settings
            }
        };

        let ctx = ui.ctx().clone();
        let id = ui.make_persistent_id(id_salt);
        let surface_id = id.with("surface");
        let font_id = settings.font_id();

        // Caret restore queued by a commit or token click in the previous frame
        if let Some(caret) = state.pending_caret.take() {
            let mut surface = TextEditState::load(&ctx, surface_id).unwrap_or_default();
            surface
                .cursor
                .set_char_range(Some(CCursorRange::one(CCursor::new(caret))));
            surface.store(&ctx, surface_id);
            ctx.memory_mut(|mem| mem.request_focus(surface_id));
            tracing::trace!(caret, "token field: restored caret");
        }

        let has_focus = ctx.memory(|mem| mem.has_focus(surface_id));
        let mut committed = false;
        let mut commit_key = None;

        // Popup keys are taken before the TextEdit sees them
        if has_focus && state.suggestions.active {
            let pressed: Vec<(SuggestionKey, usize)> = ui.input_mut(|input| {
                SUGGESTION_KEYS
                    .iter()
                    .map(|(key, action)| {
                        (*action, input.count_and_consume_key(Modifiers::NONE, *key))
                    })
                    .filter(|(_, count)| *count > 0)
                    .collect()
            });
            for (key, count) in pressed {
                match key {
                    SuggestionKey::Enter | SuggestionKey::Tab => commit_key = Some(key),
                    SuggestionKey::Escape => {
                        let caret = state.last_caret.unwrap_or_else(|| text.chars().count());
                        let outcome = state.suggestions.handle_key(key, text, caret);
                        state.apply_outcome(outcome, text);
                        break;
                    }
                    SuggestionKey::ArrowDown | SuggestionKey::ArrowUp => {
                        let caret = state.last_caret.unwrap_or_else(|| text.chars().count());
                        for _ in 0..count {
                            let outcome = state.suggestions.handle_key(key, text, caret);
                            state.apply_outcome(outcome, text);
                        }
                    }
                }
            }
        }

        // Native editing surface
        let mut edit = egui::TextEdit::singleline(text)
            .id(surface_id)
            .font(font_id.clone())
            .text_color(Color32::TRANSPARENT)
            .hint_text(settings.hint_text.as_str());
        if let Some(width) = desired_width {
            edit = edit.desired_width(width);
        }
        let output = edit.show(ui);
        let mut response = output.response.clone();
        let caret = output.cursor_range.map(|range| range.primary.index);

        // Commit against what the TextEdit just produced, so characters typed
        // in the same frame as Enter end up before the caret
        if let (Some(key), Some(caret)) = (commit_key, caret) {
            if state.suggestions.active {
                state.suggestions.update(text, caret, variables);
                let outcome = state.suggestions.handle_key(key, text, caret);
                committed |= state.apply_outcome(outcome, text);
            }
        }

        let scroll = state
            .scroll
            .sync(output.text_clip_rect.left(), output.galley_pos.x);

        // Overlay
        let segments = tokenize(text);
        let resolutions: Vec<Option<Resolution>> = segments
            .iter()
            .map(|segment| resolve_segment(segment, resolver, variables, paths))
            .collect();

        let style = OverlayStyle {
            text: ui.visuals().text_color(),
            variable: settings.variable_color32(),
            path: settings.path_color32(),
            token_background: ui.visuals().faint_bg_color,
            unresolved: settings
                .underline_unresolved
                .then(|| Stroke::new(1.0, ui.visuals().warn_fg_color)),
        };
        let job = build_overlay_job(&segments, &font_id, &style, |index, _| {
            resolutions[index]
                .as_ref()
                .is_some_and(Resolution::is_found)
        });
        let overlay = ui.fonts_mut(|fonts| fonts.layout_job(job));
        ui.painter()
            .with_clip_rect(output.text_clip_rect)
            .galley(output.galley_pos, overlay, style.text);

        // Token hit targets and tooltips. After a commit the surface galley
        // still holds the old text, so targets wait for the next frame.
        let spans = if committed {
            Vec::new()
        } else {
            token_spans(&output.galley, &segments, output.galley_pos)
        };
        let hit_test = GalleyHitTest::new(output.galley.clone());
        for span in spans {
            let visible = span.rect.intersect(output.text_clip_rect);
            if !visible.is_positive() {
                continue;
            }

            let segment = &segments[span.segment_index];
            let token_response = ui
                .interact(visible, id.with(("token", span.segment_index)), Sense::click())
                .on_hover_cursor(CursorIcon::Text);

            if token_response.clicked() {
                let x = token_response
                    .interact_pointer_pos()
                    .map_or(span.rect.width(), |pos| pos.x - span.rect.left());
                let caret = offset_from_click(&hit_test, segment, x);
                tracing::trace!(caret, token = %segment.content, "token field: token clicked");
                state.pending_caret = Some(caret);
                ctx.request_repaint();
            }

            if let Some(resolution) = resolutions[span.segment_index].clone() {
                let accent = style.color_for(segment.kind);
                let _ = token_response.on_hover_ui(|ui| {
                    ui.add(TokenTooltip::new(segment, &resolution).with_accent(accent));
                });
            }
        }

        // Suggestion state follows text and caret
        let pointer_on_popup = state
            .popup_rect
            .zip(ctx.pointer_latest_pos())
            .is_some_and(|(rect, pos)| rect.contains(pos));

        match caret {
            Some(caret) if !committed => {
                let moved = state.last_caret != Some(caret);
                if output.response.changed() || moved || state.suggestions.active {
                    state.suggestions.update(text, caret, variables);
                }
                state.last_caret = Some(caret);
            }
            Some(_) => {}
            None if pointer_on_popup || state.pending_caret.is_some() => {}
            None => {
                if state.suggestions.active {
                    tracing::trace!("token field: focus lost, closing suggestions");
                }
                state.suggestions.reset();
                state.popup_rect = None;
            }
        }

        // Keep egui's focus navigation away from the popup keys next frame.
        // This runs after the TextEdit, which sets its own filter while focused.
        if state.suggestions.active && ctx.memory(|mem| mem.has_focus(surface_id)) {
            ctx.memory_mut(|mem| mem.set_focus_lock_filter(surface_id, MATCHING_FILTER));
        }

        // Suggestion popup
        if state.suggestions.active {
            let caret = state.last_caret.unwrap_or_else(|| text.chars().count());
            let measure = FontMeasure::new(&ctx, font_id.clone());
            let x = popup_x(
                &measure,
                text,
                caret,
                output.text_clip_rect.left(),
                scroll,
            );
            let pos = Pos2::new(x, output.response.rect.bottom());

            let mut clicked = None;
            let scroll_to_highlight = std::mem::take(&mut state.scroll_to_highlight);
            let row_height = ui.spacing().interact_size.y;
            let max_height = row_height * settings.max_visible_suggestions as f32;
            let area = egui::Area::new(id.with("suggestions"))
                .order(Order::Foreground)
                .fixed_pos(pos)
                .show(&ctx, |ui| {
                    egui::Frame::popup(ui.style()).show(ui, |ui| {
                        ui.set_min_width(180.0);
                        if state.suggestions.candidates.is_empty() {
                            ui.label(
                                egui::RichText::new(rust_i18n::t!("token_field.no_suggestions"))
                                    .small()
                                    .italics(),
                            );
                            return;
                        }
                        egui::ScrollArea::vertical()
                            .max_height(max_height)
                            .show(ui, |ui| {
                                for (i, binding) in
                                    state.suggestions.candidates.iter().enumerate()
                                {
                                    let highlighted = i == state.suggestions.highlighted_index;
                                    let row = ui.add(
                                        SuggestionRow::new(binding, highlighted)
                                            .show_value(settings.show_value_preview)
                                            .key_color(style.variable)
                                            .scroll_into_view(highlighted && scroll_to_highlight),
                                    );
                                    if row.clicked() {
                                        clicked = Some(i);
                                    }
                                }
                            });
                    });
                });
            state.popup_rect = Some(area.response.rect);

            if let Some(index) = clicked {
                if let Some(commit) = state.suggestions.commit_index(index, text, caret) {
                    committed |= state.apply_outcome(KeyOutcome::Committed(commit), text);
                }
            }
        } else {
            state.popup_rect = None;
        }

        if committed {
            response.mark_changed();
            ctx.request_repaint();
        }

        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::suggest::Commit;

    fn catalog() -> Vec<VariableBinding> {
        vec![
            VariableBinding::new("user_id", "1001"),
            VariableBinding::new("user_name", "alice"),
        ]
    }

    #[test]
    fn test_commit_writes_text_and_queues_caret() {
        let mut state = TokenFieldState::new();
        let mut text = String::from("go to {{us");
        state.suggestions.update(&text, 10, &catalog());
        state.last_caret = Some(10);

        let outcome = state.suggestions.handle_key(SuggestionKey::Enter, &text, 10);
        assert!(state.apply_outcome(outcome, &mut text));

        assert_eq!(text, "go to {{user_id}}");
        assert_eq!(state.pending_caret, Some(17));
        assert_eq!(state.caret(), Some(17));
        assert!(!state.suggestions().active);
    }

    #[test]
    fn test_dismiss_leaves_text_alone() {
        let mut state = TokenFieldState::new();
        let mut text = String::from("go to {{us");
        state.suggestions.update(&text, 10, &catalog());

        let outcome = state.suggestions.handle_key(SuggestionKey::Escape, &text, 10);
        assert!(!state.apply_outcome(outcome, &mut text));
        assert_eq!(text, "go to {{us");
        assert!(!state.has_pending_caret());
    }

    #[test]
    fn test_only_navigation_scrolls_to_highlight() {
        let mut state = TokenFieldState::new();
        let mut text = String::from("{{us");
        state.suggestions.update(&text, 4, &catalog());
        assert!(!state.scroll_to_highlight);

        let outcome = state.suggestions.handle_key(SuggestionKey::ArrowDown, &text, 4);
        assert!(!state.apply_outcome(outcome, &mut text));
        assert!(state.scroll_to_highlight);
        assert_eq!(state.suggestions().highlighted_index, 1);
    }

    #[test]
    fn test_request_caret_is_pending_until_shown() {
        let mut state = TokenFieldState::new();
        state.request_caret(3);
        assert!(state.has_pending_caret());
        assert!(state.popup_rect().is_none());
    }

    #[test]
    fn test_cancel_discards_pending_caret() {
        let mut state = TokenFieldState::new();
        let mut text = String::new();
        state.apply_outcome(
            KeyOutcome::Committed(Commit {
                text: "{{a}}".to_string(),
                caret: 5,
            }),
            &mut text,
        );
        assert!(state.has_pending_caret());

        state.cancel();
        assert!(!state.has_pending_caret());
        assert!(!state.suggestions().active);
    }

    #[test]
    fn test_show_in_headless_context() {
        let ctx = egui::Context::default();
        let mut text = String::from("Hello {{user_id}} at :id");
        let mut state = TokenFieldState::new();
        let variables = catalog();
        let paths = vec![PathBinding::new("id", "42")];

        for _ in 0..2 {
            let _ = ctx.run(egui::RawInput::default(), |ctx| {
                egui::CentralPanel::default().show(ctx, |ui| {
                    let response = TokenField::new(&mut text, &mut state, "test")
                        .variables(&variables)
                        .paths(&paths)
                        .show(ui);
                    assert!(!response.changed());
                });
            });
        }

        assert_eq!(text, "Hello {{user_id}} at :id");
        assert!(!state.suggestions().active);
    }
}
