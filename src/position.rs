//! Mapping between character offsets and pixel positions
//!
//! Two directions are needed by the widget:
//!
//! - **Offset to pixel**: place the suggestion popup under the caret by
//!   measuring the text before it ([`TextMeasure`], [`popup_x`]).
//! - **Pixel to offset**: turn a click on a token into a caret position
//!   ([`CaretHitTest`], [`offset_from_click`]). When no hit-testing is
//!   available the caret goes to the end of the clicked token.
//!
//! The egui implementations measure with the same font the text surface
//! uses so popup placement and caret placement agree with what is drawn.

use std::sync::Arc;

use egui::{text::CCursor, Color32, FontId, Galley};

use crate::types::{char_to_byte, Segment};

/// Measures rendered text width
pub trait TextMeasure {
    /// Width in points of the first `char_offset` characters of `text`
    fn prefix_width(&self, text: &str, char_offset: usize) -> f32;
}

/// Finds the caret position under a pointer inside a token
pub trait CaretHitTest {
    /// Character offset within `segment` closest to `x`, where `x` is measured
    /// from the left edge of the token. `None` if hit-testing is unavailable.
    fn local_caret(&self, segment: &Segment, x: f32) -> Option<usize>;
}

/// Fixed-advance measurement, for monospace fonts and tests
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceMeasure {
    pub advance: f32,
}

impl MonospaceMeasure {
    pub fn new(advance: f32) -> Self {
        Self { advance }
    }
}

impl TextMeasure for MonospaceMeasure {
    fn prefix_width(&self, text: &str, char_offset: usize) -> f32 {
        text.chars().take(char_offset).count() as f32 * self.advance
    }
}

impl CaretHitTest for MonospaceMeasure {
    fn local_caret(&self, segment: &Segment, x: f32) -> Option<usize> {
        if self.advance <= 0.0 {
            return None;
        }
        let index = (x / self.advance).round().max(0.0) as usize;
        Some(index.min(segment.char_len()))
    }
}

/// No pointer hit-testing; clicks always land at the end of the token
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHitTest;

impl CaretHitTest for NoHitTest {
    fn local_caret(&self, _segment: &Segment, _x: f32) -> Option<usize> {
        None
    }
}

/// Measurement through egui's font system
pub struct FontMeasure<'a> {
    ctx: &'a egui::Context,
    font_id: FontId,
}

impl<'a> FontMeasure<'a> {
    pub fn new(ctx: &'a egui::Context, font_id: FontId) -> Self {
        Self { ctx, font_id }
    }
}

impl TextMeasure for FontMeasure<'_> {
    fn prefix_width(&self, text: &str, char_offset: usize) -> f32 {
        let prefix = text[..char_to_byte(text, char_offset)].to_string();
        let font_id = self.font_id.clone();
        self.ctx
            .fonts_mut(|fonts| fonts.layout_no_wrap(prefix, font_id, Color32::PLACEHOLDER))
            .size()
            .x
    }
}

/// Hit-testing against the text surface's laid-out galley
pub struct GalleyHitTest {
    galley: Arc<Galley>,
}

impl GalleyHitTest {
    pub fn new(galley: Arc<Galley>) -> Self {
        Self { galley }
    }
}

impl CaretHitTest for GalleyHitTest {
    fn local_caret(&self, segment: &Segment, x: f32) -> Option<usize> {
        let token_left = self
            .galley
            .pos_from_cursor(CCursor::new(segment.start_offset))
            .min
            .x;
        let y = self.galley.rect.center().y;
        let cursor = self.galley.cursor_from_pos(egui::vec2(token_left + x, y));
        let local = cursor.index.saturating_sub(segment.start_offset);
        Some(local.min(segment.char_len()))
    }
}

/// Horizontal position of the popup under the caret.
///
/// `surface_left` is the left edge of the text (inside any margin) and
/// `scroll_offset` the surface's current horizontal scroll.
pub fn popup_x(
    measure: &impl TextMeasure,
    text: &str,
    caret: usize,
    surface_left: f32,
    scroll_offset: f32,
) -> f32 {
    surface_left + measure.prefix_width(text, caret) - scroll_offset
}

/// Absolute caret offset for a click at `x` (relative to the token's left edge)
pub fn offset_from_click(hit_test: &impl CaretHitTest, segment: &Segment, x: f32) -> usize {
    let local = hit_test
        .local_caret(segment, x)
        .map_or(segment.char_len(), |local| local.min(segment.char_len()));
    segment.start_offset + local
}
