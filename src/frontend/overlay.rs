//! Presentational overlay for the token field
//!
//! The text surface (an `egui::TextEdit` drawn with transparent text) owns all
//! editing behaviour. This module builds what is painted on top of it: a
//! [`LayoutJob`] with one section per segment, using the surface's font so
//! glyph positions match exactly, plus the screen rectangles of every token so
//! the widget can attach click and hover targets to them.
//!
//! Token styling only changes colour, background and underline, never the
//! font, so the overlay galley has the same metrics as the surface galley.

use egui::{
    text::{CCursor, LayoutJob},
    Color32, FontId, Galley, Pos2, Rect, Stroke, TextFormat,
};

use crate::types::{Segment, SegmentKind};

/// Colours used to paint segments
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayStyle {
    pub text: Color32,
    pub variable: Color32,
    pub path: Color32,
    /// Fill behind tokens
    pub token_background: Color32,
    /// Underline drawn under tokens without a binding
    pub unresolved: Option<Stroke>,
}

impl OverlayStyle {
    pub fn color_for(&self, kind: SegmentKind) -> Color32 {
        match kind {
            SegmentKind::Text => self.text,
            SegmentKind::Variable => self.variable,
            SegmentKind::PathVariable => self.path,
        }
    }
}

/// Build the overlay layout for a single line of segments.
///
/// `is_resolved` receives the segment index and is only consulted for tokens.
pub fn build_overlay_job(
    segments: &[Segment],
    font_id: &FontId,
    style: &OverlayStyle,
    is_resolved: impl Fn(usize, &Segment) -> bool,
) -> LayoutJob {
    let mut job = LayoutJob {
        break_on_newline: false,
        ..Default::default()
    };
    job.wrap.max_width = f32::INFINITY;

    for (index, segment) in segments.iter().enumerate() {
        let mut format = TextFormat {
            font_id: font_id.clone(),
            color: style.color_for(segment.kind),
            ..Default::default()
        };

        if segment.is_token() {
            format.background = style.token_background;
            if let Some(stroke) = style.unresolved {
                if !is_resolved(index, segment) {
                    format.underline = stroke;
                }
            }
        }

        job.append(&segment.content, 0.0, format);
    }

    job
}

/// Keeps the overlay's horizontal scroll equal to the text surface's.
///
/// The surface reports where it placed its galley after scrolling
/// (`galley_pos`) and the left edge of its clip rect; the difference is the
/// scroll offset the overlay must use in the same frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollSync {
    offset: f32,
}

impl ScrollSync {
    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Update from the surface's layout and return the current offset
    pub fn sync(&mut self, clip_left: f32, galley_left: f32) -> f32 {
        let offset = (clip_left - galley_left).max(0.0);
        if (offset - self.offset).abs() > f32::EPSILON {
            tracing::trace!(from = self.offset, to = offset, "overlay scroll offset changed");
            self.offset = offset;
        }
        self.offset
    }
}

/// Screen rectangle of one token
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TokenSpan {
    /// Index into the segment list
    pub segment_index: usize,
    pub rect: Rect,
}

/// Rectangles of every token segment, in screen space.
///
/// `galley` must be laid out from the same text the segments came from, and
/// `galley_pos` is where it is painted.
pub fn token_spans(galley: &Galley, segments: &[Segment], galley_pos: Pos2) -> Vec<TokenSpan> {
    segments
        .iter()
        .enumerate()
        .filter(|(_, segment)| segment.is_token())
        .map(|(segment_index, segment)| {
            let start = galley.pos_from_cursor(CCursor::new(segment.start_offset));
            let end = galley.pos_from_cursor(CCursor::new(segment.end_offset()));
            let rect = Rect::from_min_max(
                Pos2::new(start.min.x, start.min.y),
                Pos2::new(end.min.x, start.max.y),
            )
            .translate(galley_pos.to_vec2());
            TokenSpan {
                segment_index,
                rect,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize;

    fn style() -> OverlayStyle {
        OverlayStyle {
            text: Color32::WHITE,
            variable: Color32::BLUE,
            path: Color32::RED,
            token_background: Color32::from_gray(40),
            unresolved: Some(Stroke::new(1.0, Color32::YELLOW)),
        }
    }

    #[test]
    fn test_job_has_one_section_per_segment() {
        let segments = tokenize("GET {{BASE_URL}}/users/:id");
        let job = build_overlay_job(&segments, &FontId::monospace(12.0), &style(), |_, _| true);

        assert_eq!(job.text, "GET {{BASE_URL}}/users/:id");
        assert_eq!(job.sections.len(), segments.len());
        assert_eq!(job.sections[1].format.color, Color32::BLUE);
        assert_eq!(job.sections[3].format.color, Color32::RED);
        assert_eq!(job.sections[0].format.background, Color32::TRANSPARENT);
        assert!(!job.break_on_newline);
    }

    #[test]
    fn test_unresolved_tokens_are_underlined() {
        let segments = tokenize("{{known}} {{missing}}");
        let job = build_overlay_job(&segments, &FontId::monospace(12.0), &style(), |_, s| {
            s.name.as_deref() == Some("known")
        });

        assert_eq!(job.sections[0].format.underline, Stroke::NONE);
        assert_eq!(job.sections[2].format.underline.width, 1.0);
    }

    #[test]
    fn test_font_is_uniform() {
        let font = FontId::proportional(15.0);
        let segments = tokenize("a {{b}} :c");
        let job = build_overlay_job(&segments, &font, &style(), |_, _| false);
        assert!(job.sections.iter().all(|s| s.format.font_id == font));
    }

    #[test]
    fn test_scroll_sync() {
        let mut sync = ScrollSync::default();
        assert_eq!(sync.sync(10.0, 10.0), 0.0);
        assert_eq!(sync.sync(10.0, -35.0), 45.0);
        assert_eq!(sync.offset(), 45.0);
        // Galley right of the clip edge (centred text) is not a scroll
        assert_eq!(sync.sync(10.0, 20.0), 0.0);
    }
}
