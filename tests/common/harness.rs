//! Headless egui driver for the token field
//!
//! Each [`FieldHarness::frame`] call runs one egui pass with the given input
//! events and reports what the field returned.

use egui::{Event, Key, Modifiers, PointerButton, Pos2, RawInput, Rect};
use tokenfield_rs::{BindingCatalog, TokenField, TokenFieldState};

/// What the field reported for one frame
#[derive(Debug, Clone, Copy)]
pub struct FrameResult {
    pub changed: bool,
    pub has_focus: bool,
    /// Outer rect of the text surface
    pub rect: Rect,
}

pub struct FieldHarness {
    pub ctx: egui::Context,
    pub text: String,
    pub state: TokenFieldState,
    pub catalog: BindingCatalog,
}

impl FieldHarness {
    pub fn new(text: &str, catalog: BindingCatalog) -> Self {
        Self {
            ctx: egui::Context::default(),
            text: text.to_string(),
            state: TokenFieldState::new(),
            catalog,
        }
    }

    /// Run one frame with `events`
    pub fn frame(&mut self, events: Vec<Event>) -> FrameResult {
        let input = RawInput {
            events,
            screen_rect: Some(Rect::from_min_size(Pos2::ZERO, egui::vec2(800.0, 600.0))),
            ..Default::default()
        };

        let mut result = None;
        let _ = self.ctx.run(input, |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                let response = TokenField::new(&mut self.text, &mut self.state, "field")
                    .variables(&self.catalog.variables)
                    .paths(&self.catalog.paths)
                    .show(ui);
                result = Some(FrameResult {
                    changed: response.changed(),
                    has_focus: response.has_focus(),
                    rect: response.rect,
                });
            });
        });
        result.expect("field was shown")
    }

    /// Run `count` frames without input
    pub fn idle(&mut self, count: usize) -> FrameResult {
        let mut last = self.frame(Vec::new());
        for _ in 1..count {
            last = self.frame(Vec::new());
        }
        last
    }

    /// Focus the field with the caret at `caret` and let it settle
    pub fn focus_at(&mut self, caret: usize) -> FrameResult {
        self.state.request_caret(caret);
        self.idle(3)
    }

    /// Press then release the primary button at `pos`, over two frames.
    /// Returns the result of the release frame.
    pub fn click(&mut self, pos: Pos2) -> FrameResult {
        self.frame(vec![
            Event::PointerMoved(pos),
            pointer_button(pos, true),
        ]);
        self.frame(vec![pointer_button(pos, false)])
    }
}

pub fn key(key: Key) -> Event {
    Event::Key {
        key,
        physical_key: None,
        pressed: true,
        repeat: false,
        modifiers: Modifiers::NONE,
    }
}

pub fn typed(text: &str) -> Event {
    Event::Text(text.to_string())
}

fn pointer_button(pos: Pos2, pressed: bool) -> Event {
    Event::PointerButton {
        pos,
        button: PointerButton::Primary,
        pressed,
        modifiers: Modifiers::NONE,
    }
}
