//! # tokenfield-rs: Token-aware single-line text input for egui
//!
//! An editable field that lets users embed `{{variable}}` references and
//! `:path` placeholders in free text, highlights them, shows their resolved
//! values on hover and suggests known variables while a `{{` reference is
//! being typed.
//!
//! ## Architecture
//!
//! - **Tokenizer**: Pure, lossless split of the raw value into segments
//! - **Suggestion engine**: Idle/Matching state machine with keyboard navigation
//!   and commit arithmetic
//! - **Position mapping**: Offset to pixel (popup placement) and pixel to
//!   offset (token clicks)
//! - **Resolution**: Variable and path lookups with an explicit not-found state
//! - **Frontend**: The egui widget, which layers a styled overlay over a
//!   transparent `TextEdit`
//!
//! The raw value is always owned by the caller. The widget derives
//! everything else from it each frame.
//!
//! ## Example
//!
//! ```ignore
//! use tokenfield_rs::{config::BindingCatalog, TokenField, TokenFieldState};
//!
//! struct MyApp {
//!     url: String,
//!     url_state: TokenFieldState,
//!     catalog: BindingCatalog,
//! }
//!
//! impl eframe::App for MyApp {
//!     fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
//!         egui::CentralPanel::default().show(ctx, |ui| {
//!             let response = TokenField::new(&mut self.url, &mut self.url_state, "url")
//!                 .variables(&self.catalog.variables)
//!                 .paths(&self.catalog.paths)
//!                 .show(ui);
//!             if response.changed() {
//!                 println!("new value: {}", self.url);
//!             }
//!         });
//!     }
//! }
//! ```

rust_i18n::i18n!("locales", fallback = "en");

pub mod config;
pub mod error;
pub mod frontend;
pub mod i18n;
pub mod position;
pub mod resolve;
pub mod suggest;
pub mod tokenizer;
pub mod types;

// Re-export commonly used types
pub use config::{AppState, BindingCatalog, WidgetSettings};
pub use error::{Result, TokenFieldError};
pub use frontend::{TokenField, TokenFieldApp, TokenFieldState};
pub use resolve::{CatalogResolver, VariableResolver};
pub use suggest::{commit, detect_trigger, filter_candidates, SuggestionState};
pub use tokenizer::tokenize;
pub use types::{PathBinding, Resolution, Segment, SegmentKind, VariableBinding};
