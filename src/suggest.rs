//! Variable suggestion engine
//!
//! Tracks whether the caret sits inside a half-typed `{{name` reference and,
//! if so, which known variables match what has been typed so far.
//!
//! # States
//!
//! - **Idle**: no popup.
//! - **Matching**: the text left of the caret ends with `{{` followed only by
//!   identifier characters. `query` holds those characters.
//!
//! The state is derived: [`SuggestionState::update`] recomputes it from the
//! raw value and caret each time either changes. Keyboard input goes through
//! [`SuggestionState::handle_key`]; a commit produces a [`Commit`] holding the
//! new raw value and caret that the caller feeds back through its normal
//! change channel.

use crate::tokenizer::is_ident_char;
use crate::types::{char_to_byte, VariableBinding};

/// Where an in-progress `{{` reference starts and what has been typed after it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trigger {
    /// Character offset of the opening `{{`
    pub trigger_offset: usize,
    /// Identifier characters between `{{` and the caret
    pub query: String,
}

/// Find an open `{{ident` immediately left of `caret` (a character offset).
///
/// Equivalent to matching `\{\{([A-Za-z0-9_]*)$` against `text[..caret]`.
pub fn detect_trigger(text: &str, caret: usize) -> Option<Trigger> {
    let before: Vec<char> = text.chars().take(caret).collect();
    if before.len() < caret {
        // Caret past the end of the text
        return None;
    }

    let mut query_start = before.len();
    while query_start > 0 && is_ident_char(before[query_start - 1]) {
        query_start -= 1;
    }

    if query_start < 2 || before[query_start - 1] != '{' || before[query_start - 2] != '{' {
        return None;
    }

    Some(Trigger {
        trigger_offset: query_start - 2,
        query: before[query_start..].iter().collect(),
    })
}

/// Case-insensitive substring filter, preserving catalog order
pub fn filter_candidates(catalog: &[VariableBinding], query: &str) -> Vec<VariableBinding> {
    let query_lower = query.to_lowercase();
    catalog
        .iter()
        .filter(|binding| binding.key.to_lowercase().contains(&query_lower))
        .cloned()
        .collect()
}

/// A new raw value and caret produced by committing a suggestion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub text: String,
    /// Character offset of the caret after the inserted `}}`
    pub caret: usize,
}

/// Replace `text[trigger_offset..caret]` with `{{key}}`.
///
/// Both offsets count characters. The caret lands right after the closing
/// braces: `trigger_offset + key.len() + 4`.
pub fn commit(text: &str, trigger_offset: usize, caret: usize, key: &str) -> Commit {
    let caret = caret.max(trigger_offset);
    let prefix = &text[..char_to_byte(text, trigger_offset)];
    let suffix = &text[char_to_byte(text, caret)..];

    let mut new_text = String::with_capacity(prefix.len() + key.len() + 4 + suffix.len());
    new_text.push_str(prefix);
    new_text.push_str("{{");
    new_text.push_str(key);
    new_text.push_str("}}");
    new_text.push_str(suffix);

    Commit {
        text: new_text,
        caret: prefix.chars().count() + key.chars().count() + 4,
    }
}

/// Keys the suggestion popup reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionKey {
    ArrowDown,
    ArrowUp,
    Enter,
    Tab,
    Escape,
}

/// What happened in response to a key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Not matching; the key belongs to the text surface
    Ignored,
    /// Highlight moved
    Navigated,
    /// Enter/Tab with no candidates; still matching
    NothingToCommit,
    /// Escape; back to idle with the text untouched
    Dismissed,
    Committed(Commit),
}

/// Current phase of the suggestion state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionPhase {
    Idle,
    Matching,
}

/// Derived suggestion state for one widget instance
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuggestionState {
    /// Whether the popup is open
    pub active: bool,
    /// Character offset of the opening `{{`
    pub trigger_offset: usize,
    /// Identifier typed so far
    pub query: String,
    /// Filtered catalog entries, in catalog order
    pub candidates: Vec<VariableBinding>,
    /// Highlighted candidate index
    pub highlighted_index: usize,
}

impl SuggestionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> SuggestionPhase {
        if self.active {
            SuggestionPhase::Matching
        } else {
            SuggestionPhase::Idle
        }
    }

    /// Recompute from the raw value, caret and catalog.
    ///
    /// The highlight resets to 0 when the query changes (or matching starts)
    /// and is otherwise kept, clamped to the candidate count.
    pub fn update(&mut self, text: &str, caret: usize, catalog: &[VariableBinding]) {
        let Some(trigger) = detect_trigger(text, caret) else {
            if self.active {
                tracing::trace!("suggestions: Matching -> Idle (caret left reference)");
            }
            self.reset();
            return;
        };

        let query_changed = !self.active
            || self.query != trigger.query
            || self.trigger_offset != trigger.trigger_offset;

        if !self.active {
            tracing::trace!(
                trigger_offset = trigger.trigger_offset,
                query = %trigger.query,
                "suggestions: Idle -> Matching"
            );
        }

        self.active = true;
        self.trigger_offset = trigger.trigger_offset;
        self.query = trigger.query;
        self.candidates = filter_candidates(catalog, &self.query);

        if query_changed || self.highlighted_index >= self.candidates.len() {
            self.highlighted_index = 0;
        }
    }

    /// Back to idle
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Advance the highlight, wrapping around
    pub fn select_next(&mut self) {
        if !self.candidates.is_empty() {
            self.highlighted_index = (self.highlighted_index + 1) % self.candidates.len();
        }
    }

    /// Retreat the highlight, wrapping around
    pub fn select_prev(&mut self) {
        if !self.candidates.is_empty() {
            self.highlighted_index = if self.highlighted_index == 0 {
                self.candidates.len() - 1
            } else {
                self.highlighted_index - 1
            };
        }
    }

    /// Get the currently highlighted candidate
    pub fn highlighted(&self) -> Option<&VariableBinding> {
        self.candidates.get(self.highlighted_index)
    }

    /// Apply a key press while the popup may be open
    pub fn handle_key(&mut self, key: SuggestionKey, text: &str, caret: usize) -> KeyOutcome {
        if !self.active {
            return KeyOutcome::Ignored;
        }

        match key {
            SuggestionKey::ArrowDown => {
                self.select_next();
                KeyOutcome::Navigated
            }
            SuggestionKey::ArrowUp => {
                self.select_prev();
                KeyOutcome::Navigated
            }
            SuggestionKey::Enter | SuggestionKey::Tab => {
                match self.commit_index(self.highlighted_index, text, caret) {
                    Some(commit) => KeyOutcome::Committed(commit),
                    None => KeyOutcome::NothingToCommit,
                }
            }
            SuggestionKey::Escape => {
                tracing::trace!("suggestions: Matching -> Idle (escape)");
                self.reset();
                KeyOutcome::Dismissed
            }
        }
    }

    /// Commit the candidate at `index`; used by both Enter and pointer clicks.
    ///
    /// Returns `None` and leaves the state untouched when `index` is out of range.
    pub fn commit_index(&mut self, index: usize, text: &str, caret: usize) -> Option<Commit> {
        if !self.active {
            return None;
        }
        let key = self.candidates.get(index)?.key.clone();
        let result = commit(text, self.trigger_offset, caret, &key);
        tracing::trace!(key = %key, caret = result.caret, "suggestions: committed");
        self.reset();
        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog(keys: &[&str]) -> Vec<VariableBinding> {
        keys.iter()
            .map(|k| VariableBinding::new(*k, format!("value of {}", k)))
            .collect()
    }

    fn keys(state: &SuggestionState) -> Vec<&str> {
        state.candidates.iter().map(|c| c.key.as_str()).collect()
    }

    #[test]
    fn test_detect_trigger() {
        assert_eq!(
            detect_trigger("go to {{us", 10),
            Some(Trigger {
                trigger_offset: 6,
                query: "us".to_string()
            })
        );
        assert_eq!(
            detect_trigger("{{", 2),
            Some(Trigger {
                trigger_offset: 0,
                query: String::new()
            })
        );
        assert_eq!(detect_trigger("{{us", 1), None);
        assert_eq!(detect_trigger("{{us er", 7), None);
        assert_eq!(detect_trigger("{{user}}", 8), None);
        assert_eq!(detect_trigger("{ {x", 4), None);
        assert_eq!(detect_trigger("abc", 10), None);
    }

    #[test]
    fn test_detect_trigger_mid_text() {
        // Caret right after "{{ba" with more text after it
        let trigger = detect_trigger("x {{base}} y", 6).unwrap();
        assert_eq!(trigger.trigger_offset, 2);
        assert_eq!(trigger.query, "ba");
    }

    #[test]
    fn test_triple_brace_uses_last_pair() {
        let trigger = detect_trigger("{{{ab", 5).unwrap();
        assert_eq!(trigger.trigger_offset, 1);
        assert_eq!(trigger.query, "ab");
    }

    #[test]
    fn test_filter_is_case_insensitive_substring() {
        let cat = catalog(&["BASE_URL", "base_token", "API_KEY"]);
        let found: Vec<_> = filter_candidates(&cat, "base")
            .into_iter()
            .map(|b| b.key)
            .collect();
        assert_eq!(found, vec!["BASE_URL", "base_token"]);

        assert_eq!(filter_candidates(&cat, "").len(), 3);
        assert_eq!(filter_candidates(&cat, "_k").len(), 1);
    }

    #[test]
    fn test_update_enters_and_leaves_matching() {
        let cat = catalog(&["BASE_URL", "base_token", "API_KEY"]);
        let mut state = SuggestionState::new();

        state.update("{{base", 6, &cat);
        assert_eq!(state.phase(), SuggestionPhase::Matching);
        assert_eq!(state.trigger_offset, 0);
        assert_eq!(state.query, "base");
        assert_eq!(keys(&state), vec!["BASE_URL", "base_token"]);

        // Caret moved before the braces
        state.update("{{base", 1, &cat);
        assert_eq!(state.phase(), SuggestionPhase::Idle);
        assert!(state.candidates.is_empty());
    }

    #[test]
    fn test_highlight_resets_on_query_change() {
        let cat = catalog(&["a1", "a2", "a3"]);
        let mut state = SuggestionState::new();

        state.update("{{a", 3, &cat);
        state.select_next();
        assert_eq!(state.highlighted_index, 1);

        // Same query, same highlight
        state.update("{{a", 3, &cat);
        assert_eq!(state.highlighted_index, 1);

        state.update("{{a2", 4, &cat);
        assert_eq!(state.highlighted_index, 0);
    }

    #[test]
    fn test_wraparound_navigation() {
        let cat = catalog(&["x1", "x2", "x3"]);
        let mut state = SuggestionState::new();
        state.update("{{x", 3, &cat);

        state.highlighted_index = 2;
        assert_eq!(
            state.handle_key(SuggestionKey::ArrowDown, "{{x", 3),
            KeyOutcome::Navigated
        );
        assert_eq!(state.highlighted_index, 0);

        state.handle_key(SuggestionKey::ArrowUp, "{{x", 3);
        assert_eq!(state.highlighted_index, 2);
    }

    #[test]
    fn test_commit_arithmetic() {
        let text = "go to {{us";
        let result = commit(text, 6, 10, "user_id");
        assert_eq!(result.text, "go to {{user_id}}");
        assert_eq!(result.caret, "go to ".len() + "user_id".len() + 4);
    }

    #[test]
    fn test_commit_keeps_suffix() {
        let result = commit("a {{us b", 2, 6, "user");
        assert_eq!(result.text, "a {{user}} b");
        assert_eq!(result.caret, 10);
    }

    #[test]
    fn test_commit_with_multibyte_prefix() {
        let result = commit("é {{x", 2, 5, "xyz");
        assert_eq!(result.text, "é {{xyz}}");
        assert_eq!(result.caret, 9);
    }

    #[test]
    fn test_enter_commits_highlighted() {
        let cat = catalog(&["user_id", "user_name"]);
        let mut state = SuggestionState::new();
        let text = "go to {{us";
        state.update(text, 10, &cat);
        state.select_next();

        let outcome = state.handle_key(SuggestionKey::Enter, text, 10);
        assert_eq!(
            outcome,
            KeyOutcome::Committed(Commit {
                text: "go to {{user_name}}".to_string(),
                caret: 19,
            })
        );
        assert_eq!(state.phase(), SuggestionPhase::Idle);
    }

    #[test]
    fn test_enter_without_candidates_keeps_matching() {
        let cat = catalog(&["API_KEY"]);
        let mut state = SuggestionState::new();
        state.update("{{zzz", 5, &cat);
        let before = state.clone();

        assert_eq!(
            state.handle_key(SuggestionKey::Enter, "{{zzz", 5),
            KeyOutcome::NothingToCommit
        );
        assert_eq!(state, before);
        assert_eq!(state.phase(), SuggestionPhase::Matching);
    }

    #[test]
    fn test_escape_is_pure_noop_on_text() {
        let cat = catalog(&["user"]);
        let mut state = SuggestionState::new();
        let text = String::from("hi {{u");
        state.update(&text, 6, &cat);

        assert_eq!(
            state.handle_key(SuggestionKey::Escape, &text, 6),
            KeyOutcome::Dismissed
        );
        assert_eq!(text, "hi {{u");
        assert_eq!(state.phase(), SuggestionPhase::Idle);
    }

    #[test]
    fn test_keys_ignored_when_idle() {
        let mut state = SuggestionState::new();
        assert_eq!(
            state.handle_key(SuggestionKey::Enter, "plain", 5),
            KeyOutcome::Ignored
        );
    }

    #[test]
    fn test_commit_index_out_of_range() {
        let cat = catalog(&["only"]);
        let mut state = SuggestionState::new();
        state.update("{{o", 3, &cat);
        assert!(state.commit_index(5, "{{o", 3).is_none());
        assert!(state.active);

        let click = state.commit_index(0, "{{o", 3).unwrap();
        assert_eq!(click.text, "{{only}}");
        assert_eq!(click.caret, 8);
    }
}
