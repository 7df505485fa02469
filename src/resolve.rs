//! Token value resolution for hover tooltips
//!
//! Variables go through a caller-supplied [`VariableResolver`], which receives
//! the token in decorated form (`{{name}}`). When the caller supplies none,
//! the variable catalog is searched by exact key instead. Path placeholders
//! are always looked up by exact key in the path catalog.
//!
//! A missing binding is [`Resolution::NotFound`], never an empty string.

use crate::types::{PathBinding, Resolution, Segment, SegmentKind, VariableBinding};

/// Resolves a decorated variable token to its current value
#[cfg_attr(test, mockall::automock)]
pub trait VariableResolver {
    /// `token` includes its braces, e.g. `{{user}}`
    fn resolve(&self, token: &str) -> Option<String>;
}

impl<F> VariableResolver for F
where
    F: Fn(&str) -> Option<String>,
{
    fn resolve(&self, token: &str) -> Option<String> {
        self(token)
    }
}

/// Resolver backed by a variable catalog
#[derive(Debug, Clone, Copy)]
pub struct CatalogResolver<'a> {
    variables: &'a [VariableBinding],
}

impl<'a> CatalogResolver<'a> {
    pub fn new(variables: &'a [VariableBinding]) -> Self {
        Self { variables }
    }
}

impl VariableResolver for CatalogResolver<'_> {
    fn resolve(&self, token: &str) -> Option<String> {
        let name = undecorate(token);
        self.variables
            .iter()
            .find(|b| b.key == name)
            .map(|b| b.value.clone())
    }
}

/// `user` -> `{{user}}`
pub fn decorate(name: &str) -> String {
    format!("{{{{{}}}}}", name)
}

/// `{{ user }}` -> `user`; anything else is returned trimmed
pub fn undecorate(token: &str) -> &str {
    token
        .strip_prefix("{{")
        .and_then(|t| t.strip_suffix("}}"))
        .unwrap_or(token)
        .trim()
}

/// Exact-match lookup in the path catalog
pub fn resolve_path(paths: &[PathBinding], name: &str) -> Resolution {
    paths
        .iter()
        .find(|b| b.key == name)
        .map(|b| b.value.clone())
        .into()
}

/// Resolve a token segment. Text segments have no value and yield `None`.
pub fn resolve_segment(
    segment: &Segment,
    resolver: Option<&dyn VariableResolver>,
    variables: &[VariableBinding],
    paths: &[PathBinding],
) -> Option<Resolution> {
    let name = segment.name.as_deref()?;
    let resolution = match segment.kind {
        SegmentKind::Text => return None,
        SegmentKind::Variable => {
            let token = decorate(name);
            match resolver {
                Some(resolver) => resolver.resolve(&token).into(),
                None => CatalogResolver::new(variables).resolve(&token).into(),
            }
        }
        SegmentKind::PathVariable => resolve_path(paths, name),
    };
    Some(resolution)
}
