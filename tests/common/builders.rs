//! Test data builders for creating test objects

use tokenfield_rs::{BindingCatalog, PathBinding, VariableBinding};

/// Builder for creating test catalogs
#[derive(Default)]
pub struct CatalogBuilder {
    variables: Vec<VariableBinding>,
    paths: Vec<PathBinding>,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog with the given variable keys, each valued `value of <key>`
    pub fn with_keys(keys: &[&str]) -> Self {
        keys.iter().fold(Self::new(), |builder, key| {
            builder.variable(key, &format!("value of {}", key))
        })
    }

    pub fn variable(mut self, key: &str, value: &str) -> Self {
        self.variables.push(VariableBinding::new(key, value));
        self
    }

    pub fn path(mut self, key: &str, value: &str) -> Self {
        self.paths.push(PathBinding::new(key, value));
        self
    }

    pub fn build(self) -> BindingCatalog {
        BindingCatalog::new(self.variables, self.paths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_builder() {
        let catalog = CatalogBuilder::with_keys(&["A", "B"])
            .path("id", "42")
            .build();

        assert_eq!(catalog.variables.len(), 2);
        assert_eq!(catalog.variables[1].value, "value of B");
        assert_eq!(catalog.paths, vec![PathBinding::new("id", "42")]);
    }
}
