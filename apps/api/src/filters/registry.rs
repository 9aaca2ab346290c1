//! Filter Registry: append-only during startup, immutable afterwards.
//!
//! `FilterRegistryBuilder::register` rejects duplicate names so configuration
//! mistakes surface before the server accepts any run. `build()` freezes the
//! table, sorted by priority with registration order breaking ties.

use std::collections::HashSet;
use std::sync::Arc;

use thiserror::Error;

use super::Filter;

#[derive(Debug, Error, PartialEq)]
pub enum RegistryError {
    #[error("filter '{0}' is already registered")]
    DuplicateName(String),

    #[error("filter '{name}' has threshold {threshold} outside [0, 1]")]
    InvalidThreshold { name: String, threshold: f64 },
}

#[derive(Default)]
pub struct FilterRegistryBuilder {
    filters: Vec<Arc<dyn Filter>>,
    names: HashSet<String>,
}

impl FilterRegistryBuilder {
    pub fn register(&mut self, filter: Arc<dyn Filter>) -> Result<&mut Self, RegistryError> {
        let name = filter.name().to_string();
        let threshold = filter.threshold();
        if !(0.0..=1.0).contains(&threshold) {
            return Err(RegistryError::InvalidThreshold { name, threshold });
        }
        if !self.names.insert(name.clone()) {
            return Err(RegistryError::DuplicateName(name));
        }
        self.filters.push(filter);
        Ok(self)
    }

    pub fn build(mut self) -> FilterRegistry {
        // Stable sort keeps registration order for equal priorities.
        self.filters.sort_by_key(|f| f.priority());
        FilterRegistry {
            filters: self.filters,
        }
    }
}

/// Read-only filter table shared by every run via `Arc<FilterRegistry>`.
pub struct FilterRegistry {
    filters: Vec<Arc<dyn Filter>>,
}

impl FilterRegistry {
    pub fn builder() -> FilterRegistryBuilder {
        FilterRegistryBuilder::default()
    }

    /// All filters in priority order.
    pub fn filters(&self) -> &[Arc<dyn Filter>] {
        &self.filters
    }

    #[cfg(test)]
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Filter>> {
        self.filters.iter().find(|f| f.name() == name)
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{Behavior, StubFilter};
    use super::*;

    fn stub(name: &str, priority: i32) -> Arc<dyn Filter> {
        Arc::new(StubFilter::new(name, priority, 0.5, Behavior::Score(1.0)))
    }

    #[test]
    fn test_build_sorts_by_priority() {
        let mut builder = FilterRegistry::builder();
        builder.register(stub("c", 3)).unwrap();
        builder.register(stub("a", 1)).unwrap();
        builder.register(stub("b", 2)).unwrap();
        let registry = builder.build();

        let names: Vec<&str> = registry.filters().iter().map(|f| f.name()).collect();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[test]
    fn test_equal_priorities_keep_registration_order() {
        let mut builder = FilterRegistry::builder();
        builder
            .register(stub("second", 1))
            .unwrap()
            .register(stub("first", 0))
            .unwrap()
            .register(stub("third", 1))
            .unwrap();
        let registry = builder.build();

        let names: Vec<&str> = registry.filters().iter().map(|f| f.name()).collect();
        assert_eq!(names, ["first", "second", "third"]);
    }

    #[test]
    fn test_duplicate_name_is_rejected() {
        let mut builder = FilterRegistry::builder();
        builder.register(stub("KeywordMatcher", 1)).unwrap();
        let err = builder.register(stub("KeywordMatcher", 2)).err().unwrap();
        assert_eq!(err, RegistryError::DuplicateName("KeywordMatcher".to_string()));
    }

    #[test]
    fn test_out_of_range_threshold_is_rejected() {
        let mut builder = FilterRegistry::builder();
        let filter = Arc::new(StubFilter::new("x", 0, 1.5, Behavior::Score(1.0)));
        assert!(matches!(
            builder.register(filter),
            Err(RegistryError::InvalidThreshold { .. })
        ));
    }

    #[test]
    fn test_lookup_by_name() {
        let mut builder = FilterRegistry::builder();
        builder.register(stub("a", 1)).unwrap();
        let registry = builder.build();
        assert!(registry.get("a").is_some());
        assert!(registry.get("missing").is_none());
        assert_eq!(registry.len(), 1);
        assert!(!registry.is_empty());
    }
}
