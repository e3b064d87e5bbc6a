//! The validator's name→SchemaType map (spec.md §3.5).

use crate::schema::SchemaType;
use ahash::AHashMap;

/// Flat, non-scoped map of schema names to their root type. Insertion is
/// idempotent: loading a schema under a name already present silently
/// replaces the prior binding.
#[derive(Debug, Default)]
pub struct Registry {
    types: AHashMap<String, SchemaType>,
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Registry::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, schema: SchemaType) {
        self.types.insert(name.into(), schema);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&SchemaType> {
        self.types.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Names currently bound, in unspecified order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::PrimitiveKind;

    #[test]
    fn insertion_is_idempotent_by_name() {
        let mut registry = Registry::new();
        registry.insert("T", SchemaType::primitive(PrimitiveKind::Int));
        registry.insert("T", SchemaType::primitive(PrimitiveKind::String));
        assert!(matches!(
            registry.get("T").unwrap().shape,
            crate::schema::Shape::Primitive(PrimitiveKind::String)
        ));
    }

    #[test]
    fn missing_name_is_none() {
        let registry = Registry::new();
        assert!(registry.get("nope").is_none());
        assert!(!registry.contains("nope"));
    }
}
