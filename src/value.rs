//! The in-memory document value this validator operates on.
//!
//! A document-input layer (JSON/YAML/XML ingestion, out of scope for this
//! crate) is expected to produce values of this shape before handing them to
//! [`crate::Validator`].

use indexmap::IndexMap;

/// A single node in a semi-structured document tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    /// Stored as its canonical textual form; this crate never performs
    /// arithmetic on decimals, only kind-matching (see Non-goals).
    Decimal(String),
    String(String),
    List(Vec<Value>),
    Map(IndexMap<String, Value>),
    Element {
        tag: String,
        attributes: IndexMap<String, Value>,
        content: Vec<Value>,
    },
}

/// The discriminable kind of a [`Value`], independent of its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Null,
    Bool,
    Int,
    Float,
    Decimal,
    String,
    List,
    Map,
    Element,
}

impl Value {
    #[must_use]
    pub fn kind(&self) -> Kind {
        match self {
            Value::Null => Kind::Null,
            Value::Bool(_) => Kind::Bool,
            Value::Int(_) => Kind::Int,
            Value::Float(_) => Kind::Float,
            Value::Decimal(_) => Kind::Decimal,
            Value::String(_) => Kind::String,
            Value::List(_) => Kind::List,
            Value::Map(_) => Kind::Map,
            Value::Element { .. } => Kind::Element,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_map(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Value::Map(fields) => Some(fields),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_element(&self) -> Option<(&str, &IndexMap<String, Value>, &[Value])> {
        match self {
            Value::Element {
                tag,
                attributes,
                content,
            } => Some((tag.as_str(), attributes, content)),
            _ => None,
        }
    }

    #[must_use]
    pub fn map_get<'a>(&'a self, key: &str) -> Option<&'a Value> {
        match self {
            Value::Map(fields) => fields.get(key),
            Value::Element { attributes, .. } => attributes.get(key),
            _ => None,
        }
    }
}

impl Kind {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Kind::Null => "null",
            Kind::Bool => "bool",
            Kind::Int => "int",
            Kind::Float => "float",
            Kind::Decimal => "decimal",
            Kind::String => "string",
            Kind::List => "list",
            Kind::Map => "map",
            Kind::Element => "element",
        }
    }
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_matches_payload() {
        assert_eq!(Value::Null.kind(), Kind::Null);
        assert_eq!(Value::Bool(true).kind(), Kind::Bool);
        assert_eq!(Value::Int(1).kind(), Kind::Int);
        assert_eq!(Value::List(vec![]).kind(), Kind::List);
    }

    #[test]
    fn element_exposes_tag_attrs_and_content() {
        let mut attrs = IndexMap::new();
        attrs.insert("id".to_string(), Value::String("a".to_string()));
        let element = Value::Element {
            tag: "item".to_string(),
            attributes: attrs,
            content: vec![Value::Int(1)],
        };
        let (tag, attrs, content) = element.as_element().unwrap();
        assert_eq!(tag, "item");
        assert_eq!(attrs.get("id"), Some(&Value::String("a".to_string())));
        assert_eq!(content.len(), 1);
    }
}
