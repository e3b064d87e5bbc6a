//! The schema type model: a tagged variant describing each schema shape,
//! plus factory constructors (spec.md §3.2, §4.2).

use crate::value::{Kind, Value};

/// Primitive kinds a [`SchemaType::Primitive`] can describe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveKind {
    Null,
    Bool,
    Int,
    Float,
    Decimal,
    String,
    /// Matches `Int`, `Float`, or `Decimal`.
    Number,
    /// Matches every kind.
    Any,
}

impl PrimitiveKind {
    /// Whether `value`'s kind is accepted by this primitive, per the
    /// compatibility table in spec.md §4.4.2.
    #[must_use]
    pub fn accepts(self, kind: Kind) -> bool {
        match self {
            PrimitiveKind::Any => true,
            PrimitiveKind::Number => matches!(kind, Kind::Int | Kind::Float | Kind::Decimal),
            PrimitiveKind::Null => kind == Kind::Null,
            PrimitiveKind::Bool => kind == Kind::Bool,
            PrimitiveKind::Int => kind == Kind::Int,
            PrimitiveKind::Float => kind == Kind::Float,
            PrimitiveKind::Decimal => kind == Kind::Decimal,
            PrimitiveKind::String => kind == Kind::String,
        }
    }
}

impl std::fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PrimitiveKind::Null => "null",
            PrimitiveKind::Bool => "bool",
            PrimitiveKind::Int => "int",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Decimal => "decimal",
            PrimitiveKind::String => "string",
            PrimitiveKind::Number => "number",
            PrimitiveKind::Any => "any",
        };
        f.write_str(name)
    }
}

/// Occurrence (multiplicity) qualifier, spec.md §3.2/§6.1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occurrence {
    /// No multiplicity beyond "this is a list" — the unqualified `[T]` form.
    Exactly,
    /// `T?` — zero or one.
    Optional,
    /// `T+` — one or more.
    OneOrMore,
    /// `T*` — zero or more.
    ZeroOrMore,
}

impl Occurrence {
    /// Whether a list of length `len` satisfies this occurrence, spec.md
    /// §4.4.2's List table.
    #[must_use]
    pub fn accepts_len(self, len: usize) -> bool {
        match self {
            Occurrence::Exactly | Occurrence::ZeroOrMore => true,
            Occurrence::Optional => len <= 1,
            Occurrence::OneOrMore => len >= 1,
        }
    }

    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            Occurrence::Exactly => "",
            Occurrence::Optional => "?",
            Occurrence::OneOrMore => "+",
            Occurrence::ZeroOrMore => "*",
        }
    }
}

/// One declared field of a [`SchemaType::Map`] or the attribute set of a
/// [`SchemaType::Element`].
#[derive(Debug, Clone)]
pub struct Field {
    pub name: String,
    pub type_expr: SchemaType,
    pub required: bool,
}

impl Field {
    #[must_use]
    pub fn required(name: impl Into<String>, type_expr: SchemaType) -> Self {
        Field {
            name: name.into(),
            type_expr,
            required: true,
        }
    }

    #[must_use]
    pub fn optional(name: impl Into<String>, type_expr: SchemaType) -> Self {
        Field {
            name: name.into(),
            type_expr,
            required: false,
        }
    }
}

/// A node in the schema type graph. Every node may carry the name it was
/// bound under via `type NAME = EXPR`; unnamed (inline) nodes leave it
/// `None`. The graph may contain cycles through [`Shape::Reference`];
/// cycle-safety is the traversal's responsibility (spec.md §3.2, §4.4.2).
#[derive(Debug, Clone)]
pub struct SchemaType {
    pub name: Option<String>,
    pub shape: Shape,
}

#[derive(Debug, Clone)]
pub enum Shape {
    Primitive(PrimitiveKind),
    Literal(Value),
    List {
        element: Box<SchemaType>,
        occurrence: Occurrence,
    },
    Map {
        fields: Vec<Field>,
        open: bool,
    },
    Element {
        tag: Option<String>,
        attributes: Vec<Field>,
        content: Vec<SchemaType>,
        open: bool,
    },
    Union(Vec<SchemaType>),
    Occurrence {
        base: Box<SchemaType>,
        modifier: Occurrence,
    },
    Reference(String),
}

impl SchemaType {
    fn unnamed(shape: Shape) -> Self {
        SchemaType { name: None, shape }
    }

    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    // --- Factory constructors (spec.md §4.2: "always return a fully
    // initialized node"; default map/element `open` is `true`). ---

    #[must_use]
    pub fn primitive(kind: PrimitiveKind) -> Self {
        Self::unnamed(Shape::Primitive(kind))
    }

    #[must_use]
    pub fn literal(value: Value) -> Self {
        Self::unnamed(Shape::Literal(value))
    }

    #[must_use]
    pub fn list(element: SchemaType, occurrence: Occurrence) -> Self {
        Self::unnamed(Shape::List {
            element: Box::new(element),
            occurrence,
        })
    }

    #[must_use]
    pub fn map(fields: Vec<Field>) -> Self {
        Self::unnamed(Shape::Map { fields, open: true })
    }

    #[must_use]
    pub fn closed_map(fields: Vec<Field>) -> Self {
        Self::unnamed(Shape::Map {
            fields,
            open: false,
        })
    }

    #[must_use]
    pub fn element(tag: Option<String>, attributes: Vec<Field>, content: Vec<SchemaType>) -> Self {
        Self::unnamed(Shape::Element {
            tag,
            attributes,
            content,
            open: true,
        })
    }

    #[must_use]
    pub fn union(alternatives: Vec<SchemaType>) -> Self {
        // Flatten nested unions at build time (spec.md §4.3).
        let mut flat = Vec::with_capacity(alternatives.len());
        for alt in alternatives {
            match alt.shape {
                Shape::Union(nested) if alt.name.is_none() => flat.extend(nested),
                _ => flat.push(alt),
            }
        }
        Self::unnamed(Shape::Union(flat))
    }

    #[must_use]
    pub fn occurrence(base: SchemaType, modifier: Occurrence) -> Self {
        Self::unnamed(Shape::Occurrence {
            base: Box::new(base),
            modifier,
        })
    }

    #[must_use]
    pub fn reference(name: impl Into<String>) -> Self {
        Self::unnamed(Shape::Reference(name.into()))
    }

    /// A human-readable type name, used in `expected_type` diagnostics.
    #[must_use]
    pub fn display_name(&self) -> String {
        match &self.shape {
            Shape::Primitive(kind) => kind.to_string(),
            Shape::Literal(value) => format!("literal<{}>", value.kind()),
            Shape::List { element, occurrence } => {
                format!("[{}{}]", element.display_name(), occurrence.symbol())
            }
            Shape::Map { .. } => "map".to_string(),
            Shape::Element { tag, .. } => match tag {
                Some(tag) => format!("<{tag}>"),
                None => "<element>".to_string(),
            },
            Shape::Union(alts) => alts
                .iter()
                .map(SchemaType::display_name)
                .collect::<Vec<_>>()
                .join(" | "),
            Shape::Occurrence { base, modifier } => {
                format!("{}{}", base.display_name(), modifier.symbol())
            }
            Shape::Reference(name) => name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitive_number_accepts_numeric_kinds() {
        assert!(PrimitiveKind::Number.accepts(Kind::Int));
        assert!(PrimitiveKind::Number.accepts(Kind::Float));
        assert!(PrimitiveKind::Number.accepts(Kind::Decimal));
        assert!(!PrimitiveKind::Number.accepts(Kind::String));
    }

    #[test]
    fn any_accepts_everything() {
        for kind in [
            Kind::Null,
            Kind::Bool,
            Kind::Int,
            Kind::Float,
            Kind::Decimal,
            Kind::String,
            Kind::List,
            Kind::Map,
            Kind::Element,
        ] {
            assert!(PrimitiveKind::Any.accepts(kind));
        }
    }

    #[test]
    fn map_defaults_to_open() {
        let map = SchemaType::map(vec![]);
        assert!(matches!(map.shape, Shape::Map { open: true, .. }));
    }

    #[test]
    fn union_flattens_nested_unions() {
        let inner = SchemaType::union(vec![
            SchemaType::primitive(PrimitiveKind::Int),
            SchemaType::primitive(PrimitiveKind::String),
        ]);
        let outer = SchemaType::union(vec![inner, SchemaType::primitive(PrimitiveKind::Bool)]);
        match outer.shape {
            Shape::Union(alts) => assert_eq!(alts.len(), 3),
            _ => panic!("expected union"),
        }
    }

    #[test]
    fn occurrence_len_bounds() {
        assert!(Occurrence::OneOrMore.accepts_len(1));
        assert!(!Occurrence::OneOrMore.accepts_len(0));
        assert!(Occurrence::Optional.accepts_len(0));
        assert!(Occurrence::Optional.accepts_len(1));
        assert!(!Occurrence::Optional.accepts_len(2));
        assert!(Occurrence::ZeroOrMore.accepts_len(0));
    }
}
