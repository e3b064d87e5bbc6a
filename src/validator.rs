//! The recursive validation dispatcher (Component D): per-shape
//! algorithms, cycle-safe reference resolution, and the depth/timeout
//! guards checked at dispatcher entry (spec.md §4.4, §5).

use std::time::{Duration, Instant};

use ahash::AHashSet;

use tracing::debug;

use crate::error::{ErrorCode, ValidationError, ValidationResult, ValidationWarning};
use crate::hooks::{HookContext, HookRegistry};
use crate::options::ValidatorOptions;
use crate::path::Path;
use crate::registry::Registry;
use crate::schema::{Field, Occurrence, SchemaType, Shape};
use crate::value::Value;

pub(crate) struct ValidationContext<'a> {
    registry: &'a Registry,
    hooks: &'a HookRegistry,
    options: &'a ValidatorOptions,
    visited: AHashSet<String>,
    depth: usize,
    deadline: Option<Instant>,
}

impl<'a> ValidationContext<'a> {
    pub(crate) fn new(registry: &'a Registry, hooks: &'a HookRegistry, options: &'a ValidatorOptions) -> Self {
        let deadline = if options.timeout_ms == 0 {
            None
        } else {
            Some(Instant::now() + Duration::from_millis(options.timeout_ms))
        };
        ValidationContext {
            registry,
            hooks,
            options,
            visited: AHashSet::new(),
            depth: 0,
            deadline,
        }
    }

    pub(crate) fn validate_item(&mut self, value: &Value, schema: &SchemaType, path: Path) -> ValidationResult {
        self.depth += 1;
        let _span = trace_span(&path, self.depth);

        if self.depth > self.options.max_validation_depth {
            debug!(path = %path, "max validation depth exceeded");
            self.depth -= 1;
            return ValidationResult::single_error(ValidationError::new(
                ErrorCode::ConstraintViolation,
                format!(
                    "max validation depth ({}) exceeded",
                    self.options.max_validation_depth
                ),
                path,
            ));
        }

        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                debug!(path = %path, "validation timed out");
                self.depth -= 1;
                return ValidationResult::single_error(ValidationError::new(
                    ErrorCode::ConstraintViolation,
                    "validation timed out",
                    path,
                ));
            }
        }

        let mut result = match &schema.shape {
            Shape::Primitive(kind) => self.validate_primitive(*kind, value, &path),
            Shape::Literal(expected) => self.validate_literal(expected, value, &path),
            Shape::List { element, occurrence } => self.validate_list(element, *occurrence, value, &path),
            Shape::Map { fields, open } => self.validate_map(fields, *open, value, &path),
            Shape::Element {
                tag,
                attributes,
                content,
                open,
            } => self.validate_element(tag.as_deref(), attributes, content, *open, value, &path),
            Shape::Union(alternatives) => self.validate_union(alternatives, value, &path),
            Shape::Occurrence { base, modifier } => self.validate_occurrence(base, *modifier, value, &path),
            Shape::Reference(name) => self.validate_reference(name, value, &path),
        };

        let hook_ctx = HookContext { path: &path, depth: self.depth };
        self.hooks.run_all(value, schema, &hook_ctx, &mut result);

        if self.options.strict_mode {
            result.elevate_warnings();
        }

        self.depth -= 1;
        result
    }

    fn validate_primitive(&self, kind: crate::schema::PrimitiveKind, value: &Value, path: &Path) -> ValidationResult {
        if kind.accepts(value.kind()) {
            ValidationResult::new()
        } else {
            ValidationResult::single_error(
                ValidationError::new(ErrorCode::TypeMismatch, "value kind does not match schema", path.clone())
                    .with_expected_type(kind.to_string())
                    .with_actual_value(value.kind().to_string()),
            )
        }
    }

    fn validate_literal(&self, expected: &Value, value: &Value, path: &Path) -> ValidationResult {
        if value == expected {
            ValidationResult::new()
        } else {
            ValidationResult::single_error(
                ValidationError::new(ErrorCode::TypeMismatch, "value does not equal the expected literal", path.clone())
                    .with_expected_type(format!("literal<{}>", expected.kind()))
                    .with_actual_value(value.kind().to_string()),
            )
        }
    }

    fn validate_list(
        &mut self,
        element: &SchemaType,
        occurrence: Occurrence,
        value: &Value,
        path: &Path,
    ) -> ValidationResult {
        let Some(items) = value.as_list() else {
            return ValidationResult::single_error(
                ValidationError::new(ErrorCode::TypeMismatch, "expected a list", path.clone())
                    .with_expected_type("list")
                    .with_actual_value(value.kind().to_string()),
            );
        };

        let mut result = ValidationResult::new();
        if !occurrence.accepts_len(items.len()) {
            result.push_error(ValidationError::new(
                ErrorCode::OccurrenceError,
                format!(
                    "list has {} item(s), which violates occurrence `{}`",
                    items.len(),
                    occurrence.symbol()
                ),
                path.clone(),
            ));
        }

        for (index, item) in items.iter().enumerate() {
            let mut item_result = self.validate_child(item, element, path.push_index(index));
            result.merge(&mut item_result);
        }
        result
    }

    fn validate_map(&mut self, fields: &[Field], open: bool, value: &Value, path: &Path) -> ValidationResult {
        let Some(map) = value.as_map() else {
            return ValidationResult::single_error(
                ValidationError::new(ErrorCode::TypeMismatch, "expected a map", path.clone())
                    .with_expected_type("map")
                    .with_actual_value(value.kind().to_string()),
            );
        };

        let mut result = ValidationResult::new();
        let declared_names: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();

        for field in fields {
            match map.get(&field.name) {
                Some(field_value) => {
                    let mut field_result =
                        self.validate_child(field_value, &field.type_expr, path.push_field(&field.name));
                    result.merge(&mut field_result);
                }
                None if field.required => {
                    let suggestions = suggest(&field.name, map.keys().map(String::as_str));
                    result.push_error(
                        ValidationError::new(
                            ErrorCode::MissingField,
                            format!("required field `{}` is missing", field.name),
                            path.push_field(&field.name),
                        )
                        .with_expected_type(field.type_expr.display_name())
                        .with_suggestions(suggestions),
                    );
                }
                None => {}
            }
        }

        let effective_open = open || self.options.allow_unknown_fields;
        if !effective_open {
            for key in map.keys() {
                if !declared_names.contains(&key.as_str()) {
                    let suggestions = suggest(key, declared_names.iter().copied());
                    result.push_error(
                        ValidationError::new(
                            ErrorCode::UnexpectedField,
                            format!("field `{key}` is not declared by this schema"),
                            path.push_field(key),
                        )
                        .with_suggestions(suggestions),
                    );
                }
            }
        }
        result
    }

    #[allow(clippy::too_many_arguments)]
    fn validate_element(
        &mut self,
        tag: Option<&str>,
        attributes: &[Field],
        content: &[SchemaType],
        open: bool,
        value: &Value,
        path: &Path,
    ) -> ValidationResult {
        let Some((actual_tag, attrs, items)) = value.as_element() else {
            return ValidationResult::single_error(
                ValidationError::new(ErrorCode::TypeMismatch, "expected an element", path.clone())
                    .with_expected_type("element")
                    .with_actual_value(value.kind().to_string()),
            );
        };

        if let Some(expected_tag) = tag {
            if expected_tag != actual_tag {
                debug!(expected_tag, actual_tag, "element tag mismatch");
                return ValidationResult::single_error(
                    ValidationError::new(
                        ErrorCode::InvalidElement,
                        format!("expected tag `{expected_tag}`, found `{actual_tag}`"),
                        path.clone(),
                    )
                    .with_expected_type(format!("<{expected_tag}>")),
                );
            }
        }

        let mut result = ValidationResult::new();

        if !self.options.allow_empty_elements
            && attrs.is_empty()
            && items.is_empty()
            && (!attributes.is_empty() || !content.is_empty())
        {
            result.push_error(ValidationError::new(
                ErrorCode::InvalidElement,
                "element has no attributes or content, but the schema requires at least one",
                path.clone(),
            ));
        }

        let declared_names: Vec<&str> = attributes.iter().map(|f| f.name.as_str()).collect();
        for attr in attributes {
            match attrs.get(&attr.name) {
                Some(attr_value) => {
                    let mut attr_result =
                        self.validate_child(attr_value, &attr.type_expr, path.push_attribute(&attr.name));
                    result.merge(&mut attr_result);
                }
                None if attr.required => {
                    let suggestions = suggest(&attr.name, attrs.keys().map(String::as_str));
                    result.push_error(
                        ValidationError::new(
                            ErrorCode::MissingField,
                            format!("required attribute `{}` is missing", attr.name),
                            path.push_attribute(&attr.name),
                        )
                        .with_expected_type(attr.type_expr.display_name())
                        .with_suggestions(suggestions),
                    );
                }
                None => {}
            }
        }
        let effective_open = open || self.options.allow_unknown_fields;
        if !effective_open {
            for key in attrs.keys() {
                if !declared_names.contains(&key.as_str()) {
                    let suggestions = suggest(key, declared_names.iter().copied());
                    result.push_error(
                        ValidationError::new(
                            ErrorCode::UnexpectedField,
                            format!("attribute `{key}` is not declared by this schema"),
                            path.push_attribute(key),
                        )
                        .with_suggestions(suggestions),
                    );
                }
            }
        }

        let bound = content.len().min(items.len());
        for index in 0..bound {
            let mut item_result = self.validate_child(&items[index], &content[index], path.push_index(index));
            result.merge(&mut item_result);
        }
        if items.len() > content.len() {
            result.push_error(ValidationError::new(
                ErrorCode::ConstraintViolation,
                format!(
                    "element has {} content item(s), but the schema declares only {}",
                    items.len(),
                    content.len()
                ),
                path.clone(),
            ));
        }

        result
    }

    fn validate_union(&mut self, alternatives: &[SchemaType], value: &Value, path: &Path) -> ValidationResult {
        for alternative in alternatives {
            let attempt = self.validate_item(value, alternative, path.clone());
            if attempt.valid() {
                return attempt;
            }
        }
        ValidationResult::single_error(ValidationError::new(
            ErrorCode::TypeMismatch,
            "value does not match any alternative in union",
            path.clone(),
        ))
    }

    fn validate_occurrence(
        &mut self,
        base: &SchemaType,
        modifier: Occurrence,
        value: &Value,
        path: &Path,
    ) -> ValidationResult {
        match modifier {
            Occurrence::Optional => {
                if value.kind() == crate::value::Kind::Null {
                    ValidationResult::new()
                } else {
                    self.validate_item(value, base, path.clone())
                }
            }
            Occurrence::OneOrMore | Occurrence::ZeroOrMore | Occurrence::Exactly => {
                self.validate_list(base, modifier, value, path)
            }
        }
    }

    fn validate_reference(&mut self, name: &str, value: &Value, path: &Path) -> ValidationResult {
        let Some(target) = self.registry.get(name) else {
            return ValidationResult::single_error(ValidationError::new(
                ErrorCode::ReferenceError,
                format!("unresolved reference `{name}`"),
                path.clone(),
            ));
        };

        if self.visited.contains(name) {
            debug!(name, path = %path, "circular reference detected");
            return ValidationResult::single_error(ValidationError::new(
                ErrorCode::CircularReference,
                format!("circular reference to `{name}`"),
                path.clone(),
            ));
        }

        self.visited.insert(name.to_string());
        let result = self.validate_item(value, target, path.clone());
        self.visited.remove(name);
        result
    }

    /// Validates a value reached by descending into an actual document
    /// node — a map field, list item, attribute, or content item — rather
    /// than by unwrapping the current value through a union, occurrence, or
    /// reference indirection.
    ///
    /// Crossing this boundary clears the reference cycle guard. The guard
    /// exists to catch a reference chain that revisits a name without ever
    /// consuming a value (`type A = A`, `type A = B | A`), which would
    /// otherwise recurse forever; it must not fire when a schema like
    /// `type A = { next: A }` legitimately re-enters `A` one value level
    /// deeper; that recursion terminates as soon as the value itself runs
    /// out (spec.md §8 E6). The saved set is restored afterward so a
    /// sibling field/item/attribute at the *same* level still sees
    /// whatever names were in progress above it.
    fn validate_child(&mut self, value: &Value, schema: &SchemaType, path: Path) -> ValidationResult {
        let saved = std::mem::take(&mut self.visited);
        let result = self.validate_item(value, schema, path);
        self.visited = saved;
        result
    }
}

fn trace_span(path: &Path, depth: usize) -> tracing::span::EnteredSpan {
    tracing::trace_span!("validate_item", path = %path, depth).entered()
}

/// Edit-distance-≤2 suggestions for a misspelled field/attribute name,
/// scoped to field and attribute names only (spec.md §9's open question,
/// resolved narrowly).
fn suggest<'a>(needle: &str, candidates: impl Iterator<Item = &'a str>) -> Vec<String> {
    candidates
        .filter(|candidate| levenshtein(needle, candidate) <= 2)
        .map(str::to_string)
        .collect()
}

fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}
