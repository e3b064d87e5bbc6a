//! Custom validator hooks (Component E): named callbacks run after the
//! built-in validation of a value/schema pair, able only to add
//! diagnostics (spec.md §4.5).

use crate::error::ValidationResult;
use crate::path::Path;
use crate::schema::SchemaType;
use crate::value::Value;

/// Read-only context handed to a hook callback: where in the value tree
/// this call is and how deep the dispatcher has descended. Hooks cannot
/// see or mutate the dispatcher's visited-reference set — they run after
/// built-in validation has already resolved cycles for this node.
pub struct HookContext<'a> {
    pub path: &'a Path,
    pub depth: usize,
}

/// A named, user-supplied validation callback.
pub struct CustomValidator {
    name: String,
    description: String,
    callback: Box<dyn Fn(&Value, &SchemaType, &HookContext) -> ValidationResult + Send + Sync>,
}

impl CustomValidator {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        callback: impl Fn(&Value, &SchemaType, &HookContext) -> ValidationResult + Send + Sync + 'static,
    ) -> Self {
        CustomValidator {
            name: name.into(),
            description: description.into(),
            callback: Box::new(callback),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }
}

/// Ordered collection of registered hooks, run in registration order after
/// every built-in `validate_item` call.
#[derive(Default)]
pub struct HookRegistry {
    hooks: Vec<CustomValidator>,
}

impl HookRegistry {
    #[must_use]
    pub fn new() -> Self {
        HookRegistry::default()
    }

    /// Registers `hook`. Idempotent by name: a prior hook under the same
    /// name is removed first, so re-registration moves that name to the
    /// end of the run order.
    pub fn register(&mut self, hook: CustomValidator) {
        self.hooks.retain(|h| h.name != hook.name);
        self.hooks.push(hook);
    }

    pub fn unregister(&mut self, name: &str) {
        self.hooks.retain(|h| h.name != name);
    }

    pub(crate) fn run_all(
        &self,
        value: &Value,
        schema: &SchemaType,
        ctx: &HookContext,
        result: &mut ValidationResult,
    ) {
        for hook in &self.hooks {
            let mut hook_result = (hook.callback)(value, schema, ctx);
            result.merge(&mut hook_result);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorCode, ValidationError};
    use crate::schema::PrimitiveKind;

    #[test]
    fn hooks_run_in_registration_order() {
        let mut registry = HookRegistry::new();
        let order = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
        for label in ["first", "second"] {
            let order = order.clone();
            registry.register(CustomValidator::new(label, "", move |_, _, _| {
                order.lock().unwrap().push(label.to_string());
                ValidationResult::new()
            }));
        }
        let value = Value::Int(1);
        let schema = SchemaType::primitive(PrimitiveKind::Int);
        let path = Path::root();
        let ctx = HookContext { path: &path, depth: 0 };
        let mut result = ValidationResult::new();
        registry.run_all(&value, &schema, &ctx, &mut result);
        assert_eq!(*order.lock().unwrap(), vec!["first", "second"]);
    }

    #[test]
    fn hooks_can_only_add_diagnostics() {
        let mut registry = HookRegistry::new();
        registry.register(CustomValidator::new("flagger", "", |_, _, ctx| {
            ValidationResult::single_error(ValidationError::new(
                ErrorCode::ConstraintViolation,
                "custom rule failed",
                ctx.path.clone(),
            ))
        }));
        let value = Value::Int(1);
        let schema = SchemaType::primitive(PrimitiveKind::Int);
        let path = Path::root();
        let ctx = HookContext { path: &path, depth: 0 };
        let mut result = ValidationResult::new();
        registry.run_all(&value, &schema, &ctx, &mut result);
        assert_eq!(result.error_count(), 1);
    }

    #[test]
    fn reregistering_a_name_replaces_and_moves_to_end() {
        let mut registry = HookRegistry::new();
        registry.register(CustomValidator::new("h", "first version", |_, _, _| ValidationResult::new()));
        registry.register(CustomValidator::new("h", "second version", |_, _, _| ValidationResult::new()));
        assert_eq!(registry.hooks.len(), 1);
        assert_eq!(registry.hooks[0].description(), "second version");
    }
}
