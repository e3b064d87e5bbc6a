//! A structural schema validator for semi-structured documents.
//!
//! Schemas are written in a small type-expression language (see
//! [`parser::parse_schema_source`] for the grammar) and compiled into a
//! [`schema::SchemaType`] graph. [`Validator`] loads schemas by name and
//! validates [`value::Value`] trees against them, producing a
//! [`error::ValidationResult`]: a verdict plus accumulated errors and
//! warnings, each carrying a [`path::Path`] to where it occurred.
//!
//! ```
//! use schemacore::Validator;
//!
//! let mut validator = Validator::new();
//! validator.load_schema("type T = { title: string, body: string }", "T").unwrap();
//! ```

mod error;
mod hooks;
mod lexer;
mod options;
mod parser;
mod path;
mod registry;
mod schema;
mod validator;
mod value;

pub use error::{ErrorCode, ValidationError, ValidationResult, ValidationWarning};
pub use hooks::{CustomValidator, HookContext};
pub use options::{ValidatorOptions, ValidatorOptionsBuilder};
pub use parser::ParseError;
pub use path::{Path, PathSegment};
pub use schema::{Field, Occurrence, PrimitiveKind, SchemaType, Shape};
pub use value::{Kind, Value};

use hooks::HookRegistry;
use registry::Registry;
use validator::ValidationContext;

/// Owns the schema registry, configured options, and registered custom
/// validator hooks. A `Validator` is independent of any other instance —
/// there is no global or process-wide state (spec.md §5, §9).
#[derive(Default)]
pub struct Validator {
    registry: Registry,
    hooks: HookRegistry,
    options: ValidatorOptions,
}

impl Validator {
    #[must_use]
    pub fn new() -> Self {
        Validator::default()
    }

    #[must_use]
    pub fn with_options(options: ValidatorOptions) -> Self {
        Validator {
            registry: Registry::new(),
            hooks: HookRegistry::new(),
            options,
        }
    }

    pub fn set_options(&mut self, options: ValidatorOptions) {
        self.options = options;
    }

    #[must_use]
    pub fn options(&self) -> &ValidatorOptions {
        &self.options
    }

    /// Registers a custom validator hook, run after built-in validation of
    /// every value/schema pair (spec.md §4.5). Idempotent by name.
    pub fn register_hook(&mut self, hook: CustomValidator) {
        self.hooks.register(hook);
    }

    pub fn unregister_hook(&mut self, name: &str) {
        self.hooks.unregister(name);
    }

    /// Parses `source` and installs every `type NAME = expr` binding into
    /// the registry. If the source ends in a bare trailing expression
    /// (rather than only bindings), that expression is also installed
    /// under `root_name`, overriding any binding of the same name.
    /// Otherwise `root_name` must already name one of the bindings just
    /// installed.
    ///
    /// On a parse failure, no binding from this call is installed;
    /// bindings from prior `load_schema` calls are unaffected (spec.md
    /// §4.3's "Failures").
    pub fn load_schema(&mut self, source: &str, root_name: &str) -> Result<(), ParseError> {
        let mut staging = Registry::new();
        let parsed = parser::parse_schema_source(source, &mut staging).inspect_err(|err| {
            tracing::warn!(message = %err.message, line = err.line, col = err.col, "schema parse failed");
        })?;

        for name in staging.names().map(str::to_string).collect::<Vec<_>>() {
            let ty = staging.get(&name).cloned().expect("name just listed by the registry");
            self.registry.insert(name, ty);
        }
        if let Some(root) = parsed.trailing {
            self.registry.insert(root_name, root.named(root_name));
        }
        Ok(())
    }

    /// Validates `value` against the schema previously loaded under
    /// `schema_name`. A missing schema name produces a result with a
    /// single `REFERENCE_ERROR` rather than an `Err` (spec.md §4.4.3):
    /// validation failures are diagnostics, not exceptions.
    #[must_use]
    pub fn validate_document(&self, value: &Value, schema_name: &str) -> ValidationResult {
        let Some(schema) = self.registry.get(schema_name) else {
            return ValidationResult::single_error(ValidationError::new(
                ErrorCode::ReferenceError,
                format!("schema `{schema_name}` not loaded"),
                Path::root(),
            ));
        };
        let mut ctx = ValidationContext::new(&self.registry, &self.hooks, &self.options);
        ctx.validate_item(value, schema, Path::root())
    }
}
