//! Diagnostics produced by validation: error codes, errors, warnings, and
//! the accumulating [`ValidationResult`].

use crate::path::Path;
use std::fmt;

/// Machine-readable error/warning code, per the taxonomy in spec.md §7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Sentinel for non-error constructions; never attached to a pushed
    /// error or warning.
    None,
    TypeMismatch,
    MissingField,
    UnexpectedField,
    InvalidElement,
    ConstraintViolation,
    ReferenceError,
    OccurrenceError,
    CircularReference,
    ParseError,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorCode::None => "NONE",
            ErrorCode::TypeMismatch => "TYPE_MISMATCH",
            ErrorCode::MissingField => "MISSING_FIELD",
            ErrorCode::UnexpectedField => "UNEXPECTED_FIELD",
            ErrorCode::InvalidElement => "INVALID_ELEMENT",
            ErrorCode::ConstraintViolation => "CONSTRAINT_VIOLATION",
            ErrorCode::ReferenceError => "REFERENCE_ERROR",
            ErrorCode::OccurrenceError => "OCCURRENCE_ERROR",
            ErrorCode::CircularReference => "CIRCULAR_REFERENCE",
            ErrorCode::ParseError => "PARSE_ERROR",
        };
        f.write_str(name)
    }
}

/// A single validation failure.
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub code: ErrorCode,
    pub message: String,
    pub path: Path,
    pub expected_type: Option<String>,
    pub actual_value: Option<String>,
    pub suggestions: Vec<String>,
}

/// Same shape as [`ValidationError`], but does not flip a result's `valid`
/// flag (unless [`crate::options::ValidatorOptions::strict_mode`] is set).
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub code: ErrorCode,
    pub message: String,
    pub path: Path,
    pub expected_type: Option<String>,
    pub actual_value: Option<String>,
    pub suggestions: Vec<String>,
}

impl ValidationError {
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>, path: Path) -> Self {
        ValidationError {
            code,
            message: message.into(),
            path,
            expected_type: None,
            actual_value: None,
            suggestions: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_expected_type(mut self, expected: impl Into<String>) -> Self {
        self.expected_type = Some(expected.into());
        self
    }

    #[must_use]
    pub fn with_actual_value(mut self, actual: impl Into<String>) -> Self {
        self.actual_value = Some(actual.into());
        self
    }

    #[must_use]
    pub fn with_suggestions(mut self, suggestions: Vec<String>) -> Self {
        self.suggestions = suggestions;
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.code, self.path.format(), self.message)?;
        if let Some(expected) = &self.expected_type {
            write!(f, " (expected {expected})")?;
        }
        if !self.suggestions.is_empty() {
            write!(f, " [Did you mean {}?]", self.suggestions.join(", "))?;
        }
        Ok(())
    }
}

impl ValidationWarning {
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>, path: Path) -> Self {
        ValidationWarning {
            code,
            message: message.into(),
            path,
            expected_type: None,
            actual_value: None,
            suggestions: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_suggestions(mut self, suggestions: Vec<String>) -> Self {
        self.suggestions = suggestions;
        self
    }
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.code, self.path.format(), self.message)?;
        if !self.suggestions.is_empty() {
            write!(f, " [Did you mean {}?]", self.suggestions.join(", "))?;
        }
        Ok(())
    }
}

/// The outcome of a single `validate` call: a verdict plus accumulated
/// diagnostics, in depth-first left-to-right production order (spec.md §5).
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    errors: Vec<ValidationError>,
    warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    #[must_use]
    pub fn new() -> Self {
        ValidationResult::default()
    }

    #[must_use]
    pub fn single_error(error: ValidationError) -> Self {
        let mut result = ValidationResult::default();
        result.push_error(error);
        result
    }

    pub fn push_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn push_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// `valid` becomes false the moment an error is added, and stays false.
    #[must_use]
    pub fn valid(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    #[must_use]
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    #[must_use]
    pub fn warnings(&self) -> &[ValidationWarning] {
        &self.warnings
    }

    /// Elevate every warning to an error; used by `strict_mode`.
    pub fn elevate_warnings(&mut self) {
        for warning in self.warnings.drain(..) {
            self.errors.push(ValidationError {
                code: warning.code,
                message: warning.message,
                path: warning.path,
                expected_type: warning.expected_type,
                actual_value: warning.actual_value,
                suggestions: warning.suggestions,
            });
        }
    }

    /// Splice `other`'s errors/warnings into `self`, clearing `other` so the
    /// same diagnostic node can never alias two results.
    pub fn merge(&mut self, other: &mut ValidationResult) {
        self.errors.append(&mut other.errors);
        self.warnings.append(&mut other.warnings);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_result_is_valid() {
        assert!(ValidationResult::new().valid());
    }

    #[test]
    fn pushing_an_error_flips_valid() {
        let mut result = ValidationResult::new();
        result.push_error(ValidationError::new(ErrorCode::TypeMismatch, "nope", Path::root()));
        assert!(!result.valid());
        assert_eq!(result.error_count(), 1);
    }

    #[test]
    fn merge_composes_counts_and_valid() {
        let mut a = ValidationResult::new();
        a.push_error(ValidationError::new(ErrorCode::TypeMismatch, "a", Path::root()));
        let mut b = ValidationResult::new();
        b.push_error(ValidationError::new(ErrorCode::MissingField, "b", Path::root()));
        a.merge(&mut b);
        assert_eq!(a.error_count(), 2);
        assert!(!a.valid());
    }

    #[test]
    fn merge_drains_source() {
        let mut source = ValidationResult::new();
        source.push_error(ValidationError::new(ErrorCode::TypeMismatch, "x", Path::root()));
        let mut dst = ValidationResult::new();
        dst.merge(&mut source);
        assert_eq!(source.error_count(), 0, "merge must drain the source result");
        assert_eq!(dst.error_count(), 1);
    }

    #[test]
    fn strict_mode_elevates_warnings() {
        let mut result = ValidationResult::new();
        result.push_warning(ValidationWarning::new(ErrorCode::ConstraintViolation, "w", Path::root()));
        assert!(result.valid());
        result.elevate_warnings();
        assert!(!result.valid());
        assert_eq!(result.error_count(), 1);
        assert_eq!(result.warning_count(), 0);
    }

    #[test]
    fn display_format_matches_spec() {
        let error = ValidationError::new(ErrorCode::TypeMismatch, "wrong kind", Path::root().push_field("body"))
            .with_expected_type("string")
            .with_suggestions(vec!["boddy".to_string()]);
        assert_eq!(
            error.to_string(),
            "[TYPE_MISMATCH] .body: wrong kind (expected string) [Did you mean boddy?]"
        );
    }

    #[test]
    fn display_format_omits_empty_brackets() {
        let error = ValidationError::new(ErrorCode::TypeMismatch, "wrong kind", Path::root());
        assert_eq!(error.to_string(), "[TYPE_MISMATCH] : wrong kind");
    }
}
