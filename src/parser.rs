//! Recursive-descent parser over the token stream from [`crate::lexer`],
//! implementing the grammar sketched in spec.md §6.1 and materializing a
//! [`SchemaType`] graph plus named registry bindings (spec.md §4.3).

use crate::lexer::{self, LexError, Token, TokenKind};
use crate::registry::Registry;
use crate::schema::{Field, Occurrence, PrimitiveKind, SchemaType, Shape};
use crate::value::Value;
use thiserror::Error;

/// A schema source failed to parse. Aborts loading the current binding;
/// earlier bindings already installed in the registry remain (spec.md
/// §4.3 "Failures").
#[derive(Debug, Error, Clone, PartialEq)]
#[error("parse error at line {line}, column {col}: {message}")]
pub struct ParseError {
    pub message: String,
    pub line: usize,
    pub col: usize,
}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        ParseError {
            message: err.message,
            line: err.line,
            col: err.col,
        }
    }
}

/// Result of parsing one schema source document: every `type NAME = expr`
/// binding is installed into `registry`; `trailing` holds the root
/// expression following the last binding, if the source ends in a bare
/// expression rather than a binding (spec.md §4.3's "zero or more bindings
/// followed by an expression"). Schemas in this pack are commonly written
/// as a single binding with no trailing expression; callers resolve the
/// root by name in that case (see [`crate::Validator::load_schema`]).
pub struct ParsedSchema {
    pub trailing: Option<SchemaType>,
}

pub fn parse_schema_source(source: &str, registry: &mut Registry) -> Result<ParsedSchema, ParseError> {
    let tokens = lexer::tokenize(source)?;
    let mut parser = Parser { tokens, pos: 0 };
    parser.parse_program(registry)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

const PRIMITIVE_KEYWORDS: &[(&str, PrimitiveKind)] = &[
    ("int", PrimitiveKind::Int),
    ("float", PrimitiveKind::Float),
    ("number", PrimitiveKind::Number),
    ("decimal", PrimitiveKind::Decimal),
    ("string", PrimitiveKind::String),
    ("char", PrimitiveKind::String),
    ("symbol", PrimitiveKind::String),
    ("date", PrimitiveKind::String),
    ("time", PrimitiveKind::String),
    ("datetime", PrimitiveKind::String),
    ("binary", PrimitiveKind::String),
    ("bool", PrimitiveKind::Bool),
    ("true", PrimitiveKind::Bool),
    ("false", PrimitiveKind::Bool),
    ("null", PrimitiveKind::Null),
    ("any", PrimitiveKind::Any),
];

impl Parser {
    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn peek_at(&self, offset: usize) -> &Token {
        self.tokens.get(self.pos + offset).unwrap_or_else(|| self.tokens.last().unwrap())
    }

    fn advance(&mut self) -> Token {
        let token = self.tokens[self.pos].clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        let token = self.peek();
        ParseError {
            message: message.into(),
            line: token.line,
            col: token.col,
        }
    }

    fn expect(&mut self, kind: &TokenKind) -> Result<Token, ParseError> {
        if &self.peek().kind == kind {
            Ok(self.advance())
        } else {
            let found = self.peek().kind.clone();
            Err(self.error(format!("expected {kind}, found {found}")))
        }
    }

    fn expect_ident(&mut self) -> Result<String, ParseError> {
        match &self.peek().kind {
            TokenKind::Ident(name) => {
                let name = name.clone();
                self.advance();
                Ok(name)
            }
            other => {
                let found = other.clone();
                Err(self.error(format!("expected identifier, found {found}")))
            }
        }
    }

    fn parse_program(&mut self, registry: &mut Registry) -> Result<ParsedSchema, ParseError> {
        while self.at_binding() {
            let (name, ty) = self.parse_binding()?;
            registry.insert(name.clone(), ty.named(name));
        }
        if self.peek().kind == TokenKind::Eof {
            return Ok(ParsedSchema { trailing: None });
        }
        let expr = self.parse_expr()?;
        self.expect(&TokenKind::Eof)?;
        Ok(ParsedSchema { trailing: Some(expr) })
    }

    fn at_binding(&self) -> bool {
        matches!(&self.peek().kind, TokenKind::Ident(name) if name == "type")
    }

    fn parse_binding(&mut self) -> Result<(String, SchemaType), ParseError> {
        self.expect_ident()?; // "type"
        let name = self.expect_ident()?;
        self.expect(&TokenKind::Eq)?;
        let expr = self.parse_expr()?;
        Ok((name, expr))
    }

    fn parse_expr(&mut self) -> Result<SchemaType, ParseError> {
        self.parse_union()
    }

    fn parse_union(&mut self) -> Result<SchemaType, ParseError> {
        let mut alternatives = vec![self.parse_occ()?];
        while self.peek().kind == TokenKind::Pipe {
            self.advance();
            alternatives.push(self.parse_occ()?);
        }
        if alternatives.len() == 1 {
            Ok(alternatives.pop().unwrap())
        } else {
            Ok(SchemaType::union(alternatives))
        }
    }

    fn parse_occ(&mut self) -> Result<SchemaType, ParseError> {
        let atom = self.parse_atom()?;
        let modifier = match self.peek().kind {
            TokenKind::Question => Some(Occurrence::Optional),
            TokenKind::Plus => Some(Occurrence::OneOrMore),
            TokenKind::Star => Some(Occurrence::ZeroOrMore),
            _ => None,
        };
        match modifier {
            Some(modifier) => {
                self.advance();
                Ok(SchemaType::occurrence(atom, modifier))
            }
            None => Ok(atom),
        }
    }

    fn parse_atom(&mut self) -> Result<SchemaType, ParseError> {
        match &self.peek().kind {
            TokenKind::LParen => {
                self.advance();
                let expr = self.parse_expr()?;
                self.expect(&TokenKind::RParen)?;
                Ok(expr)
            }
            TokenKind::LBracket => self.parse_list(),
            TokenKind::LBrace => self.parse_map(),
            TokenKind::LAngle => self.parse_element(),
            TokenKind::Eq => self.parse_literal(),
            TokenKind::Ident(name) => {
                let name = name.clone();
                if let Some((_, kind)) = PRIMITIVE_KEYWORDS.iter().find(|(kw, _)| *kw == name) {
                    self.advance();
                    Ok(SchemaType::primitive(*kind))
                } else {
                    self.advance();
                    Ok(SchemaType::reference(name))
                }
            }
            other => {
                let found = other.clone();
                Err(self.error(format!("expected a type expression, found {found}")))
            }
        }
    }

    /// `[expr]`. If `expr` parsed to a bare `Occurrence{base, modifier}`
    /// node (i.e. the bracket's sole content was `T?` / `T+` / `T*` with no
    /// surrounding union), the modifier becomes the list's own occurrence
    /// and `base` its element type — this is how `[string+]` reaches
    /// `List(string, OneOrMore)` rather than a list of occurrence-wrapped
    /// strings.
    fn parse_list(&mut self) -> Result<SchemaType, ParseError> {
        self.expect(&TokenKind::LBracket)?;
        let inner = self.parse_expr()?;
        self.expect(&TokenKind::RBracket)?;
        match inner.shape {
            Shape::Occurrence { base, modifier } => Ok(SchemaType::list(*base, modifier)),
            _ => Ok(SchemaType::list(inner, Occurrence::Exactly)),
        }
    }

    fn parse_map(&mut self) -> Result<SchemaType, ParseError> {
        self.expect(&TokenKind::LBrace)?;
        let mut fields = Vec::new();
        while self.peek().kind != TokenKind::RBrace {
            fields.push(self.parse_field()?);
            if self.peek().kind == TokenKind::Comma {
                self.advance();
            } else {
                break;
            }
        }
        self.expect(&TokenKind::RBrace)?;
        Ok(SchemaType::map(fields))
    }

    fn parse_field(&mut self) -> Result<Field, ParseError> {
        let name = self.expect_ident()?;
        let optional = if self.peek().kind == TokenKind::Question {
            self.advance();
            true
        } else {
            false
        };
        self.expect(&TokenKind::Colon)?;
        let type_expr = self.parse_expr()?;
        Ok(if optional {
            Field::optional(name, type_expr)
        } else {
            Field::required(name, type_expr)
        })
    }

    fn is_attr_start(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Ident(_)) && self.peek_at(1).kind == TokenKind::Colon
    }

    fn parse_element(&mut self) -> Result<SchemaType, ParseError> {
        self.expect(&TokenKind::LAngle)?;
        let tag = self.expect_ident()?;
        let mut attributes = Vec::new();
        while self.is_attr_start() {
            attributes.push(self.parse_field()?);
            if self.peek().kind == TokenKind::Comma {
                self.advance();
            } else {
                break;
            }
        }
        let mut content = Vec::new();
        while self.peek().kind != TokenKind::RAngle {
            content.push(self.parse_expr()?);
            if self.peek().kind == TokenKind::Comma {
                self.advance();
            } else {
                break;
            }
        }
        self.expect(&TokenKind::RAngle)?;
        Ok(SchemaType::element(Some(tag), attributes, content))
    }

    fn parse_literal(&mut self) -> Result<SchemaType, ParseError> {
        self.expect(&TokenKind::Eq)?;
        let value = match self.advance().kind {
            TokenKind::Int(value) => Value::Int(value),
            TokenKind::Float(value) => Value::Float(value),
            TokenKind::Str(value) => Value::String(value),
            TokenKind::Ident(name) if name == "true" => Value::Bool(true),
            TokenKind::Ident(name) if name == "false" => Value::Bool(false),
            TokenKind::Ident(name) if name == "null" => Value::Null,
            other => return Err(self.error(format!("expected a literal value, found {other}"))),
        };
        Ok(SchemaType::literal(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_bare(source: &str) -> SchemaType {
        let mut registry = Registry::new();
        parse_schema_source(source, &mut registry).unwrap().trailing.unwrap()
    }

    #[test]
    fn parses_primitive_keywords() {
        assert!(matches!(parse_bare("int").shape, Shape::Primitive(PrimitiveKind::Int)));
        assert!(matches!(parse_bare("string").shape, Shape::Primitive(PrimitiveKind::String)));
    }

    #[test]
    fn parses_bare_identifier_as_reference() {
        assert!(matches!(parse_bare("Widget").shape, Shape::Reference(name) if name == "Widget"));
    }

    #[test]
    fn parses_union() {
        match parse_bare("string | int").shape {
            Shape::Union(alts) => assert_eq!(alts.len(), 2),
            other => panic!("expected union, got {other:?}"),
        }
    }

    #[test]
    fn parses_list_occurrence_into_list_node() {
        match parse_bare("[string+]").shape {
            Shape::List { element, occurrence } => {
                assert!(matches!(element.shape, Shape::Primitive(PrimitiveKind::String)));
                assert_eq!(occurrence, Occurrence::OneOrMore);
            }
            other => panic!("expected list, got {other:?}"),
        }
    }

    #[test]
    fn parses_map_with_optional_field() {
        match parse_bare("{ title: string, body?: string }").shape {
            Shape::Map { fields, open } => {
                assert!(open);
                assert_eq!(fields.len(), 2);
                assert!(fields[0].required);
                assert!(!fields[1].required);
            }
            other => panic!("expected map, got {other:?}"),
        }
    }

    #[test]
    fn parses_element_with_attrs_and_content() {
        match parse_bare("<span lang: string string>").shape {
            Shape::Element { tag, attributes, content, .. } => {
                assert_eq!(tag.as_deref(), Some("span"));
                assert_eq!(attributes.len(), 1);
                assert_eq!(content.len(), 1);
            }
            other => panic!("expected element, got {other:?}"),
        }
    }

    #[test]
    fn parses_literal_atom() {
        match parse_bare("=42").shape {
            Shape::Literal(Value::Int(42)) => {}
            other => panic!("expected literal 42, got {other:?}"),
        }
    }

    #[test]
    fn installs_binding_and_returns_no_trailing_expr() {
        let mut registry = Registry::new();
        let parsed = parse_schema_source("type T = int", &mut registry).unwrap();
        assert!(parsed.trailing.is_none());
        assert!(registry.contains("T"));
    }

    #[test]
    fn later_bindings_may_reference_earlier_names() {
        let mut registry = Registry::new();
        parse_schema_source("type A = { next: B } type B = int", &mut registry).unwrap();
        assert!(registry.contains("A"));
        assert!(registry.contains("B"));
    }

    #[test]
    fn syntax_error_reports_location() {
        let mut registry = Registry::new();
        let err = parse_schema_source("type T = {", &mut registry).unwrap_err();
        assert_eq!(err.line, 1);
    }
}
