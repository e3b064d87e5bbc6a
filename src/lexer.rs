//! A small hand-rolled tokenizer for schema source text.
//!
//! The concrete-syntax parser that would normally hand the schema parser a
//! token tree is an external collaborator out of scope for this crate
//! (spec.md §1); this lexer stands in for it, kept deliberately minimal.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Ident(String),
    Int(i64),
    Float(f64),
    Str(String),
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    LAngle,
    RAngle,
    LParen,
    RParen,
    Colon,
    Comma,
    Question,
    Plus,
    Star,
    Pipe,
    Eq,
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Ident(name) => write!(f, "identifier `{name}`"),
            TokenKind::Int(value) => write!(f, "integer `{value}`"),
            TokenKind::Float(value) => write!(f, "float `{value}`"),
            TokenKind::Str(value) => write!(f, "string {value:?}"),
            TokenKind::LBrace => write!(f, "`{{`"),
            TokenKind::RBrace => write!(f, "`}}`"),
            TokenKind::LBracket => write!(f, "`[`"),
            TokenKind::RBracket => write!(f, "`]`"),
            TokenKind::LAngle => write!(f, "`<`"),
            TokenKind::RAngle => write!(f, "`>`"),
            TokenKind::LParen => write!(f, "`(`"),
            TokenKind::RParen => write!(f, "`)`"),
            TokenKind::Colon => write!(f, "`:`"),
            TokenKind::Comma => write!(f, "`,`"),
            TokenKind::Question => write!(f, "`?`"),
            TokenKind::Plus => write!(f, "`+`"),
            TokenKind::Star => write!(f, "`*`"),
            TokenKind::Pipe => write!(f, "`|`"),
            TokenKind::Eq => write!(f, "`=`"),
            TokenKind::Eof => write!(f, "end of input"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: usize,
    pub col: usize,
}

/// A lexical error with source-offset context, used to build `PARSE_ERROR`
/// messages.
#[derive(Debug, Clone, PartialEq)]
pub struct LexError {
    pub message: String,
    pub line: usize,
    pub col: usize,
}

pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    let chars: Vec<char> = source.chars().collect();
    let mut tokens = Vec::new();
    let mut pos = 0;
    let mut line = 1;
    let mut col = 1;

    macro_rules! advance {
        () => {{
            if chars[pos] == '\n' {
                line += 1;
                col = 1;
            } else {
                col += 1;
            }
            pos += 1;
        }};
    }

    while pos < chars.len() {
        let ch = chars[pos];

        if ch.is_whitespace() {
            advance!();
            continue;
        }

        if ch == '/' && chars.get(pos + 1) == Some(&'/') {
            while pos < chars.len() && chars[pos] != '\n' {
                advance!();
            }
            continue;
        }

        let (start_line, start_col) = (line, col);

        let kind = match ch {
            '{' => {
                advance!();
                TokenKind::LBrace
            }
            '}' => {
                advance!();
                TokenKind::RBrace
            }
            '[' => {
                advance!();
                TokenKind::LBracket
            }
            ']' => {
                advance!();
                TokenKind::RBracket
            }
            '<' => {
                advance!();
                TokenKind::LAngle
            }
            '>' => {
                advance!();
                TokenKind::RAngle
            }
            '(' => {
                advance!();
                TokenKind::LParen
            }
            ')' => {
                advance!();
                TokenKind::RParen
            }
            ':' => {
                advance!();
                TokenKind::Colon
            }
            ',' => {
                advance!();
                TokenKind::Comma
            }
            '?' => {
                advance!();
                TokenKind::Question
            }
            '+' => {
                advance!();
                TokenKind::Plus
            }
            '*' => {
                advance!();
                TokenKind::Star
            }
            '|' => {
                advance!();
                TokenKind::Pipe
            }
            '=' => {
                advance!();
                TokenKind::Eq
            }
            '"' => lex_string(&chars, &mut pos, &mut line, &mut col)?,
            c if c == '-' || c.is_ascii_digit() => lex_number(&chars, &mut pos, &mut line, &mut col),
            c if c.is_alphabetic() || c == '_' => lex_ident(&chars, &mut pos, &mut line, &mut col),
            other => {
                return Err(LexError {
                    message: format!("unexpected character {other:?}"),
                    line: start_line,
                    col: start_col,
                });
            }
        };

        tokens.push(Token {
            kind,
            line: start_line,
            col: start_col,
        });
    }

    tokens.push(Token {
        kind: TokenKind::Eof,
        line,
        col,
    });
    Ok(tokens)
}

fn lex_ident(chars: &[char], pos: &mut usize, line: &mut usize, col: &mut usize) -> TokenKind {
    let start = *pos;
    while *pos < chars.len() && (chars[*pos].is_alphanumeric() || chars[*pos] == '_') {
        *pos += 1;
        *col += 1;
    }
    let _ = line;
    TokenKind::Ident(chars[start..*pos].iter().collect())
}

fn lex_number(chars: &[char], pos: &mut usize, line: &mut usize, col: &mut usize) -> TokenKind {
    let start = *pos;
    if chars[*pos] == '-' {
        *pos += 1;
        *col += 1;
    }
    while *pos < chars.len() && chars[*pos].is_ascii_digit() {
        *pos += 1;
        *col += 1;
    }
    let mut is_float = false;
    if *pos < chars.len() && chars[*pos] == '.' && chars.get(*pos + 1).is_some_and(char::is_ascii_digit) {
        is_float = true;
        *pos += 1;
        *col += 1;
        while *pos < chars.len() && chars[*pos].is_ascii_digit() {
            *pos += 1;
            *col += 1;
        }
    }
    let _ = line;
    let text: String = chars[start..*pos].iter().collect();
    if is_float {
        TokenKind::Float(text.parse().unwrap_or(0.0))
    } else {
        TokenKind::Int(text.parse().unwrap_or(0))
    }
}

fn lex_string(
    chars: &[char],
    pos: &mut usize,
    line: &mut usize,
    col: &mut usize,
) -> Result<TokenKind, LexError> {
    let (start_line, start_col) = (*line, *col);
    *pos += 1; // opening quote
    *col += 1;
    let mut out = String::new();
    loop {
        match chars.get(*pos) {
            None => {
                return Err(LexError {
                    message: "unterminated string literal".to_string(),
                    line: start_line,
                    col: start_col,
                });
            }
            Some('"') => {
                *pos += 1;
                *col += 1;
                break;
            }
            Some('\\') => {
                *pos += 1;
                *col += 1;
                match chars.get(*pos) {
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some('"') => out.push('"'),
                    Some('\\') => out.push('\\'),
                    Some(other) => out.push(*other),
                    None => {
                        return Err(LexError {
                            message: "unterminated escape sequence".to_string(),
                            line: *line,
                            col: *col,
                        });
                    }
                }
                *pos += 1;
                *col += 1;
            }
            Some(c) => {
                if *c == '\n' {
                    *line += 1;
                    *col = 1;
                } else {
                    *col += 1;
                }
                out.push(*c);
                *pos += 1;
            }
        }
    }
    Ok(TokenKind::Str(out))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizes_punctuation_and_identifiers() {
        let tokens = tokenize("type T = { title: string }").unwrap();
        let kinds: Vec<&TokenKind> = tokens.iter().map(|t| &t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                &TokenKind::Ident("type".to_string()),
                &TokenKind::Ident("T".to_string()),
                &TokenKind::Eq,
                &TokenKind::LBrace,
                &TokenKind::Ident("title".to_string()),
                &TokenKind::Colon,
                &TokenKind::Ident("string".to_string()),
                &TokenKind::RBrace,
                &TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn skips_line_comments() {
        let tokens = tokenize("int // trailing comment\n").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Ident("int".to_string()));
        assert_eq!(tokens[1].kind, TokenKind::Eof);
    }

    #[test]
    fn lexes_string_escapes() {
        let tokens = tokenize(r#""a\"b\n""#).unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Str("a\"b\n".to_string()));
    }

    #[test]
    fn lexes_negative_and_float_numbers() {
        let tokens = tokenize("-42 3.5").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Int(-42));
        assert_eq!(tokens[1].kind, TokenKind::Float(3.5));
    }

    #[test]
    fn unterminated_string_is_an_error() {
        let err = tokenize("\"abc").unwrap_err();
        assert_eq!(err.line, 1);
    }
}
