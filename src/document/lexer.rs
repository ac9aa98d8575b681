//! Lexer for attribute values using logos
//!
//! Attribute values are short strings such as `12dp`, `-4dp`, `@+id/title`
//! or `true`. The helpers below turn them into the plain integers, ids and
//! flags the engine works with, and back.

use logos::Logos;
use thiserror::Error;

use crate::error::Span;

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r]+")]
pub enum ValueToken {
    #[token("true")]
    True,
    #[token("false")]
    False,

    // Intrinsic sizes
    #[token("wrap_content")]
    WrapContent,
    #[token("match_parent")]
    MatchParent,
    #[token("fill_parent")]
    FillParent,

    #[regex(r"@\+?id/[a-zA-Z_][a-zA-Z0-9_]*", |lex| {
        lex.slice().split_once('/').map(|(_, name)| name.to_string())
    })]
    IdRef(String),

    #[regex(r"-?[0-9]+", |lex| lex.slice().parse::<i64>().ok())]
    Integer(i64),

    // Bare ids and unit suffixes - must come after keywords
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string(), priority = 1)]
    Word(String),
}

/// Why a value could not be interpreted
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValueError {
    #[error("value is empty")]
    Empty,

    #[error("unexpected '{0}'")]
    Unexpected(String),

    #[error("expected unit '{expected}', found '{found}'")]
    UnitMismatch { expected: String, found: String },

    #[error("intrinsic size '{0}' cannot be flattened")]
    Intrinsic(String),
}

/// Lex input string into tokens with spans, stopping at the first bad token
pub fn lex(input: &str) -> Result<Vec<(ValueToken, Span)>, ValueError> {
    ValueToken::lexer(input)
        .spanned()
        .map(|(tok, span)| {
            tok.map(|t| (t, span.clone()))
                .map_err(|_| ValueError::Unexpected(input[span].to_string()))
        })
        .collect()
}

fn tokens(input: &str) -> Result<Vec<ValueToken>, ValueError> {
    let tokens: Vec<_> = lex(input)?.into_iter().map(|(t, _)| t).collect();
    if tokens.is_empty() {
        return Err(ValueError::Empty);
    }
    Ok(tokens)
}

/// Parse a dimension such as `12dp`. The suffix, when present, must be `unit`.
pub fn parse_dimension(input: &str, unit: &str) -> Result<i64, ValueError> {
    match tokens(input)?.as_slice() {
        [ValueToken::Integer(n)] => Ok(*n),
        [ValueToken::Integer(n), ValueToken::Word(suffix)] if suffix == unit => Ok(*n),
        [ValueToken::Integer(_), ValueToken::Word(suffix)] => Err(ValueError::UnitMismatch {
            expected: unit.to_string(),
            found: suffix.clone(),
        }),
        [ValueToken::WrapContent | ValueToken::MatchParent | ValueToken::FillParent] => {
            Err(ValueError::Intrinsic(input.trim().to_string()))
        }
        _ => Err(ValueError::Unexpected(input.trim().to_string())),
    }
}

/// Parse an element reference: `@+id/name`, `@id/name` or a bare `name`
pub fn parse_reference(input: &str) -> Result<String, ValueError> {
    let mut toks = tokens(input)?;
    match (toks.pop(), toks.is_empty()) {
        (Some(ValueToken::IdRef(name) | ValueToken::Word(name)), true) => Ok(name),
        _ => Err(ValueError::Unexpected(input.trim().to_string())),
    }
}

/// Parse a `true` / `false` flag
pub fn parse_flag(input: &str) -> Result<bool, ValueError> {
    match tokens(input)?.as_slice() {
        [ValueToken::True] => Ok(true),
        [ValueToken::False] => Ok(false),
        _ => Err(ValueError::Unexpected(input.trim().to_string())),
    }
}

/// Render a dimension with its unit suffix
pub fn format_dimension(value: i64, unit: &str) -> String {
    format!("{}{}", value, unit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_tokens() {
        let tokens: Vec<_> = lex("-12dp").unwrap().into_iter().map(|(t, _)| t).collect();
        assert_eq!(
            tokens,
            vec![ValueToken::Integer(-12), ValueToken::Word("dp".to_string())]
        );
    }

    #[test]
    fn test_id_ref_tokens() {
        let tokens: Vec<_> = lex("@+id/title @id/body")
            .unwrap()
            .into_iter()
            .map(|(t, _)| t)
            .collect();
        assert_eq!(
            tokens,
            vec![
                ValueToken::IdRef("title".to_string()),
                ValueToken::IdRef("body".to_string()),
            ]
        );
    }

    #[test]
    fn test_keywords_beat_words() {
        let tokens: Vec<_> = lex("true wrap_content truest")
            .unwrap()
            .into_iter()
            .map(|(t, _)| t)
            .collect();
        assert_eq!(
            tokens,
            vec![
                ValueToken::True,
                ValueToken::WrapContent,
                ValueToken::Word("truest".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_dimension() {
        assert_eq!(parse_dimension("105dp", "dp"), Ok(105));
        assert_eq!(parse_dimension("-4dp", "dp"), Ok(-4));
        assert_eq!(parse_dimension("7", "dp"), Ok(7));
        assert_eq!(
            parse_dimension("7px", "dp"),
            Err(ValueError::UnitMismatch {
                expected: "dp".to_string(),
                found: "px".to_string()
            })
        );
        assert_eq!(
            parse_dimension("wrap_content", "dp"),
            Err(ValueError::Intrinsic("wrap_content".to_string()))
        );
        assert_eq!(parse_dimension("  ", "dp"), Err(ValueError::Empty));
        assert!(parse_dimension("1.5dp", "dp").is_err());
    }

    #[test]
    fn test_parse_reference() {
        assert_eq!(parse_reference("@+id/title"), Ok("title".to_string()));
        assert_eq!(parse_reference("@id/title"), Ok("title".to_string()));
        assert_eq!(parse_reference("title"), Ok("title".to_string()));
        assert!(parse_reference("@+id/").is_err());
        assert!(parse_reference("a b").is_err());
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("true"), Ok(true));
        assert_eq!(parse_flag(" false "), Ok(false));
        assert!(parse_flag("yes").is_err());
    }

    #[test]
    fn test_format_dimension() {
        assert_eq!(format_dimension(52, "dp"), "52dp");
        assert_eq!(format_dimension(-3, ""), "-3");
    }
}
