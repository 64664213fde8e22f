//! Lexer for member declarations.
//!
//! Keywords (modifiers, primitives, `class`, `package`, ...) are lexed as
//! identifiers and classified by the parser, so a qualified name such as
//! `java.lang.String` is a run of `Ident` / `Dot` tokens.

use std::ops::Range;

use logos::Logos;

use super::SignatureError;

/// Declaration token
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n]+")]
pub(crate) enum Token<'s> {
    #[regex(r"[A-Za-z_$][A-Za-z0-9_$]*", |lex| lex.slice())]
    Ident(&'s str),

    #[token("...")]
    Ellipsis,

    #[token(".")]
    Dot,

    #[token(",")]
    Comma,

    #[token(";")]
    Semicolon,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token("<")]
    Lt,

    #[token(">")]
    Gt,

    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    #[token("?")]
    Question,

    #[token("&")]
    Amp,
}

impl Token<'_> {
    /// Text used in diagnostics
    pub(crate) fn describe(&self) -> String {
        match self {
            Token::Ident(s) => format!("`{}`", s),
            Token::Ellipsis => "`...`".to_string(),
            Token::Dot => "`.`".to_string(),
            Token::Comma => "`,`".to_string(),
            Token::Semicolon => "`;`".to_string(),
            Token::LParen => "`(`".to_string(),
            Token::RParen => "`)`".to_string(),
            Token::LBracket => "`[`".to_string(),
            Token::RBracket => "`]`".to_string(),
            Token::Lt => "`<`".to_string(),
            Token::Gt => "`>`".to_string(),
            Token::LBrace => "`{`".to_string(),
            Token::RBrace => "`}`".to_string(),
            Token::Question => "`?`".to_string(),
            Token::Amp => "`&`".to_string(),
        }
    }
}

/// Tokenize a declaration
pub(crate) fn tokenize(source: &str) -> Result<Vec<(Token<'_>, Range<usize>)>, SignatureError> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();
    while let Some(result) = lexer.next() {
        match result {
            Ok(token) => tokens.push((token, lexer.span())),
            Err(()) => {
                let span = lexer.span();
                return Err(SignatureError::Malformed {
                    declaration: source.to_string(),
                    reason: format!(
                        "unexpected character `{}` at offset {}",
                        &source[span.clone()],
                        span.start
                    ),
                });
            }
        }
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<Token<'_>> {
        tokenize(source).unwrap().into_iter().map(|(t, _)| t).collect()
    }

    #[test]
    fn test_field_declaration() {
        assert_eq!(
            kinds("private final String test;"),
            vec![
                Token::Ident("private"),
                Token::Ident("final"),
                Token::Ident("String"),
                Token::Ident("test"),
                Token::Semicolon,
            ]
        );
    }

    #[test]
    fn test_varargs_and_arrays() {
        assert_eq!(
            kinds("void f(int[]... a)"),
            vec![
                Token::Ident("void"),
                Token::Ident("f"),
                Token::LParen,
                Token::Ident("int"),
                Token::LBracket,
                Token::RBracket,
                Token::Ellipsis,
                Token::Ident("a"),
                Token::RParen,
            ]
        );
    }

    #[test]
    fn test_qualified_and_inner_names() {
        assert_eq!(
            kinds("java.util.Map$Entry"),
            vec![
                Token::Ident("java"),
                Token::Dot,
                Token::Ident("util"),
                Token::Dot,
                Token::Ident("Map$Entry"),
            ]
        );
    }

    #[test]
    fn test_unexpected_character() {
        let err = tokenize("int x = 3;").unwrap_err();
        assert!(matches!(err, SignatureError::Malformed { .. }));
    }
}
