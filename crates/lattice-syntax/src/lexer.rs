use logos::{Lexer, Logos};
use miette::SourceSpan;

use crate::error::{SyntaxError, SyntaxResult};

/// A token spans from `start` to `end` within the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub lexeme: &'a str,
    pub span: SourceSpan,
}

impl Token<'_> {
    pub fn start(&self) -> usize {
        self.span.offset()
    }

    pub fn end(&self) -> usize {
        self.span.offset() + self.span.len()
    }
}

/// The handful of tokens the stylesheet grammar cares about.
///
/// Everything that is not structural punctuation, a string or a comment is
/// lumped into `Text`; the parser slices preludes and values straight out of
/// the source, so the exact split of `Text` runs does not matter.
#[derive(Debug, Logos, PartialEq, Eq, Clone, Copy)]
pub enum TokenKind {
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(";")]
    Semicolon,
    #[token(":")]
    Colon,
    #[token("/")]
    Slash,

    #[regex(r#""([^"\\\n]|\\.)*""#)]
    #[regex(r#"'([^'\\\n]|\\.)*'"#)]
    String,

    #[regex(r#"[^{};:"'/ \t\r\n\f]+"#)]
    Text,

    #[token("/*", block_comment)]
    Comment,

    #[regex(r"[ \t\r\n\f]+", logos::skip)]
    Whitespace,

    #[error]
    Error,
}

/// Consumes the rest of a `/* ... */` comment. An unterminated comment
/// swallows the remaining input and lexes as an error.
fn block_comment(lex: &mut Lexer<TokenKind>) -> bool {
    match lex.remainder().find("*/") {
        Some(end) => {
            lex.bump(end + 2);
            true
        }
        None => {
            lex.bump(lex.remainder().len());
            false
        }
    }
}

/// Splits `source` into tokens, dropping whitespace and comments.
///
/// Dropped text is not lost: the parser recovers it from the gaps between
/// token spans.
pub fn lex(source: &str) -> SyntaxResult<Vec<Token<'_>>> {
    let mut tokens = Vec::new();
    for (kind, range) in TokenKind::lexer(source).spanned() {
        let span = SourceSpan::new(range.start.into(), range.end - range.start);
        let lexeme = &source[range];
        match kind {
            TokenKind::Comment => continue,
            TokenKind::Error => {
                let message = if lexeme.starts_with("/*") {
                    "unterminated comment".to_string()
                } else if lexeme.starts_with('"') || lexeme.starts_with('\'') {
                    "unterminated string".to_string()
                } else {
                    format!("unexpected character `{}`", lexeme)
                };
                return Err(SyntaxError::InvalidToken { message, span });
            }
            _ => tokens.push(Token { kind, lexeme, span }),
        }
    }
    Ok(tokens)
}
