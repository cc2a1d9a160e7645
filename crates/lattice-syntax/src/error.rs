use thiserror::Error;
use miette::{Diagnostic, SourceSpan};

/// Errors produced while turning stylesheet text into a [`crate::Stylesheet`].
#[derive(Debug, Clone, Error, Diagnostic, PartialEq, Eq)]
pub enum SyntaxError {
    /// The lexer hit text it has no token for, such as an unterminated string.
    #[error("Invalid token: {message}")]
    #[diagnostic(code(lattice_syntax::invalid_token))]
    InvalidToken {
        message: String,
        #[label("here")]
        span: SourceSpan,
    },

    #[error("Unexpected `{found}`, expected {expected}")]
    #[diagnostic(code(lattice_syntax::unexpected_token))]
    UnexpectedToken {
        found: String,
        expected: String,
        #[label("unexpected token")]
        span: SourceSpan,
    },

    #[error("Unexpected end of input, expected {expected}")]
    #[diagnostic(code(lattice_syntax::unexpected_eof))]
    UnexpectedEof {
        expected: String,
        #[label("input ends here")]
        span: SourceSpan,
    },

    /// A `{` without its matching `}`.
    #[error("Unclosed block")]
    #[diagnostic(
        code(lattice_syntax::unclosed_block),
        help("Add the missing `}}`")
    )]
    UnclosedBlock {
        #[label("block opened here")]
        span: SourceSpan,
    },

    /// A declaration without the `:` separating name and value.
    #[error("Declaration `{text}` is missing a `:`")]
    #[diagnostic(code(lattice_syntax::missing_colon))]
    MissingColon {
        text: String,
        #[label("expected `name: value`")]
        span: SourceSpan,
    },
}

impl SyntaxError {
    pub fn span(&self) -> SourceSpan {
        match self {
            SyntaxError::InvalidToken { span, .. }
            | SyntaxError::UnexpectedToken { span, .. }
            | SyntaxError::UnexpectedEof { span, .. }
            | SyntaxError::UnclosedBlock { span }
            | SyntaxError::MissingColon { span, .. } => *span,
        }
    }
}

pub type SyntaxResult<T> = Result<T, SyntaxError>;
