//! Error types for the front end.
//!
//! Every error is fatal: the pipeline stops at the first one and the binary
//! prints its message as a single line on stderr.

use crate::parser::lexer::LexError;
use crate::parser::parse::SyntaxError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for front-end operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the front end.
#[derive(Error, Debug)]
pub enum Error {
    /// No source file was named on the command line
    #[error("missing source file")]
    MissingSource,

    /// Source file could not be opened or read
    #[error("open source file failed: {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Scanner rejected the input
    #[error(transparent)]
    Lex(#[from] LexError),

    /// A rule failed in commit mode
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    /// The start rule matched but tokens remain before end of input
    #[error("syntactic panic: extra tokens at line {line}")]
    ExtraTokens { line: usize },

    /// The token stream outgrew the configured limit
    #[error("lexer panic: too many tokens (limit {limit})")]
    TooManyTokens { limit: usize },

    /// Writing a dump failed
    #[error("write failed: {0}")]
    Io(#[from] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ast::Rule;
    use crate::parser::lexer::{LexErrorCode, TokenKind};
    use crate::parser::parse::Expectation;

    #[test]
    fn test_messages_are_single_line() {
        let errors = [
            Error::MissingSource,
            Error::Open {
                path: PathBuf::from("nope.c"),
                source: io::Error::new(io::ErrorKind::NotFound, "not found"),
            },
            Error::from(LexError {
                code: LexErrorCode::BadSharp,
                line: 4,
            }),
            Error::from(SyntaxError {
                line: 2,
                expectation: Expectation::Token(TokenKind::Rp),
                rule: Rule::Call,
            }),
            Error::ExtraTokens { line: 9 },
            Error::TooManyTokens { limit: 8 },
        ];

        for err in errors {
            assert!(!err.to_string().contains('\n'), "{err}");
        }
    }

    #[test]
    fn test_wrapped_messages() {
        let lex = Error::from(LexError {
            code: LexErrorCode::UnterminatedComment,
            line: 12,
        });
        assert_eq!(lex.to_string(), "lexical error at line 12, type UNTERMINATED_COMMENT");

        let syntax = Error::from(SyntaxError {
            line: 2,
            expectation: Expectation::Token(TokenKind::Rp),
            rule: Rule::Call,
        });
        assert_eq!(syntax.to_string(), "Syntax error at line 2 (expected RP in call)");
    }
}
