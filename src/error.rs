//! Centralised error hierarchy for the **Rox interpreter**.
//!
//! Three failure modes reach the host: an aggregate of static (syntax) errors,
//! a single runtime error, or an I/O problem while loading source text.  The
//! scanner and parser never abort on the first problem; they build
//! [`SyntaxError`] values and hand the full list back as [`LoxError::Static`].
//!
//! The module **does not** print diagnostics itself.

use std::io;
use thiserror::Error;

use log::info;

use crate::token::{Token, TokenType};

/// One static diagnostic produced by the scanner or the parser.
///
/// Renders as `[line L] Error<location>: <message>` where `location` is
/// ` at 'lexeme'`, ` at end`, or empty for scanner diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("[line {line}] Error{location}: {message}")]
pub struct SyntaxError {
    /// 1‑based line where the error occurred.
    pub line: usize,

    /// Pre-rendered location suffix.
    pub location: String,

    /// Human‑readable description.
    pub message: String,
}

impl SyntaxError {
    /// Error reported by the **parser** against a specific token.
    pub fn at<S: Into<String>>(token: &Token, msg: S) -> Self {
        let message: String = msg.into();

        let location: String = if token.token_type == TokenType::EOF {
            " at end".to_string()
        } else {
            format!(" at '{}'", token.lexeme)
        };

        info!(
            "Creating syntax error: line={}, location={}, msg={}",
            token.line, location, message
        );

        Self {
            line: token.line,
            location,
            message,
        }
    }

    /// Error reported by the **scanner**, which has no token to point at.
    pub fn lex<S: Into<String>>(line: usize, msg: S) -> Self {
        let message: String = msg.into();

        info!("Creating lex error: line={}, msg={}", line, message);

        Self {
            line,
            location: String::new(),
            message,
        }
    }
}

/// Canonical error type used throughout the interpreter.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoxError {
    /// Every static error found in one source text, in source order.
    #[error("{}", join_lines(.0))]
    Static(Vec<SyntaxError>),

    /// Runtime evaluation error.  Execution stops at the first one.
    #[error("{message}\n[line {line}]")]
    Runtime { message: String, line: usize },

    /// Wrapper around `std::io::Error` (transparent).  Enables `?` on I/O ops,
    /// including writes performed by `print`.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// UTF‑8 decoding failure when ingesting external text.
    #[error(transparent)]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl LoxError {
    /// Helper constructor for the **interpreter**; the token supplies the line.
    pub fn runtime<S: Into<String>>(token: &Token, msg: S) -> Self {
        let message: String = msg.into();

        info!(
            "Creating Runtime error: line={}, msg={}",
            token.line, message
        );

        LoxError::Runtime {
            message,
            line: token.line,
        }
    }

    /// Wrap a non-empty error list, ordering it by line.  The sort is stable so
    /// errors on the same line keep the order they were found in.
    pub fn aggregate(mut errors: Vec<SyntaxError>) -> Self {
        errors.sort_by_key(|e| e.line);

        info!("Aggregating {} static error(s)", errors.len());

        LoxError::Static(errors)
    }
}

fn join_lines(errors: &[SyntaxError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Crate‑wide `Result` alias.
pub type Result<T> = std::result::Result<T, LoxError>;
