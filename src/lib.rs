//! Tree‑walking interpreter for the Rox scripting language.
//!
//! Hosts talk to the crate through two calls: [`tokenize`] for the token stream
//! and [`run`] to execute a source text in a given scope.

pub mod ast;
pub mod ast_printer;
pub mod class;
pub mod environment;
pub mod error;
pub mod function;
pub mod interpreter;
pub mod parser;
pub mod scanner;
pub mod token;
pub mod value;

use log::warn;

use crate::environment::EnvRef;
use crate::error::Result;
use crate::interpreter::Interpreter;
use crate::scanner::Scanner;
use crate::token::Token;

/// Scan `source` into tokens, ending with exactly one `EOF`.
///
/// Never fails: unknown characters come back as `INVALID` tokens.  An
/// unterminated string produces no token and is only logged here; [`run`]
/// reports it as a static error.
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut scanner: Scanner<'_> = Scanner::new(source);
    let tokens: Vec<Token> = scanner.by_ref().collect();

    for error in scanner.errors() {
        warn!("{}", error);
    }

    tokens
}

/// Execute `source` in `env`, printing to standard output.
///
/// Returns [`error::LoxError::Static`] (nothing ran) or
/// [`error::LoxError::Runtime`] (output printed before the failure stays printed).
pub fn run(source: &str, env: &EnvRef) -> Result<()> {
    Interpreter::new().run(source, env)
}
