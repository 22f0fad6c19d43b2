use crate::token::{Token, TokenType};
use crate::value::object::Object;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;

/// Whether a lex, parse, or resolution error has been reported. The process
/// exits with code 65 when this is set.
static HAD_ERROR: AtomicBool = AtomicBool::new(false);

/// Whether execution hit a runtime error. The process exits with code 70
/// when this is set.
static HAD_RUNTIME_ERROR: AtomicBool = AtomicBool::new(false);

/// Everything that can interrupt parsing or evaluation.
///
/// `ParseError` and `ResolveError` are sentinels: the offending token and
/// message have already been reported through `token_error` by the time one
/// is constructed, so they only carry the fact that the phase failed.
/// `Return` is not a failure at all. It is the non-local exit used by the
/// `return` statement, and the single place allowed to catch it is the
/// user-function call in `value::function`.
#[derive(Debug, Error)]
pub enum Error {
    #[error("parse error")]
    ParseError,
    #[error("resolve error")]
    ResolveError,
    #[error("{1}")]
    RuntimeError(Token, String),
    #[error("return")]
    Return(Object),
}

pub fn error(line: usize, message: &str) {
    report(line, "", message);
}

/// Reports an error at a token, pointing at its lexeme (or at end of input
/// for the EOF token).
pub fn token_error(token: &Token, message: &str) {
    if token.token_type == TokenType::EOF {
        report(token.line, " at end", message);
    } else {
        report(token.line, &format!(" at '{}'", token.lexeme), message);
    }
}

fn report(line: usize, location: &str, message: &str) {
    eprintln!("[line {line}] Error{location}: {message}");
    HAD_ERROR.store(true, Ordering::Relaxed);
}

/// Prints a runtime error in the canonical two-line form: the message,
/// then the line of the offending token.
pub fn runtime_error(error: Error) {
    if let Error::RuntimeError(token, message) = error {
        eprintln!("{message}\n[line {}]", token.line);
    }
    HAD_RUNTIME_ERROR.store(true, Ordering::Relaxed);
}

pub fn had_error() -> bool {
    HAD_ERROR.load(Ordering::Relaxed)
}

pub fn had_runtime_error() -> bool {
    HAD_RUNTIME_ERROR.load(Ordering::Relaxed)
}
