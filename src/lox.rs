use crate::error;
use crate::interpreter::Interpreter;
use crate::parser::Parser;
use crate::resolver::Resolver;
use crate::scanner::Scanner;
use log::debug;

/// Lex only: dump every token in the canonical `TYPE LEXEME LITERAL` form.
/// Lex errors go to stderr while the valid tokens still print, so a file
/// with one bad character still shows everything around it.
pub fn tokenize(source: String) {
    let mut scanner = Scanner::new(source);
    let tokens = scanner.scan_tokens();
    for token in tokens {
        println!("{token}");
    }
}

/// Lex and parse a single expression, printing its parenthesized form.
pub fn parse(source: String) {
    let mut scanner = Scanner::new(source);
    let tokens = scanner.scan_tokens();
    let mut parser = Parser::new(tokens);
    if let Ok(expression) = parser.expression() {
        println!("{expression}");
    }
}

/// Lex, parse, and evaluate a single expression, printing its value.
/// No resolution pass runs here: an expression on its own has no local
/// scopes, so every name falls back to the global frame.
pub fn evaluate(source: String) {
    let mut scanner = Scanner::new(source);
    let tokens = scanner.scan_tokens();
    let mut parser = Parser::new(tokens);
    if let Ok(expression) = parser.expression() {
        let mut interpreter = Interpreter::new();
        match interpreter.evaluate(&expression) {
            Ok(value) => println!("{value}"),
            Err(error) => error::runtime_error(error),
        }
    }
}

/// The full pipeline: lex, parse, resolve, execute.
pub fn run(source: String) {
    let mut scanner = Scanner::new(source);
    let tokens = scanner.scan_tokens();
    debug!("scanned {} tokens", tokens.len());

    let mut parser = Parser::new(tokens);
    let statements = parser.parse();
    debug!("parsed {} statements", statements.len());

    // Don't resolve or run a program with syntax errors.
    if error::had_error() {
        return;
    }

    let resolver = Resolver::new();
    let locals = match resolver.resolve(&statements) {
        Ok(locals) => locals,
        // Already reported; the error flag is set.
        Err(_) => return,
    };
    debug!("resolved {} local references", locals.len());

    let mut interpreter = Interpreter::with_locals(locals);
    interpreter.interpret(&statements);
}
