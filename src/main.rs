mod environment;
mod error;
mod expr;
mod interpreter;
mod lox;
mod parser;
mod resolver;
mod scanner;
mod stmt;
mod token;
mod value;

use anyhow::Context;
use std::env;
use std::fs;
use std::process::exit;

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: {} <tokenize|parse|evaluate|run> <filename>", args[0]);
        exit(64);
    }

    let command = &args[1];
    let filename = &args[2];

    let source = read_source(filename).unwrap_or_else(|err| {
        eprintln!("{err:#}");
        exit(65);
    });

    match command.as_str() {
        "tokenize" => lox::tokenize(source),
        "parse" => lox::parse(source),
        "evaluate" => lox::evaluate(source),
        "run" => lox::run(source),
        _ => {
            eprintln!("Unknown command: {command}");
            exit(64);
        }
    }

    if error::had_error() {
        exit(65);
    }
    if error::had_runtime_error() {
        exit(70);
    }
}

fn read_source(path: &str) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read file {path}"))
}
