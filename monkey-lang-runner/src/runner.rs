use std::path::{Path, PathBuf};

use gc::Gc;
use monkey_lang_core::ast::Program;
use monkey_lang_core::lexer::{Lexer, Token};
use monkey_lang_core::parser::{ParseError, Parser};
use monkey_lang_interpreter::environment::Environment;
use monkey_lang_interpreter::evaluator;
use monkey_lang_interpreter::object::{EvaluationError, Object};
use rustyline::error::ReadlineError;
use thiserror::Error;

use crate::Mode;

#[derive(Debug, Error)]
pub enum RunError {
    #[error("could not read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{}", render_parse_errors(.0))]
    Parse(Vec<ParseError>),
    #[error("ERROR: {0}")]
    Evaluation(#[from] EvaluationError),
    #[error("readline failed: {0}")]
    Readline(#[from] ReadlineError),
}

fn render_parse_errors(errors: &[ParseError]) -> String {
    let mut rendered = String::from("parser errors:");
    for error in errors {
        rendered.push_str("\n\t");
        rendered.push_str(&error.to_string());
    }
    rendered
}

/// Parses everything `lexer` produces, refusing the program if any statement
/// failed to parse.
pub fn parse_program(lexer: Lexer) -> Result<Program, RunError> {
    let mut parser = Parser::new(lexer);
    let program = parser.parse_program();
    if parser.errors().is_empty() {
        Ok(program)
    } else {
        Err(RunError::Parse(parser.errors().to_vec()))
    }
}

pub fn evaluate(lexer: Lexer, environment: &mut Environment) -> Result<Gc<Object>, RunError> {
    let program = parse_program(lexer)?;
    Ok(evaluator::eval_program(&program, environment)?)
}

pub fn render_tokens(lexer: Lexer) -> String {
    lexer
        .map(|token: Token| format!("{}\t{:?}\n", token.position, token.kind))
        .collect()
}

pub fn execute(path: &Path, mode: Mode) -> Result<(), RunError> {
    let source = std::fs::read_to_string(path).map_err(|source| RunError::Io {
        path: path.to_owned(),
        source,
    })?;
    let lexer = Lexer::with_file(&source, path.display().to_string());
    tracing::debug!(path = %path.display(), ?mode, "running file");

    match mode {
        Mode::Tokens => print!("{}", render_tokens(lexer)),
        Mode::Ast => print!("{}", parse_program(lexer)?),
        Mode::Evaluate => {
            let result = evaluate(lexer, &mut Environment::new())?;
            if !matches!(*result, Object::Null) {
                println!("{}", result.inspect());
            }
        }
    }
    Ok(())
}
