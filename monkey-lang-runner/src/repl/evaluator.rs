use gc::Gc;
use monkey_lang_core::lexer::Lexer;
use monkey_lang_interpreter::environment::Environment;
use monkey_lang_interpreter::object::Object;

use crate::runner::{self, RunError};

pub trait Evaluator {
    type Object;

    fn evaluate(&mut self, line: &str) -> Self::Object;
}

/// Keeps one global scope for the whole session.
pub struct InterpreterEvaluator {
    environment: Environment,
}

impl InterpreterEvaluator {
    pub fn new() -> Self {
        Self {
            environment: Environment::new(),
        }
    }
}

impl Evaluator for InterpreterEvaluator {
    type Object = Result<Gc<Object>, RunError>;

    fn evaluate(&mut self, line: &str) -> Self::Object {
        runner::evaluate(Lexer::new(line), &mut self.environment)
    }
}

pub struct TokenEvaluator;

impl Evaluator for TokenEvaluator {
    type Object = Result<String, RunError>;

    fn evaluate(&mut self, line: &str) -> Self::Object {
        Ok(runner::render_tokens(Lexer::new(line)))
    }
}

pub struct AstEvaluator;

impl Evaluator for AstEvaluator {
    type Object = Result<String, RunError>;

    fn evaluate(&mut self, line: &str) -> Self::Object {
        runner::parse_program(Lexer::new(line)).map(|program| program.to_string())
    }
}
