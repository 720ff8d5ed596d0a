mod evaluator;
mod printer;
mod reader;

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use evaluator::{AstEvaluator, Evaluator, InterpreterEvaluator, TokenEvaluator};
use printer::{InterpreterPrinter, Printer, RenderPrinter};
use reader::{ReadOutput, Reader};

use crate::Mode;

struct Repl<E: Evaluator, P: Printer> {
    reader: Reader,
    evaluator: E,
    printer: P,
}

impl<O, E: Evaluator<Object = O>, P: Printer<Object = O>> Repl<E, P> {
    fn run(mut self) {
        loop {
            match self.reader.read() {
                ReadOutput::Exit => break,
                ReadOutput::Clear => continue,
                ReadOutput::Line(line) => {
                    let result = self.evaluator.evaluate(&line);
                    self.printer.print(result)
                }
            }
        }
    }
}

pub fn start(mode: Mode) -> Result<(), ReadlineError> {
    let reader = Reader::new(DefaultEditor::new()?);

    match mode {
        Mode::Evaluate => Repl {
            reader,
            evaluator: InterpreterEvaluator::new(),
            printer: InterpreterPrinter,
        }
        .run(),
        Mode::Tokens => Repl {
            reader,
            evaluator: TokenEvaluator,
            printer: RenderPrinter,
        }
        .run(),
        Mode::Ast => Repl {
            reader,
            evaluator: AstEvaluator,
            printer: RenderPrinter,
        }
        .run(),
    };
    Ok(())
}
