use gc::Gc;
use monkey_lang_interpreter::object::Object;

use crate::runner::RunError;

pub trait Printer {
    type Object;

    fn print(&mut self, object: Self::Object);
}

pub struct InterpreterPrinter;

impl Printer for InterpreterPrinter {
    type Object = Result<Gc<Object>, RunError>;

    fn print(&mut self, object: Self::Object) {
        match object {
            Ok(obj) => println!("{}", obj.inspect()),
            Err(err) => println!("{}", err),
        }
    }
}

/// Prints anything already rendered, or the error that stopped rendering.
pub struct RenderPrinter;

impl Printer for RenderPrinter {
    type Object = Result<String, RunError>;

    fn print(&mut self, object: Self::Object) {
        match object {
            Ok(rendered) => print!("{}", rendered),
            Err(err) => println!("{}", err),
        }
    }
}
