mod repl;
mod runner;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, PartialEq, ValueEnum)]
pub enum Mode {
    /// Evaluate the program and print its value
    Evaluate,
    /// Print the token stream
    Tokens,
    /// Print the parsed program in its canonical form
    Ast,
}

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    #[arg(short, long, value_enum, default_value_t = Mode::Evaluate)]
    mode: Mode,
    /// Source file to run; starts the REPL when omitted
    path: Option<PathBuf>,
}

/// Log output goes to stderr so it never mixes with program output.
/// Filtering is read from `MONKEY_LOG`, e.g. `MONKEY_LOG=monkey_lang_interpreter=trace`.
fn init_tracing() {
    let filter = EnvFilter::try_from_env("MONKEY_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.path {
        None => repl::start(cli.mode).map_err(runner::RunError::from),
        Some(path) => runner::execute(&path, cli.mode),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
    }
}
