//! Interpreter for Stroke, a tiny language over an unbounded array of bits.
//!
//! A program is a whitespace-separated list of commands built from four
//! glyphs. Variable `n` is written as `n + 1` flip marks:
//!
//! ```text
//! |||        flip variable 2
//! / ||  ...  \    loop while variable 1 is set
//! !          output a snapshot of memory
//! ```
//!
//! Everything else in the source is a comment. Execution is
//! [`parser::parse`] followed by [`executor::Executor::run`]; [`interpret`]
//! does both.

pub mod error;
pub mod executor;
pub mod memory;
pub mod notation;
pub mod parser;
pub mod program;
pub mod random;

pub use error::{Error, OutputError, Result, SyntaxError};
pub use executor::{DEFAULT_MAX_STEPS, Executor, RunConfig};
pub use memory::Memory;
pub use program::{Instruction, Program};

/// Parse and run `program`, returning the final memory as a bit string with
/// trailing zeros stripped.
///
/// `memory` seeds the initial bits (`'1'` sets a bit, anything else leaves
/// it clear). A `max_steps` of `None` or `Some(0)` selects
/// [`DEFAULT_MAX_STEPS`]. `on_output` receives a memory snapshot every time
/// the program outputs; returning an error aborts the run.
pub fn interpret<F>(
    program: &str,
    memory: Option<&str>,
    max_steps: Option<usize>,
    on_output: F,
) -> Result<String>
where
    F: FnMut(&str) -> std::result::Result<(), OutputError>,
{
    let program = parser::parse(program)?;
    let memory = memory.map(Memory::from_bits).unwrap_or_default();
    let config = RunConfig::with_max_steps(max_steps.unwrap_or(0));
    Executor::new(&program, memory, &config).run(on_output)
}

/// [`interpret`] without an output sink.
pub fn interpret_silent(program: &str, memory: Option<&str>, max_steps: Option<usize>) -> Result<String> {
    interpret(program, memory, max_steps, |_| Ok(()))
}
