use tracing::debug;

use crate::error::SyntaxError;
use crate::program::{Instruction, Program};

/// Flip mark. A run of `n + 1` of these addresses variable `n`.
pub const FLIP: char = '|';
/// Opens a loop; the next token names the condition variable.
pub const LOOP_START: char = '/';
/// Closes the innermost open loop.
pub const LOOP_END: char = '\\';
/// Output mark. Runs of any length are a single output.
pub const OUTPUT: char = '!';

/// Returns true if `c` means something to the parser. Every other
/// non-whitespace character is a comment.
pub fn is_glyph(c: char) -> bool {
    matches!(c, FLIP | LOOP_START | LOOP_END | OUTPUT)
}

/// Length of `token` if it consists solely of `glyph`.
fn run_length(token: &str, glyph: char) -> Option<usize> {
    if !token.is_empty() && token.chars().all(|c| c == glyph) {
        Some(token.len())
    } else {
        None
    }
}

/// Parse Stroke source text into a loop-balanced [`Program`].
///
/// Characters other than whitespace and the four glyphs are dropped first,
/// so any text without glyphs can serve as a comment. The remaining
/// whitespace-separated tokens are classified one by one:
///
/// - `|`, `||`, ... flip variable `len - 1`
/// - `/` followed by a flip run: loop on variable `len - 1`
/// - `\`: end of loop
/// - `!`, `!!`, ...: output
pub fn parse(source: &str) -> Result<Program, SyntaxError> {
    let stripped: String = source
        .chars()
        .filter(|&c| c.is_whitespace() || is_glyph(c))
        .collect();
    let tokens: Vec<&str> = stripped.split_whitespace().collect();

    let mut instructions = Vec::with_capacity(tokens.len());
    let mut open: usize = 0;
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i];

        if let Some(len) = run_length(token, FLIP) {
            instructions.push(Instruction::Flip(len - 1));
        } else if token.len() == 1 && token.starts_with(LOOP_START) {
            i += 1;
            let len = tokens
                .get(i)
                .and_then(|operand| run_length(operand, FLIP))
                .ok_or(SyntaxError::MissingLoopVariable { position: i })?;
            open += 1;
            instructions.push(Instruction::LoopStart(len - 1));
        } else if token.len() == 1 && token.starts_with(LOOP_END) {
            if open == 0 {
                return Err(SyntaxError::MissingLoopStart { position: i });
            }
            open -= 1;
            instructions.push(Instruction::LoopEnd);
        } else if run_length(token, OUTPUT).is_some() {
            instructions.push(Instruction::Output);
        } else {
            return Err(SyntaxError::InvalidCommand {
                token: token.to_string(),
                position: i,
            });
        }

        i += 1;
    }

    if open > 0 {
        return Err(SyntaxError::MissingLoopEnd { unclosed: open });
    }

    debug!(tokens = tokens.len(), instructions = instructions.len(), "parsed program");
    Ok(Program::from_balanced(instructions))
}
