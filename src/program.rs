use std::fmt;

use crate::error::{Error, Result};
use crate::parser::{FLIP, LOOP_END, LOOP_START, OUTPUT};

/// One parsed Stroke command.
///
/// Variables are addressed by index; in source text variable `n` is
/// written as `n + 1` flip marks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Instruction {
    /// Toggle the bit of a variable.
    Flip(usize),
    /// Enter the loop body while the variable is set, otherwise skip past
    /// the matching [`Instruction::LoopEnd`].
    LoopStart(usize),
    /// Jump back to the matching [`Instruction::LoopStart`].
    LoopEnd,
    /// Hand a snapshot of memory to the output sink.
    Output,
}

/// A flat, loop-balanced instruction sequence.
///
/// Only the parser and the random generator build programs, so every
/// `LoopStart` is paired with exactly one later `LoopEnd`, properly nested.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    instructions: Vec<Instruction>,
}

impl Program {
    /// Wrap an instruction sequence the caller has already balanced.
    pub(crate) fn from_balanced(instructions: Vec<Instruction>) -> Self {
        Self { instructions }
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Render the program in numeric notation, one instruction per line,
    /// loop bodies indented by two spaces.
    ///
    /// The result parses back to the same program after
    /// [`expand_variables`](crate::notation::expand_variables).
    pub fn disassemble(&self) -> String {
        let mut out = String::new();
        let mut depth = 0usize;
        for instr in &self.instructions {
            if *instr == Instruction::LoopEnd {
                depth = depth.saturating_sub(1);
            }
            for _ in 0..depth {
                out.push_str("  ");
            }
            match *instr {
                Instruction::Flip(v) => out.push_str(&v.to_string()),
                Instruction::LoopStart(v) => {
                    out.push(LOOP_START);
                    out.push(' ');
                    out.push_str(&v.to_string());
                    depth += 1;
                }
                Instruction::LoopEnd => out.push(LOOP_END),
                Instruction::Output => out.push(OUTPUT),
            }
            out.push('\n');
        }
        out
    }
}

fn push_flip_run(out: &mut String, variable: usize) {
    for _ in 0..=variable {
        out.push(FLIP);
    }
}

/// Glyph form, space separated. Parses back to the same program.
impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        for (i, instr) in self.instructions.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            match *instr {
                Instruction::Flip(v) => push_flip_run(&mut out, v),
                Instruction::LoopStart(v) => {
                    out.push(LOOP_START);
                    out.push(' ');
                    push_flip_run(&mut out, v);
                }
                Instruction::LoopEnd => out.push(LOOP_END),
                Instruction::Output => out.push(OUTPUT),
            }
        }
        f.write_str(&out)
    }
}

/// Find the `LoopEnd` matching the `LoopStart` at `pc` by scanning forward
/// and counting nested pairs.
pub fn find_loop_end(instructions: &[Instruction], pc: usize) -> Result<usize> {
    let mut pairs = 0usize;
    for (i, instr) in instructions.iter().enumerate().skip(pc + 1) {
        match instr {
            Instruction::LoopStart(_) => pairs += 1,
            Instruction::LoopEnd => {
                if pairs == 0 {
                    return Ok(i);
                }
                pairs -= 1;
            }
            _ => {}
        }
    }
    Err(Error::LoopEndNotFound { pc })
}

/// Find the `LoopStart` matching the `LoopEnd` at `pc` by scanning backward
/// and counting nested pairs.
pub fn find_loop_start(instructions: &[Instruction], pc: usize) -> Result<usize> {
    let mut pairs = 0usize;
    let end = pc.min(instructions.len());
    for i in (0..end).rev() {
        match instructions[i] {
            Instruction::LoopEnd => pairs += 1,
            Instruction::LoopStart(_) => {
                if pairs == 0 {
                    return Ok(i);
                }
                pairs -= 1;
            }
            _ => {}
        }
    }
    Err(Error::LoopStartNotFound { pc })
}
