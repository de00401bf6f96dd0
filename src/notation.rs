//! Numeric shorthand for Stroke source.
//!
//! Writing variable 12 as thirteen flip marks gets old quickly, so programs
//! are usually written with decimal numbers (`/ 3 3 4 \`) and expanded
//! before parsing. Numbers are the only thing rewritten: letters and
//! punctuation still vanish at parse time, which keeps comments working as
//! long as they contain no digits.

use crate::error::SyntaxError;
use crate::parser::{FLIP, parse};
use crate::program::Program;

/// Largest variable index the expansion accepts.
pub const MAX_VARIABLE: usize = 1 << 20;

/// Replace every run of ASCII digits `n` with `n + 1` flip marks.
pub fn expand_variables(source: &str) -> Result<String, SyntaxError> {
    let mut out = String::with_capacity(source.len());
    let mut digits = String::new();
    for c in source.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
            continue;
        }
        if !digits.is_empty() {
            push_variable(&mut out, &digits)?;
            digits.clear();
        }
        out.push(c);
    }
    if !digits.is_empty() {
        push_variable(&mut out, &digits)?;
    }
    Ok(out)
}

fn push_variable(out: &mut String, literal: &str) -> Result<(), SyntaxError> {
    let variable = literal
        .parse::<usize>()
        .ok()
        .filter(|&v| v <= MAX_VARIABLE)
        .ok_or_else(|| SyntaxError::VariableOutOfRange {
            literal: literal.to_string(),
        })?;
    for _ in 0..=variable {
        out.push(FLIP);
    }
    Ok(())
}

/// Expand numeric notation and parse the result.
pub fn parse_numeric(source: &str) -> Result<Program, SyntaxError> {
    parse(&expand_variables(source)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::program::Instruction::*;

    #[test]
    fn test_expand_single_numbers() {
        assert_eq!(expand_variables("0").unwrap(), "|");
        assert_eq!(expand_variables("2 0").unwrap(), "||| |");
        assert_eq!(expand_variables("/ 0 1 \\").unwrap(), "/ | || \\");
    }

    #[test]
    fn test_multi_digit_numbers() {
        assert_eq!(expand_variables("12").unwrap(), "|".repeat(13));
        assert_eq!(expand_variables("007").unwrap(), "|".repeat(8));
    }

    #[test]
    fn test_comments_survive_expansion() {
        assert_eq!(
            expand_variables("14  running\n/ 4 4 first").unwrap(),
            format!("{}  running\n/ ||||| ||||| first", "|".repeat(15))
        );
    }

    #[test]
    fn test_out_of_range() {
        assert_eq!(
            expand_variables("99999999999999999999999"),
            Err(SyntaxError::VariableOutOfRange {
                literal: "99999999999999999999999".to_string()
            })
        );
        let too_big = (MAX_VARIABLE + 1).to_string();
        assert!(expand_variables(&too_big).is_err());
    }

    #[test]
    fn test_parse_numeric() {
        let program = parse_numeric("12 0 1 2 5").unwrap();
        assert_eq!(
            program.instructions(),
            &[Flip(12), Flip(0), Flip(1), Flip(2), Flip(5)]
        );
    }

    #[test]
    fn test_disassembly_reparses() {
        let source = "15\n/ 15\n  / 4 4 12 \\\n  !\n\\\n";
        let program = parse_numeric(source).unwrap();
        assert_eq!(parse_numeric(&program.disassemble()).unwrap(), program);
    }
}
