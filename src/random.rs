use rand::Rng;
use rand::rngs::SmallRng;

use crate::program::{Instruction, Program};

/// Configuration for random program generation.
#[derive(Debug, Clone)]
pub struct RandomConfig {
    /// Number of instructions drawn before open loops are closed.
    pub length: usize,
    /// Variables are drawn uniformly from `0..variables`.
    pub variables: usize,
    /// Probability that an instruction is a loop start or loop end.
    pub loop_probability: f64,
    /// Probability that an instruction is an output.
    pub output_probability: f64,
}

impl Default for RandomConfig {
    fn default() -> Self {
        Self {
            length: 32,
            variables: 8,
            loop_probability: 0.15,
            output_probability: 0.05,
        }
    }
}

/// Draw a random, loop-balanced program.
///
/// Loop ends are only emitted while a loop is open, and any loops still open
/// after `length` instructions are closed at the end, so the result always
/// satisfies the same invariant as a parsed program.
pub fn random_program(rng: &mut SmallRng, config: &RandomConfig) -> Program {
    let variables = config.variables.max(1);
    let mut code = Vec::with_capacity(config.length);
    let mut open = 0usize;

    for _ in 0..config.length {
        let u: f64 = rng.r#gen::<f64>();
        if u < config.loop_probability {
            if open > 0 && rng.r#gen::<bool>() {
                code.push(Instruction::LoopEnd);
                open -= 1;
            } else {
                code.push(Instruction::LoopStart(rng.gen_range(0..variables)));
                open += 1;
            }
        } else if u < config.loop_probability + config.output_probability {
            code.push(Instruction::Output);
        } else {
            code.push(Instruction::Flip(rng.gen_range(0..variables)));
        }
    }
    code.extend(std::iter::repeat_n(Instruction::LoopEnd, open));

    Program::from_balanced(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use rand::SeedableRng;

    fn generate(seed: u64, config: &RandomConfig) -> Program {
        let mut rng = SmallRng::seed_from_u64(seed);
        random_program(&mut rng, config)
    }

    #[test]
    fn test_deterministic_generation() {
        let config = RandomConfig::default();
        assert_eq!(generate(42, &config), generate(42, &config));
    }

    #[test]
    fn test_different_seeds_different_programs() {
        let config = RandomConfig {
            length: 64,
            ..Default::default()
        };
        assert_ne!(generate(1, &config), generate(2, &config));
    }

    #[test]
    fn test_length_and_variable_range() {
        let config = RandomConfig {
            length: 200,
            variables: 3,
            ..Default::default()
        };
        for seed in 0..20 {
            let program = generate(seed, &config);
            assert!(program.len() >= 200);
            for instr in program.instructions() {
                match *instr {
                    Instruction::Flip(v) | Instruction::LoopStart(v) => assert!(v < 3),
                    _ => {}
                }
            }
        }
    }

    #[test]
    fn test_generated_programs_parse_back() {
        let config = RandomConfig {
            length: 100,
            loop_probability: 0.5,
            ..Default::default()
        };
        for seed in 0..50 {
            let program = generate(seed, &config);
            assert_eq!(parse(&program.to_string()).unwrap(), program);
        }
    }

    #[test]
    fn test_zero_length() {
        let config = RandomConfig {
            length: 0,
            ..Default::default()
        };
        assert!(generate(7, &config).is_empty());
    }

    #[test]
    fn test_only_flips_without_loops_or_output() {
        let config = RandomConfig {
            length: 50,
            loop_probability: 0.0,
            output_probability: 0.0,
            ..Default::default()
        };
        let program = generate(3, &config);
        assert_eq!(program.len(), 50);
        assert!(
            program
                .instructions()
                .iter()
                .all(|i| matches!(i, Instruction::Flip(_)))
        );
    }
}
