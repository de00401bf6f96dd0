use tracing::{debug, trace};

use crate::error::{Error, OutputError, Result};
use crate::memory::Memory;
use crate::program::{Instruction, Program, find_loop_end, find_loop_start};

/// Step ceiling used when the caller does not pick one.
pub const DEFAULT_MAX_STEPS: usize = 1_000_000;

/// Configuration for a single run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunConfig {
    /// Maximum instructions executed before the run is aborted as
    /// non-terminating.
    pub max_steps: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            max_steps: DEFAULT_MAX_STEPS,
        }
    }
}

impl RunConfig {
    /// A limit of 0 selects [`DEFAULT_MAX_STEPS`].
    pub fn with_max_steps(max_steps: usize) -> Self {
        if max_steps == 0 {
            Self::default()
        } else {
            Self { max_steps }
        }
    }
}

/// Fetch-decode-execute loop over a parsed [`Program`].
///
/// State:
/// - `pc`: index of the next instruction, starts at 0
/// - `steps`: instructions executed so far, starts at 0
/// - `memory`: owned by this run, seeded by the caller
///
/// The run halts when `pc` walks off the end of the program. After every
/// instruction the step counter is incremented, and once it exceeds the
/// limit the run fails with [`Error::StepLimitExceeded`].
pub struct Executor<'p> {
    code: &'p [Instruction],
    memory: Memory,
    pc: usize,
    steps: usize,
    max_steps: usize,
}

impl<'p> Executor<'p> {
    pub fn new(program: &'p Program, memory: Memory, config: &RunConfig) -> Self {
        Self {
            code: program.instructions(),
            memory,
            pc: 0,
            steps: 0,
            max_steps: config.max_steps,
        }
    }

    pub fn pc(&self) -> usize {
        self.pc
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn into_memory(self) -> Memory {
        self.memory
    }

    pub fn is_halted(&self) -> bool {
        self.pc >= self.code.len()
    }

    /// Execute one instruction. Returns `Ok(false)` once the program has
    /// halted; a halted executor does not count further steps.
    pub fn step<F>(&mut self, on_output: &mut F) -> Result<bool>
    where
        F: FnMut(&str) -> std::result::Result<(), OutputError>,
    {
        if self.steps > self.max_steps {
            return Err(Error::StepLimitExceeded {
                limit: self.max_steps,
            });
        }
        let Some(&instr) = self.code.get(self.pc) else {
            return Ok(false);
        };
        trace!(pc = self.pc, steps = self.steps, ?instr, "step");

        match instr {
            Instruction::Flip(v) => {
                self.memory.flip(v);
                self.pc += 1;
            }
            Instruction::LoopStart(v) => {
                if self.memory.get(v) {
                    self.pc += 1;
                } else {
                    self.pc = find_loop_end(self.code, self.pc)? + 1;
                }
            }
            Instruction::LoopEnd => {
                self.pc = find_loop_start(self.code, self.pc)?;
            }
            Instruction::Output => {
                let snapshot = self.memory.to_string();
                trace!(%snapshot, "output");
                on_output(&snapshot)?;
                self.pc += 1;
            }
        }

        self.steps += 1;
        if self.steps > self.max_steps {
            debug!(pc = self.pc, limit = self.max_steps, "step limit exceeded");
            return Err(Error::StepLimitExceeded {
                limit: self.max_steps,
            });
        }
        Ok(!self.is_halted())
    }

    /// Run to completion, handing every output snapshot to `on_output`.
    /// Returns the serialized final memory.
    pub fn run<F>(&mut self, mut on_output: F) -> Result<String>
    where
        F: FnMut(&str) -> std::result::Result<(), OutputError>,
    {
        while self.step(&mut on_output)? {}
        debug!(steps = self.steps, ones = self.memory.count_ones(), "run finished");
        Ok(self.memory.to_string())
    }

    /// Run to completion, discarding output snapshots.
    pub fn run_silent(&mut self) -> Result<String> {
        self.run(|_| Ok(()))
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::random::{RandomConfig, random_program};
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    proptest! {
        #[test]
        fn random_programs_never_panic(seed in any::<u64>(), length in 0usize..128) {
            let mut rng = SmallRng::seed_from_u64(seed);
            let config = RandomConfig { length, ..Default::default() };
            let program = random_program(&mut rng, &config);
            let mut exec = Executor::new(&program, Memory::new(), &RunConfig::with_max_steps(8192));
            match exec.run_silent() {
                Ok(_) => prop_assert!(exec.is_halted()),
                Err(err) => prop_assert_eq!(err, Error::StepLimitExceeded { limit: 8192 }),
            }
        }

        #[test]
        fn random_programs_respect_step_limit(seed in any::<u64>(), limit in 1usize..1000) {
            let mut rng = SmallRng::seed_from_u64(seed);
            let program = random_program(&mut rng, &RandomConfig::default());
            let mut exec = Executor::new(&program, Memory::new(), &RunConfig::with_max_steps(limit));
            let _ = exec.run_silent();
            prop_assert!(exec.steps() <= limit + 1);
        }

        #[test]
        fn flip_pair_is_identity(seed in "[01]{0,16}", variable in 0usize..24) {
            let run = |source: String| {
                let program = crate::parser::parse(&source).unwrap();
                Executor::new(&program, Memory::from_bits(&seed), &RunConfig::default())
                    .run_silent()
                    .unwrap()
            };
            let marks = "|".repeat(variable + 1);
            prop_assert_eq!(run(format!("{marks} {marks}")), run(String::new()));
        }
    }
}
