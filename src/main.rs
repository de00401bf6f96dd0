use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rayon::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

use stroke::notation::expand_variables;
use stroke::parser::parse;
use stroke::random::{RandomConfig, random_program};
use stroke::{DEFAULT_MAX_STEPS, Executor, Memory, Program, RunConfig};

#[derive(Parser)]
#[command(name = "stroke", about = "Stroke: a language of flipped bits")]
struct Cli {
    /// Raise log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a program, printing each output snapshot and then the final memory.
    Run {
        /// Source file.
        file: PathBuf,

        /// Initial memory as a string of 0s and 1s.
        #[arg(long, default_value = "")]
        memory: String,

        /// Max instructions executed before the run is aborted (0 for default).
        #[arg(long, default_value_t = DEFAULT_MAX_STEPS)]
        max_steps: usize,

        /// Source uses numeric notation (`12` for variable 12).
        #[arg(long)]
        numeric: bool,

        /// Print only the final memory.
        #[arg(long)]
        quiet: bool,
    },

    /// Print a program in indented numeric notation.
    Disasm {
        /// Source file.
        file: PathBuf,

        /// Source uses numeric notation.
        #[arg(long)]
        numeric: bool,
    },

    /// Run random programs and report which ones halt, as CSV.
    Sample {
        /// Seed of the first program; program i uses seed + i.
        #[arg(long)]
        seed: u64,

        /// Number of programs.
        #[arg(long, default_value_t = 1000)]
        count: u64,

        /// Instructions per program, before open loops are closed.
        #[arg(long, default_value_t = 32)]
        length: usize,

        /// Variables are drawn from 0..variables.
        #[arg(long, default_value_t = 8)]
        variables: usize,

        /// Max steps per program.
        #[arg(long, default_value_t = 1 << 13)]
        max_steps: usize,
    },
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_program(path: &Path, numeric: bool) -> Result<Program> {
    let source =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let source = if numeric {
        expand_variables(&source).with_context(|| format!("expanding {}", path.display()))?
    } else {
        source
    };
    let program = parse(&source).with_context(|| format!("parsing {}", path.display()))?;
    info!(path = %path.display(), instructions = program.len(), "loaded program");
    Ok(program)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Run {
            file,
            memory,
            max_steps,
            numeric,
            quiet,
        } => run_program(&file, &memory, max_steps, numeric, quiet),
        Command::Disasm { file, numeric } => {
            let program = load_program(&file, numeric)?;
            print!("{}", program.disassemble());
            Ok(())
        }
        Command::Sample {
            seed,
            count,
            length,
            variables,
            max_steps,
        } => {
            let config = RandomConfig {
                length,
                variables,
                ..Default::default()
            };
            run_sample(seed, count, &config, max_steps);
            Ok(())
        }
    }
}

fn run_program(file: &Path, memory: &str, max_steps: usize, numeric: bool, quiet: bool) -> Result<()> {
    let program = load_program(file, numeric)?;
    let config = RunConfig::with_max_steps(max_steps);
    let mut exec = Executor::new(&program, Memory::from_bits(memory), &config);

    let result = exec.run(|snapshot| {
        if !quiet {
            println!("! {snapshot}");
        }
        Ok(())
    });
    info!(steps = exec.steps(), pc = exec.pc(), "run ended");

    let final_memory = result.with_context(|| format!("running {}", file.display()))?;
    println!("{final_memory}");
    Ok(())
}

fn run_sample(seed: u64, count: u64, config: &RandomConfig, max_steps: usize) {
    let run_config = RunConfig::with_max_steps(max_steps);

    let start = std::time::Instant::now();
    // Each run owns its memory, so programs can be executed independently.
    let rows: Vec<(u64, bool, usize, String)> = (0..count)
        .into_par_iter()
        .map(|i| {
            let s = seed.wrapping_add(i);
            let mut rng = SmallRng::seed_from_u64(s);
            let program = random_program(&mut rng, config);
            let mut exec = Executor::new(&program, Memory::new(), &run_config);
            let halted = exec.run_silent().is_ok();
            (s, halted, exec.steps(), exec.memory().to_string())
        })
        .collect();
    let elapsed = start.elapsed();

    println!("seed,halted,steps,memory");
    for (s, halted, steps, memory) in &rows {
        println!("{s},{halted},{steps},{memory}");
    }

    let halted = rows.iter().filter(|row| row.1).count();
    eprintln!("Sample results:");
    eprintln!("  Programs:          {count}");
    eprintln!("  Halted:            {halted}");
    eprintln!("  Step limit hit:    {}", rows.len() - halted);
    eprintln!("  Elapsed:           {elapsed:.2?}");
}
