//! Command-line entry point: `engine <start_id> <end_id> <model_path> [mode]`.
//!
//! `mode` is `""` (Dijkstra), `"analytics"`, or `"heat"`. Argument and model
//! failures exit 1; a well-formed result whose solver reported an internal
//! error exits 2; a clean result exits 0.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context};
use geodesic_engine::RunStatus;

struct Args {
    args: Vec<String>,
    pos: usize,
}

impl Args {
    fn new(args: Vec<String>) -> Self {
        Self { args, pos: 0 }
    }

    fn next(&mut self) -> Option<String> {
        let arg = self.args.get(self.pos)?.clone();
        self.pos += 1;
        Some(arg)
    }
}

const USAGE: &str = "usage: engine <start_id> <end_id> <model_path> [mode]";

fn main() -> ExitCode {
    env_logger::init();

    match run() {
        Ok(RunStatus::Success) => ExitCode::from(0),
        Ok(RunStatus::SolverError) => ExitCode::from(2),
        Err(err) => {
            eprintln!("engine error: {err:#}");
            ExitCode::from(1)
        }
    }
}

fn run() -> anyhow::Result<RunStatus> {
    let mut args = Args::new(std::env::args().skip(1).collect());

    let start_id = args.next().context(USAGE)?;
    let end_id = args.next().context(USAGE)?;
    let model_path = args.next().context(USAGE)?;
    let mode = args.next().unwrap_or_default();

    let start: usize = start_id
        .parse()
        .with_context(|| format!("invalid start_id `{start_id}`"))?;
    let end: usize = end_id
        .parse()
        .with_context(|| format!("invalid end_id `{end_id}`"))?;

    if args.next().is_some() {
        bail!("too many arguments\n\n{USAGE}");
    }

    let model_path = PathBuf::from(model_path);
    geodesic_engine::run(start, end, &model_path, &mode).map_err(anyhow::Error::from)
}
