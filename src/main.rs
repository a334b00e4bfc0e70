use clap::Parser;
use dipscan::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
