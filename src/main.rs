use clap::Parser;
use daysignal::cli::{run, Cli};
use daysignal::logging::init_logging;

fn main() -> std::process::ExitCode {
    init_logging();
    run(Cli::parse())
}
