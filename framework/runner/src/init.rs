use crate::cli::ContainerBenchCli;
use clap::Parser;

/// Initialise the CLI and logging for the benchmark runner.
pub fn init() -> ContainerBenchCli {
    env_logger::init();

    ContainerBenchCli::parse()
}
