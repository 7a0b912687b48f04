use clap::Parser;
use isp_production_lib::cli::Cli;
use std::process::ExitCode;

fn main() -> ExitCode {
    isp_production_lib::run(Cli::parse())
}
