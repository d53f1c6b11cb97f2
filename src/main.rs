// cminus: C-minus scanner and parser

mod cli;

use clap::Parser;
use cminus::{driver, Error};
use std::io::{self, BufWriter};
use std::process::ExitCode;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .without_time(),
        )
        .with(EnvFilter::new(cli.log_level()))
        .init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), Error> {
    let path = cli.source.as_deref().ok_or(Error::MissingSource)?;
    let source = driver::load(path)?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    driver::run(&source, &cli.options(), &mut out)
}
