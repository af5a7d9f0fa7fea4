use std::{io, process::ExitCode};

use clap::Parser;
use deploy_scripts::cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .pretty()
        .with_writer(io::stderr)
        .init();

    cli.run(&mut io::stdout(), &mut io::stderr())
        .await
        .exit_code()
}
