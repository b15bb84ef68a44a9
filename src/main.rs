//! Binary entry point for hipify-rs.

use std::io;
use std::process::ExitCode;

use clap::Parser;

use hipify_rs::cli::Cli;
use hipify_rs::driver::Driver;
use hipify_rs::error::HipifyError;
use hipify_rs::rename_table::RenameTables;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log_level);

    match run(cli) {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            eprintln!("[HIPIFY] error: {err}");
            ExitCode::from(err.exit_code().code())
        }
    }
}

fn run(cli: Cli) -> Result<u8, HipifyError> {
    let (inputs, config) = cli.resolve()?;
    let tables = RenameTables::default_tables();
    let mut driver = Driver::new(tables);
    let summary = driver.run(&inputs, &config)?;
    Ok(summary.front_end_failures.min(255) as u8)
}

fn init_tracing(level: hipify_rs::cli::LogLevel) {
    use tracing_subscriber::fmt::format::FmtSpan;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_tracing_level()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}
