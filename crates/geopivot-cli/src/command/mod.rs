use std::io::Write as _;

use clap::{Parser, Subcommand};

use self::{keys::KeysArg, pivot::PivotArg, report::ReportArg};

mod keys;
mod pivot;
mod report;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Build the JSON report of each input CSV file
    Report(#[clap(flatten)] ReportArg),
    /// Print a count table of one or two dimensions
    Pivot(#[clap(flatten)] PivotArg),
    /// Print the keys and labels of a dimension
    Keys(#[clap(flatten)] KeysArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    init_logger(args.verbose);
    match args.mode {
        Mode::Report(arg) => report::run(&arg)?,
        Mode::Pivot(arg) => pivot::run(&arg)?,
        Mode::Keys(arg) => keys::run(&arg)?,
    }
    Ok(())
}

fn init_logger(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format(|buf, record| writeln!(buf, "[{:5}] {}", record.level(), record.args()))
        .init();
}
