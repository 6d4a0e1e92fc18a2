//! tabql command line
//!
//! `tabql [DIR] -e "<sql>"` runs one statement; without `-e` an interactive prompt starts.

mod args;
mod format;
mod repl;

use anyhow::{Context, Result};
use args::CliArgs;
use clap::Parser;
use std::io::{self, Write};
use tabql_core::Database;
use tracing::info;

fn main() {
    let args = CliArgs::parse();
    tabql_core::logging::init_with_level(&args.log_level);

    if let Err(e) = run(&args) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(args: &CliArgs) -> Result<()> {
    let config = args.engine_config()?;
    let db = Database::from_config(config)
        .with_context(|| format!("cannot open '{}'", args.dir.display()))?;
    info!(dir = %args.dir.display(), format = %args.format, "tabql started");

    match &args.execute {
        Some(sql) => {
            let output = db.execute_sql(sql)?;
            let text = format::format_output(&output, args.format)?;
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            if let Err(e) = writeln!(handle, "{}", text) {
                if e.kind() != io::ErrorKind::BrokenPipe {
                    return Err(e.into());
                }
            }
            Ok(())
        }
        None => {
            let stdin = io::stdin();
            repl::run(&db, args.format, stdin.lock(), io::stdout())
        }
    }
}
