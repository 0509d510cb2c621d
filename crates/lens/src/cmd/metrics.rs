//! Metrics command - list catalog metrics
//!
//! # Usage
//!
//! ```bash
//! lens metrics
//! lens metrics --verbose
//! ```

use anyhow::Result;
use clap::Args;
use lens_analytics::Catalog;

/// Metrics command arguments
#[derive(Args, Debug)]
pub struct MetricsArgs {
    /// Also print the inner and outer SQL fragments
    #[arg(short, long)]
    verbose: bool,
}

/// Run the metrics command
pub fn run(args: MetricsArgs) -> Result<()> {
    for (key, statement) in Catalog::global().metrics() {
        if !args.verbose {
            println!("{}", key);
            continue;
        }

        println!("{}", key);
        println!("  grouped: {}", if statement.groupable { "inner stage" } else { "no" });
        println!("  inner:   {}", statement.inner);
        println!("  outer:   {}", statement.outer);
    }
    Ok(())
}
