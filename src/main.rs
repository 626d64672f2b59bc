use anyhow::Result;
use clap::Parser;
use par_diff::cli::{self, Cli};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let result = cli::run(&cli);
    if let Err(ref e) = result {
        eprintln!("par-diff: error: {e:#}");
    }
    // Return the original error so main exits with code 1 (anyhow default)
    result
}
