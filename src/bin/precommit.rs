#[macro_use]
extern crate log;

use clap::Parser;
use std::error::Error;
use std::{env, fs, process};
use yong_backend::precommit::{git, run_checks, Check};

const LINE: &str = "████████████████████████████████████████";

/// Pre-commit checks for this repository.
#[derive(Parser, Debug)]
#[command(name = "yong-precommit")]
struct Cli {
    /// Run on all tracked files rather than on the files staged for commit
    #[arg(short, long)]
    all_files: bool,

    /// Print debug output
    #[arg(short, long)]
    debug: bool,

    /// Checks to skip
    #[arg(short, long, value_enum)]
    skip: Vec<Check>,
}

fn title(msg: &str) {
    println!("\n{}\r\t {} ", LINE, msg);
}

fn run(cli: Cli) -> Result<i32, Box<dyn Error>> {
    let selection = git::select(&env::current_dir()?, cli.all_files)?;
    debug!("checking {} files under {}", selection.files.len(), selection.root.display());
    let manifest = fs::read_to_string(selection.root.join("Cargo.toml")).ok();

    let report = run_checks(&selection, manifest.as_deref(), &cli.skip);

    title("detect invalid patterns");
    for hit in &report.invalid_patterns {
        println!("{}", hit);
    }
    title("dependencies are pinned");
    if !report.unpinned.is_empty() {
        println!("not pinned: {}", report.unpinned.join(", "));
    }
    title("TODO|HACK|EXPLAIN|REMOVE|THINK|@Someone");
    for hit in &report.markers {
        println!("{}", hit);
    }

    if report.failures() > 0 {
        eprintln!("\n{} invalid pattern(s), {} unpinned dependencies",
                  report.invalid_patterns.len(), report.unpinned.len());
    }
    Ok(report.exit_code())
}

fn main() {
    let cli = Cli::parse();
    env_logger::builder()
        .parse_filters(if cli.debug { "debug" } else { "warn" })
        .init();
    debug!("{:?}", &cli);

    match run(cli) {
        Ok(code) => process::exit(code),
        Err(err) => {
            error!("{}", err);
            process::exit(1);
        }
    }
}
