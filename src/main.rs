// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (progress lines go to stdout)
// 3. Mirror the repository
// 4. Print the summary and every recorded error
// 5. Exit with 0 when the run completed (even with per-file errors),
//    2 when it could not run at all
//
// Rust concepts used:
// - async/await: The crawler uses tokio for network and file I/O
// - Result<T, E>: For error handling (T = success type, E = error type)
// =============================================================================

// Module declarations - tells Rust about our other source files
mod cli;     // src/cli.rs - command-line parsing
mod config;  // src/config.rs - run settings
mod crawl;   // src/crawl/ - repository walk and download loop
mod fetch;   // src/fetch/ - HTTP transport and download strategies
mod layout;  // src/layout.rs - remote path to local path mapping
mod listing; // src/listing/ - directory listing page parsing

use clap::Parser; // Parser trait enables the parse() method
use cli::Cli;
use crawl::{ErrorKind, Mirror, RunStatistics};

// anyhow::Result is like std::result::Result but simpler for applications
// It lets us return any error type with the ? operator
use anyhow::Result;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    init_logging();

    // Run our application logic and capture the exit code
    // std::process::exit() terminates the program with the given code
    let exit_code = match run().await {
        Ok(()) => 0,
        Err(e) => {
            // The run couldn't start (bad URL, output dir not writable)
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Logs go to stdout. RUST_LOG overrides the default "info" level,
// e.g. RUST_LOG=debug to see every request.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    let mirror = Mirror::new(cli.config())?;
    let stats = mirror.run(&cli.root_url).await?;

    print_summary(&stats);
    Ok(())
}

// Prints the final report
fn print_summary(stats: &RunStatistics) {
    println!();
    println!("Summary:");
    println!(
        "Saved {} dirs and {} files.",
        stats.directories_saved, stats.files_saved
    );
    println!(
        "Skipped {} dirs and {} files.",
        stats.directories_skipped, stats.files_skipped
    );

    if stats.errors.is_empty() {
        println!("No file errors.");
    } else {
        println!("File errors: {}", stats.errors.len());
        for kind in ErrorKind::ALL {
            let count = stats.count(kind);
            if count > 0 {
                println!("  {} x {}", count, kind);
            }
        }
        for error in &stats.errors {
            println!("  {}: {}", error.kind, error.context);
        }
    }

    println!();
    println!("Done!");
}
