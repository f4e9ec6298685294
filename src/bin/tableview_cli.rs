//! CLI tool for tableview - derives a table view from a JSON document
//!
//! The document is `{ "config": {...}, "rows": [...], "state": {...} }`
//! with `state` optional.
//!
//! Usage:
//!   tableview_cli <table.json>              # Output JSON to stdout
//!   tableview_cli <table.json> -o out.json  # Output JSON to file
//!   tableview_cli -v <table.json>           # Debug logging on stderr

#![allow(clippy::exit)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::indexing_slicing)]

use std::env;
use std::fs;
use std::io::{self, Write};

use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};
use tableview::derive_file;

fn run(input_path: &str, output_path: Option<&str>) -> tableview::Result<()> {
    let view = derive_file(input_path)?;
    let json = serde_json::to_string_pretty(&view)?;

    match output_path {
        Some(path) => {
            fs::write(path, &json)?;
            log::info!("written: {path}");
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(json.as_bytes())?;
            writeln!(stdout)?;
        }
    }
    Ok(())
}

fn main() {
    let mut args: Vec<String> = env::args().skip(1).collect();

    let verbose = args.iter().any(|a| a == "-v");
    args.retain(|a| a != "-v");
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let _ = TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );

    if args.is_empty() {
        eprintln!("Usage: tableview_cli [-v] <table.json> [-o output.json]");
        std::process::exit(1);
    }

    let input_path = &args[0];
    let output_path = if args.len() > 2 && args[1] == "-o" {
        Some(args[2].as_str())
    } else {
        None
    };

    if let Err(e) = run(input_path, output_path) {
        eprintln!("Error processing {}: {}", input_path, e);
        std::process::exit(1);
    }
}
