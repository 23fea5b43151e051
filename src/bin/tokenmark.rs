//! Command-line interface for tokenmark
//! Tokenizes a source file with one of the built-in (or descriptor-loaded)
//! language modes and prints the token runs.
//!
//! Usage:
//!   tokenmark `<path>` [--mode `<mode>`] [--format `<format>`]  - Tokenize a file
//!   tokenmark `<path>` --mode-file `<descriptor>`               - Use a JSON/YAML mode descriptor
//!   tokenmark --list-modes                                      - List the built-in modes

use std::path::Path;
use std::sync::Arc;

use clap::{Arg, ArgAction, Command};

use tokenmark::syntax::{loader, testing};
use tokenmark::{ModeRegistry, TokenMarker};

fn main() {
    let matches = Command::new("tokenmark")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A rule-driven syntax tokenizer")
        .arg_required_else_help(true)
        .arg(
            Arg::new("path")
                .help("Path to the file to tokenize")
                .required_unless_present("list-modes")
                .index(1),
        )
        .arg(
            Arg::new("mode")
                .long("mode")
                .short('m')
                .help("Mode name (default: detected from the file extension)"),
        )
        .arg(
            Arg::new("mode-file")
                .long("mode-file")
                .help("Path to a JSON/YAML mode descriptor to use instead of a built-in mode")
                .conflicts_with("mode"),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .short('f')
                .help("Output format: plain or json")
                .default_value("plain"),
        )
        .arg(
            Arg::new("list-modes")
                .long("list-modes")
                .help("List the built-in mode names")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    if matches.get_flag("list-modes") {
        handle_list_modes_command();
        return;
    }

    let path = matches
        .get_one::<String>("path")
        .expect("path is required unless listing modes");
    let format = matches.get_one::<String>("format").unwrap();
    handle_tokenize_command(
        path,
        matches.get_one::<String>("mode").map(String::as_str),
        matches.get_one::<String>("mode-file").map(String::as_str),
        format,
    );
}

/// Handle the tokenize command
fn handle_tokenize_command(
    path: &str,
    mode_name: Option<&str>,
    mode_file: Option<&str>,
    format: &str,
) {
    let registry = ModeRegistry::builtin();

    let mode = if let Some(descriptor) = mode_file {
        let loaded = loader::from_path(Path::new(descriptor)).unwrap_or_else(|e| {
            eprintln!("Mode descriptor error: {}", e);
            std::process::exit(1);
        });
        registry.register(loaded)
    } else if let Some(name) = mode_name {
        registry.mode(name).unwrap_or_else(|| {
            eprintln!("Unknown mode '{}'", name);
            eprintln!("\nAvailable modes:");
            for name in registry.mode_names() {
                eprintln!("  {}", name);
            }
            std::process::exit(1);
        })
    } else {
        registry
            .mode_for_path(Path::new(path))
            .unwrap_or_else(|| {
                eprintln!("Cannot detect a mode for '{}'; pass --mode", path);
                std::process::exit(1);
            })
    };

    let text = std::fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Cannot read {}: {}", path, e);
        std::process::exit(1);
    });

    let mut marker = TokenMarker::new(mode, Arc::clone(&registry));
    let marked = marker.mark_all(&text);

    match format {
        "plain" => println!("{}", testing::dump(&text, &marked)),
        "json" => {
            let lines: Vec<_> = marked.iter().map(|line| &line.tokens).collect();
            let json = serde_json::to_string_pretty(&lines).unwrap_or_else(|e| {
                eprintln!("Error formatting tokens: {}", e);
                std::process::exit(1);
            });
            println!("{}", json);
        }
        fmt => {
            eprintln!("Format '{}' not supported", fmt);
            eprintln!("Available formats: plain, json");
            std::process::exit(1);
        }
    }
}

/// Handle the list-modes command
fn handle_list_modes_command() {
    println!("Built-in modes:\n");
    for name in ModeRegistry::builtin().mode_names() {
        println!("  {}", name);
    }
}
