//! JSM command-line tool for checking and inspecting JSM documents.
//!
//! Usage: jsm [OPTIONS] [FILE|DIR]
//!
//! Options:
//!   --check                Check if input is valid (exit 0 if valid, 1 if invalid)
//!   --max-depth <N>        Reject documents nesting deeper than N containers
//!   -v, --verbose          Log parser activity to stderr (repeat for more)
//!   -h, --help             Print help
//!   -V, --version          Print version

use libjsm::{
    parse_file_with_options, parse_with_options, ParseError, ParseOptions, ReaderChars, Value,
};
use std::fs;
use std::io::{self, BufReader};
use std::path::Path;
use std::process;
use tracing::{info, Level};

/// Settings gathered from the command line.
struct Config {
    check_only: bool,
    max_depth: Option<usize>,
    verbosity: u8,
    input_path: Option<String>,
}

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let mut config = Config {
        check_only: false,
        max_depth: None,
        verbosity: 0,
        input_path: None,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_help();
                return;
            }
            "-V" | "--version" => {
                println!("jsm {}", env!("CARGO_PKG_VERSION"));
                return;
            }
            "--check" => {
                config.check_only = true;
            }
            "--max-depth" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --max-depth requires a number");
                    process::exit(1);
                }
                match args[i].parse::<usize>() {
                    Ok(n) => config.max_depth = Some(n),
                    Err(_) => {
                        eprintln!("Error: Invalid depth: {}", args[i]);
                        process::exit(1);
                    }
                }
            }
            "-v" | "--verbose" => {
                config.verbosity = config.verbosity.saturating_add(1);
            }
            "-vv" => {
                config.verbosity = config.verbosity.saturating_add(2);
            }
            "-vvv" => {
                config.verbosity = config.verbosity.saturating_add(3);
            }
            "-" => {
                // Explicit stdin
                // input_path stays None, which means stdin
            }
            arg if arg.starts_with('-') => {
                eprintln!("Error: Unknown option: {}", arg);
                process::exit(1);
            }
            arg => {
                if config.input_path.is_some() {
                    eprintln!("Error: Multiple input paths not supported");
                    process::exit(1);
                }
                config.input_path = Some(arg.to_string());
            }
        }
        i += 1;
    }

    init_logging(config.verbosity);

    let mut options = ParseOptions::new();
    if let Some(depth) = config.max_depth {
        options = options.max_depth(depth);
    }

    let exit_code = match config.input_path.as_deref() {
        Some(path) if Path::new(path).is_dir() => process_directory(path, &options, &config),
        Some(path) => {
            let result = parse_file_with_options(path, &options);
            report(result, Some(path), &config)
        }
        None => {
            let stdin = io::stdin();
            let chars = ReaderChars::new(BufReader::new(stdin.lock()));
            let result = parse_with_options(chars, &options);
            report(result, None, &config)
        }
    };
    process::exit(exit_code);
}

/// Install the stderr log subscriber. Each `-v` raises the level one step.
fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .try_init();
}

/// Parse every `.json` file in `dir_path`, in name order.
fn process_directory(dir_path: &str, options: &ParseOptions, config: &Config) -> i32 {
    let entries = match fs::read_dir(dir_path) {
        Ok(e) => e,
        Err(e) => {
            eprintln!("Error reading directory {}: {}", dir_path, e);
            return 1;
        }
    };

    let mut paths: Vec<_> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.extension().map(|e| e == "json").unwrap_or(false))
        .collect();
    paths.sort();
    info!(directory = dir_path, files = paths.len(), "processing directory");

    let mut had_errors = false;
    for path in &paths {
        let path_str = path.to_string_lossy();
        let result = parse_file_with_options(path, options);
        if report(result, Some(path_str.as_ref()), config) != 0 {
            had_errors = true;
        }
    }

    if had_errors {
        1
    } else {
        0
    }
}

/// Print the outcome of one parse and return the exit code for it.
fn report(result: Result<Value, ParseError>, input_file: Option<&str>, config: &Config) -> i32 {
    match result {
        Ok(value) => {
            if config.check_only {
                match input_file {
                    Some(path) => println!("{}: ok", path),
                    None => println!("ok"),
                }
            } else {
                if let Some(path) = input_file {
                    if config.input_path.as_deref() != Some(path) {
                        println!("{}:", path);
                    }
                }
                println!("{:#?}", value);
            }
            0
        }
        Err(e) => {
            match input_file {
                Some(path) => eprintln!("{}: {}", path, e),
                None => eprintln!("Parse error: {}", e),
            }
            1
        }
    }
}

fn print_help() {
    println!(
        "jsm - JSM command-line tool

USAGE:
    jsm [OPTIONS] [FILE|DIR]

ARGS:
    [FILE|DIR]    Input file or directory (reads from stdin if not provided)
                  When a directory is given, processes all .json files in it

OPTIONS:
    --check                Check if input is valid (exit 0 if valid, 1 if invalid)

    --max-depth <N>        Reject documents nesting deeper than N containers
                           (the outermost container counts as 1)

    -v, --verbose          Log parser activity to stderr; repeat (-vv, -vvv)
                           for debug and trace output

    -h, --help             Print help

    -V, --version          Print version

EXAMPLES:
    # Print the parsed value tree of a document
    jsm config.json

    # Validate every document in a directory
    jsm --check fixtures/

    # Read from stdin
    echo '{{\"key\": [1, 2, 3]}}' | jsm"
    );
}
