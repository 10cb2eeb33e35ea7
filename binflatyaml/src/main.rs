//! flatyaml command-line tool for decoding flat YAML documents.
//!
//! Usage: flatyaml [OPTIONS] [FILE]
//!
//! Options:
//!   -t, --to <FORMAT>      Output format (pairs, yaml, toml, cbor) [default: pairs]
//!   -o, --output <FILE>    Write output to specified file
//!   --check                Check if input is valid (exit 0 if valid, 1 if invalid)
//!   -h, --help             Print help
//!   -V, --version          Print version

use libflatyaml::{decode_file, decode_reader, format_pair, DecodeOptions, Result, Value};
use std::fs;
use std::io::{self, Write};
use std::process;

mod transcode;

/// Output formats accepted by -t.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Pairs,
    Yaml,
    Toml,
    Cbor,
}

fn parse_format(s: &str) -> Option<Format> {
    match s {
        "pairs" | "txt" => Some(Format::Pairs),
        "yaml" | "yml" => Some(Format::Yaml),
        "toml" => Some(Format::Toml),
        "cbor" => Some(Format::Cbor),
        _ => None,
    }
}

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let mut to_format = Format::Pairs;
    let mut output_file: Option<&str> = None;
    let mut check_only = false;
    let mut input_path: Option<&str> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_help();
                return;
            }
            "-V" | "--version" => {
                println!("flatyaml {}", env!("CARGO_PKG_VERSION"));
                return;
            }
            "-t" | "--to" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: -t requires a format argument");
                    process::exit(1);
                }
                to_format = match parse_format(&args[i]) {
                    Some(format) => format,
                    None => {
                        eprintln!("Error: Unknown format: {}", args[i]);
                        process::exit(1);
                    }
                };
            }
            "-o" | "--output" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --output requires an argument");
                    process::exit(1);
                }
                output_file = Some(&args[i]);
            }
            "--check" => {
                check_only = true;
            }
            "-" => {
                // Explicit stdin
            }
            arg if arg.starts_with('-') => {
                eprintln!("Error: Unknown option: {}", arg);
                process::exit(1);
            }
            _ => {
                if input_path.is_some() {
                    eprintln!("Error: Multiple input paths not supported");
                    process::exit(1);
                }
                input_path = Some(&args[i]);
            }
        }
        i += 1;
    }

    if check_only && output_file.is_some() {
        eprintln!("Error: --check and --output are mutually exclusive");
        process::exit(1);
    }

    let pairs = match read_pairs(input_path) {
        Ok(pairs) => pairs,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    if check_only {
        println!("ok");
        return;
    }

    process::exit(output_pairs(&pairs, to_format, output_file));
}

/// Decode the input file, or stdin when no file is given.
fn read_pairs(input_path: Option<&str>) -> Result<Vec<(String, Value)>> {
    let mut pairs: Vec<(String, Value)> = Vec::new();
    let collect = |key: String, value: Value| pairs.push((key, value));
    match input_path {
        Some(path) => decode_file(path, collect)?,
        None => {
            let options = DecodeOptions::default().with_source_name("<stdin>");
            decode_reader(io::stdin().lock(), options, collect)?
        }
    }
    Ok(pairs)
}

fn output_pairs(pairs: &[(String, Value)], format: Format, output_file: Option<&str>) -> i32 {
    match format {
        Format::Pairs => {
            let mut output = String::new();
            for (key, value) in pairs {
                output.push_str(&format_pair(key, value));
                output.push('\n');
            }
            write_output(output.as_bytes(), output_file);
        }
        Format::Yaml => match transcode::yaml::encode(pairs) {
            Ok(output) => write_output(output.as_bytes(), output_file),
            Err(e) => {
                eprintln!("Error: Cannot convert to YAML: {}", e);
                return 1;
            }
        },
        Format::Toml => match transcode::toml::encode(pairs) {
            Ok(output) => write_output(output.as_bytes(), output_file),
            Err(e) => {
                eprintln!("Error: Cannot convert to TOML: {}", e);
                return 1;
            }
        },
        Format::Cbor => match transcode::cbor::encode(pairs) {
            Ok(bytes) => write_output(&bytes, output_file),
            Err(e) => {
                eprintln!("Error: Cannot convert to CBOR: {}", e);
                return 1;
            }
        },
    }

    0
}

fn write_output(output: &[u8], output_file: Option<&str>) {
    if let Some(path) = output_file {
        if let Err(e) = fs::write(path, output) {
            eprintln!("Error writing {}: {}", path, e);
            process::exit(1);
        }
    } else {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        if let Err(e) = handle.write_all(output) {
            eprintln!("Error writing to stdout: {}", e);
            process::exit(1);
        }
    }
}

fn print_help() {
    println!(
        "flatyaml - decode YAML documents into dotted key/value pairs

USAGE:
    flatyaml [OPTIONS] [FILE]

ARGS:
    [FILE]    Input file (reads from stdin if not provided or '-')

OPTIONS:
    -t, --to <FORMAT>      Output format [default: pairs]
                           Supported: pairs, yaml, toml, cbor

                           'pairs' prints one `key | value | type` line per
                           decoded pair. The other formats write one top-level
                           entry per pair, keeping the dotted key whole.

    -o, --output <FILE>    Write output to specified file

    --check                Check if input is valid (exit 0 if valid, 1 if invalid)

    -h, --help             Print help

    -V, --version          Print version

EXAMPLES:
    # List the pairs of a configuration file
    flatyaml config.yaml

    # Validate a file
    flatyaml --check config.yaml

    # Flatten to TOML (fails on null values, which TOML cannot hold)
    flatyaml -t toml config.yaml -o config.toml

    # Flatten to CBOR
    flatyaml -t cbor config.yaml -o config.cbor
"
    );
}
