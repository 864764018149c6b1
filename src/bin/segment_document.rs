//! Segment a Lease Document
//!
//! Reads extracted lease text from a file, normalizes it and prints the
//! candidate clauses, optionally keeping only clauses that mention a lease
//! keyword.
//!
//! Usage:
//!   cargo run --release --bin segment_document -- lease.txt
//!   cargo run --release --bin segment_document -- lease.txt --min-length 40 --keywords
//!   cargo run --release --bin segment_document -- lease.txt --keywords rent,deposit

use lease_clause::config::DEFAULT_MIN_LENGTH;
use lease_clause::segment::{filter_by_keywords, ClauseSegmenter};
use std::path::PathBuf;

struct SegmentConfig {
    input: PathBuf,
    min_length: usize,
    /// `Some(vec![])` selects the default lease keywords
    keywords: Option<Vec<String>>,
}

impl SegmentConfig {
    fn from_args() -> Result<Self, String> {
        let args: Vec<String> = std::env::args().collect();
        let mut input = None;
        let mut min_length = DEFAULT_MIN_LENGTH;
        let mut keywords = None;

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--min-length" => {
                    i += 1;
                    let raw = args.get(i).ok_or("--min-length requires a value")?;
                    min_length = raw
                        .parse()
                        .map_err(|_| format!("Invalid value for --min-length: {}", raw))?;
                },
                "--keywords" => {
                    // An optional comma-separated list follows; a lone trailing
                    // argument is still the input file
                    match args.get(i + 1).filter(|next| !next.starts_with("--")) {
                        Some(list) if input.is_some() || i + 2 < args.len() => {
                            keywords = Some(
                                list.split(',')
                                    .map(|k| k.trim().to_string())
                                    .filter(|k| !k.is_empty())
                                    .collect(),
                            );
                            i += 1;
                        },
                        _ => keywords = Some(Vec::new()),
                    }
                },
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                },
                other if other.starts_with("--") => {
                    return Err(format!("Unknown argument: {}", other));
                },
                path => input = Some(PathBuf::from(path)),
            }
            i += 1;
        }

        let input = input.ok_or("missing input file")?;
        Ok(Self {
            input,
            min_length,
            keywords,
        })
    }
}

fn print_usage() {
    println!("Usage: segment_document <FILE> [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --min-length <N>        Minimum clause length in characters (default: 20)");
    println!("  --keywords [LIST]       Keep clauses mentioning a keyword; comma-separated LIST");
    println!("                          overrides the default lease keywords");
}

fn main() {
    env_logger::init();

    let config = match SegmentConfig::from_args() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            print_usage();
            std::process::exit(2);
        },
    };

    let text = match std::fs::read_to_string(&config.input) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Error reading {}: {}", config.input.display(), e);
            std::process::exit(1);
        },
    };

    let segmenter = ClauseSegmenter::new(config.min_length);
    let mut clauses = segmenter.extract_clauses(&text);
    let total = clauses.len();

    if let Some(keywords) = &config.keywords {
        let keywords: Vec<&str> = keywords.iter().map(String::as_str).collect();
        let custom = (!keywords.is_empty()).then_some(keywords.as_slice());
        clauses = filter_by_keywords(clauses, custom);
    }

    for clause in &clauses {
        println!("[{}] {}", clause.index, clause.text);
        println!();
    }
    println!("{} of {} clauses shown", clauses.len(), total);
}
