//! Classify Lease Clauses
//!
//! Loads a trained model and classifies clause texts given on the command
//! line or read from a file (one clause per line). With `--document` the
//! file is treated as a whole lease: it is segmented first and the result
//! is printed as JSON grouped by clause type.
//!
//! Usage:
//!   cargo run --release --bin classify_clauses -- --text "Rent is due on the first of the month."
//!   cargo run --release --bin classify_clauses -- --file clauses.txt --show-proba --top-k 3
//!   cargo run --release --bin classify_clauses -- --document lease.txt --mapping data_mapping/data_mapping.json

use lease_clause::config::DEFAULT_MIN_LENGTH;
use lease_clause::{classify_document, LabelMapping, LeaseClauseClassifier, ModelPaths};
use std::path::PathBuf;

struct ClassifyConfig {
    model: PathBuf,
    texts: Vec<String>,
    file: Option<PathBuf>,
    document: Option<PathBuf>,
    mapping: Option<PathBuf>,
    min_length: usize,
    show_proba: bool,
    top_k: usize,
}

impl ClassifyConfig {
    fn from_args() -> Result<Self, String> {
        let args: Vec<String> = std::env::args().collect();
        let mut config = Self {
            model: ModelPaths::default().model,
            texts: Vec::new(),
            file: None,
            document: None,
            mapping: None,
            min_length: DEFAULT_MIN_LENGTH,
            show_proba: false,
            top_k: 3,
        };

        let mut i = 1;
        while i < args.len() {
            let flag = args[i].as_str();
            match flag {
                "--model" | "-m" => config.model = PathBuf::from(value(&args, &mut i, flag)?),
                "--text" | "-t" => config.texts.push(value(&args, &mut i, flag)?.to_string()),
                "--file" | "-f" => config.file = Some(PathBuf::from(value(&args, &mut i, flag)?)),
                "--document" => config.document = Some(PathBuf::from(value(&args, &mut i, flag)?)),
                "--mapping" => config.mapping = Some(PathBuf::from(value(&args, &mut i, flag)?)),
                "--min-length" => {
                    let raw = value(&args, &mut i, flag)?;
                    config.min_length = raw
                        .parse()
                        .map_err(|_| format!("Invalid value for {}: {}", flag, raw))?;
                },
                "--show-proba" => config.show_proba = true,
                "--top-k" => {
                    let raw = value(&args, &mut i, flag)?;
                    config.top_k = raw
                        .parse()
                        .map_err(|_| format!("Invalid value for {}: {}", flag, raw))?;
                },
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                },
                other => return Err(format!("Unknown argument: {}", other)),
            }
            i += 1;
        }

        if config.texts.is_empty() && config.file.is_none() && config.document.is_none() {
            return Err("nothing to classify; pass --text, --file or --document".into());
        }
        Ok(config)
    }
}

fn value<'a>(args: &'a [String], i: &mut usize, flag: &str) -> Result<&'a str, String> {
    *i += 1;
    args.get(*i)
        .map(String::as_str)
        .ok_or_else(|| format!("{} requires a value", flag))
}

fn print_usage() {
    println!("Usage: classify_clauses [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --model <PATH>       Trained model (default: lease_model.json)");
    println!("  --text <TEXT>        Clause to classify; may be repeated");
    println!("  --file <PATH>        File with one clause per line");
    println!("  --document <PATH>    Whole lease text; segment, classify and group as JSON");
    println!("  --mapping <PATH>     Label mapping used to attach type ids (with --document)");
    println!("  --min-length <N>     Minimum clause length (with --document, default: 20)");
    println!("  --show-proba         Print the most probable classes for each clause");
    println!("  --top-k <K>          Number of classes shown with --show-proba (default: 3)");
}

fn run(config: &ClassifyConfig) -> lease_clause::Result<()> {
    let classifier = LeaseClauseClassifier::load(&config.model)?;
    println!(
        "Loaded model with {} classes from {}",
        classifier.classes().len(),
        config.model.display()
    );

    if let Some(path) = &config.document {
        let mapping = config
            .mapping
            .as_ref()
            .map(LabelMapping::from_json_file)
            .transpose()?;
        let text = std::fs::read_to_string(path)?;
        let result = classify_document(&classifier, &text, config.min_length, mapping.as_ref())?;
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    let mut texts = config.texts.clone();
    if let Some(path) = &config.file {
        let content = std::fs::read_to_string(path)?;
        texts.extend(
            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string),
        );
    }

    for (index, text) in texts.iter().enumerate() {
        println!();
        println!("[{}] {}", index + 1, text);
        match classifier.classify_one(text) {
            Ok(prediction) => {
                println!("    => {} ({:.4})", prediction.label, prediction.confidence);
                if config.show_proba {
                    let mut ranked: Vec<(&String, &f64)> = prediction.distribution.iter().collect();
                    ranked.sort_by(|a, b| b.1.total_cmp(a.1));
                    for (label, p) in ranked.into_iter().take(config.top_k) {
                        println!("       {:<30} {:.4}", label, p);
                    }
                }
            },
            Err(e) => println!("    => skipped: {}", e),
        }
    }
    Ok(())
}

fn main() {
    env_logger::init();

    let config = match ClassifyConfig::from_args() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            print_usage();
            std::process::exit(2);
        },
    };

    if let Err(e) = run(&config) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
