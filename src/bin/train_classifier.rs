//! Train a Lease Clause Classifier
//!
//! Loads a labeled dataset (or the built-in sample corpus), holds out a
//! stratified test split, trains, prints the evaluation report and saves
//! the model.
//!
//! Usage:
//!   cargo run --release --bin train_classifier
//!   cargo run --release --bin train_classifier -- --data test_data --output lease_model.json.gz
//!   cargo run --release --bin train_classifier -- --kernel linear --C 10 --cross-validate 5

use lease_clause::data::sample::sample_data;
use lease_clause::data::{DataLoader, Dataset};
use lease_clause::ml::model_selection::stratified_train_test_split;
use lease_clause::ml::KernelType;
use lease_clause::{LeaseClauseClassifier, ModelConfig, ModelPaths, PreprocessorConfig};
use std::path::PathBuf;
use std::time::Instant;

struct TrainConfig {
    data: Option<PathBuf>,
    mapping: Option<PathBuf>,
    kernel: KernelType,
    c: f64,
    output: PathBuf,
    test_size: f64,
    cross_validate: Option<usize>,
    stats: bool,
}

impl TrainConfig {
    fn from_args() -> Result<Self, String> {
        let args: Vec<String> = std::env::args().collect();
        let defaults = ModelPaths::default();
        let mut config = Self {
            data: None,
            mapping: Some(defaults.mapping),
            kernel: KernelType::Rbf,
            c: 1.0,
            output: defaults.model,
            test_size: 0.2,
            cross_validate: None,
            stats: false,
        };

        let mut i = 1;
        while i < args.len() {
            let flag = args[i].as_str();
            match flag {
                "--data" => config.data = Some(PathBuf::from(value(&args, &mut i, flag)?)),
                "--mapping" => config.mapping = Some(PathBuf::from(value(&args, &mut i, flag)?)),
                "--no-mapping" => config.mapping = None,
                "--kernel" => {
                    config.kernel = value(&args, &mut i, flag)?
                        .parse::<KernelType>()
                        .map_err(|e| e.to_string())?;
                },
                "--C" | "-C" => config.c = parse_number(value(&args, &mut i, flag)?, flag)?,
                "--output" | "-o" => config.output = PathBuf::from(value(&args, &mut i, flag)?),
                "--test-size" => config.test_size = parse_number(value(&args, &mut i, flag)?, flag)?,
                "--cross-validate" => {
                    config.cross_validate = Some(parse_number(value(&args, &mut i, flag)?, flag)?);
                },
                "--stats" => config.stats = true,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                },
                other => return Err(format!("Unknown argument: {}", other)),
            }
            i += 1;
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

fn parse_number<T: std::str::FromStr>(raw: &str, flag: &str) -> Result<T, String> {
    raw.parse()
        .map_err(|_| format!("Invalid value for {}: {}", flag, raw))
}

fn print_usage() {
    println!("Usage: train_classifier [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --data <PATH>           Dataset file or folder (default: built-in sample corpus)");
    println!("  --mapping <PATH>        Label mapping file (default: data_mapping/data_mapping.json)");
    println!("  --no-mapping            Keep labels as they appear in the dataset");
    println!("  --kernel <KIND>         linear, rbf, poly or sigmoid (default: rbf)");
    println!("  --C <VALUE>             Regularization strength (default: 1.0)");
    println!("  --output <PATH>         Model output path; .gz compresses (default: lease_model.json)");
    println!("  --test-size <FRACTION>  Held-out fraction (default: 0.2)");
    println!("  --cross-validate <K>    Also run stratified K-fold cross-validation");
    println!("  --stats                 Print dataset statistics");
}

fn load_dataset(config: &TrainConfig) -> lease_clause::Result<Dataset> {
    match &config.data {
        Some(path) => {
            let mapping = config.mapping.as_deref().filter(|p| p.exists());
            DataLoader::load_with_mapping(path, mapping)
        },
        None => {
            println!("No dataset given; using the built-in sample corpus");
            Ok(sample_data())
        },
    }
}

fn print_stats(dataset: &Dataset) {
    let stats = DataLoader::dataset_stats(dataset);
    println!("Dataset statistics");
    println!("  Samples:       {}", stats.total_samples);
    println!("  Labels:        {}", stats.unique_labels);
    println!(
        "  Text length:   avg {:.1}, min {}, max {}",
        stats.avg_text_length, stats.min_text_length, stats.max_text_length
    );
    for (label, count) in &stats.samples_per_label {
        println!("    {:<30} {}", label, count);
    }
    println!();
}

fn run(config: &TrainConfig) -> lease_clause::Result<()> {
    let dataset = load_dataset(config)?;
    if dataset.is_empty() {
        return Err(lease_clause::Error::Training("dataset is empty".into()));
    }
    println!("Loaded {} samples", dataset.len());
    if config.stats {
        print_stats(&dataset);
    }

    let model_config = ModelConfig::default()
        .with_kernel(config.kernel)
        .with_c(config.c);
    model_config.validate()?;

    let split =
        stratified_train_test_split(&dataset.labels, config.test_size, model_config.random_seed)?;
    let train = dataset.subset(&split.train);
    let test = dataset.subset(&split.test);
    println!("Train: {} samples, test: {} samples", train.len(), test.len());

    let mut classifier =
        LeaseClauseClassifier::with_preprocessor(model_config, PreprocessorConfig::default());

    if let Some(folds) = config.cross_validate {
        let cv = classifier.cross_validate(&dataset.texts, &dataset.labels, folds)?;
        let scores: Vec<String> = cv.scores.iter().map(|s| format!("{:.4}", s)).collect();
        println!("Cross-validation ({} folds): [{}]", folds, scores.join(", "));
        println!("  Mean accuracy: {:.4} (+/- {:.4})", cv.mean, cv.std * 2.0);
        println!();
    }

    let start = Instant::now();
    classifier.fit(&train.texts, &train.labels)?;
    println!(
        "Trained on {} classes in {:.2?}",
        classifier.classes().len(),
        start.elapsed()
    );

    if !test.is_empty() {
        let report = classifier.evaluate(&test.texts, &test.labels)?;
        println!();
        println!("Test accuracy: {:.4}", report.accuracy);
        println!();
        println!("{}", report.report);
    }

    classifier.save(&config.output)?;
    println!("Model saved to {}", config.output.display());
    Ok(())
}

fn main() {
    env_logger::init();

    let config = match TrainConfig::from_args() {
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
