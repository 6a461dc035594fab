//! Command line argument parsing for the smsbayes CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

/// smsbayes - spam/ham SMS classification with multinomial Naive Bayes
#[derive(Parser, Debug, Clone)]
#[command(name = "smsbayes")]
#[command(about = "Train, evaluate and apply a Naive Bayes SMS spam filter")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct SmsBayesArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human", global = true)]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Pipeline configuration file (JSON)
    #[arg(long, value_name = "CONFIG_FILE", env = "SMSBAYES_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl SmsBayesArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1,
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Train a model from a labeled corpus and save it
    Train(TrainArgs),

    /// Classify one or more messages with a saved model
    Predict(PredictArgs),

    /// Evaluate a saved model against a labeled test corpus
    Evaluate(EvaluateArgs),

    /// Load or train the model, classify two sample messages, then evaluate
    Run(RunArgs),
}

/// Arguments for training
#[derive(Parser, Debug, Clone)]
pub struct TrainArgs {
    /// Raw training corpus (one `<label> <text>` per line)
    #[arg(long = "train", value_name = "RAW_FILE")]
    pub train_raw: Option<PathBuf>,

    /// ARFF cache of the training corpus, reused when present
    #[arg(long = "arff", value_name = "ARFF_FILE")]
    pub train_arff: Option<PathBuf>,

    /// Where to write the model
    #[arg(short, long, value_name = "MODEL_FILE")]
    pub model: Option<PathBuf>,

    /// Overwrite an existing model file
    #[arg(long)]
    pub force: bool,
}

/// Arguments for prediction
#[derive(Parser, Debug, Clone)]
pub struct PredictArgs {
    /// Model file to load
    #[arg(short, long, value_name = "MODEL_FILE")]
    pub model: Option<PathBuf>,

    /// Messages to classify
    #[arg(value_name = "TEXT", required = true)]
    pub texts: Vec<String>,
}

/// Arguments for evaluation
#[derive(Parser, Debug, Clone)]
pub struct EvaluateArgs {
    /// Model file to load
    #[arg(short, long, value_name = "MODEL_FILE")]
    pub model: Option<PathBuf>,

    /// Raw test corpus
    #[arg(long = "test", value_name = "RAW_FILE")]
    pub test_raw: Option<PathBuf>,

    /// ARFF cache of the test corpus, reused when present
    #[arg(long = "arff", value_name = "ARFF_FILE")]
    pub test_arff: Option<PathBuf>,
}

/// Arguments for the end-to-end run
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Directory holding `train.txt` and `test.txt` (overrides configured paths)
    #[arg(long, value_name = "DIR")]
    pub dataset_dir: Option<PathBuf>,

    /// Model file (overrides the configured path)
    #[arg(short, long, value_name = "MODEL_FILE")]
    pub model: Option<PathBuf>,
}

/// Output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}
