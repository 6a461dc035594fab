//! Output formatting for CLI commands.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::cli::args::{OutputFormat, SmsBayesArgs};
use crate::dataset::Label;
use crate::error::Result;
use crate::ml::{EvaluationSummary, ModelOrigin};

/// Result structure for model training.
#[derive(Debug, Serialize, Deserialize)]
pub struct TrainingResult {
    pub model_path: String,
    pub documents: usize,
    pub spam: usize,
    pub ham: usize,
    pub vocabulary_size: usize,
    pub duration_ms: u64,
}

impl fmt::Display for TrainingResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Model: {}", self.model_path)?;
        writeln!(
            f,
            "Documents: {} ({} spam, {} ham)",
            self.documents, self.spam, self.ham
        )?;
        writeln!(f, "Vocabulary size: {}", self.vocabulary_size)?;
        write!(f, "Training time: {}ms", self.duration_ms)
    }
}

/// A single classified message.
#[derive(Debug, Serialize, Deserialize)]
pub struct Prediction {
    pub text: String,
    pub label: Label,
    pub spam_probability: f64,
    pub ham_probability: f64,
}

impl Prediction {
    pub fn new(text: impl Into<String>, label: Label, proba: [f64; Label::COUNT]) -> Self {
        Prediction {
            text: text.into(),
            label,
            spam_probability: proba[Label::Spam.index()],
            ham_probability: proba[Label::Ham.index()],
        }
    }
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} => {} (spam {:.4}, ham {:.4})",
            self.text, self.label, self.spam_probability, self.ham_probability
        )
    }
}

/// Result structure for predictions.
#[derive(Debug, Serialize, Deserialize)]
pub struct PredictionResults {
    pub predictions: Vec<Prediction>,
}

impl fmt::Display for PredictionResults {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, prediction) in self.predictions.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{prediction}")?;
        }
        Ok(())
    }
}

/// Result structure for evaluation.
#[derive(Debug, Serialize)]
pub struct EvaluationResult {
    pub model_path: String,
    pub test_documents: usize,
    pub summary: EvaluationSummary,
}

impl fmt::Display for EvaluationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Model: {}", self.model_path)?;
        writeln!(f, "Test documents: {}", self.test_documents)?;
        writeln!(f)?;
        write!(f, "{}", self.summary)
    }
}

/// Result structure for the end-to-end run.
#[derive(Debug, Serialize)]
pub struct RunResult {
    pub model_path: String,
    pub model_origin: ModelOrigin,
    pub predictions: Vec<Prediction>,
    pub summary: EvaluationSummary,
}

impl fmt::Display for RunResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let origin = match self.model_origin {
            ModelOrigin::Loaded => "loaded",
            ModelOrigin::Trained => "trained",
        };
        writeln!(f, "Model: {} ({origin})", self.model_path)?;
        writeln!(f)?;
        for prediction in &self.predictions {
            writeln!(f, "{prediction}")?;
        }
        writeln!(f)?;
        write!(f, "{}", self.summary)
    }
}

/// Render a path for output.
pub fn display_path(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

/// Output a result in the specified format.
pub fn output_result<T>(message: &str, result: &T, args: &SmsBayesArgs) -> Result<()>
where
    T: Serialize + fmt::Display,
{
    match args.output_format {
        OutputFormat::Human => output_human(message, result, args),
        OutputFormat::Json => output_json(result, args),
    }
}

/// Output in human-readable format.
fn output_human<T: fmt::Display>(message: &str, result: &T, args: &SmsBayesArgs) -> Result<()> {
    if args.verbosity() > 0 {
        println!("{message}");
        println!();
    }
    println!("{result}");
    Ok(())
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T, args: &SmsBayesArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };

    println!("{json}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prediction_json_shape() {
        let prediction = Prediction::new("you won", Label::Spam, [0.9, 0.1]);
        let value = serde_json::to_value(&prediction).unwrap();

        assert_eq!(value["text"], "you won");
        assert_eq!(value["label"], "spam");
        assert_eq!(value["spam_probability"], 0.9);
        assert_eq!(value["ham_probability"], 0.1);
    }

    #[test]
    fn test_prediction_results_display() {
        let results = PredictionResults {
            predictions: vec![
                Prediction::new("you won", Label::Spam, [0.75, 0.25]),
                Prediction::new("lunch?", Label::Ham, [0.2, 0.8]),
            ],
        };
        let text = results.to_string();

        assert_eq!(
            text,
            "\"you won\" => spam (spam 0.7500, ham 0.2500)\n\"lunch?\" => ham (spam 0.2000, ham 0.8000)"
        );
    }

    #[test]
    fn test_training_result_display() {
        let result = TrainingResult {
            model_path: "models/sms.dat".to_string(),
            documents: 3,
            spam: 1,
            ham: 2,
            vocabulary_size: 7,
            duration_ms: 4,
        };
        let text = result.to_string();

        assert!(text.contains("Documents: 3 (1 spam, 2 ham)"));
        assert!(text.contains("Vocabulary size: 7"));
    }
}
