//! Evaluation of a trained classifier on held-out data.

use std::fmt;

use log::info;
use serde::{Deserialize, Serialize};

use crate::dataset::{Dataset, Label};
use crate::error::{Result, SmsBayesError};
use crate::ml::classifier::TextClassifier;

/// Confusion counts indexed as `[actual][predicted]` in declared label order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    pub counts: [[usize; Label::COUNT]; Label::COUNT],
}

impl ConfusionMatrix {
    /// Record one prediction.
    pub fn record(&mut self, actual: Label, predicted: Label) {
        self.counts[actual.index()][predicted.index()] += 1;
    }

    /// Count of documents labelled `actual` and predicted as `predicted`.
    pub fn get(&self, actual: Label, predicted: Label) -> usize {
        self.counts[actual.index()][predicted.index()]
    }

    /// Total number of recorded predictions.
    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }

    /// Number of correct predictions (the diagonal).
    pub fn correct(&self) -> usize {
        (0..Label::COUNT).map(|i| self.counts[i][i]).sum()
    }

    /// Documents whose true label is `label`.
    pub fn actual_total(&self, label: Label) -> usize {
        self.counts[label.index()].iter().sum()
    }

    /// Documents predicted as `label`.
    pub fn predicted_total(&self, label: Label) -> usize {
        self.counts.iter().map(|row| row[label.index()]).sum()
    }
}

/// Per-class precision, recall and F1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub label: Label,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    /// Documents whose true label is `label`.
    pub support: usize,
}

/// Summary statistics of an evaluation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationSummary {
    pub total: usize,
    pub correct: usize,
    pub incorrect: usize,
    pub accuracy: f64,
    pub kappa: f64,
    pub mean_absolute_error: f64,
    pub root_mean_squared_error: f64,
    pub confusion: ConfusionMatrix,
    pub per_class: Vec<ClassMetrics>,
}

/// Predict every document in `dataset` and compare against its label.
///
/// The classifier is only read.
pub fn evaluate(classifier: &TextClassifier, dataset: &Dataset) -> Result<EvaluationSummary> {
    classifier.ensure_fitted()?;
    if dataset.is_empty() {
        return Err(SmsBayesError::invalid_argument(
            "Cannot evaluate on an empty dataset",
        ));
    }

    let mut confusion = ConfusionMatrix::default();
    let mut absolute_error = 0.0;
    let mut squared_error = 0.0;

    for document in dataset {
        let features = classifier.features(&document.text)?;
        let (predicted, probabilities) = classifier.model().predict_with_proba(&features)?;
        confusion.record(document.label, predicted);

        for label in Label::ALL {
            let truth = if label == document.label { 1.0 } else { 0.0 };
            let error = probabilities[label.index()] - truth;
            absolute_error += error.abs();
            squared_error += error * error;
        }
    }

    let total = confusion.total();
    let correct = confusion.correct();
    let n = total as f64;
    let accuracy = correct as f64 / n;
    let per_instance = n * Label::COUNT as f64;

    let summary = EvaluationSummary {
        total,
        correct,
        incorrect: total - correct,
        accuracy,
        kappa: kappa(&confusion),
        mean_absolute_error: absolute_error / per_instance,
        root_mean_squared_error: (squared_error / per_instance).sqrt(),
        per_class: Label::ALL
            .iter()
            .map(|&label| class_metrics(&confusion, label))
            .collect(),
        confusion,
    };

    info!(
        "Evaluated {} documents: accuracy {:.4}",
        summary.total, summary.accuracy
    );
    Ok(summary)
}

/// Cohen's kappa: agreement beyond what the marginals predict by chance.
fn kappa(confusion: &ConfusionMatrix) -> f64 {
    let n = confusion.total() as f64;
    if n == 0.0 {
        return 0.0;
    }

    let observed = confusion.correct() as f64 / n;
    let chance: f64 = Label::ALL
        .iter()
        .map(|&label| {
            (confusion.actual_total(label) as f64 / n)
                * (confusion.predicted_total(label) as f64 / n)
        })
        .sum();

    if chance < 1.0 {
        (observed - chance) / (1.0 - chance)
    } else {
        1.0
    }
}

fn class_metrics(confusion: &ConfusionMatrix, label: Label) -> ClassMetrics {
    let true_positive = confusion.get(label, label) as f64;
    let predicted = confusion.predicted_total(label) as f64;
    let support = confusion.actual_total(label);

    let precision = ratio(true_positive, predicted);
    let recall = ratio(true_positive, support as f64);
    let f1 = ratio(2.0 * precision * recall, precision + recall);

    ClassMetrics {
        label,
        precision,
        recall,
        f1,
        support,
    }
}

/// `numerator / denominator`, or 0 when the denominator is 0.
fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

impl fmt::Display for EvaluationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.total as f64;
        writeln!(
            f,
            "Correctly Classified Instances    {:>8}    {:>9.4} %",
            self.correct,
            100.0 * self.correct as f64 / n
        )?;
        writeln!(
            f,
            "Incorrectly Classified Instances  {:>8}    {:>9.4} %",
            self.incorrect,
            100.0 * self.incorrect as f64 / n
        )?;
        writeln!(f, "Kappa statistic                   {:>8.4}", self.kappa)?;
        writeln!(
            f,
            "Mean absolute error               {:>8.4}",
            self.mean_absolute_error
        )?;
        writeln!(
            f,
            "Root mean squared error           {:>8.4}",
            self.root_mean_squared_error
        )?;
        writeln!(f, "Total Number of Instances         {:>8}", self.total)?;

        writeln!(f)?;
        writeln!(f, "=== Detailed Accuracy By Class ===")?;
        writeln!(f, "{:>10} {:>10} {:>10} {:>10}  Class", "Precision", "Recall", "F1", "Support")?;
        for metrics in &self.per_class {
            writeln!(
                f,
                "{:>10.4} {:>10.4} {:>10.4} {:>10}  {}",
                metrics.precision, metrics.recall, metrics.f1, metrics.support, metrics.label
            )?;
        }

        writeln!(f)?;
        writeln!(f, "=== Confusion Matrix ===")?;
        for label in Label::ALL {
            write!(f, "{:>8}", label.as_str())?;
        }
        writeln!(f, "   <-- classified as")?;
        for actual in Label::ALL {
            for predicted in Label::ALL {
                write!(f, "{:>8}", self.confusion.get(actual, predicted))?;
            }
            writeln!(f, "   | {actual}")?;
        }
        Ok(())
    }
}
