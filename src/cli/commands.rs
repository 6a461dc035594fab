//! Command implementations for the smsbayes CLI.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, bail};
use log::{debug, info};

use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::PipelineConfig;
use crate::dataset::{Dataset, load_cached_or_raw, load_raw};
use crate::ml::{Classifier, Pipeline, TextClassifier, evaluate};
use crate::storage::{load_model, save_model};

/// Messages classified by `run` before evaluating.
pub const SAMPLE_MESSAGES: [&str; 2] = ["how are you ?", "u have won the 1 lakh prize"];

/// Execute a CLI command.
pub fn execute_command(args: SmsBayesArgs) -> anyhow::Result<()> {
    let config = load_config(&args)?;
    match &args.command {
        Command::Train(train_args) => train(train_args, &config, &args),
        Command::Predict(predict_args) => predict(predict_args, &config, &args),
        Command::Evaluate(evaluate_args) => evaluate_model(evaluate_args, &config, &args),
        Command::Run(run_args) => run(run_args, &config, &args),
    }
}

/// Load the pipeline configuration, or the defaults when no file is given.
fn load_config(args: &SmsBayesArgs) -> anyhow::Result<PipelineConfig> {
    match &args.config {
        Some(path) => {
            debug!("Loading configuration from {}", path.display());
            PipelineConfig::from_file(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))
        }
        None => Ok(PipelineConfig::default()),
    }
}

/// Load a labeled corpus, through its ARFF cache when one is given.
fn load_dataset(raw: &Path, arff: Option<&Path>) -> anyhow::Result<Dataset> {
    let dataset = match arff {
        Some(arff) => load_cached_or_raw(raw, arff),
        None => load_raw(raw),
    };
    dataset.with_context(|| format!("Failed to load dataset from {}", raw.display()))
}

fn open_model(path: &Path) -> anyhow::Result<TextClassifier> {
    load_model(path).with_context(|| format!("Failed to load model from {}", path.display()))
}

fn classify(classifier: &TextClassifier, text: &str) -> anyhow::Result<Prediction> {
    let label = classifier.predict(text)?;
    let proba = classifier.predict_proba(text)?;
    Ok(Prediction::new(text, label, proba))
}

/// Train a model and save it.
fn train(args: &TrainArgs, config: &PipelineConfig, cli_args: &SmsBayesArgs) -> anyhow::Result<()> {
    let train_raw = args.train_raw.as_ref().unwrap_or(&config.paths.train_raw);
    let model_path = args.model.as_ref().unwrap_or(&config.paths.model);

    if model_path.exists() && !args.force {
        bail!(
            "Model file {} already exists. Use --force to overwrite.",
            model_path.display()
        );
    }

    let start = Instant::now();
    let dataset = load_dataset(train_raw, args.train_arff.as_deref())?;
    let pipeline = Pipeline::new(config.clone())?;
    let classifier = pipeline.fit(&dataset)?;
    save_model(&classifier, model_path)
        .with_context(|| format!("Failed to save model to {}", model_path.display()))?;
    let duration = start.elapsed();

    let [spam, ham] = dataset.label_counts();
    output_result(
        "Model trained successfully",
        &TrainingResult {
            model_path: display_path(model_path),
            documents: dataset.len(),
            spam,
            ham,
            vocabulary_size: classifier.vocabulary().len(),
            duration_ms: duration.as_millis() as u64,
        },
        cli_args,
    )?;

    Ok(())
}

/// Classify messages with a saved model.
fn predict(
    args: &PredictArgs,
    config: &PipelineConfig,
    cli_args: &SmsBayesArgs,
) -> anyhow::Result<()> {
    let model_path = args.model.as_ref().unwrap_or(&config.paths.model);
    let classifier = open_model(model_path)?;

    let predictions = args
        .texts
        .iter()
        .map(|text| classify(&classifier, text))
        .collect::<anyhow::Result<Vec<_>>>()?;

    output_result(
        "Predictions",
        &PredictionResults { predictions },
        cli_args,
    )?;

    Ok(())
}

/// Evaluate a saved model against a test corpus.
fn evaluate_model(
    args: &EvaluateArgs,
    config: &PipelineConfig,
    cli_args: &SmsBayesArgs,
) -> anyhow::Result<()> {
    let model_path = args.model.as_ref().unwrap_or(&config.paths.model);
    let test_raw = args.test_raw.as_ref().unwrap_or(&config.paths.test_raw);

    let classifier = open_model(model_path)?;
    let test = load_dataset(test_raw, args.test_arff.as_deref())?;
    let summary = evaluate(&classifier, &test)?;

    output_result(
        "Evaluation results",
        &EvaluationResult {
            model_path: display_path(model_path),
            test_documents: test.len(),
            summary,
        },
        cli_args,
    )?;

    Ok(())
}

/// Load or train the model, classify the sample messages, then evaluate.
fn run(args: &RunArgs, config: &PipelineConfig, cli_args: &SmsBayesArgs) -> anyhow::Result<()> {
    let mut paths = config.paths.clone();
    if let Some(dir) = &args.dataset_dir {
        paths.train_raw = dir.join("train.txt");
        paths.train_arff = dir.join("train.arff");
        paths.test_raw = dir.join("test.txt");
        paths.test_arff = dir.join("test.arff");
    }
    let model_path: PathBuf = args.model.clone().unwrap_or_else(|| paths.model.clone());

    let pipeline = Pipeline::new(config.clone())?;
    let (classifier, origin) = pipeline
        .load_or_train(&model_path, &paths.train_raw, &paths.train_arff)
        .with_context(|| format!("Failed to prepare model at {}", model_path.display()))?;
    info!("Model {} is ready", model_path.display());

    let predictions = SAMPLE_MESSAGES
        .iter()
        .map(|text| classify(&classifier, text))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let test = load_dataset(&paths.test_raw, Some(paths.test_arff.as_path()))?;
    let summary = evaluate(&classifier, &test)?;

    output_result(
        "Pipeline run completed",
        &RunResult {
            model_path: display_path(&model_path),
            model_origin: origin,
            predictions,
            summary,
        },
        cli_args,
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use clap::Parser;

    use super::*;
    use crate::ml::ModelOrigin;

    const TRAIN: &str = "spam you won the lottery\nham see you at lunch\nspam claim your free prize now\nham how are you doing\n";
    const TEST: &str = "spam you won a free prize\nham see you soon\n";

    fn args(argv: &[&str]) -> SmsBayesArgs {
        let mut full = vec!["smsbayes", "-q", "-f", "json"];
        full.extend_from_slice(argv);
        SmsBayesArgs::parse_from(full)
    }

    #[test]
    fn test_train_then_predict_and_evaluate() {
        let dir = tempfile::tempdir().unwrap();
        let train_path = dir.path().join("train.txt");
        let test_path = dir.path().join("test.txt");
        let model_path = dir.path().join("models").join("sms.dat");
        fs::write(&train_path, TRAIN).unwrap();
        fs::write(&test_path, TEST).unwrap();

        let train_str = train_path.to_str().unwrap();
        let model_str = model_path.to_str().unwrap();

        execute_command(args(&["train", "--train", train_str, "--model", model_str])).unwrap();
        assert!(model_path.exists());

        // A second run without --force refuses to overwrite.
        let err =
            execute_command(args(&["train", "--train", train_str, "--model", model_str]))
                .unwrap_err();
        assert!(err.to_string().contains("--force"));
        execute_command(args(&[
            "train", "--train", train_str, "--model", model_str, "--force",
        ]))
        .unwrap();

        execute_command(args(&["predict", "--model", model_str, "you won"])).unwrap();
        execute_command(args(&[
            "evaluate",
            "--model",
            model_str,
            "--test",
            test_path.to_str().unwrap(),
        ]))
        .unwrap();
    }

    #[test]
    fn test_predict_missing_model_fails() {
        let dir = tempfile::tempdir().unwrap();
        let model_path = dir.path().join("absent.dat");

        let err = execute_command(args(&[
            "predict",
            "--model",
            model_path.to_str().unwrap(),
            "hello",
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("Failed to load model"));
    }

    #[test]
    fn test_run_trains_then_loads() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("train.txt"), TRAIN).unwrap();
        fs::write(dir.path().join("test.txt"), TEST).unwrap();
        let model_path = dir.path().join("sms.dat");

        let run_args = args(&[
            "run",
            "--dataset-dir",
            dir.path().to_str().unwrap(),
            "--model",
            model_path.to_str().unwrap(),
        ]);
        execute_command(run_args.clone()).unwrap();
        assert!(model_path.exists());
        assert!(dir.path().join("train.arff").exists());
        assert!(dir.path().join("test.arff").exists());

        let pipeline = Pipeline::default();
        let (_, origin) = pipeline
            .load_or_train(
                &model_path,
                dir.path().join("train.txt"),
                dir.path().join("train.arff"),
            )
            .unwrap();
        assert_eq!(origin, ModelOrigin::Loaded);

        execute_command(run_args).unwrap();
    }

    #[test]
    fn test_bad_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.json");
        fs::write(&config_path, r#"{ "vectorizer": { "ngram_min": 0 } }"#).unwrap();

        let err = execute_command(args(&[
            "--config",
            config_path.to_str().unwrap(),
            "predict",
            "hello",
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("Failed to load configuration"));
    }
}
