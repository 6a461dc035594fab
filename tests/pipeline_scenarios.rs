//! End-to-end scenarios for training, persisting and evaluating models.

use std::fs;
use std::path::Path;

use smsbayes::config::PipelineConfig;
use smsbayes::dataset::{Dataset, Document, Label, load_cached_or_raw, load_raw};
use smsbayes::error::{ErrorKind, Result};
use smsbayes::ml::{Classifier, ModelOrigin, Pipeline, PipelineState, TextClassifier, evaluate};
use smsbayes::storage::{load_model, save_model};

const TRAIN_CORPUS: &str = "\
spam you won the lottery
ham see you at lunch
spam claim your free prize now
ham how are you doing today
spam u have won a cash prize
ham are we still on for dinner
";

fn write_corpus(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn train_and_predict_spam() -> Result<()> {
    let dataset = Dataset::from_documents(vec![
        Document::new(Label::Spam, "you won the lottery"),
        Document::new(Label::Ham, "see you at lunch"),
    ]);

    let classifier = Pipeline::default().fit(&dataset)?;

    assert_eq!(classifier.state(), PipelineState::Ready);
    assert_eq!(classifier.predict("you won")?, Label::Spam);
    Ok(())
}

#[test]
fn missing_model_falls_back_to_training() -> Result<()> {
    let dir = tempfile::tempdir().unwrap();
    let train_raw = write_corpus(dir.path(), "train.txt", TRAIN_CORPUS);
    let train_arff = dir.path().join("train.arff");
    let model_path = dir.path().join("models").join("sms.dat");

    let err = load_model(&model_path).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let pipeline = Pipeline::default();
    let (trained, origin) = pipeline.load_or_train(&model_path, &train_raw, &train_arff)?;
    assert_eq!(origin, ModelOrigin::Trained);
    assert!(model_path.exists());
    assert!(train_arff.exists());

    let (loaded, origin) = pipeline.load_or_train(&model_path, &train_raw, &train_arff)?;
    assert_eq!(origin, ModelOrigin::Loaded);
    assert_eq!(loaded, trained);

    for text in [
        "how are you ?",
        "u have won the 1 lakh prize",
        "dinner today",
        "",
        "never seen before",
    ] {
        assert_eq!(loaded.predict(text)?, trained.predict(text)?);
        assert_eq!(loaded.predict_proba(text)?, trained.predict_proba(text)?);
    }
    Ok(())
}

#[test]
fn corrupt_model_is_not_retrained() {
    let dir = tempfile::tempdir().unwrap();
    let train_raw = write_corpus(dir.path(), "train.txt", TRAIN_CORPUS);
    let model_path = dir.path().join("sms.dat");
    fs::write(&model_path, b"definitely not a model").unwrap();

    let err = Pipeline::default()
        .load_or_train(&model_path, &train_raw, dir.path().join("train.arff"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CorruptModel);
    assert!(!dir.path().join("train.arff").exists());
}

#[test]
fn perfectly_predicted_test_set_has_full_accuracy() -> Result<()> {
    let dir = tempfile::tempdir().unwrap();
    let train_raw = write_corpus(dir.path(), "train.txt", TRAIN_CORPUS);
    let dataset = load_raw(&train_raw)?;

    let classifier = Pipeline::default().fit(&dataset)?;
    let summary = evaluate(&classifier, &dataset)?;

    assert_eq!(summary.total, 6);
    assert_eq!(summary.correct, 6);
    assert_eq!(summary.incorrect, 0);
    assert_eq!(summary.accuracy, 1.0);
    assert_eq!(summary.kappa, 1.0);
    assert_eq!(summary.confusion.get(Label::Spam, Label::Ham), 0);
    assert_eq!(summary.confusion.get(Label::Ham, Label::Spam), 0);
    Ok(())
}

#[test]
fn cached_dataset_matches_raw_dataset() -> Result<()> {
    let dir = tempfile::tempdir().unwrap();
    let raw = write_corpus(
        dir.path(),
        "train.txt",
        "spam it's 100% free, \"really\"\nham line with\ttab\nbogus line\nham ünïcödé wörds\n",
    );
    let arff = dir.path().join("train.arff");

    let from_raw = load_cached_or_raw(&raw, &arff)?;
    assert!(arff.exists());
    assert_eq!(from_raw.len(), 3);

    // Second load comes from the cache even if the raw corpus disappears.
    fs::remove_file(&raw).unwrap();
    let from_cache = load_cached_or_raw(&raw, &arff)?;
    assert_eq!(from_cache.documents(), from_raw.documents());
    Ok(())
}

#[test]
fn malformed_cache_is_rebuilt_from_raw() -> Result<()> {
    let dir = tempfile::tempdir().unwrap();
    let raw = write_corpus(dir.path(), "train.txt", TRAIN_CORPUS);
    let arff = write_corpus(dir.path(), "train.arff", "@relation broken\n@data\n");

    let dataset = load_cached_or_raw(&raw, &arff)?;
    assert_eq!(dataset.len(), 6);

    let rebuilt = fs::read_to_string(&arff).unwrap();
    assert!(rebuilt.contains("@attribute"));
    Ok(())
}

#[test]
fn unfit_components_are_rejected() {
    let unfit = TextClassifier::default();
    assert_eq!(unfit.state(), PipelineState::Unfit);
    assert_eq!(unfit.predict("hello").unwrap_err().kind(), ErrorKind::State);

    let dataset = Dataset::from_documents(vec![Document::new(Label::Ham, "hello")]);
    assert_eq!(
        evaluate(&unfit, &dataset).unwrap_err().kind(),
        ErrorKind::State
    );

    let dir = tempfile::tempdir().unwrap();
    let model_path = dir.path().join("unfit.dat");
    assert_eq!(
        save_model(&unfit, &model_path).unwrap_err().kind(),
        ErrorKind::State
    );
    assert!(!model_path.exists());
}

#[test]
fn bigram_config_round_trips_through_model_file() -> Result<()> {
    let dir = tempfile::tempdir().unwrap();
    let train_raw = write_corpus(dir.path(), "train.txt", TRAIN_CORPUS);
    let model_path = dir.path().join("bigram.dat");

    let mut config = PipelineConfig::default();
    config.vectorizer.ngram_max = 2;
    config.naive_bayes.alpha = 0.5;
    let pipeline = Pipeline::new(config)?;

    let trained = pipeline.train(&train_raw, dir.path().join("train.arff"), &model_path)?;
    assert!(trained.vocabulary().index_of("you won").is_some());

    let loaded = load_model(&model_path)?;
    assert_eq!(loaded.vocabulary().config().ngram_max, 2);
    assert_eq!(loaded.model().config().alpha, 0.5);
    assert_eq!(
        loaded.predict("claim your prize")?,
        trained.predict("claim your prize")?
    );
    Ok(())
}
