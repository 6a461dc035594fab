//! Criterion benchmarks for the smsbayes pipeline.
//!
//! Covers text analysis, vocabulary fitting, model training and prediction.

use std::hint::black_box;

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use smsbayes::analysis::{Analyzer, PipelineAnalyzer};
use smsbayes::dataset::{Dataset, Document, Label};
use smsbayes::ml::{BagOfWordsVectorizer, Classifier, Pipeline, VectorizerConfig};

const SPAM_WORDS: &[&str] = &[
    "free", "win", "prize", "cash", "claim", "urgent", "txt", "now", "offer", "call", "mobile",
    "award", "guaranteed", "lottery", "lakh",
];

const HAM_WORDS: &[&str] = &[
    "see", "you", "lunch", "dinner", "home", "later", "ok", "thanks", "meeting", "tomorrow",
    "love", "sorry", "sure", "going", "tonight",
];

/// Generate a labeled corpus for benchmarking.
fn generate_dataset(count: usize) -> Dataset {
    let mut documents = Vec::with_capacity(count);
    for i in 0..count {
        let (label, words) = if i % 4 == 0 {
            (Label::Spam, SPAM_WORDS)
        } else {
            (Label::Ham, HAM_WORDS)
        };
        let length = 5 + (i % 20);
        let text = (0..length)
            .map(|j| words[(i * 7 + j * 13) % words.len()]) // Pseudo-random distribution
            .collect::<Vec<_>>()
            .join(" ");
        documents.push(Document::new(label, text));
    }
    Dataset::from_documents(documents)
}

fn bench_text_analysis(c: &mut Criterion) {
    let mut group = c.benchmark_group("text_analysis");

    let analyzer = PipelineAnalyzer::word_analyzer(true).unwrap();
    let dataset = generate_dataset(100);

    group.throughput(Throughput::Elements(dataset.len() as u64));
    group.bench_function("analyze_batch_messages", |b| {
        b.iter(|| {
            for document in &dataset {
                let tokens: Vec<_> = analyzer.analyze(black_box(&document.text)).unwrap().collect();
                black_box(tokens);
            }
        })
    });

    group.finish();
}

fn bench_training(c: &mut Criterion) {
    let mut group = c.benchmark_group("training");
    group.sample_size(20);

    let dataset = generate_dataset(5000);
    group.throughput(Throughput::Elements(dataset.len() as u64));

    group.bench_function("fit_vocabulary", |b| {
        let vectorizer = BagOfWordsVectorizer::new(VectorizerConfig::default()).unwrap();
        b.iter(|| black_box(vectorizer.fit_transform(black_box(&dataset)).unwrap()))
    });

    group.bench_function("fit_pipeline", |b| {
        let pipeline = Pipeline::default();
        b.iter(|| black_box(pipeline.fit(black_box(&dataset)).unwrap()))
    });

    group.finish();
}

fn bench_prediction(c: &mut Criterion) {
    let mut group = c.benchmark_group("prediction");

    let classifier = Pipeline::default().fit(&generate_dataset(5000)).unwrap();

    group.bench_function("predict_single_message", |b| {
        b.iter(|| black_box(classifier.predict(black_box("u have won the 1 lakh prize")).unwrap()))
    });

    let messages = generate_dataset(100);
    group.throughput(Throughput::Elements(messages.len() as u64));
    group.bench_function("predict_batch_messages", |b| {
        b.iter(|| {
            for document in &messages {
                black_box(classifier.predict(&document.text).unwrap());
            }
        })
    });

    group.finish();
}

criterion_group!(benches, bench_text_analysis, bench_training, bench_prediction);
criterion_main!(benches);
