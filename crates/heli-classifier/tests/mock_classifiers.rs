//! Mock classifiers for testing
//!
//! Provides scripted implementations of the LineClassifier trait for testing
//! the channel, the result assembler, and error handling without a JVM.

use async_trait::async_trait;
use heli_classifier::{annotate, AssemblyOptions, ClassifierChannel, LineClassifier};
use heli_core::{Candidate, Error, Result};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A classifier that answers from a keyword table
pub struct MockClassifier {
    rules: Vec<(String, Vec<Candidate>)>,
    simulated_latency: Option<Duration>,
    log: Arc<Mutex<Vec<String>>>,
    call_count: Arc<AtomicU32>,
}

impl MockClassifier {
    /// Create a mock with no rules (every line gets no candidates)
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            simulated_latency: None,
            log: Arc::default(),
            call_count: Arc::default(),
        }
    }

    /// Lines containing `keyword` get these ranked candidates
    pub fn with_rule(mut self, keyword: &str, ranked: &[(&str, f64)]) -> Self {
        let candidates = ranked
            .iter()
            .map(|(lang3, score)| Candidate {
                lang3: Some(lang3.to_string()),
                lang2: heli_classifier::langcodes::to_alpha2(lang3).map(str::to_string),
                score: *score,
            })
            .collect();
        self.rules.push((keyword.to_string(), candidates));
        self
    }

    /// Sleep this long before each answer
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.simulated_latency = Some(latency);
        self
    }

    /// Shared log of every line received
    pub fn log(&self) -> Arc<Mutex<Vec<String>>> {
        self.log.clone()
    }

    /// Shared call counter
    pub fn calls(&self) -> Arc<AtomicU32> {
        self.call_count.clone()
    }
}

#[async_trait]
impl LineClassifier for MockClassifier {
    async fn classify_line(&mut self, line: &str) -> Result<Vec<Candidate>> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        self.log.lock().unwrap().push(line.to_string());

        if let Some(latency) = self.simulated_latency {
            tokio::time::sleep(latency).await;
        }

        Ok(self
            .rules
            .iter()
            .find(|(keyword, _)| line.contains(keyword.as_str()))
            .map(|(_, candidates)| candidates.clone())
            .unwrap_or_default())
    }

    async fn ensure_ready(&mut self) -> Result<()> {
        Ok(())
    }

    fn is_running(&mut self) -> bool {
        true
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// A classifier that fails after answering a number of lines
pub struct FailingClassifier {
    remaining: u32,
}

impl FailingClassifier {
    pub fn after(lines: u32) -> Self {
        Self { remaining: lines }
    }
}

#[async_trait]
impl LineClassifier for FailingClassifier {
    async fn classify_line(&mut self, _line: &str) -> Result<Vec<Candidate>> {
        if self.remaining == 0 {
            return Err(Error::unavailable("classifier closed its output stream"));
        }
        self.remaining -= 1;
        Ok(vec![Candidate::new("eng", Some("en"), 1.0)])
    }

    async fn ensure_ready(&mut self) -> Result<()> {
        Ok(())
    }

    fn is_running(&mut self) -> bool {
        self.remaining > 0
    }

    fn name(&self) -> &str {
        "failing"
    }
}

fn nordic_mock() -> MockClassifier {
    MockClassifier::new()
        .with_rule("Suomi", &[("fin", 12.0), ("est", 10.5), ("swe", 3.0)])
        .with_rule("morgon", &[("swe", 8.0), ("nor", 7.0), ("dan", 6.5)])
        .with_rule("English", &[("eng", 9.0), ("sco", 4.0)])
}

#[tokio::test]
async fn test_annotate_without_language_set() {
    let channel = ClassifierChannel::new(nordic_mock());
    let content = "Suomi on kaunis maa\nGod morgon!\nThis is an English sentence";

    let mut session = channel.session().await.unwrap();
    let annotations = annotate(&mut session, content, &AssemblyOptions::default())
        .await
        .unwrap();

    assert_eq!(annotations.values().map(Vec::len).sum::<usize>(), 3);

    let fin = &annotations["fin"][0];
    assert_eq!((fin.start, fin.end), (0, 19));
    assert_eq!(fin.features.lang2.as_deref(), Some("fi"));
    assert!((fin.features.confidence - 1.5).abs() < 1e-9);

    let swe = &annotations["swe"][0];
    assert_eq!((swe.start, swe.end), (20, 31));
    assert!((swe.features.confidence - 1.0).abs() < 1e-9);

    let eng = &annotations["eng"][0];
    assert_eq!(eng.start, 32);
    assert_eq!(eng.end, content.chars().count());
}

#[tokio::test]
async fn test_annotate_with_language_set() {
    let channel = ClassifierChannel::new(nordic_mock());
    let options = AssemblyOptions {
        include_orig: true,
        language_set: Some(vec!["nor".to_string(), "eng".to_string()]),
        ..Default::default()
    };

    let mut session = channel.session().await.unwrap();
    let annotations = annotate(&mut session, "God morgon!\nSuomi on kaunis maa", &options)
        .await
        .unwrap();

    // swe ranked first but only nor is accepted
    let nor = &annotations["nor"][0];
    assert_eq!(nor.features.lang2.as_deref(), Some("no"));
    assert_eq!(nor.features.confidence, 0.0);
    assert_eq!(nor.features.original_text.as_deref(), Some("God morgon!"));

    // nothing in the set was proposed for the Finnish line
    let default = annotations["nor"]
        .iter()
        .find(|a| a.start == 12)
        .expect("second line falls back to the first set language");
    assert_eq!(default.features.confidence, 0.0);
    assert!(!annotations.contains_key("fin"));
}

#[tokio::test]
async fn test_unknown_line_goes_to_null_bucket() {
    let channel = ClassifierChannel::new(nordic_mock());
    let mut session = channel.session().await.unwrap();
    let annotations = annotate(&mut session, "12345\n", &AssemblyOptions::default())
        .await
        .unwrap();

    let nulls = &annotations[heli_core::NULL_BUCKET];
    assert_eq!(nulls.len(), 2);
    assert_eq!((nulls[1].start, nulls[1].end), (6, 6));
    assert!(nulls.iter().all(|a| a.features.lang3.is_none()));
}

#[tokio::test]
async fn test_failure_aborts_whole_request() {
    let channel = ClassifierChannel::new(FailingClassifier::after(1));
    let mut session = channel.session().await.unwrap();

    let err = annotate(&mut session, "one\ntwo", &AssemblyOptions::default())
        .await
        .unwrap_err();
    assert!(err.is_classifier_failure());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_requests_do_not_interleave() {
    let mock = nordic_mock().with_latency(Duration::from_millis(2));
    let log = mock.log();
    let calls = mock.calls();
    let channel = ClassifierChannel::new(mock);

    let mut handles = Vec::new();
    for request in 0..4 {
        let channel = channel.clone();
        handles.push(tokio::spawn(async move {
            let content: Vec<String> = (0..8).map(|line| format!("r{request} l{line}")).collect();
            let mut session = channel.session().await.unwrap();
            annotate(&mut session, &content.join("\n"), &AssemblyOptions::default())
                .await
                .unwrap()
        }));
    }
    for handle in handles {
        let annotations = handle.await.unwrap();
        assert_eq!(annotations[heli_core::NULL_BUCKET].len(), 8);
    }

    assert_eq!(calls.load(Ordering::Relaxed), 32);

    // each request's lines arrive as one contiguous run
    let log = log.lock().unwrap();
    for run in log.chunks(8) {
        let request = run[0].split(' ').next().unwrap();
        assert!(run.iter().all(|line| line.starts_with(request)), "{run:?}");
        let lines: Vec<String> = (0..8).map(|l| format!("{request} l{l}")).collect();
        assert_eq!(run, lines.as_slice());
    }
}
