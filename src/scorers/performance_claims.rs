//! Performance claims scorer: evidence that reported results are backed by
//! benchmarks and evaluations.
//!
//! Combines the structured performance index (results entries, named
//! metrics, evaluation datasets), benchmark vocabulary and numeric result
//! patterns in the README, and evaluation-related tags.

use super::{clamp01, is_well_known_family};
use crate::artifact::ArtifactDescriptor;
use crate::fetch::{FetchResult, MetadataClient};
use regex::Regex;
use serde_json::Value;
use std::sync::{Arc, LazyLock};

const LOG_TARGET: &str = " perf_claims";

const INDEX_WEIGHT: f64 = 0.5;
const README_WEIGHT: f64 = 0.3;
const TAGS_WEIGHT: f64 = 0.2;

/// Sub-score assumed when a component has nothing to go on.
const UNINFORMED_COMPONENT: f64 = 0.3;

const BENCHMARK_TERMS: &[&str] = &[
    "benchmark",
    "evaluation",
    "eval",
    "performance",
    "accuracy",
    "bleu",
    "rouge",
    "bert-score",
    "glue",
    "superglue",
    "hellaswag",
    "mmlu",
    "truthfulqa",
    "arc",
    "winogrande",
    "gsm8k",
];

const EVALUATION_TAGS: &[&str] = &["evaluation", "benchmark", "leaderboard", "performance", "tested", "validated", "eval"];

/// Numeric result patterns: percentages, or numbers attached to a named
/// metric.
static NUMERIC_RESULT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\.?\d*\s*%|\d+\.?\d*\s*(accuracy|score|bleu|rouge)").expect("invalid regex"));

#[derive(Debug)]
pub struct PerformanceClaimsScorer {
    client: Arc<MetadataClient>,
}

impl PerformanceClaimsScorer {
    pub const FALLBACK: f64 = 0.5;

    #[must_use]
    pub fn new(client: Arc<MetadataClient>) -> Self {
        Self { client }
    }

    pub async fn score(&self, artifact: &ArtifactDescriptor) -> f64 {
        if artifact.name().is_empty() {
            return Self::FALLBACK;
        }

        let base = if is_well_known_family(artifact.name()) { 0.5 } else { 0.3 };

        let readme = match self.client.readme(artifact.name()).await {
            FetchResult::Found(content) => readme_benchmark_score(&content),
            FetchResult::Unavailable => {
                log::debug!(target: LOG_TARGET, "README unavailable for '{}'", artifact.name());
                UNINFORMED_COMPONENT
            }
        };

        clamp01(
            base + model_index_score(artifact.model_index()) * INDEX_WEIGHT
                + readme * README_WEIGHT
                + tags_score(artifact.tags()) * TAGS_WEIGHT,
        )
    }
}

/// Structured-index evidence: non-empty results entries, the number of
/// named metrics within them, and evaluation dataset references.
fn model_index_score(index: Option<&Vec<Value>>) -> f64 {
    let Some(entries) = index.filter(|entries| !entries.is_empty()) else {
        return UNINFORMED_COMPONENT;
    };

    let mut score = 0.0;
    for entry in entries {
        if let Some(results) = entry.get("results").and_then(Value::as_array) {
            if !results.is_empty() {
                score += 0.5;

                for result in results {
                    if let Some(metrics) = result.get("metrics").and_then(Value::as_array) {
                        score += (metrics.len() as f64 * 0.1).min(0.3);
                    }
                }
            }
        }

        if entry.get("datasets").is_some() {
            score += 0.2;
        }
    }

    clamp01(score)
}

/// Benchmark vocabulary hits plus numeric result patterns in the README.
fn readme_benchmark_score(content: &str) -> f64 {
    let content = content.to_lowercase();

    let found_terms = BENCHMARK_TERMS.iter().filter(|term| content.contains(*term)).count();
    let mut score = match found_terms {
        0 => 0.0,
        1..=2 => 0.3,
        3..=4 => 0.6,
        _ => 0.8,
    };

    let numbers_found = NUMERIC_RESULT_REGEX.find_iter(&content).count();
    score += (numbers_found as f64 * 0.1).min(0.4);

    clamp01(score)
}

/// Evaluation-related tags, with a moderate floor so sparse tagging is not
/// punished.
fn tags_score(tags: &[String]) -> f64 {
    if tags.is_empty() {
        return UNINFORMED_COMPONENT;
    }

    let matching = tags
        .iter()
        .filter(|tag| {
            let tag = tag.to_lowercase();
            EVALUATION_TAGS.iter().any(|eval_tag| tag.contains(eval_tag))
        })
        .count();

    clamp01((matching as f64 * 0.2).max(UNINFORMED_COMPONENT))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn scorer() -> PerformanceClaimsScorer {
        PerformanceClaimsScorer::new(Arc::new(MetadataClient::new(Some("http://127.0.0.1:9")).unwrap()))
    }

    #[test]
    fn missing_or_empty_index_is_uninformed() {
        assert!((model_index_score(None) - UNINFORMED_COMPONENT).abs() < f64::EPSILON);
        assert!((model_index_score(Some(&vec![])) - UNINFORMED_COMPONENT).abs() < f64::EPSILON);
    }

    #[test]
    fn structured_results_and_metrics_raise_the_index_score() {
        let index = vec![json!({
            "results": [{"metrics": [{"type": "accuracy"}, {"type": "f1"}]}],
            "datasets": ["glue"],
        })];

        // 0.5 results + 0.2 metrics + 0.2 datasets
        assert!((model_index_score(Some(&index)) - 0.9).abs() < 1e-9);
    }

    #[test]
    fn metric_count_contribution_is_capped() {
        let index = vec![json!({
            "results": [{"metrics": [1, 2, 3, 4, 5, 6, 7, 8]}],
        })];

        assert!((model_index_score(Some(&index)) - 0.8).abs() < 1e-9);
    }

    #[test]
    fn benchmark_vocabulary_tiers() {
        assert!(readme_benchmark_score("nothing to see here").abs() < f64::EPSILON);
        assert!((readme_benchmark_score("we ran a benchmark") - 0.3).abs() < 1e-9);
        assert!((readme_benchmark_score("benchmark evaluation accuracy") - 0.6).abs() < 1e-9);
        assert!((readme_benchmark_score("benchmark evaluation accuracy on glue, superglue and mmlu") - 0.8).abs() < 1e-9);
    }

    #[test]
    fn numeric_results_add_to_the_readme_score() {
        let with_numbers = readme_benchmark_score("accuracy results: 92.5% and 88.1%");
        let without_numbers = readme_benchmark_score("accuracy results pending");
        assert!(with_numbers > without_numbers);
    }

    #[test]
    fn evaluation_tags_raise_the_tags_score() {
        let tagged = vec!["leaderboard".to_string(), "benchmark".to_string(), "en".to_string()];
        assert!((tags_score(&tagged) - 0.4).abs() < 1e-9);

        let untagged = vec!["en".to_string()];
        assert!((tags_score(&untagged) - UNINFORMED_COMPONENT).abs() < f64::EPSILON);

        assert!((tags_score(&[]) - UNINFORMED_COMPONENT).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn rich_index_beats_bare_descriptor() {
        let scorer = scorer();
        let rich = ArtifactDescriptor::from_record(
            "org/model",
            "url",
            &json!({"model-index": [{"results": [{"metrics": [1, 2, 3]}], "datasets": ["x"]}]}),
        );
        let bare = ArtifactDescriptor::new("org/model", "url");

        assert!(scorer.score(&rich).await > scorer.score(&bare).await);
    }

    #[tokio::test]
    async fn empty_descriptor_scores_fallback() {
        let score = scorer().score(&ArtifactDescriptor::default()).await;
        assert!((score - PerformanceClaimsScorer::FALLBACK).abs() < f64::EPSILON);
    }
}
