//! Dataset quality scorer.
//!
//! README-driven: depth of dataset documentation (curation and annotation
//! vocabulary, size and composition statistics), preprocessing vocabulary,
//! and a lookup of known high-quality dataset names. The overall score
//! carries an enforced floor — absence of dataset documentation is weak
//! evidence, not proof of a bad dataset.

use super::clamp01;
use super::tables::KnownDatasetTable;
use crate::artifact::ArtifactDescriptor;
use crate::fetch::{FetchResult, MetadataClient};
use regex::Regex;
use std::sync::{Arc, LazyLock};

const LOG_TARGET: &str = "dataset_qual";

const BASE_SCORE: f64 = 0.4;
const DOCUMENTATION_WEIGHT: f64 = 0.3;
const PREPROCESSING_WEIGHT: f64 = 0.2;
const KNOWN_DATASETS_WEIGHT: f64 = 0.2;

/// Enforced minimum for the overall score.
const SCORE_FLOOR: f64 = 0.5;

/// Sub-score assumed when the README cannot be fetched.
const UNINFORMED_COMPONENT: f64 = 0.4;

const DOCUMENTATION_TERMS: &[&str] = &[
    "data source",
    "data collection",
    "data cleaning",
    "preprocessing",
    "filtering",
    "deduplication",
    "quality control",
    "curation",
    "annotation",
    "labeling",
    "validation",
];

const COMPOSITION_TERMS: &[&str] = &["composition", "distribution", "breakdown", "statistics"];

const PREPROCESSING_TERMS: &[&str] = &[
    "tokenization",
    "normalization",
    "cleaning",
    "filtering",
    "preprocessing",
    "preparation",
    "augmentation",
    "transformation",
];

const PREPROCESSING_TOOLS: &[&str] = &["spacy", "nltk", "tokenizer", "bpe", "sentencepiece"];

const CURATION_HINTS: &[&str] = &["curated", "filtered", "high-quality", "clean"];

static SIZE_STATS_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+[kmb]?\s*(tokens|words|samples|examples)").expect("invalid regex"));

#[derive(Debug)]
pub struct DatasetQualityScorer {
    client: Arc<MetadataClient>,
    datasets: KnownDatasetTable,
}

impl DatasetQualityScorer {
    pub const FALLBACK: f64 = 0.6;

    #[must_use]
    pub fn new(client: Arc<MetadataClient>, datasets: KnownDatasetTable) -> Self {
        Self { client, datasets }
    }

    pub async fn score(&self, artifact: &ArtifactDescriptor) -> f64 {
        if artifact.name().is_empty() {
            return Self::FALLBACK;
        }

        let readme = match self.client.readme(artifact.name()).await {
            FetchResult::Found(content) => Some(content.to_lowercase()),
            FetchResult::Unavailable => {
                log::debug!(target: LOG_TARGET, "README unavailable for '{}'", artifact.name());
                None
            }
        };
        let readme = readme.as_deref();

        let documentation = readme.map_or(UNINFORMED_COMPONENT, documentation_score);
        let preprocessing = readme.map_or(UNINFORMED_COMPONENT, preprocessing_score);
        let known = readme.map_or(UNINFORMED_COMPONENT, |content| self.known_datasets_score(content));

        let score = BASE_SCORE
            + documentation * DOCUMENTATION_WEIGHT
            + preprocessing * PREPROCESSING_WEIGHT
            + known * KNOWN_DATASETS_WEIGHT;

        clamp01(score).max(SCORE_FLOOR)
    }

    /// Best known-dataset match, or a curation-vocabulary consolation score.
    fn known_datasets_score(&self, content: &str) -> f64 {
        if let Some(best) = self.datasets.best_match(content) {
            return best;
        }

        if CURATION_HINTS.iter().any(|hint| content.contains(hint)) { 0.5 } else { 0.3 }
    }
}

/// Depth of dataset documentation in the (lower-cased) README.
fn documentation_score(content: &str) -> f64 {
    let found_terms = DOCUMENTATION_TERMS.iter().filter(|term| content.contains(*term)).count();
    let mut score = (found_terms as f64 * 0.1).min(0.6);

    if SIZE_STATS_REGEX.is_match(content) {
        score += 0.2;
    }

    if COMPOSITION_TERMS.iter().any(|term| content.contains(term)) {
        score += 0.2;
    }

    clamp01(score)
}

/// Preprocessing vocabulary in the (lower-cased) README.
fn preprocessing_score(content: &str) -> f64 {
    let found_terms = PREPROCESSING_TERMS.iter().filter(|term| content.contains(*term)).count();
    let mut score = (found_terms as f64 * 0.15).min(0.8);

    if PREPROCESSING_TOOLS.iter().any(|tool| content.contains(tool)) {
        score += 0.2;
    }

    clamp01(score).max(UNINFORMED_COMPONENT)
}
