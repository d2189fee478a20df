//! Dataset-and-code availability scorer.
//!
//! Weighs dataset evidence (structured-index dataset entries, dataset
//! vocabulary in the README, dataset-registry cross-references, sample-count
//! patterns) at 0.6 against code evidence (code and example files in the
//! tree, fenced code blocks and import statements in the README) at 0.4.

use super::clamp01;
use crate::artifact::ArtifactDescriptor;
use crate::fetch::{FetchResult, MetadataClient, TreeEntry};
use regex::Regex;
use serde_json::Value;
use std::sync::{Arc, LazyLock};

const LOG_TARGET: &str = "   data_code";

const DATASET_WEIGHT: f64 = 0.6;
const CODE_WEIGHT: f64 = 0.4;

const DATASET_TERMS: &[&str] = &[
    "dataset",
    "training data",
    "trained on",
    "data source",
    "corpus",
    "collection",
    "benchmark",
];

/// Link prefix of the dataset registry cross-reference.
const DATASET_REGISTRY_PREFIX: &str = "huggingface.co/datasets/";

static SAMPLE_COUNT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\d+[kmb]?\s*(samples|examples|tokens|words|sentences)").expect("invalid regex"));

#[derive(Debug)]
pub struct DatasetAndCodeScorer {
    client: Arc<MetadataClient>,
}

impl DatasetAndCodeScorer {
    pub const FALLBACK: f64 = 0.5;

    #[must_use]
    pub fn new(client: Arc<MetadataClient>) -> Self {
        Self { client }
    }

    pub async fn score(&self, artifact: &ArtifactDescriptor) -> f64 {
        if artifact.name().is_empty() {
            return Self::FALLBACK;
        }

        let readme = match self.client.readme(artifact.name()).await {
            FetchResult::Found(content) => Some(content),
            FetchResult::Unavailable => {
                log::debug!(target: LOG_TARGET, "README unavailable for '{}'", artifact.name());
                None
            }
        };
        let tree = self.client.file_tree(artifact.name()).await.found();

        let dataset = dataset_score(artifact.model_index(), readme.as_deref());
        let code = code_score(tree.as_deref(), readme.as_deref());

        clamp01(dataset * DATASET_WEIGHT + code * CODE_WEIGHT)
    }
}

/// Dataset evidence from the structured index and the README.
fn dataset_score(index: Option<&Vec<Value>>, readme: Option<&str>) -> f64 {
    let mut score = 0.0;

    if let Some(entries) = index {
        if entries
            .iter()
            .any(|entry| entry.get("datasets").and_then(Value::as_array).is_some_and(|d| !d.is_empty()))
        {
            score += 0.5;
        }
    }

    if let Some(content) = readme {
        let content = content.to_lowercase();

        let found_terms = DATASET_TERMS.iter().filter(|term| content.contains(*term)).count();
        if found_terms >= 3 {
            score += 0.4;
        } else if found_terms >= 1 {
            score += 0.2;
        }

        if content.contains(DATASET_REGISTRY_PREFIX) {
            score += 0.3;
        }

        if SAMPLE_COUNT_REGEX.is_match(&content) {
            score += 0.2;
        }
    }

    clamp01(score)
}

/// Code evidence from the file tree and the README.
fn code_score(tree: Option<&[TreeEntry]>, readme: Option<&str>) -> f64 {
    let mut score = 0.0;

    if let Some(entries) = tree {
        let mut code_files = 0_u32;
        let mut example_files = 0_u32;

        for entry in entries {
            let path = entry.path.to_lowercase();

            if path.ends_with(".py") {
                code_files += 1;
                if ["train", "inference", "run", "example", "demo"].iter().any(|word| path.contains(word)) {
                    example_files += 1;
                }
            } else if path.ends_with(".ipynb") {
                example_files += 1;
            } else if ["training_args.json", "run.sh", "train.sh"].contains(&path.as_str()) {
                code_files += 1;
            }
        }

        if code_files > 0 {
            score += 0.3;
        }
        if example_files > 0 {
            score += 0.4;
        }
        if code_files >= 3 {
            score += 0.2;
        }
    }

    if let Some(content) = readme {
        let code_fences = content.matches("```").count();
        if code_fences >= 2 {
            score += 0.3;
        } else if code_fences >= 1 {
            score += 0.2;
        }

        if content.contains("from transformers import") || content.contains("import torch") {
            score += 0.2;
        }
    }

    clamp01(score)
}
