//! Ramp-up scorer: how quickly a newcomer can get the artifact working.
//!
//! Weighted sum of README section presence, example files in the tree,
//! structured-record completeness, and a popularity sub-score built from
//! saturating square-root curves over downloads and likes.

use super::{clamp01, is_well_known_family};
use crate::artifact::ArtifactDescriptor;
use crate::fetch::{FetchResult, MetadataClient, TreeEntry};
use std::sync::Arc;

const LOG_TARGET: &str = "     ramp_up";

const README_WEIGHT: f64 = 0.4;
const EXAMPLES_WEIGHT: f64 = 0.3;
const RECORD_WEIGHT: f64 = 0.2;
const POPULARITY_WEIGHT: f64 = 0.1;

/// Sub-score assumed when a fetch-backed component cannot be computed.
const UNINFORMED_COMPONENT: f64 = 0.4;

#[derive(Debug)]
pub struct RampUpScorer {
    client: Arc<MetadataClient>,
}

impl RampUpScorer {
    pub const FALLBACK: f64 = 0.5;

    #[must_use]
    pub fn new(client: Arc<MetadataClient>) -> Self {
        Self { client }
    }

    pub async fn score(&self, artifact: &ArtifactDescriptor) -> f64 {
        if artifact.name().is_empty() {
            return Self::FALLBACK;
        }

        let base = if is_well_known_family(artifact.name()) { 0.7 } else { 0.4 };

        let readme = match self.client.readme(artifact.name()).await {
            FetchResult::Found(content) => readme_score(&content),
            FetchResult::Unavailable => {
                log::debug!(target: LOG_TARGET, "README unavailable for '{}'", artifact.name());
                UNINFORMED_COMPONENT
            }
        };

        let examples = match self.client.file_tree(artifact.name()).await {
            FetchResult::Found(entries) => examples_score(&entries),
            FetchResult::Unavailable => UNINFORMED_COMPONENT,
        };

        clamp01(
            base + readme * README_WEIGHT
                + examples * EXAMPLES_WEIGHT
                + record_completeness_score(artifact) * RECORD_WEIGHT
                + popularity_score(artifact.downloads(), artifact.likes()) * POPULARITY_WEIGHT,
        )
    }
}

/// Presence of the README sections a newcomer needs.
fn readme_score(content: &str) -> f64 {
    let content = content.to_lowercase();
    let mut score = 0.0;

    if content.contains("usage") || content.contains("how to use") {
        score += 0.3;
    }
    if content.contains("example") || content.contains("code") {
        score += 0.2;
    }
    if content.contains("install") {
        score += 0.2;
    }
    if content.contains("license") {
        score += 0.1;
    }
    if content.contains("dataset") || content.contains("training") {
        score += 0.1;
    }
    if content.len() > 500 {
        score += 0.1;
    }

    clamp01(score)
}

/// Evidence of runnable examples in the file tree. Explicitly named
/// example/demo files count fully; other script and notebook files count
/// half.
fn examples_score(entries: &[TreeEntry]) -> f64 {
    let mut example_files = 0.0;

    for entry in entries {
        let path = entry.path.to_lowercase();
        if ["example", "demo", "sample", "test"].iter().any(|word| path.contains(word)) {
            example_files += 1.0;
        } else if [".py", ".ipynb", ".md"].iter().any(|ext| path.ends_with(ext)) && !path.contains("readme") {
            example_files += 0.5;
        }
    }

    clamp01(example_files * 0.3)
}

/// Completeness of the structured record: a filled-in record means the
/// publisher documented the artifact properly.
fn record_completeness_score(artifact: &ArtifactDescriptor) -> f64 {
    let mut score = 0.0;

    if artifact.pipeline_tag().is_some() {
        score += 0.2;
    }
    if artifact.library_name().is_some() {
        score += 0.2;
    }
    if !artifact.tags().is_empty() {
        score += 0.2;
    }
    if artifact.model_index().is_some_and(|index| !index.is_empty()) {
        score += 0.4;
    }

    clamp01(score)
}

/// Average of two saturating square-root curves: downloads saturate at
/// 10,000 and likes at 100.
fn popularity_score(downloads: u64, likes: u64) -> f64 {
    let download_score = if downloads > 0 {
        clamp01((downloads as f64 / 10_000.0).sqrt())
    } else {
        0.0
    };
    let likes_score = if likes > 0 { clamp01((likes as f64 / 100.0).sqrt()) } else { 0.0 };

    (download_score + likes_score) / 2.0
}
