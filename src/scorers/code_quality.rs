//! Code quality scorer.
//!
//! Looks at how the artifact's repository is put together: presence of
//! standard project files and organized sources, doc comments in a bounded
//! sample of source files, and best-practice mentions (linting, typing,
//! testing, CI) in the README.

use super::{clamp01, is_well_known_family};
use crate::artifact::ArtifactDescriptor;
use crate::fetch::{FetchResult, MetadataClient, TreeEntry};
use std::sync::Arc;

const LOG_TARGET: &str = "   code_qual";

const STRUCTURE_WEIGHT: f64 = 0.4;
const DOCUMENTATION_WEIGHT: f64 = 0.3;
const BEST_PRACTICES_WEIGHT: f64 = 0.3;

/// Sub-score assumed when a component has nothing to go on.
const UNINFORMED_COMPONENT: f64 = 0.4;

/// How many source files the documentation check samples at most.
const DOC_SAMPLE_LIMIT: usize = 3;

/// Standard project files, each worth a fixed structure bonus.
const STANDARD_FILES: &[&str] = &[
    "requirements.txt",
    "setup.py",
    "pyproject.toml",
    "config.json",
    "tokenizer.json",
    "readme.md",
];

const QUALITY_INDICATORS: &[&str] = &[
    "lint",
    "flake8",
    "black",
    "type hint",
    "mypy",
    "pytest",
    "test",
    "ci/cd",
    "github action",
    "pre-commit",
];

#[derive(Debug)]
pub struct CodeQualityScorer {
    client: Arc<MetadataClient>,
}

impl CodeQualityScorer {
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

        let tree = self.client.file_tree(artifact.name()).await.found();

        let structure = tree.as_deref().map_or(UNINFORMED_COMPONENT, structure_score);
        let documentation = match tree.as_deref() {
            Some(entries) => self.documentation_score(artifact.name(), entries).await,
            None => UNINFORMED_COMPONENT,
        };

        let best_practices = match self.client.readme(artifact.name()).await {
            FetchResult::Found(content) => best_practices_score(&content),
            FetchResult::Unavailable => {
                log::debug!(target: LOG_TARGET, "README unavailable for '{}'", artifact.name());
                0.0
            }
        };

        clamp01(base + structure * STRUCTURE_WEIGHT + documentation * DOCUMENTATION_WEIGHT + best_practices * BEST_PRACTICES_WEIGHT)
    }

    /// Sample a bounded number of source files and check each for
    /// documentation indicators.
    async fn documentation_score(&self, artifact: &str, entries: &[TreeEntry]) -> f64 {
        let source_files: Vec<&str> = entries
            .iter()
            .map(|entry| entry.path.as_str())
            .filter(|path| path.ends_with(".py"))
            .take(DOC_SAMPLE_LIMIT)
            .collect();

        if source_files.is_empty() {
            return UNINFORMED_COMPONENT;
        }

        let mut checked = 0_u32;
        let mut documented = 0_u32;

        for path in source_files {
            let FetchResult::Found(content) = self.client.raw_file(artifact, path).await else {
                continue;
            };

            checked += 1;
            if is_documented(&content) {
                documented += 1;
            }
        }

        if checked == 0 {
            return UNINFORMED_COMPONENT;
        }

        (f64::from(documented) / f64::from(checked)).max(UNINFORMED_COMPONENT)
    }
}

/// Presence of standard project files and organized sources.
fn structure_score(entries: &[TreeEntry]) -> f64 {
    let mut score = 0.0;
    let mut source_files = 0_u32;
    let mut config_files = 0_u32;

    for entry in entries {
        let path = entry.path.to_lowercase();
        let basename = path.rsplit('/').next().unwrap_or(&path);

        if STANDARD_FILES.contains(&basename) {
            score += 0.1;
        }

        if path.ends_with(".py") {
            source_files += 1;
        } else if [".json", ".yaml", ".yml", ".toml"].iter().any(|ext| path.ends_with(ext)) {
            config_files += 1;
        }
    }

    if source_files > 0 {
        score += 0.2;
    }
    if source_files >= 3 {
        score += 0.2;
    }
    if config_files > 0 {
        score += 0.1;
    }

    clamp01(score)
}

/// A sampled source file counts as documented when at least two indicator
/// classes are present.
fn is_documented(content: &str) -> bool {
    let has_docstrings = content.contains("\"\"\"") || content.contains("'''");
    let mut indicators = 0_u32;

    if has_docstrings {
        indicators += 1;
    }
    if content.matches('#').count() >= 5 {
        indicators += 1;
    }
    if content.contains("def ") && has_docstrings {
        indicators += 1;
    }
    let lowered = content.to_lowercase();
    if ["args:", "returns:", "parameters:"].iter().any(|marker| lowered.contains(marker)) {
        indicators += 1;
    }

    indicators >= 2
}

/// Best-practice mentions in the README.
fn best_practices_score(content: &str) -> f64 {
    let content = content.to_lowercase();

    let found_indicators = QUALITY_INDICATORS.iter().filter(|indicator| content.contains(*indicator)).count();
    let mut score = (found_indicators as f64 * 0.1).min(0.5);

    if content.contains("pip install") || content.contains("requirements.txt") {
        score += 0.2;
    }

    if content.contains("import") && (content.contains("transformers") || content.contains("torch")) {
        score += 0.2;
    }

    if content.contains("license") {
        score += 0.1;
    }

    clamp01(score)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree(paths: &[&str]) -> Vec<TreeEntry> {
        paths
            .iter()
            .map(|path| TreeEntry {
                path: (*path).to_string(),
                size: 1,
            })
            .collect()
    }

    #[test]
    fn structure_rewards_standard_files_and_organization() {
        let entries = tree(&["README.md", "config.json", "setup.py", "src/model.py", "src/train.py", "src/eval.py"]);
        // 3 standard files (0.3) + sources present (0.2) + >=3 sources (0.2) + config (0.1)
        let score = structure_score(&entries);
        assert!((score - 0.8).abs() < 1e-9, "got {score}");
    }

    #[test]
    fn structure_of_a_weights_only_repo_is_thin() {
        let entries = tree(&["model.safetensors", "vocab.txt"]);
        assert!(structure_score(&entries).abs() < f64::EPSILON);
    }

    #[test]
    fn documented_source_needs_two_indicator_classes() {
        let documented = "\"\"\"Module docstring.\"\"\"\n\ndef run(x):\n    \"\"\"Args:\n        x: input\n    Returns: output\"\"\"\n    return x\n";
        assert!(is_documented(documented));

        let bare = "def run(x):\n    return x\n";
        assert!(!is_documented(bare));

        let comments_only = "# a\n# b\n# c\n# d\n# e\nx = 1\n";
        assert!(!is_documented(comments_only));
    }

    #[test]
    fn best_practices_vocabulary_accumulates() {
        let readme = "We use pytest and mypy, run flake8 lint in ci/cd.\n\
                      pip install -r requirements.txt\n\
                      ```import torch```\nLicense: MIT";
        // indicator cap (0.5) + install (0.2) + import usage (0.2) + license (0.1)
        assert!((best_practices_score(readme) - 1.0).abs() < 1e-9);

        assert!(best_practices_score("nothing here").abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn unreachable_upstream_uses_uninformed_components() {
        let client = Arc::new(MetadataClient::new(Some("http://127.0.0.1:9")).unwrap());
        let scorer = CodeQualityScorer::new(client);

        let score = scorer.score(&ArtifactDescriptor::new("org/obscure", "url")).await;
        // 0.3 base + 0.4*0.4 structure + 0.4*0.3 documentation + 0.0 best practices
        assert!((score - 0.58).abs() < 1e-9, "got {score}");
    }

    #[tokio::test]
    async fn empty_descriptor_scores_fallback() {
        let client = Arc::new(MetadataClient::new(Some("http://127.0.0.1:9")).unwrap());
        let scorer = CodeQualityScorer::new(client);
        let score = scorer.score(&ArtifactDescriptor::default()).await;
        assert!((score - CodeQualityScorer::FALLBACK).abs() < f64::EPSILON);
    }
}
