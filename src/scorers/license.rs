//! License compatibility scorer.
//!
//! Looks up a license identifier first from the structured record, then by
//! extracting a "License" section or a `license:` line from the README.
//! The normalized identifier is mapped through the injected
//! [`LicenseTable`]; identifiers missing from the table fall back to broad
//! keyword classes. No identifier at all scores 0.5: an undeclared license
//! is a risk, not a verdict.

use super::tables::LicenseTable;
use crate::artifact::ArtifactDescriptor;
use crate::fetch::{FetchResult, MetadataClient};
use regex::Regex;
use std::sync::{Arc, LazyLock};

const LOG_TARGET: &str = "     license";

static LICENSE_SECTION_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)#+\s*license\s*\n(.*?)(?:\n#|\n\n|\z)").expect("invalid regex"));
static LICENSE_LINE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)license[:\s]+([^\n]+)").expect("invalid regex"));

#[derive(Debug)]
pub struct LicenseScorer {
    client: Arc<MetadataClient>,
    table: LicenseTable,
}

impl LicenseScorer {
    /// Score when no license identifier can be determined at all.
    pub const FALLBACK: f64 = 0.5;

    #[must_use]
    pub fn new(client: Arc<MetadataClient>, table: LicenseTable) -> Self {
        Self { client, table }
    }

    pub async fn score(&self, artifact: &ArtifactDescriptor) -> f64 {
        if artifact.name().is_empty() {
            return Self::FALLBACK;
        }

        let identifier = match artifact.license() {
            Some(license) => Some(license.to_string()),
            None => self.license_from_readme(artifact.name()).await,
        };

        let Some(identifier) = identifier else {
            log::debug!(target: LOG_TARGET, "no license identifier for '{}', using fallback", artifact.name());
            return Self::FALLBACK;
        };

        self.score_identifier(&identifier)
    }

    /// Map a raw license identifier through the table, falling back to
    /// keyword classes for unrecognized identifiers.
    fn score_identifier(&self, raw: &str) -> f64 {
        let key = raw.trim().to_lowercase();

        if let Some(score) = self.table.score_for(&key) {
            return score;
        }

        // Broad keyword classes; lgpl must be checked before gpl.
        if ["apache", "mit", "bsd"].iter().any(|word| key.contains(word)) {
            0.9
        } else if ["cc", "creative"].iter().any(|word| key.contains(word)) {
            0.7
        } else if key.contains("lgpl") {
            0.9
        } else if key.contains("gpl") {
            0.3
        } else {
            Self::FALLBACK
        }
    }

    async fn license_from_readme(&self, artifact: &str) -> Option<String> {
        let FetchResult::Found(content) = self.client.readme(artifact).await else {
            log::debug!(target: LOG_TARGET, "README unavailable for '{artifact}'");
            return None;
        };

        extract_license(&content)
    }
}

/// Extract a license identifier from README text: a "License" heading's
/// body first, then any `license:` line.
fn extract_license(content: &str) -> Option<String> {
    if let Some(section) = LICENSE_SECTION_REGEX.captures(content) {
        let body = section[1].trim();
        if !body.is_empty() {
            return Some(body.to_string());
        }
    }

    LICENSE_LINE_REGEX
        .captures(content)
        .map(|line| line[1].trim().to_string())
        .filter(|identifier| !identifier.is_empty())
}
