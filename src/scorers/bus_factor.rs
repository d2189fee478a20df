//! Bus factor scorer: how safe the artifact is from maintainer loss.
//!
//! Purely descriptor-driven (no fetches): recency of the last update,
//! reputation of the publishing organization, and community engagement
//! around a family-aware base score.

use super::tables::OrgTable;
use super::{clamp01, is_well_known_family};
use crate::artifact::ArtifactDescriptor;
use chrono::{DateTime, Utc};

const RECENCY_WEIGHT: f64 = 0.4;
const ORG_WEIGHT: f64 = 0.3;
const COMMUNITY_WEIGHT: f64 = 0.3;

/// Recency sub-score when the descriptor carries no timestamp.
const UNKNOWN_RECENCY: f64 = 0.5;

/// Organization sub-score when the artifact name has no namespace prefix.
const UNNAMESPACED_ORG: f64 = 0.5;

#[derive(Debug)]
pub struct BusFactorScorer {
    orgs: OrgTable,
}

impl BusFactorScorer {
    pub const FALLBACK: f64 = 0.5;

    #[must_use]
    pub fn new(orgs: OrgTable) -> Self {
        Self { orgs }
    }

    pub async fn score(&self, artifact: &ArtifactDescriptor) -> f64 {
        if artifact.name().is_empty() {
            return Self::FALLBACK;
        }

        let base = if is_well_known_family(artifact.name()) { 0.6 } else { 0.4 };

        let recency = artifact
            .last_modified()
            .map_or(UNKNOWN_RECENCY, |last_modified| recency_score(last_modified, Utc::now()));

        let org = artifact
            .namespace()
            .map_or(UNNAMESPACED_ORG, |namespace| self.orgs.score_for(namespace));

        clamp01(
            base + recency * RECENCY_WEIGHT
                + org * ORG_WEIGHT
                + community_score(artifact.likes(), artifact.downloads()) * COMMUNITY_WEIGHT,
        )
    }
}

/// Day-bucket recency thresholds: more recent updates mean an active
/// maintainer.
fn recency_score(last_modified: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let days_old = now.signed_duration_since(last_modified).num_days();

    if days_old <= 30 {
        1.0
    } else if days_old <= 90 {
        0.8
    } else if days_old <= 180 {
        0.6
    } else if days_old <= 365 {
        0.4
    } else {
        0.2
    }
}

/// Saturating engagement thresholds over likes and downloads.
fn community_score(likes: u64, downloads: u64) -> f64 {
    if likes > 1_000 || downloads > 100_000 {
        1.0
    } else if likes > 100 || downloads > 10_000 {
        0.8
    } else if likes > 10 || downloads > 1_000 {
        0.6
    } else {
        0.4
    }
}
