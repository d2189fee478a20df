//! Multi-target size scorer.
//!
//! Estimates the artifact's size in GB by summing file sizes from the tree
//! listing; when no listing is available, falls back to parameter-count
//! hints embedded in the artifact name, and finally to a flat default.
//! Each hardware class is scored by comparing the estimate against the
//! class's capacity limit through a monotonic step function, so the result
//! is deterministic given the same estimate and limits.

use super::tables::{HardwareLimits, SizeHintTable};
use crate::artifact::ArtifactDescriptor;
use crate::fetch::{FetchResult, MetadataClient, TreeEntry};
use crate::rating::SizeScore;
use std::sync::Arc;

const LOG_TARGET: &str = "        size";

const BYTES_PER_GB: f64 = (1024 * 1024 * 1024) as f64;

#[derive(Debug)]
pub struct SizeScorer {
    client: Arc<MetadataClient>,
    limits: HardwareLimits,
    hints: SizeHintTable,
}

impl SizeScorer {
    /// Score for every hardware class when the computation cannot run at
    /// all (e.g. the scorer deadline expired).
    pub const FALLBACK: SizeScore = SizeScore::uniform(0.7);

    #[must_use]
    pub fn new(client: Arc<MetadataClient>, limits: HardwareLimits, hints: SizeHintTable) -> Self {
        Self { client, limits, hints }
    }

    pub async fn score(&self, artifact: &ArtifactDescriptor) -> SizeScore {
        if artifact.name().is_empty() {
            return Self::FALLBACK;
        }

        let size_gb = self.estimate_size_gb(artifact.name()).await;
        log::debug!(target: LOG_TARGET, "estimated size of '{}' at {size_gb:.2} GB", artifact.name());

        SizeScore {
            raspberry_pi: step_score(size_gb, self.limits.raspberry_pi),
            jetson_nano: step_score(size_gb, self.limits.jetson_nano),
            desktop_pc: step_score(size_gb, self.limits.desktop_pc),
            aws_server: step_score(size_gb, self.limits.aws_server),
        }
    }

    /// Estimate artifact size, preferring real file sizes over name hints.
    async fn estimate_size_gb(&self, artifact: &str) -> f64 {
        if let FetchResult::Found(entries) = self.client.file_tree(artifact).await {
            let total_bytes = total_size_bytes(&entries);
            if total_bytes > 0 {
                return total_bytes as f64 / BYTES_PER_GB;
            }
        }

        self.hints.estimate_for(artifact)
    }
}

/// Total of the listed file sizes. The listing is untrusted input, so the
/// sum saturates rather than wrapping on absurd size values.
fn total_size_bytes(entries: &[TreeEntry]) -> u64 {
    entries.iter().fold(0, |total, entry| total.saturating_add(entry.size))
}

/// Monotonic step function comparing an estimated size against a capacity
/// limit. Never returns 0: even a hopelessly oversized artifact may be
/// sharded or quantized, so the floor is 0.3.
fn step_score(size_gb: f64, limit_gb: f64) -> f64 {
    if size_gb <= limit_gb * 0.5 {
        1.0
    } else if size_gb <= limit_gb * 0.8 {
        0.9
    } else if size_gb <= limit_gb {
        0.8
    } else if size_gb <= limit_gb * 1.5 {
        0.6
    } else if size_gb <= limit_gb * 2.0 {
        0.5
    } else if size_gb <= limit_gb * 3.0 {
        0.4
    } else {
        0.3
    }
}
