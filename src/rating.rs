//! The assembled rating record and its wire shape.
//!
//! Field names on [`Rating`] and [`SizeScore`] are part of the output
//! contract consumed by the routing layer and must serialize exactly as
//! written here. All score fields are floats in [0,1]; all `*_latency`
//! fields are non-negative integer milliseconds.

use serde::{Deserialize, Serialize};

/// The category reported for every rating produced by this engine.
pub const ARTIFACT_CATEGORY: &str = "MODEL";

/// The outcome of a single scorer invocation: the score plus how long the
/// scorer took, in wall-clock milliseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricResult {
    pub value: f64,
    pub latency_ms: u64,
}

/// Per-hardware-class deployability scores.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeScore {
    pub raspberry_pi: f64,
    pub jetson_nano: f64,
    pub desktop_pc: f64,
    pub aws_server: f64,
}

impl SizeScore {
    /// A size score with the same value for every hardware class.
    #[must_use]
    pub const fn uniform(value: f64) -> Self {
        Self {
            raspberry_pi: value,
            jetson_nano: value,
            desktop_pc: value,
            aws_server: value,
        }
    }

    /// The worst-case (minimum) sub-score across all hardware classes.
    #[must_use]
    pub fn worst_case(&self) -> f64 {
        self.raspberry_pi
            .min(self.jetson_nano)
            .min(self.desktop_pc)
            .min(self.aws_server)
    }

    /// Whether every sub-score lies in [0,1].
    #[must_use]
    pub fn is_normalized(&self) -> bool {
        [self.raspberry_pi, self.jetson_nano, self.desktop_pc, self.aws_server]
            .iter()
            .all(|v| (0.0..=1.0).contains(v))
    }
}

/// A complete rating for one artifact.
///
/// Created once by the engine, persisted verbatim by the rating cache, and
/// never partially written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub name: String,
    pub category: String,
    pub net_score: f64,
    pub net_score_latency: u64,
    pub ramp_up_time: f64,
    pub ramp_up_time_latency: u64,
    pub bus_factor: f64,
    pub bus_factor_latency: u64,
    pub performance_claims: f64,
    pub performance_claims_latency: u64,
    pub license: f64,
    pub license_latency: u64,
    pub dataset_and_code_score: f64,
    pub dataset_and_code_score_latency: u64,
    pub dataset_quality: f64,
    pub dataset_quality_latency: u64,
    pub code_quality: f64,
    pub code_quality_latency: u64,
    pub size_score: SizeScore,
    pub size_score_latency: u64,
}

impl Rating {
    /// Whether every score field lies in [0,1].
    #[must_use]
    pub fn is_normalized(&self) -> bool {
        [
            self.net_score,
            self.ramp_up_time,
            self.bus_factor,
            self.performance_claims,
            self.license,
            self.dataset_and_code_score,
            self.dataset_quality,
            self.code_quality,
        ]
        .iter()
        .all(|v| (0.0..=1.0).contains(v))
            && self.size_score.is_normalized()
    }
}
