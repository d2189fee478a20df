//! The eight independent metric scorers.
//!
//! Every scorer consumes an [`ArtifactDescriptor`](crate::ArtifactDescriptor)
//! and produces a score in [0,1]. Scorers never propagate errors: a failed
//! metadata fetch, a malformed payload, or a descriptor with missing fields
//! degrades the computation to a documented fallback value, logged locally.
//! Each scorer holds a shared [`MetadataClient`](crate::MetadataClient) and
//! its heuristic tables, both injected at construction.

mod bus_factor;
mod code_quality;
mod dataset_and_code;
mod dataset_quality;
mod license;
mod performance_claims;
mod ramp_up;
mod size;
pub mod tables;

pub use bus_factor::BusFactorScorer;
pub use code_quality::CodeQualityScorer;
pub use dataset_and_code::DatasetAndCodeScorer;
pub use dataset_quality::DatasetQualityScorer;
pub use license::LicenseScorer;
pub use performance_claims::PerformanceClaimsScorer;
pub use ramp_up::RampUpScorer;
pub use size::SizeScorer;

/// Model families with well-established documentation and maintenance.
/// Names containing one of these get a higher base score in several scorers.
pub(crate) const WELL_KNOWN_FAMILIES: &[&str] = &[
    "bert", "gpt", "whisper", "t5", "roberta", "vit", "clip", "resnet", "swin", "llama", "mistral", "falcon",
];

pub(crate) fn is_well_known_family(name: &str) -> bool {
    let name = name.to_lowercase();
    WELL_KNOWN_FAMILIES.iter().any(|family| name.contains(family))
}

pub(crate) fn clamp01(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn family_matching_is_case_insensitive_substring() {
        assert!(is_well_known_family("org/BERT-base"));
        assert!(is_well_known_family("meta-llama/Llama-2-7b"));
        assert!(!is_well_known_family("org/my-custom-model"));
        assert!(!is_well_known_family(""));
    }

    #[test]
    fn clamp_keeps_scores_in_unit_interval() {
        assert!((clamp01(1.7) - 1.0).abs() < f64::EPSILON);
        assert!(clamp01(-0.3).abs() < f64::EPSILON);
        assert!((clamp01(0.42) - 0.42).abs() < f64::EPSILON);
    }
}
