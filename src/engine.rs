//! Fan-out orchestration, timing, and net score assembly.
//!
//! [`RatingEngine::rate`] consults the rating cache, and on a miss runs all
//! eight scorers concurrently, times each one, folds the results into a net
//! score, and persists the assembled [`Rating`]. Concurrent requests for the
//! same artifact are collapsed so a rating is computed at most once.

use crate::Result;
use crate::artifact::ArtifactDescriptor;
use crate::cache::RatingCache;
use crate::fetch::MetadataClient;
use crate::rating::{ARTIFACT_CATEGORY, MetricResult, Rating, SizeScore};
use crate::scorers::tables::{HardwareLimits, KnownDatasetTable, LicenseTable, OrgTable, SizeHintTable};
use crate::scorers::{
    BusFactorScorer, CodeQualityScorer, DatasetAndCodeScorer, DatasetQualityScorer, LicenseScorer, PerformanceClaimsScorer,
    RampUpScorer, SizeScorer,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

const LOG_TARGET: &str = "      engine";

/// How long any single scorer may run before its fallback is used instead.
const DEFAULT_SCORER_DEADLINE: Duration = Duration::from_secs(30);

// Net score weights. License and deployability dominate, the documentation
// and code heuristics share the remainder. They sum to 1 so a weighted sum
// of normalized scores stays normalized.
const LICENSE_WEIGHT: f64 = 0.20;
const SIZE_WEIGHT: f64 = 0.20;
const RAMP_UP_WEIGHT: f64 = 0.12;
const BUS_FACTOR_WEIGHT: f64 = 0.12;
const PERFORMANCE_CLAIMS_WEIGHT: f64 = 0.12;
const DATASET_AND_CODE_WEIGHT: f64 = 0.08;
const DATASET_QUALITY_WEIGHT: f64 = 0.08;
const CODE_QUALITY_WEIGHT: f64 = 0.08;

/// Rates artifacts by fanning out to the eight scorers.
pub struct RatingEngine {
    license: LicenseScorer,
    size: SizeScorer,
    ramp_up: RampUpScorer,
    bus_factor: BusFactorScorer,
    performance_claims: PerformanceClaimsScorer,
    dataset_and_code: DatasetAndCodeScorer,
    dataset_quality: DatasetQualityScorer,
    code_quality: CodeQualityScorer,
    cache: Arc<dyn RatingCache>,
    scorer_deadline: Duration,

    // One lock per artifact currently being rated, so concurrent callers
    // for the same identity wait for the first computation instead of
    // racing their own.
    in_flight: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl RatingEngine {
    /// Create an engine with default heuristic tables and scorer deadline.
    #[must_use]
    pub fn new(client: Arc<MetadataClient>, cache: Arc<dyn RatingCache>) -> Self {
        Self {
            license: LicenseScorer::new(client.clone(), LicenseTable::default()),
            size: SizeScorer::new(client.clone(), HardwareLimits::default(), SizeHintTable::default()),
            ramp_up: RampUpScorer::new(client.clone()),
            bus_factor: BusFactorScorer::new(OrgTable::default()),
            performance_claims: PerformanceClaimsScorer::new(client.clone()),
            dataset_and_code: DatasetAndCodeScorer::new(client.clone()),
            dataset_quality: DatasetQualityScorer::new(client.clone(), KnownDatasetTable::default()),
            code_quality: CodeQualityScorer::new(client),
            cache,
            scorer_deadline: DEFAULT_SCORER_DEADLINE,
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    /// Replace the per-scorer deadline. Tests use a short one.
    #[must_use]
    pub fn with_scorer_deadline(mut self, deadline: Duration) -> Self {
        self.scorer_deadline = deadline;
        self
    }

    /// Produce the rating for an artifact, computing it at most once.
    ///
    /// Scorer failures degrade to fallback scores and never surface here.
    /// The only error returned is a rating cache failure, which the caller
    /// must see since it breaks the at-most-once guarantee.
    pub async fn rate(&self, artifact: &ArtifactDescriptor) -> Result<Rating> {
        let key = artifact.name().to_string();

        if let Some(rating) = self.cache.get(&key)? {
            log::debug!(target: LOG_TARGET, "cache hit for '{key}'");
            return Ok(rating);
        }

        let entry = {
            let mut in_flight = self.in_flight.lock().await;
            in_flight.entry(key.clone()).or_default().clone()
        };
        let _guard = entry.lock().await;

        let result = self.rate_locked(&key, artifact).await;

        // The map entry must not outlive this attempt, successful or not;
        // waiters holding the entry re-check the cache anyway.
        let _ = self.in_flight.lock().await.remove(&key);

        result
    }

    /// The uncached path, entered while holding the per-key lock.
    async fn rate_locked(&self, key: &str, artifact: &ArtifactDescriptor) -> Result<Rating> {
        // A concurrent caller may have completed while we waited.
        if let Some(rating) = self.cache.get(key)? {
            log::debug!(target: LOG_TARGET, "cache hit for '{key}' after wait");
            return Ok(rating);
        }

        let rating = self.compute(artifact).await;
        self.cache.put(key, &rating)?;

        Ok(rating)
    }

    #[cfg(test)]
    async fn in_flight_len(&self) -> usize {
        self.in_flight.lock().await.len()
    }

    /// Run all scorers concurrently and assemble the rating.
    async fn compute(&self, artifact: &ArtifactDescriptor) -> Rating {
        log::info!(target: LOG_TARGET, "rating '{}'", artifact.name());
        let started = Instant::now();

        let (license, size, ramp_up, bus_factor, performance_claims, dataset_and_code, dataset_quality, code_quality) = tokio::join!(
            self.timed(LicenseScorer::FALLBACK, self.license.score(artifact)),
            self.timed_size(self.size.score(artifact)),
            self.timed(RampUpScorer::FALLBACK, self.ramp_up.score(artifact)),
            self.timed(BusFactorScorer::FALLBACK, self.bus_factor.score(artifact)),
            self.timed(PerformanceClaimsScorer::FALLBACK, self.performance_claims.score(artifact)),
            self.timed(DatasetAndCodeScorer::FALLBACK, self.dataset_and_code.score(artifact)),
            self.timed(DatasetQualityScorer::FALLBACK, self.dataset_quality.score(artifact)),
            self.timed(CodeQualityScorer::FALLBACK, self.code_quality.score(artifact)),
        );

        let net = net_score(
            license.value,
            size.0.worst_case(),
            ramp_up.value,
            bus_factor.value,
            performance_claims.value,
            dataset_and_code.value,
            dataset_quality.value,
            code_quality.value,
        );

        Rating {
            name: artifact.name().to_string(),
            category: ARTIFACT_CATEGORY.to_string(),
            net_score: net,
            net_score_latency: elapsed_ms(started),
            ramp_up_time: ramp_up.value,
            ramp_up_time_latency: ramp_up.latency_ms,
            bus_factor: bus_factor.value,
            bus_factor_latency: bus_factor.latency_ms,
            performance_claims: performance_claims.value,
            performance_claims_latency: performance_claims.latency_ms,
            license: license.value,
            license_latency: license.latency_ms,
            dataset_and_code_score: dataset_and_code.value,
            dataset_and_code_score_latency: dataset_and_code.latency_ms,
            dataset_quality: dataset_quality.value,
            dataset_quality_latency: dataset_quality.latency_ms,
            code_quality: code_quality.value,
            code_quality_latency: code_quality.latency_ms,
            size_score: size.0,
            size_score_latency: size.1,
        }
    }

    /// Time one scalar scorer against the deadline, substituting the
    /// scorer's fallback when the deadline expires.
    async fn timed(&self, fallback: f64, future: impl Future<Output = f64>) -> MetricResult {
        let started = Instant::now();
        let value = match tokio::time::timeout(self.scorer_deadline, future).await {
            Ok(value) => value,
            Err(_) => {
                log::warn!(target: LOG_TARGET, "scorer deadline expired, using fallback");
                fallback
            }
        };

        MetricResult {
            value,
            latency_ms: elapsed_ms(started),
        }
    }

    /// Same as [`Self::timed`] for the multi-target size scorer.
    async fn timed_size(&self, future: impl Future<Output = SizeScore>) -> (SizeScore, u64) {
        let started = Instant::now();
        let value = match tokio::time::timeout(self.scorer_deadline, future).await {
            Ok(value) => value,
            Err(_) => {
                log::warn!(target: LOG_TARGET, "size scorer deadline expired, using fallback");
                SizeScorer::FALLBACK
            }
        };

        (value, elapsed_ms(started))
    }
}

impl core::fmt::Debug for RatingEngine {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RatingEngine")
            .field("scorer_deadline", &self.scorer_deadline)
            .finish_non_exhaustive()
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

/// Weighted net score over the eight sub-scores, with the size score
/// entering as its worst case across hardware classes. Clamped to [0,1].
#[expect(clippy::too_many_arguments, reason = "one argument per metric")]
fn net_score(
    license: f64,
    size_worst_case: f64,
    ramp_up: f64,
    bus_factor: f64,
    performance_claims: f64,
    dataset_and_code: f64,
    dataset_quality: f64,
    code_quality: f64,
) -> f64 {
    let weighted = license * LICENSE_WEIGHT
        + size_worst_case * SIZE_WEIGHT
        + ramp_up * RAMP_UP_WEIGHT
        + bus_factor * BUS_FACTOR_WEIGHT
        + performance_claims * PERFORMANCE_CLAIMS_WEIGHT
        + dataset_and_code * DATASET_AND_CODE_WEIGHT
        + dataset_quality * DATASET_QUALITY_WEIGHT
        + code_quality * CODE_QUALITY_WEIGHT;

    weighted.clamp(0.0, 1.0)
}
