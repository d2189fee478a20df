//! Core library for artifact-rank
//!
//! This library assigns a composite trust/quality score to an ML artifact by
//! combining eight independently computed sub-scores derived from sparse
//! external metadata (README text, file listings, structured model-index
//! records, popularity counters).
//!
//! # Module Organization
//!
//! - [`artifact`]: Normalized descriptor for the artifact being rated
//! - [`fetch`]: Outbound metadata fetching with explicit degradation
//! - [`scorers`]: The eight independent metric scorers
//! - [`engine`]: Fan-out orchestration, timing, and net score assembly
//! - [`cache`]: At-most-once rating cache contract
//! - [`rating`]: The assembled rating record and its wire shape

pub type Result<T, E = ohno::AppError> = core::result::Result<T, E>;

pub mod artifact;
pub mod cache;
pub mod engine;
pub mod fetch;
pub mod rating;
pub mod scorers;

pub use crate::artifact::ArtifactDescriptor;
pub use crate::cache::{MemoryCache, RatingCache};
pub use crate::engine::RatingEngine;
pub use crate::fetch::{FetchResult, MetadataClient};
pub use crate::rating::{MetricResult, Rating, SizeScore};
