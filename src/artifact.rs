//! Normalized facts about one artifact, as produced by the upstream
//! identification step.
//!
//! An [`ArtifactDescriptor`] is constructed once per rating request and is
//! immutable for the duration of the computation. Everything beyond the name
//! and source URL is optional; absent counters default to zero, absent tags
//! to an empty list, and an absent timestamp to `None`. The raw metadata map
//! is the upstream structured record kept opaque, with typed accessors for
//! the handful of fields the scorers understand.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default)]
pub struct ArtifactDescriptor {
    name: String,
    source_url: String,
    metadata: Map<String, Value>,
    tags: Vec<String>,
    likes: u64,
    downloads: u64,
    last_modified: Option<DateTime<Utc>>,
}

impl ArtifactDescriptor {
    /// Create a descriptor with only the required identity fields.
    #[must_use]
    pub fn new(name: impl Into<String>, source_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source_url: source_url.into(),
            ..Self::default()
        }
    }

    /// Build a descriptor from the upstream structured record.
    ///
    /// Unrecognized or malformed fields fall back to their absent-value
    /// defaults rather than failing; the record itself is retained verbatim
    /// as the raw metadata map.
    #[must_use]
    pub fn from_record(name: impl Into<String>, source_url: impl Into<String>, record: &Value) -> Self {
        let metadata = record.as_object().cloned().unwrap_or_default();

        let tags = metadata
            .get("tags")
            .and_then(Value::as_array)
            .map(|tags| tags.iter().filter_map(Value::as_str).map(str::to_string).collect())
            .unwrap_or_default();

        let likes = metadata.get("likes").and_then(Value::as_u64).unwrap_or(0);
        let downloads = metadata.get("downloads").and_then(Value::as_u64).unwrap_or(0);

        let last_modified = metadata
            .get("lastModified")
            .and_then(Value::as_str)
            .and_then(|ts| DateTime::parse_from_rfc3339(ts).ok())
            .map(|ts| ts.with_timezone(&Utc));

        Self {
            name: name.into(),
            source_url: source_url.into(),
            metadata,
            tags,
            likes,
            downloads,
            last_modified,
        }
    }

    #[must_use]
    pub fn with_metadata(mut self, metadata: Map<String, Value>) -> Self {
        self.metadata = metadata;
        self
    }

    #[must_use]
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    #[must_use]
    pub const fn with_likes(mut self, likes: u64) -> Self {
        self.likes = likes;
        self
    }

    #[must_use]
    pub const fn with_downloads(mut self, downloads: u64) -> Self {
        self.downloads = downloads;
        self
    }

    #[must_use]
    pub const fn with_last_modified(mut self, last_modified: DateTime<Utc>) -> Self {
        self.last_modified = Some(last_modified);
        self
    }

    /// Canonical identity of the artifact (e.g. `org/model-name`).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    #[must_use]
    pub const fn metadata(&self) -> &Map<String, Value> {
        &self.metadata
    }

    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    #[must_use]
    pub const fn likes(&self) -> u64 {
        self.likes
    }

    #[must_use]
    pub const fn downloads(&self) -> u64 {
        self.downloads
    }

    #[must_use]
    pub const fn last_modified(&self) -> Option<DateTime<Utc>> {
        self.last_modified
    }

    /// License identifier from the structured record, if present.
    #[must_use]
    pub fn license(&self) -> Option<&str> {
        self.metadata.get("license").and_then(Value::as_str)
    }

    /// Structured performance index entries, if present.
    ///
    /// The upstream record spells the key `model-index`; older records used
    /// `model_index`, so both are accepted.
    #[must_use]
    pub fn model_index(&self) -> Option<&Vec<Value>> {
        self.metadata
            .get("model-index")
            .or_else(|| self.metadata.get("model_index"))
            .and_then(Value::as_array)
    }

    #[must_use]
    pub fn pipeline_tag(&self) -> Option<&str> {
        self.metadata.get("pipeline_tag").and_then(Value::as_str)
    }

    #[must_use]
    pub fn library_name(&self) -> Option<&str> {
        self.metadata.get("library_name").and_then(Value::as_str)
    }

    /// Namespace prefix of the artifact name (the part before the first `/`),
    /// if the name is namespaced.
    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        let (org, rest) = self.name.split_once('/')?;
        if org.is_empty() || rest.is_empty() { None } else { Some(org) }
    }
}
