//! Immutable heuristic dispatch tables.
//!
//! Each table is constructed once and handed to a scorer at construction
//! time, so tests can inject alternate tables instead of patching globals.
//! The default contents encode the fixed heuristics the engine ships with.

/// License compatibility scores keyed by identifier substring.
///
/// Matching is first-match in declaration order, so more specific
/// identifiers (e.g. `lgpl-3.0`) must precede the broader ones they contain.
#[derive(Debug, Clone)]
pub struct LicenseTable {
    entries: Vec<(String, f64)>,
}

impl LicenseTable {
    #[must_use]
    pub fn new(entries: Vec<(String, f64)>) -> Self {
        Self { entries }
    }

    /// Score for a normalized (lower-cased, trimmed) license identifier.
    #[must_use]
    pub fn score_for(&self, identifier: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(known, _)| identifier.contains(known.as_str()))
            .map(|(_, score)| *score)
    }
}

impl Default for LicenseTable {
    fn default() -> Self {
        Self::new(
            [
                ("apache-2.0", 0.9),
                ("mit", 0.9),
                ("bsd-3-clause", 1.0),
                ("bsd-2-clause", 1.0),
                ("lgpl-2.1", 1.0),
                ("lgpl-3.0", 0.8),
                ("gpl-2.0", 0.3),
                ("gpl-3.0", 0.3),
                ("cc-by-4.0", 0.7),
                ("cc-by-sa-4.0", 0.6),
                ("unknown", 0.5),
                ("other", 0.5),
            ]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect(),
        )
    }
}

/// Reputation scores for well-known publishing organizations, keyed by the
/// artifact name's namespace prefix.
#[derive(Debug, Clone)]
pub struct OrgTable {
    entries: Vec<(String, f64)>,
    unknown_score: f64,
}

impl OrgTable {
    #[must_use]
    pub fn new(entries: Vec<(String, f64)>, unknown_score: f64) -> Self {
        Self { entries, unknown_score }
    }

    /// Reputation score for a namespace. Unknown organizations get a
    /// moderate score rather than a penalty.
    #[must_use]
    pub fn score_for(&self, org: &str) -> f64 {
        let org = org.to_lowercase();
        self.entries
            .iter()
            .find(|(known, _)| org.contains(known.as_str()))
            .map_or(self.unknown_score, |(_, score)| *score)
    }
}

impl Default for OrgTable {
    fn default() -> Self {
        Self::new(
            [
                ("openai", 0.9),
                ("google", 0.9),
                ("microsoft", 0.9),
                ("meta-llama", 0.9),
                ("anthropic", 0.9),
                ("huggingface", 0.8),
                ("facebook", 0.8),
                ("mistralai", 0.8),
                ("nvidia", 0.8),
                ("stabilityai", 0.7),
            ]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect(),
            0.5,
        )
    }
}

/// Quality scores for datasets commonly cited in model documentation.
#[derive(Debug, Clone)]
pub struct KnownDatasetTable {
    entries: Vec<(String, f64)>,
}

impl KnownDatasetTable {
    #[must_use]
    pub fn new(entries: Vec<(String, f64)>) -> Self {
        Self { entries }
    }

    /// Best score among datasets mentioned in the given (lower-cased) text.
    #[must_use]
    pub fn best_match(&self, content: &str) -> Option<f64> {
        self.entries
            .iter()
            .filter(|(name, _)| content.contains(name.as_str()))
            .map(|(_, score)| *score)
            .fold(None, |best, score| Some(best.map_or(score, |b: f64| b.max(score))))
    }
}

impl Default for KnownDatasetTable {
    fn default() -> Self {
        Self::new(
            [
                ("common crawl", 0.7),
                ("c4", 0.8),
                ("pile", 0.8),
                ("openwebtext", 0.7),
                ("wikipedia", 0.9),
                ("books3", 0.6),
                ("arxiv", 0.8),
                ("pubmed", 0.8),
                ("github", 0.7),
                ("stackexchange", 0.7),
                ("refinedweb", 0.8),
                ("dolma", 0.8),
                ("redpajama", 0.7),
            ]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect(),
        )
    }
}

/// Capacity limits per hardware class, in size-units (GB).
#[derive(Debug, Clone, Copy)]
pub struct HardwareLimits {
    pub raspberry_pi: f64,
    pub jetson_nano: f64,
    pub desktop_pc: f64,
    pub aws_server: f64,
}

impl Default for HardwareLimits {
    fn default() -> Self {
        Self {
            raspberry_pi: 1.0,
            jetson_nano: 4.0,
            desktop_pc: 16.0,
            aws_server: 64.0,
        }
    }
}

/// Size estimates (in GB) inferred from parameter-count hints embedded in
/// artifact names, used when no file-size data is available.
///
/// Hints are checked in declaration order; `13b` must precede `3b` and `1b`
/// because the latter are substrings of the former.
#[derive(Debug, Clone)]
pub struct SizeHintTable {
    hints: Vec<(Vec<String>, f64)>,
    default_gb: f64,
}

impl SizeHintTable {
    #[must_use]
    pub fn new(hints: Vec<(Vec<String>, f64)>, default_gb: f64) -> Self {
        Self { hints, default_gb }
    }

    /// Estimated size for an artifact name (matched case-insensitively).
    #[must_use]
    pub fn estimate_for(&self, name: &str) -> f64 {
        let name = name.to_lowercase();
        self.hints
            .iter()
            .find(|(patterns, _)| patterns.iter().any(|p| name.contains(p.as_str())))
            .map_or(self.default_gb, |(_, gb)| *gb)
    }
}

impl Default for SizeHintTable {
    fn default() -> Self {
        let hint = |patterns: &[&str], gb: f64| (patterns.iter().map(|p| (*p).to_string()).collect(), gb);
        Self::new(
            vec![
                hint(&["7b", "7-b"], 13.0),
                hint(&["13b", "13-b"], 26.0),
                hint(&["70b", "70-b"], 140.0),
                hint(&["3b", "3-b"], 6.0),
                hint(&["1b", "1-b"], 2.0),
                hint(&["small"], 0.5),
                hint(&["large"], 5.0),
            ],
            2.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn license_table_matches_exact_identifiers() {
        let table = LicenseTable::default();
        assert_eq!(table.score_for("apache-2.0"), Some(0.9));
        assert_eq!(table.score_for("gpl-3.0"), Some(0.3));
        assert_eq!(table.score_for("bsd-3-clause"), Some(1.0));
        assert_eq!(table.score_for("cc-by-sa-4.0"), Some(0.6));
        assert_eq!(table.score_for("zlib"), None);
    }

    #[test]
    fn license_table_prefers_lgpl_over_gpl() {
        let table = LicenseTable::default();
        assert_eq!(table.score_for("lgpl-3.0"), Some(0.8));
        assert_eq!(table.score_for("lgpl-2.1"), Some(1.0));
    }

    #[test]
    fn org_table_scores_known_and_unknown_namespaces() {
        let table = OrgTable::default();
        assert!((table.score_for("OpenAI") - 0.9).abs() < f64::EPSILON);
        assert!((table.score_for("stabilityai") - 0.7).abs() < f64::EPSILON);
        assert!((table.score_for("some-random-user") - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn known_dataset_table_picks_the_best_mention() {
        let table = KnownDatasetTable::default();
        assert_eq!(table.best_match("trained on common crawl and wikipedia"), Some(0.9));
        assert_eq!(table.best_match("trained on books3"), Some(0.6));
        assert_eq!(table.best_match("trained on a private corpus"), None);
    }

    #[test]
    fn size_hints_match_in_declaration_order() {
        let table = SizeHintTable::default();
        assert!((table.estimate_for("org/llama-7b") - 13.0).abs() < f64::EPSILON);
        assert!((table.estimate_for("org/model-13b") - 26.0).abs() < f64::EPSILON);
        assert!((table.estimate_for("org/model-70B") - 140.0).abs() < f64::EPSILON);
        assert!((table.estimate_for("org/whisper-small") - 0.5).abs() < f64::EPSILON);
        assert!((table.estimate_for("org/no-hints-here") - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn custom_tables_can_be_injected() {
        let table = LicenseTable::new(vec![("wtfpl".to_string(), 0.42)]);
        assert_eq!(table.score_for("wtfpl"), Some(0.42));
        assert_eq!(table.score_for("mit"), None);
    }
}
