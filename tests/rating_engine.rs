//! Integration tests for the rating engine against a mock metadata hub.

use artifact_rank::cache::RatingCache;
use artifact_rank::rating::ARTIFACT_CATEGORY;
use artifact_rank::{ArtifactDescriptor, MemoryCache, MetadataClient, Rating, RatingEngine};
use chrono::{Duration, Utc};
use ohno::app_err;
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ARTIFACT: &str = "org/test-model";

async fn start_healthy_hub() -> MockServer {
    let server = MockServer::start().await;

    let readme = "# Test Model\n\n\
        ## How to use\n\n\
        ```python\nfrom transformers import AutoModel\n```\n\n\
        pip install -r requirements.txt\n\n\
        ## Training data\n\n\
        Trained on wikipedia, a large corpus with 5M tokens after \
        tokenization, cleaning and deduplication.\n\n\
        ## Evaluation\n\n\
        Benchmark accuracy: 92.5% on glue.\n\n\
        ## License\n\nApache-2.0\n";

    Mock::given(method("GET"))
        .and(path(format!("/{ARTIFACT}/raw/main/README.md")))
        .respond_with(ResponseTemplate::new(200).set_body_string(readme))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/api/models/{ARTIFACT}/tree/main")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"path": "README.md", "size": 2_048},
            {"path": "config.json", "size": 512},
            {"path": "requirements.txt", "size": 128},
            {"path": "train.py", "size": 4_096},
            {"path": "inference.py", "size": 2_048},
            {"path": "utils.py", "size": 1_024},
            {"path": "model.safetensors", "size": 500_000_000u64},
        ])))
        .mount(&server)
        .await;

    let documented_source = "\"\"\"Training entry point.\"\"\"\n\n\
        def train(args):\n    \"\"\"Args:\n        args: parsed options\n    Returns: metrics\"\"\"\n    return {}\n";

    for file in ["train.py", "inference.py", "utils.py"] {
        Mock::given(method("GET"))
            .and(path(format!("/{ARTIFACT}/raw/main/{file}")))
            .respond_with(ResponseTemplate::new(200).set_body_string(documented_source))
            .mount(&server)
            .await;
    }

    server
}

fn rich_descriptor(hub_url: &str) -> ArtifactDescriptor {
    let record = json!({
        "license": "apache-2.0",
        "tags": ["text-classification", "benchmark", "en"],
        "likes": 2_500,
        "downloads": 400_000,
        "lastModified": (Utc::now() - Duration::days(10)).to_rfc3339(),
        "pipeline_tag": "text-classification",
        "library_name": "transformers",
        "model-index": [{
            "results": [{"metrics": [{"type": "accuracy"}, {"type": "f1"}]}],
            "datasets": ["glue"],
        }],
    });

    ArtifactDescriptor::from_record(ARTIFACT, &format!("{hub_url}/{ARTIFACT}"), &record)
}

fn engine_against(server_url: &str) -> (Arc<MetadataClient>, Arc<MemoryCache>, RatingEngine) {
    let client = Arc::new(MetadataClient::new(Some(server_url)).unwrap());
    let cache = Arc::new(MemoryCache::new());
    let engine = RatingEngine::new(client.clone(), cache.clone());
    (client, cache, engine)
}

#[tokio::test]
async fn healthy_hub_produces_a_well_formed_rating() {
    let server = start_healthy_hub().await;
    let (_, _, engine) = engine_against(&server.uri());

    let rating = engine.rate(&rich_descriptor(&server.uri())).await.unwrap();

    assert_eq!(rating.name, ARTIFACT);
    assert_eq!(rating.category, ARTIFACT_CATEGORY);
    assert!(rating.is_normalized());
    assert!(rating.net_score > 0.0 && rating.net_score < 1.0);

    // A declared apache-2.0 license maps straight through the table.
    assert!((rating.license - 0.9).abs() < 1e-9);

    // Recently updated, popular, and well documented.
    assert!(rating.bus_factor > 0.7, "bus factor {}", rating.bus_factor);
    assert!(rating.ramp_up_time > 0.5, "ramp up {}", rating.ramp_up_time);
    assert!(rating.dataset_and_code_score > 0.5, "dataset and code {}", rating.dataset_and_code_score);

    // Half a GB fits every hardware class.
    assert!((rating.size_score.worst_case() - 1.0).abs() < 1e-9);
}

#[tokio::test]
async fn unreachable_hub_degrades_instead_of_failing() {
    // Nothing is mounted, so every fetch comes back 404.
    let server = MockServer::start().await;
    let (_, _, engine) = engine_against(&server.uri());

    let artifact = ArtifactDescriptor::new("org/unknown-model", "url");
    let rating = engine.rate(&artifact).await.unwrap();

    assert_eq!(rating.name, "org/unknown-model");
    assert!(rating.is_normalized());
    assert!(rating.net_score > 0.0);
}

#[tokio::test]
async fn ratings_are_deterministic_for_identical_inputs() {
    let server = MockServer::start().await;
    let artifact = ArtifactDescriptor::new("org/unknown-model", "url");

    // Two independent engines with separate caches must agree.
    let (_, _, first_engine) = engine_against(&server.uri());
    let (_, _, second_engine) = engine_against(&server.uri());

    let first = first_engine.rate(&artifact).await.unwrap();
    let second = second_engine.rate(&artifact).await.unwrap();

    assert_eq!(strip_latencies(first), strip_latencies(second));
}

#[tokio::test]
async fn cache_hit_performs_no_outbound_fetches() {
    let server = start_healthy_hub().await;
    let (client, cache, engine) = engine_against(&server.uri());
    let descriptor = rich_descriptor(&server.uri());

    let first = engine.rate(&descriptor).await.unwrap();
    let requests_after_first = client.request_count();
    assert!(requests_after_first > 0);

    let second = engine.rate(&descriptor).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(client.request_count(), requests_after_first);
    assert_eq!(cache.len().unwrap(), 1);
}

#[tokio::test]
async fn concurrent_callers_share_one_computation() {
    let server = MockServer::start().await;

    // Slow the hub down so the callers genuinely overlap.
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(404).set_delay(core::time::Duration::from_millis(100)),
        )
        .mount(&server)
        .await;

    let (client, cache, engine) = engine_against(&server.uri());
    let engine = Arc::new(engine);

    let mut handles = Vec::new();
    for _ in 0..8 {
        let engine = engine.clone();
        handles.push(tokio::spawn(async move {
            engine.rate(&ArtifactDescriptor::new("org/contended", "url")).await
        }));
    }

    let mut ratings = Vec::new();
    for handle in handles {
        ratings.push(handle.await.unwrap().unwrap());
    }

    assert_eq!(cache.len().unwrap(), 1);
    for rating in &ratings[1..] {
        assert_eq!(rating, &ratings[0]);
    }

    // One computation's worth of requests, not eight.
    let per_computation = client.request_count();
    assert!(per_computation <= 16, "saw {per_computation} requests");
}

#[tokio::test]
async fn enormous_tree_listings_degrade_the_size_score() {
    let server = MockServer::start().await;

    // Two listed sizes whose sum exceeds u64::MAX; the rating must still
    // complete with the size floor instead of panicking.
    Mock::given(method("GET"))
        .and(path(format!("/api/models/{ARTIFACT}/tree/main")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"path": "a.safetensors", "size": 18_000_000_000_000_000_000u64},
            {"path": "b.safetensors", "size": 18_000_000_000_000_000_000u64},
        ])))
        .mount(&server)
        .await;

    let (_, _, engine) = engine_against(&server.uri());
    let rating = engine.rate(&ArtifactDescriptor::new(ARTIFACT, "url")).await.unwrap();

    assert!(rating.is_normalized());
    assert!((rating.size_score.worst_case() - 0.3).abs() < f64::EPSILON);
    assert!((rating.size_score.aws_server - 0.3).abs() < f64::EPSILON);
}

#[tokio::test]
async fn expired_scorer_deadline_substitutes_fallbacks() {
    let server = MockServer::start().await;

    // Every request takes far longer than the deadline below.
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(core::time::Duration::from_millis(500)))
        .mount(&server)
        .await;

    let client = Arc::new(MetadataClient::new(Some(&server.uri())).unwrap());
    let engine =
        RatingEngine::new(client, Arc::new(MemoryCache::new())).with_scorer_deadline(core::time::Duration::from_millis(50));

    let rating = engine.rate(&ArtifactDescriptor::new("org/slow", "url")).await.unwrap();

    // Fetch-backed metrics hit the deadline and report their fallbacks.
    assert!((rating.license - 0.5).abs() < f64::EPSILON);
    assert!((rating.size_score.worst_case() - 0.7).abs() < f64::EPSILON);
    assert!((rating.dataset_quality - 0.6).abs() < f64::EPSILON);
    assert!(rating.is_normalized());
}

#[derive(Debug)]
struct FailingCache;

impl RatingCache for FailingCache {
    fn get(&self, _artifact_id: &str) -> artifact_rank::Result<Option<Rating>> {
        Err(app_err!("cache backend unavailable"))
    }

    fn put(&self, _artifact_id: &str, _rating: &Rating) -> artifact_rank::Result<()> {
        Err(app_err!("cache backend unavailable"))
    }
}

#[tokio::test]
async fn cache_failure_surfaces_to_the_caller() {
    let server = MockServer::start().await;
    let client = Arc::new(MetadataClient::new(Some(&server.uri())).unwrap());
    let engine = RatingEngine::new(client, Arc::new(FailingCache));

    let result = engine.rate(&ArtifactDescriptor::new("org/model", "url")).await;
    assert!(result.is_err());
}

/// Zero out latency fields so ratings can be compared across runs.
fn strip_latencies(mut rating: Rating) -> Rating {
    rating.net_score_latency = 0;
    rating.ramp_up_time_latency = 0;
    rating.bus_factor_latency = 0;
    rating.performance_claims_latency = 0;
    rating.license_latency = 0;
    rating.dataset_and_code_score_latency = 0;
    rating.dataset_quality_latency = 0;
    rating.code_quality_latency = 0;
    rating.size_score_latency = 0;
    rating
}
