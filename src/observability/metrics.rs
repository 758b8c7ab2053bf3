use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::info;

// Declare the static OnceCell to hold the Metrics.
static METRICS_INSTANCE: OnceCell<Arc<Metrics>> = OnceCell::const_new();

/// Asynchronously initializes and gets a reference to the process metrics.
pub async fn get_metrics() -> &'static Arc<Metrics> {
    METRICS_INSTANCE
        .get_or_init(|| async {
            info!("Initializing Metrics ...");
            Metrics::new()
        })
        .await
}

/// Text exposition of every registered metric.
pub async fn render_metrics() -> String {
    let metrics = get_metrics().await;
    let mut buffer = Vec::new();
    if let Err(err) = TextEncoder::new().encode(&metrics.registry.gather(), &mut buffer) {
        return format!("# failed to encode metrics: {err}\n");
    }
    String::from_utf8_lossy(&buffer).into_owned()
}

#[derive(Clone)]
pub struct Metrics {
    pub registry: Registry,

    // Token metrics
    pub token_fetch_requests: IntCounterVec,
    pub token_fetch_failures: IntCounterVec,
    pub token_fetch_suppressed: IntCounterVec,
    pub token_fetch_duration: HistogramVec,

    // Speech metrics
    pub speech_requests: IntCounterVec,
    pub speech_failures: IntCounterVec,
}

impl Metrics {
    fn new() -> Arc<Self> {
        let registry = Registry::new_custom(Some("yaspeech".into()), None).unwrap();

        let metrics: Arc<Metrics> = Arc::new(Self {
            // Token
            token_fetch_requests: IntCounterVec::new(Opts::new("token_fetch_requests_total", "Token fetch attempts by source"), &["source"]).unwrap(),
            token_fetch_failures: IntCounterVec::new(Opts::new("token_fetch_failures_total", "Failed token fetches by source"), &["source"]).unwrap(),
            token_fetch_suppressed: IntCounterVec::new(Opts::new("token_fetch_suppressed_total", "Failed token fetches hidden by a still usable token"), &["source"]).unwrap(),
            token_fetch_duration: HistogramVec::new(HistogramOpts::new("token_fetch_duration_seconds", "Token fetch duration seconds").buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]), &["source"]).unwrap(),

            // Speech
            speech_requests: IntCounterVec::new(Opts::new("speech_requests_total", "Speech requests by kind"), &["kind"]).unwrap(),
            speech_failures: IntCounterVec::new(Opts::new("speech_failures_total", "Failed speech requests by kind"), &["kind"]).unwrap(),

            registry,
        });

        // Register all metrics in the registry
        let reg = &metrics.registry;
        reg.register(Box::new(metrics.token_fetch_requests.clone())).unwrap();
        reg.register(Box::new(metrics.token_fetch_failures.clone())).unwrap();
        reg.register(Box::new(metrics.token_fetch_suppressed.clone())).unwrap();
        reg.register(Box::new(metrics.token_fetch_duration.clone())).unwrap();
        reg.register(Box::new(metrics.speech_requests.clone())).unwrap();
        reg.register(Box::new(metrics.speech_failures.clone())).unwrap();

        metrics
    }
}
