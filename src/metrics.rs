use std::time::Duration;

use catalog_blob::prelude::BlobStats;
use catalog_interceptors::prelude::{Code, GateObserver, RejectReason};
use catalog_service::observe::CallObserver;
use once_cell::sync::{Lazy, OnceCell};
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};
use tracing::{debug, error};

static GLOBAL_REGISTRY: Lazy<Registry> = Lazy::new(Registry::new);
static REGISTER_ONCE: OnceCell<()> = OnceCell::new();

static RPC_CALLS: OnceCell<IntCounterVec> = OnceCell::new();
static RPC_LATENCY: OnceCell<HistogramVec> = OnceCell::new();
static GATE_REJECTIONS: OnceCell<IntCounterVec> = OnceCell::new();
static UPLOADED_BYTES: OnceCell<IntCounter> = OnceCell::new();
static IMAGE_STORE: OnceCell<ImageStoreGauges> = OnceCell::new();
static IMAGE_STATS: OnceCell<BlobStats> = OnceCell::new();

struct ImageStoreGauges {
    stored: IntGauge,
    bytes: IntGauge,
    failed: IntGauge,
}

pub fn global_registry() -> &'static Registry {
    &GLOBAL_REGISTRY
}

/// Registers the catalog collectors. Safe to call more than once.
pub fn register_metrics() {
    REGISTER_ONCE.get_or_init(|| {
        register_call_metrics();
        register_gate_metrics();
        register_upload_metrics();
        register_image_store_metrics();
    });
}

fn register_call_metrics() {
    let calls = IntCounterVec::new(
        Opts::new("catalog_rpc_calls_total", "Finished calls by method and status"),
        &["method", "code"],
    );
    let latency = HistogramVec::new(
        HistogramOpts::new("catalog_rpc_duration_seconds", "Call latency by method").buckets(
            vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0],
        ),
        &["method"],
    );
    match (calls, latency) {
        (Ok(calls), Ok(latency)) => {
            register(Box::new(calls.clone()), "catalog_rpc_calls_total");
            register(Box::new(latency.clone()), "catalog_rpc_duration_seconds");
            let _ = RPC_CALLS.set(calls);
            let _ = RPC_LATENCY.set(latency);
        }
        (Err(err), _) | (_, Err(err)) => {
            error!(?err, "failed to build call metrics");
        }
    }
}

fn register_gate_metrics() {
    match IntCounterVec::new(
        Opts::new(
            "catalog_gate_rejections_total",
            "Calls turned away by the auth gate",
        ),
        &["method", "reason"],
    ) {
        Ok(counter) => {
            register(Box::new(counter.clone()), "catalog_gate_rejections_total");
            let _ = GATE_REJECTIONS.set(counter);
        }
        Err(err) => error!(?err, "failed to build gate metrics"),
    }
}

fn register_upload_metrics() {
    match IntCounter::new(
        "catalog_uploaded_bytes_total",
        "Image bytes accepted by UploadImage",
    ) {
        Ok(counter) => {
            register(Box::new(counter.clone()), "catalog_uploaded_bytes_total");
            let _ = UPLOADED_BYTES.set(counter);
        }
        Err(err) => error!(?err, "failed to build upload metrics"),
    }
}

fn register_image_store_metrics() {
    let gauges = (
        IntGauge::new("catalog_image_store_blobs", "Images written by the image store"),
        IntGauge::new("catalog_image_store_bytes", "Bytes written by the image store"),
        IntGauge::new(
            "catalog_image_store_failures",
            "Image writes the image store gave up on",
        ),
    );
    match gauges {
        (Ok(stored), Ok(bytes), Ok(failed)) => {
            register(Box::new(stored.clone()), "catalog_image_store_blobs");
            register(Box::new(bytes.clone()), "catalog_image_store_bytes");
            register(Box::new(failed.clone()), "catalog_image_store_failures");
            let _ = IMAGE_STORE.set(ImageStoreGauges {
                stored,
                bytes,
                failed,
            });
        }
        (Err(err), _, _) | (_, Err(err), _) | (_, _, Err(err)) => {
            error!(?err, "failed to build image store metrics");
        }
    }
}

fn register(collector: Box<dyn prometheus::core::Collector>, name: &str) {
    if let Err(err) = GLOBAL_REGISTRY.register(collector) {
        error!(?err, metric = name, "failed to register metric");
    }
}

pub fn observe_call(method: &str, code: Code, elapsed: Duration) {
    if let Some(calls) = RPC_CALLS.get() {
        calls.with_label_values(&[method, code.as_str()]).inc();
    }
    if let Some(latency) = RPC_LATENCY.get() {
        latency
            .with_label_values(&[method])
            .observe(elapsed.as_secs_f64());
    }
}

pub fn observe_rejection(method: &str, reason: RejectReason) {
    if let Some(counter) = GATE_REJECTIONS.get() {
        counter.with_label_values(&[method, reason.as_str()]).inc();
    }
}

pub fn observe_upload(bytes: u64) {
    if let Some(counter) = UPLOADED_BYTES.get() {
        counter.inc_by(bytes);
    }
}

/// Exports `stats` through the image store gauges. Only the first tracked store is exported.
pub fn track_image_stats(stats: &BlobStats) {
    register_metrics();
    if IMAGE_STATS.set(stats.clone()).is_err() {
        debug!("image store metrics already tracked");
    }
}

fn refresh_image_store() {
    if let (Some(gauges), Some(stats)) = (IMAGE_STORE.get(), IMAGE_STATS.get()) {
        let snapshot = stats.snapshot();
        gauges.stored.set(clamp(snapshot.stored));
        gauges.bytes.set(clamp(snapshot.bytes));
        gauges.failed.set(clamp(snapshot.failed));
    }
}

fn clamp(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Text exposition of everything in the global registry.
pub fn render() -> Result<String, prometheus::Error> {
    refresh_image_store();
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder.encode(&GLOBAL_REGISTRY.gather(), &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Feeds call and gate events into the global registry.
#[derive(Clone, Copy, Debug, Default)]
pub struct PrometheusObserver;

impl PrometheusObserver {
    pub fn new() -> Self {
        register_metrics();
        Self
    }
}

impl CallObserver for PrometheusObserver {
    fn call_finished(&self, method: &str, code: Code, elapsed: Duration) {
        observe_call(method, code, elapsed);
    }

    fn image_uploaded(&self, bytes: u64) {
        observe_upload(bytes);
    }
}

impl GateObserver for PrometheusObserver {
    fn rejected(&self, method: &str, reason: RejectReason) {
        observe_rejection(method, reason);
    }
}
