use std::sync::atomic::{AtomicU64, Ordering};
use tracing::info;

/// Workflow API usage counters
#[derive(Debug, Default)]
pub struct ApiMetrics {
    pub total_requests: AtomicU64,
    pub errors: AtomicU64,
    pub rate_limit_waits: AtomicU64,
    pub stale_responses: AtomicU64,
    pub deletes: AtomicU64,
}

impl ApiMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_request(&self) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rate_limit_wait(&self) {
        self.rate_limit_waits.fetch_add(1, Ordering::Relaxed);
    }

    /// A list response arrived after a newer fetch had been started.
    pub fn record_stale_response(&self) {
        self.stale_responses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_delete(&self) {
        self.deletes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get_stats(&self) -> ApiStats {
        ApiStats {
            total_requests: self.total_requests.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
            rate_limit_waits: self.rate_limit_waits.load(Ordering::Relaxed),
            stale_responses: self.stale_responses.load(Ordering::Relaxed),
            deletes: self.deletes.load(Ordering::Relaxed),
        }
    }

    pub fn log_stats(&self) {
        let stats = self.get_stats();
        info!(
            requests = stats.total_requests,
            errors = stats.errors,
            rate_limit_waits = stats.rate_limit_waits,
            stale_responses = stats.stale_responses,
            deletes = stats.deletes,
            "Workflow API metrics"
        );
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiStats {
    pub total_requests: u64,
    pub errors: u64,
    pub rate_limit_waits: u64,
    pub stale_responses: u64,
    pub deletes: u64,
}

/// Global metrics instance
static API_METRICS: std::sync::LazyLock<ApiMetrics> = std::sync::LazyLock::new(ApiMetrics::new);

pub fn api_metrics() -> &'static ApiMetrics {
    &API_METRICS
}
