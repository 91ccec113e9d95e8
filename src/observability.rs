// Observability Infrastructure for codescope
// Structured logging, lightweight counters and trace contexts for index operations

use anyhow::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

// Global atomic counters for metrics
static OPERATION_COUNTER: AtomicU64 = AtomicU64::new(0);
static ERROR_COUNTER: AtomicU64 = AtomicU64::new(0);
static SCAN_COUNTER: AtomicU64 = AtomicU64::new(0);
static QUERY_COUNTER: AtomicU64 = AtomicU64::new(0);

const DEFAULT_FILTER: &str = "codescope=warn,error";
const VERBOSE_FILTER: &str = "codescope=debug,info";
const QUIET_FILTER: &str = "error";

/// Initialize the logging and tracing infrastructure
/// This should be called once at application startup
pub fn init_logging() -> Result<()> {
    init_logging_with_level(false, false)
}

/// Initialize logging with configurable verbosity
///
/// `--quiet` always wins; otherwise a valid `RUST_LOG` overrides the flag-based filter.
pub fn init_logging_with_level(verbose: bool, quiet: bool) -> Result<()> {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(!quiet)
        .with_thread_ids(!quiet)
        .with_line_number(!quiet)
        .with_file(!quiet)
        .with_ansi(true);

    let installed = tracing_subscriber::registry()
        .with(select_filter(verbose, quiet))
        .with(fmt_layer)
        .try_init()
        .is_ok();

    // A second init is a no-op, which test binaries rely on
    if installed && !quiet {
        info!("codescope observability initialized");
    }
    Ok(())
}

fn select_filter(verbose: bool, quiet: bool) -> EnvFilter {
    if quiet {
        return EnvFilter::new(QUIET_FILTER);
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose { VERBOSE_FILTER } else { DEFAULT_FILTER })
    })
}

/// Operations against the index, for structured logging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Operation {
    IndexDirectory {
        root: PathBuf,
        files_indexed: usize,
        files_failed: usize,
    },
    Search {
        query: String,
        result_count: usize,
    },
    SimilarityLookup {
        path: PathBuf,
        result_count: usize,
    },
    Statistics {
        total_files: usize,
    },
    Startup {
        version: String,
    },
    Shutdown {
        reason: String,
    },
}

impl Operation {
    /// Per-kind counter bumped alongside the global operation counter
    fn kind_counter(&self) -> Option<&'static AtomicU64> {
        match self {
            Operation::IndexDirectory { .. } => Some(&SCAN_COUNTER),
            Operation::Search { .. } | Operation::SimilarityLookup { .. } => Some(&QUERY_COUNTER),
            _ => None,
        }
    }
}

/// Metric types for performance monitoring
#[derive(Debug, Clone)]
pub enum MetricType {
    Counter { name: &'static str, value: u64 },
    Gauge { name: &'static str, value: f64 },
    Timer { name: &'static str, duration: Duration },
}

/// Trace and span ids carried through one worker request
#[derive(Debug, Clone)]
pub struct OperationContext {
    pub trace_id: Uuid,
    pub span_id: Uuid,
    pub parent_span_id: Option<Uuid>,
    pub operation: String,
    pub start_time: Instant,
    pub attributes: Vec<(String, String)>,
}

impl OperationContext {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            trace_id: Uuid::new_v4(),
            span_id: Uuid::new_v4(),
            parent_span_id: None,
            operation: operation.into(),
            start_time: Instant::now(),
            attributes: Vec::new(),
        }
    }

    /// New span under the same trace; attributes are not inherited
    pub fn child(&self, operation: impl Into<String>) -> Self {
        Self {
            parent_span_id: Some(self.span_id),
            trace_id: self.trace_id,
            ..Self::new(operation)
        }
    }

    pub fn add_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attributes.push((key.into(), value.into()));
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

/// Log the outcome of `op` under `ctx` and update the counters
#[instrument(skip(ctx, op, result))]
pub fn log_operation<E: std::fmt::Display>(
    ctx: &OperationContext,
    op: &Operation,
    result: &std::result::Result<(), E>,
) {
    let elapsed_ms = ctx.elapsed().as_millis();
    let attrs = ctx
        .attributes
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join(", ");

    if let Err(e) = result {
        error!(
            trace_id = %ctx.trace_id,
            span_id = %ctx.span_id,
            operation = %ctx.operation,
            elapsed_ms,
            attributes = %attrs,
            error = %e,
            "{} failed: {:?}", ctx.operation, op
        );
        ERROR_COUNTER.fetch_add(1, Ordering::Relaxed);
    } else {
        debug!(
            trace_id = %ctx.trace_id,
            span_id = %ctx.span_id,
            parent_span_id = ?ctx.parent_span_id,
            operation = %ctx.operation,
            elapsed_ms,
            attributes = %attrs,
            "{} completed: {:?}", ctx.operation, op
        );
        OPERATION_COUNTER.fetch_add(1, Ordering::Relaxed);
    }

    if let Some(counter) = op.kind_counter() {
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

/// Record a metric
pub fn record_metric(metric: MetricType) {
    match metric {
        MetricType::Counter { name, value } => debug!(metric = name, value, "counter"),
        MetricType::Gauge { name, value } => debug!(metric = name, value, "gauge"),
        MetricType::Timer { name, duration } => {
            debug!(metric = name, elapsed_ms = duration.as_millis(), "timer")
        }
    }
}

/// Run `f` inside a fresh trace, logging its outcome and duration
pub async fn with_trace_id<F, T>(operation: &str, f: F) -> Result<T>
where
    F: std::future::Future<Output = Result<T>>,
{
    let ctx = OperationContext::new(operation);
    info!(trace_id = %ctx.trace_id, span_id = %ctx.span_id, "Starting {}", operation);

    let result = f.await;
    let elapsed = ctx.elapsed();

    match &result {
        Ok(_) => {
            info!(
                trace_id = %ctx.trace_id,
                elapsed_ms = elapsed.as_millis(),
                "{} finished", operation
            );
            record_metric(MetricType::Timer {
                name: "operation.duration",
                duration: elapsed,
            });
        }
        Err(e) => {
            error!(
                trace_id = %ctx.trace_id,
                elapsed_ms = elapsed.as_millis(),
                error = %e,
                "{} failed", operation
            );
            record_metric(MetricType::Counter {
                name: "operation.errors",
                value: 1,
            });
        }
    }

    result
}

/// Snapshot of the global counters
pub fn get_metrics() -> serde_json::Value {
    serde_json::json!({
        "operations": {
            "total": OPERATION_COUNTER.load(Ordering::Relaxed),
            "errors": ERROR_COUNTER.load(Ordering::Relaxed),
            "scans": SCAN_COUNTER.load(Ordering::Relaxed),
            "queries": QUERY_COUNTER.load(Ordering::Relaxed),
        },
        "timestamp": Utc::now().to_rfc3339(),
    })
}

/// Scoped timer; reports its duration as a metric when dropped
pub struct PerfTimer {
    name: String,
    start: Instant,
}

impl PerfTimer {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        debug!("Timer started: {}", name);
        Self {
            name,
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Drop for PerfTimer {
    fn drop(&mut self) {
        let elapsed = self.elapsed();
        debug!(elapsed_ms = elapsed.as_millis(), "Timer completed: {}", self.name);
        record_metric(MetricType::Timer {
            name: "perf.timer",
            duration: elapsed,
        });
    }
}
