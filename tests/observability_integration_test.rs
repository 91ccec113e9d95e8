// Observability integration tests
// Index operations flow through structured logging and the global counters.

use anyhow::Result;
use codescope::observability::*;
use codescope::*;
use std::sync::Arc;

fn counter(metrics: &serde_json::Value, name: &str) -> u64 {
    metrics["operations"][name].as_u64().unwrap_or_default()
}

#[tokio::test]
async fn test_index_operations_update_counters() -> Result<()> {
    let _ = init_logging();

    let source = MemoryFileSource::new();
    source.insert("/repo/main.go", "package main\n\nfunc main() {}\n");
    let index = SymbolIndex::new(Arc::new(source), IndexerConfig::default());

    let before = get_metrics();
    index.index_directory("/repo").await?;
    index.search("main", 5).await?;
    index.find_similar_files("/repo/main.go", 5).await?;
    index.get_statistics().await?;
    let after = get_metrics();

    // Counters are process-wide and other tests run concurrently
    assert!(counter(&after, "scans") >= counter(&before, "scans") + 1);
    assert!(counter(&after, "queries") >= counter(&before, "queries") + 2);
    assert!(counter(&after, "total") >= counter(&before, "total") + 4);
    assert!(after["timestamp"].is_string());
    Ok(())
}

#[tokio::test]
async fn test_failed_scan_counts_as_error() -> Result<()> {
    let index = SymbolIndex::new(Arc::new(MemoryFileSource::new()), IndexerConfig::default());

    let before = counter(&get_metrics(), "errors");
    assert!(index.index_directory("/missing").await.is_err());

    assert!(counter(&get_metrics(), "errors") > before);
    Ok(())
}

#[test]
fn test_child_context_shares_trace() {
    let mut parent = OperationContext::new("index_worker");
    parent.add_attribute("root", "/repo");
    let child = parent.child("search");

    assert_eq!(child.trace_id, parent.trace_id);
    assert_eq!(child.parent_span_id, Some(parent.span_id));
    assert_ne!(child.span_id, parent.span_id);
    assert!(child.attributes.is_empty());
}

#[tokio::test]
async fn test_with_trace_id_propagates_result() -> Result<()> {
    let value = with_trace_id("answer", async { Ok(42) }).await?;
    assert_eq!(value, 42);

    let failed: Result<()> = with_trace_id("failing", async { Err(anyhow::anyhow!("boom")) }).await;
    assert!(failed.is_err());
    Ok(())
}

#[test]
fn test_perf_timer_measures_elapsed() {
    let timer = PerfTimer::new("unit");
    std::thread::sleep(std::time::Duration::from_millis(5));
    assert!(timer.elapsed() >= std::time::Duration::from_millis(5));
}
