//! Integration tests for metrics.rs module

use std::time::Duration;
use txt_insights::metrics::{names, MetricsCollector, MetricsTimer};

#[test]
fn test_metrics_collector_default() {
    let collector = MetricsCollector::default();
    assert_eq!(collector.rows_loaded_total, 0);
    assert_eq!(collector.messages_processed_total, 0);
    assert_eq!(collector.rows_dropped_total, 0);
    assert_eq!(collector.timestamps_skipped_total, 0);
    assert_eq!(collector.charts_rendered_total, 0);
    assert_eq!(collector.exports_written_total, 0);
    assert_eq!(collector.errors_total, 0);
}

#[test]
fn test_metric_names_are_prefixed() {
    for name in [
        names::ROWS_LOADED_TOTAL,
        names::MESSAGES_PROCESSED_TOTAL,
        names::ROWS_DROPPED_TOTAL,
        names::MESSAGE_SENTIMENT,
        names::TIMESTAMPS_SKIPPED_TOTAL,
        names::DAILY_POINTS,
        names::STAGE_DURATION,
        names::CHARTS_RENDERED_TOTAL,
        names::EXPORTS_WRITTEN_TOTAL,
        names::EXPORT_FILE_SIZE_BYTES,
        names::ERRORS_TOTAL,
    ] {
        assert!(name.starts_with("txt_insights_"), "{name}");
    }
}

#[test]
fn test_record_load_accumulates() {
    let mut collector = MetricsCollector::default();
    collector.record_load(10);
    collector.record_load(5);
    assert_eq!(collector.rows_loaded_total, 15);
}

#[test]
fn test_record_extraction() {
    let mut collector = MetricsCollector::default();
    collector.record_extraction(8, 2);
    assert_eq!(collector.messages_processed_total, 8);
    assert_eq!(collector.rows_dropped_total, 2);
}

#[test]
fn test_record_daily_series() {
    let mut collector = MetricsCollector::default();
    collector.record_daily_series(30, 3);
    collector.record_daily_series(30, 0);
    assert_eq!(collector.timestamps_skipped_total, 3);
}

#[test]
fn test_record_chart_and_export() {
    let mut collector = MetricsCollector::default();
    collector.record_chart("character_counts");
    collector.record_chart("wordcloud_me");
    collector.record_export("json", 1024);
    assert_eq!(collector.charts_rendered_total, 2);
    assert_eq!(collector.exports_written_total, 1);
}

#[test]
fn test_record_error() {
    let mut collector = MetricsCollector::default();
    collector.record_error("no_matching_files", "load");
    collector.record_error("render", "wordcloud_me");
    assert_eq!(collector.errors_total, 2);
}

#[test]
fn test_record_stage_and_sentiment_do_not_touch_totals() {
    let collector = MetricsCollector::default();
    collector.record_stage("extract", Duration::from_millis(5), true);
    collector.record_sentiment(0.5);
    assert_eq!(collector, MetricsCollector::default());
}

#[test]
fn test_metrics_timer_measures_duration() {
    let collector = MetricsCollector::default();
    let timer = MetricsTimer::new("aggregate");
    std::thread::sleep(Duration::from_millis(5));
    let elapsed = timer.finish(&collector, true);
    assert!(elapsed >= Duration::from_millis(5));
}
