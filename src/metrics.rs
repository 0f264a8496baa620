use metrics::{counter, gauge, histogram};
use std::time::{Duration, Instant};

/// Metric names published through the `metrics` facade
pub mod names {
    /// Rows read from source files
    pub const ROWS_LOADED_TOTAL: &str = "txt_insights_rows_loaded_total";
    /// Messages that carried text
    pub const MESSAGES_PROCESSED_TOTAL: &str = "txt_insights_messages_processed_total";
    /// Rows dropped for missing text
    pub const ROWS_DROPPED_TOTAL: &str = "txt_insights_rows_dropped_total";
    /// Per-message sentiment distribution
    pub const MESSAGE_SENTIMENT: &str = "txt_insights_message_sentiment";
    /// Messages left out of the daily series
    pub const TIMESTAMPS_SKIPPED_TOTAL: &str = "txt_insights_timestamps_skipped_total";
    /// Days in the latest daily series
    pub const DAILY_POINTS: &str = "txt_insights_daily_points";
    /// Stage wall time
    pub const STAGE_DURATION: &str = "txt_insights_stage_duration_seconds";
    /// Chart files written
    pub const CHARTS_RENDERED_TOTAL: &str = "txt_insights_charts_rendered_total";
    /// Export files written
    pub const EXPORTS_WRITTEN_TOTAL: &str = "txt_insights_exports_written_total";
    /// Export file sizes
    pub const EXPORT_FILE_SIZE_BYTES: &str = "txt_insights_export_file_size_bytes";
    /// Failures by kind and operation
    pub const ERRORS_TOTAL: &str = "txt_insights_errors_total";
}

/// Metrics collection and management
///
/// Every recording goes to the global `metrics` recorder (a no-op unless the
/// embedding application installs one) and is mirrored in the local totals.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MetricsCollector {
    /// Rows loaded
    pub rows_loaded_total: u64,
    /// Messages extracted
    pub messages_processed_total: u64,
    /// Rows dropped for missing text
    pub rows_dropped_total: u64,
    /// Unparseable timestamps
    pub timestamps_skipped_total: u64,
    /// Charts written
    pub charts_rendered_total: u64,
    /// Exports written
    pub exports_written_total: u64,
    /// Errors recorded
    pub errors_total: u64,
}

impl MetricsCollector {
    /// Record rows read from the matching files
    pub fn record_load(&mut self, rows: usize) {
        counter!(names::ROWS_LOADED_TOTAL).increment(rows as u64);
        self.rows_loaded_total += rows as u64;
    }

    /// Record the outcome of feature extraction
    pub fn record_extraction(&mut self, messages: usize, dropped_rows: usize) {
        counter!(names::MESSAGES_PROCESSED_TOTAL).increment(messages as u64);
        counter!(names::ROWS_DROPPED_TOTAL).increment(dropped_rows as u64);
        self.messages_processed_total += messages as u64;
        self.rows_dropped_total += dropped_rows as u64;
    }

    /// Record the sentiment score of one message
    pub fn record_sentiment(&self, score: f64) {
        histogram!(names::MESSAGE_SENTIMENT).record(score);
    }

    /// Record the size of the daily series and how many timestamps it skipped
    pub fn record_daily_series(&mut self, points: usize, skipped: usize) {
        gauge!(names::DAILY_POINTS).set(points as f64);
        counter!(names::TIMESTAMPS_SKIPPED_TOTAL).increment(skipped as u64);
        self.timestamps_skipped_total += skipped as u64;
    }

    /// Record how long a pipeline stage took
    pub fn record_stage(&self, stage: &str, duration: Duration, success: bool) {
        let status = if success { "success" } else { "error" };
        histogram!(
            names::STAGE_DURATION,
            "stage" => stage.to_owned(),
            "status" => status
        )
        .record(duration.as_secs_f64());
    }

    /// Record one rendered chart
    pub fn record_chart(&mut self, chart: &str) {
        counter!(names::CHARTS_RENDERED_TOTAL, "chart" => chart.to_owned()).increment(1);
        self.charts_rendered_total += 1;
    }

    /// Record one written export file
    pub fn record_export(&mut self, format: &str, size_bytes: u64) {
        counter!(names::EXPORTS_WRITTEN_TOTAL, "format" => format.to_owned()).increment(1);
        histogram!(names::EXPORT_FILE_SIZE_BYTES, "format" => format.to_owned())
            .record(size_bytes as f64);
        self.exports_written_total += 1;
    }

    /// Record error metrics
    pub fn record_error(&mut self, error_type: &str, operation: &str) {
        counter!(
            names::ERRORS_TOTAL,
            "type" => error_type.to_owned(),
            "operation" => operation.to_owned()
        )
        .increment(1);
        self.errors_total += 1;
    }
}

/// Performance timing wrapper for metrics
pub struct MetricsTimer {
    stage: &'static str,
    start: Instant,
}

impl MetricsTimer {
    /// Start timing `stage`
    #[must_use]
    pub fn new(stage: &'static str) -> Self {
        Self {
            stage,
            start: Instant::now(),
        }
    }

    /// Record the stage duration into `collector` and return it
    pub fn finish(self, collector: &MetricsCollector, success: bool) -> Duration {
        let duration = self.start.elapsed();
        collector.record_stage(self.stage, duration, success);
        duration
    }
}
