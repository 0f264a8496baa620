//! Orchestrates one run: load, extract, aggregate and summarize.

use std::path::Path;

use tracing::{info, warn};

use crate::aggregate::{aggregate, daily_sentiment, SenderAggregates};
use crate::error::Result;
use crate::extract::extract;
use crate::lexical::{summarize, tag_distribution, WordFrequencies};
use crate::logging::OperationTimer;
use crate::metrics::{MetricsCollector, MetricsTimer};
use crate::models::{ContactIdentity, DailySentiment, RawMessage, WordFrequencyTable};
use crate::nlp::{detect_language, DetectedLanguage, NlpToolkit};
use crate::source::RecordSource;

/// Everything the report emitter consumes for one contact
#[derive(Debug, Clone)]
pub struct Analysis {
    /// The non-self participant
    pub contact: ContactIdentity,
    /// Messages that carried text
    pub message_count: usize,
    /// Rows dropped for lack of text
    pub dropped_rows: usize,
    /// Per-sender statistics
    pub aggregates: SenderAggregates,
    /// Word frequencies for Me, the contact and both
    pub frequencies: WordFrequencies,
    /// Part-of-speech tag counts over all messages
    pub tag_distribution: WordFrequencyTable,
    /// Mean sentiment per day
    pub daily: DailySentiment,
    /// Dominant language of the conversation, when detectable
    pub language: Option<DetectedLanguage>,
}

/// Runs the transform-and-aggregate stages over one source
pub struct Pipeline<S> {
    source: S,
    toolkit: NlpToolkit,
    metrics: MetricsCollector,
}

impl<S: RecordSource> Pipeline<S> {
    /// Create a pipeline over `source` using `toolkit` for text features
    pub fn new(source: S, toolkit: NlpToolkit) -> Self {
        Self {
            source,
            toolkit,
            metrics: MetricsCollector::default(),
        }
    }

    /// Counters accumulated by previous runs
    pub fn metrics(&self) -> &MetricsCollector {
        &self.metrics
    }

    /// Load every file matching `contact_name` in `directory` and analyze it.
    pub fn analyze(&mut self, directory: &Path, contact_name: &str) -> Result<Analysis> {
        let timer = MetricsTimer::new("load");
        let loaded = self.source.load(directory, contact_name);
        timer.finish(&self.metrics, loaded.is_ok());

        let rows = loaded.inspect_err(|err| self.metrics.record_error(err.kind(), "load"))?;
        self.metrics.record_load(rows.len());
        self.analyze_rows(&rows)
    }

    /// Analyze rows that are already in memory
    pub fn analyze_rows(&mut self, rows: &[RawMessage]) -> Result<Analysis> {
        let run_timer = OperationTimer::new("analyze");

        let timer = MetricsTimer::new("extract");
        let extracted = extract(rows, &self.toolkit);
        timer.finish(&self.metrics, extracted.is_ok());
        let extraction =
            extracted.inspect_err(|err| self.metrics.record_error(err.kind(), "extract"))?;

        self.metrics
            .record_extraction(extraction.messages.len(), extraction.dropped_rows);
        for message in &extraction.messages {
            self.metrics.record_sentiment(message.sentiment);
        }

        let messages = &extraction.messages;
        let timer = MetricsTimer::new("aggregate");
        let aggregates = aggregate(&extraction.contact, messages);
        let daily = daily_sentiment(messages);
        timer.finish(&self.metrics, true);
        self.metrics
            .record_daily_series(daily.points.len(), daily.skipped_timestamps);
        if daily.skipped_timestamps > 0 {
            warn!(
                skipped = daily.skipped_timestamps,
                "Some messages were left out of the sentiment timeline"
            );
        }

        let timer = MetricsTimer::new("summarize");
        let frequencies = summarize(messages, self.toolkit.tokenizer.as_ref());
        let tags = tag_distribution(messages);
        timer.finish(&self.metrics, true);

        let combined = messages
            .iter()
            .map(|message| message.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let language = detect_language(&combined);
        match &language {
            Some(detected) if !detected.is_english => warn!(
                language = %detected.code,
                confidence = detected.confidence,
                "Conversation is not in English; sentiment scores may be unreliable"
            ),
            Some(detected) => info!(language = %detected.code, "Detected conversation language"),
            None => warn!("Could not detect conversation language"),
        }

        info!(
            contact = %extraction.contact,
            messages = messages.len(),
            distinct_words = frequencies.both.len(),
            days = daily.points.len(),
            "Analysis complete"
        );
        run_timer.finish();

        Ok(Analysis {
            contact: extraction.contact,
            message_count: extraction.messages.len(),
            dropped_rows: extraction.dropped_rows,
            aggregates,
            frequencies,
            tag_distribution: tags,
            daily,
            language,
        })
    }
}
