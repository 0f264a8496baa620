//! Text Insights - Conversation Analytics for Exported Chat Logs
//!
//! A Rust library that loads the exported chat-log CSV files of one contact
//! and reports who writes more, how they feel, and what they talk about.
//!
//! # Features
//!
//! - Load and merge every CSV export whose file name mentions the contact
//! - Per-message length, sentiment, emoji and part-of-speech features
//! - Per-sender totals and means, always listing both participants
//! - Word frequencies for each sender and the whole conversation
//! - Daily sentiment timeline
//! - SVG charts, word clouds, JSON summary and CSV word table

/// Per-sender and per-day aggregation
pub mod aggregate;
/// Configuration management
pub mod config;
/// Error types
pub mod error;
/// Feature extraction
pub mod extract;
/// JSON and CSV exports
pub mod file_writer;
/// Word-frequency tables
pub mod lexical;
/// Logging setup and utilities
pub mod logging;
/// Metrics collection
pub mod metrics;
/// Data models and structures
pub mod models;
/// NLP processing
pub mod nlp;
/// Stage orchestration
pub mod pipeline;
/// Part-of-speech tagging
pub mod pos;
/// SVG chart rendering
pub mod render;
/// Report emission and console summaries
pub mod report;
/// CSV discovery and loading
pub mod source;
/// Input validation
pub mod validation;

// Re-export key components for easier access
pub use error::{InsightsError, Result};
pub use models::{ContactIdentity, EnrichedMessage, RawMessage, Sender, SenderAggregate, WordFrequencyTable};
pub use nlp::{NlpProcessor, NlpToolkit};
pub use pipeline::{Analysis, Pipeline};
pub use report::{ChartRenderer, ReportEmitter};
pub use source::{CsvDirectorySource, RecordSource};
