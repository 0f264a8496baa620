use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::validation::InputValidator;

/// Application configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Log output settings
    pub logging: LoggingConfig,
    /// Source file layout
    pub input: InputConfig,
    /// Analysis knobs
    pub analysis: AnalysisConfig,
    /// Chart and export settings
    pub report: ReportConfig,
}

/// Log output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Level filter used when `RUST_LOG` is unset
    pub level: String,
    /// Optional rolling log file
    pub file_path: Option<String>,
    /// "json" or "text"
    pub format: String,
}

/// Layout of the exported chat CSV files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Extension without the leading dot
    pub file_extension: String,
    /// Column holding the chat session (contact) name
    pub chat_session_column: String,
    /// Column holding the message direction
    pub direction_column: String,
    /// Column holding the message text
    pub text_column: String,
    /// Column holding the message timestamp
    pub timestamp_column: String,
    /// Direction value that marks self-authored messages
    pub outgoing_label: String,
}

/// Analysis knobs
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Entries shown in each most-common word list
    pub top_words: usize,
    /// Entries shown in the part-of-speech summary
    pub top_pos_tags: usize,
}

/// Chart and export settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Root for per-contact output; defaults to the conversation directory
    pub output_directory: Option<String>,
    /// Bar and line chart width in pixels
    pub chart_width: u32,
    /// Bar and line chart height in pixels
    pub chart_height: u32,
    /// Word cloud width in pixels
    pub wordcloud_width: u32,
    /// Word cloud height in pixels
    pub wordcloud_height: u32,
    /// Maximum words drawn per cloud
    pub wordcloud_max_words: usize,
    /// Seed for word placement and colours
    pub wordcloud_seed: u64,
    /// Drop English stop words from clouds
    pub remove_stopwords: bool,
    /// Colour for "Me" bars
    pub me_color: String,
    /// Colour for the contact's bars
    pub contact_color: String,
    /// Colour of the sentiment timeline
    pub timeline_color: String,
    /// Write `summary.json`
    pub write_json_summary: bool,
    /// Write `word_frequencies.csv`
    pub write_word_csv: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_path: None,
            format: "text".to_string(),
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            file_extension: "csv".to_string(),
            chat_session_column: "Chat Session".to_string(),
            direction_column: "Type".to_string(),
            text_column: "Text".to_string(),
            timestamp_column: "Message Date".to_string(),
            outgoing_label: "Outgoing".to_string(),
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            top_words: 20,
            top_pos_tags: 10,
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_directory: None,
            chart_width: 1000,
            chart_height: 600,
            wordcloud_width: 800,
            wordcloud_height: 400,
            wordcloud_max_words: 200,
            wordcloud_seed: 42,
            remove_stopwords: true,
            me_color: "#0000ff".to_string(),
            contact_color: "#008000".to_string(),
            timeline_color: "#800080".to_string(),
            write_json_summary: true,
            write_word_csv: true,
        }
    }
}

impl AppConfig {
    /// Load configuration from multiple sources with precedence
    ///
    /// Defaults, then `config/default.*`, then `explicit_file` when given,
    /// then `TXT_INSIGHTS__SECTION__KEY` environment variables. Values are
    /// not checked here; call [`AppConfig::validate`] once overrides are applied.
    pub fn load(explicit_file: Option<&Path>) -> Result<Self> {
        let defaults = Config::try_from(&Self::default())
            .map_err(|e| anyhow::anyhow!("Failed to build default configuration: {}", e))?;

        let mut builder = Config::builder()
            .add_source(defaults)
            .add_source(File::with_name("config/default").required(false));

        if let Some(path) = explicit_file {
            builder = builder.add_source(File::from(path).required(true));
        }

        let config = builder
            .add_source(
                Environment::with_prefix("TXT_INSIGHTS")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

        config
            .try_deserialize()
            .map_err(|e| anyhow::anyhow!("Failed to deserialize configuration: {}", e))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        // Validate logging config
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(anyhow::anyhow!(
                "Invalid log level: {}. Must be one of: {:?}",
                self.logging.level,
                valid_levels
            ));
        }

        let valid_formats = ["text", "json"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            return Err(anyhow::anyhow!(
                "Invalid log format: {}. Must be one of: {:?}",
                self.logging.format,
                valid_formats
            ));
        }

        // Validate input config
        let extension = &self.input.file_extension;
        if extension.is_empty() || extension.starts_with('.') {
            return Err(anyhow::anyhow!(
                "file_extension must be non-empty and given without a leading dot: {:?}",
                extension
            ));
        }
        for (name, value) in [
            ("chat_session_column", &self.input.chat_session_column),
            ("direction_column", &self.input.direction_column),
            ("text_column", &self.input.text_column),
            ("timestamp_column", &self.input.timestamp_column),
            ("outgoing_label", &self.input.outgoing_label),
        ] {
            if value.trim().is_empty() {
                return Err(anyhow::anyhow!("{} cannot be empty", name));
            }
        }

        // Validate analysis config
        InputValidator::validate_top_words(self.analysis.top_words)?;
        if self.analysis.top_pos_tags == 0 {
            return Err(anyhow::anyhow!("top_pos_tags must be greater than 0"));
        }

        // Validate report config
        if self.report.chart_width == 0 || self.report.chart_height == 0 {
            return Err(anyhow::anyhow!("chart dimensions must be greater than 0"));
        }
        if self.report.wordcloud_width == 0 || self.report.wordcloud_height == 0 {
            return Err(anyhow::anyhow!("word cloud dimensions must be greater than 0"));
        }
        if self.report.wordcloud_max_words == 0 {
            return Err(anyhow::anyhow!("wordcloud_max_words must be greater than 0"));
        }
        InputValidator::parse_hex_color(&self.report.me_color)?;
        InputValidator::parse_hex_color(&self.report.contact_color)?;
        InputValidator::parse_hex_color(&self.report.timeline_color)?;

        Ok(())
    }

    /// Get log level from environment or config
    #[must_use]
    pub fn get_log_level(&self) -> String {
        std::env::var("RUST_LOG").unwrap_or_else(|_| self.logging.level.clone())
    }
}
