//! Report emitter: turns an [`Analysis`] into console tables, chart files
//! and optional JSON/CSV exports under a per-contact output directory.
//!
//! Drawing is delegated to a [`ChartRenderer`]; everything in this module
//! only decides what is drawn, where, and in which colour.

use std::collections::HashSet;
use std::fs::create_dir_all;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::aggregate::SenderAggregates;
use crate::config::{AnalysisConfig, ReportConfig};
use crate::error::{InsightsError, Result};
use crate::file_writer::{write_summary_json, write_word_frequencies_csv};
use crate::metrics::MetricsCollector;
use crate::models::{Sender, SenderAggregate, WordFrequencyTable, ME_LABEL};
use crate::nlp::english_stopwords;
use crate::pipeline::Analysis;
use crate::validation::InputValidator;

/// An sRGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// The fixed set of charts written for every contact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    /// Total characters per sender
    CharacterCounts,
    /// Messages per sender
    MessageCounts,
    /// Mean sentiment per sender
    AverageSentiment,
    /// Total emojis per sender
    EmojiCounts,
    /// Words written by Me
    WordcloudMe,
    /// Words written by the contact
    WordcloudThem,
    /// Words from the whole conversation
    WordcloudBoth,
    /// Daily mean sentiment
    SentimentOverTime,
}

impl ChartKind {
    /// Every chart, in the order it is written
    pub const ALL: [Self; 8] = [
        Self::CharacterCounts,
        Self::MessageCounts,
        Self::AverageSentiment,
        Self::EmojiCounts,
        Self::WordcloudMe,
        Self::WordcloudThem,
        Self::WordcloudBoth,
        Self::SentimentOverTime,
    ];

    /// File name without extension
    #[must_use]
    pub const fn file_stem(self) -> &'static str {
        match self {
            Self::CharacterCounts => "character_counts",
            Self::MessageCounts => "message_counts",
            Self::AverageSentiment => "average_sentiment",
            Self::EmojiCounts => "emoji_counts",
            Self::WordcloudMe => "wordcloud_me",
            Self::WordcloudThem => "wordcloud_them",
            Self::WordcloudBoth => "wordcloud_both",
            Self::SentimentOverTime => "sentiment_over_time",
        }
    }
}

/// One bar of a bar chart
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    /// Category label under the bar
    pub label: String,
    /// Bar height
    pub value: f64,
    /// Fill colour
    pub color: Rgb,
}

/// A categorical bar chart
#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    /// Caption above the plot
    pub title: String,
    /// X axis description
    pub x_label: String,
    /// Y axis description
    pub y_label: String,
    /// Bars in drawing order
    pub bars: Vec<Bar>,
}

/// Words and weights for a word cloud, most frequent first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordCloud {
    /// Caption above the cloud
    pub title: String,
    /// Words with their counts
    pub words: Vec<(String, u64)>,
}

impl WordCloud {
    /// Pick the words worth drawing from a frequency table.
    ///
    /// Single-character tokens, tokens without letters or digits, clitic
    /// fragments and (optionally) stop words are left out.
    #[must_use]
    pub fn from_frequencies(
        title: String,
        table: &WordFrequencyTable,
        max_words: usize,
        stopwords: Option<&HashSet<String>>,
    ) -> Self {
        let words = table
            .ranked()
            .into_iter()
            .filter(|(token, _)| is_cloud_word(token, stopwords))
            .take(max_words)
            .collect();
        Self { title, words }
    }
}

fn is_cloud_word(token: &str, stopwords: Option<&HashSet<String>>) -> bool {
    if token.chars().count() < 2 || !token.chars().any(char::is_alphanumeric) {
        return false;
    }
    if token.starts_with('\'') || token == "n't" {
        return false;
    }
    stopwords.map_or(true, |words| !words.contains(token))
}

/// A dated line chart
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    /// Caption above the plot
    pub title: String,
    /// X axis description
    pub x_label: String,
    /// Y axis description
    pub y_label: String,
    /// Points in date order
    pub points: Vec<(NaiveDate, f64)>,
    /// Line and marker colour
    pub color: Rgb,
}

/// Draws charts to files
#[cfg_attr(test, mockall::automock)]
pub trait ChartRenderer {
    /// File extension of the produced images
    fn extension(&self) -> &'static str;
    /// Draw a bar chart to `path`
    fn render_bar(&self, chart: &BarChart, path: &Path) -> Result<()>;
    /// Draw a word cloud to `path`
    fn render_wordcloud(&self, cloud: &WordCloud, path: &Path) -> Result<()>;
    /// Draw a dated line chart to `path`
    fn render_timeseries(&self, series: &TimeSeries, path: &Path) -> Result<()>;
}

/// Static colour table for the two senders
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SenderPalette {
    me: Rgb,
    contact: Rgb,
}

impl SenderPalette {
    /// Palette with one colour per sender
    #[must_use]
    pub const fn new(me: Rgb, contact: Rgb) -> Self {
        Self { me, contact }
    }

    /// Colour for `sender`
    #[must_use]
    pub const fn color(&self, sender: &Sender) -> Rgb {
        match sender {
            Sender::Me => self.me,
            Sender::Contact(_) => self.contact,
        }
    }
}

/// `<root>/<contact_name>` where root is the override or the conversation directory
#[must_use]
pub fn output_directory(
    conversation_dir: &Path,
    contact_name: &str,
    root_override: Option<&str>,
) -> PathBuf {
    root_override
        .map_or_else(|| conversation_dir.to_path_buf(), PathBuf::from)
        .join(contact_name)
}

/// Files produced by one [`ReportEmitter::emit`] call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmittedReport {
    /// Per-contact output directory
    pub directory: PathBuf,
    /// Chart files in [`ChartKind::ALL`] order
    pub charts: Vec<PathBuf>,
    /// JSON and CSV exports
    pub exports: Vec<PathBuf>,
}

/// Renders charts and exports for an analysis
pub struct ReportEmitter<R> {
    renderer: R,
    settings: ReportConfig,
    top_words: usize,
    top_pos_tags: usize,
    palette: SenderPalette,
    timeline_color: Rgb,
    stopwords: Option<HashSet<String>>,
    render_charts: bool,
    metrics: MetricsCollector,
}

impl<R: ChartRenderer> ReportEmitter<R> {
    /// Create an emitter, resolving configured colours up front
    pub fn new(renderer: R, report: &ReportConfig, analysis: &AnalysisConfig) -> Result<Self> {
        let color = |value: &str| {
            InputValidator::parse_hex_color(value)
                .map_err(|e| InsightsError::InvalidConfig(e.to_string()))
        };

        Ok(Self {
            palette: SenderPalette::new(color(&report.me_color)?, color(&report.contact_color)?),
            timeline_color: color(&report.timeline_color)?,
            stopwords: report.remove_stopwords.then(english_stopwords),
            settings: report.clone(),
            top_words: analysis.top_words,
            top_pos_tags: analysis.top_pos_tags,
            renderer,
            render_charts: true,
            metrics: MetricsCollector::default(),
        })
    }

    /// Skip chart rendering; exports are still written
    #[must_use]
    pub fn without_charts(mut self) -> Self {
        self.render_charts = false;
        self
    }

    /// Counters for charts and exports written so far
    pub fn metrics(&self) -> &MetricsCollector {
        &self.metrics
    }

    /// Write all charts and exports for `analysis` into `directory`.
    ///
    /// The directory is created if missing; existing files are overwritten.
    pub fn emit(&mut self, analysis: &Analysis, directory: &Path) -> Result<EmittedReport> {
        create_dir_all(directory)?;
        let mut report = EmittedReport {
            directory: directory.to_path_buf(),
            ..EmittedReport::default()
        };

        if self.render_charts {
            for kind in ChartKind::ALL {
                let path = directory.join(format!(
                    "{}.{}",
                    kind.file_stem(),
                    self.renderer.extension()
                ));
                self.render(kind, analysis, &path)
                    .inspect_err(|err| self.metrics.record_error(err.kind(), kind.file_stem()))?;
                self.metrics.record_chart(kind.file_stem());
                debug!(chart = kind.file_stem(), path = %path.display(), "Chart written");
                report.charts.push(path);
            }
        }

        if self.settings.write_json_summary {
            let path = directory.join("summary.json");
            let bytes = write_summary_json(analysis, self.top_words, &path)?;
            self.metrics.record_export("json", bytes);
            report.exports.push(path);
        }

        if self.settings.write_word_csv {
            let path = directory.join("word_frequencies.csv");
            let bytes =
                write_word_frequencies_csv(&analysis.frequencies, &analysis.contact, &path)?;
            self.metrics.record_export("csv", bytes);
            report.exports.push(path);
        }

        info!(
            directory = %directory.display(),
            charts = report.charts.len(),
            exports = report.exports.len(),
            "Report written"
        );
        Ok(report)
    }

    fn render(&self, kind: ChartKind, analysis: &Analysis, path: &Path) -> Result<()> {
        let contact = &analysis.contact;
        let aggregates = &analysis.aggregates;
        match kind {
            ChartKind::CharacterCounts => self.renderer.render_bar(
                &self.counts_chart("Character Count", "Total Characters", &aggregates.character_counts),
                path,
            ),
            ChartKind::MessageCounts => self.renderer.render_bar(
                &self.counts_chart("Message Count", "Number of Messages", &aggregates.message_counts),
                path,
            ),
            ChartKind::AverageSentiment => self.renderer.render_bar(
                &self.bar_chart(
                    "Average Sentiment",
                    "Average Sentiment",
                    &aggregates.average_sentiment,
                    |value| value,
                ),
                path,
            ),
            ChartKind::EmojiCounts => self.renderer.render_bar(
                &self.counts_chart("Emoji Count", "Total Emojis", &aggregates.emoji_totals),
                path,
            ),
            ChartKind::WordcloudMe => self.render_cloud(
                format!("Word Cloud for {ME_LABEL}"),
                &analysis.frequencies.me,
                path,
            ),
            ChartKind::WordcloudThem => self.render_cloud(
                format!("Word Cloud for {contact}"),
                &analysis.frequencies.them,
                path,
            ),
            ChartKind::WordcloudBoth => self.render_cloud(
                format!("Word Cloud for Both {contact} and {ME_LABEL}"),
                &analysis.frequencies.both,
                path,
            ),
            ChartKind::SentimentOverTime => self.renderer.render_timeseries(
                &TimeSeries {
                    title: format!("Sentiment Over Time for {contact} and {ME_LABEL}"),
                    x_label: "Date".to_string(),
                    y_label: "Average Sentiment".to_string(),
                    points: analysis
                        .daily
                        .points
                        .iter()
                        .map(|point| (point.date, point.sentiment))
                        .collect(),
                    color: self.timeline_color,
                },
                path,
            ),
        }
    }

    fn counts_chart(&self, metric: &str, y_label: &str, values: &SenderAggregate<u64>) -> BarChart {
        self.bar_chart(metric, y_label, values, |value| value as f64)
    }

    fn bar_chart<T: Copy>(
        &self,
        metric: &str,
        y_label: &str,
        values: &SenderAggregate<T>,
        to_f64: impl Fn(T) -> f64,
    ) -> BarChart {
        BarChart {
            title: format!("{metric} by {} and {ME_LABEL}", values.contact()),
            x_label: "Sender".to_string(),
            y_label: y_label.to_string(),
            bars: values
                .rows()
                .into_iter()
                .map(|(sender, value)| Bar {
                    label: sender.label().to_string(),
                    value: to_f64(value),
                    color: self.palette.color(&sender),
                })
                .collect(),
        }
    }

    fn render_cloud(&self, title: String, table: &WordFrequencyTable, path: &Path) -> Result<()> {
        let cloud = WordCloud::from_frequencies(
            title,
            table,
            self.settings.wordcloud_max_words,
            self.stopwords.as_ref(),
        );
        if cloud.words.is_empty() {
            warn!(title = %cloud.title, "No words to draw; writing an empty word cloud");
        }
        self.renderer.render_wordcloud(&cloud, path)
    }

    /// Print the tabular summary of `analysis` to `out`.
    pub fn write_summary<W: Write>(&self, analysis: &Analysis, out: &mut W) -> std::io::Result<()> {
        write_console_summary(analysis, self.top_words, self.top_pos_tags, out)
    }
}

/// Print aggregate tables, top words, tag counts and the timeline size.
pub fn write_console_summary<W: Write>(
    analysis: &Analysis,
    top_words: usize,
    top_pos_tags: usize,
    out: &mut W,
) -> std::io::Result<()> {
    let contact = &analysis.contact;
    writeln!(
        out,
        "Conversation with {contact}: {} messages ({} rows without text skipped)",
        analysis.message_count, analysis.dropped_rows
    )?;
    if let Some(language) = &analysis.language {
        writeln!(out, "Detected language: {} ({:.2})", language.code, language.confidence)?;
    }

    write_aggregate_tables(&analysis.aggregates, out)?;

    let frequencies = &analysis.frequencies;
    write_top_words(out, &format!("Top {top_words} words for {ME_LABEL}"), &frequencies.me, top_words)?;
    write_top_words(out, &format!("Top {top_words} words for {contact}"), &frequencies.them, top_words)?;
    write_top_words(
        out,
        &format!("Top {top_words} words for {contact} and {ME_LABEL}"),
        &frequencies.both,
        top_words,
    )?;
    write_top_words(
        out,
        &format!("Top {top_pos_tags} part-of-speech tags"),
        &analysis.tag_distribution,
        top_pos_tags,
    )?;

    writeln!(out)?;
    writeln!(
        out,
        "Sentiment timeline: {} days ({} messages without a usable timestamp)",
        analysis.daily.points.len(),
        analysis.daily.skipped_timestamps
    )
}

fn write_aggregate_tables<W: Write>(aggregates: &SenderAggregates, out: &mut W) -> std::io::Result<()> {
    let tables: [(&str, Vec<(Sender, String)>); 4] = [
        ("Total Characters", format_rows(&aggregates.character_counts, |v| v.to_string())),
        ("Number of Messages", format_rows(&aggregates.message_counts, |v| v.to_string())),
        ("Average Sentiment", format_rows(&aggregates.average_sentiment, |v| format!("{v:.4}"))),
        ("Total Emojis", format_rows(&aggregates.emoji_totals, |v| v.to_string())),
    ];

    for (heading, rows) in tables {
        writeln!(out)?;
        writeln!(out, "{:<24} {:>18}", "Sender", heading)?;
        for (sender, value) in rows {
            writeln!(out, "{:<24} {:>18}", sender.label(), value)?;
        }
    }
    Ok(())
}

fn format_rows<T: Copy>(
    aggregate: &SenderAggregate<T>,
    format: impl Fn(T) -> String,
) -> Vec<(Sender, String)> {
    aggregate
        .rows()
        .into_iter()
        .map(|(sender, value)| (sender, format(value)))
        .collect()
}

fn write_top_words<W: Write>(
    out: &mut W,
    heading: &str,
    table: &WordFrequencyTable,
    n: usize,
) -> std::io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{heading}")?;
    if table.is_empty() {
        writeln!(out, "  (none)")?;
    }
    for (token, count) in table.most_common(n) {
        writeln!(out, "  {token:<22} {count:>8}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexical::WordFrequencies;
    use crate::models::{ContactIdentity, DailyPoint, DailySentiment};
    use tempfile::tempdir;

    fn analysis() -> Analysis {
        let alex = ContactIdentity::new("Alex");
        let aggregates = SenderAggregates {
            character_counts: SenderAggregate::new(alex.clone(), 10, 0),
            message_counts: SenderAggregate::new(alex.clone(), 2, 0),
            average_sentiment: SenderAggregate::new(alex.clone(), 0.5, 0.0),
            emoji_totals: SenderAggregate::new(alex.clone(), 1, 0),
        };
        let me = WordFrequencyTable::from_tokens(["the", "pizza", "pizza", "n't", "!"]);
        Analysis {
            contact: alex,
            message_count: 2,
            dropped_rows: 0,
            aggregates,
            frequencies: WordFrequencies {
                both: me.clone(),
                me,
                them: WordFrequencyTable::new(),
            },
            tag_distribution: WordFrequencyTable::from_tokens(["NN", "NN", "DT"]),
            daily: DailySentiment {
                points: vec![DailyPoint {
                    date: NaiveDate::from_ymd_opt(2024, 1, 1).expect("date"),
                    sentiment: 0.5,
                    messages: 2,
                }],
                skipped_timestamps: 0,
            },
            language: None,
        }
    }

    #[test]
    fn test_chart_file_stems() {
        let stems: Vec<_> = ChartKind::ALL.iter().map(|k| k.file_stem()).collect();
        assert_eq!(
            stems,
            vec![
                "character_counts",
                "message_counts",
                "average_sentiment",
                "emoji_counts",
                "wordcloud_me",
                "wordcloud_them",
                "wordcloud_both",
                "sentiment_over_time",
            ]
        );
    }

    #[test]
    fn test_wordcloud_filters_noise() {
        let stopwords = english_stopwords();
        let table = WordFrequencyTable::from_tokens(["the", "pizza", "pizza", "n't", "'s", "!", "a", "movie"]);
        let cloud = WordCloud::from_frequencies("t".to_string(), &table, 10, Some(&stopwords));
        assert_eq!(cloud.words, vec![("pizza".to_string(), 2), ("movie".to_string(), 1)]);

        let capped = WordCloud::from_frequencies("t".to_string(), &table, 1, None);
        assert_eq!(capped.words, vec![("pizza".to_string(), 2)]);
    }

    #[test]
    fn test_output_directory() {
        let dir = Path::new("/data/chats");
        assert_eq!(output_directory(dir, "Alex", None), PathBuf::from("/data/chats/Alex"));
        assert_eq!(
            output_directory(dir, "Alex", Some("/tmp/out")),
            PathBuf::from("/tmp/out/Alex")
        );
    }

    #[test]
    fn test_emit_renders_every_chart_with_both_senders() {
        let mut renderer = MockChartRenderer::new();
        renderer.expect_extension().return_const("svg");
        renderer
            .expect_render_bar()
            .times(8)
            .returning(|chart, _| {
                assert_eq!(chart.bars.len(), 2);
                assert_eq!(chart.bars[0].label, "Me");
                assert_eq!(chart.bars[0].color, Rgb(0, 0, 255));
                assert_eq!(chart.bars[1].label, "Alex");
                assert_eq!(chart.bars[1].color, Rgb(0, 128, 0));
                assert!(chart.title.ends_with("by Alex and Me"));
                Ok(())
            });
        renderer
            .expect_render_wordcloud()
            .times(6)
            .returning(|_, _| Ok(()));
        renderer
            .expect_render_timeseries()
            .times(2)
            .returning(|series, _| {
                assert_eq!(series.title, "Sentiment Over Time for Alex and Me");
                assert_eq!(series.points.len(), 1);
                Ok(())
            });

        let dir = tempdir().expect("tempdir");
        let target = dir.path().join("Alex");
        let mut emitter =
            ReportEmitter::new(renderer, &ReportConfig::default(), &AnalysisConfig::default())
                .expect("emitter");
        let report = emitter.emit(&analysis(), &target).expect("emit");

        assert_eq!(report.charts.len(), 8);
        assert_eq!(report.charts[0], target.join("character_counts.svg"));
        assert_eq!(report.exports.len(), 2);
        assert!(target.join("summary.json").is_file());
        assert!(target.join("word_frequencies.csv").is_file());
        assert_eq!(emitter.metrics().charts_rendered_total, 8);

        // A second run into the same directory succeeds and renders everything again
        assert!(emitter.emit(&analysis(), &target).is_ok());
        assert_eq!(emitter.metrics().charts_rendered_total, 16);
    }

    #[test]
    fn test_render_failure_stops_emit() {
        let mut renderer = MockChartRenderer::new();
        renderer.expect_extension().return_const("svg");
        renderer
            .expect_render_bar()
            .returning(|_, _| Err(InsightsError::Render("boom".to_string())));

        let dir = tempdir().expect("tempdir");
        let mut emitter =
            ReportEmitter::new(renderer, &ReportConfig::default(), &AnalysisConfig::default())
                .expect("emitter");
        let err = emitter.emit(&analysis(), dir.path()).expect_err("should fail");
        assert!(matches!(err, InsightsError::Render(_)));
        assert_eq!(emitter.metrics().errors_total, 1);
    }

    #[test]
    fn test_console_summary_lists_me_first() {
        let mut out = Vec::new();
        write_console_summary(&analysis(), 5, 2, &mut out).expect("write");
        let text = String::from_utf8(out).expect("utf8");

        let me = text.find("\nMe ").expect("me row");
        let alex = text.find("\nAlex ").expect("alex row");
        assert!(me < alex);
        assert!(text.contains("Top 5 words for Alex\n  (none)"));
        assert!(text.contains("Sentiment timeline: 1 days"));
    }
}
