//! File writing utilities for report exports.
//!
//! `summary.json` carries the aggregates and the daily series in a
//! machine-readable form; `word_frequencies.csv` carries the full word tables
//! side by side.

use crate::aggregate::aggregate_rows;
use crate::error::Result;
use crate::lexical::WordFrequencies;
use crate::models::{ContactIdentity, WordFrequencyTable, ME_LABEL};
use crate::pipeline::Analysis;
use csv::Writer;
use serde_json::json;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write the JSON summary of an analysis.
///
/// # Returns
///
/// Size of the written file in bytes
pub fn write_summary_json(analysis: &Analysis, top_words: usize, file_path: &Path) -> Result<u64> {
    let aggregates = &analysis.aggregates;
    let top = |table: &WordFrequencyTable| {
        table
            .most_common(top_words)
            .into_iter()
            .map(|(token, count)| json!({ "token": token, "count": count }))
            .collect::<Vec<_>>()
    };

    let summary = json!({
        "contact": analysis.contact.name(),
        "message_count": analysis.message_count,
        "dropped_rows": analysis.dropped_rows,
        "language": analysis.language.as_ref().map(|language| json!({
            "code": language.code,
            "confidence": language.confidence,
        })),
        "character_counts": aggregate_rows(&aggregates.character_counts),
        "message_counts": aggregate_rows(&aggregates.message_counts),
        "average_sentiment": aggregate_rows(&aggregates.average_sentiment),
        "emoji_counts": aggregate_rows(&aggregates.emoji_totals),
        "top_words": {
            "me": top(&analysis.frequencies.me),
            "them": top(&analysis.frequencies.them),
            "both": top(&analysis.frequencies.both),
        },
        "daily_sentiment": analysis.daily.points,
        "skipped_timestamps": analysis.daily.skipped_timestamps,
    });

    let file = File::create(file_path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &summary)?;
    writeln!(writer)?;
    writer.flush()?;

    Ok(fs::metadata(file_path)?.len())
}

/// Write every token with its per-sender and combined counts.
///
/// Header row: `Token, Me, <contact>, Both`, rows in combined ranking order.
pub fn write_word_frequencies_csv(
    frequencies: &WordFrequencies,
    contact: &ContactIdentity,
    file_path: &Path,
) -> Result<u64> {
    let file = File::create(file_path)?;
    let mut writer = Writer::from_writer(file);

    writer.write_record(["Token", ME_LABEL, contact.name(), "Both"])?;

    for (token, both) in frequencies.both.ranked() {
        let me = frequencies.me.count(&token).to_string();
        let them = frequencies.them.count(&token).to_string();
        let both = both.to_string();
        writer.write_record([token.as_str(), me.as_str(), them.as_str(), both.as_str()])?;
    }

    writer.flush()?;
    Ok(fs::metadata(file_path)?.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_word_frequencies_csv_layout() {
        let me = WordFrequencyTable::from_tokens(["hi", "there"]);
        let them = WordFrequencyTable::from_tokens(["hi", "hi"]);
        let both = WordFrequencyTable::from_tokens(["hi", "there", "hi", "hi"]);
        let frequencies = WordFrequencies { me, them, both };

        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("word_frequencies.csv");
        let bytes = write_word_frequencies_csv(&frequencies, &ContactIdentity::new("Alex"), &path)
            .expect("write");

        let content = std::fs::read_to_string(&path).expect("read");
        assert_eq!(bytes, content.len() as u64);
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines, vec!["Token,Me,Alex,Both", "hi,1,2,3", "there,1,0,1"]);
    }
}
