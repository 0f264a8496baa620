//! Per-sender and per-day aggregation of enriched messages.
//!
//! Every sender aggregate carries both participants. A sender with no
//! messages gets 0 for sums and counts and 0.0 for mean sentiment; that mean
//! is a presentation fallback, not a statistic derived from data.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;
use tracing::warn;

use crate::error::{InsightsError, Result};
use crate::models::{
    ContactIdentity, DailyPoint, DailySentiment, EnrichedMessage, Sender, SenderAggregate,
};

/// Fallback mean sentiment for a sender without messages
pub const ABSENT_SENDER_SENTIMENT: f64 = 0.0;

/// The four per-sender tables
#[derive(Debug, Clone, PartialEq)]
pub struct SenderAggregates {
    /// Total characters written
    pub character_counts: SenderAggregate<u64>,
    /// Number of messages sent
    pub message_counts: SenderAggregate<u64>,
    /// Mean sentiment of the sender's messages
    pub average_sentiment: SenderAggregate<f64>,
    /// Total emoji characters used
    pub emoji_totals: SenderAggregate<u64>,
}

#[derive(Debug, Default, Clone, Copy)]
struct GroupTotals {
    characters: u64,
    messages: u64,
    sentiment_sum: f64,
    emojis: u64,
}

/// Group messages by sender and compute sums, counts and means.
#[must_use]
pub fn aggregate(contact: &ContactIdentity, messages: &[EnrichedMessage]) -> SenderAggregates {
    let mut groups: HashMap<Sender, GroupTotals> = HashMap::new();
    for message in messages {
        let totals = groups.entry(message.sender.clone()).or_default();
        totals.characters += message.length as u64;
        totals.messages += 1;
        totals.sentiment_sum += message.sentiment;
        totals.emojis += message.emoji_count as u64;
    }

    let project = |f: fn(&GroupTotals) -> u64| -> HashMap<Sender, u64> {
        groups.iter().map(|(sender, totals)| (sender.clone(), f(totals))).collect()
    };
    let means: HashMap<Sender, f64> = groups
        .iter()
        .map(|(sender, totals)| (sender.clone(), totals.sentiment_sum / totals.messages as f64))
        .collect();

    SenderAggregates {
        character_counts: SenderAggregate::complete(contact, &project(|t| t.characters), 0),
        message_counts: SenderAggregate::complete(contact, &project(|t| t.messages), 0),
        average_sentiment: SenderAggregate::complete(contact, &means, ABSENT_SENDER_SENTIMENT),
        emoji_totals: SenderAggregate::complete(contact, &project(|t| t.emojis), 0),
    }
}

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%b %d, %Y %I:%M:%S %p",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

/// Parse an exported timestamp into a local date-time.
///
/// Values with an explicit offset keep the wall-clock time of that offset.
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.naive_local());
    }
    for format in DATE_TIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(parsed);
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
                return Ok(midnight);
            }
        }
    }
    Err(InsightsError::MalformedTimestamp(value.to_string()))
}

/// Mean sentiment per calendar day, in date order, without gap filling.
///
/// Messages whose timestamp does not parse are left out of the series and
/// counted in `skipped_timestamps`; they still count everywhere else.
#[must_use]
pub fn daily_sentiment(messages: &[EnrichedMessage]) -> DailySentiment {
    let mut days: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();
    let mut skipped_timestamps = 0;

    for message in messages {
        match parse_timestamp(&message.timestamp) {
            Ok(timestamp) => {
                let day = days.entry(timestamp.date()).or_insert((0.0, 0));
                day.0 += message.sentiment;
                day.1 += 1;
            }
            Err(err) => {
                warn!(error = %err, "Skipping message in daily sentiment");
                skipped_timestamps += 1;
            }
        }
    }

    let points = days
        .into_iter()
        .map(|(date, (sum, count))| DailyPoint {
            date,
            sentiment: sum / count as f64,
            messages: count,
        })
        .collect();

    DailySentiment {
        points,
        skipped_timestamps,
    }
}

/// A serializable `(sender, value)` row, `Me` first
#[derive(Debug, Clone, Serialize)]
pub struct AggregateRow<T> {
    /// Sender label
    pub sender: String,
    /// Aggregated value
    pub value: T,
}

/// Rows of an aggregate in presentation order
#[must_use]
pub fn aggregate_rows<T: Copy>(aggregate: &SenderAggregate<T>) -> Vec<AggregateRow<T>> {
    aggregate
        .rows()
        .into_iter()
        .map(|(sender, value)| AggregateRow {
            sender: sender.label().to_string(),
            value,
        })
        .collect()
}
