//! Data models for conversation analysis
//!
//! This module contains the data structures that flow between the pipeline
//! stages: raw rows as loaded from disk, enriched per-message records, and
//! the per-sender and per-day summaries built from them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Label used for self-authored messages everywhere in reports
pub const ME_LABEL: &str = "Me";

/// Direction of a message as recorded by the exporting tool
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Sent by the phone's owner
    Outgoing,
    /// Received from the contact
    Incoming,
    /// Any other value found in the direction column
    Other(String),
}

impl Direction {
    /// Parse a direction cell, treating only `outgoing_label` as self.
    #[must_use]
    pub fn parse(value: &str, outgoing_label: &str) -> Self {
        if value == outgoing_label {
            Self::Outgoing
        } else if value == "Incoming" {
            Self::Incoming
        } else {
            Self::Other(value.to_string())
        }
    }
}

/// One row from a source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMessage {
    /// Chat session identifier, usually the contact's display name
    pub chat_session: String,
    /// Message direction
    pub direction: Direction,
    /// Message text; `None` when the cell was empty
    pub text: Option<String>,
    /// Timestamp exactly as found in the file
    pub timestamp: String,
}

/// Display name of the non-self participant, fixed once per run
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContactIdentity(String);

impl ContactIdentity {
    /// Fallback used when the first row carries a blank chat session
    pub const UNKNOWN: &'static str = "Unknown contact";

    /// Create an identity from a chat-session value, kept as given unless blank
    #[must_use]
    pub fn new(name: &str) -> Self {
        if name.trim().is_empty() {
            Self(Self::UNKNOWN.to_string())
        } else {
            Self(name.to_string())
        }
    }

    /// The contact's display name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContactIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Author of a message
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Sender {
    /// The phone's owner
    Me,
    /// The tracked contact
    Contact(ContactIdentity),
}

impl Sender {
    /// Assign a sender from a direction; only `Outgoing` is self.
    #[must_use]
    pub fn from_direction(direction: &Direction, contact: &ContactIdentity) -> Self {
        match direction {
            Direction::Outgoing => Self::Me,
            Direction::Incoming | Direction::Other(_) => Self::Contact(contact.clone()),
        }
    }

    /// Whether the message was self-authored
    #[must_use]
    pub const fn is_me(&self) -> bool {
        matches!(self, Self::Me)
    }

    /// Label used in tables and charts
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Me => ME_LABEL,
            Self::Contact(contact) => contact.name(),
        }
    }
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A message with derived linguistic and affective features
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedMessage {
    /// Author of the message
    pub sender: Sender,
    /// Message text, never empty
    pub text: String,
    /// Timestamp exactly as found in the file
    pub timestamp: String,
    /// Character (code point) count of the text
    pub length: usize,
    /// Polarity in [-1.0, 1.0]
    pub sentiment: f64,
    /// Number of emoji characters in the text
    pub emoji_count: usize,
    /// Lowercase word tokens
    pub tokens: Vec<String>,
    /// Part-of-speech tag per token
    pub pos_tags: Vec<(String, String)>,
}

/// A per-sender scalar with both senders always present
#[derive(Debug, Clone, PartialEq)]
pub struct SenderAggregate<T> {
    contact: ContactIdentity,
    me: T,
    them: T,
}

impl<T: Copy> SenderAggregate<T> {
    /// Build an aggregate from explicit values for both senders
    #[must_use]
    pub fn new(contact: ContactIdentity, me: T, them: T) -> Self {
        Self { contact, me, them }
    }

    /// Build an aggregate from grouped values, filling an absent sender with `fallback`.
    #[must_use]
    pub fn complete(contact: &ContactIdentity, groups: &HashMap<Sender, T>, fallback: T) -> Self {
        let me = groups.get(&Sender::Me).copied().unwrap_or(fallback);
        let them = groups
            .get(&Sender::Contact(contact.clone()))
            .copied()
            .unwrap_or(fallback);
        Self::new(contact.clone(), me, them)
    }

    /// Value for self-authored messages
    #[must_use]
    pub fn me(&self) -> T {
        self.me
    }

    /// Value for the contact's messages
    #[must_use]
    pub fn them(&self) -> T {
        self.them
    }

    /// The contact this aggregate belongs to
    #[must_use]
    pub fn contact(&self) -> &ContactIdentity {
        &self.contact
    }

    /// Both rows in presentation order, `Me` first
    #[must_use]
    pub fn rows(&self) -> [(Sender, T); 2] {
        [
            (Sender::Me, self.me),
            (Sender::Contact(self.contact.clone()), self.them),
        ]
    }
}

/// Token occurrence counts with first-seen order retained for stable ranking
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordFrequencyTable {
    entries: Vec<(String, u64)>,
    index: HashMap<String, usize>,
}

impl WordFrequencyTable {
    /// Create an empty table
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Count every token of a sequence
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut table = Self::new();
        for token in tokens {
            table.add(token.as_ref());
        }
        table
    }

    /// Record one occurrence of a token
    pub fn add(&mut self, token: &str) {
        if let Some(&slot) = self.index.get(token) {
            self.entries[slot].1 += 1;
        } else {
            self.index.insert(token.to_string(), self.entries.len());
            self.entries.push((token.to_string(), 1));
        }
    }

    /// Occurrences of a token, zero when unseen
    #[must_use]
    pub fn count(&self, token: &str) -> u64 {
        self.index.get(token).map_or(0, |&slot| self.entries[slot].1)
    }

    /// Number of distinct tokens
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no token has been counted
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts
    #[must_use]
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, count)| count).sum()
    }

    /// Entries in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries.iter().map(|(token, count)| (token.as_str(), *count))
    }

    /// Every entry ranked by count, ties in first-seen order
    #[must_use]
    pub fn ranked(&self) -> Vec<(String, u64)> {
        let mut ranked = self.entries.clone();
        // sort_by is stable, so equal counts keep first-seen order
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }

    /// The `n` most frequent entries
    #[must_use]
    pub fn most_common(&self, n: usize) -> Vec<(String, u64)> {
        let mut ranked = self.ranked();
        ranked.truncate(n);
        ranked
    }
}

/// Mean sentiment for one calendar day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyPoint {
    /// Calendar day
    pub date: NaiveDate,
    /// Mean sentiment of that day's messages
    pub sentiment: f64,
    /// Number of messages that day
    pub messages: usize,
}

/// Chronological daily sentiment series; days without messages are absent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailySentiment {
    /// One point per day present in the batch
    pub points: Vec<DailyPoint>,
    /// Messages left out because their timestamp did not parse
    pub skipped_timestamps: usize,
}
