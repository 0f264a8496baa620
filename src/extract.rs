//! Feature extraction: turns raw rows into enriched per-message records.

use tracing::{debug, info};

use crate::error::{InsightsError, Result};
use crate::models::{ContactIdentity, EnrichedMessage, RawMessage, Sender};
use crate::nlp::NlpToolkit;

/// Outcome of feature extraction for one batch
#[derive(Debug, Clone)]
pub struct Extraction {
    /// Contact derived from the first row
    pub contact: ContactIdentity,
    /// Enriched messages in input order
    pub messages: Vec<EnrichedMessage>,
    /// Rows dropped because their text was missing
    pub dropped_rows: usize,
}

/// Derive the contact identity and enrich every row that carries text.
///
/// The identity comes from the first row even when that row has no text.
/// Fails with [`InsightsError::EmptyBatch`] when there are no rows at all or
/// none of them has text.
pub fn extract(rows: &[RawMessage], toolkit: &NlpToolkit) -> Result<Extraction> {
    let first = rows.first().ok_or(InsightsError::EmptyBatch)?;
    let contact = ContactIdentity::new(&first.chat_session);
    debug!(contact = %contact, "Derived contact identity");

    let messages: Vec<EnrichedMessage> = rows
        .iter()
        .filter_map(|row| {
            let text = row.text.as_deref().filter(|text| !text.is_empty())?;
            Some(enrich(row, text, &contact, toolkit))
        })
        .collect();

    if messages.is_empty() {
        return Err(InsightsError::EmptyBatch);
    }

    let dropped_rows = rows.len() - messages.len();
    info!(
        contact = %contact,
        messages = messages.len(),
        dropped = dropped_rows,
        "Extracted message features"
    );

    Ok(Extraction {
        contact,
        messages,
        dropped_rows,
    })
}

fn enrich(
    row: &RawMessage,
    text: &str,
    contact: &ContactIdentity,
    toolkit: &NlpToolkit,
) -> EnrichedMessage {
    let tokens = toolkit.tokenizer.tokenize(text);
    let pos_tags = toolkit.tagger.tag(&tokens);

    EnrichedMessage {
        sender: Sender::from_direction(&row.direction, contact),
        text: text.to_string(),
        timestamp: row.timestamp.clone(),
        length: text.chars().count(),
        sentiment: toolkit.sentiment.score(text),
        emoji_count: toolkit.emoji.count_emojis(text),
        tokens,
        pos_tags,
    }
}
