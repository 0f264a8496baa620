//! Word-frequency tables per sender and overall, plus the tag distribution.

use crate::models::{EnrichedMessage, WordFrequencyTable};
use crate::nlp::Tokenizer;

/// Word frequencies for each sender and for the whole conversation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordFrequencies {
    /// Tokens from self-authored messages
    pub me: WordFrequencyTable,
    /// Tokens from the contact's messages
    pub them: WordFrequencyTable,
    /// Tokens from every message
    pub both: WordFrequencyTable,
}

/// Join message texts with single spaces.
fn text_pool<'a>(messages: impl Iterator<Item = &'a EnrichedMessage>) -> String {
    messages
        .map(|message| message.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Build word-frequency tables from the three text pools.
///
/// Each pool is joined and tokenized as a whole, independently of the
/// per-message tokens.
#[must_use]
pub fn summarize(messages: &[EnrichedMessage], tokenizer: &dyn Tokenizer) -> WordFrequencies {
    let count = |pool: String| WordFrequencyTable::from_tokens(tokenizer.tokenize(&pool.to_lowercase()));

    WordFrequencies {
        me: count(text_pool(messages.iter().filter(|m| m.sender.is_me()))),
        them: count(text_pool(messages.iter().filter(|m| !m.sender.is_me()))),
        both: count(text_pool(messages.iter())),
    }
}

/// Count part-of-speech tags across all messages, first-seen order kept for ties.
#[must_use]
pub fn tag_distribution(messages: &[EnrichedMessage]) -> WordFrequencyTable {
    WordFrequencyTable::from_tokens(
        messages
            .iter()
            .flat_map(|message| message.pos_tags.iter().map(|(_, tag)| tag.as_str())),
    )
}
