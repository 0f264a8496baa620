//! Property tests for the aggregation and word-frequency invariants

use proptest::prelude::*;
use txt_insights::aggregate::{aggregate, aggregate_rows, daily_sentiment};
use txt_insights::lexical::summarize;
use txt_insights::models::{ContactIdentity, EnrichedMessage, Sender};
use txt_insights::NlpProcessor;

fn message(from_me: bool, text: String, sentiment: f64, day: u32, emojis: usize) -> EnrichedMessage {
    let sender = if from_me {
        Sender::Me
    } else {
        Sender::Contact(ContactIdentity::new("Alex"))
    };
    EnrichedMessage {
        sender,
        length: text.chars().count(),
        text,
        timestamp: format!("2024-03-{day:02} 12:00:00"),
        sentiment,
        emoji_count: emojis,
        tokens: Vec::new(),
        pos_tags: Vec::new(),
    }
}

fn messages_strategy() -> impl Strategy<Value = Vec<EnrichedMessage>> {
    prop::collection::vec(
        (any::<bool>(), "[a-z]{1,6}( [a-z]{1,6}){0,4}", -1.0_f64..=1.0, 1_u32..=28, 0_usize..4),
        0..40,
    )
    .prop_map(|rows| {
        rows.into_iter()
            .map(|(from_me, text, sentiment, day, emojis)| message(from_me, text, sentiment, day, emojis))
            .collect()
    })
}

proptest! {
    #[test]
    fn every_aggregate_has_exactly_me_then_contact(messages in messages_strategy()) {
        let alex = ContactIdentity::new("Alex");
        let aggregates = aggregate(&alex, &messages);

        for labels in [
            aggregate_rows(&aggregates.character_counts).into_iter().map(|r| r.sender).collect::<Vec<_>>(),
            aggregate_rows(&aggregates.message_counts).into_iter().map(|r| r.sender).collect(),
            aggregate_rows(&aggregates.average_sentiment).into_iter().map(|r| r.sender).collect(),
            aggregate_rows(&aggregates.emoji_totals).into_iter().map(|r| r.sender).collect(),
        ] {
            prop_assert_eq!(labels, vec!["Me".to_string(), "Alex".to_string()]);
        }
    }

    #[test]
    fn sums_and_counts_cover_every_message(messages in messages_strategy()) {
        let alex = ContactIdentity::new("Alex");
        let aggregates = aggregate(&alex, &messages);

        let characters: u64 = messages.iter().map(|m| m.length as u64).sum();
        let emojis: u64 = messages.iter().map(|m| m.emoji_count as u64).sum();
        prop_assert_eq!(aggregates.message_counts.me() + aggregates.message_counts.them(), messages.len() as u64);
        prop_assert_eq!(aggregates.character_counts.me() + aggregates.character_counts.them(), characters);
        prop_assert_eq!(aggregates.emoji_totals.me() + aggregates.emoji_totals.them(), emojis);
        prop_assert!((-1.0..=1.0).contains(&aggregates.average_sentiment.me()));
        prop_assert!((-1.0..=1.0).contains(&aggregates.average_sentiment.them()));
    }

    #[test]
    fn aggregation_is_deterministic(messages in messages_strategy()) {
        let alex = ContactIdentity::new("Alex");
        prop_assert_eq!(aggregate(&alex, &messages), aggregate(&alex, &messages));
        prop_assert_eq!(daily_sentiment(&messages), daily_sentiment(&messages));
    }

    #[test]
    fn daily_series_is_ordered_and_complete(messages in messages_strategy()) {
        let daily = daily_sentiment(&messages);

        prop_assert_eq!(daily.skipped_timestamps, 0);
        prop_assert!(daily.points.windows(2).all(|pair| pair[0].date < pair[1].date));
        prop_assert_eq!(daily.points.iter().map(|p| p.messages).sum::<usize>(), messages.len());
        for point in &daily.points {
            prop_assert!((-1.0..=1.0).contains(&point.sentiment));
        }
    }

    #[test]
    fn combined_word_table_is_the_sum_of_both_sides(messages in messages_strategy()) {
        let processor = NlpProcessor::new().expect("processor");
        let frequencies = summarize(&messages, &processor);

        prop_assert_eq!(frequencies.both.total(), frequencies.me.total() + frequencies.them.total());
        for (token, count) in frequencies.both.iter() {
            prop_assert_eq!(count, frequencies.me.count(token) + frequencies.them.count(token));
        }
    }
}
