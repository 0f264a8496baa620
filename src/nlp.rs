//! Text capabilities used by the feature extractor and lexical summarizer.
//!
//! Each capability sits behind a narrow trait so the pipeline can be driven
//! by fakes in tests. `NlpProcessor` is the default implementation of the
//! tokenizer, sentiment scorer and emoji classifier; part-of-speech tagging
//! lives in [`crate::pos`].

use std::collections::HashSet;

use anyhow::Result;
use regex::Regex;
use stop_words::{get, LANGUAGE};
use unicode_normalization::UnicodeNormalization;
use whatlang::{detect, Lang};

use crate::pos::LexiconTagger;

/// Polarity scoring for a piece of text
pub trait SentimentScorer {
    /// Polarity in [-1.0, 1.0]
    fn score(&self, text: &str) -> f64;
}

/// Membership test against a fixed emoji reference set
pub trait EmojiClassifier {
    /// Whether a single character is an emoji character
    fn is_emoji_char(&self, c: char) -> bool;

    /// Count emoji characters, one per matching `char`
    fn count_emojis(&self, text: &str) -> usize {
        text.chars().filter(|c| self.is_emoji_char(*c)).count()
    }
}

/// Splits text into lowercase tokens
pub trait Tokenizer {
    /// Ordered lowercase tokens
    fn tokenize(&self, text: &str) -> Vec<String>;
}

/// Assigns a part-of-speech tag to each token
pub trait PosTagger {
    /// One `(token, tag)` pair per input token, in order
    fn tag(&self, tokens: &[String]) -> Vec<(String, String)>;
}

/// The four text capabilities the pipeline calls into
pub struct NlpToolkit {
    /// Sentiment scorer
    pub sentiment: Box<dyn SentimentScorer>,
    /// Emoji classifier
    pub emoji: Box<dyn EmojiClassifier>,
    /// Tokenizer
    pub tokenizer: Box<dyn Tokenizer>,
    /// Part-of-speech tagger
    pub tagger: Box<dyn PosTagger>,
}

impl NlpToolkit {
    /// Toolkit backed by the built-in processor and tagger
    pub fn standard() -> Result<Self> {
        Ok(Self {
            sentiment: Box::new(NlpProcessor::new()?),
            emoji: Box::new(NlpProcessor::new()?),
            tokenizer: Box::new(NlpProcessor::new()?),
            tagger: Box::new(LexiconTagger::new()),
        })
    }
}

// Polarity lexicon, weights in [-1, 1]
const POSITIVE_WORDS: &[(&str, f64)] = &[
    ("good", 0.7),
    ("great", 0.8),
    ("excellent", 1.0),
    ("amazing", 0.6),
    ("wonderful", 1.0),
    ("fantastic", 0.4),
    ("happy", 0.8),
    ("joy", 0.8),
    ("love", 0.5),
    ("lovely", 0.5),
    ("like", 0.2),
    ("nice", 0.6),
    ("best", 1.0),
    ("better", 0.5),
    ("awesome", 1.0),
    ("perfect", 1.0),
    ("brilliant", 0.9),
    ("outstanding", 0.5),
    ("superb", 1.0),
    ("delightful", 1.0),
    ("pleased", 0.5),
    ("glad", 0.5),
    ("fun", 0.3),
    ("funny", 0.25),
    ("cool", 0.35),
    ("beautiful", 0.85),
    ("cute", 0.5),
    ("thanks", 0.2),
    ("thank", 0.2),
    ("excited", 0.4),
    ("thrilled", 0.6),
    ("grateful", 0.6),
    ("lucky", 0.33),
    ("successful", 0.75),
    ("win", 0.8),
    ("yay", 0.5),
];

const NEGATIVE_WORDS: &[(&str, f64)] = &[
    ("bad", -0.7),
    ("terrible", -1.0),
    ("awful", -1.0),
    ("horrible", -1.0),
    ("worst", -1.0),
    ("worse", -0.4),
    ("hate", -0.8),
    ("dislike", -0.5),
    ("poor", -0.4),
    ("disappointing", -0.6),
    ("sad", -0.5),
    ("angry", -0.5),
    ("upset", -0.5),
    ("frustrated", -0.7),
    ("annoyed", -0.4),
    ("annoying", -0.8),
    ("furious", -1.0),
    ("devastated", -0.8),
    ("depressed", -0.7),
    ("miserable", -1.0),
    ("hopeless", -0.6),
    ("worried", -0.3),
    ("anxious", -0.3),
    ("scared", -0.5),
    ("afraid", -0.6),
    ("sick", -0.7),
    ("tired", -0.4),
    ("sorry", -0.5),
    ("stupid", -0.8),
    ("boring", -1.0),
    ("disgusting", -1.0),
    ("pathetic", -1.0),
    ("useless", -0.5),
    ("wrong", -0.5),
];

// Multipliers applied to the next lexicon word
const INTENSIFIERS: &[(&str, f64)] = &[
    ("very", 1.3),
    ("extremely", 1.5),
    ("incredibly", 1.5),
    ("absolutely", 1.4),
    ("completely", 1.3),
    ("totally", 1.3),
    ("really", 1.2),
    ("so", 1.2),
    ("super", 1.3),
    ("quite", 1.1),
    ("pretty", 1.1),
    ("somewhat", 0.8),
    ("slightly", 0.7),
    ("barely", 0.5),
];

const NEGATIONS: &[&str] = &[
    "not", "no", "never", "none", "nothing", "nobody", "nowhere", "neither", "nor", "n't",
];

const CLITICS: &[&str] = &["'s", "'re", "'ve", "'ll", "'d", "'m"];

/// Default tokenizer, sentiment scorer and emoji classifier
pub struct NlpProcessor {
    token_regex: Regex,
    emoji_regex: Regex,
}

impl NlpProcessor {
    /// Create a processor, compiling its regular expressions
    pub fn new() -> Result<Self> {
        let token_regex = Regex::new(r"\w+(?:['’]\w+)*|\.\.\.|[^\w\s]")
            .map_err(|e| anyhow::anyhow!("Failed to compile token regex: {e}"))?;
        // Pictographs, skin-tone modifiers and regional indicator letters.
        // Joiners, keycaps and variation selectors are deliberately absent.
        let emoji_regex =
            Regex::new(r"^[\p{Extended_Pictographic}\p{Emoji_Modifier}\x{1F1E6}-\x{1F1FF}]$")
                .map_err(|e| anyhow::anyhow!("Failed to compile emoji regex: {e}"))?;

        Ok(Self {
            token_regex,
            emoji_regex,
        })
    }

    /// Normalize and lowercase text before tokenization
    #[must_use]
    pub fn normalize(&self, text: &str) -> String {
        text.nfc().collect::<String>().to_lowercase()
    }

    /// Split an apostrophe-bearing word into stem and clitic.
    fn split_clitic(word: &str) -> Vec<String> {
        let straight = word.replace('’', "'");
        if straight.len() > 3 && straight.ends_with("n't") {
            let stem = &straight[..straight.len() - 3];
            return vec![stem.to_string(), "n't".to_string()];
        }
        for clitic in CLITICS {
            if straight.len() > clitic.len() && straight.ends_with(clitic) {
                let stem = &straight[..straight.len() - clitic.len()];
                return vec![stem.to_string(), (*clitic).to_string()];
            }
        }
        vec![word.to_string()]
    }

    /// Analyze sentiment with intensifier and negation handling
    #[must_use]
    pub fn analyze_sentiment(&self, text: &str) -> f64 {
        let words = self.tokenize(text);
        let mut total_sentiment = 0.0;
        let mut word_count = 0.0;

        for (i, word) in words.iter().enumerate() {
            let weight = POSITIVE_WORDS
                .iter()
                .chain(NEGATIVE_WORDS)
                .find(|(w, _)| *w == word)
                .map(|(_, weight)| *weight);
            let Some(mut sentiment) = weight else {
                continue;
            };

            // Check for intensifiers before this word
            if i > 0 {
                if let Some((_, intensity)) =
                    INTENSIFIERS.iter().find(|(w, _)| *w == words[i - 1])
                {
                    sentiment *= intensity;
                }
            }

            // Check for negations up to two words back
            let has_negation = (i >= 1 && NEGATIONS.contains(&words[i - 1].as_str()))
                || (i >= 2 && NEGATIONS.contains(&words[i - 2].as_str()));

            if has_negation {
                sentiment *= -0.5;
            }

            total_sentiment += sentiment.clamp(-1.0, 1.0);
            word_count += 1.0;
        }

        if word_count == 0.0 {
            0.0
        } else {
            (total_sentiment / word_count).clamp(-1.0, 1.0)
        }
    }
}

impl Tokenizer for NlpProcessor {
    fn tokenize(&self, text: &str) -> Vec<String> {
        let normalized = self.normalize(text);
        self.token_regex
            .find_iter(&normalized)
            .flat_map(|m| {
                let token = m.as_str();
                if token.contains(['\'', '’']) {
                    Self::split_clitic(token)
                } else {
                    vec![token.to_string()]
                }
            })
            .collect()
    }
}

impl SentimentScorer for NlpProcessor {
    fn score(&self, text: &str) -> f64 {
        self.analyze_sentiment(text)
    }
}

impl EmojiClassifier for NlpProcessor {
    fn is_emoji_char(&self, c: char) -> bool {
        let mut buf = [0_u8; 4];
        self.emoji_regex.is_match(c.encode_utf8(&mut buf))
    }
}

/// Language detected for a body of text
#[derive(Debug, Clone, PartialEq)]
pub struct DetectedLanguage {
    /// ISO 639-3 code, e.g. "eng"
    pub code: String,
    /// Detector confidence in [0, 1]
    pub confidence: f64,
    /// Whether the lexicon sentiment scorer applies
    pub is_english: bool,
}

/// Detect the dominant language of `text`, `None` when undecidable
#[must_use]
pub fn detect_language(text: &str) -> Option<DetectedLanguage> {
    detect(text).map(|info| DetectedLanguage {
        code: info.lang().code().to_string(),
        confidence: info.confidence(),
        is_english: info.lang() == Lang::Eng,
    })
}

/// English stop words, lowercase
#[must_use]
pub fn english_stopwords() -> HashSet<String> {
    get(LANGUAGE::English)
        .iter()
        .map(|word| word.to_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn processor() -> NlpProcessor {
        NlpProcessor::new().expect("Failed to create NLP processor")
    }

    #[test]
    fn test_tokenize_splits_punctuation() {
        let tokens = processor().tokenize("Hello, World! See you...");
        assert_eq!(tokens, vec!["hello", ",", "world", "!", "see", "you", "..."]);
    }

    #[test]
    fn test_tokenize_splits_clitics() {
        let tokens = processor().tokenize("I don't think it's late");
        assert_eq!(tokens, vec!["i", "do", "n't", "think", "it", "'s", "late"]);
    }

    #[test]
    fn test_tokenize_emoji_is_own_token() {
        let tokens = processor().tokenize("ok😂");
        assert_eq!(tokens, vec!["ok", "😂"]);
    }

    #[test]
    fn test_emoji_classification() {
        let processor = processor();
        assert!(processor.is_emoji_char('😀'));
        assert!(processor.is_emoji_char('❤'));
        assert!(!processor.is_emoji_char('a'));
        assert!(!processor.is_emoji_char('7'));
        assert!(!processor.is_emoji_char('#'));
        assert!(!processor.is_emoji_char('\u{200D}'));
        assert!(!processor.is_emoji_char('\u{FE0F}'));
    }

    #[test]
    fn test_emoji_count_is_per_char() {
        // thumbs up + skin tone modifier counts twice
        assert_eq!(processor().count_emojis("nice 👍🏽"), 2);
        // flag made of two regional indicators
        assert_eq!(processor().count_emojis("🇫🇷"), 2);
        assert_eq!(processor().count_emojis("no emoji here"), 0);
    }

    #[test]
    fn test_sentiment_analysis() {
        let processor = processor();

        let positive_score = processor.analyze_sentiment("I love this, it's amazing and wonderful");
        assert!(positive_score > 0.0);

        let negative_score = processor.analyze_sentiment("This is terrible and I hate it");
        assert!(negative_score < 0.0);

        let neutral_score = processor.analyze_sentiment("The sky is blue and the grass is green");
        assert_eq!(neutral_score, 0.0);
    }

    #[test]
    fn test_sentiment_negation_flips() {
        let processor = processor();
        assert!(processor.analyze_sentiment("good") > 0.0);
        assert!(processor.analyze_sentiment("not good") < 0.0);
        assert!(processor.analyze_sentiment("that isn't good") < 0.0);
    }

    #[test]
    fn test_sentiment_is_bounded() {
        let score = processor().analyze_sentiment("extremely excellent absolutely perfect");
        assert!((-1.0..=1.0).contains(&score));
    }

    #[test]
    fn test_detect_language_and_stopwords() {
        let detected = detect_language(
            "This is a fairly long English sentence about going to the park tomorrow.",
        )
        .expect("language");
        assert!(detected.is_english);
        assert_eq!(detected.code, "eng");

        let stopwords = english_stopwords();
        assert!(stopwords.contains("the"));
        assert!(!stopwords.contains("pizza"));
    }
}
