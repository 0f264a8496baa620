//! Lexicon and suffix based part-of-speech tagging with Penn Treebank tags.

use std::collections::HashMap;

use crate::nlp::PosTagger;

const CLOSED_CLASS: &[(&str, &str)] = &[
    // determiners
    ("the", "DT"),
    ("a", "DT"),
    ("an", "DT"),
    ("this", "DT"),
    ("that", "DT"),
    ("these", "DT"),
    ("those", "DT"),
    ("every", "DT"),
    ("some", "DT"),
    ("any", "DT"),
    ("all", "DT"),
    // pronouns
    ("i", "PRP"),
    ("you", "PRP"),
    ("he", "PRP"),
    ("she", "PRP"),
    ("it", "PRP"),
    ("we", "PRP"),
    ("they", "PRP"),
    ("me", "PRP"),
    ("him", "PRP"),
    ("us", "PRP"),
    ("them", "PRP"),
    ("u", "PRP"),
    ("my", "PRP$"),
    ("your", "PRP$"),
    ("his", "PRP$"),
    ("her", "PRP$"),
    ("its", "PRP$"),
    ("our", "PRP$"),
    ("their", "PRP$"),
    // prepositions and subordinators
    ("in", "IN"),
    ("on", "IN"),
    ("at", "IN"),
    ("of", "IN"),
    ("for", "IN"),
    ("with", "IN"),
    ("from", "IN"),
    ("by", "IN"),
    ("about", "IN"),
    ("into", "IN"),
    ("after", "IN"),
    ("before", "IN"),
    ("if", "IN"),
    ("because", "IN"),
    ("since", "IN"),
    ("than", "IN"),
    ("to", "TO"),
    // conjunctions
    ("and", "CC"),
    ("or", "CC"),
    ("but", "CC"),
    ("nor", "CC"),
    // modals
    ("can", "MD"),
    ("could", "MD"),
    ("will", "MD"),
    ("would", "MD"),
    ("shall", "MD"),
    ("should", "MD"),
    ("may", "MD"),
    ("might", "MD"),
    ("must", "MD"),
    ("wo", "MD"),
    ("ca", "MD"),
    ("'ll", "MD"),
    // auxiliaries
    ("is", "VBZ"),
    ("'s", "VBZ"),
    ("are", "VBP"),
    ("'re", "VBP"),
    ("am", "VBP"),
    ("'m", "VBP"),
    ("was", "VBD"),
    ("were", "VBD"),
    ("be", "VB"),
    ("been", "VBN"),
    ("being", "VBG"),
    ("has", "VBZ"),
    ("have", "VBP"),
    ("'ve", "VBP"),
    ("had", "VBD"),
    ("'d", "MD"),
    ("does", "VBZ"),
    ("do", "VBP"),
    ("did", "VBD"),
    // adverbs
    ("not", "RB"),
    ("n't", "RB"),
    ("very", "RB"),
    ("really", "RB"),
    ("so", "RB"),
    ("too", "RB"),
    ("just", "RB"),
    ("also", "RB"),
    ("now", "RB"),
    ("then", "RB"),
    ("here", "RB"),
    ("there", "EX"),
    // wh-words
    ("what", "WP"),
    ("who", "WP"),
    ("which", "WDT"),
    ("where", "WRB"),
    ("when", "WRB"),
    ("why", "WRB"),
    ("how", "WRB"),
    // interjections common in chat
    ("hi", "UH"),
    ("hello", "UH"),
    ("hey", "UH"),
    ("yo", "UH"),
    ("ok", "UH"),
    ("okay", "UH"),
    ("lol", "UH"),
    ("haha", "UH"),
    ("yes", "UH"),
    ("yeah", "UH"),
    ("no", "DT"),
    ("oh", "UH"),
    ("thanks", "UH"),
];

const SUFFIX_RULES: &[(&str, &str)] = &[
    ("ing", "VBG"),
    ("ed", "VBD"),
    ("ly", "RB"),
    ("tion", "NN"),
    ("ment", "NN"),
    ("ness", "NN"),
    ("ity", "NN"),
    ("ous", "JJ"),
    ("ful", "JJ"),
    ("able", "JJ"),
    ("ible", "JJ"),
    ("ive", "JJ"),
    ("less", "JJ"),
    ("ic", "JJ"),
    ("al", "JJ"),
    ("est", "JJS"),
];

/// Stateless tagger; each call is independent of earlier calls
#[derive(Debug, Clone)]
pub struct LexiconTagger {
    lexicon: HashMap<&'static str, &'static str>,
}

impl Default for LexiconTagger {
    fn default() -> Self {
        Self::new()
    }
}

impl LexiconTagger {
    /// Create a tagger with the built-in lexicon
    #[must_use]
    pub fn new() -> Self {
        Self {
            lexicon: CLOSED_CLASS.iter().copied().collect(),
        }
    }

    fn tag_token(&self, token: &str, previous: Option<&str>) -> &'static str {
        if let Some(&tag) = self.lexicon.get(token) {
            return tag;
        }

        let mut chars = token.chars();
        let Some(first) = chars.next() else {
            return "SYM";
        };

        if first.is_ascii_digit() && chars.all(|c| c.is_ascii_digit() || c == '.' || c == ',') {
            return "CD";
        }
        if !token.chars().any(char::is_alphanumeric) {
            return punctuation_tag(token);
        }

        // base verb after "to" or a modal
        if matches!(previous, Some("TO" | "MD")) {
            return "VB";
        }

        if token.chars().count() > 3 {
            for &(suffix, tag) in SUFFIX_RULES {
                if token.ends_with(suffix) {
                    return tag;
                }
            }
            if token.ends_with('s') && !token.ends_with("ss") {
                return "NNS";
            }
        }

        "NN"
    }
}

fn punctuation_tag(token: &str) -> &'static str {
    match token {
        "." | "!" | "?" => ".",
        "," => ",",
        ":" | ";" | "..." | "-" => ":",
        "(" | "[" | "{" => "(",
        ")" | "]" | "}" => ")",
        "\"" | "'" | "`" => "''",
        "$" | "€" | "£" => "$",
        "#" => "#",
        _ => "SYM",
    }
}

impl PosTagger for LexiconTagger {
    fn tag(&self, tokens: &[String]) -> Vec<(String, String)> {
        let mut previous: Option<&str> = None;
        tokens
            .iter()
            .map(|token| {
                let tag = self.tag_token(token, previous);
                previous = Some(tag);
                (token.clone(), tag.to_string())
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(tokens: &[&str]) -> Vec<String> {
        let tokens: Vec<String> = tokens.iter().map(ToString::to_string).collect();
        LexiconTagger::new()
            .tag(&tokens)
            .into_iter()
            .map(|(_, tag)| tag)
            .collect()
    }

    #[test]
    fn test_closed_class_words() {
        assert_eq!(tags(&["i", "am", "in", "the", "house"]), vec!["PRP", "VBP", "IN", "DT", "NN"]);
    }

    #[test]
    fn test_punctuation_and_numbers() {
        assert_eq!(tags(&["hi", ",", "42", "!", "😂"]), vec!["UH", ",", "CD", ".", "SYM"]);
    }

    #[test]
    fn test_verb_after_modal_and_to() {
        assert_eq!(tags(&["we", "should", "eat"]), vec!["PRP", "MD", "VB"]);
        assert_eq!(tags(&["going", "to", "run"]), vec!["VBG", "TO", "VB"]);
    }

    #[test]
    fn test_suffix_heuristics() {
        assert_eq!(tags(&["quickly", "dogs", "beautiful"]), vec!["RB", "NNS", "JJ"]);
    }

    #[test]
    fn test_output_pairs_tokens_in_order() {
        let tokens = vec!["hey".to_string(), "you".to_string()];
        let tagged = LexiconTagger::new().tag(&tokens);
        assert_eq!(tagged.len(), 2);
        assert_eq!(tagged[0].0, "hey");
        assert_eq!(tagged[1].0, "you");
    }
}
