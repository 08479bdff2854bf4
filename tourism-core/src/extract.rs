//! Rule-based understanding of free-text travel queries.
//!
//! Place extraction runs an ordered list of independent rules and stops at
//! the first one that yields a name. Intent detection is a keyword scan.

use regex::Regex;
use std::sync::LazyLock;

use crate::Intent;

/// Capitalised words that start sentences rather than name places.
const STOPWORDS: &[&str] = &[
    "I", "I'm", "Let", "Let's", "What", "The", "And", "Are", "Can", "Go", "To", "In",
];

/// Queries with at most this many words are treated as a bare place name.
const SHORT_QUERY_WORDS: usize = 3;

/// Fallback extraction keeps at most this many capitalised words.
const FALLBACK_MAX_WORDS: usize = 2;

static PLACE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    ["going to (?:go to )?", "visit ", "trip to ", "in ", "to "]
        .iter()
        .map(|lead| {
            Regex::new(&format!(r"(?i){lead}([A-Z][a-zA-Z\s]+?)(?:,|\.|$|\s+what|\s+let)"))
                .expect("place pattern is valid")
        })
        .collect()
});

static LEADING_ARTICLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:(?:the|a|an)\b\s*)+").expect("article pattern is valid"));

const WEATHER_KEYWORDS: &[&str] = &[
    "temperature",
    "weather",
    "rain",
    "temperature there",
    "weather there",
    "temp",
    "how hot",
    "how cold",
    "degrees",
];

const PLACES_KEYWORDS: &[&str] = &[
    "places",
    "attractions",
    "visit",
    "tourist",
    "plan my trip",
    "can go",
    "sightseeing",
    "sights",
    "what to see",
    "where to go",
    "landmarks",
];

/// Words signalling the user wants everything once either topic is mentioned.
const CONJUNCTIONS: &[&str] = &["and", "also"];

type PlaceRule = fn(&str) -> Option<String>;

const PLACE_RULES: &[PlaceRule] = &[short_query, phrase_patterns, capitalised_fallback];

/// Extract the place the user is asking about, if any rule finds one.
pub fn extract_place_name(text: &str) -> Option<String> {
    let text = text.trim();
    PLACE_RULES.iter().find_map(|rule| rule(text))
}

fn strip_trailing_punctuation(word: &str) -> &str {
    word.trim_end_matches([',', '.', '?', '!'])
}

/// Capitalised words longer than two letters that are not sentence starters.
fn place_words(text: &str) -> Vec<&str> {
    text.split_whitespace()
        .filter(|w| w.chars().next().is_some_and(char::is_uppercase))
        .map(strip_trailing_punctuation)
        .filter(|w| w.chars().count() > 2)
        .filter(|w| !STOPWORDS.contains(w))
        .collect()
}

fn short_query(text: &str) -> Option<String> {
    if text.split_whitespace().count() > SHORT_QUERY_WORDS {
        return None;
    }

    let words = place_words(text);
    (!words.is_empty()).then(|| words.join(" "))
}

fn phrase_patterns(text: &str) -> Option<String> {
    PLACE_PATTERNS.iter().find_map(|pattern| {
        let captured = pattern.captures(text)?.get(1)?.as_str().trim();
        let place = LEADING_ARTICLE.replace(captured, "");
        let place = place.trim();
        (!place.is_empty()).then(|| place.to_string())
    })
}

fn capitalised_fallback(text: &str) -> Option<String> {
    let words = place_words(text);
    (!words.is_empty()).then(|| {
        words
            .into_iter()
            .take(FALLBACK_MAX_WORDS)
            .collect::<Vec<_>>()
            .join(" ")
    })
}

/// Decide whether the user wants weather, places or both.
pub fn determine_intent(text: &str) -> Intent {
    let lower = text.to_lowercase();
    let mentions = |keywords: &[&str]| keywords.iter().any(|k| lower.contains(k));

    let mut intent = Intent {
        weather: mentions(WEATHER_KEYWORDS),
        places: mentions(PLACES_KEYWORDS),
    };

    if mentions(CONJUNCTIONS) && (intent.weather || intent.places) {
        intent = Intent { weather: true, places: true };
    }

    if !intent.weather && !intent.places {
        intent.places = true;
    }

    intent
}
