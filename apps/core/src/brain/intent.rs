//! Intent classification using an ordered rule chain.
//!
//! Deterministic and order-sensitive: rules are evaluated top to bottom and
//! the first match wins. Keyword tables are static slices; the only regex is
//! the numeric/operator character class, compiled once at startup.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// Detected intent type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// Help request (exact "help", "h" or "?")
    Help,
    /// Session termination (exact "exit", "quit" or "q")
    Exit,
    /// Weather calculation (mentions weather, dew point, heat index, ...)
    Weather,
    /// Equation solving (starts with "solve")
    Algebra,
    /// Arithmetic expression (numeric text or math symbols)
    Math,
    /// FAQ lookup (support, price, refund, ...)
    Faq,
    /// Unknown/Default
    Unknown,
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl Intent {
    /// Returns a human-readable label for the intent
    pub fn label(&self) -> &'static str {
        match self {
            Intent::Help => "help",
            Intent::Exit => "exit",
            Intent::Weather => "weather",
            Intent::Algebra => "algebra",
            Intent::Math => "math",
            Intent::Faq => "faq",
            Intent::Unknown => "unknown",
        }
    }
}

/// Exact commands (trimmed, lower-cased) mapped to `Help`.
const HELP_COMMANDS: &[&str] = &["help", "h", "?"];

/// Exact commands mapped to `Exit`.
const EXIT_COMMANDS: &[&str] = &["exit", "quit", "q"];

/// Substrings that route to the weather calculator.
const WEATHER_KEYWORDS: &[&str] = &[
    "weather",
    "dew point",
    "dewpoint",
    "heat index",
    "wind chill",
    "feels like",
];

/// Substrings that suggest an arithmetic expression.
const MATH_SYMBOLS: &[&str] = &["+", "-", "*", "/", "sqrt", "sin", "cos", "^"];

/// Substrings that route to the FAQ matcher.
const FAQ_KEYWORDS: &[&str] = &[
    "support", "price", "refund", "contact", "hours", "password", "how to",
];

// Compiled once at startup; the pattern is a fixed literal so expect() cannot
// fire at runtime.
static MATH_ONLY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\d\.\s\+\-\*/\^%\(\)eE,]+$").expect("Invalid regex: math character class")
});

/// Intent classifier: the 7-step rule chain, first match wins.
pub struct IntentClassifier;

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentClassifier {
    /// Create a new intent classifier
    pub fn new() -> Self {
        Self
    }

    /// Classify the intent of a text.
    ///
    /// Rule order matters: "solve weather" is weather (rule 3 precedes
    /// rule 4), and any text containing a math symbol is math even when it
    /// also mentions an FAQ keyword.
    pub fn classify(&self, text: &str) -> Intent {
        let t = text.trim().to_lowercase();

        if HELP_COMMANDS.contains(&t.as_str()) {
            return Intent::Help;
        }
        if EXIT_COMMANDS.contains(&t.as_str()) {
            return Intent::Exit;
        }
        if WEATHER_KEYWORDS.iter().any(|k| t.contains(k)) {
            return Intent::Weather;
        }
        if t.starts_with("solve") {
            return Intent::Algebra;
        }
        if MATH_ONLY_RE.is_match(&t) || MATH_SYMBOLS.iter().any(|s| t.contains(s)) {
            return Intent::Math;
        }
        if FAQ_KEYWORDS.iter().any(|k| t.contains(k)) {
            return Intent::Faq;
        }
        Intent::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_help_commands() {
        let classifier = IntentClassifier::new();

        for input in ["help", "h", "?", "  HELP  "] {
            assert_eq!(
                classifier.classify(input),
                Intent::Help,
                "Expected Help for '{}'",
                input
            );
        }
    }

    #[test]
    fn test_exit_commands() {
        let classifier = IntentClassifier::new();

        for input in ["exit", "quit", "q", "EXIT"] {
            assert_eq!(classifier.classify(input), Intent::Exit);
        }
    }

    #[test]
    fn test_weather_keywords() {
        let classifier = IntentClassifier::new();

        let inputs = vec![
            "weather 32 65 8",
            "what is the dew point today",
            "DEWPOINT please",
            "heat index for 30 degrees",
            "wind chill?",
            "it feels like winter",
        ];
        for input in inputs {
            assert_eq!(
                classifier.classify(input),
                Intent::Weather,
                "Expected Weather for '{}'",
                input
            );
        }
    }

    #[test]
    fn test_solve_prefix_is_algebra() {
        let classifier = IntentClassifier::new();

        assert_eq!(classifier.classify("solve x+5=10"), Intent::Algebra);
        assert_eq!(
            classifier.classify("solve system: x+y=3; x-y=1"),
            Intent::Algebra
        );
        // Weather wins over algebra: rule 3 precedes rule 4.
        assert_eq!(classifier.classify("solve the weather"), Intent::Weather);
    }

    #[test]
    fn test_math_detection() {
        let classifier = IntentClassifier::new();

        let inputs = vec!["12/4+3", "2^3", "1 + 1", "sqrt(16)", "sin(0)", "42"];
        for input in inputs {
            assert_eq!(
                classifier.classify(input),
                Intent::Math,
                "Expected Math for '{}'",
                input
            );
        }
    }

    #[test]
    fn test_faq_keywords() {
        let classifier = IntentClassifier::new();

        let inputs = vec![
            "I forgot my password",
            "what are your opening hours",
            "refund policy",
            "how to get started",
        ];
        for input in inputs {
            assert_eq!(
                classifier.classify(input),
                Intent::Faq,
                "Expected Faq for '{}'",
                input
            );
        }
    }

    #[test]
    fn test_unknown_fallthrough() {
        let classifier = IntentClassifier::new();

        assert_eq!(classifier.classify("tell me a story"), Intent::Unknown);
        assert_eq!(classifier.classify("zzz qqq"), Intent::Unknown);
    }

    #[test]
    fn test_hyphen_counts_as_math_symbol() {
        let classifier = IntentClassifier::new();

        // "-" is in the math symbol table, so hyphenated text is math even
        // though it also mentions an FAQ keyword.
        assert_eq!(classifier.classify("self-service password"), Intent::Math);
    }
}
