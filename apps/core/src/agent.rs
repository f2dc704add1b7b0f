//! Dispatcher: classifies user input and routes it to the matching
//! component, cascading through the remaining handlers when nothing claims
//! the request.
//!
//! `respond` always returns a string and never fails; every component error
//! is rendered as user-facing text at this boundary.

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

use crate::brain::{Intent, IntentClassifier};
use crate::faq::{self, CorpusProvider};
use crate::math::algebra;
use crate::math::backend::{default_backend, ExpressionBackend};
use crate::models::{WeatherReading, WeatherReport};
use crate::numfmt::display_float;
use crate::weather;

/// Returned for empty/whitespace input, before any classification runs.
pub const EMPTY_PROMPT: &str = "Please enter a question.";

/// Fixed usage string for the `help` intent.
pub const HELP_TEXT: &str = "Supported: math expressions (e.g. 12/4+3), algebra (solve x+5=10), \
weather calculations (type 'weather' and then provide numbers), and FAQ questions.";

/// Usage hint when a weather request carries fewer than three numbers.
pub const WEATHER_USAGE: &str = "Weather tool needs numbers: temperature (°C), humidity (%) and \
wind speed (km/h). Example: 'weather 32 65 8' (means 32°C, 65% humidity, 8 km/h wind).";

/// Final fallback when the whole cascade comes up empty.
pub const FALLBACK: &str = "Sorry, I didn't understand that. Type 'help' for examples.";

/// Signed integers and decimals scanned out of weather requests.
static NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[-+]?\d*\.\d+|\d+").expect("Invalid regex: numeric tokens")
});

/// The conversational agent: one classifier, one expression backend and one
/// corpus provider, all chosen at construction. Stateless per call.
pub struct Agent {
    classifier: IntentClassifier,
    backend: Box<dyn ExpressionBackend>,
    corpus: Box<dyn CorpusProvider>,
}

impl Agent {
    /// Creates an agent with the strongest expression backend in this build.
    pub fn new(corpus: Box<dyn CorpusProvider>) -> Self {
        Self::with_backend(corpus, default_backend())
    }

    /// Creates an agent with an explicit backend (tests, degraded builds).
    pub fn with_backend(
        corpus: Box<dyn CorpusProvider>,
        backend: Box<dyn ExpressionBackend>,
    ) -> Self {
        debug!(backend = backend.name(), "agent constructed");
        Self {
            classifier: IntentClassifier::new(),
            backend,
            corpus,
        }
    }

    /// Sole entry point for the embedding caller: free text in, answer out.
    ///
    /// The `exit` intent deliberately has no branch here; it falls through to
    /// the cascade so the embedding caller (REPL, HTTP layer) can intercept
    /// it before reaching the core.
    pub fn respond(&self, user_input: &str) -> String {
        if user_input.trim().is_empty() {
            return EMPTY_PROMPT.to_string();
        }

        let intent = self.classifier.classify(user_input);
        debug!(%intent, "dispatching");

        match intent {
            Intent::Help => HELP_TEXT.to_string(),
            Intent::Math => match self.backend.evaluate(user_input) {
                Ok(value) => format!("The answer is {}", display_float(value)),
                Err(e) => format!("Could not evaluate expression: {}", e),
            },
            Intent::Algebra => algebra::solve(user_input, self.backend.as_ref())
                .unwrap_or_else(|| self.cascade(user_input)),
            Intent::Weather => match self.weather_report(user_input) {
                Some(report) => report.to_string(),
                None => WEATHER_USAGE.to_string(),
            },
            Intent::Exit | Intent::Faq | Intent::Unknown => self.cascade(user_input),
        }
    }

    /// Structured variant of the weather path, for callers that want the
    /// record instead of the formatted text. Returns `None` when fewer than
    /// three numeric tokens are present.
    pub fn weather_report(&self, text: &str) -> Option<WeatherReport> {
        let numbers: Vec<f64> = NUMBER_RE
            .find_iter(text)
            .filter_map(|m| m.as_str().parse().ok())
            .collect();
        if numbers.len() < 3 {
            return None;
        }
        let reading = WeatherReading {
            temperature_c: numbers[0],
            humidity_percent: numbers[1],
            wind_kmh: numbers[2],
        };
        Some(weather::build_report(&reading))
    }

    /// Fallback chain for faq/unknown (and unclaimed algebra) requests:
    /// FAQ, then arithmetic (failures swallowed), then algebra, then FAQ
    /// once more as a safety net, then a fixed apology. The corpus is read
    /// fresh for each FAQ pass.
    fn cascade(&self, user_input: &str) -> String {
        if let Some(hit) = faq::match_faq(user_input, &self.corpus.load()) {
            return hit;
        }
        if let Ok(value) = self.backend.evaluate(user_input) {
            return format!("The answer is {}", display_float(value));
        }
        if let Some(answer) = algebra::solve(user_input, self.backend.as_ref()) {
            return answer;
        }
        if let Some(hit) = faq::match_faq(user_input, &self.corpus.load()) {
            return hit;
        }
        FALLBACK.to_string()
    }
}
