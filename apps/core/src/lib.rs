//! # askbot-core
//!
//! Rule-based conversational dispatcher: free-text input is classified into
//! a fixed set of intents (help, exit, math, algebra, weather, faq, unknown)
//! and routed to a deterministic handler. No ML, no session state, no
//! persistence: every call is an independent request/response computation.
//!
//! ## Components
//! - `brain`: keyword/pattern intent classification
//! - `math`: arithmetic evaluation (two-tier backend) and equation solving
//! - `weather`: derived meteorological quantities
//! - `faq`: substring + token-overlap lookup over an injected corpus
//! - `agent`: the dispatcher tying it all together
//!
//! The sole entry point for embedding callers is [`Agent::respond`], which
//! always returns a string and never panics or errors past its boundary.

pub mod agent;
pub mod brain;
pub mod error;
pub mod faq;
pub mod math;
pub mod models;
mod numfmt;
pub mod weather;

#[cfg(test)]
mod tests;

pub use agent::Agent;
pub use error::AgentError;
pub use models::{FaqEntry, WeatherReading, WeatherReport};
