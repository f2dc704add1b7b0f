//! # Brain Module
//!
//! Fast, rule-based analysis of user input. Classifies free text into an
//! intent tag BEFORE any handler runs, so the dispatcher can route the
//! request deterministically.
//!
//! ## Components
//! - `intent`: ordered keyword/pattern rule chain (no ML, pure matching)

pub mod intent;

pub use intent::{Intent, IntentClassifier};
