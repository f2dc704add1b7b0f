//! Test Module
//!
//! Cross-module suites for the agent core.
//!
//! ## Test Categories
//! - `agent_tests`: dispatcher routing, fallback cascade, weather extraction
//! - `corpus_tests`: JSON corpus loading and failure handling
