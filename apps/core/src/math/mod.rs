//! # Math Module
//!
//! Arithmetic evaluation and equation solving.
//!
//! ## Components
//! - `parser`: recursive-descent expression parser producing a small AST,
//!   shared by the restricted evaluator and the algebra solver
//! - `backend`: the `ExpressionBackend` capability (full symbolic tier vs.
//!   restricted arithmetic-only tier), selected once at agent construction
//! - `algebra`: natural-language "solve" commands over the parsed AST

pub mod algebra;
pub mod backend;
pub mod parser;

pub use backend::{default_backend, ExpressionBackend, RestrictedBackend};
#[cfg(feature = "symbolic")]
pub use backend::SymbolicBackend;
