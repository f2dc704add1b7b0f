//! Expression evaluation backends.
//!
//! Two tiers behind one capability trait, selected once at agent
//! construction:
//!
//! - [`SymbolicBackend`] (feature `symbolic`): full grammar via `meval`,
//!   operator precedence, `sqrt`, `sin`, and friends. Also unlocks the
//!   algebra solver.
//! - [`RestrictedBackend`]: allow-listed characters only, evaluated by the
//!   crate's own recursive-descent parser with no access to names, functions
//!   or I/O. Algebra is unavailable in this tier.

use regex::Regex;
use std::sync::LazyLock;

use crate::error::AgentError;
use crate::math::parser;

/// Capability interface for arithmetic evaluation.
pub trait ExpressionBackend: Send + Sync {
    /// Short tier name for logs.
    fn name(&self) -> &'static str;

    /// Whether the equation solver can run on top of this backend.
    fn supports_algebra(&self) -> bool;

    /// Parses and numerically evaluates `expression` to a finite f64.
    fn evaluate(&self, expression: &str) -> Result<f64, AgentError>;
}

/// Characters the restricted tier accepts: digits, the arithmetic operators,
/// parentheses, scientific-notation markers, whitespace and comma.
static ALLOWED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9\.\+\-\*/\^%\(\)eE\s,]+$").expect("Invalid regex: allow-list")
});

/// Arithmetic-only evaluator used when the symbolic engine is compiled out.
pub struct RestrictedBackend;

impl ExpressionBackend for RestrictedBackend {
    fn name(&self) -> &'static str {
        "restricted"
    }

    fn supports_algebra(&self) -> bool {
        false
    }

    fn evaluate(&self, expression: &str) -> Result<f64, AgentError> {
        let trimmed = expression.trim();
        if trimmed.is_empty() {
            return Err(AgentError::EmptyExpression);
        }
        if !ALLOWED_RE.is_match(trimmed) {
            return Err(AgentError::Evaluation(
                "Expression contains invalid characters (enable the 'symbolic' feature for full support)."
                    .to_string(),
            ));
        }
        let expr = parser::parse(trimmed)
            .map_err(|e| AgentError::Evaluation(format!("Evaluation error: {}", e)))?;
        expr.eval_literal()
            .map_err(|e| AgentError::Evaluation(format!("Evaluation error: {}", e)))
    }
}

/// Full-tier evaluator delegating to the `meval` expression engine.
#[cfg(feature = "symbolic")]
pub struct SymbolicBackend;

#[cfg(feature = "symbolic")]
impl ExpressionBackend for SymbolicBackend {
    fn name(&self) -> &'static str {
        "symbolic"
    }

    fn supports_algebra(&self) -> bool {
        true
    }

    fn evaluate(&self, expression: &str) -> Result<f64, AgentError> {
        let trimmed = expression.trim();
        if trimmed.is_empty() {
            return Err(AgentError::EmptyExpression);
        }
        let value = meval::eval_str(trimmed).map_err(|e| {
            AgentError::Evaluation(format!("Could not parse expression: {}", e))
        })?;
        if !value.is_finite() {
            return Err(AgentError::Evaluation(
                "expression did not evaluate to a finite number".to_string(),
            ));
        }
        Ok(value)
    }
}

/// Picks the strongest backend compiled into this build.
pub fn default_backend() -> Box<dyn ExpressionBackend> {
    #[cfg(feature = "symbolic")]
    {
        Box::new(SymbolicBackend)
    }
    #[cfg(not(feature = "symbolic"))]
    {
        Box::new(RestrictedBackend)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restricted_basic_arithmetic() {
        let backend = RestrictedBackend;
        assert_eq!(backend.evaluate("12/4+3").expect("evaluates"), 6.0);
        assert_eq!(backend.evaluate("2^3").expect("evaluates"), 8.0);
        assert_eq!(backend.evaluate("10%4").expect("evaluates"), 2.0);
    }

    #[test]
    fn test_restricted_rejects_empty_before_parsing() {
        let backend = RestrictedBackend;
        assert_eq!(backend.evaluate("").unwrap_err(), AgentError::EmptyExpression);
        assert_eq!(
            backend.evaluate("   ").unwrap_err(),
            AgentError::EmptyExpression
        );
    }

    #[test]
    fn test_restricted_rejects_names_and_letters() {
        let backend = RestrictedBackend;
        assert!(backend.evaluate("sqrt(16)").is_err());
        assert!(backend.evaluate("import os").is_err());
        assert!(!backend.supports_algebra());
    }

    #[test]
    fn test_restricted_division_by_zero() {
        let backend = RestrictedBackend;
        let err = backend.evaluate("1/0").unwrap_err();
        assert!(matches!(err, AgentError::Evaluation(_)));
    }

    #[cfg(feature = "symbolic")]
    #[test]
    fn test_symbolic_functions_and_precedence() {
        let backend = SymbolicBackend;
        assert_eq!(backend.evaluate("sqrt(16)").expect("evaluates"), 4.0);
        assert_eq!(backend.evaluate("12/4+3").expect("evaluates"), 6.0);
        assert_eq!(backend.evaluate("2^3").expect("evaluates"), 8.0);
        assert!(backend.supports_algebra());
    }

    #[cfg(feature = "symbolic")]
    #[test]
    fn test_symbolic_rejects_non_finite_results() {
        let backend = SymbolicBackend;
        assert!(backend.evaluate("1/0").is_err());
        assert_eq!(
            backend.evaluate("").unwrap_err(),
            AgentError::EmptyExpression
        );
    }
}
