//! Equation solver for natural-language "solve" commands.
//!
//! Two recognized forms, case-insensitive:
//!
//! - `solve system: x+y=3; x-y=1` - simultaneous linear equations, solved by
//!   Gaussian elimination over the union of free variables.
//! - `solve <expr>[ for <var>]` - a single equation (or an expression set
//!   equal to 0), lowered to a polynomial in one unknown and solved for
//!   degree <= 2. Equations that are linear in several unknowns are solved
//!   symbolically for the target (`solve x+y=3 for x` gives `[3 - y]`);
//!   complex quadratic roots render as `a + b*i`.
//!
//! All internal failures are caught here and rendered as
//! `"Error solving algebra: <cause>"`; `None` strictly means "not an algebra
//! request" so the dispatcher can fall through. Variables are enumerated in
//! lexicographic order, so `solve x*y` without a `for` clause solves for the
//! alphabetically first unknown.

use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use crate::error::AgentError;
use crate::math::backend::ExpressionBackend;
use crate::math::parser::{self, Expr, Op};
use crate::numfmt::display_number;

/// Fixed response when the build carries no symbolic engine. There is no
/// restricted-tier fallback for algebra.
pub const ALGEBRA_UNAVAILABLE: &str =
    "Algebra solver not available (rebuild with the 'symbolic' feature).";

/// Guidance returned for malformed `solve system` syntax.
pub const SYSTEM_FORMAT_ERROR: &str = "System format error. Use: solve system: x+y=3; x-y=1";

static SOLVE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)solve\s+(.+?)(?:\s+for\s+([a-zA-Z]\w*))?$")
        .expect("Invalid regex: solve command")
});

const EPS: f64 = 1e-12;

/// Attempts to handle `text` as a solve command.
///
/// Returns `None` only when the text matches no solve pattern; every other
/// outcome (including internal failures) is a ready-to-show string.
pub fn solve(text: &str, backend: &dyn ExpressionBackend) -> Option<String> {
    if !backend.supports_algebra() {
        return Some(ALGEBRA_UNAVAILABLE.to_string());
    }

    let trimmed = text.trim();
    if trimmed.to_lowercase().starts_with("solve system") {
        return Some(solve_system(trimmed));
    }

    let caps = SOLVE_RE.captures(trimmed)?;
    let eq_part = caps.get(1).map(|m| m.as_str().trim())?;
    let var = caps.get(2).map(|m| m.as_str().to_string());
    Some(match solve_single(eq_part, var) {
        Ok(solutions) => format!("Solution: {}", solutions),
        Err(e) => format!("Error solving algebra: {}", e),
    })
}

// ---------------- Single equation ----------------

fn solve_single(eq_part: &str, var: Option<String>) -> Result<String, AgentError> {
    let (left, right) = match eq_part.split_once('=') {
        Some((l, r)) => (parser::parse(l)?, parser::parse(r)?),
        None => (parser::parse(eq_part)?, Expr::Number(0.0)),
    };

    let mut vars = BTreeSet::new();
    left.variables(&mut vars);
    right.variables(&mut vars);

    let target = match var {
        Some(name) => name,
        None => match vars.iter().next() {
            Some(name) => name.clone(),
            // Constant equation, nothing to solve for: empty solution set.
            None => return Ok("[]".to_string()),
        },
    };

    // An equation with no dependence on the target has no solutions in it.
    if !vars.contains(&target) {
        return Ok("[]".to_string());
    }
    if vars.len() > 1 {
        return solve_linear_symbolic(&left, &right, &target);
    }

    // left - right = 0, as a polynomial in the target variable.
    let lhs = to_poly(&left, &target)?;
    let rhs = to_poly(&right, &target)?;
    let mut poly = poly_sub(&lhs, &rhs);
    trim_poly(&mut poly);

    match poly.len() {
        0 | 1 => Ok("[]".to_string()),
        2 => {
            // b*x + c = 0
            let root = -poly[0] / poly[1];
            Ok(format!("[{}]", display_number(root)))
        }
        3 => Ok(solve_quadratic(poly[2], poly[1], poly[0])),
        _ => Err(AgentError::Algebra(
            "only linear and quadratic equations are supported".to_string(),
        )),
    }
}

fn solve_quadratic(a: f64, b: f64, c: f64) -> String {
    let disc = b * b - 4.0 * a * c;
    if disc.abs() < EPS {
        return format!("[{}]", display_number(-b / (2.0 * a)));
    }
    if disc > 0.0 {
        let sq = disc.sqrt();
        let mut r1 = (-b - sq) / (2.0 * a);
        let mut r2 = (-b + sq) / (2.0 * a);
        if r1 > r2 {
            std::mem::swap(&mut r1, &mut r2);
        }
        return format!("[{}, {}]", display_number(r1), display_number(r2));
    }
    let re = -b / (2.0 * a);
    let im = (-disc).sqrt() / (2.0 * a).abs();
    format!("[{}, {}]", fmt_complex(re, -im), fmt_complex(re, im))
}

fn fmt_complex(re: f64, im: f64) -> String {
    let im_s = display_number(im.abs());
    if re.abs() < EPS {
        return format!("{}{}*i", if im < 0.0 { "-" } else { "" }, im_s);
    }
    let sign = if im < 0.0 { '-' } else { '+' };
    format!("{} {} {}*i", display_number(re), sign, im_s)
}

/// Isolates the target in an equation that carries other unknowns. Only
/// linear dependence qualifies; the remainder is rendered symbolically, so
/// `solve x+y=3 for x` gives `[3 - y]`.
fn solve_linear_symbolic(left: &Expr, right: &Expr, target: &str) -> Result<String, AgentError> {
    let form = linear_form(left)?.sub(&linear_form(right)?);
    let pivot = form.coeffs.get(target).copied().unwrap_or(0.0);
    if pivot.abs() < EPS {
        // The target cancels out, so the equation does not constrain it.
        return Ok("[]".to_string());
    }
    let mut remainder = form;
    remainder.coeffs.remove(target);
    Ok(format!("[{}]", fmt_linear(&remainder.scale(-1.0 / pivot))))
}

/// Renders a linear combination, constant term first: `3 - y`, `4 - 2*y`.
fn fmt_linear(form: &LinearForm) -> String {
    let mut terms: Vec<(f64, Option<&str>)> = Vec::new();
    if form.constant.abs() >= EPS {
        terms.push((form.constant, None));
    }
    for (name, coeff) in &form.coeffs {
        if coeff.abs() >= EPS {
            terms.push((*coeff, Some(name.as_str())));
        }
    }
    if terms.is_empty() {
        return "0".to_string();
    }

    let mut out = String::new();
    for (i, (coeff, name)) in terms.iter().enumerate() {
        let magnitude = match name {
            Some(name) if (coeff.abs() - 1.0).abs() < EPS => (*name).to_string(),
            Some(name) => format!("{}*{}", display_number(coeff.abs()), name),
            None => display_number(coeff.abs()),
        };
        if i == 0 {
            if *coeff < 0.0 {
                out.push('-');
            }
        } else {
            out.push_str(if *coeff < 0.0 { " - " } else { " + " });
        }
        out.push_str(&magnitude);
    }
    out
}

// ---------------- Polynomial lowering ----------------

/// Coefficients in ascending degree order.
type Poly = Vec<f64>;

const MAX_DEGREE: usize = 8;

fn to_poly(expr: &Expr, var: &str) -> Result<Poly, AgentError> {
    match expr {
        Expr::Number(v) => Ok(vec![*v]),
        Expr::Var(name) => {
            if name == var {
                Ok(vec![0.0, 1.0])
            } else {
                Err(AgentError::Algebra(format!("unexpected symbol '{}'", name)))
            }
        }
        Expr::Neg(inner) => {
            let mut p = to_poly(inner, var)?;
            for c in &mut p {
                *c = -*c;
            }
            Ok(p)
        }
        Expr::Bin(op, left, right) => {
            let a = to_poly(left, var)?;
            let b = to_poly(right, var)?;
            match op {
                Op::Add => Ok(poly_add(&a, &b)),
                Op::Sub => Ok(poly_sub(&a, &b)),
                Op::Mul => poly_mul(&a, &b),
                Op::Div => {
                    let divisor = constant_of(&b).ok_or_else(|| {
                        AgentError::Algebra("division by an unknown is not supported".to_string())
                    })?;
                    if divisor == 0.0 {
                        return Err(AgentError::Algebra("division by zero".to_string()));
                    }
                    Ok(a.iter().map(|c| c / divisor).collect())
                }
                Op::Rem => {
                    let lhs = constant_of(&a);
                    let rhs = constant_of(&b);
                    match (lhs, rhs) {
                        (Some(x), Some(y)) if y != 0.0 => Ok(vec![x % y]),
                        _ => Err(AgentError::Algebra(
                            "'%' is not supported in equations".to_string(),
                        )),
                    }
                }
                Op::Pow => {
                    let exponent = constant_of(&b).ok_or_else(|| {
                        AgentError::Algebra("exponent must be a constant".to_string())
                    })?;
                    if exponent < 0.0 || exponent.fract() != 0.0 {
                        return Err(AgentError::Algebra(
                            "only non-negative integer exponents are supported".to_string(),
                        ));
                    }
                    let mut result = vec![1.0];
                    for _ in 0..exponent as usize {
                        result = poly_mul(&result, &a)?;
                    }
                    Ok(result)
                }
            }
        }
        Expr::Call(name, _) => Err(AgentError::Algebra(format!(
            "function '{}' is not supported in equations",
            name
        ))),
    }
}

fn constant_of(p: &Poly) -> Option<f64> {
    if p.iter().skip(1).all(|c| c.abs() < EPS) {
        Some(p.first().copied().unwrap_or(0.0))
    } else {
        None
    }
}

fn poly_add(a: &Poly, b: &Poly) -> Poly {
    let mut out = vec![0.0; a.len().max(b.len())];
    for (i, c) in a.iter().enumerate() {
        out[i] += c;
    }
    for (i, c) in b.iter().enumerate() {
        out[i] += c;
    }
    out
}

fn poly_sub(a: &Poly, b: &Poly) -> Poly {
    let mut out = vec![0.0; a.len().max(b.len())];
    for (i, c) in a.iter().enumerate() {
        out[i] += c;
    }
    for (i, c) in b.iter().enumerate() {
        out[i] -= c;
    }
    out
}

fn poly_mul(a: &Poly, b: &Poly) -> Result<Poly, AgentError> {
    if a.len() + b.len() > MAX_DEGREE + 2 {
        return Err(AgentError::Algebra("polynomial degree too high".to_string()));
    }
    let mut out = vec![0.0; a.len() + b.len() - 1];
    for (i, x) in a.iter().enumerate() {
        for (j, y) in b.iter().enumerate() {
            out[i + j] += x * y;
        }
    }
    Ok(out)
}

fn trim_poly(p: &mut Poly) {
    while p.len() > 1 && p.last().is_some_and(|c| c.abs() < EPS) {
        p.pop();
    }
    if p.len() == 1 && p[0].abs() < EPS {
        p.clear();
    }
}

// ---------------- Systems of equations ----------------

fn solve_system(text: &str) -> String {
    let Some((_, body)) = text.split_once(':') else {
        return SYSTEM_FORMAT_ERROR.to_string();
    };

    let mut forms = Vec::new();
    let mut vars = BTreeSet::new();
    for raw in body.split(';').map(str::trim).filter(|s| !s.is_empty()) {
        let Some((left, right)) = raw.split_once('=') else {
            return SYSTEM_FORMAT_ERROR.to_string();
        };
        let parsed = parser::parse(left)
            .and_then(|l| parser::parse(right).map(|r| (l, r)))
            .and_then(|(l, r)| {
                let lf = linear_form(&l)?;
                let rf = linear_form(&r)?;
                Ok(lf.sub(&rf))
            });
        match parsed {
            Ok(form) => {
                vars.extend(form.coeffs.keys().cloned());
                forms.push(form);
            }
            Err(e) => return format!("Error solving algebra: {}", e),
        }
    }
    if forms.is_empty() {
        return SYSTEM_FORMAT_ERROR.to_string();
    }

    let ordered: Vec<String> = vars.into_iter().collect();
    match solve_linear_system(&ordered, &forms) {
        Ok(values) => {
            let assignments: Vec<String> = ordered
                .iter()
                .zip(values.iter())
                .map(|(name, value)| format!("{}: {}", name, display_number(*value)))
                .collect();
            format!("Solution: [{{{}}}]", assignments.join(", "))
        }
        Err(e) => format!("Error solving algebra: {}", e),
    }
}

/// A linear combination of variables plus a constant, i.e. one equation side.
struct LinearForm {
    coeffs: BTreeMap<String, f64>,
    constant: f64,
}

impl LinearForm {
    fn number(v: f64) -> Self {
        Self {
            coeffs: BTreeMap::new(),
            constant: v,
        }
    }

    fn is_constant(&self) -> bool {
        self.coeffs.values().all(|c| c.abs() < EPS)
    }

    fn scale(&self, factor: f64) -> Self {
        Self {
            coeffs: self
                .coeffs
                .iter()
                .map(|(k, v)| (k.clone(), v * factor))
                .collect(),
            constant: self.constant * factor,
        }
    }

    fn add(&self, other: &Self) -> Self {
        let mut coeffs = self.coeffs.clone();
        for (k, v) in &other.coeffs {
            *coeffs.entry(k.clone()).or_insert(0.0) += v;
        }
        Self {
            coeffs,
            constant: self.constant + other.constant,
        }
    }

    fn sub(&self, other: &Self) -> Self {
        self.add(&other.scale(-1.0))
    }
}

fn linear_form(expr: &Expr) -> Result<LinearForm, AgentError> {
    match expr {
        Expr::Number(v) => Ok(LinearForm::number(*v)),
        Expr::Var(name) => {
            let mut coeffs = BTreeMap::new();
            coeffs.insert(name.clone(), 1.0);
            Ok(LinearForm {
                coeffs,
                constant: 0.0,
            })
        }
        Expr::Neg(inner) => Ok(linear_form(inner)?.scale(-1.0)),
        Expr::Bin(op, left, right) => {
            let a = linear_form(left)?;
            let b = linear_form(right)?;
            match op {
                Op::Add => Ok(a.add(&b)),
                Op::Sub => Ok(a.sub(&b)),
                Op::Mul => {
                    if a.is_constant() {
                        Ok(b.scale(a.constant))
                    } else if b.is_constant() {
                        Ok(a.scale(b.constant))
                    } else {
                        Err(AgentError::Algebra("equation is not linear".to_string()))
                    }
                }
                Op::Div => {
                    if b.is_constant() && b.constant != 0.0 {
                        Ok(a.scale(1.0 / b.constant))
                    } else {
                        Err(AgentError::Algebra(
                            "division by an unknown is not supported".to_string(),
                        ))
                    }
                }
                Op::Pow => {
                    if a.is_constant() && b.is_constant() {
                        Ok(LinearForm::number(a.constant.powf(b.constant)))
                    } else {
                        Err(AgentError::Algebra("equation is not linear".to_string()))
                    }
                }
                Op::Rem => {
                    if a.is_constant() && b.is_constant() && b.constant != 0.0 {
                        Ok(LinearForm::number(a.constant % b.constant))
                    } else {
                        Err(AgentError::Algebra(
                            "'%' is not supported in equations".to_string(),
                        ))
                    }
                }
            }
        }
        Expr::Call(name, _) => Err(AgentError::Algebra(format!(
            "function '{}' is not supported in equations",
            name
        ))),
    }
}

/// Gauss-Jordan elimination with partial pivoting. Requires exactly one
/// solution; underdetermined and inconsistent systems are errors.
fn solve_linear_system(vars: &[String], forms: &[LinearForm]) -> Result<Vec<f64>, AgentError> {
    let n = forms.len();
    let m = vars.len();
    if m == 0 {
        return Err(AgentError::Algebra("no variable to solve for".to_string()));
    }

    // form = 0  <=>  sum(coeff * var) = -constant
    let mut a = vec![vec![0.0; m + 1]; n];
    for (i, form) in forms.iter().enumerate() {
        for (j, name) in vars.iter().enumerate() {
            a[i][j] = form.coeffs.get(name).copied().unwrap_or(0.0);
        }
        a[i][m] = -form.constant;
    }

    let mut pivots: Vec<(usize, usize)> = Vec::new();
    let mut row = 0;
    for col in 0..m {
        if row == n {
            break;
        }
        let best = (row..n)
            .max_by(|&x, &y| {
                a[x][col]
                    .abs()
                    .partial_cmp(&a[y][col].abs())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .unwrap_or(row);
        if a[best][col].abs() < EPS {
            continue;
        }
        a.swap(row, best);
        let pivot = a[row][col];
        for k in col..=m {
            a[row][k] /= pivot;
        }
        for i in 0..n {
            if i != row && a[i][col].abs() > 0.0 {
                let factor = a[i][col];
                for k in col..=m {
                    a[i][k] -= factor * a[row][k];
                }
            }
        }
        pivots.push((row, col));
        row += 1;
    }

    if pivots.len() < m {
        return Err(AgentError::Algebra(
            "system has no unique solution".to_string(),
        ));
    }
    for leftover in a.iter().skip(row) {
        if leftover[m].abs() > 1e-9 {
            return Err(AgentError::Algebra("system is inconsistent".to_string()));
        }
    }

    let mut solution = vec![0.0; m];
    for &(r, c) in &pivots {
        solution[c] = a[r][m];
    }
    Ok(solution)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::backend::RestrictedBackend;

    struct AlgebraCapable;

    impl ExpressionBackend for AlgebraCapable {
        fn name(&self) -> &'static str {
            "test"
        }
        fn supports_algebra(&self) -> bool {
            true
        }
        fn evaluate(&self, _expression: &str) -> Result<f64, AgentError> {
            Err(AgentError::Evaluation("not used".to_string()))
        }
    }

    fn run(text: &str) -> Option<String> {
        solve(text, &AlgebraCapable)
    }

    #[test]
    fn test_linear_equation() {
        assert_eq!(run("solve x+5=10").as_deref(), Some("Solution: [5]"));
        assert_eq!(run("solve 2*x=7").as_deref(), Some("Solution: [3.5]"));
    }

    #[test]
    fn test_for_clause_picks_variable() {
        assert_eq!(run("solve y+2=5 for y").as_deref(), Some("Solution: [3]"));
        // The named variable does not appear: no solutions in it.
        assert_eq!(run("solve 3=3 for z").as_deref(), Some("Solution: []"));
    }

    #[test]
    fn test_expression_without_equals_is_set_to_zero() {
        assert_eq!(run("solve x^2-4").as_deref(), Some("Solution: [-2, 2]"));
        assert_eq!(run("solve 2*x-6").as_deref(), Some("Solution: [3]"));
    }

    #[test]
    fn test_quadratic_roots() {
        assert_eq!(
            run("solve x^2-5*x+6=0").as_deref(),
            Some("Solution: [2, 3]")
        );
        // Double root collapses to one value.
        assert_eq!(
            run("solve x^2-2*x+1=0").as_deref(),
            Some("Solution: [1]")
        );
        // Complex roots.
        assert_eq!(
            run("solve x^2+4").as_deref(),
            Some("Solution: [-2*i, 2*i]")
        );
    }

    #[test]
    fn test_degenerate_equations_have_no_solutions() {
        assert_eq!(run("solve 5=4 for x").as_deref(), Some("Solution: []"));
    }

    #[test]
    fn test_constant_equation_without_target_is_empty_set() {
        assert_eq!(run("solve 5").as_deref(), Some("Solution: []"));
        assert_eq!(run("solve 2+3=5").as_deref(), Some("Solution: []"));
    }

    #[test]
    fn test_system_of_two_equations() {
        assert_eq!(
            run("solve system: x+y=3; x-y=1").as_deref(),
            Some("Solution: [{x: 2, y: 1}]")
        );
    }

    #[test]
    fn test_system_format_errors() {
        assert_eq!(run("solve system x+y=3").as_deref(), Some(SYSTEM_FORMAT_ERROR));
        assert_eq!(
            run("solve system: x+y").as_deref(),
            Some(SYSTEM_FORMAT_ERROR)
        );
    }

    #[test]
    fn test_singular_system_is_an_error() {
        let out = run("solve system: x+y=2; 2*x+2*y=4").expect("handled");
        assert!(
            out.starts_with("Error solving algebra:"),
            "unexpected: {}",
            out
        );
    }

    #[test]
    fn test_symbolic_solution_for_named_target() {
        assert_eq!(run("solve x+y=3 for x").as_deref(), Some("Solution: [3 - y]"));
        assert_eq!(run("solve x+y=3 for y").as_deref(), Some("Solution: [3 - x]"));
        assert_eq!(
            run("solve 2*x+4*y=8 for x").as_deref(),
            Some("Solution: [4 - 2*y]")
        );
        assert_eq!(
            run("solve x-2*y-3 for x").as_deref(),
            Some("Solution: [3 + 2*y]")
        );
    }

    #[test]
    fn test_symbolic_solution_without_for_clause() {
        // Alphabetically first unknown becomes the target.
        assert_eq!(run("solve x+y").as_deref(), Some("Solution: [-y]"));
    }

    #[test]
    fn test_target_canceling_out_is_empty_set() {
        assert_eq!(run("solve x+y=x+2 for x").as_deref(), Some("Solution: []"));
    }

    #[test]
    fn test_nonlinear_extra_unknown_is_an_error() {
        let out = run("solve x+y^2=3 for x").expect("handled");
        assert!(out.starts_with("Error solving algebra:"), "unexpected: {}", out);
    }

    #[test]
    fn test_non_solve_text_falls_through() {
        assert_eq!(run("what is the capital of France"), None);
        assert_eq!(run("solve"), None);
    }

    #[test]
    fn test_unavailable_without_symbolic_backend() {
        let out = solve("solve x+5=10", &RestrictedBackend).expect("fixed message");
        assert_eq!(out, ALGEBRA_UNAVAILABLE);
        // Every call gets the same fixed message, even non-solve text.
        let out = solve("anything at all", &RestrictedBackend).expect("fixed message");
        assert_eq!(out, ALGEBRA_UNAVAILABLE);
    }
}
