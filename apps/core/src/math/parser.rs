//! Recursive-descent parser for arithmetic expressions.
//!
//! Grammar (standard precedence, `^` binds tightest and is right-associative):
//!
//! ```text
//! expr   := term (('+' | '-') term)*
//! term   := factor (('*' | '/' | '%') factor)*
//! factor := ('+' | '-') factor | power
//! power  := atom ('^' factor)?
//! atom   := number | ident ('(' expr (',' expr)* ')')? | '(' expr ')'
//! ```
//!
//! Numeric literals accept scientific notation (`2e3`). The AST is the only
//! expression representation in the crate: the restricted evaluator walks it
//! rejecting symbols, and the algebra solver lowers it to polynomials.

use std::collections::BTreeSet;

use crate::error::AgentError;

/// Binary operator tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
}

/// Parsed expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Numeric literal.
    Number(f64),
    /// Free variable (single letter or identifier).
    Var(String),
    /// Unary negation.
    Neg(Box<Expr>),
    /// Binary operation.
    Bin(Op, Box<Expr>, Box<Expr>),
    /// Function call, e.g. `sqrt(16)`. Never evaluated by the restricted
    /// tier; kept so error messages can name the offending function.
    Call(String, Vec<Expr>),
}

impl Expr {
    /// Collects every free variable in the tree, lexicographically ordered.
    pub fn variables(&self, out: &mut BTreeSet<String>) {
        match self {
            Expr::Number(_) => {}
            Expr::Var(name) => {
                out.insert(name.clone());
            }
            Expr::Neg(inner) => inner.variables(out),
            Expr::Bin(_, left, right) => {
                left.variables(out);
                right.variables(out);
            }
            Expr::Call(_, args) => {
                for arg in args {
                    arg.variables(out);
                }
            }
        }
    }

    /// Numerically evaluates a literal-only tree.
    ///
    /// This is the restricted tier: symbols and function calls are rejected,
    /// division and modulo by zero fail instead of producing infinities.
    pub fn eval_literal(&self) -> Result<f64, AgentError> {
        match self {
            Expr::Number(v) => Ok(*v),
            Expr::Var(name) => Err(AgentError::Evaluation(format!(
                "unresolved symbol '{}'",
                name
            ))),
            Expr::Neg(inner) => Ok(-inner.eval_literal()?),
            Expr::Bin(op, left, right) => {
                let a = left.eval_literal()?;
                let b = right.eval_literal()?;
                match op {
                    Op::Add => Ok(a + b),
                    Op::Sub => Ok(a - b),
                    Op::Mul => Ok(a * b),
                    Op::Div => {
                        if b == 0.0 {
                            Err(AgentError::Evaluation("division by zero".to_string()))
                        } else {
                            Ok(a / b)
                        }
                    }
                    Op::Rem => {
                        if b == 0.0 {
                            Err(AgentError::Evaluation("modulo by zero".to_string()))
                        } else {
                            Ok(a % b)
                        }
                    }
                    Op::Pow => Ok(a.powf(b)),
                }
            }
            Expr::Call(name, _) => Err(AgentError::Evaluation(format!(
                "function '{}' is not available in the restricted evaluator",
                name
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Caret,
    LParen,
    RParen,
    Comma,
}

fn lex(input: &str) -> Result<Vec<Token>, AgentError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c.is_whitespace() {
            i += 1;
            continue;
        }
        if c.is_ascii_digit() || (c == '.' && chars.get(i + 1).is_some_and(|d| d.is_ascii_digit()))
        {
            let start = i;
            while i < chars.len() && chars[i].is_ascii_digit() {
                i += 1;
            }
            if i < chars.len() && chars[i] == '.' {
                i += 1;
                while i < chars.len() && chars[i].is_ascii_digit() {
                    i += 1;
                }
            }
            // Exponent only when followed by digits, so "2e" lexes as `2`, `e`.
            if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
                let mut j = i + 1;
                if j < chars.len() && (chars[j] == '+' || chars[j] == '-') {
                    j += 1;
                }
                if j < chars.len() && chars[j].is_ascii_digit() {
                    i = j;
                    while i < chars.len() && chars[i].is_ascii_digit() {
                        i += 1;
                    }
                }
            }
            let text: String = chars[start..i].iter().collect();
            let value = text.parse::<f64>().map_err(|_| {
                AgentError::Evaluation(format!("invalid numeric literal '{}'", text))
            })?;
            tokens.push(Token::Number(value));
            continue;
        }
        if c.is_ascii_alphabetic() || c == '_' {
            let start = i;
            while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            tokens.push(Token::Ident(chars[start..i].iter().collect()));
            continue;
        }
        let token = match c {
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' => Token::Star,
            '/' => Token::Slash,
            '%' => Token::Percent,
            '^' => Token::Caret,
            '(' => Token::LParen,
            ')' => Token::RParen,
            ',' => Token::Comma,
            other => {
                return Err(AgentError::Evaluation(format!(
                    "unexpected character '{}' in expression",
                    other
                )))
            }
        };
        tokens.push(token);
        i += 1;
    }
    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expr(&mut self) -> Result<Expr, AgentError> {
        let mut node = self.term()?;
        loop {
            if self.eat(&Token::Plus) {
                node = Expr::Bin(Op::Add, Box::new(node), Box::new(self.term()?));
            } else if self.eat(&Token::Minus) {
                node = Expr::Bin(Op::Sub, Box::new(node), Box::new(self.term()?));
            } else {
                return Ok(node);
            }
        }
    }

    fn term(&mut self) -> Result<Expr, AgentError> {
        let mut node = self.factor()?;
        loop {
            if self.eat(&Token::Star) {
                node = Expr::Bin(Op::Mul, Box::new(node), Box::new(self.factor()?));
            } else if self.eat(&Token::Slash) {
                node = Expr::Bin(Op::Div, Box::new(node), Box::new(self.factor()?));
            } else if self.eat(&Token::Percent) {
                node = Expr::Bin(Op::Rem, Box::new(node), Box::new(self.factor()?));
            } else {
                return Ok(node);
            }
        }
    }

    fn factor(&mut self) -> Result<Expr, AgentError> {
        if self.eat(&Token::Plus) {
            return self.factor();
        }
        if self.eat(&Token::Minus) {
            return Ok(Expr::Neg(Box::new(self.factor()?)));
        }
        self.power()
    }

    fn power(&mut self) -> Result<Expr, AgentError> {
        let base = self.atom()?;
        if self.eat(&Token::Caret) {
            // Right-associative; the exponent may carry its own unary sign.
            let exponent = self.factor()?;
            return Ok(Expr::Bin(Op::Pow, Box::new(base), Box::new(exponent)));
        }
        Ok(base)
    }

    fn atom(&mut self) -> Result<Expr, AgentError> {
        match self.advance() {
            Some(Token::Number(v)) => Ok(Expr::Number(v)),
            Some(Token::Ident(name)) => {
                if self.eat(&Token::LParen) {
                    let mut args = Vec::new();
                    if self.peek() != Some(&Token::RParen) {
                        loop {
                            args.push(self.expr()?);
                            if !self.eat(&Token::Comma) {
                                break;
                            }
                        }
                    }
                    if !self.eat(&Token::RParen) {
                        return Err(AgentError::Evaluation(format!(
                            "missing ')' after arguments of '{}'",
                            name
                        )));
                    }
                    Ok(Expr::Call(name, args))
                } else {
                    Ok(Expr::Var(name))
                }
            }
            Some(Token::LParen) => {
                let inner = self.expr()?;
                if !self.eat(&Token::RParen) {
                    return Err(AgentError::Evaluation("missing closing ')'".to_string()));
                }
                Ok(inner)
            }
            Some(other) => Err(AgentError::Evaluation(format!(
                "unexpected token {:?}",
                other
            ))),
            None => Err(AgentError::Evaluation(
                "unexpected end of expression".to_string(),
            )),
        }
    }
}

/// Parses an arithmetic expression into an [`Expr`] tree.
pub fn parse(input: &str) -> Result<Expr, AgentError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(AgentError::EmptyExpression);
    }
    let tokens = lex(trimmed)?;
    let mut parser = Parser { tokens, pos: 0 };
    let expr = parser.expr()?;
    if parser.pos != parser.tokens.len() {
        return Err(AgentError::Evaluation(
            "unexpected trailing input".to_string(),
        ));
    }
    Ok(expr)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(input: &str) -> f64 {
        parse(input)
            .and_then(|e| e.eval_literal())
            .unwrap_or_else(|e| panic!("'{}' should evaluate: {}", input, e))
    }

    #[test]
    fn test_precedence() {
        assert_eq!(eval("12/4+3"), 6.0);
        assert_eq!(eval("2+3*4"), 14.0);
        assert_eq!(eval("(2+3)*4"), 20.0);
    }

    #[test]
    fn test_power_binds_tightest_and_right_associative() {
        assert_eq!(eval("2^3"), 8.0);
        assert_eq!(eval("2^3^2"), 512.0);
        assert_eq!(eval("2*3^2"), 18.0);
        // Unary minus binds looser than '^'.
        assert_eq!(eval("-2^2"), -4.0);
    }

    #[test]
    fn test_modulo_and_scientific_notation() {
        assert_eq!(eval("10%3"), 1.0);
        assert_eq!(eval("2e3"), 2000.0);
        assert_eq!(eval("1.5e-1"), 0.15);
    }

    #[test]
    fn test_division_by_zero_fails() {
        let err = parse("1/0").and_then(|e| e.eval_literal()).unwrap_err();
        assert_eq!(err, AgentError::Evaluation("division by zero".to_string()));
    }

    #[test]
    fn test_symbols_rejected_by_literal_eval() {
        let err = parse("x+1").and_then(|e| e.eval_literal()).unwrap_err();
        assert!(matches!(err, AgentError::Evaluation(_)));
    }

    #[test]
    fn test_variable_collection_is_sorted() {
        let expr = parse("y*2 + x - z").expect("parses");
        let mut vars = std::collections::BTreeSet::new();
        expr.variables(&mut vars);
        let names: Vec<&str> = vars.iter().map(String::as_str).collect();
        assert_eq!(names, vec!["x", "y", "z"]);
    }

    #[test]
    fn test_empty_and_trailing_input() {
        assert_eq!(parse("").unwrap_err(), AgentError::EmptyExpression);
        assert_eq!(parse("   ").unwrap_err(), AgentError::EmptyExpression);
        assert!(parse("1,2").is_err());
        assert!(parse("2 3").is_err());
    }
}
