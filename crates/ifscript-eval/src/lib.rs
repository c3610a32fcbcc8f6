//! The expression evaluator (C1, spec.md §4.1): a small infix
//! arithmetic/boolean language evaluated over a symbol table.
//!
//! The evaluator is an explicit instance owned by the caller (the
//! `Interpreter` in `ifscript-vm`), reset and re-populated before every
//! evaluation — this resolves the "Global evaluator state" design note in
//! spec.md §9 in favor of its preferred, non-static option.

mod error;
mod token;

pub use error::EvalError;
pub use token::{Token, TokenKind, tokenize};

use ifscript_core::{Decimal, Value};
use std::collections::HashMap;

/// Configuration flags consumed per invocation (spec.md §4.1).
#[derive(Clone, Copy, Debug)]
pub struct EvalConfig {
    /// When true, an unregistered identifier resolves to `Value::Unknown`
    /// rather than raising an error.
    pub include_unknowns: bool,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            include_unknowns: true,
        }
    }
}

/// The expression evaluator. Holds the per-call symbol table; call
/// [`Evaluator::reset`] before registering identifiers for a new evaluation.
#[derive(Default)]
pub struct Evaluator {
    symbols: HashMap<String, Value>,
    config: EvalConfig,
}

impl Evaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear the token table; identifiers must be re-registered before the
    /// next call (spec.md §4.1: "Before each evaluation the Interpreter
    /// resets the evaluator's token table").
    pub fn reset(&mut self, config: EvalConfig) {
        self.symbols.clear();
        self.config = config;
    }

    pub fn register(&mut self, name: impl Into<String>, value: Value) {
        self.symbols.insert(name.into(), value);
    }

    /// Evaluate `src` to a `Value`, returning the canonical form the caller
    /// then interprets as boolean (`if`) or decimal (`set`).
    pub fn eval(&self, src: &str) -> Result<Value, EvalError> {
        let tokens = tokenize(src).map_err(EvalError::Lex)?;
        let mut parser = Parser {
            tokens: &tokens,
            pos: 0,
            symbols: &self.symbols,
            config: self.config,
        };
        let value = parser.parse_or()?;
        if parser.pos != tokens.len() {
            return Err(EvalError::TrailingInput(
                tokens[parser.pos].text.clone(),
            ));
        }
        Ok(value)
    }
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    symbols: &'a HashMap<String, Value>,
    config: EvalConfig,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<&Token> {
        let tok = self.tokens.get(self.pos);
        self.pos += 1;
        tok
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.peek().map(|t| t.kind) == Some(kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    // or_expr := and_expr (`or` and_expr)*
    fn parse_or(&mut self) -> Result<Value, EvalError> {
        let mut lhs = self.parse_and()?;
        while self.eat(TokenKind::Or) {
            let rhs = self.parse_and()?;
            let l = truthy(&lhs)?;
            let r = truthy(&rhs)?;
            lhs = Value::Boolean(l || r);
        }
        Ok(lhs)
    }

    // and_expr := not_expr (`and` not_expr)*
    fn parse_and(&mut self) -> Result<Value, EvalError> {
        let mut lhs = self.parse_not()?;
        while self.eat(TokenKind::And) {
            let rhs = self.parse_not()?;
            let l = truthy(&lhs)?;
            let r = truthy(&rhs)?;
            lhs = Value::Boolean(l && r);
        }
        Ok(lhs)
    }

    // not_expr := `not` not_expr | comparison
    fn parse_not(&mut self) -> Result<Value, EvalError> {
        if self.eat(TokenKind::Not) {
            let v = self.parse_not()?;
            return Ok(Value::Boolean(!truthy(&v)?));
        }
        self.parse_comparison()
    }

    // comparison := additive ((`=`|`!=`|`<`|`<=`|`>`|`>=`) additive)?
    fn parse_comparison(&mut self) -> Result<Value, EvalError> {
        let lhs = self.parse_additive()?;
        let op = match self.peek().map(|t| t.kind) {
            Some(
                k @ (TokenKind::Eq
                | TokenKind::Ne
                | TokenKind::Lt
                | TokenKind::Le
                | TokenKind::Gt
                | TokenKind::Ge),
            ) => k,
            _ => return Ok(lhs),
        };
        self.pos += 1;
        let rhs = self.parse_additive()?;
        compare(&lhs, op, &rhs)
    }

    // additive := multiplicative ((`+`|`-`) multiplicative)*
    fn parse_additive(&mut self) -> Result<Value, EvalError> {
        let mut lhs = self.parse_multiplicative()?;
        loop {
            let op = match self.peek().map(|t| t.kind) {
                Some(k @ (TokenKind::Plus | TokenKind::Minus)) => k,
                _ => break,
            };
            self.pos += 1;
            let rhs = self.parse_multiplicative()?;
            let l = num(&lhs)?;
            let r = num(&rhs)?;
            let result = match op {
                TokenKind::Plus => l.checked_add(r),
                TokenKind::Minus => l.checked_sub(r),
                _ => unreachable!(),
            }
            .ok_or(EvalError::TypeMismatch)?;
            lhs = Value::Decimal(result);
        }
        Ok(lhs)
    }

    // multiplicative := unary ((`*`|`/`) unary)*
    fn parse_multiplicative(&mut self) -> Result<Value, EvalError> {
        let mut lhs = self.parse_unary()?;
        loop {
            let op = match self.peek().map(|t| t.kind) {
                Some(k @ (TokenKind::Star | TokenKind::Slash)) => k,
                _ => break,
            };
            self.pos += 1;
            let rhs = self.parse_unary()?;
            let l = num(&lhs)?;
            let r = num(&rhs)?;
            let result = match op {
                TokenKind::Star => l.checked_mul(r).ok_or(EvalError::TypeMismatch)?,
                TokenKind::Slash => l.checked_div(r).ok_or(EvalError::DivisionByZero)?,
                _ => unreachable!(),
            };
            lhs = Value::Decimal(result);
        }
        Ok(lhs)
    }

    // unary := `-` unary | primary
    fn parse_unary(&mut self) -> Result<Value, EvalError> {
        if self.eat(TokenKind::Minus) {
            let v = self.parse_unary()?;
            let d = num(&v)?;
            return Ok(Value::Decimal(
                Decimal::ZERO.checked_sub(d).ok_or(EvalError::TypeMismatch)?,
            ));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Value, EvalError> {
        let tok = self
            .advance()
            .cloned()
            .ok_or(EvalError::UnexpectedEnd)?;
        match tok.kind {
            TokenKind::Number => Ok(Value::Decimal(
                tok.text
                    .parse()
                    .map_err(|_| EvalError::UnexpectedToken(tok.text.clone()))?,
            )),
            TokenKind::True => Ok(Value::Boolean(true)),
            TokenKind::False => Ok(Value::Boolean(false)),
            TokenKind::Ident => self.resolve_ident(&tok.text),
            TokenKind::LParen => {
                let inner = self.parse_or()?;
                if !self.eat(TokenKind::RParen) {
                    return Err(EvalError::UnexpectedToken(")".into()));
                }
                Ok(inner)
            }
            _ => Err(EvalError::UnexpectedToken(tok.text)),
        }
    }

    fn resolve_ident(&self, name: &str) -> Result<Value, EvalError> {
        if let Some(v) = self.symbols.get(name) {
            return Ok(v.clone());
        }
        if self.config.include_unknowns {
            Ok(Value::Unknown)
        } else {
            Err(EvalError::UnknownIdentifier(name.to_string()))
        }
    }
}

fn truthy(v: &Value) -> Result<bool, EvalError> {
    v.as_bool().ok_or(EvalError::TypeMismatch)
}

fn num(v: &Value) -> Result<Decimal, EvalError> {
    v.as_decimal().ok_or(EvalError::TypeMismatch)
}

fn compare(lhs: &Value, op: TokenKind, rhs: &Value) -> Result<Value, EvalError> {
    // `=` in `if` is comparison (assignment is detected before tokenization
    // by the caller, spec.md §4.1).
    if let (Some(l), Some(r)) = (lhs.as_decimal(), rhs.as_decimal()) {
        let result = match op {
            TokenKind::Eq => l == r,
            TokenKind::Ne => l != r,
            TokenKind::Lt => l < r,
            TokenKind::Le => l <= r,
            TokenKind::Gt => l > r,
            TokenKind::Ge => l >= r,
            _ => unreachable!(),
        };
        return Ok(Value::Boolean(result));
    }
    if let (Some(l), Some(r)) = (lhs.as_bool(), rhs.as_bool()) {
        let result = match op {
            TokenKind::Eq => l == r,
            TokenKind::Ne => l != r,
            _ => return Err(EvalError::TypeMismatch),
        };
        return Ok(Value::Boolean(result));
    }
    Err(EvalError::TypeMismatch)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(src: &str, vars: &[(&str, Value)]) -> Result<Value, EvalError> {
        let mut ev = Evaluator::new();
        ev.reset(EvalConfig::default());
        for (name, val) in vars {
            ev.register(*name, val.clone());
        }
        ev.eval(src)
    }

    #[test]
    fn arithmetic_precedence() {
        let v = eval("2 + 3 * 4", &[]).unwrap();
        assert_eq!(v.to_string(), "14");
    }

    #[test]
    fn parens_override_precedence() {
        let v = eval("(2 + 3) * 4", &[]).unwrap();
        assert_eq!(v.to_string(), "20");
    }

    #[test]
    fn comparison_and_boolean_connectives() {
        let v = eval("1 < 2 and not false", &[]).unwrap();
        assert_eq!(v, Value::Boolean(true));
    }

    #[test]
    fn unregistered_identifier_is_unknown_and_falsy() {
        let v = eval("visited and true", &[]).unwrap();
        assert_eq!(v, Value::Boolean(false));
    }

    #[test]
    fn unregistered_identifier_is_error_when_disabled() {
        let mut ev = Evaluator::new();
        ev.reset(EvalConfig {
            include_unknowns: false,
        });
        assert!(matches!(
            ev.eval("missing"),
            Err(EvalError::UnknownIdentifier(_))
        ));
    }

    #[test]
    fn registered_identifier_resolves() {
        let v = eval(
            "x > 1",
            &[("x", Value::Decimal("2".parse().unwrap()))],
        )
        .unwrap();
        assert_eq!(v, Value::Boolean(true));
    }

    #[test]
    fn division_by_zero_errors() {
        assert_eq!(eval("1 / 0", &[]), Err(EvalError::DivisionByZero));
    }

    #[test]
    fn non_boolean_plus_boolean_is_type_mismatch() {
        assert_eq!(eval("1 + true", &[]), Err(EvalError::TypeMismatch));
    }
}
