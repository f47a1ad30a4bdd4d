//! Formula evaluator
//!
//! Walks an [`Expr`] tree against a set of named [`Inputs`]. This is the only
//! execution path for the estimator formulas.

use std::collections::BTreeMap;

use crate::formula::error::{FormulaError, FormulaResult};
use crate::formula::expr::{BinaryOp, Expr};
use crate::formula::render::render;

/// Value produced by formula evaluation
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent optional input
    Blank,
    Number(f64),
    Boolean(bool),
    Text(String),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Blank => "blank",
            Value::Number(_) => "number",
            Value::Boolean(_) => "boolean",
            Value::Text(_) => "text",
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Value::Blank)
    }

    fn expect_number(self, context: &str) -> FormulaResult<f64> {
        match self {
            Value::Number(n) => Ok(n),
            other => Err(mismatch(context, "number", &other)),
        }
    }

    fn expect_bool(self, context: &str) -> FormulaResult<bool> {
        match self {
            Value::Boolean(b) => Ok(b),
            other => Err(mismatch(context, "boolean", &other)),
        }
    }

    fn expect_text(self, context: &str) -> FormulaResult<String> {
        match self {
            Value::Text(s) => Ok(s),
            other => Err(mismatch(context, "text", &other)),
        }
    }
}

fn mismatch(context: &str, expected: &'static str, found: &Value) -> FormulaError {
    FormulaError::TypeMismatch {
        context: context.to_string(),
        expected,
        found: found.type_name(),
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Number(f64::from(value))
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Blank, Into::into)
    }
}

/// Named inputs supplied to a formula
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Inputs {
    values: BTreeMap<String, Value>,
}

impl Inputs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: &str, value: impl Into<Value>) {
        self.values.insert(name.to_string(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }
}

/// Round half-to-even on the exact binary value.
///
/// The legacy figures were produced with this rule; `f64::round` on a scaled
/// value disagrees with it for inputs such as 1.005.
pub fn round_to(value: f64, digits: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    format!("{:.*}", digits as usize, value)
        .parse()
        .unwrap_or(value)
}

/// Evaluate a formula tree
pub fn evaluate(expr: &Expr, inputs: &Inputs) -> FormulaResult<Value> {
    let mut scope = Vec::new();
    eval(expr, inputs, &mut scope)
}

/// Evaluate a formula tree that must produce a number
pub fn evaluate_number(expr: &Expr, inputs: &Inputs) -> FormulaResult<f64> {
    evaluate(expr, inputs)?.expect_number("formula result")
}

type Scope = Vec<(String, Value)>;

fn eval(expr: &Expr, inputs: &Inputs, scope: &mut Scope) -> FormulaResult<Value> {
    match expr {
        Expr::Number(n) => Ok(Value::Number(*n)),
        Expr::Text(s) => Ok(Value::Text(s.clone())),
        Expr::Boolean(b) => Ok(Value::Boolean(*b)),
        Expr::Pi => Ok(Value::Number(std::f64::consts::PI)),

        Expr::Name(name) => scope
            .iter()
            .rev()
            .find(|(bound, _)| bound == name)
            .map(|(_, value)| value.clone())
            .or_else(|| inputs.get(name).cloned())
            .ok_or_else(|| FormulaError::UnknownName(name.clone())),

        Expr::Binary { op, left, right } => eval_binary(*op, left, right, inputs, scope),

        Expr::And(items) => {
            for item in items {
                if !eval(item, inputs, scope)?.expect_bool("And")? {
                    return Ok(Value::Boolean(false));
                }
            }
            Ok(Value::Boolean(true))
        }

        Expr::Or(items) => {
            for item in items {
                if eval(item, inputs, scope)?.expect_bool("Or")? {
                    return Ok(Value::Boolean(true));
                }
            }
            Ok(Value::Boolean(false))
        }

        Expr::If {
            condition,
            then,
            otherwise,
        } => {
            if eval(condition, inputs, scope)?.expect_bool("If condition")? {
                eval(then, inputs, scope)
            } else {
                eval(otherwise, inputs, scope)
            }
        }

        Expr::Switch {
            subject,
            cases,
            default,
        } => {
            let key = eval(subject, inputs, scope)?.expect_text("Switch subject")?;
            match cases.iter().find(|(case, _)| *case == key) {
                Some((_, value)) => eval(value, inputs, scope),
                None => eval(default, inputs, scope),
            }
        }

        Expr::Lower(inner) => {
            let text = eval(inner, inputs, scope)?.expect_text("Lower")?;
            Ok(Value::Text(text.to_lowercase()))
        }

        Expr::Round { value, digits } => {
            let n = eval(value, inputs, scope)?.expect_number("Round")?;
            Ok(Value::Number(round_to(n, *digits)))
        }

        Expr::IsBlank(inner) => Ok(Value::Boolean(eval(inner, inputs, scope)?.is_blank())),

        Expr::With { bindings, body } => {
            let mut values = Vec::with_capacity(bindings.len());
            for (name, value) in bindings {
                values.push((name.clone(), eval(value, inputs, scope)?));
            }
            let depth = scope.len();
            scope.extend(values);
            let result = eval(body, inputs, scope);
            scope.truncate(depth);
            result
        }
    }
}

fn eval_binary(
    op: BinaryOp,
    left: &Expr,
    right: &Expr,
    inputs: &Inputs,
    scope: &mut Scope,
) -> FormulaResult<Value> {
    let lhs = eval(left, inputs, scope)?;
    let rhs = eval(right, inputs, scope)?;

    if op == BinaryOp::Equal {
        return match (&lhs, &rhs) {
            (Value::Number(a), Value::Number(b)) => Ok(Value::Boolean(a == b)),
            (Value::Text(a), Value::Text(b)) => Ok(Value::Boolean(a == b)),
            (Value::Boolean(a), Value::Boolean(b)) => Ok(Value::Boolean(a == b)),
            (a, b) => Err(mismatch(op.symbol(), a.type_name(), b)),
        };
    }

    let a = lhs.expect_number(op.symbol())?;
    let b = rhs.expect_number(op.symbol())?;

    let value = match op {
        BinaryOp::Add => Value::Number(a + b),
        BinaryOp::Subtract => Value::Number(a - b),
        BinaryOp::Multiply => Value::Number(a * b),
        BinaryOp::Divide => {
            if b == 0.0 {
                return Err(FormulaError::DivisionByZero {
                    divisor: render(right),
                });
            }
            Value::Number(a / b)
        }
        BinaryOp::LessThan => Value::Boolean(a < b),
        BinaryOp::LessEqual => Value::Boolean(a <= b),
        BinaryOp::GreaterThan => Value::Boolean(a > b),
        BinaryOp::GreaterEqual => Value::Boolean(a >= b),
        BinaryOp::Equal => Value::Boolean(a == b),
    };

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval_num(expr: &Expr, inputs: &Inputs) -> f64 {
        evaluate_number(expr, inputs).unwrap()
    }

    #[test]
    fn test_round_to_uses_exact_binary_value() {
        assert_eq!(round_to(6.565, 2), 6.57);
        assert_eq!(round_to(1.375, 2), 1.38);
        assert_eq!(round_to(1.005, 2), 1.0);
        assert_eq!(round_to(2.0, 2), 2.0);
        assert!(round_to(f64::INFINITY, 2).is_infinite());
    }

    #[test]
    fn test_arithmetic_matches_native_order() {
        let inputs = Inputs::new().with("L", 100.0).with("F", 80.0);
        let expr = Expr::name("L") / Expr::name("F") * Expr::num(1.1);
        assert_eq!(eval_num(&expr, &inputs), 100.0 / 80.0 * 1.1);
    }

    #[test]
    fn test_division_by_zero_reports_divisor() {
        let inputs = Inputs::new().with("L", 100.0).with("FeedRate", 0.0);
        let expr = Expr::name("L") / Expr::name("FeedRate");
        let err = evaluate(&expr, &inputs).unwrap_err();
        assert_eq!(
            err,
            FormulaError::DivisionByZero {
                divisor: "FeedRate".to_string()
            }
        );
    }

    #[test]
    fn test_unknown_name() {
        let err = evaluate(&Expr::name("Missing"), &Inputs::new()).unwrap_err();
        assert_eq!(err, FormulaError::UnknownName("Missing".to_string()));
    }

    #[test]
    fn test_switch_falls_back_to_default() {
        let expr = Expr::switch(
            Expr::name("Grade").lower(),
            vec![("steel".to_string(), Expr::num(1.0)), ("brass".to_string(), Expr::num(0.9))],
            Expr::num(1.0),
        );
        let brass = Inputs::new().with("Grade", "BRASS");
        let other = Inputs::new().with("Grade", "unobtainium");
        assert_eq!(eval_num(&expr, &brass), 0.9);
        assert_eq!(eval_num(&expr, &other), 1.0);
    }

    #[test]
    fn test_with_bindings_shadow_inputs() {
        let inputs = Inputs::new().with("X", 1.0);
        let expr = Expr::with(vec![("X", Expr::num(5.0))], Expr::name("X") * Expr::num(2.0));
        assert_eq!(eval_num(&expr, &inputs), 10.0);
        // Binding does not leak past the With body
        let outer = Expr::with(vec![("Y", Expr::num(3.0))], Expr::name("Y")) + Expr::name("X");
        assert_eq!(eval_num(&outer, &inputs), 4.0);
    }

    #[test]
    fn test_with_group_bindings_are_independent() {
        let expr = Expr::with(
            vec![("A", Expr::num(1.0)), ("B", Expr::name("A") + Expr::num(1.0))],
            Expr::name("B"),
        );
        let err = evaluate(&expr, &Inputs::new()).unwrap_err();
        assert_eq!(err, FormulaError::UnknownName("A".to_string()));
    }

    #[test]
    fn test_is_blank_for_absent_optional() {
        let expr = Expr::if_then(
            Expr::name("Custom").is_blank(),
            Expr::num(5.0),
            Expr::name("Custom"),
        );
        let blank = Inputs::new().with("Custom", None::<f64>);
        let given = Inputs::new().with("Custom", Some(12.5));
        assert_eq!(eval_num(&expr, &blank), 5.0);
        assert_eq!(eval_num(&expr, &given), 12.5);
    }

    #[test]
    fn test_and_or_short_circuit() {
        let expr = Expr::Or(vec![Expr::Boolean(true), Expr::name("Missing")]);
        assert_eq!(evaluate(&expr, &Inputs::new()).unwrap(), Value::Boolean(true));
        let expr = Expr::And(vec![Expr::Boolean(false), Expr::name("Missing")]);
        assert_eq!(evaluate(&expr, &Inputs::new()).unwrap(), Value::Boolean(false));
    }

    #[test]
    fn test_type_mismatch() {
        let inputs = Inputs::new().with("Grade", "steel");
        let err = evaluate(&(Expr::name("Grade") + Expr::num(1.0)), &inputs).unwrap_err();
        assert!(matches!(err, FormulaError::TypeMismatch { expected: "number", found: "text", .. }));
    }
}
