//! Formula expression tree
//!
//! Each estimator is described once as an [`Expr`] tree. The same tree is
//! executed by [`crate::formula::evaluate`] and exported as rule-expression
//! text by [`crate::formula::render`].

use std::ops::{Add, Div, Mul, Sub};

/// Formula expression tree
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    // === Literals ===
    /// Numeric literal
    Number(f64),
    /// Text literal
    Text(String),
    /// Boolean literal
    Boolean(bool),

    /// Reference to an input or a `With` binding
    Name(String),

    /// Binary operation
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// True when every operand is true
    And(Vec<Expr>),
    /// True when any operand is true
    Or(Vec<Expr>),

    /// Conditional
    If {
        condition: Box<Expr>,
        then: Box<Expr>,
        otherwise: Box<Expr>,
    },

    /// Table lookup on a text subject, falling back to `default`
    Switch {
        subject: Box<Expr>,
        cases: Vec<(String, Expr)>,
        default: Box<Expr>,
    },

    /// Lower-case a text value
    Lower(Box<Expr>),
    /// Round to a number of decimal places
    Round { value: Box<Expr>, digits: u32 },
    /// The constant π
    Pi,
    /// True when the operand is blank (an absent optional input)
    IsBlank(Box<Expr>),

    /// Local bindings. Bindings in one group are evaluated in the enclosing
    /// scope and cannot see each other; nest another `With` for dependents.
    With {
        bindings: Vec<(String, Expr)>,
        body: Box<Expr>,
    },
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Subtract,
    Multiply,
    Divide,

    // Comparison
    Equal,
    LessThan,
    LessEqual,
    GreaterThan,
    GreaterEqual,
}

impl BinaryOp {
    /// Operator symbol in rule-expression text
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Subtract => "-",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
            BinaryOp::Equal => "=",
            BinaryOp::LessThan => "<",
            BinaryOp::LessEqual => "<=",
            BinaryOp::GreaterThan => ">",
            BinaryOp::GreaterEqual => ">=",
        }
    }

    /// Binding strength; higher binds tighter
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOp::Multiply | BinaryOp::Divide => 3,
            BinaryOp::Add | BinaryOp::Subtract => 2,
            _ => 1,
        }
    }

    pub fn is_comparison(self) -> bool {
        self.precedence() == 1
    }
}

impl Expr {
    pub fn num(value: f64) -> Self {
        Expr::Number(value)
    }

    pub fn text(value: impl Into<String>) -> Self {
        Expr::Text(value.into())
    }

    pub fn name(name: impl Into<String>) -> Self {
        Expr::Name(name.into())
    }

    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn eq_to(self, other: Expr) -> Self {
        Expr::binary(BinaryOp::Equal, self, other)
    }

    pub fn lt(self, other: Expr) -> Self {
        Expr::binary(BinaryOp::LessThan, self, other)
    }

    pub fn le(self, other: Expr) -> Self {
        Expr::binary(BinaryOp::LessEqual, self, other)
    }

    pub fn gt(self, other: Expr) -> Self {
        Expr::binary(BinaryOp::GreaterThan, self, other)
    }

    pub fn ge(self, other: Expr) -> Self {
        Expr::binary(BinaryOp::GreaterEqual, self, other)
    }

    pub fn if_then(condition: Expr, then: Expr, otherwise: Expr) -> Self {
        Expr::If {
            condition: Box::new(condition),
            then: Box::new(then),
            otherwise: Box::new(otherwise),
        }
    }

    pub fn switch(subject: Expr, cases: Vec<(String, Expr)>, default: Expr) -> Self {
        Expr::Switch {
            subject: Box::new(subject),
            cases,
            default: Box::new(default),
        }
    }

    pub fn lower(self) -> Self {
        Expr::Lower(Box::new(self))
    }

    pub fn round(self, digits: u32) -> Self {
        Expr::Round {
            value: Box::new(self),
            digits,
        }
    }

    pub fn is_blank(self) -> Self {
        Expr::IsBlank(Box::new(self))
    }

    pub fn with<S: Into<String>>(bindings: Vec<(S, Expr)>, body: Expr) -> Self {
        Expr::With {
            bindings: bindings.into_iter().map(|(n, e)| (n.into(), e)).collect(),
            body: Box::new(body),
        }
    }

    /// Names referenced by this expression that are not bound inside it
    pub fn free_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        collect_free_names(self, &mut Vec::new(), &mut names);
        names
    }
}

fn collect_free_names(expr: &Expr, bound: &mut Vec<String>, out: &mut Vec<String>) {
    match expr {
        Expr::Number(_) | Expr::Text(_) | Expr::Boolean(_) | Expr::Pi => {}
        Expr::Name(name) => {
            if !bound.contains(name) && !out.contains(name) {
                out.push(name.clone());
            }
        }
        Expr::Binary { left, right, .. } => {
            collect_free_names(left, bound, out);
            collect_free_names(right, bound, out);
        }
        Expr::And(items) | Expr::Or(items) => {
            for item in items {
                collect_free_names(item, bound, out);
            }
        }
        Expr::If {
            condition,
            then,
            otherwise,
        } => {
            collect_free_names(condition, bound, out);
            collect_free_names(then, bound, out);
            collect_free_names(otherwise, bound, out);
        }
        Expr::Switch {
            subject,
            cases,
            default,
        } => {
            collect_free_names(subject, bound, out);
            for (_, value) in cases {
                collect_free_names(value, bound, out);
            }
            collect_free_names(default, bound, out);
        }
        Expr::Lower(inner) | Expr::IsBlank(inner) => collect_free_names(inner, bound, out),
        Expr::Round { value, .. } => collect_free_names(value, bound, out),
        Expr::With { bindings, body } => {
            for (_, value) in bindings {
                collect_free_names(value, bound, out);
            }
            let depth = bound.len();
            bound.extend(bindings.iter().map(|(name, _)| name.clone()));
            collect_free_names(body, bound, out);
            bound.truncate(depth);
        }
    }
}

impl From<f64> for Expr {
    fn from(value: f64) -> Self {
        Expr::Number(value)
    }
}

impl From<bool> for Expr {
    fn from(value: bool) -> Self {
        Expr::Boolean(value)
    }
}

macro_rules! arithmetic_op {
    ($trait:ident, $method:ident, $op:expr) => {
        impl $trait for Expr {
            type Output = Expr;

            fn $method(self, rhs: Expr) -> Expr {
                Expr::binary($op, self, rhs)
            }
        }
    };
}

arithmetic_op!(Add, add, BinaryOp::Add);
arithmetic_op!(Sub, sub, BinaryOp::Subtract);
arithmetic_op!(Mul, mul, BinaryOp::Multiply);
arithmetic_op!(Div, div, BinaryOp::Divide);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operators_build_left_associative_trees() {
        let expr = Expr::name("A") * Expr::name("B") * Expr::name("C");
        match expr {
            Expr::Binary { op, left, right } => {
                assert_eq!(op, BinaryOp::Multiply);
                assert_eq!(*right, Expr::name("C"));
                assert!(matches!(*left, Expr::Binary { op: BinaryOp::Multiply, .. }));
            }
            other => panic!("unexpected tree: {:?}", other),
        }
    }

    #[test]
    fn test_free_names_skip_with_bindings() {
        let expr = Expr::with(
            vec![("Ratio", Expr::name("Rpm") / Expr::name("Optimal"))],
            Expr::name("Ratio").round(2),
        );
        assert_eq!(expr.free_names(), vec!["Rpm".to_string(), "Optimal".to_string()]);
    }

    #[test]
    fn test_free_names_deduplicate() {
        let expr = Expr::name("X") + Expr::name("X") * Expr::num(2.0);
        assert_eq!(expr.free_names(), vec!["X".to_string()]);
    }

    #[test]
    fn test_comparison_precedence() {
        assert!(BinaryOp::LessEqual.is_comparison());
        assert!(!BinaryOp::Divide.is_comparison());
        assert!(BinaryOp::Multiply.precedence() > BinaryOp::Add.precedence());
    }
}
