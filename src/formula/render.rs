//! Rule-expression text rendering
//!
//! Serializes an [`Expr`] tree into the function-call expression syntax used
//! by low-code rule environments (`With`, `If`, `Switch`, `Round`, ...).
//! Parentheses are emitted wherever the tree shape differs from the default
//! left-to-right reading, so the exported text evaluates in the same order
//! as the tree.

use crate::formula::expr::{BinaryOp, Expr};

const INDENT: &str = "    ";

/// Render a tree on a single line
pub fn render(expr: &Expr) -> String {
    let mut out = String::new();
    Renderer { pretty: false }.write(expr, 0, &mut out);
    out
}

/// Render a tree with `With` and `If` blocks broken across indented lines
pub fn render_pretty(expr: &Expr) -> String {
    let mut out = String::new();
    Renderer { pretty: true }.write(expr, 0, &mut out);
    out
}

struct Renderer {
    pretty: bool,
}

impl Renderer {
    fn write(&self, expr: &Expr, depth: usize, out: &mut String) {
        match expr {
            Expr::Number(n) => out.push_str(&format_number(*n)),
            Expr::Text(s) => out.push_str(&quote(s)),
            Expr::Boolean(b) => out.push_str(if *b { "true" } else { "false" }),
            Expr::Name(name) => out.push_str(name),
            Expr::Pi => out.push_str("Pi()"),

            Expr::Binary { op, left, right } => {
                self.write_operand(left, *op, false, depth, out);
                out.push(' ');
                out.push_str(op.symbol());
                out.push(' ');
                self.write_operand(right, *op, true, depth, out);
            }

            Expr::And(items) if items.is_empty() => out.push_str("true"),
            Expr::Or(items) if items.is_empty() => out.push_str("false"),
            Expr::And(items) => self.write_call("And", items.iter().collect(), depth, out),
            Expr::Or(items) => self.write_call("Or", items.iter().collect(), depth, out),

            Expr::If {
                condition,
                then,
                otherwise,
            } => self.write_call("If", vec![&**condition, &**then, &**otherwise], depth, out),

            Expr::Switch {
                subject,
                cases,
                default,
            } => {
                out.push_str("Switch(");
                self.write(subject, depth, out);
                for (key, value) in cases {
                    out.push_str(", ");
                    out.push_str(&quote(key));
                    out.push_str(", ");
                    self.write(value, depth, out);
                }
                out.push_str(", ");
                self.write(default, depth, out);
                out.push(')');
            }

            Expr::Lower(inner) => self.write_call("Lower", vec![&**inner], depth, out),
            Expr::IsBlank(inner) => self.write_call("IsBlank", vec![&**inner], depth, out),
            Expr::Round { value, digits } => {
                out.push_str("Round(");
                self.write(value, depth, out);
                out.push_str(&format!(", {})", digits));
            }

            Expr::With { bindings, body } => self.write_with(bindings, body, depth, out),
        }
    }

    fn write_operand(
        &self,
        operand: &Expr,
        parent: BinaryOp,
        is_right: bool,
        depth: usize,
        out: &mut String,
    ) {
        let needs_parens = match operand {
            Expr::Binary { op, .. } => {
                let (child, outer) = (op.precedence(), parent.precedence());
                child < outer
                    || (is_right && child == outer)
                    || (parent.is_comparison() && op.is_comparison())
            }
            _ => false,
        };

        if needs_parens {
            out.push('(');
            self.write(operand, depth, out);
            out.push(')');
        } else {
            self.write(operand, depth, out);
        }
    }

    fn write_call(&self, func: &str, args: Vec<&Expr>, depth: usize, out: &mut String) {
        out.push_str(func);
        out.push('(');

        if self.pretty && args.iter().any(|a| contains_with(a)) {
            for (i, arg) in args.iter().enumerate() {
                newline(depth + 1, out);
                self.write(arg, depth + 1, out);
                if i + 1 < args.len() {
                    out.push(',');
                }
            }
            newline(depth, out);
        } else {
            for (i, arg) in args.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                self.write(arg, depth, out);
            }
        }

        out.push(')');
    }

    fn write_with(&self, bindings: &[(String, Expr)], body: &Expr, depth: usize, out: &mut String) {
        out.push_str("With(");

        if self.pretty {
            newline(depth + 1, out);
            out.push('{');
            for (i, (name, value)) in bindings.iter().enumerate() {
                newline(depth + 2, out);
                out.push_str(name);
                out.push_str(": ");
                self.write(value, depth + 2, out);
                if i + 1 < bindings.len() {
                    out.push(',');
                }
            }
            newline(depth + 1, out);
            out.push_str("},");
            newline(depth + 1, out);
            self.write(body, depth + 1, out);
            newline(depth, out);
        } else {
            out.push('{');
            for (i, (name, value)) in bindings.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                out.push_str(name);
                out.push_str(": ");
                self.write(value, depth, out);
            }
            out.push_str("}, ");
            self.write(body, depth, out);
        }

        out.push(')');
    }
}

fn newline(depth: usize, out: &mut String) {
    out.push('\n');
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}

fn contains_with(expr: &Expr) -> bool {
    match expr {
        Expr::With { .. } => true,
        Expr::Binary { left, right, .. } => contains_with(left) || contains_with(right),
        Expr::And(items) | Expr::Or(items) => items.iter().any(contains_with),
        Expr::If {
            condition,
            then,
            otherwise,
        } => contains_with(condition) || contains_with(then) || contains_with(otherwise),
        Expr::Switch {
            subject,
            cases,
            default,
        } => {
            contains_with(subject)
                || cases.iter().any(|(_, v)| contains_with(v))
                || contains_with(default)
        }
        Expr::Lower(inner) | Expr::IsBlank(inner) => contains_with(inner),
        Expr::Round { value, .. } => contains_with(value),
        _ => false,
    }
}

fn format_number(n: f64) -> String {
    n.to_string()
}

fn quote(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}
