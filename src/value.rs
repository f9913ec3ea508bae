use std::fmt;
use std::rc::Rc;

use crate::class::{Class, Instance};
use crate::function::{BoundMethod, Function};

/// Runtime value of a Rox expression.
///
/// Scalars are stored inline; callables and instances are reference-counted so
/// copies of a value share identity.
#[derive(Debug, Clone)]
pub enum Value {
    Nil,
    Bool(bool),
    Number(f64),
    String(String),
    Function(Rc<Function>),
    Class(Rc<Class>),
    Instance(Rc<Instance>),
    BoundMethod(Rc<BoundMethod>),
}

impl Value {
    /// Only `nil` and `false` are falsy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Nil | Value::Bool(false))
    }

    /// Name of the value's kind, for log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Function(_) => "function",
            Value::Class(_) => "class",
            Value::Instance(_) => "instance",
            Value::BoundMethod(_) => "bound method",
        }
    }
}

/// Language equality: never fails, booleans only equal booleans, numbers and
/// strings compare by content, everything else by identity.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::Class(a), Value::Class(b)) => Rc::ptr_eq(a, b),
            (Value::Instance(a), Value::Instance(b)) => Rc::ptr_eq(a, b),
            (Value::BoundMethod(a), Value::BoundMethod(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),

            Value::Bool(b) => write!(f, "{}", b),

            Value::Number(n) if n.is_nan() => write!(f, "nan"),

            Value::Number(n) if is_exponent_form(*n) => write_exponent(f, *n),

            // 3.0 → "3", infinities fall through to "inf" / "-inf"
            Value::Number(n) if n.fract() == 0.0 => write!(f, "{:.0}", n),

            Value::Number(n) => write!(f, "{}", n),

            Value::String(s) => write!(f, "{}", s),

            Value::Function(func) => write!(f, "<fn {}>", func.name()),

            Value::Class(class) => write!(f, "<class {}>", class.name()),

            Value::Instance(instance) => write!(f, "<{} instance>", instance.class().name()),

            Value::BoundMethod(bound) => write!(f, "<bound method {}>", bound.name()),
        }
    }
}

/// Very large and very small finite magnitudes print in exponent form.
fn is_exponent_form(n: f64) -> bool {
    let magnitude: f64 = n.abs();

    n.is_finite() && magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude)
}

/// `1e20` → `1e+20`, `1.5e-7` → `1.5e-07`.
fn write_exponent(f: &mut fmt::Formatter<'_>, n: f64) -> fmt::Result {
    let rendered: String = format!("{:e}", n);

    let Some((mantissa, exponent)) = rendered.split_once('e') else {
        return write!(f, "{}", rendered);
    };

    let (sign, digits) = match exponent.strip_prefix('-') {
        Some(digits) => ('-', digits),
        None => ('+', exponent),
    };

    write!(f, "{}e{}{:0>2}", mantissa, sign, digits)
}
