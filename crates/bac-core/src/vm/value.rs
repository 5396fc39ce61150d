//! Runtime Value Representation
//!
//! Defines the three primitive value kinds of the virtual machine and the
//! two ways text becomes a value: best-effort literal folding for feed
//! operands, and strict typed assignment for declarations.

use std::fmt;

use serde::Serialize;

use crate::error::{BacError, BacResult};

/// Runtime value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Variable {
    /// Numeric value (IEEE 754)
    Number(f64),

    /// Boolean value
    Boolean(bool),

    /// Text value
    String(String),
}

/// Declaration type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableKind {
    Number,
    Boolean,
    String,
}

impl VariableKind {
    /// Parse a declaration type tag (`number`, `bool`, `string`)
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "number" => Some(VariableKind::Number),
            "bool" => Some(VariableKind::Boolean),
            "string" => Some(VariableKind::String),
            _ => None,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            VariableKind::Number => "number",
            VariableKind::Boolean => "bool",
            VariableKind::String => "string",
        }
    }
}

/// Comparison performed by a comparison feeder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    GreaterEqual,
    Equal,
    LessEqual,
    Greater,
    Less,
}

impl Comparison {
    /// Parse a comparison feed tag
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "c_eg" => Some(Comparison::GreaterEqual),
            "c_eq" => Some(Comparison::Equal),
            "c_es" => Some(Comparison::LessEqual),
            "c_g" => Some(Comparison::Greater),
            "c_s" => Some(Comparison::Less),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Comparison::GreaterEqual => ">=",
            Comparison::Equal => "=",
            Comparison::LessEqual => "<=",
            Comparison::Greater => ">",
            Comparison::Less => "<",
        }
    }
}

impl Variable {
    /// Fold a literal token into a number.
    ///
    /// Malformed input folds to `0`; this never fails.
    pub fn fold(token: &str) -> Self {
        Variable::Number(token.parse::<f64>().unwrap_or(0.0))
    }

    /// Assign declaration text to a value of the given kind.
    ///
    /// Empty text maps to the kind's zero value. Malformed numbers and
    /// booleans are type errors.
    pub fn assign(kind: VariableKind, text: &str) -> BacResult<Self> {
        match kind {
            VariableKind::Number => {
                if text.is_empty() {
                    return Ok(Variable::Number(0.0));
                }
                text.parse::<f64>()
                    .map(Variable::Number)
                    .map_err(|_| BacError::VariableType(format!("{:?} is not a number", text)))
            }
            VariableKind::Boolean => match text {
                "" | "false" => Ok(Variable::Boolean(false)),
                "true" => Ok(Variable::Boolean(true)),
                _ => Err(BacError::VariableType(format!("{:?} is not a bool", text))),
            },
            VariableKind::String => Ok(Variable::String(text.to_string())),
        }
    }

    pub fn kind(&self) -> VariableKind {
        match self {
            Variable::Number(_) => VariableKind::Number,
            Variable::Boolean(_) => VariableKind::Boolean,
            Variable::String(_) => VariableKind::String,
        }
    }

    /// Fixed total order over tags
    pub fn weight(&self) -> i32 {
        match self {
            Variable::String(_) => 1,
            Variable::Number(_) => 2,
            Variable::Boolean(_) => 3,
        }
    }

    /// Compare `self` against `other`.
    ///
    /// Equality holds only when tag and payload both match. Ordering
    /// comparisons require two numbers.
    pub fn compare(&self, kind: Comparison, other: &Variable) -> BacResult<bool> {
        if kind == Comparison::Equal {
            return Ok(self == other);
        }
        let (a, b) = match (self, other) {
            (Variable::Number(a), Variable::Number(b)) => (*a, *b),
            _ => {
                return Err(BacError::VariableType(format!(
                    "cannot compare {} {} {}",
                    self.kind().tag(),
                    kind.symbol(),
                    other.kind().tag()
                )))
            }
        };
        Ok(match kind {
            Comparison::GreaterEqual => a >= b,
            Comparison::LessEqual => a <= b,
            Comparison::Greater => a > b,
            Comparison::Less => a < b,
            Comparison::Equal => a == b,
        })
    }

    /// Canonical textual form
    pub fn render(&self) -> String {
        match self {
            Variable::Number(n) if n.is_infinite() => {
                let sign = if n.is_sign_positive() { '+' } else { '-' };
                format!("{}Inf", sign)
            }
            Variable::Number(n) => format!("{:.6}", n),
            Variable::Boolean(b) => b.to_string(),
            Variable::String(s) => s.clone(),
        }
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Whether `input` fits in the 53 bits a `Number` represents exactly
pub fn variable_bounded(input: i64) -> bool {
    let magnitude = input.unsigned_abs();
    (u64::BITS - magnitude.leading_zeros()) <= 53
}
