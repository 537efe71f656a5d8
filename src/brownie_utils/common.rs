use std::fmt;

use eyre::ContextCompat;
use serde_json::Value;

/// A positional constructor argument for the generated deploy call.
///
/// [`ConstructorArg::Raw`] is interpolated into the script untouched and must
/// already be a valid Python literal. Every other variant is rendered with
/// the quoting and escaping it needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstructorArg {
    Raw(String),
    Str(String),
    Int(String),
    Bool(bool),
    Array(Vec<ConstructorArg>),
}

impl ConstructorArg {
    pub fn raw(literal: impl ToString) -> Self {
        Self::Raw(literal.to_string())
    }

    pub fn str(value: impl ToString) -> Self {
        Self::Str(value.to_string())
    }

    pub fn int(value: impl ToString) -> eyre::Result<Self> {
        let value = value.to_string();
        let digits = value.strip_prefix('-').unwrap_or(&value);

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            eyre::bail!("Not an integer: {value}");
        }

        Ok(Self::Int(value))
    }

    pub fn to_python(&self) -> String {
        match self {
            Self::Raw(literal) => literal.clone(),
            Self::Str(value) => python_str(value),
            Self::Int(value) => value.clone(),
            Self::Bool(true) => "True".to_string(),
            Self::Bool(false) => "False".to_string(),
            Self::Array(items) => {
                let items: Vec<_> = items.iter().map(Self::to_python).collect();
                format!("[{}]", items.join(", "))
            }
        }
    }

    /// Parses a JSON array into structured arguments.
    pub fn parse_json_list(s: &str) -> eyre::Result<Vec<Self>> {
        let value: Value = serde_json::from_str(s)?;

        let Value::Array(items) = value else {
            eyre::bail!("Constructor arguments must be a JSON array, got {s}");
        };

        items.into_iter().map(Self::try_from).collect()
    }
}

impl TryFrom<Value> for ConstructorArg {
    type Error = eyre::Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(s) => Ok(Self::Str(s)),
            Value::Bool(b) => Ok(Self::Bool(b)),
            Value::Number(n) => {
                let n = n
                    .as_i64()
                    .map(|n| n.to_string())
                    .or_else(|| n.as_u64().map(|n| n.to_string()))
                    .with_context(|| {
                        format!("Fractional constructor argument {n}")
                    })?;

                Self::int(n)
            }
            Value::Array(items) => Ok(Self::Array(
                items
                    .into_iter()
                    .map(Self::try_from)
                    .collect::<eyre::Result<_>>()?,
            )),
            Value::Null => eyre::bail!("Null constructor arguments are not supported"),
            Value::Object(_) => {
                eyre::bail!("Object constructor arguments are not supported")
            }
        }
    }
}

impl fmt::Display for ConstructorArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_python())
    }
}

/// Renders a single quoted Python string literal.
pub fn python_str(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);

    out.push('\'');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                out.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('\'');

    out
}
