//! The error type threaded through the decoder.

use std::fmt::{self, Display};

use serde::de::{self, Expected, Unexpected};
use serde_json::Value;

use super::problem::{Problem, ProblemKind};
use super::scope;
use crate::path::JsonPath;

/// A decode failure.
///
/// Created unlocated by serde visitors, the error is located exactly once, at the
/// deepest path the decoder knows about, and reported to the active problem handler
/// at that moment. Outer levels pass located errors through unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodeError {
    problem: Problem,
    path: Option<JsonPath>,
}

impl DecodeError {
    pub(crate) fn new(problem: Problem) -> Self {
        Self {
            problem,
            path: None,
        }
    }

    /// The classified problem.
    pub fn problem(&self) -> &Problem {
        &self.problem
    }

    /// Where the problem occurred, once located.
    pub fn path(&self) -> Option<&JsonPath> {
        self.path.as_ref()
    }

    /// Locates the error at the node being decoded.
    pub(crate) fn locate(self, path: &JsonPath, node: &Value) -> Self {
        let kind = self.problem.kind;
        self.locate_with(path, || describe(kind, node))
    }

    /// Locates the error, taking the offending value from `value` if it has none.
    pub(crate) fn locate_with(mut self, path: &JsonPath, value: impl FnOnce() -> String) -> Self {
        if self.path.is_some() {
            return self;
        }
        if self.problem.value.is_none() {
            self.problem.value = Some(value());
        }
        scope::intercept(path, &self.problem);
        self.path = Some(path.clone());
        self
    }

    /// Reclassifies a value problem raised while decoding a map key.
    pub(crate) fn as_key_error(mut self) -> Self {
        if self.path.is_none()
            && matches!(
                self.problem.kind,
                ProblemKind::WeirdStringValue | ProblemKind::WeirdNumberValue
            )
        {
            self.problem.kind = ProblemKind::WeirdKey;
        }
        self
    }
}

/// Renders the offending value: the token type for shape problems, the value otherwise.
fn describe(kind: ProblemKind, node: &Value) -> String {
    match (kind, node) {
        (ProblemKind::UnexpectedToken, _) => token_name(node).to_string(),
        (_, Value::String(s)) => s.clone(),
        _ => node.to_string(),
    }
}

/// Name of the JSON token type of `node`.
pub(crate) fn token_name(node: &Value) -> &'static str {
    match node {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn classify(unexp: Unexpected<'_>, exp: &dyn Expected) -> Problem {
    let (kind, value) = match unexp {
        Unexpected::Str(s) => (ProblemKind::WeirdStringValue, Some(s.to_string())),
        Unexpected::Char(c) => (ProblemKind::WeirdStringValue, Some(c.to_string())),
        Unexpected::Unsigned(n) => (ProblemKind::WeirdNumberValue, Some(n.to_string())),
        Unexpected::Signed(n) => (ProblemKind::WeirdNumberValue, Some(n.to_string())),
        Unexpected::Float(n) => (ProblemKind::WeirdNumberValue, Some(n.to_string())),
        _ => (ProblemKind::UnexpectedToken, None),
    };
    Problem {
        kind,
        value,
        detail: format!("expected {}", exp),
    }
}

impl Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) if !path.is_root() => write!(f, "{}: {}", path, self.problem),
            _ => write!(f, "(root): {}", self.problem),
        }
    }
}

impl std::error::Error for DecodeError {}

impl de::Error for DecodeError {
    fn custom<T: Display>(msg: T) -> Self {
        Self::new(Problem::new(
            ProblemKind::InstantiationProblem,
            msg.to_string(),
        ))
    }

    fn invalid_type(unexp: Unexpected<'_>, exp: &dyn Expected) -> Self {
        Self::new(classify(unexp, exp))
    }

    fn invalid_value(unexp: Unexpected<'_>, exp: &dyn Expected) -> Self {
        Self::new(classify(unexp, exp))
    }

    fn invalid_length(len: usize, exp: &dyn Expected) -> Self {
        Self::new(Problem::new(
            ProblemKind::InstantiationProblem,
            format!("invalid length {}, expected {}", len, exp),
        ))
    }

    fn unknown_variant(variant: &str, expected: &'static [&'static str]) -> Self {
        Self::new(
            Problem::new(
                ProblemKind::WeirdStringValue,
                format!("not one of the values accepted: [{}]", expected.join(", ")),
            )
            .with_value(variant),
        )
    }

    fn unknown_field(field: &str, expected: &'static [&'static str]) -> Self {
        Self::new(
            Problem::new(
                ProblemKind::WeirdKey,
                format!("not one of the known properties: [{}]", expected.join(", ")),
            )
            .with_value(field),
        )
    }

    fn missing_field(field: &'static str) -> Self {
        Self::new(
            Problem::new(ProblemKind::InstantiationProblem, "missing required field")
                .with_value(field),
        )
    }

    fn duplicate_field(field: &'static str) -> Self {
        Self::new(
            Problem::new(ProblemKind::InstantiationProblem, "duplicate field").with_value(field),
        )
    }
}
