//! Decode problem classification and the handlers problems are reported to.

use std::fmt::{self, Display};
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::issue::{PropertyIssue, PropertyIssues};
use crate::path::JsonPath;

static LINE_BREAKS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[ \t]*[\r\n\x0B\x0C\x{85}\x{2028}\x{2029}]+[ \t]*")
        .expect("line break pattern is valid")
});

/// Category of a recoverable decode problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProblemKind {
    /// A string could not be converted to the target type, or names no enum variant.
    WeirdStringValue,
    /// A number is out of range or not representable in the target type.
    WeirdNumberValue,
    /// A map key could not be converted, or a record field is unknown.
    WeirdKey,
    /// The input has the wrong shape for the target.
    UnexpectedToken,
    /// The target rejected otherwise well-formed input.
    InstantiationProblem,
    /// A record or map was requested from a scalar.
    MissingInstantiator,
}

impl ProblemKind {
    /// Human-readable label, the first part of the issue text.
    pub fn label(self) -> &'static str {
        match self {
            ProblemKind::WeirdStringValue => "Weird String Value",
            ProblemKind::WeirdNumberValue => "Weird Number Value",
            ProblemKind::WeirdKey => "Weird Key",
            ProblemKind::UnexpectedToken => "Unexpected Token",
            ProblemKind::InstantiationProblem => "Instantiation Problem",
            ProblemKind::MissingInstantiator => "Missing Instantiator",
        }
    }

    /// Issue code attached to issues of this kind.
    pub fn code(self) -> &'static str {
        match self {
            ProblemKind::WeirdStringValue => "weird_string_value",
            ProblemKind::WeirdNumberValue => "weird_number_value",
            ProblemKind::WeirdKey => "weird_key",
            ProblemKind::UnexpectedToken => "unexpected_token",
            ProblemKind::InstantiationProblem => "instantiation_problem",
            ProblemKind::MissingInstantiator => "missing_instantiator",
        }
    }
}

impl Display for ProblemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A classified decode problem: its kind, the offending value and a detail message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Problem {
    /// What went wrong.
    pub kind: ProblemKind,
    /// The offending input as text, when there is one to show.
    pub value: Option<String>,
    /// Explanation of why the input was rejected.
    pub detail: String,
}

impl Problem {
    /// Creates a problem without an offending value.
    pub fn new(kind: ProblemKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            value: None,
            detail: detail.into(),
        }
    }

    /// Attaches the offending value.
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Converts the problem into the issue reported for `path`.
    ///
    /// The text is `"<label>, <value>, <detail>"` with line breaks collapsed to single
    /// spaces.
    pub fn to_issue(&self, path: &JsonPath) -> PropertyIssue {
        PropertyIssue::new(path.to_string(), single_line(&self.to_string()))
            .with_code(self.kind.code())
    }
}

impl Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{}, {}, {}", self.kind.label(), value, self.detail),
            None => write!(f, "{}, {}", self.kind.label(), self.detail),
        }
    }
}

/// Collapses each run of line terminators, with the blanks around it, into one space.
///
/// Breaks become a space rather than being dropped, so the words on either side of
/// a break stay separated: `"missing @\n  while"` becomes `"missing @ while"`, not
/// `"missing @while"`.
pub(crate) fn single_line(text: &str) -> String {
    LINE_BREAKS.replace_all(text, " ").trim().to_string()
}

/// Receives recoverable decode problems.
///
/// The decoder calls [`handle`](ProblemHandler::handle) once per problem, at the
/// deepest path where it was detected. The returned value is what the failed
/// property decodes to when its field is annotated with
/// [`nullable`](crate::nullable) or [`or_default`](crate::or_default); `null`
/// leaves the property absent.
///
/// Closures `FnMut(&JsonPath, &Problem) -> Value` are handlers.
pub trait ProblemHandler {
    /// Handles the problem found at `path` and returns the substitute value.
    fn handle(&mut self, path: &JsonPath, problem: &Problem) -> Value;
}

impl<F> ProblemHandler for F
where
    F: FnMut(&JsonPath, &Problem) -> Value,
{
    fn handle(&mut self, path: &JsonPath, problem: &Problem) -> Value {
        self(path, problem)
    }
}

/// The default handler: records one issue per problem and substitutes `null`.
#[derive(Debug, Default)]
pub struct IssueCollector {
    issues: PropertyIssues,
}

impl IssueCollector {
    /// Creates a collector with no issues.
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues recorded so far, in the order problems were encountered.
    pub fn issues(&self) -> &PropertyIssues {
        &self.issues
    }

    /// Consumes the collector, returning its issues.
    pub fn into_issues(self) -> PropertyIssues {
        self.issues
    }
}

impl ProblemHandler for IssueCollector {
    fn handle(&mut self, path: &JsonPath, problem: &Problem) -> Value {
        self.issues.push(problem.to_issue(path));
        Value::Null
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_problem_text() {
        let problem = Problem::new(ProblemKind::WeirdStringValue, "not a valid i32 value")
            .with_value("abc");
        assert_eq!(
            problem.to_string(),
            "Weird String Value, abc, not a valid i32 value"
        );

        let bare = Problem::new(ProblemKind::UnexpectedToken, "expected array");
        assert_eq!(bare.to_string(), "Unexpected Token, expected array");
    }

    #[test]
    fn test_single_line_collapses_breaks() {
        assert_eq!(single_line("a \n b"), "a b");
        assert_eq!(single_line("a\r\n\r\nb"), "a b");
        assert_eq!(single_line("a\u{2028}b\n"), "a b");
        assert_eq!(single_line("  plain  "), "plain");
        assert_eq!(single_line("missing @\n  while"), "missing @ while");
    }

    #[test]
    fn test_issue_carries_path_and_code() {
        let problem =
            Problem::new(ProblemKind::WeirdKey, "not a valid u32 key").with_value("x");
        let issue = problem.to_issue(&JsonPath::from_field("scores").push_field("x"));

        assert_eq!(issue.property_name, "scores.x");
        assert_eq!(issue.issue, "Weird Key, x, not a valid u32 key");
        assert_eq!(issue.code.as_deref(), Some("weird_key"));
    }

    #[test]
    fn test_collector_records_and_substitutes_null() {
        let mut collector = IssueCollector::new();
        let problem = Problem::new(ProblemKind::MissingInstantiator, "no way");

        let substitute = collector.handle(&JsonPath::root(), &problem);

        assert!(substitute.is_null());
        assert_eq!(collector.issues().len(), 1);
        assert_eq!(collector.into_issues().first().unwrap().property_name, "");
    }

    #[test]
    fn test_closure_handler() {
        let mut seen = Vec::new();
        let mut handler = |path: &JsonPath, problem: &Problem| {
            seen.push((path.to_string(), problem.kind));
            Value::from(0)
        };

        let substitute = handler.handle(&JsonPath::from_field("n"), &Problem::new(
            ProblemKind::WeirdNumberValue,
            "too big",
        ));

        assert_eq!(substitute, Value::from(0));
        assert_eq!(seen, vec![("n".to_string(), ProblemKind::WeirdNumberValue)]);
    }
}
