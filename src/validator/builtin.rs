//! Built-in property rules.
//!
//! Each [`Rule`] checks one aspect of a property value and reports a single issue
//! with a stable code. Rules other than [`not_null`] accept `null` and values of
//! types they do not apply to, so they can be combined freely with `not_null`.

use regex::Regex;
use serde_json::Value;

use super::{Property, PropertyValidator};
use crate::validation::{invalid, valid, ValidationResult};

#[derive(Clone)]
enum RuleKind {
    NotNull,
    MinLength(usize),
    MaxLength(usize),
    Pattern(Regex),
    Min(f64),
    Max(f64),
    OneOf(Vec<Value>),
}

/// A built-in validator with an optional custom message.
///
/// # Example
///
/// ```rust
/// use salvage::{min_len, Property, PropertyValidator};
/// use serde_json::json;
///
/// let rule = min_len(3).error("name is too short");
/// let value = json!("Al");
///
/// let result = rule.validate(&Property::new("name", &value));
/// let issues = salvage::issues_of(&result);
/// assert_eq!(issues.first().unwrap().issue, "name is too short");
/// ```
#[derive(Clone)]
pub struct Rule {
    kind: RuleKind,
    message: Option<String>,
}

impl Rule {
    fn new(kind: RuleKind) -> Self {
        Self {
            kind,
            message: None,
        }
    }

    /// Replaces the default issue text.
    pub fn error(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Machine-readable code attached to issues from this rule.
    pub fn code(&self) -> &'static str {
        match self.kind {
            RuleKind::NotNull => "required",
            RuleKind::MinLength(_) => "min_length",
            RuleKind::MaxLength(_) => "max_length",
            RuleKind::Pattern(_) => "pattern",
            RuleKind::Min(_) => "min_value",
            RuleKind::Max(_) => "max_value",
            RuleKind::OneOf(_) => "one_of",
        }
    }

    fn reject(&self, property: &Property<'_>, default: String) -> ValidationResult {
        let text = self.message.clone().unwrap_or(default);
        invalid(property.issue(text).with_code(self.code()))
    }
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("code", &self.code())
            .field("message", &self.message)
            .finish()
    }
}

impl PropertyValidator for Rule {
    fn validate(&self, property: &Property<'_>) -> ValidationResult {
        let value = property.value();
        match &self.kind {
            RuleKind::NotNull if value.is_null() => {
                self.reject(property, "must not be null".to_string())
            }
            RuleKind::MinLength(min) => match length_of(value) {
                Some(len) if len < *min => self.reject(
                    property,
                    format!("length must be at least {}, got {}", min, len),
                ),
                _ => valid(),
            },
            RuleKind::MaxLength(max) => match length_of(value) {
                Some(len) if len > *max => self.reject(
                    property,
                    format!("length must be at most {}, got {}", max, len),
                ),
                _ => valid(),
            },
            RuleKind::Pattern(regex) => match value.as_str() {
                Some(text) if !regex.is_match(text) => {
                    self.reject(property, format!("must match pattern '{}'", regex.as_str()))
                }
                _ => valid(),
            },
            RuleKind::Min(min) => match value.as_f64() {
                Some(n) if n < *min => {
                    self.reject(property, format!("must be at least {}, got {}", min, value))
                }
                _ => valid(),
            },
            RuleKind::Max(max) => match value.as_f64() {
                Some(n) if n > *max => {
                    self.reject(property, format!("must be at most {}, got {}", max, value))
                }
                _ => valid(),
            },
            RuleKind::OneOf(allowed) if !value.is_null() && !allowed.contains(value) => {
                let listed: Vec<String> = allowed.iter().map(Value::to_string).collect();
                self.reject(property, format!("must be one of [{}]", listed.join(", ")))
            }
            _ => valid(),
        }
    }
}

/// Characters of a string or elements of an array.
fn length_of(value: &Value) -> Option<usize> {
    match value {
        Value::String(s) => Some(s.chars().count()),
        Value::Array(items) => Some(items.len()),
        _ => None,
    }
}

/// Rejects `null`.
pub fn not_null() -> Rule {
    Rule::new(RuleKind::NotNull)
}

/// Requires a string of at least `min` characters, or an array of at least `min` elements.
pub fn min_len(min: usize) -> Rule {
    Rule::new(RuleKind::MinLength(min))
}

/// Requires a string of at most `max` characters, or an array of at most `max` elements.
pub fn max_len(max: usize) -> Rule {
    Rule::new(RuleKind::MaxLength(max))
}

/// Requires a string matching the regex `pattern`.
///
/// Returns an error if the pattern does not compile.
pub fn pattern(pattern: &str) -> Result<Rule, regex::Error> {
    let regex = Regex::new(pattern)?;
    Ok(Rule::new(RuleKind::Pattern(regex)))
}

/// Requires a number greater than or equal to `min`.
pub fn min(min: impl Into<f64>) -> Rule {
    Rule::new(RuleKind::Min(min.into()))
}

/// Requires a number less than or equal to `max`.
pub fn max(max: impl Into<f64>) -> Rule {
    Rule::new(RuleKind::Max(max.into()))
}

/// Requires a value equal to one of `allowed`.
pub fn one_of<I>(allowed: I) -> Rule
where
    I: IntoIterator,
    I::Item: Into<Value>,
{
    Rule::new(RuleKind::OneOf(allowed.into_iter().map(Into::into).collect()))
}
