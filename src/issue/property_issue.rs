//! Property issue types.
//!
//! This module provides [`PropertyIssue`] for a single problem tied to a property
//! and [`PropertyIssues`] for accumulating them in encounter order.

use std::fmt::{self, Display};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use stillwater::prelude::*;

/// A single problem with a single property.
///
/// `PropertyIssue` captures:
/// - **property_name**: the normalized dotted path of the property (e.g. `zoo.1.colorEnum`)
/// - **issue**: human-readable, single-line description of the problem
/// - **code**: optional machine-readable code for programmatic handling
///
/// Serialized, an issue is the two-field record `{"propertyName": ..., "issue": ...}`;
/// the code is not part of that shape.
///
/// # Example
///
/// ```rust
/// use salvage::PropertyIssue;
///
/// let issue = PropertyIssue::new("email", "must contain @").with_code("pattern");
///
/// assert_eq!(issue.property_name, "email");
/// assert_eq!(issue.code.as_deref(), Some("pattern"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyIssue {
    /// Dotted path of the property the issue is reported for.
    pub property_name: String,
    /// Description of the problem.
    pub issue: String,
    /// Machine-readable issue code (e.g., `min_length`, `weird_string_value`).
    #[serde(skip)]
    pub code: Option<String>,
}

impl PropertyIssue {
    /// Creates a new issue for the given property.
    pub fn new(property_name: impl Into<String>, issue: impl Into<String>) -> Self {
        Self {
            property_name: property_name.into(),
            issue: issue.into(),
            code: None,
        }
    }

    /// Sets the issue code and returns self for chaining.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

impl Display for PropertyIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.property_name.is_empty() {
            write!(f, "(root): {}", self.issue)
        } else {
            write!(f, "{}: {}", self.property_name, self.issue)
        }
    }
}

/// An ordered collection of property issues.
///
/// Insertion order is preserved and significant: issues are reported in the order
/// the decoder or the validators produced them. Unlike a failed
/// [`ValidationResult`](crate::ValidationResult), a `PropertyIssues` may be empty;
/// [`PropertyIssues::empty`] is the identity for [`Semigroup::combine`].
///
/// # Combining Issues
///
/// ```rust
/// use salvage::{PropertyIssue, PropertyIssues};
/// use stillwater::prelude::*;
///
/// let left = PropertyIssues::single(PropertyIssue::new("name", "required"));
/// let right = PropertyIssues::single(PropertyIssue::new("email", "invalid format"));
///
/// let combined = left.combine(right);
/// assert_eq!(combined.len(), 2);
/// assert_eq!(combined.first().unwrap().property_name, "name");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyIssues(Vec<PropertyIssue>);

impl PropertyIssues {
    /// Creates an empty collection.
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// Creates a collection containing a single issue.
    pub fn single(issue: PropertyIssue) -> Self {
        Self(vec![issue])
    }

    /// Creates a collection from a `Vec<PropertyIssue>`, keeping its order.
    pub fn from_vec(issues: Vec<PropertyIssue>) -> Self {
        Self(issues)
    }

    /// Appends an issue.
    pub fn push(&mut self, issue: PropertyIssue) {
        self.0.push(issue);
    }

    /// Returns the number of issues in this collection.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no issue has been recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the contained issues.
    pub fn iter(&self) -> impl Iterator<Item = &PropertyIssue> {
        self.0.iter()
    }

    /// Returns the first issue, if any.
    pub fn first(&self) -> Option<&PropertyIssue> {
        self.0.first()
    }

    /// Returns all issues reported for the given property name.
    pub fn at_property(&self, property_name: &str) -> Vec<&PropertyIssue> {
        self.0
            .iter()
            .filter(|i| i.property_name == property_name)
            .collect()
    }

    /// Returns all issues with the specified code.
    pub fn with_code(&self, code: &str) -> Vec<&PropertyIssue> {
        self.0
            .iter()
            .filter(|i| i.code.as_deref() == Some(code))
            .collect()
    }

    /// Groups issues by property name, in order of first appearance.
    pub fn by_property(&self) -> IndexMap<&str, Vec<&PropertyIssue>> {
        let mut grouped: IndexMap<&str, Vec<&PropertyIssue>> = IndexMap::new();
        for issue in &self.0 {
            grouped
                .entry(issue.property_name.as_str())
                .or_default()
                .push(issue);
        }
        grouped
    }

    /// Converts this collection into a `Vec<PropertyIssue>`.
    pub fn into_vec(self) -> Vec<PropertyIssue> {
        self.0
    }
}

impl Semigroup for PropertyIssues {
    fn combine(mut self, other: Self) -> Self {
        self.0.extend(other.0);
        self
    }
}

impl From<PropertyIssue> for PropertyIssues {
    fn from(issue: PropertyIssue) -> Self {
        Self::single(issue)
    }
}

impl From<Vec<PropertyIssue>> for PropertyIssues {
    fn from(issues: Vec<PropertyIssue>) -> Self {
        Self::from_vec(issues)
    }
}

impl FromIterator<PropertyIssue> for PropertyIssues {
    fn from_iter<I: IntoIterator<Item = PropertyIssue>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<PropertyIssue> for PropertyIssues {
    fn extend<I: IntoIterator<Item = PropertyIssue>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl Display for PropertyIssues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return writeln!(f, "No property issues");
        }
        writeln!(f, "Found {} property issue(s):", self.len())?;
        for (i, issue) in self.iter().enumerate() {
            writeln!(f, "  {}. {}", i + 1, issue)?;
        }
        Ok(())
    }
}

impl IntoIterator for PropertyIssues {
    type Item = PropertyIssue;
    type IntoIter = std::vec::IntoIter<PropertyIssue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a PropertyIssues {
    type Item = &'a PropertyIssue;
    type IntoIter = std::slice::Iter<'a, PropertyIssue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// Both types only hold owned Strings, so they stay Send + Sync.
const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<PropertyIssue>();
    assert_sync::<PropertyIssue>();
    assert_send::<PropertyIssues>();
    assert_sync::<PropertyIssues>();
};
