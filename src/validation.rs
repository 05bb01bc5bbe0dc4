//! Validation results and their combination law.
//!
//! A single check produces a [`ValidationResult`]: `Validation::Success(())` when
//! the checked value is valid, `Validation::Failure(issues)` with a non-empty
//! [`PropertyIssues`] otherwise. Results are combined without short-circuiting, so
//! folding several checks yields every issue they found, in evaluation order.

use stillwater::prelude::*;
use stillwater::Validation;

use crate::issue::PropertyIssues;

/// Result of a check: valid, or invalid with the issues found.
pub type ValidationResult<T = ()> = Validation<T, PropertyIssues>;

/// Returns the valid result.
pub fn valid() -> ValidationResult {
    Validation::Success(())
}

/// Builds an invalid result from one or more issues.
///
/// # Panics
///
/// Panics if `issues` is empty. An invalid result without issues is a programming
/// error, not a valid outcome.
///
/// # Example
///
/// ```rust
/// use salvage::{invalid, PropertyIssue};
///
/// let result = invalid(PropertyIssue::new("name", "Failed"));
/// assert!(result.is_failure());
/// ```
pub fn invalid(issues: impl Into<PropertyIssues>) -> ValidationResult {
    let issues = issues.into();
    assert!(
        !issues.is_empty(),
        "an invalid validation result requires at least one property issue"
    );
    Validation::Failure(issues)
}

/// Combines two results.
///
/// The outcome is valid only if both are valid; otherwise it is invalid with the
/// left issues followed by the right issues.
pub fn and(left: ValidationResult, right: ValidationResult) -> ValidationResult {
    match (left, right) {
        (Validation::Success(()), Validation::Success(())) => valid(),
        (Validation::Failure(left), Validation::Failure(right)) => {
            Validation::Failure(left.combine(right))
        }
        (Validation::Failure(issues), Validation::Success(()))
        | (Validation::Success(()), Validation::Failure(issues)) => Validation::Failure(issues),
    }
}

/// Folds a sequence of results with [`and`].
///
/// Every result is consumed; nothing short-circuits. An empty sequence is valid.
///
/// # Example
///
/// ```rust
/// use salvage::{all, invalid, valid, PropertyIssue};
///
/// let result = all(vec![
///     invalid(PropertyIssue::new("a", "first")),
///     valid(),
///     invalid(PropertyIssue::new("b", "second")),
/// ]);
///
/// let issues = salvage::issues_of(&result);
/// assert_eq!(issues.len(), 2);
/// ```
pub fn all<I>(results: I) -> ValidationResult
where
    I: IntoIterator<Item = ValidationResult>,
{
    results.into_iter().fold(valid(), and)
}

/// Returns the issues of a result, empty when it is valid.
pub fn issues_of<T>(result: &ValidationResult<T>) -> PropertyIssues {
    match result {
        Validation::Success(_) => PropertyIssues::empty(),
        Validation::Failure(issues) => issues.clone(),
    }
}
