//! Declarative property constraints.
//!
//! A [`PropertyConstraint`] binds a property name to an ordered list of validators,
//! optionally reporting issues under a different name. Constraints hold no per-target
//! state, so one instance can be built at startup and applied to any number of
//! records, from any number of threads.
//!
//! # Example
//!
//! ```rust
//! use salvage::{max_len, not_null, on, on_as};
//! use serde_json::json;
//!
//! let name = on("name", (not_null(), max_len(3)));
//! let zip = on_as("zipCode", "postal code", not_null());
//!
//! let record = json!({"name": "Marguerite", "zipCode": null});
//!
//! let issues = salvage::issues_of(&salvage::and(
//!     name.apply(&record).check(),
//!     zip.apply(&record).check(),
//! ));
//! assert_eq!(issues.len(), 2);
//! assert_eq!(issues.at_property("postal code").len(), 1);
//! ```

use std::fmt;

use log::trace;
use serde_json::Value;

use crate::access::{AccessError, FieldAccessor};
use crate::issue::PropertyIssues;
use crate::validation::{all, issues_of, ValidationResult};
use crate::validator::{IntoValidators, Property, SharedValidator};

/// A reusable binding of one property to its validators.
#[derive(Clone)]
pub struct PropertyConstraint {
    property_name: String,
    report_as: String,
    validators: Vec<SharedValidator>,
}

impl PropertyConstraint {
    /// Creates a constraint reporting under the property's own name.
    pub fn new<M>(property_name: impl Into<String>, validators: impl IntoValidators<M>) -> Self {
        let property_name = property_name.into();
        Self {
            report_as: property_name.clone(),
            property_name,
            validators: validators.into_validators(),
        }
    }

    /// Reports issues under `label` instead of the property name.
    pub fn report_as(mut self, label: impl Into<String>) -> Self {
        self.report_as = label.into();
        self
    }

    /// Appends validators after the existing ones.
    pub fn validator<M>(mut self, validators: impl IntoValidators<M>) -> Self {
        self.validators.extend(validators.into_validators());
        self
    }

    /// Name used to read the value from the target.
    pub fn property_name(&self) -> &str {
        &self.property_name
    }

    /// Name issues are reported under.
    pub fn reported_as(&self) -> &str {
        &self.report_as
    }

    /// Reads the property from `target`, ready to be checked.
    ///
    /// # Errors
    ///
    /// Returns the accessor's error if the target does not expose the property.
    pub fn try_apply<T>(&self, target: &T) -> Result<PendingCheck<'_>, AccessError>
    where
        T: FieldAccessor + ?Sized,
    {
        trace!(
            "applying {} validator(s) to `{}` (reported as `{}`)",
            self.validators.len(),
            self.property_name,
            self.report_as
        );
        let value = target.field(&self.property_name)?;
        Ok(PendingCheck {
            constraint: self,
            value,
        })
    }

    /// Reads the property from `target`, ready to be checked.
    ///
    /// # Panics
    ///
    /// Panics if the target does not expose the property. A constraint naming a
    /// property the target type lacks is a configuration defect.
    pub fn apply<T>(&self, target: &T) -> PendingCheck<'_>
    where
        T: FieldAccessor + ?Sized,
    {
        match self.try_apply(target) {
            Ok(pending) => pending,
            Err(error) => panic!("cannot apply constraint: {}", error),
        }
    }
}

impl fmt::Debug for PropertyConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyConstraint")
            .field("property_name", &self.property_name)
            .field("report_as", &self.report_as)
            .field("validators", &self.validators.len())
            .finish()
    }
}

/// A constraint applied to one target, holding the property value it read.
#[derive(Debug)]
pub struct PendingCheck<'c> {
    constraint: &'c PropertyConstraint,
    value: Value,
}

impl PendingCheck<'_> {
    /// The value read from the target.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Runs every validator in declaration order and combines their results.
    ///
    /// A constraint without validators is valid.
    pub fn check(&self) -> ValidationResult {
        let property = Property::new(&self.constraint.report_as, &self.value);
        all(self
            .constraint
            .validators
            .iter()
            .map(|validator| validator.validate(&property)))
    }

    /// Issues found by [`check`](Self::check), empty when valid.
    pub fn issues(&self) -> PropertyIssues {
        issues_of(&self.check())
    }
}

/// Builds a constraint on `property_name` reporting under the same name.
///
/// `validators` is one validator, a tuple of validators, `()` or a
/// `Vec<SharedValidator>`.
pub fn on<M>(
    property_name: impl Into<String>,
    validators: impl IntoValidators<M>,
) -> PropertyConstraint {
    PropertyConstraint::new(property_name, validators)
}

/// Builds a constraint on `property_name` reporting under `report_as`.
pub fn on_as<M>(
    property_name: impl Into<String>,
    report_as: impl Into<String>,
    validators: impl IntoValidators<M>,
) -> PropertyConstraint {
    PropertyConstraint::new(property_name, validators).report_as(report_as)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{invalid, valid};
    use crate::validator::{min_len, not_null};
    use serde_json::json;

    fn failing(text: &'static str) -> impl Fn(&Property<'_>) -> ValidationResult + Send + Sync {
        move |p: &Property<'_>| invalid(p.issue(text))
    }

    #[test]
    fn test_no_validators_is_valid() {
        let constraint = on("name", ());
        assert!(constraint.apply(&json!({"name": null})).check().is_success());
    }

    #[test]
    fn test_validators_run_in_declaration_order() {
        let constraint = on("name", (failing("first"), failing("second")));
        let texts: Vec<_> = constraint
            .apply(&json!({"name": 1}))
            .issues()
            .into_iter()
            .map(|i| i.issue)
            .collect();
        assert_eq!(texts, vec!["first", "second"]);
    }

    #[test]
    fn test_report_as_renames_issues() {
        let constraint = on_as("zip", "postal code", failing("bad"));
        let issues = constraint.apply(&json!({"zip": "x"})).issues();

        assert_eq!(issues.first().unwrap().property_name, "postal code");
        assert!(issues.at_property("zip").is_empty());
    }

    #[test]
    fn test_builder_appends_validators() {
        let constraint = PropertyConstraint::new("name", not_null())
            .validator(min_len(2))
            .report_as("label");

        assert_eq!(constraint.property_name(), "name");
        assert_eq!(constraint.reported_as(), "label");

        let check = constraint.apply(&json!({"name": "a"}));
        assert_eq!(check.value(), &json!("a"));
        assert_eq!(check.issues().with_code("min_length").len(), 1);
    }

    #[test]
    fn test_passing_validators() {
        let ok = |_: &Property<'_>| valid();
        assert!(on("n", (ok, ok)).apply(&json!({"n": 0})).check().is_success());
    }

    #[test]
    fn test_unknown_property() {
        let constraint = on("missing", not_null());
        let error = constraint.try_apply(&json!({"name": 1})).unwrap_err();
        assert!(matches!(error, AccessError::UnknownProperty(name) if name == "missing"));
    }

    #[test]
    #[should_panic(expected = "no property named `missing`")]
    fn test_apply_panics_on_unknown_property() {
        let _ = on("missing", not_null()).apply(&json!({}));
    }
}
