//! Property validators.
//!
//! A [`PropertyValidator`] is a pure check of one property value, reported under a
//! given name. Closures of the shape `Fn(&Property<'_>) -> ValidationResult` are
//! validators, as are the built-in [`Rule`]s.
//!
//! # Example
//!
//! ```rust
//! use salvage::{invalid, valid, Property, PropertyValidator};
//! use serde_json::json;
//!
//! let no_blank = |p: &Property<'_>| match p.value().as_str() {
//!     Some(text) if text.trim().is_empty() => invalid(p.issue("must not be blank")),
//!     _ => valid(),
//! };
//!
//! let value = json!("   ");
//! assert!(no_blank.validate(&Property::new("name", &value)).is_failure());
//! ```

mod builtin;

use std::sync::Arc;

use serde_json::Value;

use crate::issue::PropertyIssue;
use crate::validation::ValidationResult;

pub use builtin::{max, max_len, min, min_len, not_null, one_of, pattern, Rule};

/// The property being validated: the name issues are reported under, and its value.
#[derive(Debug, Clone, Copy)]
pub struct Property<'a> {
    name: &'a str,
    value: &'a Value,
}

impl<'a> Property<'a> {
    /// Creates a property view.
    pub fn new(name: &'a str, value: &'a Value) -> Self {
        Self { name, value }
    }

    /// The name issues about this property must be reported under.
    pub fn name(&self) -> &'a str {
        self.name
    }

    /// The current value of the property.
    pub fn value(&self) -> &'a Value {
        self.value
    }

    /// Creates an issue reported under this property's name.
    pub fn issue(&self, text: impl Into<String>) -> PropertyIssue {
        PropertyIssue::new(self.name, text)
    }
}

/// A business rule applied to one property value.
///
/// The `Send + Sync` bounds let validators live inside shared, reusable
/// [`PropertyConstraint`](crate::PropertyConstraint)s.
pub trait PropertyValidator: Send + Sync {
    /// Checks the property, returning every issue found.
    fn validate(&self, property: &Property<'_>) -> ValidationResult;
}

impl<F> PropertyValidator for F
where
    F: Fn(&Property<'_>) -> ValidationResult + Send + Sync,
{
    fn validate(&self, property: &Property<'_>) -> ValidationResult {
        self(property)
    }
}

/// A type-erased, shareable validator.
pub type SharedValidator = Arc<dyn PropertyValidator>;

/// Marker types that keep [`IntoValidators`] implementations apart.
#[doc(hidden)]
pub mod markers {
    /// A single validator.
    pub struct Single;
    /// A tuple, vector or `()` of validators.
    pub struct Many;
}

/// Conversion into an ordered list of validators.
///
/// Implemented for a single validator, for `()` (no validators), for tuples of up to
/// eight validators and for `Vec<SharedValidator>`. It stands in for the variadic
/// validator list of [`on`](crate::on).
pub trait IntoValidators<Marker> {
    /// Returns the validators in declaration order.
    fn into_validators(self) -> Vec<SharedValidator>;
}

impl<V> IntoValidators<markers::Single> for V
where
    V: PropertyValidator + 'static,
{
    fn into_validators(self) -> Vec<SharedValidator> {
        vec![Arc::new(self)]
    }
}

impl IntoValidators<markers::Many> for () {
    fn into_validators(self) -> Vec<SharedValidator> {
        Vec::new()
    }
}

impl IntoValidators<markers::Many> for Vec<SharedValidator> {
    fn into_validators(self) -> Vec<SharedValidator> {
        self
    }
}

macro_rules! impl_into_validators_for_tuple {
    ($($name:ident),+) => {
        impl<$($name),+> IntoValidators<markers::Many> for ($($name,)+)
        where
            $($name: PropertyValidator + 'static),+
        {
            #[allow(non_snake_case)]
            fn into_validators(self) -> Vec<SharedValidator> {
                let ($($name,)+) = self;
                vec![$(Arc::new($name) as SharedValidator),+]
            }
        }
    };
}

impl_into_validators_for_tuple!(A);
impl_into_validators_for_tuple!(A, B);
impl_into_validators_for_tuple!(A, B, C);
impl_into_validators_for_tuple!(A, B, C, D);
impl_into_validators_for_tuple!(A, B, C, D, E);
impl_into_validators_for_tuple!(A, B, C, D, E, F);
impl_into_validators_for_tuple!(A, B, C, D, E, F, G);
impl_into_validators_for_tuple!(A, B, C, D, E, F, G, H);
