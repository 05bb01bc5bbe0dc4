//! Decode-and-validate pipeline.

use log::debug;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::access::FieldAccessor;
use crate::constraint::PropertyConstraint;
use crate::decode::{Decoded, Decoder};

impl Decoder {
    /// Decodes `input`, then checks every constraint against the decoded value.
    ///
    /// The issues are the decode-time issues followed by each constraint's issues, in
    /// declaration order. Constraints only run when the root value survived decoding.
    ///
    /// # Panics
    ///
    /// Panics if a constraint names a property `T` does not expose.
    pub fn bind<T>(&self, input: &Value, constraints: &[PropertyConstraint]) -> Decoded<T>
    where
        T: DeserializeOwned + FieldAccessor,
    {
        let mut decoded = self.decode::<T>(input);
        if let Some(value) = &decoded.value {
            for constraint in constraints {
                decoded.issues.extend(constraint.apply(value).issues());
            }
            debug!(
                "bound {} with {} constraint(s), {} issue(s) in total",
                std::any::type_name::<T>(),
                constraints.len(),
                decoded.issues.len()
            );
        }
        decoded
    }
}

/// Decodes `input` with the default [`Decoder`] and validates it against `constraints`.
///
/// # Example
///
/// ```rust
/// use salvage::{bind, impl_field_accessor, min, on};
/// use serde::Deserialize;
/// use serde_json::json;
///
/// #[derive(Deserialize)]
/// struct Signup {
///     #[serde(default, deserialize_with = "salvage::nullable")]
///     age: Option<u8>,
///     #[serde(default, deserialize_with = "salvage::nullable")]
///     name: Option<String>,
/// }
///
/// impl_field_accessor!(Signup { age, name });
///
/// let constraints = [on("name", salvage::not_null()), on("age", min(18))];
/// let decoded = bind::<Signup>(&json!({"age": "old"}), &constraints);
///
/// let names: Vec<_> = decoded.issues.iter().map(|i| i.property_name.as_str()).collect();
/// assert_eq!(names, vec!["age", "name"]);
/// ```
pub fn bind<T>(input: &Value, constraints: &[PropertyConstraint]) -> Decoded<T>
where
    T: DeserializeOwned + FieldAccessor,
{
    Decoder::new().bind(input, constraints)
}
