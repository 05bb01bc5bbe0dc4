//! Named read access to record properties.
//!
//! Constraints are declared by property name, so the record they are applied to must
//! be able to hand out a property value by that name. [`FieldAccessor`] is that
//! capability; it is implemented for JSON objects and, through
//! [`impl_field_accessor!`](crate::impl_field_accessor), for plain structs.

use serde_json::{Map, Value};
use thiserror::Error;

/// Failure to read a named property from a record.
#[derive(Debug, Error)]
pub enum AccessError {
    /// The record has no property with this name.
    #[error("no property named `{0}`")]
    UnknownProperty(String),

    /// The property exists but could not be turned into a value.
    #[error("property `{name}` could not be read")]
    Unreadable {
        name: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Reads a property of a record by name.
pub trait FieldAccessor {
    /// Returns the current value of the property called `name`.
    fn field(&self, name: &str) -> Result<Value, AccessError>;
}

impl FieldAccessor for Map<String, Value> {
    fn field(&self, name: &str) -> Result<Value, AccessError> {
        self.get(name)
            .cloned()
            .ok_or_else(|| AccessError::UnknownProperty(name.to_string()))
    }
}

/// Objects expose their keys. Any other value has no properties.
impl FieldAccessor for Value {
    fn field(&self, name: &str) -> Result<Value, AccessError> {
        match self {
            Value::Object(map) => map.field(name),
            _ => Err(AccessError::UnknownProperty(name.to_string())),
        }
    }
}

impl<T: FieldAccessor + ?Sized> FieldAccessor for &T {
    fn field(&self, name: &str) -> Result<Value, AccessError> {
        (**self).field(name)
    }
}

/// Implements [`FieldAccessor`] for a struct whose listed fields are `Serialize`.
///
/// Each field is exposed under its Rust name, or under the name given after `as`.
///
/// ```rust
/// use salvage::{impl_field_accessor, FieldAccessor};
///
/// struct Person {
///     name: Option<String>,
///     age: u32,
/// }
///
/// impl_field_accessor!(Person { name, age as "yearsOld" });
///
/// let person = Person { name: None, age: 7 };
/// assert!(person.field("name").unwrap().is_null());
/// assert_eq!(person.field("yearsOld").unwrap(), 7);
/// assert!(person.field("age").is_err());
/// ```
#[macro_export]
macro_rules! impl_field_accessor {
    (@name $field:ident as $label:literal) => {
        $label
    };
    (@name $field:ident) => {
        stringify!($field)
    };
    ($ty:ty { $($field:ident $(as $label:literal)?),* $(,)? }) => {
        impl $crate::FieldAccessor for $ty {
            fn field(
                &self,
                name: &str,
            ) -> ::core::result::Result<$crate::__serde_json::Value, $crate::AccessError> {
                $(
                    if name == $crate::impl_field_accessor!(@name $field $(as $label)?) {
                        return $crate::__serde_json::to_value(&self.$field).map_err(|source| {
                            $crate::AccessError::Unreadable {
                                name: name.to_string(),
                                source,
                            }
                        });
                    }
                )*
                ::core::result::Result::Err($crate::AccessError::UnknownProperty(name.to_string()))
            }
        }
    };
}
