//! Adapters marking where decoding recovers from a problem.
//!
//! Record fields use the `nullable` and `or_default` functions. Collection elements
//! and map values, which take no field attributes, use the [`Nullable`] wrapper.
//!
//! ```rust
//! use std::collections::BTreeMap;
//!
//! use salvage::Nullable;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Order {
//!     #[serde(default, deserialize_with = "salvage::nullable")]
//!     count: Option<i32>,
//!     #[serde(default, deserialize_with = "salvage::or_default")]
//!     tags: Vec<String>,
//!     #[serde(default, deserialize_with = "salvage::nullable")]
//!     quantities: Option<Vec<Nullable<u32>>>,
//!     #[serde(default, deserialize_with = "salvage::nullable")]
//!     prices: Option<BTreeMap<String, Nullable<f64>>>,
//! }
//! ```

use std::ops::Deref;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use super::scope;

/// Decodes an optional field, replacing a failed value with the handler's substitute.
///
/// A `null` substitute, or one that does not decode as `T`, yields `None`. Outside
/// a collecting decode the error is returned unchanged.
/// Collection elements and map values use [`Nullable`] instead.
pub fn nullable<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Option::<T>::deserialize(deserializer) {
        Ok(value) => Ok(value),
        Err(error) => match scope::take_substitute() {
            Some(substitute) => Ok(Option::<T>::deserialize(substitute).unwrap_or_default()),
            None => Err(error),
        },
    }
}

/// Decodes a field, replacing a failed value with the handler's substitute or `T::default()`.
pub fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    match T::deserialize(deserializer) {
        Ok(value) => Ok(value),
        Err(error) => match scope::take_substitute() {
            Some(substitute) => Ok(T::deserialize(substitute).unwrap_or_default()),
            None => Err(error),
        },
    }
}

/// A value that becomes absent when it fails to decode, instead of failing its container.
///
/// This is [`nullable`] as a type, for places that take no field attribute: the
/// elements of a `Vec<Nullable<T>>` or the values of a `BTreeMap<K, Nullable<V>>`
/// recover one by one, so a bad element leaves its siblings decoded. A record field
/// of type `Nullable<T>` needs no attribute either; a missing field decodes as absent.
///
/// It serializes like `Option<T>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Nullable<T>(pub Option<T>);

impl<T> Nullable<T> {
    /// Wraps a present value.
    pub fn some(value: T) -> Self {
        Nullable(Some(value))
    }

    /// Returns the wrapped option.
    pub fn into_inner(self) -> Option<T> {
        self.0
    }
}

impl<T> Default for Nullable<T> {
    fn default() -> Self {
        Nullable(None)
    }
}

impl<T> Deref for Nullable<T> {
    type Target = Option<T>;

    fn deref(&self) -> &Option<T> {
        &self.0
    }
}

impl<T> From<Option<T>> for Nullable<T> {
    fn from(value: Option<T>) -> Self {
        Nullable(value)
    }
}

impl<T> From<Nullable<T>> for Option<T> {
    fn from(value: Nullable<T>) -> Self {
        value.0
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Nullable<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        nullable(deserializer).map(Nullable)
    }
}
