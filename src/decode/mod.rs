//! Error-tolerant decoding of `serde_json::Value` trees into typed records.
//!
//! A [`Decoder`] drives `serde` over the input while tracking the [`JsonPath`] of
//! every node. Each failure is classified as a [`Problem`], reported once to the
//! active [`ProblemHandler`] at the deepest path where it occurred, and then
//! recovered from at the nearest field marked with [`nullable`] or [`or_default`],
//! or the nearest [`Nullable`] collection element or map value. Values without an
//! adapter abort their enclosing record or collection, which in turn recovers at its
//! own adapter, or leaves the root value absent.
//!
//! # Example
//!
//! ```rust
//! use salvage::decode_collecting_issues;
//! use serde::Deserialize;
//! use serde_json::json;
//!
//! #[derive(Debug, Deserialize)]
//! struct Counter {
//!     #[serde(default, deserialize_with = "salvage::nullable")]
//!     count: Option<i32>,
//! }
//!
//! let (counter, issues) = decode_collecting_issues::<Counter>(&json!({"count": "abc"}));
//!
//! assert_eq!(counter.unwrap().count, None);
//! assert_eq!(issues.len(), 1);
//! assert_eq!(issues.first().unwrap().property_name, "count");
//! assert_eq!(
//!     issues.first().unwrap().issue,
//!     "Weird String Value, abc, not a valid i32 value"
//! );
//! ```

mod deserializer;
mod error;
mod field;
mod problem;
mod scope;

use std::any::type_name;
use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::issue::PropertyIssues;
use crate::path::JsonPath;
use deserializer::NodeDeserializer;

pub use error::DecodeError;
pub use field::{nullable, or_default, Nullable};
pub use problem::{IssueCollector, Problem, ProblemHandler, ProblemKind};

/// Outcome of a collecting decode: the best-effort value and every issue found.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded<T> {
    /// The decoded value, `None` when the root itself could not be decoded.
    pub value: Option<T>,
    /// Issues in the order they were encountered.
    pub issues: PropertyIssues,
}

impl<T> Decoded<T> {
    /// Returns true if the value decoded without any issue.
    pub fn is_clean(&self) -> bool {
        self.value.is_some() && self.issues.is_empty()
    }

    /// Splits into the decoded value and its issues.
    pub fn into_parts(self) -> (Option<T>, PropertyIssues) {
        (self.value, self.issues)
    }
}

/// Decoder configuration.
///
/// # Example
///
/// ```rust
/// use salvage::Decoder;
/// use serde_json::json;
///
/// let lenient = Decoder::new().decode::<u32>(&json!("12"));
/// assert_eq!(lenient.value, Some(12));
///
/// let exact = Decoder::new().coerce_scalars(false).decode::<u32>(&json!("12"));
/// assert_eq!(exact.value, None);
/// assert_eq!(exact.issues.first().unwrap().issue, "Unexpected Token, string, expected integer");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Decoder {
    coerce_scalars: bool,
}

impl Default for Decoder {
    fn default() -> Self {
        Self {
            coerce_scalars: true,
        }
    }
}

impl Decoder {
    /// Creates a decoder with scalar coercion enabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables lenient scalar coercion.
    ///
    /// When enabled, strings parse into numbers, booleans and chars, numbers and
    /// booleans render into strings, and integral floats convert into integers.
    pub fn coerce_scalars(mut self, enabled: bool) -> Self {
        self.coerce_scalars = enabled;
        self
    }

    /// Decodes `input`, collecting one issue per problem.
    pub fn decode<T: DeserializeOwned>(&self, input: &Value) -> Decoded<T> {
        let (value, collector) = self.decode_with::<T, _>(input, IssueCollector::new());
        let issues = collector.into_issues();
        debug!(
            "collected {} issue(s) decoding {}",
            issues.len(),
            type_name::<T>()
        );
        Decoded { value, issues }
    }

    /// Decodes `input`, reporting problems to `handler`, and hands the handler back.
    ///
    /// The handler is owned by the decode for its duration, so it must be `'static`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use salvage::{Decoder, JsonPath, Problem};
    /// use serde::Deserialize;
    /// use serde_json::{json, Value};
    ///
    /// #[derive(Deserialize)]
    /// struct Reading {
    ///     #[serde(default, deserialize_with = "salvage::or_default")]
    ///     level: u8,
    /// }
    ///
    /// let clamp = |_: &JsonPath, _: &Problem| Value::from(u8::MAX);
    /// let (reading, _) = Decoder::new().decode_with::<Reading, _>(&json!({"level": 900}), clamp);
    ///
    /// assert_eq!(reading.unwrap().level, 255);
    /// ```
    pub fn decode_with<T, H>(&self, input: &Value, handler: H) -> (Option<T>, H)
    where
        T: DeserializeOwned,
        H: ProblemHandler + 'static,
    {
        let shared = Rc::new(RefCell::new(handler));
        let value = {
            let _scope = scope::enter(Some(shared.clone()));
            self.run::<T>(input).ok()
        };

        if value.is_none() {
            warn!("decoding {} lost the root value", type_name::<T>());
        }
        debug!(
            "decoded {} (root value {})",
            type_name::<T>(),
            if value.is_some() { "kept" } else { "lost" }
        );

        match Rc::try_unwrap(shared) {
            Ok(cell) => (value, cell.into_inner()),
            Err(_) => unreachable!("decode scope still holds the handler"),
        }
    }

    /// Decodes `input`, failing on the first problem.
    ///
    /// The field adapters do not recover here; the error carries the problem and the
    /// path where it occurred.
    pub fn decode_strict<T: DeserializeOwned>(&self, input: &Value) -> Result<T, DecodeError> {
        let _scope = scope::enter(None);
        self.run(input)
    }

    fn run<T: DeserializeOwned>(&self, input: &Value) -> Result<T, DecodeError> {
        let root = JsonPath::root();
        T::deserialize(NodeDeserializer::new(input, root.clone(), self.coerce_scalars))
            .map_err(|e| e.locate(&root, input))
    }
}

/// Decodes `input` with the default [`Decoder`], returning the value and its issues.
pub fn decode_collecting_issues<T>(input: &Value) -> (Option<T>, PropertyIssues)
where
    T: DeserializeOwned,
{
    Decoder::new().decode(input).into_parts()
}
