//! # Salvage
//!
//! Error-tolerant binding of JSON-like trees into typed records that reports every
//! problem found, instead of stopping at the first one.
//!
//! ## Overview
//!
//! Decoding an API payload usually fails fast: the first bad field aborts the whole
//! record. Salvage instruments `serde` so that each field-level failure is recorded
//! as a [`PropertyIssue`] at its exact path (`zoo.1.colorEnum`), replaced by an
//! absent value, and decoding continues. Business rules declared as
//! [`PropertyConstraint`]s are then checked against the typed record, and both kinds
//! of issues share one data model, so they merge into a single report.
//!
//! Results are accumulated with `stillwater`'s `Validation` type: combining checks
//! never short-circuits.
//!
//! ## Core Types
//!
//! - [`JsonPath`]: position in the input tree, rendered as a dotted property name
//! - [`PropertyIssue`] / [`PropertyIssues`]: one problem with one property, and an ordered collection of them
//! - [`ValidationResult`]: valid, or invalid with a non-empty set of issues
//! - [`PropertyValidator`]: a check of one property value
//! - [`PropertyConstraint`]: validators bound to a property, built with [`on`] / [`on_as`]
//! - [`Decoder`]: the problem-collecting decoder
//!
//! ## Example
//!
//! ```rust
//! use salvage::{bind, impl_field_accessor, max_len, on_as, PropertyIssue};
//! use serde::Deserialize;
//! use serde_json::json;
//!
//! #[derive(Debug, Deserialize)]
//! #[serde(rename_all = "camelCase")]
//! struct Animal {
//!     #[serde(default, deserialize_with = "salvage::nullable")]
//!     color_enum: Option<Color>,
//! }
//!
//! #[derive(Debug, Deserialize)]
//! #[serde(rename_all = "UPPERCASE")]
//! enum Color {
//!     Red,
//!     Green,
//! }
//!
//! #[derive(Debug, Deserialize)]
//! struct Zoo {
//!     name: String,
//!     zoo: Vec<Animal>,
//! }
//!
//! impl_field_accessor!(Zoo { name });
//!
//! let input = json!({
//!     "name": "Municipal Zoo",
//!     "zoo": [{"colorEnum": "RED"}, {"colorEnum": "PURPLE"}]
//! });
//! let constraints = [on_as("name", "zoo name", max_len(8))];
//!
//! let decoded = bind::<Zoo>(&input, &constraints);
//!
//! let zoo = decoded.value.unwrap();
//! assert!(zoo.zoo[0].color_enum.is_some());
//! assert!(zoo.zoo[1].color_enum.is_none());
//!
//! assert_eq!(decoded.issues.len(), 2);
//! assert_eq!(decoded.issues.first().unwrap().property_name, "zoo.1.colorEnum");
//! assert_eq!(
//!     decoded.issues.iter().last(),
//!     Some(&PropertyIssue::new("zoo name", "length must be at most 8, got 13").with_code("max_length"))
//! );
//! ```

pub mod access;
pub mod bind;
pub mod constraint;
pub mod decode;
pub mod issue;
pub mod path;
pub mod validation;
pub mod validator;

pub use access::{AccessError, FieldAccessor};
pub use bind::bind;
pub use constraint::{on, on_as, PendingCheck, PropertyConstraint};
pub use decode::{
    decode_collecting_issues, nullable, or_default, DecodeError, Decoded, Decoder,
    IssueCollector, Nullable, Problem, ProblemHandler, ProblemKind,
};
pub use issue::{PropertyIssue, PropertyIssues};
pub use path::{JsonPath, PathSegment};
pub use validation::{all, and, invalid, issues_of, valid, ValidationResult};
pub use validator::{
    max, max_len, min, min_len, not_null, one_of, pattern, IntoValidators, Property,
    PropertyValidator, Rule, SharedValidator,
};

#[doc(hidden)]
pub use serde_json as __serde_json;
