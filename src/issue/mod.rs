//! Issue types for conversion and validation problems.
//!
//! This module provides the shared data model for decode-time and validation-time
//! problems: one [`PropertyIssue`] per problem, collected in order into
//! [`PropertyIssues`].

mod property_issue;

pub use property_issue::{PropertyIssue, PropertyIssues};
