//! Cross-module scenario tests
//!
//! Unit tests live next to the code they cover; these modules exercise the
//! primitives together the way an application would.

pub mod registry_tests;
