//! # harness-schema: Per-Case Validator Construction
//!
//! Turns a `run` command's test case into a [`RunOutcome`]:
//!
//! 1. [`ValidatorBuilder`] compiles the case's schema with the `jsonschema`
//!    crate, configured for the session's dialect and format policy, after
//!    [`refs`] has ruled out `$ref` chains that would recurse forever.
//! 2. Cross-document `$ref`s resolve through a [`CaseDocuments`] store
//!    holding only that case's `registry` entries.
//! 3. [`run_case`] checks every instance against the compiled schema and
//!    converts any failure (compile error or engine panic) into a
//!    `skipped` or `errored` outcome via [`classify`] and the
//!    [`unsupported`] table.
//!
//! ## Resource Scoping
//!
//! The compiled validator and its document store are owned by a single
//! `run_case` call and dropped before it returns. Nothing is cached
//! between cases, so two cases that reuse a schema URI with different
//! content never observe each other.
//!
//! [`RunOutcome`]: harness_core::RunOutcome

pub mod builder;
pub mod identity;
pub mod refs;
pub mod runner;
pub mod store;
pub mod unsupported;

pub use builder::{synthetic_schema_uri, BuildError, CompiledSchema, ValidatorBuilder};
pub use identity::{implementation, ENGINE_NAME, ENGINE_VERSION};
pub use refs::{find_cycle, RefCycle};
pub use runner::{classify, run_case, CaseFailure};
pub use store::{CaseDocuments, RetrieveError};
pub use unsupported::{UnsupportedTest, UNSUPPORTED_TESTS};
