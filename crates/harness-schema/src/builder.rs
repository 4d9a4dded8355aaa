//! # Validator Builder
//!
//! Compiles one test case's schema into a [`CompiledSchema`] using the
//! `jsonschema` crate. The builder itself only carries the session's
//! dialect and format policy; every `build` call starts from a fresh set
//! of options and a fresh [`CaseDocuments`] store, so nothing leaks from
//! one case into the next.
//!
//! Each build is tagged with a synthetic, never-reused URI. The URI is a
//! label for logs and diagnostics only: the engine compiles the top-level
//! schema under its own default base URI, so the label is neither stored
//! in the document store nor resolvable through `$ref`.
//!
//! Before the engine sees a schema, [`refs::find_cycle`] rejects `$ref`
//! chains that loop without consuming the instance.

use harness_core::{Dialect, TestCase};
use jsonschema::{Draft, ValidationOptions, Validator};
use serde_json::Value;
use thiserror::Error;

use crate::refs;
use crate::store::CaseDocuments;

/// The schema did not compile under the selected dialect.
#[derive(Error, Debug)]
#[error("schema does not compile under {dialect}: {reason}")]
pub struct BuildError {
    /// Synthetic label of the failed build, matching the build's log lines.
    pub uri: String,
    /// Dialect the build was attempted under.
    pub dialect: Dialect,
    /// Engine-reported reason.
    pub reason: String,
}

/// A schema compiled for one case. Checking is pure; the value is dropped
/// together with its document store when the case finishes.
pub struct CompiledSchema {
    validator: Validator,
    uri: String,
}

impl std::fmt::Debug for CompiledSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledSchema")
            .field("uri", &self.uri)
            .finish_non_exhaustive()
    }
}

impl CompiledSchema {
    /// Whether `instance` conforms to the schema.
    pub fn check(&self, instance: &Value) -> bool {
        self.validator.is_valid(instance)
    }

    /// Synthetic label of this build.
    pub fn uri(&self) -> &str {
        &self.uri
    }
}

/// Builds validators for the session's current dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatorBuilder {
    dialect: Dialect,
    validate_formats: bool,
}

impl ValidatorBuilder {
    /// A builder for `dialect` using the dialect's default format policy.
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            validate_formats: dialect.validates_formats(),
        }
    }

    /// Override whether `format` is asserted.
    pub fn with_format_validation(mut self, enabled: bool) -> Self {
        self.validate_formats = enabled;
        self
    }

    /// The dialect this builder compiles for.
    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Whether `format` is asserted.
    pub fn validates_formats(&self) -> bool {
        self.validate_formats
    }

    /// Compile `case.schema`, with `case.registry` available for `$ref`.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError`] if the schema is invalid for the dialect,
    /// references a document that is not in the registry, or contains a
    /// `$ref` chain that loops back on itself.
    pub fn build(&self, case: &TestCase) -> Result<CompiledSchema, BuildError> {
        let uri = synthetic_schema_uri();

        if let Some(cycle) = refs::find_cycle(case) {
            return Err(BuildError {
                uri,
                dialect: self.dialect,
                reason: format!("$ref cycle never reaches the instance: {cycle}"),
            });
        }

        let documents: CaseDocuments = case
            .registry_entries()
            .map(|(key, doc)| (key.clone(), doc.clone()))
            .collect();

        tracing::debug!(
            uri = %uri,
            dialect = %self.dialect,
            registry = documents.len(),
            validate_formats = self.validate_formats,
            "compiling schema"
        );

        let opts = self.options(documents);
        let validator = opts.build(&case.schema).map_err(|e| BuildError {
            uri: uri.clone(),
            dialect: self.dialect,
            reason: e.to_string(),
        })?;

        Ok(CompiledSchema { validator, uri })
    }

    fn options(&self, documents: CaseDocuments) -> ValidationOptions {
        let mut opts = jsonschema::options();
        opts.with_draft(draft(self.dialect));
        opts.should_validate_formats(self.validate_formats);
        opts.with_retriever(documents);
        opts
    }
}

/// A fresh build label in URI form. Never repeats within a process.
pub fn synthetic_schema_uri() -> String {
    format!(
        "https://example.com/bowtie-sent-schema-{}.json",
        uuid::Uuid::new_v4()
    )
}

fn draft(dialect: Dialect) -> Draft {
    match dialect {
        Dialect::Draft202012 => Draft::Draft202012,
        Dialect::Draft201909 => Draft::Draft201909,
        Dialect::Draft7 => Draft::Draft7,
        Dialect::Draft6 => Draft::Draft6,
        Dialect::Draft4 => Draft::Draft4,
    }
}
