//! # Per-Case Document Store
//!
//! Resolves cross-document `$ref` URIs for exactly one test case. The
//! store is filled from the case's `registry` (plus the top-level schema
//! under its synthetic URI) before compilation starts, so references
//! resolve regardless of the order documents were declared in.
//!
//! URIs that are not in the store are an error. Answering with a
//! permissive empty schema would turn a missing registry entry into a
//! false positive.

use std::collections::HashMap;

use jsonschema::{Retrieve, Uri};
use serde_json::Value;
use thiserror::Error;

/// Error returned to the schema engine for an unresolvable reference.
#[derive(Error, Debug)]
pub enum RetrieveError {
    /// No document is registered under the URI.
    #[error("no document registered for '{uri}' (registry has {known} entries)")]
    Unknown {
        /// The URI the engine asked for.
        uri: String,
        /// Number of documents in the store.
        known: usize,
    },
}

/// Documents available to one case, keyed by URI.
#[derive(Debug, Clone, Default)]
pub struct CaseDocuments {
    by_uri: HashMap<String, Value>,
}

impl CaseDocuments {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `document` under `uri`. A later registration under the
    /// same URI replaces the earlier one.
    pub fn insert(&mut self, uri: impl Into<String>, document: Value) {
        let uri = uri.into();
        self.by_uri.insert(normalize(&uri).to_string(), document);
    }

    /// Look up a document. A trailing empty fragment is ignored on both
    /// sides, so `http://x/s.json#` and `http://x/s.json` are the same key.
    pub fn lookup(&self, uri: &str) -> Option<&Value> {
        self.by_uri.get(normalize(uri))
    }

    /// Number of registered documents.
    pub fn len(&self) -> usize {
        self.by_uri.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.by_uri.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for CaseDocuments {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let mut docs = Self::new();
        for (uri, document) in iter {
            docs.insert(uri, document);
        }
        docs
    }
}

impl Retrieve for CaseDocuments {
    fn retrieve(
        &self,
        uri: &Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        let uri_str = uri.as_str();
        match self.lookup(uri_str) {
            Some(document) => {
                tracing::debug!(uri = uri_str, "resolved registry document");
                Ok(document.clone())
            }
            None => {
                tracing::debug!(uri = uri_str, "unresolved reference");
                Err(Box::new(RetrieveError::Unknown {
                    uri: uri_str.to_string(),
                    known: self.len(),
                }))
            }
        }
    }
}

fn normalize(uri: &str) -> &str {
    uri.strip_suffix('#').unwrap_or(uri)
}
