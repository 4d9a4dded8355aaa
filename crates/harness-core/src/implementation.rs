//! # Implementation Identity
//!
//! Metadata returned in the `start` acknowledgment. The orchestrator uses
//! it to label results and to know which dialects it may select.

use serde::Serialize;

use crate::dialect::Dialect;

/// The only protocol version this harness speaks.
pub const PROTOCOL_VERSION: i64 = 1;

/// Identity of the validator implementation driven by this harness.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Implementation {
    /// Implementation language, e.g. `"rust"`.
    pub language: String,
    /// Library name.
    pub name: String,
    /// Library version.
    pub version: String,
    /// Project homepage.
    pub homepage: String,
    /// Documentation link.
    pub documentation: String,
    /// Issue tracker link.
    pub issues: String,
    /// Source repository link.
    pub source: String,
    /// Supported dialect URIs.
    pub dialects: Vec<Dialect>,
}

/// Response line for `start`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StartResponse {
    /// Negotiated protocol version.
    pub version: i64,
    /// Implementation identity.
    pub implementation: Implementation,
}

impl StartResponse {
    /// Acknowledge `start` at [`PROTOCOL_VERSION`].
    pub fn new(implementation: Implementation) -> Self {
        Self {
            version: PROTOCOL_VERSION,
            implementation,
        }
    }
}
