//! Identity of the schema engine this harness drives.

use harness_core::{Dialect, Implementation};

/// Name of the schema engine crate.
pub const ENGINE_NAME: &str = "jsonschema";

/// Exact version of the schema engine crate. The workspace pins the
/// dependency to this version.
pub const ENGINE_VERSION: &str = "0.28.3";

const ENGINE_REPOSITORY: &str = "https://github.com/Stranger6667/jsonschema";

/// Metadata announced in the `start` acknowledgment.
pub fn implementation() -> Implementation {
    Implementation {
        language: "rust".to_string(),
        name: ENGINE_NAME.to_string(),
        version: ENGINE_VERSION.to_string(),
        homepage: format!("https://crates.io/crates/{ENGINE_NAME}"),
        documentation: format!("https://docs.rs/{ENGINE_NAME}"),
        issues: format!("{ENGINE_REPOSITORY}/issues"),
        source: ENGINE_REPOSITORY.to_string(),
        dialects: Dialect::ALL.to_vec(),
    }
}
