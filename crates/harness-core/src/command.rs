//! # Command Decoding
//!
//! One input line holds exactly one JSON object whose `cmd` field selects
//! the command kind. Decoding is strict about the fields the protocol
//! requires and lenient about extra fields, which the orchestrator is free
//! to add.
//!
//! | `cmd`     | required fields                                  |
//! |-----------|--------------------------------------------------|
//! | `start`   | `version` (integer)                              |
//! | `dialect` | `dialect` (URI string)                           |
//! | `run`     | `case.{description, schema, tests[].description}` |
//! | `stop`    | none                                              |
//!
//! `run.seq` is an arbitrary JSON value echoed back verbatim; an absent
//! `seq` is treated as `null`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ProtocolError;

/// Correlation token of a `run` command, echoed verbatim in its outcome.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Seq(pub Value);

impl std::fmt::Display for Seq {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A decoded command envelope. Immutable once parsed and consumed exactly
/// once by the session.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "cmd", rename_all = "lowercase")]
pub enum Command {
    /// Open the session at the given protocol version.
    Start {
        /// Requested protocol version.
        version: i64,
    },
    /// Select the dialect subsequent `run` commands are validated under.
    Dialect {
        /// Dialect URI, e.g. `https://json-schema.org/draft/2020-12/schema`.
        dialect: String,
    },
    /// Validate one test case.
    Run {
        /// Correlation token.
        #[serde(default)]
        seq: Seq,
        /// The case to run.
        case: TestCase,
    },
    /// End the session.
    Stop,
}

/// One schema plus the ordered instances to check against it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TestCase {
    /// Human-readable case description, used for skip lookups.
    pub description: String,
    /// The schema document under test. Any JSON value, including booleans.
    pub schema: Value,
    /// Auxiliary schema documents keyed by URI, for cross-document `$ref`.
    #[serde(default)]
    pub registry: Option<Map<String, Value>>,
    /// Instances to check, in order.
    pub tests: Vec<TestInstance>,
}

/// A single instance to check.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TestInstance {
    /// Human-readable instance description, used for skip lookups.
    pub description: String,
    /// The instance. An absent instance is `null`.
    #[serde(default)]
    pub instance: Value,
}

impl Command {
    /// Decode one input line.
    ///
    /// Returns `Ok(None)` for a line whose JSON is `null`, which carries no
    /// command and is skipped.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::Decode`] for invalid JSON, a missing or
    /// unknown `cmd`, or a missing/mistyped required field.
    pub fn decode(line: &str) -> Result<Option<Self>, ProtocolError> {
        let value: Value = serde_json::from_str(line)?;
        if value.is_null() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_value(value)?))
    }

    /// Wire name of this command.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Start { .. } => "start",
            Command::Dialect { .. } => "dialect",
            Command::Run { .. } => "run",
            Command::Stop => "stop",
        }
    }
}

impl TestCase {
    /// Registry entries, empty when the case carries none.
    pub fn registry_entries(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.registry.iter().flat_map(|map| map.iter())
    }
}
