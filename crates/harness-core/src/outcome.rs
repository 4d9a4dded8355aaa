//! # Run Outcomes and Response Lines
//!
//! Exactly one [`RunOutcome`] is emitted per `run` command, in the order
//! the commands arrived. Its wire shape is one of:
//!
//! ```text
//! {"seq": S, "results": [{"valid": true}, ...]}
//! {"seq": S, "skipped": true, "message": "..."}
//! {"seq": S, "errored": true, "context": {"message": "...", "traceback": "..."}}
//! ```
//!
//! `seq` is always the caller's token, unmodified.

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::command::Seq;

/// Result of checking one instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct TestResult {
    /// Whether the instance conforms to the schema.
    pub valid: bool,
}

/// Diagnostic context attached to an errored outcome.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ErrorContext {
    /// Human-readable failure message.
    pub message: String,
    /// Backtrace captured at the failure site.
    pub traceback: String,
}

/// The harness's response to one `run` command.
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// Every instance was checked; one result per instance, in order.
    Results {
        /// Echoed correlation token.
        seq: Seq,
        /// Per-instance results.
        results: Vec<TestResult>,
    },
    /// The case hit a documented limitation.
    Skipped {
        /// Echoed correlation token.
        seq: Seq,
        /// Why the case is unsupported.
        message: String,
    },
    /// The case failed unexpectedly.
    Errored {
        /// Echoed correlation token.
        seq: Seq,
        /// Failure diagnostics.
        context: ErrorContext,
    },
}

impl RunOutcome {
    /// The correlation token this outcome answers.
    pub fn seq(&self) -> &Seq {
        match self {
            RunOutcome::Results { seq, .. }
            | RunOutcome::Skipped { seq, .. }
            | RunOutcome::Errored { seq, .. } => seq,
        }
    }

    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            RunOutcome::Results { .. } => "results",
            RunOutcome::Skipped { .. } => "skipped",
            RunOutcome::Errored { .. } => "errored",
        }
    }
}

impl Serialize for RunOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RunOutcome::Results { seq, results } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("seq", seq)?;
                map.serialize_entry("results", results)?;
                map.end()
            }
            RunOutcome::Skipped { seq, message } => {
                let mut map = serializer.serialize_map(Some(3))?;
                map.serialize_entry("seq", seq)?;
                map.serialize_entry("skipped", &true)?;
                map.serialize_entry("message", message)?;
                map.end()
            }
            RunOutcome::Errored { seq, context } => {
                let mut map = serializer.serialize_map(Some(3))?;
                map.serialize_entry("seq", seq)?;
                map.serialize_entry("errored", &true)?;
                map.serialize_entry("context", context)?;
                map.end()
            }
        }
    }
}

/// Response line for `dialect`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct DialectResponse {
    /// Always `true`; unknown dialects are fatal instead.
    pub ok: bool,
}

impl DialectResponse {
    /// The acknowledgment sent after a successful dialect selection.
    pub const OK: DialectResponse = DialectResponse { ok: true };
}
