//! # Protocol Errors: Fatal Contract Violations
//!
//! Every variant of [`ProtocolError`] means the orchestrator and the
//! harness disagree about the protocol. None of them is ever reported as a
//! `run` outcome: the process logs the error and exits non-zero, and the
//! orchestrator treats the harness as broken for the rest of the session.
//!
//! Per-case failures (a schema that does not compile, an engine panic while
//! checking an instance) are not protocol errors. They are classified into
//! `skipped` / `errored` outcomes by `harness-schema`.

use thiserror::Error;

/// A fatal violation of the harness protocol.
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// The line is not a well-formed command envelope: invalid JSON,
    /// missing or unknown `cmd`, or a missing/mistyped required field.
    #[error("malformed command: {0}")]
    Decode(#[from] serde_json::Error),

    /// `start` requested a protocol version other than the supported one.
    #[error("unknown protocol version {requested} (supported: {supported})")]
    UnknownVersion {
        /// Version sent by the orchestrator.
        requested: i64,
        /// Version this harness speaks.
        supported: i64,
    },

    /// `dialect` named a URI outside the fixed dialect table.
    #[error("unknown dialect: {0}")]
    UnknownDialect(String),

    /// A command other than `start` arrived before `start`.
    #[error("received '{command}' before 'start'")]
    NotStarted {
        /// Wire name of the offending command.
        command: &'static str,
    },

    /// A second `start` arrived. Reset semantics are not defined, so this
    /// is rejected rather than guessed at.
    #[error("received 'start' more than once")]
    AlreadyStarted,

    /// A command arrived after the session was stopped.
    #[error("received '{command}' after 'stop'")]
    Stopped {
        /// Wire name of the offending command.
        command: &'static str,
    },

    /// `run` arrived before any `dialect` was selected.
    #[error("received 'run' before a dialect was selected")]
    DialectNotSelected,

    /// A response could not be serialized.
    #[error("cannot encode response: {0}")]
    Encode(#[source] serde_json::Error),

    /// Reading commands or writing responses failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
