//! # harness-core: Wire Types for the Bowtie Harness Protocol
//!
//! This crate defines everything that crosses the line-delimited JSON
//! boundary between the test orchestrator and the harness process. It has
//! no knowledge of how schemas are compiled; that lives in
//! `harness-schema`.
//!
//! ## Contents
//!
//! - [`command`]: typed command envelopes decoded from one input line.
//! - [`dialect`]: the fixed table of supported schema dialects.
//! - [`implementation`]: identity metadata returned from `start`.
//! - [`outcome`]: the per-`run` outcome and the other response lines.
//! - [`error`]: fatal protocol errors that abort the process.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `harness-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - Fatal protocol violations are never representable as a `run` outcome.

pub mod command;
pub mod dialect;
pub mod error;
pub mod implementation;
pub mod outcome;

pub use command::{Command, Seq, TestCase, TestInstance};
pub use dialect::Dialect;
pub use error::ProtocolError;
pub use implementation::{Implementation, StartResponse, PROTOCOL_VERSION};
pub use outcome::{DialectResponse, ErrorContext, RunOutcome, TestResult};
