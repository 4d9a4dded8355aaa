//! # harness-cli: Bowtie Harness Process
//!
//! Drives the `jsonschema` crate on behalf of a Bowtie orchestrator. The
//! orchestrator writes one JSON command per line to the harness and reads
//! one JSON response per line back:
//!
//! ```bash
//! bowtie-harness                 # commands from standard input
//! bowtie-harness session.jsonl   # replay commands from a file
//! ```
//!
//! ## Modules
//!
//! - [`session`]: the protocol state machine, independent of any I/O.
//! - [`source`]: where command lines come from (a reader or a replay file).
//! - [`serve`]: the strictly sequential read/handle/write loop.
//!
//! ## Crate Policy
//!
//! - Standard output carries protocol lines only. All logging goes to
//!   standard error.
//! - Fatal protocol errors propagate out of [`serve::serve`] and end the
//!   process without writing a response line.

pub mod serve;
pub mod session;
pub mod source;

pub use serve::serve;
pub use session::{Reply, Session, SessionState};
pub use source::{CommandSource, ReaderSource, ReplaySource};
