//! # Command Loop
//!
//! Reads one line, handles it to completion, writes at most one line,
//! and only then reads the next. Responses therefore leave in exactly the
//! order commands arrived.
//!
//! The loop ends quietly on end of input or on an empty line, and after
//! `stop`. A fatal protocol error ends it with that error; nothing is
//! written for the offending line.

use std::io::Write;

use harness_core::{Command, ProtocolError};

use crate::session::{Reply, Session};
use crate::source::CommandSource;

/// Serve commands from `source` until the session ends.
///
/// # Errors
///
/// Returns the first fatal [`ProtocolError`]: a malformed or illegal
/// command, or an I/O failure on either side.
pub fn serve<S, W>(session: &mut Session, source: &mut S, out: &mut W) -> Result<(), ProtocolError>
where
    S: CommandSource + ?Sized,
    W: Write + ?Sized,
{
    while let Some(line) = source.next_line()? {
        if line.trim().is_empty() {
            tracing::debug!("empty line, ending session");
            break;
        }

        let Some(command) = Command::decode(&line)? else {
            continue;
        };
        tracing::trace!(cmd = command.name(), "received command");

        let reply = session.handle(command)?;
        match reply.encode()? {
            Some(response) => {
                out.write_all(response.as_bytes())?;
                out.write_all(b"\n")?;
                out.flush()?;
            }
            None => {
                debug_assert_eq!(reply, Reply::Stop);
                break;
            }
        }
    }
    Ok(())
}
