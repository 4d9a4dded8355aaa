//! # Protocol Session
//!
//! The harness's state machine. It owns the process-wide session state
//! (started, current dialect, format policy) as an explicit value and
//! never touches I/O, so every transition can be exercised directly.
//!
//! ## Allowed Transitions
//!
//! ```text
//! Uninitialized ──start(1)──▶ Started ──dialect(uri)──▶ DialectSelected ◀─┐
//!                                                          │   │          │
//!                                                   run ◀──┘   └──dialect─┘
//! Started | DialectSelected ──stop──▶ Stopped
//! ```
//!
//! Every other command/state pair is a fatal [`ProtocolError`]. In
//! particular a second `start` is rejected rather than treated as a reset.

use harness_core::{
    Command, Dialect, DialectResponse, Implementation, ProtocolError, RunOutcome, StartResponse,
    PROTOCOL_VERSION,
};
use harness_schema::{run_case, ValidatorBuilder};

/// Where the session is in the protocol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// No `start` received yet.
    Uninitialized,
    /// `start` acknowledged, no dialect selected.
    Started,
    /// A dialect is selected; the builder carries its format policy.
    DialectSelected(ValidatorBuilder),
    /// `stop` received. Terminal.
    Stopped,
}

impl SessionState {
    /// State name, for logs and errors.
    pub fn name(&self) -> &'static str {
        match self {
            SessionState::Uninitialized => "uninitialized",
            SessionState::Started => "started",
            SessionState::DialectSelected(_) => "dialect-selected",
            SessionState::Stopped => "stopped",
        }
    }
}

/// What the session produced for one command.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// Acknowledge `start`.
    Start(StartResponse),
    /// Acknowledge `dialect`.
    Dialect(DialectResponse),
    /// Outcome of `run`.
    Run(RunOutcome),
    /// `stop`: write nothing and end the loop.
    Stop,
}

impl Reply {
    /// The response line for this reply, or `None` for [`Reply::Stop`].
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::Encode`] if serialization fails.
    pub fn encode(&self) -> Result<Option<String>, ProtocolError> {
        let line = match self {
            Reply::Start(response) => serde_json::to_string(response),
            Reply::Dialect(response) => serde_json::to_string(response),
            Reply::Run(outcome) => serde_json::to_string(outcome),
            Reply::Stop => return Ok(None),
        };
        line.map(Some).map_err(ProtocolError::Encode)
    }
}

/// Process-wide protocol session.
#[derive(Debug)]
pub struct Session {
    state: SessionState,
    implementation: Implementation,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// A fresh session announcing the `jsonschema` engine.
    pub fn new() -> Self {
        Self::with_implementation(harness_schema::implementation())
    }

    /// A fresh session announcing `implementation`.
    pub fn with_implementation(implementation: Implementation) -> Self {
        Self {
            state: SessionState::Uninitialized,
            implementation,
        }
    }

    /// Current state.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Process one command.
    ///
    /// # Errors
    ///
    /// Returns a [`ProtocolError`] for any command that is illegal in the
    /// current state, an unsupported version, or an unknown dialect. The
    /// state is left unchanged on error.
    pub fn handle(&mut self, command: Command) -> Result<Reply, ProtocolError> {
        let name = command.name();
        if self.state == SessionState::Stopped {
            return Err(ProtocolError::Stopped { command: name });
        }

        match command {
            Command::Start { version } => self.start(version),
            Command::Dialect { dialect } => self.select_dialect(name, &dialect),
            Command::Run { seq, case } => {
                let builder = match &self.state {
                    SessionState::Uninitialized => {
                        return Err(ProtocolError::NotStarted { command: name })
                    }
                    SessionState::Started => return Err(ProtocolError::DialectNotSelected),
                    SessionState::DialectSelected(builder) => *builder,
                    SessionState::Stopped => return Err(ProtocolError::Stopped { command: name }),
                };
                let outcome = run_case(&builder, seq, &case);
                tracing::debug!(seq = %outcome.seq(), outcome = outcome.kind(), "run finished");
                Ok(Reply::Run(outcome))
            }
            Command::Stop => {
                self.require_started(name)?;
                tracing::info!("stopping");
                self.state = SessionState::Stopped;
                Ok(Reply::Stop)
            }
        }
    }

    fn start(&mut self, version: i64) -> Result<Reply, ProtocolError> {
        if self.state != SessionState::Uninitialized {
            return Err(ProtocolError::AlreadyStarted);
        }
        if version != PROTOCOL_VERSION {
            return Err(ProtocolError::UnknownVersion {
                requested: version,
                supported: PROTOCOL_VERSION,
            });
        }
        self.state = SessionState::Started;
        tracing::info!(
            version,
            implementation = %self.implementation.name,
            "session started"
        );
        Ok(Reply::Start(StartResponse::new(self.implementation.clone())))
    }

    fn select_dialect(&mut self, name: &'static str, uri: &str) -> Result<Reply, ProtocolError> {
        self.require_started(name)?;
        let dialect =
            Dialect::from_uri(uri).ok_or_else(|| ProtocolError::UnknownDialect(uri.to_string()))?;
        let builder = ValidatorBuilder::new(dialect);
        tracing::info!(
            %dialect,
            validate_formats = builder.validates_formats(),
            "dialect selected"
        );
        self.state = SessionState::DialectSelected(builder);
        Ok(Reply::Dialect(DialectResponse::OK))
    }

    fn require_started(&self, name: &'static str) -> Result<(), ProtocolError> {
        match self.state {
            SessionState::Uninitialized => Err(ProtocolError::NotStarted { command: name }),
            SessionState::Stopped => Err(ProtocolError::Stopped { command: name }),
            SessionState::Started | SessionState::DialectSelected(_) => Ok(()),
        }
    }
}
