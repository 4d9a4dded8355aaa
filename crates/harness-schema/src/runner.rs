//! # Case Runner
//!
//! Executes one `run` command: build the validator once, check every
//! instance in order, and emit exactly one [`RunOutcome`].
//!
//! Any failure aborts the remaining instances. Partial results are
//! discarded and the failure is classified against the unsupported-test
//! table using the case description and the description of the instance
//! that was in flight. A build failure is attributed to the first
//! instance, since the build happens on its behalf.
//!
//! Engine panics are caught at the case boundary and handled like build
//! errors, because a crash drops every remaining result in the session.
//! Unwinding cannot recover from a stack overflow, so schemas whose `$ref`s
//! recurse without consuming the instance are rejected at build time
//! instead (see [`crate::refs`]).

use std::any::Any;
use std::backtrace::Backtrace;
use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};

use harness_core::{ErrorContext, RunOutcome, Seq, TestCase, TestResult};
use serde_json::Value;

use crate::builder::ValidatorBuilder;
use crate::unsupported;

/// A per-case failure: message plus the backtrace captured where it was
/// observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseFailure {
    /// Human-readable failure message.
    pub message: String,
    /// Backtrace captured at the failure site.
    pub traceback: String,
}

impl CaseFailure {
    /// Capture a failure from an error value, including its source chain.
    pub fn from_error(err: &(dyn std::error::Error + 'static)) -> Self {
        let mut message = err.to_string();
        let mut source = err.source();
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        Self {
            message,
            traceback: Backtrace::force_capture().to_string(),
        }
    }

    /// Capture a failure from a caught panic payload.
    pub fn from_panic(payload: &(dyn Any + Send)) -> Self {
        let detail = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_string()
        };
        Self {
            message: format!("schema engine panicked: {detail}"),
            traceback: Backtrace::force_capture().to_string(),
        }
    }
}

/// Run one case under `builder` and produce its outcome.
pub fn run_case(builder: &ValidatorBuilder, seq: Seq, case: &TestCase) -> RunOutcome {
    run_with(seq, case, || {
        let compiled = builder.build(case).map_err(|e| CaseFailure::from_error(&e))?;
        Ok(move |instance: &Value| compiled.check(instance))
    })
}

/// Run one case with the per-instance check produced by `build`.
fn run_with<B, C>(seq: Seq, case: &TestCase, build: B) -> RunOutcome
where
    B: FnOnce() -> Result<C, CaseFailure>,
    C: Fn(&Value) -> bool,
{
    let span = tracing::info_span!("run", seq = %seq, case = %case.description);
    let _enter = span.enter();

    let first = case.tests.first().map_or("", |t| t.description.as_str());
    let in_flight = Cell::new(first);

    match guarded(|| build().map(|check| check_all(case, &in_flight, check))) {
        Ok(results) => {
            tracing::debug!(instances = results.len(), "case completed");
            RunOutcome::Results { seq, results }
        }
        Err(failure) => classify(seq, &case.description, in_flight.get(), failure),
    }
}

/// Map a failed case onto its outcome: `skipped` if the pair is a known
/// limitation, otherwise `errored` with the failure's diagnostics.
pub fn classify(
    seq: Seq,
    case_description: &str,
    test_description: &str,
    failure: CaseFailure,
) -> RunOutcome {
    match unsupported::reason(case_description, test_description) {
        Some(reason) => {
            tracing::info!(
                test = test_description,
                reason,
                error = %failure.message,
                "skipping unsupported test"
            );
            RunOutcome::Skipped {
                seq,
                message: reason.to_string(),
            }
        }
        None => {
            tracing::warn!(test = test_description, error = %failure.message, "case errored");
            RunOutcome::Errored {
                seq,
                context: ErrorContext {
                    message: failure.message,
                    traceback: failure.traceback,
                },
            }
        }
    }
}

/// `in_flight` names the instance being checked when `check` fails.
fn check_all<'a>(
    case: &'a TestCase,
    in_flight: &Cell<&'a str>,
    check: impl Fn(&Value) -> bool,
) -> Vec<TestResult> {
    let mut results = Vec::with_capacity(case.tests.len());
    for test in &case.tests {
        in_flight.set(&test.description);
        let valid = check(&test.instance);
        tracing::trace!(test = %test.description, valid, "checked instance");
        results.push(TestResult { valid });
    }
    results
}

fn guarded<T>(f: impl FnOnce() -> Result<T, CaseFailure>) -> Result<T, CaseFailure> {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => Err(CaseFailure::from_panic(payload.as_ref())),
    }
}
