//! `which su` -- a weaker, independent corroboration of the path probe.

use rootcheck_core::{InvocationError, Result, SignalResult};

use crate::invoker::ProcessInvoker;

/// Positive iff the locate command printed at least one line.
///
/// No output is negative; any other failure is returned for the
/// engine's fail-open policy.
pub fn check_su_exists(invoker: &dyn ProcessInvoker, command: &[String]) -> Result<SignalResult> {
    match invoker.run(command) {
        Ok(lines) => Ok(SignalResult::from_evidence(
            lines
                .first()
                .map(|first| format!("`{}` found {first}", command.join(" ")))
                .into_iter()
                .collect(),
        )),
        Err(InvocationError::EmptyOutput { .. }) => Ok(SignalResult::negative()),
        Err(e) => Err(e.into()),
    }
}
