//! Form lifecycle state machine.
//!
//! ```text
//! Idle --SubmitAccepted--> Submitting --StoreSucceeded--> Succeeded --DisplayElapsed--> Idle
//!  |                           |
//!  +--SubmitRejected--+        +--StoreFailed--+
//!                     v                        v
//!                   Failed ------Settle------> Idle
//! ```
//!
//! `Failed` is transient: the controller settles it back to `Idle` (with
//! field errors or a failure notice attached) before anyone can observe it.

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FormState {
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

impl FormState {
    /// Only an idle form may start a submission.
    pub fn accepts_submit(self) -> bool {
        matches!(self, FormState::Idle)
    }

    /// Inputs and the rating control are disabled while a create is in
    /// flight and while the thank-you card replaces the form.
    pub fn accepts_input(self) -> bool {
        !matches!(self, FormState::Submitting | FormState::Succeeded)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormEvent {
    /// Submit was pressed but validation failed.
    SubmitRejected,
    /// Submit was pressed and validation passed; the create is issued.
    SubmitAccepted,
    StoreSucceeded,
    StoreFailed,
    /// Collapse a failure back to idle.
    Settle,
    /// The success display window ran out.
    DisplayElapsed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid form transition: {event:?} while {from:?}")]
pub struct InvalidTransition {
    pub from: FormState,
    pub event: FormEvent,
}

/// Compute the next state, rejecting events that do not apply to `from`.
pub fn transition(from: FormState, event: FormEvent) -> Result<FormState, InvalidTransition> {
    use FormEvent as E;
    use FormState as S;

    match (from, event) {
        (S::Idle, E::SubmitRejected) => Ok(S::Failed),
        (S::Idle, E::SubmitAccepted) => Ok(S::Submitting),
        (S::Submitting, E::StoreSucceeded) => Ok(S::Succeeded),
        (S::Submitting, E::StoreFailed) => Ok(S::Failed),
        (S::Failed, E::Settle) => Ok(S::Idle),
        (S::Succeeded, E::DisplayElapsed) => Ok(S::Idle),
        _ => Err(InvalidTransition { from, event }),
    }
}
