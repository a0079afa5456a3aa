use tracing::{debug, warn};

use formkit_model::Values;

use crate::store::FormStore;

/// What the external submit handler reports back. Failures travel through
/// this channel, never as a panic out of the submission path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Accepted,
    Rejected(String),
}

/// Pairs a `begin_submit` with its `finish_submit`. A ticket goes stale
/// when the attempt is cancelled or superseded; finishing with a stale
/// ticket is ignored, so a completion that races a cancellation can never
/// flip `submitting` back on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitTicket {
    epoch: u64,
}

/// Result of asking the form to start a submission.
#[derive(Debug)]
pub enum SubmitAttempt {
    /// A submission is already in flight; at most one per form instance.
    InFlight,
    /// Validation failed; every field was touched so the errors are
    /// visible, and the handler was not invoked.
    Invalid,
    /// The form is valid. `values` is the snapshot to hand to the submit
    /// handler; settle with [`FormStore::finish_submit`] and the ticket.
    Ready {
        ticket: SubmitTicket,
        values: Values,
    },
}

impl FormStore {
    /// Start the validate-then-submit sequence: touch every field currently
    /// in the values, revalidate, and open the in-flight window only if the
    /// form is valid.
    pub fn begin_submit(&mut self) -> SubmitAttempt {
        if self.submitting {
            debug!("submit requested while one is in flight; rejecting");
            return SubmitAttempt::InFlight;
        }
        self.touch_all();
        self.revalidate();
        if !self.is_valid() {
            return SubmitAttempt::Invalid;
        }
        self.submit_epoch += 1;
        self.submitting = true;
        self.form_error = None;
        SubmitAttempt::Ready {
            ticket: SubmitTicket {
                epoch: self.submit_epoch,
            },
            values: self.values.clone(),
        }
    }

    /// Settle the in-flight submission. A rejected outcome lands in the
    /// form-level error channel; entered values are untouched either way.
    pub fn finish_submit(&mut self, ticket: SubmitTicket, outcome: SubmitOutcome) {
        if !self.submitting || ticket.epoch != self.submit_epoch {
            warn!("stale submit completion; ignoring");
            return;
        }
        self.submitting = false;
        if let SubmitOutcome::Rejected(reason) = outcome {
            self.form_error = Some(reason);
        }
    }

    /// Abandon the in-flight submission, if any. The outstanding ticket
    /// goes stale immediately.
    pub fn cancel_submit(&mut self) {
        if self.submitting {
            self.submitting = false;
            self.submit_epoch += 1;
        }
    }

    /// Drive a synchronous handler through the full begin/finish sequence.
    /// Returns `None` when the handler was not invoked (invalid form or a
    /// submission already in flight).
    pub fn submit<F>(&mut self, handler: F) -> Option<SubmitOutcome>
    where
        F: FnOnce(&Values) -> SubmitOutcome,
    {
        match self.begin_submit() {
            SubmitAttempt::Ready { ticket, values } => {
                let outcome = handler(&values);
                self.finish_submit(ticket, outcome.clone());
                Some(outcome)
            }
            SubmitAttempt::InFlight | SubmitAttempt::Invalid => None,
        }
    }
}
