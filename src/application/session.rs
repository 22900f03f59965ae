use super::authentication::ConfirmationOutcome;
use super::orchestrator::CheckoutOrchestrator;
use crate::domain::form::FormKind;
use crate::domain::submission::{SubmissionState, SubmitContext, SubmitDecision};

/// The orchestrator mounted on one page, together with its submission state.
///
/// Dispatches the events a browser would deliver: the shopper's submit, the
/// programmatic re-submit it may cause, page loads and hash changes.
pub struct CheckoutSession {
    orchestrator: CheckoutOrchestrator,
    state: SubmissionState,
}

impl CheckoutSession {
    pub fn new(orchestrator: CheckoutOrchestrator) -> Self {
        Self {
            orchestrator,
            state: SubmissionState::default(),
        }
    }

    pub fn state(&self) -> SubmissionState {
        self.state
    }

    /// Submits `form` and returns whether it finally reached the server.
    pub async fn submit(&mut self, form: FormKind) -> SubmitDecision {
        let ctx = SubmitContext::from_fields(form, self.orchestrator.fields()).await;
        let decision = self.orchestrator.handle_submit(&mut self.state, &ctx).await;

        if decision == SubmitDecision::Intercepted && self.state == SubmissionState::Generated {
            let ctx = SubmitContext::from_fields(form, self.orchestrator.fields()).await;
            return self.orchestrator.handle_submit(&mut self.state, &ctx).await;
        }
        decision
    }

    pub async fn page_load(&self) -> ConfirmationOutcome {
        self.orchestrator.maybe_confirm().await
    }

    pub async fn hash_change(&self, hash: &str) -> ConfirmationOutcome {
        self.orchestrator.on_hash_change(hash).await
    }
}
