use super::orchestrator::CheckoutOrchestrator;
use crate::domain::confirmation::{Confirmation, is_confirmation_hash};
use crate::domain::form::{FormKind, SAVE_PAYMENT_METHOD_CHECKBOX};
use crate::domain::instrument::PaymentInstrument;
use crate::domain::submission::selected_instrument;
use crate::error::SdkError;
use tracing::{debug, info, warn};

/// Result of a confirmation check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationOutcome {
    /// Nothing to confirm; the page was left alone.
    NotRequired,
    /// The intent was confirmed and the browser sent to this URL.
    Redirected(String),
    /// Confirmation failed and this message was shown.
    Failed(String),
}

impl CheckoutOrchestrator {
    /// Runs the authentication step if the current URL asks for one.
    ///
    /// Safe to call on every page load: once the marker has been stripped from
    /// the URL, subsequent calls are no-ops.
    pub async fn maybe_confirm(&self) -> ConfirmationOutcome {
        let instrument = selected_instrument(self.fields.as_ref())
            .await
            .unwrap_or(PaymentInstrument::Card);
        let payment_method_id = self
            .fields
            .value(instrument.payment_method_field_id())
            .await;
        let save_payment_method =
            self.fields.is_checked(SAVE_PAYMENT_METHOD_CHECKBOX).await == Some(true);

        let current_url = self.location.current_url().await;
        let saved_method_id = if save_payment_method {
            payment_method_id.as_deref()
        } else {
            None
        };

        let pending = match self.sdk.confirm_intent(&current_url, saved_method_id) {
            Confirmation::NotRequired => {
                debug!("no pending confirmation");
                return ConfirmationOutcome::NotRequired;
            }
            Confirmation::Pending(pending) => pending,
        };

        if pending.is_order_page {
            self.ui.block(FormKind::OrderReview).await;
            self.ui.hide_payment_section().await;
        }
        self.location.replace_url(&pending.clean_url).await;

        info!(
            order = %pending.order_id,
            intent = %pending.marker.intent_id(),
            "confirming intent"
        );

        match self.sdk.confirm(pending).await {
            Ok(redirect_url) => {
                self.location.navigate(&redirect_url).await;
                ConfirmationOutcome::Redirected(redirect_url)
            }
            Err(e) => {
                warn!(error = %e, "intent confirmation failed");
                self.ui.unblock(FormKind::Checkout).await;
                self.ui.unblock(FormKind::OrderReview).await;
                self.ui.show_payment_section().await;

                let message = match e {
                    SdkError::Payment { message } => message,
                    SdkError::Runtime(_) => self.config.generic_error_message.clone(),
                };
                self.present_error(&message).await;
                ConfirmationOutcome::Failed(message)
            }
        }
    }

    /// `hashchange` handler: only confirmation markers trigger a check.
    pub async fn on_hash_change(&self, hash: &str) -> ConfirmationOutcome {
        if !is_confirmation_hash(hash) {
            return ConfirmationOutcome::NotRequired;
        }
        self.maybe_confirm().await
    }
}
