use super::form::{FormKind, SETUP_INTENT_FIELD};
use super::instrument::PaymentInstrument;
use super::ports::FormFields;

/// Where the current submit cycle stands.
///
/// The state is owned by whoever drives the form and passed into the submit
/// handler, instead of living in a captured flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    /// A payment method request is in flight; the form is blocked.
    Generating,
    /// A token was attached; the next submit must be let through.
    Generated,
    /// The last attempt failed. Behaves like `Idle` for the next submit.
    Failed,
}

impl SubmissionState {
    /// Whether a submit arriving in this state has to go through token generation.
    pub fn needs_token(&self) -> bool {
        matches!(self, Self::Idle | Self::Failed)
    }
}

/// Outcome of a submit event, as returned to the form's event handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitDecision {
    /// Let the native submission reach the server.
    Allow,
    /// The submission was stopped; the orchestrator re-submits when ready.
    Intercepted,
}

/// What the form looked like when it was submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitContext {
    pub form: FormKind,
    /// Selected hosted instrument, `None` when another gateway is chosen.
    pub instrument: Option<PaymentInstrument>,
    pub saved_method_selected: bool,
    /// Only meaningful on the add-payment-method form.
    pub setup_intent_attached: bool,
}

impl SubmitContext {
    pub fn new(form: FormKind, instrument: Option<PaymentInstrument>) -> Self {
        Self {
            form,
            instrument,
            saved_method_selected: false,
            setup_intent_attached: false,
        }
    }

    pub fn with_saved_method(mut self, selected: bool) -> Self {
        self.saved_method_selected = selected;
        self
    }

    /// Reads the selection state of `form` from the page.
    pub async fn from_fields(form: FormKind, fields: &dyn FormFields) -> Self {
        let instrument = selected_instrument(fields).await;
        let saved_method_selected = match instrument {
            Some(instrument) => is_using_saved_method(fields, instrument).await,
            None => false,
        };
        let setup_intent_attached = fields
            .value(SETUP_INTENT_FIELD)
            .await
            .is_some_and(|value| !value.is_empty());

        Self {
            form,
            instrument,
            saved_method_selected,
            setup_intent_attached,
        }
    }

    /// Whether this submit has to be held back until a token is generated.
    pub fn requires_token(&self) -> bool {
        match self.form {
            FormKind::Checkout | FormKind::OrderReview => {
                self.instrument.is_some() && !self.saved_method_selected
            }
            FormKind::AddPaymentMethod => !self.setup_intent_attached,
        }
    }

    /// Instrument to tokenize. The add-payment-method form falls back to card.
    pub fn instrument_or_card(&self) -> PaymentInstrument {
        self.instrument.unwrap_or(PaymentInstrument::Card)
    }
}

/// SEPA wins when both radios report checked.
pub async fn selected_instrument(fields: &dyn FormFields) -> Option<PaymentInstrument> {
    for instrument in [PaymentInstrument::SepaDebit, PaymentInstrument::Card] {
        if fields.is_checked(instrument.gateway_radio_id()).await == Some(true) {
            return Some(instrument);
        }
    }
    None
}

/// A saved token is in use when the "new payment method" radio exists and is unchecked.
async fn is_using_saved_method(fields: &dyn FormFields, instrument: PaymentInstrument) -> bool {
    fields.is_checked(instrument.new_token_radio_id()).await == Some(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_state_needs_new_token() {
        assert!(SubmissionState::Idle.needs_token());
        assert!(SubmissionState::Failed.needs_token());
        assert!(!SubmissionState::Generating.needs_token());
        assert!(!SubmissionState::Generated.needs_token());
    }

    #[test]
    fn test_checkout_with_other_gateway_is_not_held() {
        let ctx = SubmitContext::new(FormKind::Checkout, None);
        assert!(!ctx.requires_token());
    }

    #[test]
    fn test_saved_method_is_not_held() {
        let ctx = SubmitContext::new(FormKind::OrderReview, Some(PaymentInstrument::Card))
            .with_saved_method(true);
        assert!(!ctx.requires_token());
    }

    #[test]
    fn test_add_payment_method_held_until_setup_intent() {
        let mut ctx = SubmitContext::new(FormKind::AddPaymentMethod, None);
        assert!(ctx.requires_token());
        assert_eq!(ctx.instrument_or_card(), PaymentInstrument::Card);

        ctx.setup_intent_attached = true;
        assert!(!ctx.requires_token());
    }
}
