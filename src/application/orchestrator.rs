use crate::config::CheckoutConfig;
use crate::domain::form::{
    ADDRESS_FIELDS, BILLING_EMAIL, BILLING_FIRST_NAME, BILLING_LAST_NAME, BILLING_PHONE, FormKind,
    SETUP_INTENT_FIELD,
};
use crate::domain::instrument::PaymentInstrument;
use crate::domain::notice::Notice;
use crate::domain::payment_method::{CustomerData, PaymentMethodRequest};
use crate::domain::ports::{
    BrowserLocation, BrowserLocationBox, CheckoutUi, CheckoutUiBox, FormFields, FormFieldsBox,
    PaymentSdkBox,
};
use crate::domain::submission::{SubmissionState, SubmitContext, SubmitDecision};
use crate::error::SdkError;
use tracing::{debug, info, warn};

/// Coordinates form submission with the hosted payment fields SDK.
///
/// The orchestrator holds no submission state of its own: the caller owns a
/// [`SubmissionState`] and passes it to every [`handle_submit`] call.
///
/// [`handle_submit`]: CheckoutOrchestrator::handle_submit
pub struct CheckoutOrchestrator {
    pub(super) sdk: PaymentSdkBox,
    pub(super) fields: FormFieldsBox,
    pub(super) ui: CheckoutUiBox,
    pub(super) location: BrowserLocationBox,
    pub(super) config: CheckoutConfig,
    customer: CustomerData,
}

impl CheckoutOrchestrator {
    /// Creates a new `CheckoutOrchestrator`.
    ///
    /// # Arguments
    ///
    /// * `sdk` - The hosted payment fields SDK.
    /// * `fields` - Access to the form inputs.
    /// * `ui` - Blocking, notices and re-submission.
    /// * `location` - The browser location.
    /// * `config` - Page settings, including the generic error message.
    pub fn new(
        sdk: PaymentSdkBox,
        fields: FormFieldsBox,
        ui: CheckoutUiBox,
        location: BrowserLocationBox,
        config: CheckoutConfig,
    ) -> Self {
        Self {
            sdk,
            fields,
            ui,
            location,
            config,
            customer: CustomerData::default(),
        }
    }

    /// Wires a single page object in as fields, UI and location.
    pub fn with_page<P>(sdk: PaymentSdkBox, page: P, config: CheckoutConfig) -> Self
    where
        P: FormFields + CheckoutUi + BrowserLocation + Clone + 'static,
    {
        Self::new(
            sdk,
            Box::new(page.clone()),
            Box::new(page.clone()),
            Box::new(page),
            config,
        )
    }

    pub fn with_customer_data(mut self, customer: CustomerData) -> Self {
        self.customer = customer;
        self
    }

    pub fn fields(&self) -> &dyn FormFields {
        self.fields.as_ref()
    }

    /// Handles a submit event on `ctx.form`.
    ///
    /// The first submit of a cycle is intercepted while a payment method is
    /// generated and attached; on success the form is re-submitted and that
    /// second submit is allowed through. On failure the form is released and
    /// the error shown, leaving `state` as [`SubmissionState::Failed`] so the
    /// shopper can try again.
    pub async fn handle_submit(
        &self,
        state: &mut SubmissionState,
        ctx: &SubmitContext,
    ) -> SubmitDecision {
        if *state == SubmissionState::Generated {
            debug!(form = %ctx.form, "payment method attached, letting submit through");
            *state = SubmissionState::Idle;
            return SubmitDecision::Allow;
        }
        if !ctx.requires_token() {
            debug!(form = %ctx.form, saved = ctx.saved_method_selected, "submit not handled");
            return SubmitDecision::Allow;
        }
        if *state == SubmissionState::Generating {
            debug!(form = %ctx.form, "payment method request already in flight");
            return SubmitDecision::Intercepted;
        }

        *state = SubmissionState::Generating;
        self.ui.block(ctx.form).await;

        let instrument = ctx.instrument_or_card();
        let request = self.build_request(ctx.form, instrument).await;

        match self.generate_and_attach(ctx.form, instrument, request).await {
            Ok(()) => {
                *state = SubmissionState::Generated;
                self.ui.unblock(ctx.form).await;
                self.ui.submit(ctx.form).await;
            }
            Err(e) => {
                warn!(form = %ctx.form, error = %e, "payment method generation failed");
                *state = SubmissionState::Failed;
                self.ui.unblock(ctx.form).await;
                self.present_error(e.message()).await;
            }
        }

        SubmitDecision::Intercepted
    }

    /// Shows `message` as the single error notice of the checkout form.
    pub async fn present_error(&self, message: &str) {
        self.ui.show_notice(Notice::error(message)).await;
    }

    async fn build_request(
        &self,
        form: FormKind,
        instrument: PaymentInstrument,
    ) -> PaymentMethodRequest {
        let mut request = self
            .sdk
            .generate_payment_method_request(instrument, &self.customer);
        if !form.collects_billing_details() {
            return request;
        }

        let first_name = self.fields.value(BILLING_FIRST_NAME).await.unwrap_or_default();
        let last_name = self.fields.value(BILLING_LAST_NAME).await.unwrap_or_default();
        let name = format!("{first_name} {last_name}");
        let name = name.trim();
        if !name.is_empty() {
            request.set_billing_detail("name", name);
        }

        for (key, id) in [("email", BILLING_EMAIL), ("phone", BILLING_PHONE)] {
            if let Some(value) = self.fields.value(id).await {
                request.set_billing_detail(key, value);
            }
        }
        for (key, id) in ADDRESS_FIELDS {
            if let Some(value) = self.fields.value(id).await {
                request.set_address_detail(key, value);
            }
        }

        request
    }

    async fn generate_and_attach(
        &self,
        form: FormKind,
        instrument: PaymentInstrument,
        request: PaymentMethodRequest,
    ) -> Result<(), SdkError> {
        let payment_method = request.send(self.sdk.as_ref()).await?;
        info!(form = %form, payment_method = %payment_method.id, "payment method generated");

        match form {
            FormKind::AddPaymentMethod => {
                let setup_intent = self.sdk.setup_intent(&payment_method.id).await?;
                info!(setup_intent = %setup_intent.id, "setup intent confirmed");
                self.fields
                    .set_hidden_field(SETUP_INTENT_FIELD, &setup_intent.id)
                    .await;
            }
            FormKind::Checkout | FormKind::OrderReview => {
                self.fields
                    .set_hidden_field(instrument.payment_method_field_id(), &payment_method.id)
                    .await;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::in_memory::{InMemoryPage, PageEvent, PageState};
    use crate::infrastructure::scripted_sdk::{ScriptedOutcome, ScriptedSdk, SdkCall, SdkScript};

    fn checkout_page() -> PageState {
        PageState::new("https://shop.test/checkout/")
            .with_value(BILLING_FIRST_NAME, "Jane")
            .with_value(BILLING_LAST_NAME, "Doe")
            .with_value(BILLING_EMAIL, "jane@example.com")
            .with_checked(PaymentInstrument::Card.gateway_radio_id(), true)
    }

    fn payment_methods(outcomes: Vec<ScriptedOutcome>) -> ScriptedSdk {
        ScriptedSdk::new(SdkScript {
            payment_methods: outcomes,
            ..Default::default()
        })
    }

    fn orchestrator(page: &InMemoryPage, sdk: &ScriptedSdk) -> CheckoutOrchestrator {
        CheckoutOrchestrator::with_page(Box::new(sdk.clone()), page.clone(), CheckoutConfig::default())
    }

    fn card_checkout() -> SubmitContext {
        SubmitContext::new(FormKind::Checkout, Some(PaymentInstrument::Card))
    }

    #[tokio::test]
    async fn test_saved_method_submits_natively() {
        let page = InMemoryPage::new(checkout_page());
        let sdk = ScriptedSdk::default();
        let orchestrator = orchestrator(&page, &sdk);
        let mut state = SubmissionState::Idle;

        let decision = orchestrator
            .handle_submit(&mut state, &card_checkout().with_saved_method(true))
            .await;

        assert_eq!(decision, SubmitDecision::Allow);
        assert!(sdk.calls().await.is_empty());
        assert!(page.events().await.is_empty());
    }

    #[tokio::test]
    async fn test_new_card_submit_generates_token_and_resubmits_once() {
        let page = InMemoryPage::new(checkout_page());
        let sdk = payment_methods(vec![ScriptedOutcome::Ok("pm_card_1".to_string())]);
        let orchestrator = orchestrator(&page, &sdk);
        let mut state = SubmissionState::Idle;

        let first = orchestrator.handle_submit(&mut state, &card_checkout()).await;
        assert_eq!(first, SubmitDecision::Intercepted);
        assert_eq!(state, SubmissionState::Generated);

        let requests = sdk.payment_method_requests().await;
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].billing_detail("name"), Some("Jane Doe"));
        assert_eq!(requests[0].billing_detail("email"), Some("jane@example.com"));
        assert_eq!(requests[0].billing_detail("phone"), None);

        assert_eq!(
            page.field("wcpay-payment-method").await.as_deref(),
            Some("pm_card_1")
        );
        let resubmits = page
            .events()
            .await
            .into_iter()
            .filter(|event| matches!(event, PageEvent::Resubmitted(_)))
            .count();
        assert_eq!(resubmits, 1);
        assert!(!page.is_blocked(FormKind::Checkout).await);

        // The programmatic re-submit goes through without a second request.
        let second = orchestrator.handle_submit(&mut state, &card_checkout()).await;
        assert_eq!(second, SubmitDecision::Allow);
        assert_eq!(state, SubmissionState::Idle);
        assert_eq!(sdk.payment_method_requests().await.len(), 1);
    }

    #[tokio::test]
    async fn test_failed_generation_allows_retry() {
        let page = InMemoryPage::new(checkout_page());
        let sdk = payment_methods(vec![
            ScriptedOutcome::PaymentError("Your card was declined.".to_string()),
            ScriptedOutcome::Ok("pm_card_2".to_string()),
        ]);
        let orchestrator = orchestrator(&page, &sdk);
        let mut state = SubmissionState::Idle;

        let first = orchestrator.handle_submit(&mut state, &card_checkout()).await;
        assert_eq!(first, SubmitDecision::Intercepted);
        assert_eq!(state, SubmissionState::Failed);
        assert!(!page.is_blocked(FormKind::Checkout).await);
        assert_eq!(page.notices().await[0].message, "Your card was declined.");
        assert!(
            !page
                .events()
                .await
                .iter()
                .any(|event| matches!(event, PageEvent::Resubmitted(_)))
        );

        let retry = orchestrator.handle_submit(&mut state, &card_checkout()).await;
        assert_eq!(retry, SubmitDecision::Intercepted);
        assert_eq!(state, SubmissionState::Generated);
        assert_eq!(sdk.payment_method_requests().await.len(), 2);
    }

    #[tokio::test]
    async fn test_sepa_token_goes_to_sepa_field() {
        let page = InMemoryPage::new(checkout_page());
        let sdk = payment_methods(vec![ScriptedOutcome::Ok("pm_sepa_1".to_string())]);
        let orchestrator = orchestrator(&page, &sdk);
        let mut state = SubmissionState::Idle;
        let ctx = SubmitContext::new(FormKind::Checkout, Some(PaymentInstrument::SepaDebit));

        orchestrator.handle_submit(&mut state, &ctx).await;

        assert_eq!(
            page.field("wcpay-payment-method-sepa").await.as_deref(),
            Some("pm_sepa_1")
        );
        assert_eq!(page.field("wcpay-payment-method").await, None);
        let requests = sdk.payment_method_requests().await;
        assert_eq!(requests[0].instrument, PaymentInstrument::SepaDebit);
    }

    #[tokio::test]
    async fn test_submit_while_generating_is_held_without_request() {
        let page = InMemoryPage::new(checkout_page());
        let sdk = ScriptedSdk::default();
        let orchestrator = orchestrator(&page, &sdk);
        let mut state = SubmissionState::Generating;

        let decision = orchestrator.handle_submit(&mut state, &card_checkout()).await;

        assert_eq!(decision, SubmitDecision::Intercepted);
        assert_eq!(state, SubmissionState::Generating);
        assert!(sdk.calls().await.is_empty());
    }

    #[tokio::test]
    async fn test_address_details_are_collected() {
        let page = InMemoryPage::new(
            checkout_page()
                .with_value("billing_city", "Lisbon")
                .with_value("billing_country", "PT")
                .with_value("billing_postcode", "1100-148"),
        );
        let sdk = payment_methods(vec![ScriptedOutcome::Ok("pm_1".to_string())]);
        let orchestrator = orchestrator(&page, &sdk);
        let mut state = SubmissionState::Idle;

        orchestrator.handle_submit(&mut state, &card_checkout()).await;

        let request = &sdk.payment_method_requests().await[0];
        assert_eq!(request.address_detail("city"), Some("Lisbon"));
        assert_eq!(request.address_detail("country"), Some("PT"));
        assert_eq!(request.address_detail("postal_code"), Some("1100-148"));
        assert_eq!(request.address_detail("line1"), None);
    }

    #[tokio::test]
    async fn test_customer_data_travels_with_request() {
        let page = InMemoryPage::new(checkout_page());
        let sdk = payment_methods(vec![ScriptedOutcome::Ok("pm_1".to_string())]);
        let mut customer = CustomerData::default();
        customer.0.insert("customer_id".to_string(), "17".to_string());
        let orchestrator = orchestrator(&page, &sdk).with_customer_data(customer.clone());
        let mut state = SubmissionState::Idle;

        orchestrator.handle_submit(&mut state, &card_checkout()).await;

        assert_eq!(sdk.payment_method_requests().await[0].customer, customer);
    }

    #[tokio::test]
    async fn test_add_payment_method_attaches_setup_intent() {
        let page = InMemoryPage::new(checkout_page());
        let sdk = ScriptedSdk::new(SdkScript {
            payment_methods: vec![ScriptedOutcome::Ok("pm_new".to_string())],
            setup_intents: vec![ScriptedOutcome::Ok("seti_1".to_string())],
            ..Default::default()
        });
        let orchestrator = orchestrator(&page, &sdk);
        let mut state = SubmissionState::Idle;
        let ctx = SubmitContext::new(FormKind::AddPaymentMethod, None);

        let decision = orchestrator.handle_submit(&mut state, &ctx).await;

        assert_eq!(decision, SubmitDecision::Intercepted);
        assert_eq!(page.field(SETUP_INTENT_FIELD).await.as_deref(), Some("seti_1"));
        let calls = sdk.calls().await;
        assert_eq!(calls[1], SdkCall::SetupIntent("pm_new".to_string()));
        match &calls[0] {
            SdkCall::CreatePaymentMethod(request) => assert!(request.billing_details.is_empty()),
            other => panic!("unexpected call {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_add_payment_method_setup_failure_releases_form() {
        let page = InMemoryPage::new(checkout_page());
        let sdk = ScriptedSdk::new(SdkScript {
            payment_methods: vec![ScriptedOutcome::Ok("pm_new".to_string())],
            setup_intents: vec![ScriptedOutcome::PaymentError("Authentication failed".to_string())],
            ..Default::default()
        });
        let orchestrator = orchestrator(&page, &sdk);
        let mut state = SubmissionState::Idle;
        let ctx = SubmitContext::new(FormKind::AddPaymentMethod, None);

        orchestrator.handle_submit(&mut state, &ctx).await;

        assert_eq!(state, SubmissionState::Failed);
        assert_eq!(page.field(SETUP_INTENT_FIELD).await, None);
        assert!(!page.is_blocked(FormKind::AddPaymentMethod).await);
        assert_eq!(page.notices().await[0].message, "Authentication failed");
    }
}
