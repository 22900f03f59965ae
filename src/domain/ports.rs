use super::confirmation::{Confirmation, PendingConfirmation};
use super::form::FormKind;
use super::instrument::PaymentInstrument;
use super::notice::Notice;
use super::payment_method::{CustomerData, PaymentMethod, PaymentMethodRequest, SetupIntent};
use crate::error::SdkError;
use async_trait::async_trait;

/// The hosted payment fields SDK.
#[async_trait]
pub trait PaymentSdk: Send + Sync {
    fn generate_payment_method_request(
        &self,
        instrument: PaymentInstrument,
        customer: &CustomerData,
    ) -> PaymentMethodRequest {
        PaymentMethodRequest::new(instrument, customer.clone())
    }

    /// Tokenizes the hosted fields. Reached through [`PaymentMethodRequest::send`].
    async fn create_payment_method(
        &self,
        request: PaymentMethodRequest,
    ) -> Result<PaymentMethod, SdkError>;

    /// Checks whether `current_url` asks for an authentication step.
    fn confirm_intent(&self, current_url: &str, saved_method_id: Option<&str>) -> Confirmation {
        match PendingConfirmation::from_url(current_url, saved_method_id) {
            Some(pending) => Confirmation::Pending(pending),
            None => Confirmation::NotRequired,
        }
    }

    /// Runs the authentication step and resolves to the URL to redirect to.
    async fn confirm(&self, pending: PendingConfirmation) -> Result<String, SdkError>;

    async fn setup_intent(&self, payment_method_id: &str) -> Result<SetupIntent, SdkError>;
}

/// Read and write access to the form inputs.
#[async_trait]
pub trait FormFields: Send + Sync {
    async fn value(&self, id: &str) -> Option<String>;
    /// `None` when the input is not on the page.
    async fn is_checked(&self, id: &str) -> Option<bool>;
    async fn set_hidden_field(&self, id: &str, value: &str);
}

/// Visual side effects on the checkout page.
#[async_trait]
pub trait CheckoutUi: Send + Sync {
    async fn block(&self, form: FormKind);
    async fn unblock(&self, form: FormKind);
    async fn hide_payment_section(&self);
    async fn show_payment_section(&self);
    /// Replaces any displayed notice, scrolls to it and revalidates the fields.
    async fn show_notice(&self, notice: Notice);
    /// Programmatic re-submission of `form`.
    async fn submit(&self, form: FormKind);
}

#[async_trait]
pub trait BrowserLocation: Send + Sync {
    async fn current_url(&self) -> String;
    /// Rewrites the visible URL without navigating.
    async fn replace_url(&self, url: &str);
    async fn navigate(&self, url: &str);
}

pub type PaymentSdkBox = Box<dyn PaymentSdk>;
pub type FormFieldsBox = Box<dyn FormFields>;
pub type CheckoutUiBox = Box<dyn CheckoutUi>;
pub type BrowserLocationBox = Box<dyn BrowserLocation>;
