//! Fixed element vocabulary of the checkout pages.
//!
//! The orchestrator only ever addresses the page through these ids, so
//! renaming any of them breaks the integration.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const BILLING_FIRST_NAME: &str = "billing_first_name";
pub const BILLING_LAST_NAME: &str = "billing_last_name";
pub const BILLING_EMAIL: &str = "billing_email";
pub const BILLING_PHONE: &str = "billing_phone";
pub const BILLING_CITY: &str = "billing_city";
pub const BILLING_COUNTRY: &str = "billing_country";
pub const BILLING_ADDRESS_1: &str = "billing_address_1";
pub const BILLING_ADDRESS_2: &str = "billing_address_2";
pub const BILLING_POSTCODE: &str = "billing_postcode";
pub const BILLING_STATE: &str = "billing_state";

pub const SETUP_INTENT_FIELD: &str = "wcpay-setup-intent";
pub const SAVE_PAYMENT_METHOD_CHECKBOX: &str = "wc-woocommerce_payments-new-payment-method";

/// Address keys of the payment method request, paired with the form field they come from.
pub const ADDRESS_FIELDS: [(&str, &str); 6] = [
    ("city", BILLING_CITY),
    ("country", BILLING_COUNTRY),
    ("line1", BILLING_ADDRESS_1),
    ("line2", BILLING_ADDRESS_2),
    ("postal_code", BILLING_POSTCODE),
    ("state", BILLING_STATE),
];

/// The forms whose submission is orchestrated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormKind {
    /// `form.checkout`, the classic checkout.
    Checkout,
    /// `#order_review`, the "pay for order" page.
    OrderReview,
    /// `form#add_payment_method` in the customer's account.
    AddPaymentMethod,
}

impl FormKind {
    /// Billing details are only collected on forms that carry billing fields.
    pub fn collects_billing_details(&self) -> bool {
        !matches!(self, Self::AddPaymentMethod)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Checkout => "checkout",
            Self::OrderReview => "order_review",
            Self::AddPaymentMethod => "add_payment_method",
        }
    }
}

impl fmt::Display for FormKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
