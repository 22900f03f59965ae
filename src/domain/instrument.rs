use serde::{Deserialize, Serialize};

/// Payment instruments rendered by the hosted fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentInstrument {
    Card,
    SepaDebit,
}

impl PaymentInstrument {
    /// Type name the SDK expects when building a payment method request.
    pub fn sdk_type(&self) -> &'static str {
        match self {
            Self::Card => "card",
            Self::SepaDebit => "sepa_debit",
        }
    }

    /// Radio input that selects this instrument's gateway.
    pub fn gateway_radio_id(&self) -> &'static str {
        match self {
            Self::Card => "payment_method_woocommerce_payments",
            Self::SepaDebit => "payment_method_woocommerce_payments_sepa",
        }
    }

    /// Hidden input that carries the generated payment method id.
    pub fn payment_method_field_id(&self) -> &'static str {
        match self {
            Self::Card => "wcpay-payment-method",
            Self::SepaDebit => "wcpay-payment-method-sepa",
        }
    }

    /// Radio input for "use a new payment method" in the saved tokens list.
    pub fn new_token_radio_id(&self) -> &'static str {
        match self {
            Self::Card => "wc-woocommerce_payments-payment-token-new",
            Self::SepaDebit => "wc-woocommerce_payments-payment-sepa-token-new",
        }
    }
}
