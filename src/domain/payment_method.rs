use super::instrument::PaymentInstrument;
use super::ports::PaymentSdk;
use crate::error::SdkError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Customer data prepared by the server and handed to the SDK with every request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerData(pub BTreeMap<String, String>);

/// A payment method created by the SDK from the hosted fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMethod {
    pub id: String,
}

/// A confirmed setup intent, used when a card is stored without a charge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetupIntent {
    pub id: String,
}

/// Builder for a single payment method creation call.
///
/// Billing and address details are collected from the form, then the request
/// is consumed by [`PaymentMethodRequest::send`], so it can be sent at most once.
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct PaymentMethodRequest {
    pub instrument: PaymentInstrument,
    pub customer: CustomerData,
    pub billing_details: BTreeMap<String, String>,
    pub address: BTreeMap<String, String>,
}

impl PaymentMethodRequest {
    pub fn new(instrument: PaymentInstrument, customer: CustomerData) -> Self {
        Self {
            instrument,
            customer,
            billing_details: BTreeMap::new(),
            address: BTreeMap::new(),
        }
    }

    pub fn set_billing_detail(&mut self, key: &str, value: impl Into<String>) {
        self.billing_details.insert(key.to_string(), value.into());
    }

    pub fn set_address_detail(&mut self, key: &str, value: impl Into<String>) {
        self.address.insert(key.to_string(), value.into());
    }

    pub fn billing_detail(&self, key: &str) -> Option<&str> {
        self.billing_details.get(key).map(String::as_str)
    }

    pub fn address_detail(&self, key: &str) -> Option<&str> {
        self.address.get(key).map(String::as_str)
    }

    /// Sends the request through the SDK, consuming it.
    pub async fn send(self, sdk: &dyn PaymentSdk) -> Result<PaymentMethod, SdkError> {
        sdk.create_payment_method(self).await
    }
}
