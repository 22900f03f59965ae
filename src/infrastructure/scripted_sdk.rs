use crate::domain::confirmation::PendingConfirmation;
use crate::domain::instrument::PaymentInstrument;
use crate::domain::payment_method::{CustomerData, PaymentMethod, PaymentMethodRequest, SetupIntent};
use crate::domain::ports::PaymentSdk;
use crate::error::SdkError;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;
use tokio::sync::Mutex;

/// One canned SDK response, e.g. `{"ok": "pm_123"}` or `{"payment_error": "Card declined"}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptedOutcome {
    Ok(String),
    PaymentError(String),
    RuntimeError(String),
}

impl ScriptedOutcome {
    fn into_result(self) -> Result<String, SdkError> {
        match self {
            Self::Ok(value) => Ok(value),
            Self::PaymentError(message) => Err(SdkError::payment(message)),
            Self::RuntimeError(message) => Err(SdkError::runtime(message)),
        }
    }
}

/// Responses handed out in order, one queue per SDK operation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SdkScript {
    pub payment_methods: Vec<ScriptedOutcome>,
    pub setup_intents: Vec<ScriptedOutcome>,
    pub confirmations: Vec<ScriptedOutcome>,
}

/// What a consumed [`PaymentMethodRequest`] carried when it reached the SDK.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSnapshot {
    pub instrument: PaymentInstrument,
    pub customer: CustomerData,
    pub billing_details: BTreeMap<String, String>,
    pub address: BTreeMap<String, String>,
}

impl RequestSnapshot {
    pub fn billing_detail(&self, key: &str) -> Option<&str> {
        self.billing_details.get(key).map(String::as_str)
    }

    pub fn address_detail(&self, key: &str) -> Option<&str> {
        self.address.get(key).map(String::as_str)
    }
}

impl From<PaymentMethodRequest> for RequestSnapshot {
    fn from(request: PaymentMethodRequest) -> Self {
        let PaymentMethodRequest {
            instrument,
            customer,
            billing_details,
            address,
        } = request;
        Self {
            instrument,
            customer,
            billing_details,
            address,
        }
    }
}

/// A call received by the [`ScriptedSdk`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SdkCall {
    CreatePaymentMethod(RequestSnapshot),
    Confirm(PendingConfirmation),
    SetupIntent(String),
}

#[derive(Default)]
struct ScriptState {
    payment_methods: VecDeque<ScriptedOutcome>,
    setup_intents: VecDeque<ScriptedOutcome>,
    confirmations: VecDeque<ScriptedOutcome>,
    calls: Vec<SdkCall>,
}

/// Payment SDK answering from a script, for simulations and tests.
///
/// An exhausted queue answers with a runtime error.
#[derive(Clone, Default)]
pub struct ScriptedSdk {
    state: Arc<Mutex<ScriptState>>,
}

impl ScriptedSdk {
    pub fn new(script: SdkScript) -> Self {
        let state = ScriptState {
            payment_methods: script.payment_methods.into(),
            setup_intents: script.setup_intents.into(),
            confirmations: script.confirmations.into(),
            calls: Vec::new(),
        };
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    pub async fn calls(&self) -> Vec<SdkCall> {
        self.state.lock().await.calls.clone()
    }

    /// The payment method requests received so far.
    pub async fn payment_method_requests(&self) -> Vec<RequestSnapshot> {
        self.state
            .lock()
            .await
            .calls
            .iter()
            .filter_map(|call| match call {
                SdkCall::CreatePaymentMethod(request) => Some(request.clone()),
                _ => None,
            })
            .collect()
    }
}

fn next_outcome(queue: &mut VecDeque<ScriptedOutcome>, operation: &str) -> Result<String, SdkError> {
    queue
        .pop_front()
        .ok_or_else(|| SdkError::runtime(format!("no scripted response for {operation}")))?
        .into_result()
}

#[async_trait]
impl PaymentSdk for ScriptedSdk {
    async fn create_payment_method(
        &self,
        request: PaymentMethodRequest,
    ) -> Result<PaymentMethod, SdkError> {
        let mut state = self.state.lock().await;
        state.calls.push(SdkCall::CreatePaymentMethod(request.into()));
        let id = next_outcome(&mut state.payment_methods, "create_payment_method")?;
        Ok(PaymentMethod { id })
    }

    async fn confirm(&self, pending: PendingConfirmation) -> Result<String, SdkError> {
        let mut state = self.state.lock().await;
        state.calls.push(SdkCall::Confirm(pending));
        next_outcome(&mut state.confirmations, "confirm")
    }

    async fn setup_intent(&self, payment_method_id: &str) -> Result<SetupIntent, SdkError> {
        let mut state = self.state.lock().await;
        state
            .calls
            .push(SdkCall::SetupIntent(payment_method_id.to_string()));
        let id = next_outcome(&mut state.setup_intents, "setup_intent")?;
        Ok(SetupIntent { id })
    }
}
