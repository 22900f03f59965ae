use crate::config::CheckoutConfig;
use crate::domain::form::FormKind;
use crate::error::Result;
use crate::infrastructure::in_memory::PageState;
use crate::infrastructure::scripted_sdk::SdkScript;
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;

/// A checkout page, a scripted SDK and the browser events to replay against them.
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub config: CheckoutConfig,
    pub page: PageSpec,
    #[serde(default)]
    pub sdk: SdkScript,
    #[serde(default)]
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PageSpec {
    pub url: String,
    #[serde(default)]
    pub fields: HashMap<String, String>,
    #[serde(default)]
    pub checked: HashMap<String, bool>,
    #[serde(default = "default_notice_container")]
    pub notice_container: bool,
}

fn default_notice_container() -> bool {
    true
}

impl PageSpec {
    pub fn into_state(self) -> PageState {
        let mut state = PageState::new(self.url);
        state.values = self.fields;
        state.checked = self.checked;
        state.has_notice_container = self.notice_container;
        state
    }
}

/// A browser event.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    Submit { form: FormKind },
    HashChange { hash: String },
    PageLoad,
    /// The shopper ticks or unticks an input.
    Check { id: String, checked: bool },
}

impl Step {
    pub fn action(&self) -> &'static str {
        match self {
            Self::Submit { .. } => "submit",
            Self::HashChange { .. } => "hash_change",
            Self::PageLoad => "page_load",
            Self::Check { .. } => "check",
        }
    }
}

/// Reads a [`Scenario`] from JSON.
pub struct ScenarioReader<R: Read> {
    source: R,
}

impl<R: Read> ScenarioReader<R> {
    pub fn new(source: R) -> Self {
        Self { source }
    }

    pub fn scenario(self) -> Result<Scenario> {
        Ok(serde_json::from_reader(self.source)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::scripted_sdk::ScriptedOutcome;

    #[test]
    fn test_reader_full_scenario() {
        let data = r##"{
            "config": {"publishableKey": "pk_test", "genericErrorMessage": "Try again."},
            "page": {
                "url": "https://shop.test/checkout/",
                "fields": {"billing_first_name": "Jane"},
                "checked": {"payment_method_woocommerce_payments": true}
            },
            "sdk": {"payment_methods": [{"ok": "pm_1"}]},
            "steps": [
                {"action": "submit", "form": "checkout"},
                {"action": "hash_change", "hash": "#wcpay-confirm-pi:1:pi_1_secret_a"},
                {"action": "check", "id": "wc-woocommerce_payments-new-payment-method", "checked": true}
            ]
        }"##;

        let scenario = ScenarioReader::new(data.as_bytes()).scenario().unwrap();

        assert_eq!(scenario.config.generic_error_message, "Try again.");
        assert_eq!(scenario.sdk.payment_methods, vec![ScriptedOutcome::Ok("pm_1".to_string())]);
        assert_eq!(
            scenario.steps[0],
            Step::Submit {
                form: FormKind::Checkout
            }
        );
        assert_eq!(scenario.steps[1].action(), "hash_change");
        assert!(scenario.page.notice_container);

        let state = scenario.page.into_state();
        assert_eq!(state.values.get("billing_first_name").map(String::as_str), Some("Jane"));
    }

    #[test]
    fn test_reader_rejects_unknown_form() {
        let data = r#"{"page": {"url": "https://shop.test/"}, "steps": [{"action": "submit", "form": "cart"}]}"#;
        assert!(ScenarioReader::new(data.as_bytes()).scenario().is_err());
    }
}
