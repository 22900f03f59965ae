use crate::error::{CheckoutError, Result};
use serde::Deserialize;
use std::fs::File;
use std::path::Path;

pub const DEFAULT_GENERIC_ERROR_MESSAGE: &str = "There was a problem processing the payment. \
     Please check your email inbox and refresh the page to try again.";

/// Settings the server localizes into the checkout page.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CheckoutConfig {
    pub publishable_key: Option<String>,
    /// Shown instead of unexpected errors raised while confirming an intent.
    pub generic_error_message: String,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            publishable_key: None,
            generic_error_message: DEFAULT_GENERIC_ERROR_MESSAGE.to_string(),
        }
    }
}

impl CheckoutConfig {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let config = serde_json::from_reader(file)?;
        Ok(config)
    }

    /// Without a publishable key this is not a checkout page and nothing gets mounted.
    pub fn is_checkout_page(&self) -> bool {
        self.publishable_key
            .as_deref()
            .is_some_and(|key| !key.is_empty())
    }

    pub fn require_checkout_page(&self) -> Result<()> {
        if self.is_checkout_page() {
            Ok(())
        } else {
            Err(CheckoutError::ConfigError(
                "no publishable key configured".to_string(),
            ))
        }
    }
}
