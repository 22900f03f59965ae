use serde::{Deserialize, Serialize};
use url::Url;

/// Hash prefix the server appends when an intent still needs customer authentication.
pub const CONFIRM_HASH_PREFIX: &str = "#wcpay-confirm-";

const ORDER_PAY_SEGMENT: &str = "order-pay";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentKind {
    Payment,
    Setup,
}

/// Parsed `#wcpay-confirm-<pi|si>:<order>:<client_secret>[:<nonce>]` fragment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmationMarker {
    pub kind: IntentKind,
    pub order_id: String,
    pub client_secret: String,
    pub nonce: Option<String>,
}

impl ConfirmationMarker {
    /// Parses a URL fragment, with or without the leading `#`.
    ///
    /// Anything that does not match the marker grammar yields `None`.
    pub fn parse(fragment: &str) -> Option<Self> {
        let rest = fragment
            .strip_prefix('#')
            .unwrap_or(fragment)
            .strip_prefix(&CONFIRM_HASH_PREFIX[1..])?;

        let mut parts = rest.split(':');
        let kind = match parts.next()? {
            "pi" => IntentKind::Payment,
            "si" => IntentKind::Setup,
            _ => return None,
        };
        let order_id = parts.next().filter(|part| !part.is_empty())?;
        let client_secret = parts.next().filter(|part| !part.is_empty())?;
        let nonce = parts.next().filter(|part| !part.is_empty()).map(str::to_string);
        if parts.next().is_some() {
            return None;
        }

        Some(Self {
            kind,
            order_id: order_id.to_string(),
            client_secret: client_secret.to_string(),
            nonce,
        })
    }

    /// Intent id, i.e. the client secret without its `_secret_` suffix.
    pub fn intent_id(&self) -> &str {
        match self.client_secret.find("_secret_") {
            Some(end) => &self.client_secret[..end],
            None => &self.client_secret,
        }
    }
}

/// A redirect-based authentication step that has to run on this page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingConfirmation {
    pub marker: ConfirmationMarker,
    /// The order being confirmed. On the order-pay page this comes from the path.
    pub order_id: String,
    pub is_order_page: bool,
    /// Payment method to store once confirmed, only set when the shopper opted in.
    pub payment_method_to_save: Option<String>,
    /// The current URL with the marker removed.
    pub clean_url: String,
}

impl PendingConfirmation {
    /// Derives the pending step from the current URL, if there is one.
    pub fn from_url(current_url: &str, saved_method_id: Option<&str>) -> Option<Self> {
        let url = Url::parse(current_url).ok()?;
        let marker = ConfirmationMarker::parse(url.fragment()?)?;

        let order_pay_id = order_pay_id(&url);
        let is_order_page = url.path().contains(ORDER_PAY_SEGMENT);
        let order_id = order_pay_id.unwrap_or_else(|| marker.order_id.clone());

        Some(Self {
            marker,
            order_id,
            is_order_page,
            payment_method_to_save: saved_method_id
                .filter(|id| !id.is_empty())
                .map(str::to_string),
            clean_url: strip_marker(&url),
        })
    }
}

/// What the SDK reports for the current page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Confirmation {
    NotRequired,
    Pending(PendingConfirmation),
}

/// Drops the fragment so that a reload does not repeat the confirmation.
pub fn strip_marker(url: &Url) -> String {
    let mut clean = url.clone();
    clean.set_fragment(None);
    clean.to_string()
}

/// Whether a `hashchange` to `hash` should trigger a confirmation check.
pub fn is_confirmation_hash(hash: &str) -> bool {
    hash.starts_with(CONFIRM_HASH_PREFIX)
}

fn order_pay_id(url: &Url) -> Option<String> {
    let mut segments = url.path_segments()?;
    segments.find(|segment| *segment == ORDER_PAY_SEGMENT)?;
    segments
        .next()
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
}
