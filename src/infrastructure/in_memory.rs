use crate::domain::form::FormKind;
use crate::domain::notice::Notice;
use crate::domain::ports::{BrowserLocation, CheckoutUi, FormFields};
use crate::error::Result;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;
use url::Url;

/// Side effect observed on an [`InMemoryPage`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEvent {
    Blocked(FormKind),
    Unblocked(FormKind),
    PaymentSectionHidden,
    PaymentSectionShown,
    HiddenFieldSet { id: String, value: String },
    NoticeShown(String),
    ScrolledToNotice,
    FieldsRevalidated,
    /// `checkout_error` fired on the document body.
    CheckoutErrorTriggered,
    Resubmitted(FormKind),
    UrlReplaced(String),
    Navigated(String),
}

impl PageEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Blocked(_) => "blocked",
            Self::Unblocked(_) => "unblocked",
            Self::PaymentSectionHidden => "payment_section_hidden",
            Self::PaymentSectionShown => "payment_section_shown",
            Self::HiddenFieldSet { .. } => "hidden_field_set",
            Self::NoticeShown(_) => "notice_shown",
            Self::ScrolledToNotice => "scrolled_to_notice",
            Self::FieldsRevalidated => "fields_revalidated",
            Self::CheckoutErrorTriggered => "checkout_error",
            Self::Resubmitted(_) => "resubmitted",
            Self::UrlReplaced(_) => "url_replaced",
            Self::Navigated(_) => "navigated",
        }
    }

    /// The element or form the event applies to, empty when page-wide.
    pub fn target(&self) -> String {
        match self {
            Self::Blocked(form) | Self::Unblocked(form) | Self::Resubmitted(form) => {
                form.to_string()
            }
            Self::PaymentSectionHidden | Self::PaymentSectionShown => "payment".to_string(),
            Self::HiddenFieldSet { id, .. } => id.clone(),
            _ => String::new(),
        }
    }

    pub fn detail(&self) -> String {
        match self {
            Self::HiddenFieldSet { value, .. } => value.clone(),
            Self::NoticeShown(message) => message.clone(),
            Self::UrlReplaced(url) | Self::Navigated(url) => url.clone(),
            _ => String::new(),
        }
    }
}

/// Initial contents of an [`InMemoryPage`].
#[derive(Debug, Clone)]
pub struct PageState {
    pub url: String,
    pub values: HashMap<String, String>,
    pub checked: HashMap<String, bool>,
    pub has_notice_container: bool,
    pub notices: Vec<Notice>,
    /// Markup of the notice block currently at the top of the container.
    pub notice_markup: Option<String>,
    pub blocked: HashSet<FormKind>,
    pub payment_section_visible: bool,
    pub events: Vec<PageEvent>,
}

impl PageState {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            values: HashMap::new(),
            checked: HashMap::new(),
            has_notice_container: true,
            notices: Vec::new(),
            notice_markup: None,
            blocked: HashSet::new(),
            payment_section_visible: true,
            events: Vec::new(),
        }
    }

    pub fn with_value(mut self, id: &str, value: &str) -> Self {
        self.values.insert(id.to_string(), value.to_string());
        self
    }

    pub fn with_checked(mut self, id: &str, checked: bool) -> Self {
        self.checked.insert(id.to_string(), checked);
        self
    }

    pub fn without_notice_container(mut self) -> Self {
        self.has_notice_container = false;
        self
    }
}

/// A checkout page kept in memory.
///
/// Clones share the same state, so one page can be handed to the orchestrator
/// as form fields, UI and location at once.
#[derive(Clone)]
pub struct InMemoryPage {
    state: Arc<RwLock<PageState>>,
}

impl InMemoryPage {
    pub fn new(state: PageState) -> Self {
        Self {
            state: Arc::new(RwLock::new(state)),
        }
    }

    pub async fn url(&self) -> String {
        self.state.read().await.url.clone()
    }

    pub async fn field(&self, id: &str) -> Option<String> {
        self.state.read().await.values.get(id).cloned()
    }

    pub async fn notices(&self) -> Vec<Notice> {
        self.state.read().await.notices.clone()
    }

    pub async fn notice_markup(&self) -> Option<String> {
        self.state.read().await.notice_markup.clone()
    }

    pub async fn is_blocked(&self, form: FormKind) -> bool {
        self.state.read().await.blocked.contains(&form)
    }

    pub async fn payment_section_visible(&self) -> bool {
        self.state.read().await.payment_section_visible
    }

    pub async fn events(&self) -> Vec<PageEvent> {
        self.state.read().await.events.clone()
    }

    /// Returns the events recorded so far and clears the log.
    pub async fn take_events(&self) -> Vec<PageEvent> {
        std::mem::take(&mut self.state.write().await.events)
    }

    /// Simulates the shopper ticking or unticking an input.
    pub async fn set_checked(&self, id: &str, checked: bool) {
        self.state.write().await.checked.insert(id.to_string(), checked);
    }

    /// Simulates a hash change by the server redirect, replacing the URL fragment.
    pub async fn apply_hash(&self, hash: &str) -> Result<()> {
        let mut state = self.state.write().await;
        let mut url = Url::parse(&state.url)?;
        url.set_fragment(Some(hash.trim_start_matches('#')));
        state.url = url.into();
        Ok(())
    }
}

#[async_trait]
impl FormFields for InMemoryPage {
    async fn value(&self, id: &str) -> Option<String> {
        self.state.read().await.values.get(id).cloned()
    }

    async fn is_checked(&self, id: &str) -> Option<bool> {
        self.state.read().await.checked.get(id).copied()
    }

    async fn set_hidden_field(&self, id: &str, value: &str) {
        let mut state = self.state.write().await;
        state.values.insert(id.to_string(), value.to_string());
        state.events.push(PageEvent::HiddenFieldSet {
            id: id.to_string(),
            value: value.to_string(),
        });
    }
}

#[async_trait]
impl CheckoutUi for InMemoryPage {
    async fn block(&self, form: FormKind) {
        let mut state = self.state.write().await;
        state.blocked.insert(form);
        state.events.push(PageEvent::Blocked(form));
    }

    async fn unblock(&self, form: FormKind) {
        let mut state = self.state.write().await;
        state.blocked.remove(&form);
        state.events.push(PageEvent::Unblocked(form));
    }

    async fn hide_payment_section(&self) {
        let mut state = self.state.write().await;
        state.payment_section_visible = false;
        state.events.push(PageEvent::PaymentSectionHidden);
    }

    async fn show_payment_section(&self) {
        let mut state = self.state.write().await;
        state.payment_section_visible = true;
        state.events.push(PageEvent::PaymentSectionShown);
    }

    async fn show_notice(&self, notice: Notice) {
        let mut state = self.state.write().await;
        if !state.has_notice_container {
            return;
        }
        let message = notice.message.clone();
        state.notice_markup = Some(notice.to_html());
        state.notices.clear();
        state.notices.insert(0, notice);
        state.events.push(PageEvent::NoticeShown(message));
        state.events.push(PageEvent::ScrolledToNotice);
        state.events.push(PageEvent::FieldsRevalidated);
        state.events.push(PageEvent::CheckoutErrorTriggered);
    }

    async fn submit(&self, form: FormKind) {
        self.state.write().await.events.push(PageEvent::Resubmitted(form));
    }
}

#[async_trait]
impl BrowserLocation for InMemoryPage {
    async fn current_url(&self) -> String {
        self.state.read().await.url.clone()
    }

    async fn replace_url(&self, url: &str) {
        let mut state = self.state.write().await;
        state.url = url.to_string();
        state.events.push(PageEvent::UrlReplaced(url.to_string()));
    }

    async fn navigate(&self, url: &str) {
        let mut state = self.state.write().await;
        state.url = url.to_string();
        state.events.push(PageEvent::Navigated(url.to_string()));
    }
}
