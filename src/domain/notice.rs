use serde::Serialize;

/// An error notice shown at the top of the checkout form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub message: String,
}

impl Notice {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Markup of the notice group, with the message escaped.
    pub fn to_html(&self) -> String {
        format!(
            "<div class=\"woocommerce-NoticeGroup woocommerce-NoticeGroup-checkout\">\
             <ul class=\"woocommerce-error\" role=\"alert\"><li>{}</li></ul></div>",
            html_escape::encode_text(&self.message)
        )
    }
}
