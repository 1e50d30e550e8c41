//! Store settings: the remote configuration singleton.

use serde::{Deserialize, Serialize};

/// Store-wide configuration, read-only from the client.
///
/// A single record on the remote backend; the storefront caches it and
/// feeds the currency fields to every price-displaying view and the contact
/// fields to the checkout hand-off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSettings {
    /// ISO 4217 code (e.g., "USD").
    pub currency_code: String,
    /// Display symbol (e.g., "$").
    pub currency_symbol: String,
    /// Phone number, in international digits-only form, for the order
    /// hand-off deep link.
    pub contact_phone: String,
    /// Free-form payment instructions shown on the checkout page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_instructions: Option<String>,
    /// Additional contact links (label, URL) shown in the footer.
    #[serde(default)]
    pub contact_links: Vec<(String, String)>,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            currency_code: "USD".to_string(),
            currency_symbol: "$".to_string(),
            contact_phone: String::new(),
            payment_instructions: None,
            contact_links: Vec::new(),
        }
    }
}
