//! The invoice document handed to the export pipeline.
//!
//! A document is a plain value: the editing layer builds and mutates it, and
//! the export pipeline receives a clone that stays immutable for the duration
//! of one export.

use crate::totals::MonetaryTotals;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// File-name stem used when the recipient has no name yet.
pub const DRAFT_FILE_STEM: &str = "draft";

/// Text printed on the stamp overlay when none was entered.
pub const DEFAULT_STAMP_TEXT: &str = "PAID";

/// Where an embedded raster image comes from.
///
/// Signature capture and image upload both emit `data:` URIs; anything else
/// is a path or URL resolved through a resource provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ImageSource {
    DataUri(String),
    Resource(String),
}

impl ImageSource {
    pub fn as_str(&self) -> &str {
        match self {
            ImageSource::DataUri(s) | ImageSource::Resource(s) => s,
        }
    }

    /// Remote resources are loaded from another origin than the document.
    pub fn is_cross_origin(&self) -> bool {
        match self {
            ImageSource::DataUri(_) => false,
            ImageSource::Resource(s) => {
                let lower = s.trim_start().to_ascii_lowercase();
                lower.starts_with("http://") || lower.starts_with("https://")
            }
        }
    }
}

impl From<String> for ImageSource {
    fn from(value: String) -> Self {
        if value.trim_start().starts_with("data:") {
            ImageSource::DataUri(value)
        } else {
            ImageSource::Resource(value)
        }
    }
}

impl From<&str> for ImageSource {
    fn from(value: &str) -> Self {
        ImageSource::from(value.to_string())
    }
}

impl From<ImageSource> for String {
    fn from(value: ImageSource) -> Self {
        match value {
            ImageSource::DataUri(s) | ImageSource::Resource(s) => s,
        }
    }
}

/// An identity block (issuer or recipient).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Party {
    pub name: Option<String>,
    pub address: Option<String>,
    pub contact: Option<String>,
    pub representative: Option<String>,
    pub tagline: Option<String>,
    /// The identity mark (company logo). Only meaningful for the issuer.
    pub logo: Option<ImageSource>,
}

impl Party {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn name(&self) -> Option<&str> {
        non_blank(&self.name)
    }

    pub fn address(&self) -> Option<&str> {
        non_blank(&self.address)
    }

    pub fn contact(&self) -> Option<&str> {
        non_blank(&self.contact)
    }

    pub fn representative(&self) -> Option<&str> {
        non_blank(&self.representative)
    }

    pub fn tagline(&self) -> Option<&str> {
        non_blank(&self.tagline)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub description: String,
    pub quantity: f64,
    #[serde(alias = "price")]
    pub unit_price: f64,
}

impl LineItem {
    pub fn new(description: impl Into<String>, quantity: f64, unit_price: f64) -> Self {
        Self {
            description: description.into(),
            quantity,
            unit_price,
        }
    }

    /// Line amount. Derived, never stored.
    pub fn amount(&self) -> f64 {
        self.quantity * self.unit_price
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Stamp {
    pub applied: bool,
    pub text: String,
}

impl Default for Stamp {
    fn default() -> Self {
        Self {
            applied: false,
            text: DEFAULT_STAMP_TEXT.to_string(),
        }
    }
}

impl Stamp {
    pub fn label(&self) -> &str {
        let text = self.text.trim();
        if text.is_empty() { DEFAULT_STAMP_TEXT } else { text }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BankTransfer {
    pub bank_name: Option<String>,
    pub account_name: Option<String>,
    pub account_number: Option<String>,
    pub swift_code: Option<String>,
}

impl BankTransfer {
    /// A bank block is shown once it names a bank or an account number.
    pub fn is_present(&self) -> bool {
        non_blank(&self.bank_name).is_some() || non_blank(&self.account_number).is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MobileMoneyProvider {
    Mtn,
    Airtel,
}

impl MobileMoneyProvider {
    pub fn title(&self) -> &'static str {
        match self {
            MobileMoneyProvider::Mtn => "MTN MoMo",
            MobileMoneyProvider::Airtel => "Airtel Money",
        }
    }

    pub fn badge(&self) -> &'static str {
        match self {
            MobileMoneyProvider::Mtn => "MTN",
            MobileMoneyProvider::Airtel => "airtel",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MobileMoney {
    pub provider: MobileMoneyProvider,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub number: String,
}

impl MobileMoney {
    pub fn is_present(&self) -> bool {
        !self.number.trim().is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaymentInstructions {
    pub bank: Option<BankTransfer>,
    pub mobile_money: Vec<MobileMoney>,
}

impl PaymentInstructions {
    pub fn bank(&self) -> Option<&BankTransfer> {
        self.bank.as_ref().filter(|b| b.is_present())
    }

    pub fn mobile_money(&self) -> impl Iterator<Item = &MobileMoney> {
        self.mobile_money.iter().filter(|m| m.is_present())
    }

    pub fn is_empty(&self) -> bool {
        self.bank().is_none() && self.mobile_money().next().is_none()
    }
}

/// A billing document: issuer, recipient, line items, signatures and
/// payment instructions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InvoiceDocument {
    pub issuer: Party,
    pub recipient: Party,
    pub items: Vec<LineItem>,
    pub issuer_signature: Option<ImageSource>,
    pub recipient_signature: Option<ImageSource>,
    pub stamp: Stamp,
    pub issue_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub include_tax: bool,
    pub payment: PaymentInstructions,
    /// Explicit invoice number; one is generated at export time when absent.
    pub invoice_number: Option<String>,
}

impl InvoiceDocument {
    pub fn totals(&self) -> MonetaryTotals {
        MonetaryTotals::compute(&self.items, self.include_tax)
    }

    /// Suggested export file name, `invoice-<recipient name>.pdf`.
    ///
    /// Path separators in the name are replaced so the result is always a
    /// single file name.
    pub fn export_file_name(&self) -> String {
        let stem = self
            .recipient
            .name()
            .map(|name| name.replace(['/', '\\'], "-"))
            .unwrap_or_else(|| DRAFT_FILE_STEM.to_string());
        format!("invoice-{}.pdf", stem)
    }

    /// All embedded raster images, in document order.
    pub fn images(&self) -> impl Iterator<Item = &ImageSource> {
        self.issuer
            .logo
            .iter()
            .chain(self.issuer_signature.iter())
            .chain(self.recipient_signature.iter())
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}
