use crate::document::LineItem;
use serde::Serialize;

/// Value-added tax applied when the document's tax flag is set.
pub const TAX_RATE: f64 = 0.18;

/// Derived monetary figures. Computed on demand, never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonetaryTotals {
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,
}

impl MonetaryTotals {
    pub fn compute(items: &[LineItem], include_tax: bool) -> Self {
        let subtotal: f64 = items.iter().map(LineItem::amount).sum();
        let tax = if include_tax { subtotal * TAX_RATE } else { 0.0 };
        Self {
            subtotal,
            tax,
            total: subtotal + tax,
        }
    }
}
