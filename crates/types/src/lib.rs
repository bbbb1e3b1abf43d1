pub mod color;
pub mod document;
pub mod geometry;
pub mod ids;
pub mod record;
pub mod totals;

pub use color::Color;
pub use document::{
    BankTransfer, ImageSource, InvoiceDocument, LineItem, MobileMoney, MobileMoneyProvider,
    Party, PaymentInstructions, Stamp,
};
pub use geometry::{PageSize, Point, Rect, Size};
pub use ids::RecordId;
pub use record::{InvoiceRecord, InvoiceStatus};
pub use totals::{MonetaryTotals, TAX_RATE};
