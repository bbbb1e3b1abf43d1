//! Multipart payload for the remote record store.

use chrono::NaiveDate;
use folio_resource::{decode_data_uri, load_image_source};
use folio_traits::{ResourceProvider, SubmissionFile, SubmissionPayload, SubmitError};
use folio_types::{ImageSource, InvoiceDocument};
use image::ImageFormat;
use serde_json::json;
use std::io::Cursor;

pub const COMPANY_SIGNATURE_FILE: &str = "company_sig.png";
pub const CUSTOMER_SIGNATURE_FILE: &str = "customer_sig.png";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Builds the submission for `doc`.
///
/// `total_amount` is the subtotal; tax is not included. Signatures are always
/// sent as PNG; other formats are re-encoded. `today` stands in for a missing
/// issue date.
pub fn build_submission(
    doc: &InvoiceDocument,
    provider: &dyn ResourceProvider,
    today: NaiveDate,
) -> Result<SubmissionPayload, SubmitError> {
    let mut payload = SubmissionPayload::default();
    let mut field = |name: &str, value: String| payload.fields.push((name.to_string(), value));

    let text = |value: Option<&str>| value.unwrap_or_default().to_string();
    field("company_name", text(doc.issuer.name()));
    field("company_address", text(doc.issuer.address()));
    field("company_contact", text(doc.issuer.contact()));
    field("company_representative", text(doc.issuer.representative()));
    field("customer_name", text(doc.recipient.name()));
    field("customer_address", text(doc.recipient.address()));
    field(
        "date",
        doc.issue_date.unwrap_or(today).format(DATE_FORMAT).to_string(),
    );
    if let Some(due) = doc.due_date {
        field("due_date", due.format(DATE_FORMAT).to_string());
    }
    field("total_amount", doc.totals().subtotal.to_string());
    field("is_stamped", doc.stamp.applied.to_string());
    field("stamp_text", doc.stamp.text.clone());

    let items: Vec<serde_json::Value> = doc
        .items
        .iter()
        .map(|item| {
            json!({
                "description": item.description,
                "quantity": item.quantity,
                "price": item.unit_price,
            })
        })
        .collect();
    let items_json = serde_json::to_string(&items)
        .map_err(|e| SubmitError::InvalidPayload(format!("items_json: {}", e)))?;
    field("items_json", items_json);

    if let Some(logo) = &doc.issuer.logo {
        payload.files.push(logo_file(logo, provider)?);
    }
    if let Some(sig) = &doc.issuer_signature {
        payload
            .files
            .push(signature_file("company_signature", COMPANY_SIGNATURE_FILE, sig, provider)?);
    }
    if let Some(sig) = &doc.recipient_signature {
        payload
            .files
            .push(signature_file("customer_signature", CUSTOMER_SIGNATURE_FILE, sig, provider)?);
    }

    log::debug!(
        "Built submission with {} fields and {} files",
        payload.fields.len(),
        payload.files.len()
    );
    Ok(payload)
}

fn load(
    field: &str,
    source: &ImageSource,
    provider: &dyn ResourceProvider,
) -> Result<Vec<u8>, SubmitError> {
    load_image_source(source, provider)
        .map(|data| data.as_ref().clone())
        .map_err(|e| SubmitError::InvalidPayload(format!("{}: {}", field, e)))
}

fn logo_file(
    source: &ImageSource,
    provider: &dyn ResourceProvider,
) -> Result<SubmissionFile, SubmitError> {
    const FIELD: &str = "company_logo";
    let bytes = load(FIELD, source, provider)?;
    let (file_name, content_type) = match source {
        ImageSource::DataUri(uri) => {
            let mime = decode_data_uri(uri)
                .map(|d| d.mime)
                .unwrap_or_else(|_| "application/octet-stream".to_string());
            let ext = ImageFormat::from_mime_type(&mime)
                .and_then(|f| f.extensions_str().first().copied())
                .unwrap_or("bin");
            (format!("{}.{}", FIELD, ext), mime)
        }
        ImageSource::Resource(path) => {
            let name = path
                .rsplit(['/', '\\'])
                .next()
                .filter(|n| !n.is_empty())
                .unwrap_or(FIELD)
                .to_string();
            let mime = image::guess_format(&bytes)
                .map(|f| f.to_mime_type().to_string())
                .unwrap_or_else(|_| "application/octet-stream".to_string());
            (name, mime)
        }
    };
    Ok(SubmissionFile {
        field: FIELD.to_string(),
        file_name,
        content_type,
        bytes,
    })
}

fn signature_file(
    field: &str,
    file_name: &str,
    source: &ImageSource,
    provider: &dyn ResourceProvider,
) -> Result<SubmissionFile, SubmitError> {
    let bytes = load(field, source, provider)?;
    let png = match image::guess_format(&bytes) {
        Ok(ImageFormat::Png) => bytes,
        _ => {
            let decoded = image::load_from_memory(&bytes).map_err(|e| {
                SubmitError::InvalidPayload(format!("{}: not an image ({})", field, e))
            })?;
            let mut out = Cursor::new(Vec::new());
            decoded
                .write_to(&mut out, ImageFormat::Png)
                .map_err(|e| SubmitError::InvalidPayload(format!("{}: {}", field, e)))?;
            log::debug!("Re-encoded {} as PNG", field);
            out.into_inner()
        }
    };
    Ok(SubmissionFile {
        field: field.to_string(),
        file_name: file_name.to_string(),
        content_type: "image/png".to_string(),
        bytes: png,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_resource::{encode_data_uri, InMemoryResourceProvider};
    use folio_types::{LineItem, Party, Stamp};
    use image::{Rgba, RgbaImage};

    fn encoded(format: ImageFormat) -> Vec<u8> {
        let img = image::DynamicImage::ImageRgba8(RgbaImage::from_pixel(3, 2, Rgba([0, 0, 0, 255])));
        let img = match format {
            ImageFormat::Jpeg => image::DynamicImage::ImageRgb8(img.to_rgb8()),
            _ => img,
        };
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, format).unwrap();
        out.into_inner()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    fn document() -> InvoiceDocument {
        InvoiceDocument {
            issuer: Party {
                name: Some("Folio Studio".into()),
                address: Some("Plot 4, Kampala Road".into()),
                contact: Some("+256 700 000000".into()),
                representative: Some("J. Doe".into()),
                tagline: None,
                logo: None,
            },
            recipient: Party::named("Acme Ltd"),
            items: vec![
                LineItem::new("Consulting", 2.0, 500_000.0),
                LineItem::new("Travel", 1.0, 150_000.0),
            ],
            include_tax: true,
            stamp: Stamp {
                applied: true,
                text: "PAID".into(),
            },
            ..InvoiceDocument::default()
        }
    }

    #[test]
    fn textual_fields_follow_the_document() {
        let provider = InMemoryResourceProvider::new();
        let payload = build_submission(&document(), &provider, today()).unwrap();
        assert_eq!(payload.field("company_name"), Some("Folio Studio"));
        assert_eq!(payload.field("customer_name"), Some("Acme Ltd"));
        assert_eq!(payload.field("date"), Some("2024-03-01"));
        assert_eq!(payload.field("due_date"), None);
        // Subtotal only, tax excluded.
        assert_eq!(payload.field("total_amount"), Some("1150000"));
        assert_eq!(payload.field("is_stamped"), Some("true"));
        assert_eq!(payload.field("stamp_text"), Some("PAID"));

        let items: serde_json::Value =
            serde_json::from_str(payload.field("items_json").unwrap()).unwrap();
        assert_eq!(items[0]["description"], "Consulting");
        assert_eq!(items[1]["price"], 150_000.0);
        assert!(payload.files.is_empty());
    }

    #[test]
    fn signatures_are_named_and_converted_to_png() {
        let provider = InMemoryResourceProvider::new()
            .with("sig.jpg", encoded(ImageFormat::Jpeg))
            .unwrap();
        let doc = InvoiceDocument {
            issuer_signature: Some(ImageSource::from(encode_data_uri(
                "image/png",
                &encoded(ImageFormat::Png),
            ))),
            recipient_signature: Some(ImageSource::from("sig.jpg")),
            due_date: NaiveDate::from_ymd_opt(2024, 3, 31),
            ..document()
        };
        let payload = build_submission(&doc, &provider, today()).unwrap();
        assert_eq!(payload.field("due_date"), Some("2024-03-31"));

        let company = payload.file("company_signature").unwrap();
        assert_eq!(company.file_name, COMPANY_SIGNATURE_FILE);
        let customer = payload.file("customer_signature").unwrap();
        assert_eq!(customer.file_name, CUSTOMER_SIGNATURE_FILE);
        assert_eq!(image::guess_format(&customer.bytes).unwrap(), ImageFormat::Png);
        assert!(payload.file("company_logo").is_none());
    }

    #[test]
    fn logo_keeps_its_name_and_type() {
        let provider = InMemoryResourceProvider::new()
            .with("assets/logo.png", encoded(ImageFormat::Png))
            .unwrap();
        let mut doc = document();
        doc.issuer.logo = Some(ImageSource::from("assets/logo.png"));
        let payload = build_submission(&doc, &provider, today()).unwrap();
        let logo = payload.file("company_logo").unwrap();
        assert_eq!(logo.file_name, "logo.png");
        assert_eq!(logo.content_type, "image/png");
    }

    #[test]
    fn unresolvable_images_fail_the_submission() {
        let provider = InMemoryResourceProvider::new();
        let doc = InvoiceDocument {
            issuer_signature: Some(ImageSource::from("missing.png")),
            ..document()
        };
        let err = build_submission(&doc, &provider, today()).unwrap_err();
        assert!(matches!(err, SubmitError::InvalidPayload(msg) if msg.starts_with("company_signature")));
    }
}
