#![allow(dead_code)]

use lopdf::content::Content;
use lopdf::{Document as LopdfDocument, ObjectId};

fn first_page(doc: &LopdfDocument) -> Option<ObjectId> {
    doc.get_pages().values().next().copied()
}

/// `[llx, lly, urx, ury]` of the first page, in points.
pub fn media_box(doc: &LopdfDocument) -> Option<[f32; 4]> {
    let page = doc.get_dictionary(first_page(doc)?).ok()?;
    let array = page.get(b"MediaBox").ok()?.as_array().ok()?;
    let values: Vec<f32> = array.iter().filter_map(|o| o.as_float().ok()).collect();
    values.try_into().ok()
}

/// Pixel dimensions of every image XObject on the first page.
pub fn page_images(doc: &LopdfDocument) -> Vec<(i64, i64)> {
    let Some(page_id) = first_page(doc) else {
        return Vec::new();
    };
    let Ok(page) = doc.get_dictionary(page_id) else {
        return Vec::new();
    };
    let Some(xobjects) = page
        .get(b"Resources")
        .and_then(|r| r.as_dict())
        .and_then(|r| r.get(b"XObject"))
        .and_then(|x| x.as_dict())
        .ok()
    else {
        return Vec::new();
    };

    let mut images = Vec::new();
    for (_name, value) in xobjects.iter() {
        let Ok(id) = value.as_reference() else {
            continue;
        };
        let Ok(stream) = doc.get_object(id).and_then(|o| o.as_stream()) else {
            continue;
        };
        let width = stream.dict.get(b"Width").and_then(|w| w.as_i64());
        let height = stream.dict.get(b"Height").and_then(|h| h.as_i64());
        if let (Ok(width), Ok(height)) = (width, height) {
            images.push((width, height));
        }
    }
    images
}

/// Operands of the first `cm` operator on the first page: `[a b c d e f]`.
pub fn image_matrix(doc: &LopdfDocument) -> Option<[f32; 6]> {
    let content = doc.get_page_content(first_page(doc)?).ok()?;
    let content = Content::decode(&content).ok()?;
    let cm = content.operations.iter().find(|op| op.operator == "cm")?;
    let values: Vec<f32> = cm.operands.iter().filter_map(|o| o.as_float().ok()).collect();
    values.try_into().ok()
}

/// Assert the number of pages in a PDF
#[macro_export]
macro_rules! assert_pdf_page_count {
    ($pdf:expr, $count:expr) => {
        assert_eq!(
            $pdf.page_count(),
            $count,
            "Expected {} pages, got {}",
            $count,
            $pdf.page_count()
        );
    };
}

/// Assert the first page is A4 portrait (595.28 x 841.89 pt)
#[macro_export]
macro_rules! assert_pdf_is_a4 {
    ($pdf:expr) => {
        let media = $crate::common::pdf_assertions::media_box(&$pdf.doc)
            .expect("page has a MediaBox");
        assert!(
            (media[2] - 595.28).abs() < 0.05 && (media[3] - 841.89).abs() < 0.05,
            "Expected an A4 MediaBox, got {:?}",
            media
        );
    };
}

/// Assert the page image is drawn `$w` x `$h` points with its top on the page top
#[macro_export]
macro_rules! assert_image_drawn_at {
    ($pdf:expr, $w:expr, $h:expr) => {
        let m = $crate::common::pdf_assertions::image_matrix(&$pdf.doc)
            .expect("page draws an image");
        let media = $crate::common::pdf_assertions::media_box(&$pdf.doc)
            .expect("page has a MediaBox");
        assert!((m[0] - $w).abs() < 0.05, "image width {} != {}", m[0], $w);
        assert!((m[3] - $h).abs() < 0.05, "image height {} != {}", m[3], $h);
        assert!(m[4].abs() < 1e-3, "image not left-aligned: x = {}", m[4]);
        assert!(
            (m[5] + m[3] - media[3]).abs() < 0.05,
            "image not top-aligned: y = {}, h = {}",
            m[5],
            m[3]
        );
    };
}
