use crate::error::RenderError;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use folio_layout::Placement;
use folio_types::geometry::PT_PER_MM;
use folio_types::PageSize;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream, StringFormat};
use std::io::Write;

/// Name of the page image in the page's XObject resources.
pub const IMAGE_RESOURCE_NAME: &str = "Im1";

/// Builds a one-page PDF holding a single placed RGB image.
#[derive(Debug, Clone)]
pub struct ImagePdfWriter {
    page: PageSize,
    title: Option<String>,
    producer: String,
}

impl ImagePdfWriter {
    pub fn new(page: PageSize) -> Self {
        Self {
            page,
            title: None,
            producer: format!("folio {}", env!("CARGO_PKG_VERSION")),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn page(&self) -> PageSize {
        self.page
    }

    /// Writes `rgb` (`width * height * 3` bytes, row-major, top row first)
    /// into a complete PDF file.
    pub fn write(
        &self,
        rgb: &[u8],
        width: u32,
        height: u32,
        placement: &Placement,
    ) -> Result<Vec<u8>, RenderError> {
        let expected = width as usize * height as usize * 3;
        if width == 0 || height == 0 || rgb.len() != expected {
            return Err(RenderError::InvalidImage {
                width,
                height,
                len: rgb.len(),
            });
        }

        let mut document = Document::with_version("1.7");
        let pages_id = document.new_object_id();

        let image_id = document.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => width as i64,
                "Height" => height as i64,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
                "Filter" => "FlateDecode",
            },
            deflate(rgb)?,
        ));

        let content = Content {
            operations: self.placement_operations(placement),
        };
        let content_id = document.add_object(Stream::new(
            dictionary! { "Filter" => "FlateDecode" },
            deflate(&content.encode()?)?,
        ));

        let page_width = self.page.width_pt();
        let page_height = self.page.height_pt();
        let page_id = document.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), page_width.into(), page_height.into()],
            "Contents" => content_id,
            "Resources" => dictionary! {
                "XObject" => dictionary! { IMAGE_RESOURCE_NAME => image_id },
            },
        });

        document.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![Object::from(page_id)],
                "Count" => 1,
            }),
        );

        let catalog_id = document.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        document.trailer.set("Root", catalog_id);

        let mut info = dictionary! {
            "Producer" => Object::String(self.producer.as_bytes().to_vec(), StringFormat::Literal),
        };
        if let Some(title) = &self.title {
            info.set(
                "Title",
                Object::String(title.as_bytes().to_vec(), StringFormat::Literal),
            );
        }
        let info_id = document.add_object(info);
        document.trailer.set("Info", info_id);

        let mut buffer = Vec::new();
        document.save_to(&mut buffer)?;
        log::debug!(
            "Wrote {}x{} px image onto {:.1}x{:.1} pt page ({} bytes)",
            width,
            height,
            page_width,
            page_height,
            buffer.len()
        );
        Ok(buffer)
    }

    /// `q w 0 0 h x y cm /Im1 Do Q`, converting the top-left millimetre
    /// placement into bottom-left PDF points.
    fn placement_operations(&self, placement: &Placement) -> Vec<Operation> {
        let w = placement.width * PT_PER_MM;
        let h = placement.height * PT_PER_MM;
        let x = placement.x * PT_PER_MM;
        let y = self.page.height_pt() - (placement.y + placement.height) * PT_PER_MM;
        vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![w.into(), 0.into(), 0.into(), h.into(), x.into(), y.into()],
            ),
            Operation::new("Do", vec![Object::Name(IMAGE_RESOURCE_NAME.as_bytes().to_vec())]),
            Operation::new("Q", vec![]),
        ]
    }
}

fn deflate(data: &[u8]) -> Result<Vec<u8>, RenderError> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}
