use folio_types::{ImageSource, Size};
use std::fmt;
use std::sync::Arc;

/// Footprint of an image that failed to load.
pub const BROKEN_IMAGE_SIZE: Size = Size {
    width: 24.0,
    height: 24.0,
};

/// A decoded raster with straight (non-premultiplied) RGBA8 pixels.
#[derive(Clone, PartialEq, Eq)]
pub struct DecodedImage {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl fmt::Debug for DecodedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodedImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.rgba.len())
            .finish()
    }
}

impl DecodedImage {
    /// Returns `None` unless both dimensions are non-zero and the buffer holds
    /// exactly `width * height` pixels.
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> Option<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)?
            .checked_mul(4)?;
        if width == 0 || height == 0 || rgba.len() != expected {
            return None;
        }
        Some(Self {
            width,
            height,
            rgba,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn rgba(&self) -> &[u8] {
        &self.rgba
    }

    pub fn natural_size(&self) -> Size {
        Size::new(self.width as f32, self.height as f32)
    }
}

/// Load state of one embedded image.
#[derive(Debug, Clone)]
pub enum AssetState {
    Pending,
    Loaded(Arc<DecodedImage>),
    Failed(String),
}

impl AssetState {
    /// Loaded and failed are both terminal.
    pub fn is_settled(&self) -> bool {
        !matches!(self, AssetState::Pending)
    }

    pub fn image(&self) -> Option<&Arc<DecodedImage>> {
        match self {
            AssetState::Loaded(image) => Some(image),
            _ => None,
        }
    }
}

/// What an embedded image represents. The identity mark gets a larger box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageRole {
    IdentityMark,
    IssuerSignature,
    RecipientSignature,
}

#[derive(Debug, Clone)]
pub struct ImageSlot {
    pub role: ImageRole,
    pub source: ImageSource,
    /// Upper bound for the placed size; images are never enlarged into it.
    pub max_box: Size,
    pub state: AssetState,
}

impl ImageSlot {
    pub fn new(role: ImageRole, source: ImageSource, max_box: Size) -> Self {
        Self {
            role,
            source,
            max_box,
            state: AssetState::Pending,
        }
    }

    /// Size the image occupies in the composed scene.
    pub fn placed_size(&self) -> Size {
        match &self.state {
            AssetState::Loaded(image) => image.natural_size().contain_within(self.max_box),
            AssetState::Pending | AssetState::Failed(_) => Size::new(
                BROKEN_IMAGE_SIZE.width.min(self.max_box.width),
                BROKEN_IMAGE_SIZE.height.min(self.max_box.height),
            ),
        }
    }
}
