//! Scene description for the export pipeline.
//!
//! Export never touches a live, on-screen view. Instead it captures a
//! [`DocumentSnapshot`] (a value copy of the document plus the image slots it
//! embeds), waits for those slots to settle, and composes a [`Scene`]: a flat,
//! declarative list of drawing primitives at a fixed logical width. The scene
//! is what the rasterizer consumes.

mod asset;
mod node;
mod snapshot;

pub use asset::{AssetState, DecodedImage, ImageRole, ImageSlot, BROKEN_IMAGE_SIZE};
pub use node::{
    FontFace, GradientStop, Group, ImageContent, ImageNode, Scene, SceneNode, StrokeStyle,
    TextRun,
};
pub use snapshot::{DocumentSnapshot, SnapshotMarker, SnapshotOptions, SNAPSHOT_MARKER};
