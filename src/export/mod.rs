//! Fixed-page PDF export of a displayed invoice.
//!
//! An export runs as one cooperative flow on the tokio runtime:
//!
//! 1. [`build_snapshot`] copies the view's document at a fixed logical width
//!    and mounts it off-screen, held by a [`SnapshotGuard`].
//! 2. [`await_readiness`] loads every embedded image and waits the settle delay.
//! 3. The settled snapshot is composed into a scene and rasterized.
//! 4. The bitmap is fitted onto one page and written as a PDF.
//!
//! [`Exporter`] drives the steps, publishes its [`ExportState`], and makes
//! sure the snapshot is detached however the export ends. [`sweep_orphans`]
//! removes any snapshot nodes that escaped that guarantee.

mod artifact;
mod assets;
mod builder;
mod cancel;
pub mod config;
mod context;
mod orchestrator;
mod readiness;
mod recovery;
mod snapshot;
pub mod surface;

pub use artifact::ExportArtifact;
pub use assets::{decode_image, AssetError, AssetFuture, AssetLoader, ProviderAssetLoader};
pub use builder::ExportBuilder;
pub use cancel::CancelToken;
pub use config::{ConfigError, ExportConfig};
pub use context::ExportContext;
pub use orchestrator::{ExportState, Exporter};
pub use readiness::{await_readiness, ReadinessReport};
pub use recovery::sweep_orphans;
pub use snapshot::{build_snapshot, marked_node_count, SnapshotGuard};
pub use surface::{DocumentView, NodeId, RenderSurface, SurfaceNode, ViewId, ViewTransform};
