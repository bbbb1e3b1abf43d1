//! Capturing a view as a [`DocumentSnapshot`] and mounting it off-screen.

use super::surface::{NodeId, RenderSurface, ViewId};
use crate::error::ExportError;
use chrono::{DateTime, Local};
use folio_scene::{DocumentSnapshot, SnapshotMarker, SnapshotOptions, SNAPSHOT_MARKER};

/// Keeps a snapshot's node attached for as long as it lives.
///
/// Dropping the guard detaches the node, so every exit from an export
/// (return, `?`, timeout, cancellation) leaves the surface clean.
#[derive(Debug)]
pub struct SnapshotGuard {
    surface: RenderSurface,
    node: NodeId,
    marker: SnapshotMarker,
}

impl SnapshotGuard {
    /// Attaches an off-screen node tagged with the snapshot marker.
    pub fn mount(surface: &RenderSurface, marker: SnapshotMarker, width: f32) -> Self {
        surface.begin_export(marker.export_id);
        let node = surface.attach(
            vec![(marker.tag().to_string(), marker.export_id.to_string())],
            true,
            width,
        );
        log::debug!("Mounted snapshot {} as {}", marker.export_id, node);
        Self {
            surface: surface.clone(),
            node,
            marker,
        }
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn marker(&self) -> SnapshotMarker {
        self.marker
    }
}

impl Drop for SnapshotGuard {
    fn drop(&mut self) {
        if self.surface.detach(self.node) {
            log::debug!("Detached snapshot {} ({})", self.marker.export_id, self.node);
        }
        self.surface.end_export(self.marker.export_id);
    }
}

/// Copies the document shown by `view` and mounts it off-screen.
///
/// The view's transform is never read: the snapshot is laid out at
/// `options.logical_width` regardless of zoom, scroll or container width.
pub fn build_snapshot(
    surface: &RenderSurface,
    view: ViewId,
    marker: SnapshotMarker,
    options: SnapshotOptions,
    now: DateTime<Local>,
) -> Result<(DocumentSnapshot, SnapshotGuard), ExportError> {
    let shown = surface.view(view).ok_or(ExportError::Snapshot(view))?;
    let snapshot = DocumentSnapshot::capture(&shown.document, marker, options, now);
    let guard = SnapshotGuard::mount(surface, marker, options.logical_width);
    log::debug!(
        "Captured {} as {} with {} image slot(s)",
        view,
        snapshot.invoice_number(),
        snapshot.slots().len()
    );
    Ok((snapshot, guard))
}

/// Number of nodes on `surface` carrying the snapshot marker.
pub fn marked_node_count(surface: &RenderSurface) -> usize {
    surface.nodes_with_attribute(SNAPSHOT_MARKER).len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::surface::ViewTransform;
    use folio_types::{InvoiceDocument, Party};

    fn surface_with_view() -> (RenderSurface, ViewId) {
        let surface = RenderSurface::new();
        let doc = InvoiceDocument {
            recipient: Party::named("Acme Ltd"),
            invoice_number: Some("INV-42".into()),
            ..InvoiceDocument::default()
        };
        let transform = ViewTransform {
            scale: 0.5,
            scroll_y: 1200.0,
            viewport_width: Some(375.0),
            ..ViewTransform::default()
        };
        let view = surface.mount_view(doc, transform);
        (surface, view)
    }

    #[test]
    fn snapshot_is_offscreen_at_logical_width() {
        let (surface, view) = surface_with_view();
        let options = SnapshotOptions::default();
        let (snapshot, guard) =
            build_snapshot(&surface, view, SnapshotMarker::new(7), options, Local::now()).unwrap();
        assert_eq!(snapshot.logical_width(), 794.0);
        assert_eq!(snapshot.invoice_number(), "INV-42");

        let node = surface.node(guard.node()).unwrap();
        assert!(node.offscreen);
        assert_eq!(node.width, 794.0);
        assert_eq!(node.attribute(SNAPSHOT_MARKER), Some("7"));
        assert!(surface.is_in_flight(7));
    }

    #[test]
    fn dropping_the_guard_detaches() {
        let (surface, view) = surface_with_view();
        {
            let _held = build_snapshot(
                &surface,
                view,
                SnapshotMarker::new(1),
                SnapshotOptions::default(),
                Local::now(),
            )
            .unwrap();
            assert_eq!(marked_node_count(&surface), 1);
        }
        assert_eq!(marked_node_count(&surface), 0);
        assert!(!surface.is_in_flight(1));
    }

    #[test]
    fn missing_view_is_a_snapshot_failure() {
        let (surface, view) = surface_with_view();
        surface.unmount_view(view);
        let err = build_snapshot(
            &surface,
            view,
            SnapshotMarker::new(1),
            SnapshotOptions::default(),
            Local::now(),
        )
        .unwrap_err();
        assert!(matches!(err, ExportError::Snapshot(id) if id == view));
        assert_eq!(marked_node_count(&surface), 0);
    }
}
