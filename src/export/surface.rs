//! The shared render surface: mounted document views plus any off-screen
//! nodes attached for export.
//!
//! The surface is process-wide state behind a mutex. No method holds the lock
//! across an `.await`; every operation locks, mutates and returns.

use folio_types::InvoiceDocument;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

/// Identifies a document view mounted on a [`RenderSurface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(u64);

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "view-{}", self.0)
    }
}

/// Identifies a node attached to a [`RenderSurface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node-{}", self.0)
    }
}

/// How a view is displayed: zoom, scroll offset and the width of its
/// container. Export ignores all of it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    pub scale: f32,
    pub scroll_x: f32,
    pub scroll_y: f32,
    pub viewport_width: Option<f32>,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            scale: 1.0,
            scroll_x: 0.0,
            scroll_y: 0.0,
            viewport_width: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DocumentView {
    pub document: InvoiceDocument,
    pub transform: ViewTransform,
}

/// A node attached to the surface outside any view.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceNode {
    pub id: NodeId,
    pub attributes: Vec<(String, String)>,
    /// Off-screen nodes are positioned outside the visible area.
    pub offscreen: bool,
    pub width: f32,
}

impl SurfaceNode {
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, Default)]
struct SurfaceState {
    next_id: u64,
    views: BTreeMap<ViewId, DocumentView>,
    nodes: BTreeMap<NodeId, SurfaceNode>,
    in_flight: HashSet<u64>,
}

impl SurfaceState {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

/// Cheaply clonable handle to one shared surface.
#[derive(Debug, Clone, Default)]
pub struct RenderSurface {
    state: Arc<Mutex<SurfaceState>>,
}

impl RenderSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// A poisoned lock only means another thread panicked mid-update; the
    /// maps themselves are always left consistent.
    fn lock(&self) -> MutexGuard<'_, SurfaceState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn mount_view(&self, document: InvoiceDocument, transform: ViewTransform) -> ViewId {
        let mut state = self.lock();
        let id = ViewId(state.next_id());
        state.views.insert(
            id,
            DocumentView {
                document,
                transform,
            },
        );
        log::debug!("Mounted {}", id);
        id
    }

    /// Replaces the document shown by `id`. Returns `false` if the view is gone.
    pub fn update_view(&self, id: ViewId, document: InvoiceDocument) -> bool {
        match self.lock().views.get_mut(&id) {
            Some(view) => {
                view.document = document;
                true
            }
            None => false,
        }
    }

    pub fn set_transform(&self, id: ViewId, transform: ViewTransform) -> bool {
        match self.lock().views.get_mut(&id) {
            Some(view) => {
                view.transform = transform;
                true
            }
            None => false,
        }
    }

    pub fn unmount_view(&self, id: ViewId) -> bool {
        self.lock().views.remove(&id).is_some()
    }

    /// A copy of the view as currently displayed.
    pub fn view(&self, id: ViewId) -> Option<DocumentView> {
        self.lock().views.get(&id).cloned()
    }

    pub fn attach(&self, attributes: Vec<(String, String)>, offscreen: bool, width: f32) -> NodeId {
        let mut state = self.lock();
        let id = NodeId(state.next_id());
        state.nodes.insert(
            id,
            SurfaceNode {
                id,
                attributes,
                offscreen,
                width,
            },
        );
        id
    }

    /// Returns `false` if the node was already detached.
    pub fn detach(&self, id: NodeId) -> bool {
        self.lock().nodes.remove(&id).is_some()
    }

    pub fn node(&self, id: NodeId) -> Option<SurfaceNode> {
        self.lock().nodes.get(&id).cloned()
    }

    pub fn node_count(&self) -> usize {
        self.lock().nodes.len()
    }

    /// Nodes carrying attribute `name`, in attach order.
    pub fn nodes_with_attribute(&self, name: &str) -> Vec<SurfaceNode> {
        self.lock()
            .nodes
            .values()
            .filter(|node| node.attribute(name).is_some())
            .cloned()
            .collect()
    }

    pub(crate) fn begin_export(&self, export_id: u64) {
        self.lock().in_flight.insert(export_id);
    }

    pub(crate) fn end_export(&self, export_id: u64) {
        self.lock().in_flight.remove(&export_id);
    }

    pub fn is_in_flight(&self, export_id: u64) -> bool {
        self.lock().in_flight.contains(&export_id)
    }
}
