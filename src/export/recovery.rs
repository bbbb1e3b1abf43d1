//! Removal of snapshot nodes left behind on the render surface.

use super::surface::RenderSurface;
use folio_scene::SNAPSHOT_MARKER;

/// Detaches every marked node whose export is no longer in flight and
/// returns how many were removed.
///
/// Nodes owned by a live export are left alone. Nothing here is reported to
/// the user.
pub fn sweep_orphans(surface: &RenderSurface) -> usize {
    let mut removed = 0;
    for node in surface.nodes_with_attribute(SNAPSHOT_MARKER) {
        let owner = node
            .attribute(SNAPSHOT_MARKER)
            .and_then(|value| value.parse::<u64>().ok());
        if let Some(export_id) = owner
            && surface.is_in_flight(export_id)
        {
            continue;
        }
        if surface.detach(node.id) {
            log::debug!("Removed orphaned snapshot {} ({:?})", node.id, owner);
            removed += 1;
        }
    }
    if removed > 0 {
        log::warn!("Swept {} orphaned snapshot node(s) from the render surface", removed);
    }
    removed
}
