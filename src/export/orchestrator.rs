use super::artifact::ExportArtifact;
use super::cancel::CancelToken;
use super::context::ExportContext;
use super::readiness::await_readiness;
use super::recovery::sweep_orphans;
use super::snapshot::build_snapshot;
use super::surface::{RenderSurface, ViewId};
use crate::error::ExportError;
use chrono::Local;
use folio_layout::{compose, fit_to_page};
use folio_scene::SnapshotMarker;
use log::{debug, error, info};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;
use tokio::sync::watch;

/// Where an export is. Every export ends by leaving the in-flight set,
/// through `Failed` when it produced no artifact. The exporter reports `Idle`
/// only once no export is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportState {
    Idle,
    SnapshotBuilding,
    AwaitingReadiness,
    Rasterizing,
    LayingOut,
    Emitting,
    Failed,
}

impl ExportState {
    pub fn is_idle(&self) -> bool {
        matches!(self, ExportState::Idle)
    }
}

impl fmt::Display for ExportState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExportState::Idle => "idle",
            ExportState::SnapshotBuilding => "building snapshot",
            ExportState::AwaitingReadiness => "awaiting readiness",
            ExportState::Rasterizing => "rasterizing",
            ExportState::LayingOut => "laying out",
            ExportState::Emitting => "emitting",
            ExportState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Runs exports of document views mounted on a [`RenderSurface`].
///
/// The exporter publishes its [`ExportState`] on a watch channel so a UI can
/// disable its trigger while an export runs. It does not queue or reject
/// overlapping calls; each call gets its own snapshot and export id. With
/// several calls in flight the channel carries the latest transition, and
/// when one of them finishes it falls back to the newest export still running.
#[derive(Debug)]
pub struct Exporter {
    context: Arc<ExportContext>,
    surface: RenderSurface,
    state: watch::Sender<ExportState>,
    active: Mutex<BTreeMap<u64, ExportState>>,
    next_export: AtomicU64,
}

impl Exporter {
    pub fn new(context: ExportContext, surface: RenderSurface) -> Self {
        let (state, _) = watch::channel(ExportState::Idle);
        Self {
            context: Arc::new(context),
            surface,
            state,
            active: Mutex::new(BTreeMap::new()),
            next_export: AtomicU64::new(0),
        }
    }

    pub fn context(&self) -> &ExportContext {
        &self.context
    }

    pub fn surface(&self) -> &RenderSurface {
        &self.surface
    }

    pub fn state(&self) -> ExportState {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<ExportState> {
        self.state.subscribe()
    }

    /// Number of exports currently running.
    pub fn in_flight(&self) -> usize {
        self.active_exports().len()
    }

    fn active_exports(&self) -> MutexGuard<'_, BTreeMap<u64, ExportState>> {
        self.active.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn publish(&self, next: ExportState) {
        let previous = self.state.send_replace(next);
        if previous != next {
            debug!("Export state: {} -> {}", previous, next);
        }
    }

    fn advance(&self, export_id: u64, next: ExportState) {
        let mut active = self.active_exports();
        active.insert(export_id, next);
        self.publish(next);
    }

    fn finish(&self, export_id: u64, failed: bool) {
        let mut active = self.active_exports();
        active.remove(&export_id);
        if failed {
            self.publish(ExportState::Failed);
        }
        let remaining = active
            .last_key_value()
            .map(|(_, state)| *state)
            .unwrap_or(ExportState::Idle);
        self.publish(remaining);
    }

    pub async fn export(&self, view: ViewId) -> Result<ExportArtifact, ExportError> {
        self.export_with_cancel(view, None).await
    }

    /// Exports `view` to a one-page PDF.
    ///
    /// The whole run is bounded by the configured timeout, and `cancel` is
    /// honored at every suspension point. However the call ends, the
    /// snapshot it mounted is gone from the surface before it returns.
    pub async fn export_with_cancel(
        &self,
        view: ViewId,
        cancel: Option<&CancelToken>,
    ) -> Result<ExportArtifact, ExportError> {
        let export_id = self.next_export.fetch_add(1, Ordering::Relaxed) + 1;
        let started = Instant::now();
        sweep_orphans(&self.surface);

        let limit = self.context.config.timeout();
        let run = self.run(view, export_id);
        let guarded = async {
            match cancel {
                Some(token) => tokio::select! {
                    biased;
                    _ = token.cancelled() => Err(ExportError::Cancelled),
                    result = run => result,
                },
                None => run.await,
            }
        };
        let result = match tokio::time::timeout(limit, guarded).await {
            Ok(result) => result,
            Err(_) => Err(ExportError::Timeout(limit)),
        };

        match &result {
            Ok(artifact) => info!(
                "Exported {} as '{}' ({} bytes) in {:.2?}",
                view,
                artifact.file_name,
                artifact.bytes.len(),
                started.elapsed()
            ),
            Err(e) => {
                sweep_orphans(&self.surface);
                if e.is_cancelled() {
                    info!("Export {} of {} cancelled", export_id, view);
                } else {
                    error!("Export {} of {} failed: {}", export_id, view, e);
                }
            }
        }
        self.finish(export_id, result.is_err());
        result
    }

    async fn run(&self, view: ViewId, export_id: u64) -> Result<ExportArtifact, ExportError> {
        let config = &self.context.config;

        self.advance(export_id, ExportState::SnapshotBuilding);
        let (mut snapshot, guard) = build_snapshot(
            &self.surface,
            view,
            SnapshotMarker::new(export_id),
            config.snapshot_options(),
            Local::now(),
        )?;

        self.advance(export_id, ExportState::AwaitingReadiness);
        let report = await_readiness(
            &mut snapshot,
            Arc::clone(&self.context.loader),
            config.settle_delay(),
        )
        .await;
        if report.failed > 0 {
            debug!(
                "Export {} continues with {} placeholder image(s)",
                export_id, report.failed
            );
        }

        self.advance(export_id, ExportState::Rasterizing);
        tokio::task::yield_now().await;
        let scene = compose(&snapshot, &self.context.typesetter);
        debug!(
            "Composed {}x{} scene for {}",
            scene.width,
            scene.height,
            snapshot.invoice_number()
        );
        let raster = self
            .context
            .rasterizer
            .rasterize(&scene, &config.raster_options())?;

        self.advance(export_id, ExportState::LayingOut);
        let placement = fit_to_page(raster.width(), raster.height(), config.page)?;
        if placement.is_shrunk() {
            debug!(
                "Content taller than the page, shrunk by {:.3}",
                placement.shrink
            );
        }

        self.advance(export_id, ExportState::Emitting);
        let file_name = snapshot.document().export_file_name();
        let bytes = self
            .context
            .pdf_writer
            .clone()
            .with_title(file_name.clone())
            .write(&raster.to_rgb(), raster.width(), raster.height(), &placement)?;

        drop(guard);
        Ok(ExportArtifact {
            file_name,
            bytes,
            page_count: 1,
            placement,
            raster_width: raster.width(),
            raster_height: raster.height(),
            invoice_number: snapshot.invoice_number().to_string(),
        })
    }
}
