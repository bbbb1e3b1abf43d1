//! Waiting until every embedded image of a snapshot has settled.

use super::assets::AssetLoader;
use folio_scene::{AssetState, DocumentSnapshot};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadinessReport {
    pub loaded: usize,
    pub failed: usize,
}

/// Loads all pending image slots concurrently, records each terminal state in
/// the snapshot, then waits `settle_delay`.
///
/// A failed load is absorbed: the slot is marked failed and rendered as a
/// placeholder. There is no per-image timeout; a load that never finishes
/// holds the gate open until the caller gives up on it. Dropping the returned
/// future aborts any loads still running.
pub async fn await_readiness(
    snapshot: &mut DocumentSnapshot,
    loader: Arc<dyn AssetLoader>,
    settle_delay: Duration,
) -> ReadinessReport {
    let requests: Vec<_> = snapshot
        .pending()
        .map(|(index, slot)| (index, slot.role, loader.load(&slot.source)))
        .collect();
    let mut loads = JoinSet::new();
    for (index, role, load) in requests {
        loads.spawn(async move { (index, role, load.await) });
    }

    let mut report = ReadinessReport::default();
    while let Some(joined) = loads.join_next().await {
        match joined {
            Ok((index, role, Ok(image))) => {
                log::debug!(
                    "Image {:?} loaded ({}x{})",
                    role,
                    image.width(),
                    image.height()
                );
                snapshot.settle(index, AssetState::Loaded(Arc::new(image)));
                report.loaded += 1;
            }
            Ok((index, role, Err(e))) => {
                log::warn!("Image {:?} failed to load, using placeholder: {}", role, e);
                snapshot.settle(index, AssetState::Failed(e.to_string()));
                report.failed += 1;
            }
            Err(e) => {
                log::warn!("Image load task failed: {}", e);
                report.failed += 1;
            }
        }
    }

    // A task that panicked never reported its index; fail whatever is left.
    let abandoned: Vec<usize> = snapshot.pending().map(|(index, _)| index).collect();
    for index in abandoned {
        snapshot.settle(index, AssetState::Failed("load task aborted".to_string()));
    }

    if !settle_delay.is_zero() {
        tokio::time::sleep(settle_delay).await;
    }
    log::debug!(
        "Readiness: {} loaded, {} failed, settled after {:?}",
        report.loaded,
        report.failed,
        settle_delay
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::assets::{AssetError, AssetFuture};
    use chrono::Local;
    use folio_scene::{DecodedImage, ImageRole, SnapshotMarker, SnapshotOptions};
    use folio_traits::ResourceError;
    use folio_types::{ImageSource, InvoiceDocument};
    use std::time::Instant;

    /// Loads anything whose reference starts with `ok`, fails the rest.
    #[derive(Debug)]
    struct PrefixLoader;

    impl AssetLoader for PrefixLoader {
        fn load(&self, source: &ImageSource) -> AssetFuture {
            let ok = source.as_str().starts_with("ok");
            Box::pin(async move {
                tokio::task::yield_now().await;
                if ok {
                    Ok(DecodedImage::new(1, 1, vec![0, 0, 0, 255]).unwrap())
                } else {
                    Err(AssetError::Resource(ResourceError::NotFound("x".into())))
                }
            })
        }
    }

    fn snapshot(logo: &str, sig: &str) -> DocumentSnapshot {
        let mut doc = InvoiceDocument::default();
        doc.issuer.logo = Some(ImageSource::from(logo));
        doc.issuer_signature = Some(ImageSource::from(sig));
        DocumentSnapshot::capture(
            &doc,
            SnapshotMarker::new(1),
            SnapshotOptions::default(),
            Local::now(),
        )
    }

    #[tokio::test]
    async fn every_slot_reaches_a_terminal_state() {
        let mut snap = snapshot("ok-logo.png", "bad-sig.png");
        let report = await_readiness(&mut snap, Arc::new(PrefixLoader), Duration::ZERO).await;
        assert_eq!(report, ReadinessReport { loaded: 1, failed: 1 });
        assert!(snap.is_settled());
        assert!(snap.slot(ImageRole::IdentityMark).unwrap().state.image().is_some());
        assert!(matches!(
            snap.slot(ImageRole::IssuerSignature).unwrap().state,
            AssetState::Failed(_)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn waits_the_settle_delay() {
        let mut snap = snapshot("ok-a", "ok-b");
        let started = Instant::now();
        let before = tokio::time::Instant::now();
        await_readiness(&mut snap, Arc::new(PrefixLoader), Duration::from_millis(500)).await;
        assert!(tokio::time::Instant::now() - before >= Duration::from_millis(500));
        // Paused clock: the delay is virtual.
        assert!(started.elapsed() < Duration::from_millis(500));
    }

    #[tokio::test]
    async fn no_images_means_immediately_ready() {
        let mut snap = DocumentSnapshot::capture(
            &InvoiceDocument::default(),
            SnapshotMarker::new(1),
            SnapshotOptions::default(),
            Local::now(),
        );
        let report = await_readiness(&mut snap, Arc::new(PrefixLoader), Duration::ZERO).await;
        assert_eq!(report, ReadinessReport::default());
        assert!(snap.is_settled());
    }
}
