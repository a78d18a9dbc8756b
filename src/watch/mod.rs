//! Filesystem watching and the reload coordinator.
//!
//! The watcher turns filesystem events into reload requests on a
//! capacity-1 channel with non-blocking send, so any burst of events
//! while a rebuild is pending collapses into a single queued reload.
//! The coordinator drains that channel, rebuilds the batch, and swaps
//! it into the live [`ArcSwap`] only when the rebuild succeeded; a
//! failed rebuild keeps the previous batch serving.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use arc_swap::ArcSwap;
use crossbeam::channel::{Receiver, Sender};
use notify::event::{EventKind, ModifyKind};
use notify::{RecommendedWatcher, RecursiveMode, Watcher};

use crate::config::SiteConfig;
use crate::view::BuildBatch;
use crate::{build, debug, log, logger};

/// Whether an event should trigger a reload.
///
/// Metadata-only changes (permissions, timestamps) and pure access
/// events are noise; everything that touches names or contents counts.
fn is_relevant(kind: &EventKind) -> bool {
    match kind {
        EventKind::Create(_) | EventKind::Remove(_) => true,
        EventKind::Modify(ModifyKind::Metadata(_)) => false,
        EventKind::Modify(_) => true,
        EventKind::Access(_) => false,
        EventKind::Any | EventKind::Other => false,
    }
}

/// Attach watchers for the content, template and static directories.
///
/// A content-directory attach failure is fatal; template and static
/// directories degrade to a warning since the server can fall back to
/// the embedded layout and generated assets. The returned watcher must
/// stay alive for events to keep flowing.
pub fn spawn_watcher(config: &SiteConfig, reload_tx: Sender<()>) -> Result<RecommendedWatcher> {
    let mut watcher = notify::recommended_watcher(move |result: notify::Result<notify::Event>| {
        forward_event(result, &reload_tx)
    })
    .context("failed to create filesystem watcher")?;

    watch_required(&mut watcher, &config.dev.content_dir)?;
    watch_optional(&mut watcher, &config.dev.template_dir);
    watch_optional(&mut watcher, &config.dev.static_dir);

    Ok(watcher)
}

/// Forward one watcher callback onto the reload channel.
fn forward_event(result: notify::Result<notify::Event>, reload_tx: &Sender<()>) {
    match result {
        Ok(event) => {
            if is_relevant(&event.kind) {
                // capacity-1: a full channel means a reload is already
                // pending, so dropping the send is how bursts coalesce
                let _ = reload_tx.try_send(());
            }
        }
        Err(e) => log!("watch"; "watch error: {e}"),
    }
}

fn watch_required(watcher: &mut RecommendedWatcher, dir: &Path) -> Result<()> {
    watcher
        .watch(dir, RecursiveMode::Recursive)
        .with_context(|| format!("failed to watch content directory {}", dir.display()))?;
    debug!("watch"; "watching {}", dir.display());
    Ok(())
}

fn watch_optional(watcher: &mut RecommendedWatcher, dir: &Path) {
    if !dir.is_dir() {
        debug!("watch"; "not watching {}, directory missing", dir.display());
        return;
    }
    match watcher.watch(dir, RecursiveMode::Recursive) {
        Ok(()) => debug!("watch"; "watching {}", dir.display()),
        Err(e) => log!("watch"; "failed to watch {}: {e}", dir.display()),
    }
}

/// Consume reload signals until shutdown.
///
/// Each signal triggers a full rebuild. Success swaps the new batch
/// into `live`; failure reports and leaves the old batch in place.
pub fn run_coordinator(
    config: &SiteConfig,
    live: Arc<ArcSwap<BuildBatch>>,
    reload_rx: Receiver<()>,
    shutdown_rx: Receiver<()>,
) {
    loop {
        crossbeam::channel::select! {
            recv(shutdown_rx) -> _ => break,
            recv(reload_rx) -> msg => {
                if msg.is_err() {
                    break;
                }
                rebuild(config, &live);
            }
        }
    }
    debug!("watch"; "reload coordinator stopped");
}

fn rebuild(config: &SiteConfig, live: &ArcSwap<BuildBatch>) {
    let start = Instant::now();
    match build::build_batch(config, true) {
        Ok(batch) => {
            let pages = batch.len();
            live.store(Arc::new(batch));
            logger::status_success(&format!(
                "rebuilt {pages} page(s) in {:.1?}",
                start.elapsed()
            ));
        }
        Err(e) => {
            logger::status_error("rebuild failed, keeping previous pages", &format!("{e:#}"));
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
