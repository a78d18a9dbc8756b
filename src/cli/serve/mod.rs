//! Development server with live reload.
//!
//! Requests are routed against the currently live [`BuildBatch`], held
//! in an [`ArcSwap`] so the reload coordinator can replace the whole
//! batch atomically. A request that loaded the old batch finishes
//! against it; the next request sees the new one.

mod lifecycle;
mod response;

use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;
use arc_swap::ArcSwap;
use crossbeam::channel;
use percent_encoding::percent_decode_str;
use rustc_hash::FxHasher;
use tiny_http::{Request, Server};

use crate::config::SiteConfig;
use crate::embed::theme::THEME_JS;
use crate::utils::mime::types;
use crate::view::BuildBatch;
use crate::{build, core, debug, log, theme};

/// The `serve` subcommand: build, bind, watch, serve until Ctrl+C.
pub fn run(config: SiteConfig) -> Result<()> {
    let config = Arc::new(config);

    let (server, addr) = lifecycle::bind_with_retry(config.dev.port)?;
    let server = Arc::new(server);

    let (shutdown_tx, shutdown_rx) = channel::unbounded::<()>();
    core::register_server(Arc::clone(&server), shutdown_tx);

    let batch = build::build_batch(&config, true)?;
    log!("serve"; "serving {} page(s) at http://{addr}", batch.len());
    let live = Arc::new(ArcSwap::from_pointee(batch));

    let reload_handle =
        lifecycle::spawn_reload(Arc::clone(&config), Arc::clone(&live), shutdown_rx)?;

    run_request_loop(&server, &config, &live);

    lifecycle::wait_for_shutdown(reload_handle);
    log!("serve"; "stopped");
    Ok(())
}

fn run_request_loop(server: &Server, config: &Arc<SiteConfig>, live: &Arc<ArcSwap<BuildBatch>>) {
    // handle requests concurrently so a slow static read cannot block
    // page loads
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(4)
        .build()
        .expect("failed to create thread pool");

    for request in server.incoming_requests() {
        let config = Arc::clone(config);
        let live = Arc::clone(live);
        pool.spawn(move || {
            if let Err(e) = handle_request(request, &config, &live) {
                log!("serve"; "request error: {e:#}");
            }
        });
    }
}

fn handle_request(
    request: Request,
    config: &SiteConfig,
    live: &ArcSwap<BuildBatch>,
) -> Result<()> {
    if core::is_shutdown() {
        return response::respond_unavailable(request);
    }

    let id = request_id();
    debug!("serve"; "[{id}] {} {}", request.method(), request.url());

    let decoded = {
        let raw = request.url();
        let path = raw.split(['?', '#']).next().unwrap_or(raw);
        percent_decode_str(path).decode_utf8().map(|c| c.into_owned())
    };
    let Ok(decoded) = decoded else {
        return response::respond_error(request, 404, "invalid percent-encoding");
    };

    if let Some(rel) = decoded.strip_prefix("/assets/") {
        return serve_asset(request, config, rel);
    }

    let route = normalize_route(&decoded);
    let batch = live.load();
    match batch.view_for(route) {
        Some(view) => response::respond_page(request, &view.page),
        None => response::respond_error(request, 404, &format!("no page at {route}")),
    }
}

/// Serve `/assets/*`: user static files first, then the generated
/// theme assets the embedded layout references.
fn serve_asset(request: Request, config: &SiteConfig, rel: &str) -> Result<()> {
    if let Some(path) = resolve_asset(&config.dev.static_dir, rel) {
        return response::respond_file(request, &path);
    }

    match rel {
        "styles.css" => {
            response::respond_bytes(request, types::CSS, theme::stylesheet(config).into_bytes())
        }
        "theme.js" => {
            response::respond_bytes(request, types::JAVASCRIPT, THEME_JS.as_bytes().to_vec())
        }
        _ => response::respond_error(request, 404, &format!("no asset at /assets/{rel}")),
    }
}

/// Map a prefix-stripped asset path onto the static directory,
/// rejecting parent-directory traversal.
fn resolve_asset(static_dir: &Path, rel: &str) -> Option<PathBuf> {
    let mut path = static_dir.to_path_buf();
    for part in rel.split('/') {
        match part {
            "" | "." => continue,
            ".." => return None,
            part => path.push(part),
        }
    }
    path.is_file().then_some(path)
}

/// Collapse trailing slashes so `/about/` and `/about` hit one route.
fn normalize_route(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/"
    } else {
        trimmed
    }
}

/// Short id tying a request's log lines together.
fn request_id() -> String {
    static COUNTER: AtomicU64 = AtomicU64::new(0);

    let mut hasher = FxHasher::default();
    COUNTER.fetch_add(1, Ordering::Relaxed).hash(&mut hasher);
    if let Ok(now) = SystemTime::now().duration_since(UNIX_EPOCH) {
        now.subsec_nanos().hash(&mut hasher);
    }
    format!("{:016x}", hasher.finish())
}

// ============================================================================
// Tests
// ============================================================================
