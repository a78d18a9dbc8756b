//! Server lifecycle: binding, reload threads, shutdown.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::Result;
use arc_swap::ArcSwap;
use crossbeam::channel::{bounded, Receiver};
use tiny_http::Server;

use crate::config::SiteConfig;
use crate::view::BuildBatch;
use crate::{log, watch};

/// Maximum number of port binding attempts.
const MAX_PORT_RETRIES: u16 = 10;

/// Dev server binds loopback only.
const INTERFACE: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

/// Bind to the loopback interface, retrying on the next ports when the
/// configured one is taken.
pub fn bind_with_retry(base_port: u16) -> Result<(Server, SocketAddr)> {
    for offset in 0..MAX_PORT_RETRIES {
        let port = base_port.saturating_add(offset);
        let addr = SocketAddr::new(INTERFACE, port);

        match Server::http(addr) {
            Ok(server) => {
                if offset > 0 {
                    log!("serve"; "port {} in use, using {} instead", base_port, port);
                }
                // resolve the real port when asked for an ephemeral one
                let addr = server.server_addr().to_ip().unwrap_or(addr);
                return Ok((server, addr));
            }
            Err(_) if offset + 1 < MAX_PORT_RETRIES => continue,
            Err(e) => {
                return Err(anyhow::anyhow!(
                    "failed to bind after {} attempts (ports {}-{}): {}",
                    MAX_PORT_RETRIES,
                    base_port,
                    port,
                    e
                ));
            }
        }
    }
    unreachable!()
}

/// Spawn the watcher plus reload coordinator thread.
///
/// A missing content directory disables live reload entirely (there is
/// nothing to watch; the sample page is being served). A content
/// directory that exists but cannot be watched is a startup error.
pub fn spawn_reload(
    config: Arc<SiteConfig>,
    live: Arc<ArcSwap<BuildBatch>>,
    shutdown_rx: Receiver<()>,
) -> Result<Option<JoinHandle<()>>> {
    if !config.dev.content_dir.exists() {
        log!(
            "watch";
            "content directory {} missing, live reload disabled",
            config.dev.content_dir.display()
        );
        return Ok(None);
    }

    // capacity 1: bursts of filesystem events coalesce into one reload
    let (reload_tx, reload_rx) = bounded::<()>(1);
    let watcher = watch::spawn_watcher(&config, reload_tx)?;

    let handle = thread::spawn(move || {
        // the watcher stops delivering events once dropped, so it lives
        // exactly as long as the coordinator loop
        let _watcher = watcher;
        watch::run_coordinator(&config, live, reload_rx, shutdown_rx);
    });
    Ok(Some(handle))
}

/// Wait for the reload thread to finish, bounded at 2 seconds.
pub fn wait_for_shutdown(handle: Option<JoinHandle<()>>) {
    let Some(handle) = handle else { return };

    for _ in 0..40 {
        if handle.is_finished() {
            let _ = handle.join();
            return;
        }
        thread::sleep(Duration::from_millis(50));
    }
}
