//! Static content server over the overlay filesystem.
//!
//! A thin consumer: it maps request URLs to virtual paths, resolves them
//! through the overlay, and handles conditional requests. No resolver
//! logic lives here.

mod response;

use anyhow::{Context, Result, anyhow};
use percent_encoding::percent_decode_str;
use std::net::SocketAddr;
use std::sync::Arc;
use tiny_http::{Request, Server};

use crate::cache::{CacheDecision, negotiate};
use crate::config::HostConfig;
use crate::log;
use crate::overlay::OverlayFs;
use crate::path::normalize;

/// Virtual path of the page served for a bare `/` with no native index.
const WELCOME_PAGE: &str = "~/~Welcome/Pages/index.html";

/// Bind and run the request loop (blocking).
pub fn run(config: &HostConfig, overlay: Arc<OverlayFs>) -> Result<()> {
    let addr = SocketAddr::new(config.serve.interface, config.serve.port);
    let server = Server::http(addr).map_err(|e| anyhow!("failed to bind {addr}: {e}"))?;
    log!("serve"; "http://{addr}");

    for request in server.incoming_requests() {
        if let Err(e) = handle_request(request, &overlay) {
            log!("serve"; "request error: {e:#}");
        }
    }
    Ok(())
}

fn handle_request(request: Request, overlay: &OverlayFs) -> Result<()> {
    let request_vpath = request_virtual_path(request.url());

    let Some(vpath) = resolve_serveable(overlay, &request_vpath) else {
        return response::respond_not_found(request);
    };

    let modified = overlay.modified_time(&vpath);

    if let Some(time) = modified
        && should_negotiate(overlay, &vpath, &request_vpath)
    {
        let header = response::header_value(&request, "If-Modified-Since");
        if negotiate(time, header.as_deref()) == CacheDecision::NotModified {
            return response::respond_not_modified(request, time);
        }
    }

    // the resource resolved, so a failed read is a server-side fault; the
    // client still gets an answer instead of a dropped connection
    match load_body(overlay, &vpath) {
        Ok(body) => response::respond_body(request, &vpath, body, modified),
        Err(e) => {
            log!("serve"; "{e:#}");
            response::respond_server_error(request)
        }
    }
}

fn load_body(overlay: &OverlayFs, vpath: &str) -> Result<Vec<u8>> {
    overlay
        .open(vpath)?
        .read_to_vec()
        .with_context(|| format!("failed to read {vpath}"))
}

/// Map a request URL onto the virtual namespace: percent-decode, drop the
/// query string, root the path at `~/`.
fn request_virtual_path(url: &str) -> String {
    let path = url.split('?').next().unwrap_or(url);
    let decoded = percent_decode_str(path)
        .decode_utf8()
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string());
    format!("~{}", if decoded.starts_with('/') { decoded } else { format!("/{decoded}") })
}

/// Pick the virtual path to serve: the path itself, its directory index,
/// or the welcome page for a bare root.
fn resolve_serveable(overlay: &OverlayFs, request_vpath: &str) -> Option<String> {
    if overlay.file_exists(request_vpath) {
        return Some(request_vpath.to_string());
    }

    if overlay.dir_exists(request_vpath) {
        let index = format!("{}/index.html", request_vpath.trim_end_matches('/'));
        if overlay.file_exists(&index) {
            return Some(index);
        }
    }

    if matches!(request_vpath, "~" | "~/") && overlay.file_exists(WELCOME_PAGE) {
        return Some(WELCOME_PAGE.to_string());
    }

    None
}

/// Whether conditional negotiation applies to this resolution.
///
/// Only module-store-backed content negotiates, and only when the resolved
/// resource is the one the client actually asked for; an index or welcome
/// fallback serves fresh.
fn should_negotiate(overlay: &OverlayFs, vpath: &str, request_vpath: &str) -> bool {
    let parsed = overlay.registry().parse_content_path(vpath);
    if parsed.module.as_deref().and_then(|m| m.store()).is_none() {
        return false;
    }
    let requested = overlay.registry().expand_root(request_vpath);
    normalize(&requested) == normalize(&parsed.full_path)
}

/// Seed well-known view-default files into the areas directory.
///
/// One-time, best-effort: existing targets are left alone and failures are
/// logged without aborting startup.
pub fn copy_view_defaults(config: &HostConfig) {
    let views = config.root.join(&config.defaults.views_dir);
    let areas = config.root.join(&config.defaults.areas_dir);

    for name in &config.defaults.files {
        let src = views.join(name);
        let dst = areas.join(name);
        if !src.is_file() || dst.exists() {
            continue;
        }
        let copied = std::fs::create_dir_all(&areas).and_then(|()| std::fs::copy(&src, &dst));
        match copied {
            Ok(_) => log!("serve"; "seeded {} into {}", name, config.defaults.areas_dir),
            Err(e) => log!("serve"; "could not seed {name}: {e}"),
        }
    }
}
