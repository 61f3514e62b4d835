//! Static file server with caching disabled.

use crate::CliError;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tiny_http::{Header, Response, Server};

const NO_CACHE_HEADERS: [(&str, &str); 3] = [
    ("Cache-Control", "no-cache, no-store, must-revalidate"),
    ("Pragma", "no-cache"),
    ("Expires", "0"),
];

/// Serve `dir` on `port` until the process is killed.
pub(crate) fn serve(port: u16, dir: &Path) -> Result<(), CliError> {
    let addr = format!("0.0.0.0:{port}");
    let server = Server::http(&addr).map_err(|e| CliError::Bind {
        addr: addr.clone(),
        message: e.to_string(),
    })?;

    log::info!("serving {} at http://localhost:{port}", dir.display());
    println!("Press Ctrl+C to stop");

    for request in server.incoming_requests() {
        let url = request.url().to_string();
        let method = request.method().to_string();

        let response = match resolve_path(dir, &url).and_then(|path| {
            fs::read(&path).ok().map(|body| (content_type(&path), body))
        }) {
            Some((mime, body)) => {
                log::info!("{method} {url} 200");
                with_headers(Response::from_data(body), mime)
            }
            None => {
                log::warn!("{method} {url} 404");
                with_headers(Response::from_data(b"404 Not Found".to_vec()), "text/plain")
                    .with_status_code(404)
            }
        };

        if let Err(e) = request.respond(response) {
            log::error!("failed to respond to {url}: {e}");
        }
    }
    Ok(())
}

fn with_headers<R: std::io::Read>(mut response: Response<R>, mime: &str) -> Response<R> {
    let mut headers = vec![("Content-Type", mime)];
    headers.extend(NO_CACHE_HEADERS);
    for (name, value) in headers {
        if let Ok(header) = Header::from_bytes(name.as_bytes(), value.as_bytes()) {
            response.add_header(header);
        }
    }
    response
}

/// Map a request URL onto a file under `root`.
///
/// The query string is dropped, `/` serves `index.html` and any path that
/// would leave `root` is rejected.
fn resolve_path(root: &Path, url: &str) -> Option<PathBuf> {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    let relative = path.trim_start_matches('/');
    let relative = if relative.is_empty() {
        "index.html"
    } else {
        relative
    };

    let relative = Path::new(relative);
    if !relative
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
    {
        return None;
    }

    let full = root.join(relative);
    if full.is_dir() {
        Some(full.join("index.html"))
    } else {
        Some(full)
    }
}

fn content_type(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("html") => "text/html; charset=utf-8",
        Some("js" | "mjs") => "application/javascript",
        Some("wasm") => "application/wasm",
        Some("css") => "text/css",
        Some("json") => "application/json",
        Some("yaml" | "yml") => "application/yaml",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("ico") => "image/x-icon",
        _ => "application/octet-stream",
    }
}
