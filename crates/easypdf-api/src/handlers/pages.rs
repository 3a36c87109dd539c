//! Static pages served from the public directory.

use std::path::{Path as FsPath, PathBuf};
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::header,
    response::{Html, IntoResponse},
};
use easypdf_core::AppError;

use crate::error::HttpAppError;
use crate::state::AppState;

/// Reject anything but a plain file name so requests cannot leave the public directory.
fn public_path(public_dir: &FsPath, name: &str) -> Result<PathBuf, AppError> {
    let valid = !name.is_empty()
        && !name.starts_with('.')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if !valid {
        return Err(AppError::NotFound(name.to_string()));
    }
    Ok(public_dir.join(name))
}

async fn read_public(public_dir: &FsPath, name: &str) -> Result<Vec<u8>, AppError> {
    let path = public_path(public_dir, name)?;
    match tokio::fs::read(&path).await {
        Ok(bytes) => Ok(bytes),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(AppError::NotFound(name.to_string()))
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn index(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, HttpAppError> {
    let html = read_public(state.config.public_dir(), "index.html").await?;
    Ok(Html(html))
}

/// `/{page}` serves `public/{page}.html`. A name with an extension is served as the
/// file itself, so top-level assets like `/style.css` still resolve.
pub async fn page(
    State(state): State<Arc<AppState>>,
    Path(page): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    let public_dir = state.config.public_dir();

    if page.contains('.') {
        let bytes = read_public(public_dir, &page).await?;
        let content_type = mime_guess::from_path(&page).first_or_octet_stream();
        return Ok(([(header::CONTENT_TYPE, content_type.to_string())], bytes).into_response());
    }

    let html = read_public(public_dir, &format!("{}.html", page)).await?;
    Ok(Html(html).into_response())
}

pub async fn robots_txt(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let mut body = String::from("User-agent: *\nAllow: /\n");
    if let Some(site_url) = state.config.site_url() {
        body.push_str(&format!(
            "Sitemap: {}/sitemap.xml\n",
            site_url.trim_end_matches('/')
        ));
    }
    ([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], body)
}

/// Sitemap of `/` and every `public/*.html` page, as absolute URLs under `SITE_URL`.
/// Without a configured origin there is no valid sitemap, so the route is a 404.
pub async fn sitemap_xml(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpAppError> {
    let site_url = state
        .config
        .site_url()
        .ok_or_else(|| AppError::NotFound("sitemap.xml".to_string()))?;
    let pages = list_pages(state.config.public_dir()).await?;
    let xml = render_sitemap(site_url, &pages);
    Ok(([(header::CONTENT_TYPE, "application/xml")], xml))
}

/// Route names of the HTML pages in `public_dir`, sorted; `index.html` is `""`.
async fn list_pages(public_dir: &FsPath) -> Result<Vec<String>, AppError> {
    let mut entries = tokio::fs::read_dir(public_dir).await?;
    let mut pages = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name().to_string_lossy().into_owned();
        let Some(stem) = name.strip_suffix(".html") else {
            continue;
        };
        if stem == "index" {
            pages.push(String::new());
        } else if public_path(public_dir, stem).is_ok() {
            pages.push(stem.to_string());
        }
    }
    pages.sort();
    Ok(pages)
}

fn render_sitemap(site_url: &str, pages: &[String]) -> String {
    let base = escape_xml(site_url.trim_end_matches('/'));
    let mut xml = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );
    for page in pages {
        xml.push_str(&format!("  <url><loc>{}/{}</loc></url>\n", base, page));
    }
    xml.push_str("</urlset>\n");
    xml
}

fn escape_xml(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
