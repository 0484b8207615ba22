use std::io;
use std::path::Path;

use anyhow::Context;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::config::DocumentConfig;
use crate::files::authorizer::Resource;
use crate::files::forms;
use crate::http::mime;
use crate::http::request::{Method, Request};
use crate::http::response::{Response, ResponseBuilder, StatusCode};

/// Runs the handler for `request` against an authorized resource.
///
/// Body-carrying methods expect the body to be attached already. An `Err`
/// is an unexpected filesystem failure and is answered with 500 by the caller.
pub async fn dispatch(
    request: &Request,
    resource: &Resource,
    docs: &DocumentConfig,
) -> anyhow::Result<Response> {
    match resource {
        Resource::Index(index) => match request.method() {
            Method::Get => get(index, docs).await,
            Method::Head => head(index).await,
            // The index is read-only through the root alias.
            _ => Ok(Response::not_implemented()),
        },
        Resource::File(path) => {
            let body = request.body().map(|b| &b[..]).unwrap_or_default();
            match request.method() {
                Method::Get => get(path, docs).await,
                Method::Head => head(path).await,
                Method::Post => post(path, body).await,
                Method::Put => put(path, body).await,
                Method::Delete => delete(path).await,
                Method::Unknown(_) => Ok(Response::not_implemented()),
            }
        }
        Resource::FormAction => forms::handle(request, docs).await,
    }
}

async fn get(path: &Path, docs: &DocumentConfig) -> anyhow::Result<Response> {
    if !is_regular_file(path).await? {
        return Ok(not_found_page(docs).await);
    }

    let content = fs::read(path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;

    Ok(ResponseBuilder::new(StatusCode::Ok)
        .content_type(content_type(path))
        .body(content)
        .build())
}

async fn head(path: &Path) -> anyhow::Result<Response> {
    let meta = match fs::metadata(path).await {
        Ok(meta) if meta.is_file() => meta,
        Ok(_) => return Ok(Response::not_found()),
        Err(e) if is_missing(&e) => return Ok(Response::not_found()),
        Err(e) => return Err(e).with_context(|| format!("inspecting {}", path.display())),
    };

    Ok(ResponseBuilder::new(StatusCode::Ok)
        .content_type(content_type(path))
        .content_length(meta.len())
        .build())
}

/// Creates the file, or appends to it if it already exists.
async fn post(path: &Path, body: &[u8]) -> anyhow::Result<Response> {
    let Some(existed) = existing_file(path).await? else {
        return Ok(Response::forbidden());
    };
    create_parent(path).await?;

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await
        .with_context(|| format!("opening {} for append", path.display()))?;
    file.write_all(body).await?;
    file.flush().await?;

    debug!(path = %path.display(), bytes = body.len(), existed, "Appended body");
    Ok(Response::status(if existed {
        StatusCode::Ok
    } else {
        StatusCode::Created
    }))
}

/// Truncates the file, then writes the full body.
async fn put(path: &Path, body: &[u8]) -> anyhow::Result<Response> {
    let Some(existed) = existing_file(path).await? else {
        return Ok(Response::forbidden());
    };
    create_parent(path).await?;

    let mut file = fs::File::create(path)
        .await
        .with_context(|| format!("truncating {}", path.display()))?;
    file.write_all(body).await?;
    file.flush().await?;

    debug!(path = %path.display(), bytes = body.len(), existed, "Replaced contents");
    Ok(Response::status(if existed {
        StatusCode::NoContent
    } else {
        StatusCode::Created
    }))
}

async fn delete(path: &Path) -> anyhow::Result<Response> {
    match fs::metadata(path).await {
        Ok(meta) if meta.is_file() => {}
        Ok(_) => return Ok(Response::forbidden()),
        Err(e) if is_missing(&e) => return Ok(Response::not_found()),
        Err(e) => return Err(e).with_context(|| format!("inspecting {}", path.display())),
    }

    match fs::remove_file(path).await {
        Ok(()) => Ok(Response::status(StatusCode::NoContent)),
        Err(e) if is_missing(&e) => Ok(Response::not_found()),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Delete refused");
            Ok(Response::forbidden())
        }
    }
}

/// `Some(true)` for an existing regular file, `Some(false)` for a missing
/// one, `None` when something other than a file is in the way.
async fn existing_file(path: &Path) -> anyhow::Result<Option<bool>> {
    match fs::metadata(path).await {
        Ok(meta) if meta.is_file() => Ok(Some(true)),
        Ok(_) => Ok(None),
        Err(e) if is_missing(&e) => Ok(Some(false)),
        Err(e) => Err(e).with_context(|| format!("inspecting {}", path.display())),
    }
}

async fn is_regular_file(path: &Path) -> anyhow::Result<bool> {
    Ok(existing_file(path).await? == Some(true))
}

async fn create_parent(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .await
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    Ok(())
}

async fn not_found_page(docs: &DocumentConfig) -> Response {
    let Some(page) = &docs.error_page else {
        return Response::not_found();
    };

    match fs::read(page).await {
        Ok(content) => ResponseBuilder::new(StatusCode::NotFound)
            .content_type("text/html")
            .body(content)
            .build(),
        Err(e) => {
            debug!(page = %page.display(), error = %e, "Error page unavailable");
            Response::not_found()
        }
    }
}

fn content_type(path: &Path) -> &'static str {
    mime::content_type_for(path).unwrap_or(mime::FALLBACK)
}

fn is_missing(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
    )
}
