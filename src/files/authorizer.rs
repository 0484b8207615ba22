//! Decides whether a request target may be served.
//!
//! Containment is checked on resolved paths, component by component, never
//! on the raw target text. A target naming `docs/` is not inside `doc/`, and
//! `doc/../secret` resolves outside the root before it is compared.

use std::io;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tokio::fs;
use tracing::warn;

use crate::config::DocumentConfig;

/// What an authorized target refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource {
    /// The empty target, mapped to the configured index.
    Index(PathBuf),
    /// A path under the document root. It may not exist yet.
    File(PathBuf),
    /// The configured form-post endpoint.
    FormAction,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Authorization {
    Authorized(Resource),
    Forbidden,
}

/// Resolves `target` (root-relative, leading slash already stripped) against
/// the document configuration.
///
/// The root is canonicalized on every call, so a root replaced while the
/// server runs is honored. An error means the root itself could not be
/// resolved.
pub async fn authorize(target: &str, docs: &DocumentConfig) -> anyhow::Result<Authorization> {
    if target.is_empty() {
        return Ok(Authorization::Authorized(Resource::Index(docs.index.clone())));
    }

    if docs.form_action.as_deref() == Some(target) {
        return Ok(Authorization::Authorized(Resource::FormAction));
    }

    let Some(relative) = normalize(target) else {
        warn!(target, "Target escapes its own start");
        return Ok(Authorization::Forbidden);
    };

    let root = fs::canonicalize(&docs.root)
        .await
        .with_context(|| format!("resolving document root {}", docs.root.display()))?;

    // Targets name the root directory itself, as in `doc/a.html`.
    let base = root.parent().unwrap_or(&root);
    let candidate = base.join(relative);

    if !candidate.starts_with(&root) {
        warn!(target, "Target outside document root");
        return Ok(Authorization::Forbidden);
    }

    // Symlinks inside the root may still point out of it.
    let existing = canonical_existing_ancestor(&candidate).await;
    if !existing.is_some_and(|p| p.starts_with(&root)) {
        warn!(target, "Target resolves outside document root");
        return Ok(Authorization::Forbidden);
    }

    Ok(Authorization::Authorized(Resource::File(candidate)))
}

/// Collapses `.` and `..` segments. Returns `None` when `..` climbs above the
/// start of the target or nothing is left.
fn normalize(target: &str) -> Option<PathBuf> {
    let mut segments: Vec<&str> = Vec::new();

    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop()?;
            }
            s if s.contains(['\\', '\0']) => return None,
            s => segments.push(s),
        }
    }

    if segments.is_empty() {
        return None;
    }
    Some(segments.iter().collect())
}

/// Canonicalizes the deepest ancestor of `path` (itself included) that exists.
async fn canonical_existing_ancestor(path: &Path) -> Option<PathBuf> {
    for ancestor in path.ancestors() {
        match fs::canonicalize(ancestor).await {
            Ok(resolved) => return Some(resolved),
            Err(e) if e.kind() == io::ErrorKind::PermissionDenied => return None,
            Err(_) => continue,
        }
    }
    None
}
