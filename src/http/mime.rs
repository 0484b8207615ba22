//! Content-Type lookup from file extensions.

use std::path::Path;

/// Content-Type used when a body has no better-known type.
pub const FALLBACK: &str = "application/octet-stream";

/// Returns the Content-Type for `path` based on its extension, if known.
///
/// # Examples
/// ```
/// use docserver::http::mime::content_type_for;
/// use std::path::Path;
/// assert_eq!(content_type_for(Path::new("doc/index.html")), Some("text/html"));
/// assert_eq!(content_type_for(Path::new("doc/data.bin")), None);
/// ```
pub fn content_type_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let ct = match ext.as_str() {
        // Text
        "html" | "htm" => "text/html",
        "css" => "text/css",
        "txt" | "md" => "text/plain",
        "csv" => "text/csv",
        "xml" => "application/xml",

        // Scripts and data
        "js" | "mjs" => "application/javascript",
        "json" => "application/json",

        // Images
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "webp" => "image/webp",

        // Audio and video
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "mp4" => "video/mp4",
        "webm" => "video/webm",

        // Documents
        "pdf" => "application/pdf",
        "zip" => "application/zip",

        _ => return None,
    };
    Some(ct)
}
