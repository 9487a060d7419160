//! Request target normalisation
//!
//! Turns whatever arrives on the request line into a relative path that is
//! guaranteed not to climb above the document root. Symlink checks need the
//! filesystem and live in [`super::server`].

use std::path::{Component, Path, PathBuf};

use super::ServeError;

/// File served for the root path and for directory requests
pub const INDEX_FILE: &str = "index.html";

/// Decode and normalise a request target into a path relative to the document root
///
/// - the query string is dropped and the path percent-decoded
/// - leading slashes are stripped; an empty path or a trailing slash means `index.html`
/// - `.` segments vanish, `..` pops the previous segment
///
/// A `..` with nothing left to pop, an absolute or drive-prefixed segment, a NUL
/// byte, or a path that does not decode to UTF-8 yields [`ServeError::Forbidden`].
pub fn normalize_request_path(target: &str) -> Result<PathBuf, ServeError> {
    let raw = target.split('?').next().unwrap_or_default();
    let decoded = urlencoding::decode(raw).map_err(|_| ServeError::Forbidden)?;

    if decoded.contains('\0') {
        return Err(ServeError::Forbidden);
    }

    let mut relative = decoded.trim_start_matches('/').to_string();
    if relative.is_empty() || relative.ends_with('/') {
        relative.push_str(INDEX_FILE);
    }

    let mut segments: Vec<&str> = Vec::new();
    for segment in relative.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.pop().is_none() {
                    return Err(ServeError::Forbidden);
                }
            }
            other => {
                if !is_plain_segment(other) {
                    return Err(ServeError::Forbidden);
                }
                segments.push(other);
            }
        }
    }

    Ok(segments.iter().collect())
}

// On Windows a segment such as `C:` or `..\x` would otherwise re-introduce a
// prefix or traversal once pushed onto a PathBuf.
fn is_plain_segment(segment: &str) -> bool {
    let mut components = Path::new(segment).components();
    matches!((components.next(), components.next()), (Some(Component::Normal(_)), None))
}
