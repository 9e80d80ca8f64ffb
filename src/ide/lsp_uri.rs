//! Conversion between `file://` URIs and filesystem paths.
//!
//! Only the `file` scheme is understood and no percent-decoding is done: the
//! path is the text after the literal prefix.

use std::path::Path;

use crate::project::normalize_path;

pub const FILE_SCHEME_PREFIX: &str = "file://";

/// Path part of a `file://` URI; empty for any other scheme.
pub fn lsp_uri_to_path(uri: &str) -> &str {
    uri.strip_prefix(FILE_SCHEME_PREFIX).unwrap_or("")
}

/// `file://` URI for `path`, made absolute against the working directory
/// and lexically normalized.
pub fn path_to_lsp_uri(path: impl AsRef<Path>) -> String {
    let path = path.as_ref();
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        match std::env::current_dir() {
            Ok(cwd) => cwd.join(path),
            Err(_) => path.to_path_buf(),
        }
    };
    format!("{}{}", FILE_SCHEME_PREFIX, normalize_path(&absolute).display())
}
