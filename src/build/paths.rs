//! Path and URL conversion utilities.
//!
//! This module handles conversions between:
//! - Source file paths (relative paths within the content directory)
//! - URL paths (the URL at which a page will be served)
//! - Output file paths (where pages are written in the output directory)

use std::path::{Path, PathBuf};

/// Convert a content file path to a URL path.
///
/// # Examples
/// ```ignore
/// source_path_to_url("installation.md") => "/installation"
/// source_path_to_url("getting-started/quickstart.mdx") => "/getting-started/quickstart"
/// source_path_to_url("guides/index.md") => "/guides"
/// source_path_to_url("index.md") => "/"
/// ```
pub fn source_path_to_url(path: &Path) -> String {
    let mut url = String::from("/");

    // Remove the extension and convert path separators
    let path_str = path.with_extension("").to_string_lossy().to_string();
    let path_str = path_str.replace('\\', "/");

    // Handle index files - they become the directory URL
    let path_str = if path_str == "index" {
        ""
    } else {
        path_str.strip_suffix("/index").unwrap_or(&path_str)
    };

    url.push_str(path_str);

    // Normalize: remove trailing slash unless it's the root
    if url.len() > 1 && url.ends_with('/') {
        url.pop();
    }

    url
}

/// Convert a page URL path to its output file path.
///
/// Every page becomes `path/index.html`.
///
/// # Examples
/// ```ignore
/// url_to_output_path("/guides/installation", output_dir) => output_dir/guides/installation/index.html
/// url_to_output_path("/", output_dir) => output_dir/index.html
/// ```
pub fn url_to_output_path(url_path: &str, output_dir: &Path) -> PathBuf {
    let url_path = url_path.trim_start_matches('/');

    if url_path.is_empty() {
        output_dir.join("index.html")
    } else {
        output_dir.join(url_path).join("index.html")
    }
}
