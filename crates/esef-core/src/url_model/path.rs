//! Directory/name splitting on `/`-separated URL paths.

/// Splits `path` at its last `/` into the containing directory and the final name.
///
/// The directory keeps its leading `/` but loses trailing slashes, unless it
/// consists only of slashes. A path without `/` has an empty directory.
///
/// - `"/US/1234/report.zip"` → `("/US/1234", "report.zip")`
/// - `"/report.zip"` → `("/", "report.zip")`
/// - `"report.zip"` → `("", "report.zip")`
pub fn split_dir_and_name(path: &str) -> (&str, &str) {
    match path.rfind('/') {
        Some(i) => {
            let head = &path[..=i];
            let name = &path[i + 1..];
            let trimmed = head.trim_end_matches('/');
            let dir = if trimmed.is_empty() { head } else { trimmed };
            (dir, name)
        }
        None => ("", path),
    }
}

/// The text after the last `/` (the whole input if there is none).
pub fn last_segment(path: &str) -> &str {
    split_dir_and_name(path).1
}
