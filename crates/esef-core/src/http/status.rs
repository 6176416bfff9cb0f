//! Status-line parsing for header callbacks.

/// Returns the status code if `line` is an HTTP status line (`HTTP/1.1 404 Not Found`, `HTTP/2 200`).
///
/// Redirects produce several status lines per transfer; the caller keeps the last one.
pub fn parse_status_line(line: &[u8]) -> Option<u32> {
    let line = std::str::from_utf8(line).ok()?.trim_end();
    if !line.starts_with("HTTP/") {
        return None;
    }
    let code = line.split_whitespace().nth(1)?;
    if code.len() != 3 {
        return None;
    }
    code.parse().ok()
}

pub fn is_success(code: u32) -> bool {
    (200..300).contains(&code)
}
