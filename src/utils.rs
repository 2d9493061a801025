use crate::config::Mode;

/// Build the request URL for a target according to the input mode.
///
/// URL-mode targets are passed through as-is; subdomain-mode targets are bare
/// hostnames and get a default scheme prefixed.
pub fn target_url(target: &str, mode: Mode) -> String {
    match mode {
        Mode::Url => target.to_string(),
        Mode::Subdomain => format!("http://{target}"),
    }
}

/// Derive a filesystem-safe screenshot filename from a request URL.
///
/// The scheme separator and path separators are replaced so the result is a
/// single valid path component; uniqueness follows from URL uniqueness.
pub fn screenshot_filename(url: &str) -> String {
    let sanitized: String = url
        .replace("://", "_")
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    format!("{}.png", sanitized.trim())
}
