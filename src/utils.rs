//! Utility functions for deriving artifact names from source URLs

/// Name used when a URL has neither a path segment nor a host
const FALLBACK_NAME: &str = "artifact";

/// Derive the artifact name from a source URL
///
/// Absolute URLs are parsed and their last non-empty path segment is used.
/// Anything else (e.g. `intel.com/mkl.zip`) is treated as a bare path: query and
/// fragment are dropped and the last `/`-separated segment is taken. When no
/// segment exists the host is used instead. The result never contains `/`, so
/// it is always a plain file name.
///
/// # Examples
///
/// ```
/// use artifact_cache::utils::artifact_name;
///
/// assert_eq!(artifact_name("intel.com/mkl.zip"), "mkl.zip");
/// assert_eq!(artifact_name("https://example.com/dl/tool.tar.gz?sig=abc"), "tool.tar.gz");
/// ```
pub fn artifact_name(source_url: &str) -> String {
    if let Ok(parsed) = url::Url::parse(source_url)
        && !parsed.cannot_be_a_base()
    {
        if let Some(segment) = last_segment(parsed.path()) {
            return segment.to_string();
        }
        return parsed
            .host_str()
            .filter(|h| !h.is_empty())
            .unwrap_or(FALLBACK_NAME)
            .to_string();
    }

    let path = source_url
        .split(['?', '#'])
        .next()
        .unwrap_or(source_url);

    last_segment(path).unwrap_or(FALLBACK_NAME).to_string()
}

/// Suffix of `name` starting at its last dot, e.g. `".zip"`
///
/// Returns an empty string when the name has no dot.
pub fn file_extension(name: &str) -> String {
    name.rfind('.')
        .map(|idx| name[idx..].to_string())
        .unwrap_or_default()
}

fn last_segment(path: &str) -> Option<&str> {
    path.trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
}
