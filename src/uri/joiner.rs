//! Joining relative link targets onto a resource's base URL

use crate::error::UriError;
use url::Url;

/// Combines a base URL with a candidate URI found in a link.
pub trait UriJoiner: Send + Sync {
    /// Join `candidate` onto `base_url`, returning an absolute URL.
    /// Absolute candidates are returned unchanged.
    fn join(&self, base_url: &str, candidate: &str) -> Result<String, UriError>;
}

/// Segment-stack joiner.
///
/// The base path is treated as a stack of segments: `..` pops, `.` and empty
/// segments are skipped, and everything else is pushed. A candidate starting
/// with `/` (or `\`) clears the stack first. Unlike RFC 3986 resolution the
/// last base segment is kept, so `join("http://h/a/b", "c")` gives
/// `http://h/a/b/c`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathJoiner;

impl UriJoiner for PathJoiner {
    fn join(&self, base_url: &str, candidate: &str) -> Result<String, UriError> {
        if candidate.contains("://") {
            return Ok(candidate.to_string());
        }

        let mut url = Url::parse(base_url).map_err(|source| UriError::InvalidBase {
            url: base_url.to_string(),
            source,
        })?;

        let (path, query, fragment) = split_reference(candidate);
        let reset = path.starts_with(is_separator);

        let mut segments: Vec<String> = if reset {
            Vec::new()
        } else {
            url.path_segments()
                .map(|parts| {
                    parts
                        .filter(|s| !s.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default()
        };

        for part in path.split(is_separator) {
            match part {
                ".." => {
                    // Popping above the root is a no-op
                    segments.pop();
                }
                "" | "." => {}
                other => segments.push(other.to_string()),
            }
        }

        let mut joined = format!("/{}", segments.join("/"));
        if !segments.is_empty() && path.ends_with(is_separator) {
            joined.push('/');
        }
        url.set_path(&joined);

        // An empty reference keeps the base query, like a same-document link
        if !(path.is_empty() && query.is_none()) {
            url.set_query(query);
        }
        url.set_fragment(fragment);

        tracing::trace!("joined {} + {} -> {}", base_url, candidate, url);
        Ok(url.to_string())
    }
}

fn is_separator(c: char) -> bool {
    c == '/' || c == '\\'
}

/// Split a relative reference into path, query and fragment.
fn split_reference(candidate: &str) -> (&str, Option<&str>, Option<&str>) {
    let (rest, fragment) = match candidate.split_once('#') {
        Some((rest, fragment)) => (rest, Some(fragment)),
        None => (candidate, None),
    };

    match rest.split_once('?') {
        Some((path, query)) => (path, Some(query), fragment),
        None => (rest, None, fragment),
    }
}
