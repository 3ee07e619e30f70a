//! Revision id extraction from package locators

use once_cell::sync::Lazy;
use regex::Regex;

/// Revision segment value that denotes the latest revision
pub const LATEST_REVISION: &str = "master";

static REVISION_SEGMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/revision/([^/]*)").expect("valid revision pattern"));

/// Extract the revision id encoded in a package locator
///
/// Looks at the last `/revision/<id>` segment of `uri`. Returns `None` when the
/// locator has no such segment, when the segment is empty, or when it names
/// [`LATEST_REVISION`].
pub fn revision_from_uri(uri: &str) -> Option<String> {
    let captured = REVISION_SEGMENT
        .captures_iter(uri)
        .last()
        .and_then(|caps| caps.get(1))?
        .as_str();

    if captured.is_empty() || captured == LATEST_REVISION {
        None
    } else {
        Some(captured.to_string())
    }
}
