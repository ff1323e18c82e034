//! Canonical URL identity used for deduplication.

use url::Url;

/// Normalize a link so that equivalent spellings collapse to one identity.
///
/// Scheme and host are lower-cased, `http` is upgraded to `https`, trailing
/// slashes are dropped from the path, and query and fragment are discarded.
/// Never fails: input that is not an absolute URL is cleaned up textually.
/// `normalize_url(&normalize_url(u)) == normalize_url(u)` for every `u`.
pub fn normalize_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    match Url::parse(trimmed) {
        Ok(url) => normalize_parsed(url),
        Err(_) => normalize_text(trimmed),
    }
}

fn normalize_parsed(mut url: Url) -> String {
    if url.scheme() == "http" {
        // http -> https is always permitted between special schemes.
        let _ = url.set_scheme("https");
    }
    url.set_query(None);
    url.set_fragment(None);

    if !url.cannot_be_a_base() {
        let path = url.path().trim_end_matches('/').to_string();
        if path.is_empty() {
            url.set_path("/");
        } else {
            url.set_path(&path);
        }
    }

    url.to_string()
}

fn normalize_text(text: &str) -> String {
    let without_fragment = text.split('#').next().unwrap_or_default();
    let without_query = without_fragment.split('?').next().unwrap_or_default();
    without_query
        .trim_start()
        .trim_end_matches(|c: char| c == '/' || c.is_whitespace())
        .to_string()
}
