//! Query-string extraction with a tolerant regex fallback.

use regex::Regex;
use url::Url;

/// Lookup over the page's query parameters.
///
/// Parsing never fails: when constructing the native URL parser is not
/// possible, `get` answers from a regex scan of the raw string instead.
/// A missing parameter is an absence, not an error.
pub struct QueryParams {
    inner: Inner,
}

enum Inner {
    Native(Url),
    Fallback(String),
}

impl QueryParams {
    /// Parse a raw query string carrying no leading separator.
    pub fn parse(raw: &str) -> Self {
        let inner = match Url::parse(&format!("https://q/?{raw}")) {
            Ok(url) => Inner::Native(url),
            Err(_) => Inner::Fallback(raw.to_string()),
        };
        Self { inner }
    }

    /// First value recorded for `name`, or `None`.
    pub fn get(&self, name: &str) -> Option<String> {
        match &self.inner {
            Inner::Native(url) => url
                .query_pairs()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.into_owned()),
            Inner::Fallback(raw) => fallback_get(raw, name),
        }
    }
}

/// Scan for `[?&]name=value` tokens anywhere in the string, case-insensitive
/// on the name. Tolerates parameters separated by either `?` or `&` and
/// never panics on malformed input.
fn fallback_get(raw: &str, name: &str) -> Option<String> {
    let pattern = format!(r"(?i)[?&]{}=([^?&]+)", regex::escape(name));
    let re = Regex::new(&pattern).ok()?;
    // The raw string has no leading separator, so give the first parameter
    // one to match against.
    re.captures(&format!("?{raw}"))
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().to_string())
}
