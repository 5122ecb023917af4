//! URL helpers for the dispatcher.

use crate::handlers::Params;

/// Split at the first `?` into path and query.
pub fn split_url(url: &str) -> (&str, &str) {
    url.split_once('?').unwrap_or((url, ""))
}

/// Parse `a=1&b=2` into a flat map.
///
/// `+` decodes to a space, pairs without `=` are skipped, and the first
/// occurrence of a key wins. Undecodable values are kept verbatim.
pub fn parse_params(query: &str) -> Params {
    let mut params = Params::new();
    for pair in query.split('&') {
        let Some((key, value)) = pair.split_once('=') else {
            continue;
        };
        let key = decode(key);
        if key.is_empty() || params.contains_key(&key) {
            continue;
        }
        params.insert(key, decode(value));
    }
    params
}

fn decode(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => spaced,
    }
}
