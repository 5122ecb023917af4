//! Digest header tokenizer and response hashing.

use md5::{Digest, Md5};
use std::collections::BTreeMap;

/// Scheme token that must open the `Authorization` header.
pub const DIGEST_PREFIX: &str = "Digest ";

/// Nonce advertised in every challenge. It never changes, so responses can be
/// replayed; freshness is not checked.
pub const FIXED_NONCE: &str = "abc";

/// Key/value pairs carried by a digest `Authorization` header.
///
/// Missing keys read as the empty string, which simply fails comparison later.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DigestParams(BTreeMap<String, String>);

impl DigestParams {
    /// Parse a full header value. Returns `None` unless it starts with `Digest `.
    pub fn from_header(header: &str) -> Option<Self> {
        header.strip_prefix(DIGEST_PREFIX).map(Self::parse)
    }

    /// Tokenize `key="value", key=value, ...`.
    ///
    /// A trailing `, ` is appended before scanning so the last pair terminates
    /// like the others. Scanning stops at the first token that is not
    /// `word=...`. Values end at the first comma; surrounding quotes are
    /// optional. Later duplicates overwrite earlier ones.
    pub fn parse(input: &str) -> Self {
        let buffer = format!("{input}, ");
        let mut rest = buffer.as_str();
        let mut params = BTreeMap::new();

        loop {
            let key_len = rest
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                .unwrap_or(rest.len());
            if key_len == 0 {
                break;
            }
            let (key, after_key) = rest.split_at(key_len);
            let Some(after_eq) = after_key.strip_prefix('=') else {
                break;
            };
            let after_eq = after_eq.strip_prefix('"').unwrap_or(after_eq);
            let Some(comma) = after_eq.find(',') else {
                break;
            };

            let raw = &after_eq[..comma];
            let value = raw.strip_suffix('"').unwrap_or(raw);
            params.insert(key.to_string(), value.to_string());

            rest = after_eq[comma + 1..].trim_start();
        }

        Self(params)
    }

    pub fn get(&self, key: &str) -> &str {
        self.0.get(key).map(String::as_str).unwrap_or("")
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Lowercase hex MD5 of `input`.
pub fn md5_hex(input: &str) -> String {
    hex::encode(Md5::digest(input.as_bytes()))
}

/// HA1 for a user: `md5(user:realm:password)`.
pub fn password_digest(user: &str, realm: &str, password: &str) -> String {
    md5_hex(&format!("{user}:{realm}:{password}"))
}

/// Response a client holding `ha1` must send for these parameters.
///
/// The method is always `GET`. The `nc`, `cnonce` and `qop` fields join the
/// hash input only when all three are non-empty.
pub fn expected_response(ha1: &str, params: &DigestParams) -> String {
    let ha2 = md5_hex(&format!("GET:{}", params.get("uri")));

    let mut input = format!("{ha1}:{}", params.get("nonce"));
    let (nc, cnonce, qop) = (params.get("nc"), params.get("cnonce"), params.get("qop"));
    if !nc.is_empty() && !cnonce.is_empty() && !qop.is_empty() {
        input.push_str(&format!(":{nc}:{cnonce}:{qop}"));
    }
    input.push(':');
    input.push_str(&ha2);

    md5_hex(&input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_md5_known_vector() {
        assert_eq!(md5_hex(""), "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(md5_hex("abc"), "900150983cd24fb0d6963f7d28e17f72");
    }

    #[test]
    fn test_parse_quoted_and_bare_values() {
        let params = DigestParams::parse(
            r#"username="admin", realm="console", nonce="abc", uri="/_status", nc=00000001, qop=auth"#,
        );

        assert_eq!(params.get("username"), "admin");
        assert_eq!(params.get("realm"), "console");
        assert_eq!(params.get("uri"), "/_status");
        assert_eq!(params.get("nc"), "00000001");
        assert_eq!(params.get("qop"), "auth");
        assert_eq!(params.len(), 6);
    }

    #[test]
    fn test_parse_keeps_unknown_and_overwrites_duplicates() {
        let params = DigestParams::parse(r#"opaque="x", username="a", username="b""#);

        assert_eq!(params.get("opaque"), "x");
        assert_eq!(params.get("username"), "b");
    }

    #[test]
    fn test_parse_stops_at_garbage() {
        let params = DigestParams::parse(r#"username="a", !!!, nonce="abc""#);

        assert_eq!(params.get("username"), "a");
        assert_eq!(params.get("nonce"), "");
    }

    #[test]
    fn test_parse_tolerates_missing_space_after_comma() {
        let params = DigestParams::parse(r#"username="a",nonce="abc""#);

        assert_eq!(params.get("username"), "a");
        assert_eq!(params.get("nonce"), "abc");
    }

    #[test]
    fn test_parse_empty_input() {
        assert!(DigestParams::parse("").is_empty());
    }

    #[test]
    fn test_from_header_requires_scheme() {
        assert!(DigestParams::from_header(r#"Basic dXNlcjpwYXNz"#).is_none());
        assert!(DigestParams::from_header(r#"digest username="a""#).is_none());

        let params = DigestParams::from_header(r#"Digest username="a""#).unwrap();
        assert_eq!(params.get("username"), "a");
    }

    #[test]
    fn test_expected_response_rfc2617_example() {
        // RFC 2617 section 3.5, with the method and realm it uses.
        let ha1 = password_digest("Mufasa", "testrealm@host.com", "Circle Of Life");
        let params = DigestParams::parse(
            r#"username="Mufasa", nonce="dcd98b7102dd2f0e8b11d0f600bfb0c093", uri="/dir/index.html", qop=auth, nc=00000001, cnonce="0a4f113b""#,
        );

        assert_eq!(
            expected_response(&ha1, &params),
            "6629fae49393a05397450978507c4ef1"
        );
    }

    #[test]
    fn test_expected_response_without_qop_fields() {
        let ha1 = password_digest("admin", "console", "secret");
        let params = DigestParams::parse(r#"nonce="abc", uri="/_status""#);

        let ha2 = md5_hex("GET:/_status");
        let expected = md5_hex(&format!("{ha1}:abc:{ha2}"));
        assert_eq!(expected_response(&ha1, &params), expected);
    }

    #[test]
    fn test_partial_qop_fields_are_ignored() {
        let ha1 = password_digest("admin", "console", "secret");
        let with_nc = DigestParams::parse(r#"nonce="abc", uri="/x", nc=00000001"#);
        let bare = DigestParams::parse(r#"nonce="abc", uri="/x""#);

        assert_eq!(expected_response(&ha1, &with_nc), expected_response(&ha1, &bare));
    }
}
