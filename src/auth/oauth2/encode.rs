use std::collections::HashMap;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Everything except the RFC 3986 unreserved characters is escaped, so spaces
/// become `%20` and URLs passed as values are fully encoded.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, QUERY_VALUE).to_string()
}

/// Serializes parameters in their given order as `k1=v1&k2=v2`.
pub fn build_query(params: &[(String, String)]) -> String {
    params
        .iter()
        .map(|(key, value)| format!("{}={}", encode_component(key), encode_component(value)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Appends `query` to `uri`, respecting a query string the URI may already carry.
pub fn append_query(uri: &str, query: &str) -> String {
    if query.is_empty() {
        return uri.to_string();
    }
    let separator = if uri.contains('?') { '&' } else { '?' };
    format!("{uri}{separator}{query}")
}

/// Decodes an `application/x-www-form-urlencoded` string. Later duplicates win.
pub fn parse_query(input: &str) -> HashMap<String, String> {
    url::form_urlencoded::parse(input.trim().as_bytes())
        .into_owned()
        .collect()
}
