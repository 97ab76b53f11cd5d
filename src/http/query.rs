//! Query string decoding
//!
//! Decodes the raw query string into a name/value map. Values are
//! percent-decoded; a repeated key keeps its last occurrence.

use std::collections::HashMap;

/// Decode a query string into a parameter map.
///
/// A query that cannot be decoded is logged and treated as empty rather
/// than failing the request.
pub fn parse(query: Option<&str>) -> HashMap<String, String> {
    let Some(query) = query else {
        return HashMap::new();
    };

    serde_urlencoded::from_str(query).unwrap_or_else(|_| {
        crate::logger::log_warning(&format!("Malformed query string ignored: {query}"));
        HashMap::new()
    })
}
