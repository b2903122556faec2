use std::fmt::Display;

/// Builds the canonical cache key for a request.
///
/// Parameter names are sorted before serialization so two logically equal
/// requests produce the same key regardless of argument order. The full
/// `endpoint?name=value&...` serialization is the key; no hashing.
pub fn build_key<K, V>(endpoint: &str, params: &[(K, V)]) -> String
where
    K: AsRef<str>,
    V: Display,
{
    let mut pairs: Vec<(&str, String)> = params
        .iter()
        .map(|(name, value)| (name.as_ref(), value.to_string()))
        .collect();
    pairs.sort_by(|a, b| a.0.cmp(b.0));

    let query = pairs
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect::<Vec<_>>()
        .join("&");

    format!("{endpoint}?{query}")
}
