use crate::domain::response::GatewayResponse;
use url::form_urlencoded;

/// Encodes key/value pairs as an `application/x-www-form-urlencoded` body, in the given order.
pub fn encode<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in pairs {
        serializer.append_pair(key, value);
    }
    serializer.finish()
}

/// Decodes a gateway body into a flat mapping.
///
/// Never fails: anything that is not `key=value` decodes to an empty value or
/// is dropped, and an empty body yields an empty response. Keys keep their
/// spelling; on duplicates the last value wins.
pub fn decode(body: &str) -> GatewayResponse {
    form_urlencoded::parse(body.trim().as_bytes())
        .filter(|(key, _)| !key.is_empty())
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect()
}
