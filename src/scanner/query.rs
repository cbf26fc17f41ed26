use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::collections::HashSet;
use url::Url;

/// Form encoding: everything but `A-Za-z0-9_.-~` is escaped, space becomes `+`.
const FORM_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'_')
    .remove(b'.')
    .remove(b'-')
    .remove(b'~');

/// Query parameter names that carry a non-empty value, first occurrence only,
/// in order of appearance. Blank values are not an injectable surface.
pub fn injectable_params(url: &Url) -> Vec<String> {
    let mut seen = HashSet::new();
    url.query_pairs()
        .filter(|(_, value)| !value.is_empty())
        .filter_map(|(key, _)| {
            let key = key.into_owned();
            seen.insert(key.clone()).then_some(key)
        })
        .collect()
}

/// Build the URL with every parameter in `params` set to `payload`.
/// Parameters not in `params` are dropped; path and fragment are kept.
pub fn inject(url: &Url, params: &[String], payload: &str) -> Url {
    let query = params
        .iter()
        .map(|key| format!("{}={}", form_encode(key), form_encode(payload)))
        .collect::<Vec<_>>()
        .join("&");

    let mut injected = url.clone();
    injected.set_query(Some(&query));
    injected
}

/// The `https` equivalent of a plain-HTTP URL.
pub fn https_fallback(url: &Url) -> Option<Url> {
    if url.scheme() != "http" {
        return None;
    }
    let mut secure = url.clone();
    secure.set_scheme("https").ok()?;
    Some(secure)
}

fn form_encode(s: &str) -> String {
    utf8_percent_encode(s, FORM_VALUE).to_string().replace("%20", "+")
}
