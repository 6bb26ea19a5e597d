//! URL handling for the target argument: query decoding and parameter deletion.

use serde::Serialize;
use url::form_urlencoded;
use url::Url;

/// Scheme assumed for URLs written without one, as curl does.
const IMPLICIT_SCHEME_PREFIX: &str = "http://";

/// A decoded query-string pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryParameter {
    pub key: String,
    pub value: String,
}

/// The URL argument, remembering whether its scheme was implied.
#[derive(Debug, Clone)]
pub(crate) struct TargetUrl {
    url: Url,
    implicit_scheme: bool,
}

impl TargetUrl {
    /// Parse a token the way curl would interpret it as a URL.
    pub(crate) fn parse(token: &str) -> Option<Self> {
        if token.is_empty() || token.chars().any(char::is_whitespace) {
            return None;
        }
        if token.contains("://") {
            return Url::parse(token).ok().map(|url| Self {
                url,
                implicit_scheme: false,
            });
        }
        Url::parse(&format!("{IMPLICIT_SCHEME_PREFIX}{token}"))
            .ok()
            .map(|url| Self {
                url,
                implicit_scheme: true,
            })
    }

    /// Decoded pairs in URL order, first value per key.
    pub(crate) fn parameters(&self) -> Vec<QueryParameter> {
        let mut params: Vec<QueryParameter> = Vec::new();
        for (key, value) in self.url.query_pairs() {
            if params.iter().any(|p| p.key == key) {
                continue;
            }
            params.push(QueryParameter {
                key: key.into_owned(),
                value: value.into_owned(),
            });
        }
        params
    }

    /// Delete every occurrence of `key`, keeping the other segments byte-for-byte and in
    /// their original order. Returns whether the query changed.
    pub(crate) fn remove_parameter(&mut self, key: &str) -> bool {
        let Some(query) = self.url.query() else {
            return false;
        };
        let segments: Vec<&str> = query.split('&').collect();
        let kept: Vec<&str> = segments
            .iter()
            .copied()
            .filter(|segment| segment_key(segment).as_deref() != Some(key))
            .collect();
        if kept.len() == segments.len() {
            return false;
        }
        let rebuilt = kept.join("&");
        if rebuilt.is_empty() {
            self.url.set_query(None);
        } else {
            self.url.set_query(Some(&rebuilt));
        }
        true
    }

    /// Text to put back into the argument.
    pub(crate) fn render(&self) -> String {
        let full = self.url.as_str();
        if self.implicit_scheme {
            full.strip_prefix(IMPLICIT_SCHEME_PREFIX)
                .unwrap_or(full)
                .to_string()
        } else {
            full.to_string()
        }
    }
}

fn segment_key(segment: &str) -> Option<String> {
    if segment.is_empty() {
        return None;
    }
    form_urlencoded::parse(segment.as_bytes())
        .next()
        .map(|(key, _)| key.into_owned())
}
