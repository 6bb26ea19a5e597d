//! Cookie carriers: header and flag values that hold cookie entries.
//!
//! Both `-H 'Cookie: a=1; b=2'` and `-b 'a=1; b=2'` are exposed through the same
//! [`CookieCarrier`] so entry-level edits behave identically for either spelling.

use serde::Serialize;

/// Which syntax introduced the carrier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CarrierKind {
    /// `-H 'Cookie: ...'` / `--header 'Cookie: ...'`; holds the header name as written.
    Header,
    /// `-b '...'` / `--cookie '...'`.
    Flag,
}

/// One `name=value` pair. Segments without `=` keep `value` as `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CookieEntry {
    pub name: String,
    pub value: Option<String>,
}

impl CookieEntry {
    fn render(&self) -> String {
        match &self.value {
            Some(value) => format!("{}={}", self.name, value),
            None => self.name.clone(),
        }
    }
}

/// A flag+value argument pair whose value carries cookies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieCarrier {
    /// Index of the flag token.
    pub index: usize,
    pub kind: CarrierKind,
    /// Header name exactly as written (`Cookie`, `cookie`, ...); empty for flag carriers.
    header_name: String,
    pub entries: Vec<CookieEntry>,
}

impl CookieCarrier {
    /// Interpret a header value. Returns `None` unless the header name is `cookie`.
    ///
    /// curl's empty-header form `Cookie;` is a carrier with no entries.
    pub fn from_header(index: usize, header: &str) -> Option<Self> {
        let (name, rest) = match header.split_once(':') {
            Some(split) => split,
            None => (header.trim_end().strip_suffix(';')?, ""),
        };
        if !name.trim().eq_ignore_ascii_case("cookie") {
            return None;
        }
        Some(Self {
            index,
            kind: CarrierKind::Header,
            header_name: name.trim().to_string(),
            entries: split_entries(rest),
        })
    }

    /// Interpret a `-b`/`--cookie` value.
    pub fn from_flag(index: usize, value: &str) -> Self {
        let entries = if is_jar_reference(value) {
            Vec::new()
        } else {
            split_entries(value)
        };
        Self {
            index,
            kind: CarrierKind::Flag,
            header_name: String::new(),
            entries,
        }
    }

    /// Distinct entry names in order of first appearance.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            if !names.contains(&entry.name.as_str()) {
                names.push(&entry.name);
            }
        }
        names
    }

    /// Whether an entry with this name is present.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.name == name)
    }

    /// Drop every entry called `name`. Returns whether anything was removed.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.name != name);
        self.entries.len() != before
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The value token for the current entries.
    pub fn render_value(&self) -> String {
        let joined = self
            .entries
            .iter()
            .map(CookieEntry::render)
            .collect::<Vec<_>>()
            .join("; ");
        match self.kind {
            CarrierKind::Header => format!("{}: {}", self.header_name, joined),
            CarrierKind::Flag => joined,
        }
    }
}

/// A `-b` value without `=` names a cookie file rather than literal cookies.
fn is_jar_reference(value: &str) -> bool {
    !value.contains('=')
}

fn split_entries(raw: &str) -> Vec<CookieEntry> {
    raw.split(';')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(|segment| match segment.split_once('=') {
            Some((name, value)) => CookieEntry {
                name: name.trim().to_string(),
                value: Some(value.trim().to_string()),
            },
            None => CookieEntry {
                name: segment.to_string(),
                value: None,
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_carrier() {
        let carrier = CookieCarrier::from_header(3, "cookie: a=1;  b=2 ;c=3").unwrap();
        assert_eq!(carrier.kind, CarrierKind::Header);
        assert_eq!(carrier.names(), vec!["a", "b", "c"]);
        assert_eq!(carrier.render_value(), "cookie: a=1; b=2; c=3");
        assert!(CookieCarrier::from_header(3, "Accept: a=1").is_none());
        assert!(CookieCarrier::from_header(3, "Cookie-Thing: a=1").is_none());
    }

    #[test]
    fn test_flag_carrier_and_removal() {
        let mut carrier = CookieCarrier::from_flag(1, "a=1; b=x=y; a=2");
        assert_eq!(carrier.names(), vec!["a", "b"]);
        assert!(carrier.remove("a"));
        assert!(!carrier.remove("zzz"));
        assert_eq!(carrier.render_value(), "b=x=y");
        assert!(carrier.remove("b"));
        assert!(carrier.is_empty());
    }

    #[test]
    fn test_cookie_jar_file_has_no_entries() {
        let carrier = CookieCarrier::from_flag(1, "cookies.txt");
        assert!(carrier.is_empty());
    }

    #[test]
    fn test_valueless_segment_is_preserved() {
        let carrier = CookieCarrier::from_header(1, "Cookie: a=1; secure").unwrap();
        assert_eq!(carrier.entries[1].value, None);
        assert_eq!(carrier.render_value(), "Cookie: a=1; secure");
    }

    #[test]
    fn test_empty_header_forms_are_carriers() {
        let blank = CookieCarrier::from_header(1, "Cookie;").unwrap();
        assert!(blank.is_empty());
        assert!(CookieCarrier::from_header(1, "cookie ; ").is_some());
        assert!(CookieCarrier::from_header(1, "Cookie:").unwrap().is_empty());
        assert!(CookieCarrier::from_header(1, "Accept;").is_none());
        assert!(CookieCarrier::from_header(1, "Cookie").is_none());
    }
}
