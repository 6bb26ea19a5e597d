//! The mutable invocation and its element queries and edits.

use std::fmt;

use crate::invocation::argument::Argument;
use crate::invocation::cookie::CookieCarrier;
use crate::invocation::error::{ClassificationError, EncodingError, ParseError, QueryEditError};
use crate::invocation::flags::{self, Role};
use crate::invocation::parser;
use crate::invocation::query::{QueryParameter, TargetUrl};

/// A parsed curl invocation: index 0 is the program, the rest are its words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    args: Vec<Argument>,
}

/// A `-H`/`--header` argument pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderElement {
    /// Index of the flag token; the value sits at `index + 1`.
    pub index: usize,
    pub name: String,
    pub value: String,
}

impl HeaderElement {
    fn from_raw(index: usize, raw: &str) -> Self {
        let (name, value) = match raw.split_once(':') {
            Some((name, value)) => (name.trim(), value.trim()),
            None => (raw.trim().trim_end_matches(';'), ""),
        };
        Self {
            index,
            name: name.to_string(),
            value: value.to_string(),
        }
    }

    /// Header named `cookie`, in any case.
    pub fn is_cookie_carrier(&self) -> bool {
        self.name.eq_ignore_ascii_case("cookie")
    }
}

impl Invocation {
    /// Parse invocation text.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        Ok(Self {
            args: parser::parse_arguments(text)?,
        })
    }

    pub fn args(&self) -> &[Argument] {
        &self.args
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    fn value_after(&self, index: usize) -> Option<&str> {
        self.args.get(index + 1).map(Argument::value)
    }

    /// Flag indices of header arguments that have a value token.
    pub fn header_arguments(&self) -> Vec<usize> {
        flags::classify(&self.args)
            .into_iter()
            .enumerate()
            .filter(|(i, role)| {
                *role == Role::Flag { takes_value: true } && flags::is_header_flag(&self.args[*i])
            })
            .map(|(i, _)| i)
            .collect()
    }

    /// Header arguments decoded into name and value.
    pub fn headers(&self) -> Vec<HeaderElement> {
        self.header_arguments()
            .into_iter()
            .filter_map(|i| self.value_after(i).map(|raw| HeaderElement::from_raw(i, raw)))
            .collect()
    }

    /// Flag indices of every cookie carrier: `Cookie:` headers and `-b`/`--cookie`.
    pub fn cookie_arguments(&self) -> Vec<usize> {
        self.cookie_carriers().into_iter().map(|c| c.index).collect()
    }

    /// Every cookie carrier, in argument order.
    pub fn cookie_carriers(&self) -> Vec<CookieCarrier> {
        flags::classify(&self.args)
            .into_iter()
            .enumerate()
            .filter(|(_, role)| *role == Role::Flag { takes_value: true })
            .filter_map(|(i, _)| self.carrier_at(i))
            .collect()
    }

    /// The carrier whose flag sits at `index`, if any.
    pub fn carrier_at(&self, index: usize) -> Option<CookieCarrier> {
        let flag = self.args.get(index)?;
        let value = self.value_after(index)?;
        if flags::is_header_flag(flag) {
            CookieCarrier::from_header(index, value)
        } else if flags::is_cookie_flag(flag) {
            Some(CookieCarrier::from_flag(index, value))
        } else {
            None
        }
    }

    /// Index of the URL argument.
    pub fn url_argument(&self) -> Result<usize, ClassificationError> {
        let roles = flags::classify(&self.args);
        let candidates: Vec<usize> = roles
            .iter()
            .enumerate()
            .filter_map(|(i, role)| match role {
                Role::Positional => Some(i),
                Role::FlagValue if self.args[i - 1] == *flags::URL_FLAG => Some(i),
                _ => None,
            })
            .collect();
        // Explicit schemes win over words that merely parse once `http://` is prepended.
        let explicit = candidates.iter().filter(|&&i| self.args[i].value().contains("://"));
        let implicit = candidates.iter().filter(|&&i| !self.args[i].value().contains("://"));
        for &i in explicit.chain(implicit) {
            if TargetUrl::parse(self.args[i].value()).is_some() {
                return Ok(i);
            }
        }

        let last = self.args.len().saturating_sub(1);
        if last > 0 && !self.args[last].is_flag() && TargetUrl::parse(self.args[last].value()).is_some() {
            return Ok(last);
        }
        Err(ClassificationError::NoUrl)
    }

    fn target(&self) -> Result<(usize, TargetUrl), ClassificationError> {
        let index = self.url_argument()?;
        let target = TargetUrl::parse(self.args[index].value()).ok_or(ClassificationError::NoUrl)?;
        Ok((index, target))
    }

    /// Decoded query parameters of the URL, in URL order; empty without a query string.
    pub fn query_parameters(&self) -> Result<Vec<QueryParameter>, ClassificationError> {
        Ok(self.target()?.1.parameters())
    }

    /// Remove the token at `index`, together with its value when it is a flag expecting one
    /// and the next token is not itself a flag. Out-of-range indices and the program are ignored.
    pub fn remove_argument(&mut self, index: usize) {
        if index == 0 || index >= self.args.len() {
            return;
        }
        let flag = &self.args[index];
        let pair = flag.is_flag()
            && flags::takes_value(flag.value())
            && self.args.get(index + 1).is_some_and(|next| !next.is_flag());
        if pair {
            self.args.drain(index..index + 2);
        } else {
            self.args.remove(index);
        }
    }

    /// Delete every occurrence of `key` from the URL query and rewrite the URL argument.
    pub fn remove_query_parameter(&mut self, key: &str) -> Result<(), QueryEditError> {
        let (index, mut target) = self.target()?;
        if target.remove_parameter(key) {
            self.args[index] = Argument::new(target.render())?;
        }
        Ok(())
    }

    /// Remove the cookie entries called `name` from the carrier at `index`. An emptied
    /// carrier is removed entirely. Returns whether anything changed.
    pub fn remove_cookie_entry(&mut self, index: usize, name: &str) -> Result<bool, EncodingError> {
        let Some(mut carrier) = self.carrier_at(index) else {
            return Ok(false);
        };
        if !carrier.remove(name) {
            return Ok(false);
        }
        if carrier.is_empty() {
            self.remove_argument(index);
        } else {
            self.args[index + 1] = Argument::new(carrier.render_value())?;
        }
        Ok(true)
    }

    /// Canonical single-line text.
    pub fn to_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{arg}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "curl -H 'Authorization: Bearer xyz' -H 'Cookie: a=1; b=2; c=3' \
        --compressed -b 'session=abc' 'http://localhost:8080/api?auth_key=k&utm=x&t=1'";

    fn sample() -> Invocation {
        Invocation::parse(SAMPLE).unwrap()
    }

    #[test]
    fn test_find_headers_and_cookies() {
        let inv = sample();
        assert_eq!(inv.header_arguments(), vec![1, 3]);
        assert_eq!(inv.cookie_arguments(), vec![3, 6]);

        let headers = inv.headers();
        assert_eq!(headers[0].name, "Authorization");
        assert_eq!(headers[0].value, "Bearer xyz");
        assert!(!headers[0].is_cookie_carrier());
        assert!(headers[1].is_cookie_carrier());
    }

    #[test]
    fn test_find_url_and_params() {
        let inv = sample();
        assert_eq!(inv.url_argument(), Ok(8));
        let keys: Vec<_> = inv.query_parameters().unwrap().into_iter().map(|p| p.key).collect();
        assert_eq!(keys, vec!["auth_key", "utm", "t"]);
    }

    #[test]
    fn test_url_is_never_a_flag_value() {
        let inv = Invocation::parse("curl -e http://referer.example http://target.example/").unwrap();
        assert_eq!(inv.url_argument(), Ok(3));
    }

    #[test]
    fn test_url_flag_value() {
        let inv = Invocation::parse("curl -s --url 'http://x/?a=1'").unwrap();
        assert_eq!(inv.url_argument(), Ok(3));
    }

    #[test]
    fn test_url_found_after_value_options() {
        for text in [
            "curl --trace-ascii log.txt 'http://x/?a=1&b=2'",
            "curl --socks5-hostname 127.0.0.1:9050 'http://x/?a=1&b=2'",
            "curl --expect100-timeout 1 'http://x/?a=1&b=2'",
        ] {
            let inv = Invocation::parse(text).unwrap();
            assert_eq!(inv.url_argument(), Ok(3), "{text}");
            assert_eq!(inv.query_parameters().unwrap().len(), 2);
        }
    }

    #[test]
    fn test_explicit_scheme_preferred_over_bare_word() {
        let inv = Invocation::parse("curl --unknown-option value 'https://x/?a=1'").unwrap();
        assert_eq!(inv.url_argument(), Ok(3));

        let inv = Invocation::parse("curl example.com/?a=1").unwrap();
        assert_eq!(inv.url_argument(), Ok(1));
    }

    #[test]
    fn test_no_url() {
        let inv = Invocation::parse("curl -H 'A: b'").unwrap();
        assert_eq!(inv.url_argument(), Err(ClassificationError::NoUrl));
        assert!(inv.query_parameters().is_err());
        assert!(inv.clone().remove_query_parameter("a").is_err());
    }

    #[test]
    fn test_url_without_query() {
        let inv = Invocation::parse("curl http://x/").unwrap();
        assert!(inv.query_parameters().unwrap().is_empty());
    }

    #[test]
    fn test_remove_argument_is_atomic() {
        let mut inv = sample();
        inv.remove_argument(1);
        assert_eq!(inv.args()[1].value(), "-H");
        assert_eq!(inv.args()[2].value(), "Cookie: a=1; b=2; c=3");

        let mut inv = Invocation::parse("curl --compressed http://x").unwrap();
        inv.remove_argument(1);
        assert_eq!(inv.to_text(), "curl http://x");

        let mut inv = Invocation::parse("curl -H -v http://x").unwrap();
        inv.remove_argument(1);
        assert_eq!(inv.args()[1].value(), "-v");

        let mut inv = Invocation::parse("curl http://x").unwrap();
        inv.remove_argument(0);
        inv.remove_argument(9);
        assert_eq!(inv.len(), 2);
    }

    #[test]
    fn test_remove_query_parameter() {
        let mut inv = sample();
        inv.remove_query_parameter("utm").unwrap();
        assert_eq!(inv.args()[8].value(), "http://localhost:8080/api?auth_key=k&t=1");
    }

    #[test]
    fn test_remove_cookie_entry_from_header() {
        let mut inv = sample();
        assert!(inv.remove_cookie_entry(3, "a").unwrap());
        assert_eq!(inv.args()[4].value(), "Cookie: b=2; c=3");
        assert!(!inv.remove_cookie_entry(3, "missing").unwrap());
        assert!(!inv.remove_cookie_entry(1, "a").unwrap());
    }

    #[test]
    fn test_emptied_carrier_collapses() {
        let mut inv = sample();
        assert!(inv.remove_cookie_entry(6, "session").unwrap());
        assert!(inv.args().iter().all(|a| a.value() != "-b"));
        assert_eq!(inv.cookie_arguments(), vec![3]);
    }

    #[test]
    fn test_round_trip() {
        let inv = sample();
        let again = Invocation::parse(&inv.to_text()).unwrap();
        assert_eq!(inv, again);
        assert_eq!(inv.headers(), again.headers());
        assert_eq!(inv.cookie_carriers(), again.cookie_carriers());
        assert_eq!(inv.query_parameters(), again.query_parameters());
    }
}
