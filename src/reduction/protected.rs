//! Elements that are never proposed for removal.

use std::collections::BTreeSet;

use crate::config::ProtectConfig;
use crate::invocation::{CarrierKind, CookieCarrier};

/// Header names (case-insensitive), cookie names and query keys to keep unconditionally.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProtectedElements {
    headers: BTreeSet<String>,
    cookies: BTreeSet<String>,
    params: BTreeSet<String>,
}

impl ProtectedElements {
    pub fn from_config(config: &ProtectConfig) -> Self {
        Self {
            headers: config.headers.iter().map(|h| h.trim().to_ascii_lowercase()).collect(),
            cookies: config.cookies.iter().cloned().collect(),
            params: config.params.iter().cloned().collect(),
        }
    }

    pub fn with_header(mut self, name: &str) -> Self {
        self.headers.insert(name.trim().to_ascii_lowercase());
        self
    }

    pub fn with_cookie(mut self, name: &str) -> Self {
        self.cookies.insert(name.to_string());
        self
    }

    pub fn with_param(mut self, key: &str) -> Self {
        self.params.insert(key.to_string());
        self
    }

    pub fn header(&self, name: &str) -> bool {
        self.headers.contains(&name.trim().to_ascii_lowercase())
    }

    pub fn cookie(&self, name: &str) -> bool {
        self.cookies.contains(name)
    }

    pub fn param(&self, key: &str) -> bool {
        self.params.contains(key)
    }

    /// A protected `Cookie` header is left untouched, entries included.
    pub fn freezes_carrier(&self, carrier: &CookieCarrier) -> bool {
        carrier.kind == CarrierKind::Header && self.header("cookie")
    }

    /// Whole-carrier removal would drop a protected cookie.
    pub fn pins_carrier(&self, carrier: &CookieCarrier) -> bool {
        self.freezes_carrier(carrier) || carrier.names().iter().any(|n| self.cookie(n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config() {
        let protected = ProtectedElements::from_config(&ProtectConfig::default());
        assert!(protected.param("auth_key"));
        assert!(!protected.param("AUTH_KEY"));
        assert!(!protected.header("auth_key"));
    }

    #[test]
    fn test_header_names_ignore_case() {
        let protected = ProtectedElements::default().with_header("Authorization");
        assert!(protected.header("authorization"));
        assert!(protected.header(" AUTHORIZATION "));
    }

    #[test]
    fn test_carrier_pinning() {
        let carrier = CookieCarrier::from_header(1, "Cookie: a=1; session=x").unwrap();
        let flag = CookieCarrier::from_flag(1, "a=1");

        let by_cookie = ProtectedElements::default().with_cookie("session");
        assert!(by_cookie.pins_carrier(&carrier));
        assert!(!by_cookie.freezes_carrier(&carrier));
        assert!(!by_cookie.pins_carrier(&flag));

        let by_header = ProtectedElements::default().with_header("Cookie");
        assert!(by_header.freezes_carrier(&carrier));
        assert!(!by_header.pins_carrier(&flag));
    }
}
