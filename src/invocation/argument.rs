//! A single command-line token.

use std::fmt;

use crate::invocation::error::EncodingError;

/// One word of the invocation.
///
/// The decoded value is what curl sees; `rendered` is the same value quoted for a POSIX
/// shell, computed once at construction so rendering can never fail later.
#[derive(Debug, Clone, Eq)]
pub struct Argument {
    value: String,
    rendered: String,
}

impl Argument {
    /// Build an argument from its decoded value.
    pub fn new(value: impl Into<String>) -> Result<Self, EncodingError> {
        let value = value.into();
        let rendered = shlex::try_quote(&value)
            .map_err(|_| EncodingError::Unquotable(value.clone()))?
            .into_owned();
        Ok(Self { value, rendered })
    }

    /// Decoded (unquoted) text.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Shell-quoted text, quoted only when needed.
    pub fn rendered(&self) -> &str {
        &self.rendered
    }

    /// True for option words such as `-H` or `--header`. A lone `-` is a value (stdin).
    pub fn is_flag(&self) -> bool {
        self.value.len() > 1 && self.value.starts_with('-')
    }
}

impl PartialEq for Argument {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl PartialEq<str> for Argument {
    fn eq(&self, other: &str) -> bool {
        self.value == other
    }
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.rendered)
    }
}
