//! Curl option tables and token classification.
//!
//! # Responsibilities
//! - Know which curl options consume the following word
//! - Resolve short-option clusters (`-sH`, `-HName: v`) the way curl does
//! - Assign every token of an invocation a [`Role`]

use crate::invocation::argument::Argument;

/// Spellings of the "add header" option.
pub const HEADER_FLAGS: [&str; 2] = ["-H", "--header"];

/// Spellings of the "literal cookie string" option.
pub const COOKIE_FLAGS: [&str; 2] = ["-b", "--cookie"];

/// Option naming the request URL explicitly.
pub const URL_FLAG: &str = "--url";

/// Short options that take an argument.
const SHORT_WITH_VALUE: &str = "AbcCdDeEFHKmoPQrtTuUwxXyYz";

/// Long options that take an argument.
const LONG_WITH_VALUE: &[&str] = &[
    "--abstract-unix-socket",
    "--alt-svc",
    "--aws-sigv4",
    "--cacert",
    "--capath",
    "--cert",
    "--cert-type",
    "--ciphers",
    "--config",
    "--connect-timeout",
    "--connect-to",
    "--continue-at",
    "--cookie",
    "--cookie-jar",
    "--create-file-mode",
    "--crlfile",
    "--curves",
    "--data",
    "--data-ascii",
    "--data-binary",
    "--data-raw",
    "--data-urlencode",
    "--delegation",
    "--dns-interface",
    "--dns-ipv4-addr",
    "--dns-ipv6-addr",
    "--dns-servers",
    "--doh-url",
    "--dump-header",
    "--ech",
    "--egd-file",
    "--engine",
    "--etag-compare",
    "--etag-save",
    "--expect100-timeout",
    "--form",
    "--form-string",
    "--ftp-account",
    "--ftp-alternative-to-user",
    "--ftp-method",
    "--ftp-port",
    "--ftp-ssl-ccc-mode",
    "--happy-eyeballs-timeout-ms",
    "--haproxy-clientip",
    "--header",
    "--hostpubmd5",
    "--hostpubsha256",
    "--hsts",
    "--interface",
    "--ip-tos",
    "--ipfs-gateway",
    "--json",
    "--keepalive-time",
    "--key",
    "--key-type",
    "--krb",
    "--limit-rate",
    "--local-port",
    "--login-options",
    "--mail-auth",
    "--mail-from",
    "--mail-rcpt",
    "--max-filesize",
    "--max-redirs",
    "--max-time",
    "--netrc-file",
    "--noproxy",
    "--oauth2-bearer",
    "--output",
    "--output-dir",
    "--parallel-max",
    "--pass",
    "--pinnedpubkey",
    "--preproxy",
    "--proto",
    "--proto-default",
    "--proto-redir",
    "--proxy",
    "--proxy-cacert",
    "--proxy-capath",
    "--proxy-cert",
    "--proxy-cert-type",
    "--proxy-ciphers",
    "--proxy-crlfile",
    "--proxy-header",
    "--proxy-key",
    "--proxy-key-type",
    "--proxy-pass",
    "--proxy-pinnedpubkey",
    "--proxy-service-name",
    "--proxy-tls13-ciphers",
    "--proxy-tlsauthtype",
    "--proxy-tlspassword",
    "--proxy-tlsuser",
    "--proxy-user",
    "--proxy1.0",
    "--pubkey",
    "--quote",
    "--random-file",
    "--range",
    "--referer",
    "--request",
    "--request-target",
    "--resolve",
    "--retry",
    "--retry-delay",
    "--retry-max-time",
    "--sasl-authzid",
    "--service-name",
    "--socks4",
    "--socks4a",
    "--socks5",
    "--socks5-gssapi-service",
    "--socks5-hostname",
    "--speed-limit",
    "--speed-time",
    "--stderr",
    "--telnet-option",
    "--tftp-blksize",
    "--time-cond",
    "--tls-max",
    "--tls13-ciphers",
    "--tlsauthtype",
    "--tlspassword",
    "--tlsuser",
    "--trace",
    "--trace-ascii",
    "--trace-config",
    "--unix-socket",
    "--upload-file",
    "--url",
    "--url-query",
    "--user",
    "--user-agent",
    "--variable",
    "--vlan-priority",
    "--write-out",
];

/// What a token means inside the invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Index 0, the curl executable.
    Program,
    /// An option word; `takes_value` when the next token is its argument.
    Flag { takes_value: bool },
    /// Argument consumed by the preceding flag.
    FlagValue,
    /// Anything else, typically the URL.
    Positional,
}

/// True when `flag`, standing alone, consumes the following word.
///
/// Short clusters follow curl: letters are read left to right and the first one that takes
/// a value swallows the rest of the word, or the next word if nothing is left.
pub fn takes_value(flag: &str) -> bool {
    if let Some(long) = flag.strip_prefix("--") {
        if long.is_empty() {
            return false;
        }
        return LONG_WITH_VALUE.contains(&flag);
    }
    let Some(cluster) = flag.strip_prefix('-') else {
        return false;
    };
    let mut chars = cluster.chars();
    while let Some(c) = chars.next() {
        if SHORT_WITH_VALUE.contains(c) {
            return chars.as_str().is_empty();
        }
    }
    false
}

/// Whether the token is one of the header option spellings.
pub fn is_header_flag(arg: &Argument) -> bool {
    HEADER_FLAGS.contains(&arg.value())
}

/// Whether the token is one of the cookie option spellings.
pub fn is_cookie_flag(arg: &Argument) -> bool {
    COOKIE_FLAGS.contains(&arg.value())
}

/// Classify every token. `--` ends option parsing.
pub fn classify(args: &[Argument]) -> Vec<Role> {
    let mut roles = Vec::with_capacity(args.len());
    if args.is_empty() {
        return roles;
    }
    roles.push(Role::Program);

    let mut options_done = false;
    let mut i = 1;
    while i < args.len() {
        let arg = &args[i];
        if options_done || !arg.is_flag() {
            roles.push(Role::Positional);
            i += 1;
            continue;
        }
        if arg.value() == "--" {
            options_done = true;
            roles.push(Role::Flag { takes_value: false });
            i += 1;
            continue;
        }
        let has_next = i + 1 < args.len();
        let consumes = takes_value(arg.value()) && has_next;
        roles.push(Role::Flag { takes_value: consumes });
        if consumes {
            roles.push(Role::FlagValue);
            i += 2;
        } else {
            i += 1;
        }
    }
    roles
}
