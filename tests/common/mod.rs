//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::Arc;

use curlmin::invocation::Invocation;
use curlmin::oracle::{ExecutionError, Response};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// What a server would see from one request.
#[derive(Debug, Default, Clone)]
pub struct Request {
    pub headers: Vec<(String, String)>,
    pub cookies: Vec<(String, String)>,
    pub params: Vec<(String, String)>,
}

#[allow(dead_code)]
impl Request {
    pub fn header(&self, name: &str) -> Option<&str> {
        lookup(&self.headers, name, true)
    }

    pub fn cookie(&self, name: &str) -> Option<&str> {
        lookup(&self.cookies, name, false)
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        lookup(&self.params, key, false)
    }
}

fn lookup<'a>(pairs: &'a [(String, String)], name: &str, fold_case: bool) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(k, _)| if fold_case { k.eq_ignore_ascii_case(name) } else { k == name })
        .map(|(_, v)| v.as_str())
}

fn split_cookies(raw: &str, into: &mut Vec<(String, String)>) {
    for part in raw.split(';').map(str::trim).filter(|p| !p.is_empty()) {
        let (name, value) = part.split_once('=').unwrap_or((part, ""));
        into.push((name.trim().to_string(), value.trim().to_string()));
    }
}

/// Decode the request an invocation would send, without running curl.
pub fn request_of(command: &str) -> Request {
    let invocation = Invocation::parse(command).expect("candidate must parse");
    let mut request = Request::default();

    for header in invocation.headers() {
        if header.is_cookie_carrier() {
            split_cookies(&header.value, &mut request.cookies);
        } else {
            request.headers.push((header.name, header.value));
        }
    }
    for carrier in invocation.cookie_carriers() {
        if carrier.kind == curlmin::invocation::CarrierKind::Flag {
            for entry in carrier.entries {
                request.cookies.push((entry.name, entry.value.unwrap_or_default()));
            }
        }
    }
    if let Ok(params) = invocation.query_parameters() {
        request.params = params.into_iter().map(|p| (p.key, p.value)).collect();
    }
    request
}

/// An in-process oracle answering from a handler over the decoded request.
#[allow(dead_code)]
pub fn scripted<F>(handler: F) -> impl Fn(&str) -> Result<Response, ExecutionError> + Send + Sync
where
    F: Fn(&Request) -> (u16, String) + Send + Sync,
{
    move |command: &str| {
        let (status, body) = handler(&request_of(command));
        Ok(Response::new(status, body.into_bytes()))
    }
}

/// True when a curl binary is on the PATH.
#[allow(dead_code)]
pub fn curl_available() -> bool {
    std::process::Command::new("curl")
        .arg("--version")
        .output()
        .map(|out| out.status.success())
        .unwrap_or(false)
}

fn parse_request_head(head: &str) -> Request {
    let mut request = Request::default();
    let mut lines = head.split("\r\n");

    let target = lines
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/");
    if let Some((_, query)) = target.split_once('?') {
        request.params = url::form_urlencoded::parse(query.as_bytes()).into_owned().collect();
    }

    for line in lines.filter(|l| !l.is_empty()) {
        let Some((name, value)) = line.split_once(':') else {
            continue;
        };
        let (name, value) = (name.trim(), value.trim());
        if name.eq_ignore_ascii_case("cookie") {
            split_cookies(value, &mut request.cookies);
        } else {
            request.headers.push((name.to_string(), value.to_string()));
        }
    }
    request
}

/// Start a programmable backend on an ephemeral port and return its address.
#[allow(dead_code)]
pub async fn start_programmable_backend<F>(f: F) -> SocketAddr
where
    F: Fn(&Request) -> (u16, String) + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        let mut buf = Vec::new();
                        let mut chunk = [0u8; 1024];
                        while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                            match socket.read(&mut chunk).await {
                                Ok(0) | Err(_) => break,
                                Ok(n) => buf.extend_from_slice(&chunk[..n]),
                            }
                        }

                        let request = parse_request_head(&String::from_utf8_lossy(&buf));
                        let (status, body) = f(&request);
                        let status_text = match status {
                            200 => "200 OK",
                            401 => "401 Unauthorized",
                            403 => "403 Forbidden",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            _ => "200 OK",
                        };

                        let response_str = format!(
                            "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}
