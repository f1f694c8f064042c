// src/core/net.rs

// HTTP/1.0 GET over TCP (std-only). HTTP/1.0 + Connection: close means the
// server ends the response at EOF, so no chunked-transfer handling.

use std::{io::{Read, Write}, net::TcpStream, time::Duration};
use thiserror::Error;

use crate::config::consts::{HOST, PREFIX, NET_TIMEOUT_SECS};

#[derive(Debug, Error)]
pub enum NetError {
    #[error("HTTP {status} for {path}")]
    Http { status: u16, path: String },
    #[error("request failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed HTTP response")]
    Malformed,
}

/// GET `PREFIX + path` from the site and return the body.
///
/// `cookie` carries the ambient session credentials; the no-cache headers
/// make sure any intermediate HTTP cache is bypassed.
pub fn http_get(path: &str, cookie: Option<&str>) -> Result<String, NetError> {
    let mut s = TcpStream::connect((HOST, 80))?;
    s.set_read_timeout(Some(Duration::from_secs(NET_TIMEOUT_SECS)))?;
    s.set_write_timeout(Some(Duration::from_secs(NET_TIMEOUT_SECS)))?;

    let full = format!("{}{}", PREFIX, path);
    let mut req = format!(
        "GET {} HTTP/1.0\r\nHost: {}\r\nUser-Agent: bb_scout/0.1\r\nAccept: text/html\r\n\
         Cache-Control: no-cache\r\nPragma: no-cache\r\nConnection: close\r\n",
        full, HOST
    );
    if let Some(c) = cookie {
        req.push_str(&format!("Cookie: {}\r\n", c));
    }
    req.push_str("\r\n");

    s.write_all(req.as_bytes())?;
    s.flush()?;

    let mut buf = Vec::new();
    s.read_to_end(&mut buf)?;
    let resp = String::from_utf8_lossy(&buf);

    let status_line = resp.split("\r\n").next().unwrap_or("");
    let status: u16 = status_line
        .split_whitespace()
        .nth(1)
        .and_then(|c| c.parse().ok())
        .ok_or(NetError::Malformed)?;
    if !(200..300).contains(&status) {
        return Err(NetError::Http { status, path: full });
    }

    let body_idx = resp.find("\r\n\r\n").ok_or(NetError::Malformed)? + 4;
    Ok(resp[body_idx..].to_string())
}
