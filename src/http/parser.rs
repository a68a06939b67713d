use crate::http::request::{Method, Request};
use crate::http::response::StatusCode;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Request line is not `METHOD SP PATH SP VERSION`
    #[error("malformed request line")]
    MalformedRequestLine,
    #[error("malformed header line")]
    MalformedHeader,
    #[error("invalid Content-Length value")]
    InvalidContentLength,
    #[error("request head exceeds {limit} bytes")]
    HeadTooLarge { limit: usize },
    #[error("declared body of {declared} bytes exceeds {limit} bytes")]
    BodyTooLarge { declared: usize, limit: usize },
    /// More bytes are needed. At end of stream this means the peer sent a
    /// truncated request.
    #[error("incomplete request")]
    Incomplete,
}

impl ParseError {
    /// Status of the fallback response for this error, if one should be sent.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ParseError::MalformedRequestLine
            | ParseError::MalformedHeader
            | ParseError::InvalidContentLength => Some(StatusCode::BadRequest),
            ParseError::HeadTooLarge { .. } => Some(StatusCode::RequestHeaderFieldsTooLarge),
            ParseError::BodyTooLarge { .. } => Some(StatusCode::PayloadTooLarge),
            ParseError::Incomplete => None,
        }
    }
}

/// Size bounds applied while framing a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub max_head_bytes: usize,
    pub max_body_bytes: usize,
}

impl Limits {
    pub const UNBOUNDED: Limits = Limits {
        max_head_bytes: usize::MAX,
        max_body_bytes: usize::MAX,
    };
}

/// Parses one request from the front of `buf` without size limits.
///
/// Returns the request and the number of bytes it occupied. Anything after
/// the declared body is left untouched.
pub fn parse_http_request(buf: &[u8]) -> Result<(Request, usize), ParseError> {
    parse_with_limits(buf, &Limits::UNBOUNDED)
}

pub fn parse_with_limits(buf: &[u8], limits: &Limits) -> Result<(Request, usize), ParseError> {
    // Look for header/body separator
    let headers_end = match find_headers_end(buf) {
        Some(end) => end,
        // Up to 3 bytes of a split terminator may already be buffered
        None if buf.len() > limits.max_head_bytes.saturating_add(3) => {
            return Err(ParseError::HeadTooLarge {
                limit: limits.max_head_bytes,
            });
        }
        None => return Err(ParseError::Incomplete),
    };

    if headers_end > limits.max_head_bytes {
        return Err(ParseError::HeadTooLarge {
            limit: limits.max_head_bytes,
        });
    }

    let header_bytes = &buf[..headers_end];
    let body_bytes = &buf[headers_end + 4..];

    let headers_str =
        std::str::from_utf8(header_bytes).map_err(|_| ParseError::MalformedRequestLine)?;

    let mut lines = headers_str.split("\r\n");

    // Request line
    let request_line = lines.next().ok_or(ParseError::MalformedRequestLine)?;
    let (method, path, version) = parse_request_line(request_line)?;

    // Headers
    let mut headers = HashMap::new();

    for line in lines {
        let (key, value) = line.split_once(':').ok_or(ParseError::MalformedHeader)?;

        let key = key.trim();
        if key.is_empty() {
            return Err(ParseError::MalformedHeader);
        }

        // Later duplicates overwrite earlier ones
        headers.insert(key.to_ascii_lowercase(), value.trim().to_string());
    }

    // Body
    let content_length = headers
        .get("content-length")
        .map(|v| {
            v.parse::<usize>()
                .map_err(|_| ParseError::InvalidContentLength)
        })
        .transpose()?
        .unwrap_or(0);

    if content_length > limits.max_body_bytes {
        return Err(ParseError::BodyTooLarge {
            declared: content_length,
            limit: limits.max_body_bytes,
        });
    }

    if body_bytes.len() < content_length {
        return Err(ParseError::Incomplete);
    }

    let body = body_bytes[..content_length].to_vec();

    let request = Request {
        method,
        path: path.to_string(),
        version: version.to_string(),
        headers,
        body,
    };

    let total_consumed = headers_end + 4 + content_length;
    Ok((request, total_consumed))
}

/// Splits the request line on single spaces into exactly three tokens.
/// Extra tokens are rejected rather than ignored.
fn parse_request_line(line: &str) -> Result<(Method, &str, &str), ParseError> {
    if line.len() < 3 {
        return Err(ParseError::MalformedRequestLine);
    }

    let mut parts = line.split(' ');
    let (Some(method), Some(path), Some(version), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(ParseError::MalformedRequestLine);
    };

    if method.is_empty() || path.is_empty() || version.is_empty() {
        return Err(ParseError::MalformedRequestLine);
    }

    Ok((Method::parse(method), path, version))
}

fn find_headers_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}
