// Copyright 2025 MoodSpace Kinetic contributors
// SPDX-License-Identifier: Apache-2.0

//! The HTTP subset the dispatcher speaks

/// Marker that selects the data route anywhere in the request
pub const DATA_ROUTE_MARKER: &[u8] = b"GET /data";

/// Response selected for a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Status JSON
    Data,
    /// Monitor page (the fallback for anything unrecognised)
    Page,
}

impl Route {
    /// Substring match on the raw request bytes
    ///
    /// Empty, truncated or non-UTF-8 requests fall through to the page.
    pub fn classify(request: &[u8]) -> Self {
        if request
            .windows(DATA_ROUTE_MARKER.len())
            .any(|window| window == DATA_ROUTE_MARKER)
        {
            Route::Data
        } else {
            Route::Page
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Route::Data => "application/json",
            Route::Page => "text/html",
        }
    }
}

/// Full `200 OK` response, headers and body, ready to write
pub fn ok_response(content_type: &str, body: &[u8]) -> Vec<u8> {
    let head = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        content_type,
        body.len()
    );
    let mut response = Vec::with_capacity(head.len() + body.len());
    response.extend_from_slice(head.as_bytes());
    response.extend_from_slice(body);
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routing_by_substring() {
        assert_eq!(Route::classify(b"GET /data HTTP/1.1\r\nHost: x\r\n\r\n"), Route::Data);
        assert_eq!(Route::classify(b"GET /data?t=1 HTTP/1.1\r\n\r\n"), Route::Data);
        assert_eq!(Route::classify(b"GET /database HTTP/1.1\r\n\r\n"), Route::Data);
        assert_eq!(Route::classify(b"GET / HTTP/1.1\r\n\r\n"), Route::Page);
        assert_eq!(Route::classify(b"POST /data HTTP/1.1\r\n\r\n"), Route::Page);
        assert_eq!(Route::classify(b""), Route::Page);
        assert_eq!(Route::classify(&[0xff, 0xfe, 0x00]), Route::Page);
    }

    #[test]
    fn test_response_headers() {
        let response = ok_response("application/json", b"{}");
        let text = String::from_utf8(response).unwrap();
        assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(text.contains("Content-Type: application/json\r\n"));
        assert!(text.contains("Content-Length: 2\r\n"));
        assert!(text.contains("Connection: close\r\n"));
        assert!(text.ends_with("\r\n\r\n{}"));
    }
}
