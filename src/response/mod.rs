//! HTTP response writer and status codes.
use crate::request::Headers;

pub mod status;

/// An HTTP response under construction.
///
/// Handlers and decorators share one `Response` per request: decorators may
/// touch headers before delegating and append to the payload afterwards.
///
/// # Example
/// ```
/// # use lighthttp::response::Response;
///
/// let mut response = Response::new(200).with_header("Content-Type", "text/plain");
/// response.write(b"Hello!");
///
/// # assert_eq!(response.content_length(), 6);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status_code: u16,
    pub status: String,
    headers: Headers,
    pub payload: Vec<u8>,
}

impl Response {
    /// Create a new Response. Status is automatically set to the default
    /// status for the given code (200 -> "OK", etc.)
    pub fn new(status_code: u16) -> Self {
        Self {
            status_code,
            status: status::reason(status_code).to_string(),
            headers: Headers::new(),
            payload: vec![],
        }
    }
    pub fn headers(&self) -> &Headers {
        &self.headers
    }
    pub fn headers_mut(&mut self) -> &mut Headers {
        &mut self.headers
    }
    /// Set status code and its default status.
    pub fn write_status(&mut self, status_code: u16) {
        self.status_code = status_code;
        self.status = status::reason(status_code).to_string();
    }
    /// Append to the payload.
    pub fn write(&mut self, data: &[u8]) {
        self.payload.extend_from_slice(data);
    }
    /// Add header.
    pub fn with_header(mut self, header: &str, value: &str) -> Self {
        self.headers.add(header, value);
        self
    }
    /// Sets response payload.
    pub fn with_payload(mut self, payload: Vec<u8>) -> Self {
        self.payload = payload;
        self
    }
    pub fn content_length(&self) -> usize {
        self.payload.len()
    }
    /// Payload as text, for hosts and tests that know it is UTF-8.
    pub fn text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.payload)
    }
    /// Write HTTP response bytes.
    pub fn into_bytes(mut self) -> Vec<u8> {
        let mut bytes: Vec<u8> = vec![];

        let status_line = format!("HTTP/1.1 {} {}\r\n", self.status_code, self.status);
        bytes.extend(status_line.into_bytes());

        let content_length = self.content_length();
        if content_length > 0 {
            self.headers
                .set("Content-Length", &content_length.to_string());
        }

        for (header, value) in self.headers.iter() {
            let header_line = format!("{}: {}\r\n", header, value);
            bytes.extend(header_line.into_bytes());
        }

        bytes.extend(b"\r\n");
        bytes.extend(&self.payload);
        bytes
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::new(200)
    }
}
