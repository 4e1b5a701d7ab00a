//! HTTP transport boundary.
//!
//! The client talks to the server through the [`Transport`] trait, so tests
//! can substitute a recording stub and the blocking [`HttpTransport`] stays
//! the only place aware of the actual HTTP stack.

use std::io;

use tracing::debug;

use crate::error::{EncodeError, TransportError};

/// A lazily produced stream of body chunks.
pub type ChunkStream = Box<dyn Iterator<Item = Result<Vec<u8>, EncodeError>> + Send + 'static>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// Request body. Streamed bodies are transmitted with chunked
/// transfer encoding, fixed bodies with a known length.
pub enum Body {
    Empty,
    Fixed(Vec<u8>),
    Stream(ChunkStream),
}

pub struct Request {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(&'static str, String)>,
    pub body: Body,
}

pub struct Response {
    pub status: u16,
    pub body: Vec<u8>,
}

impl Response {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

pub trait Transport {
    fn send(&self, request: Request) -> Result<Response, TransportError>;
}

/// Blocking HTTP transport over [`reqwest`].
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    /// Builds the transport. With `verify_ssl` disabled the server
    /// certificate is not validated, which some on-premises deployments
    /// with self-signed certificates require.
    pub fn new(verify_ssl: bool) -> Result<Self, TransportError> {
        let client = reqwest::blocking::Client::builder()
            .danger_accept_invalid_certs(!verify_ssl)
            .build()
            .map_err(|e| TransportError::new(e.to_string()))?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: Request) -> Result<Response, TransportError> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
        };
        debug!(method = ?request.method, url = %request.url, "sending request");

        let mut builder = self.client.request(method, &request.url);
        for (name, value) in request.headers {
            builder = builder.header(name, value);
        }
        builder = match request.body {
            Body::Empty => builder,
            Body::Fixed(bytes) => builder.body(bytes),
            Body::Stream(chunks) => {
                builder.body(reqwest::blocking::Body::new(ChunkReader::new(chunks)))
            }
        };

        let response = builder
            .send()
            .map_err(|e| TransportError::new(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .map_err(|e| TransportError::new(e.to_string()))?
            .to_vec();
        debug!(status, body_len = body.len(), "received response");
        Ok(Response { status, body })
    }
}

/// Adapts a chunk stream to [`io::Read`] so reqwest can transmit it
/// incrementally.
struct ChunkReader {
    chunks: ChunkStream,
    current: Vec<u8>,
    position: usize,
}

impl ChunkReader {
    fn new(chunks: ChunkStream) -> Self {
        Self {
            chunks,
            current: Vec::new(),
            position: 0,
        }
    }
}

impl io::Read for ChunkReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        while self.position == self.current.len() {
            match self.chunks.next() {
                Some(Ok(chunk)) => {
                    self.current = chunk;
                    self.position = 0;
                }
                Some(Err(error)) => {
                    return Err(io::Error::new(io::ErrorKind::InvalidData, error));
                }
                None => return Ok(0),
            }
        }
        let available = &self.current[self.position..];
        let amount = available.len().min(buf.len());
        buf[..amount].copy_from_slice(&available[..amount]);
        self.position += amount;
        Ok(amount)
    }
}
