//! Streaming serializer: incremental JSON text, stateful deflate
//! compression, and fixed-size re-chunking.
//!
//! Each stage is a pull-based iterator, driven by the transport as the
//! request body is sent. Concatenating every produced chunk and inflating
//! it yields exactly the JSON text a one-shot serializer would produce for
//! the same tree — streaming is a memory and latency optimization, never a
//! format change.

use flate2::{Compress, Compression, FlushCompress, Status};
use serde_json::Value as Json;
use tracing::trace;

use crate::error::EncodeError;

/// Size of re-chunked output buffers, the conventional I/O buffer size.
pub const CHUNK_SIZE: usize = 8 * 1024;

/// Serializes a wire object into deflate-compressed, fixed-size byte chunks.
pub fn deflate_stream(value: Json) -> Rechunk<DeflateChunks<JsonFragments>> {
    Rechunk::new(DeflateChunks::new(JsonFragments::new(value)))
}

enum Frame {
    Array {
        items: std::vec::IntoIter<Json>,
        first: bool,
    },
    Object {
        entries: serde_json::map::IntoIter,
        first: bool,
    },
}

enum Step {
    Element { item: Json, first: bool },
    Entry { key: String, value: Json, first: bool },
    CloseArray,
    CloseObject,
}

/// Consuming iterator over a JSON tree, yielding JSON text fragments.
///
/// Containers are opened and closed as they are reached, so a large array
/// of encoded entities never needs to be resident as text all at once.
pub struct JsonFragments {
    start: Option<Json>,
    stack: Vec<Frame>,
}

impl JsonFragments {
    pub fn new(value: Json) -> Self {
        Self {
            start: Some(value),
            stack: Vec::new(),
        }
    }

    /// Opens a container or renders a leaf, returning the fragment text.
    fn begin_value(&mut self, value: Json) -> String {
        match value {
            Json::Array(items) => {
                self.stack.push(Frame::Array {
                    items: items.into_iter(),
                    first: true,
                });
                "[".to_string()
            }
            Json::Object(map) => {
                self.stack.push(Frame::Object {
                    entries: map.into_iter(),
                    first: true,
                });
                "{".to_string()
            }
            leaf => leaf.to_string(),
        }
    }
}

impl Iterator for JsonFragments {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if let Some(value) = self.start.take() {
            return Some(self.begin_value(value));
        }

        let step = {
            let frame = self.stack.last_mut()?;
            match frame {
                Frame::Array { items, first } => match items.next() {
                    Some(item) => {
                        let element_first = *first;
                        *first = false;
                        Step::Element {
                            item,
                            first: element_first,
                        }
                    }
                    None => Step::CloseArray,
                },
                Frame::Object { entries, first } => match entries.next() {
                    Some((key, value)) => {
                        let entry_first = *first;
                        *first = false;
                        Step::Entry {
                            key,
                            value,
                            first: entry_first,
                        }
                    }
                    None => Step::CloseObject,
                },
            }
        };

        match step {
            Step::Element { item, first } => {
                let fragment = self.begin_value(item);
                if first {
                    Some(fragment)
                } else {
                    Some(format!(",{fragment}"))
                }
            }
            Step::Entry { key, value, first } => {
                let separator = if first { "" } else { "," };
                let key = Json::String(key).to_string();
                let fragment = self.begin_value(value);
                Some(format!("{separator}{key}:{fragment}"))
            }
            Step::CloseArray => {
                self.stack.pop();
                Some("]".to_string())
            }
            Step::CloseObject => {
                self.stack.pop();
                Some("}".to_string())
            }
        }
    }
}

/// Stateful deflate stage over a fragment stream.
///
/// Produces a zlib-format deflate stream, flushed once the input ends.
pub struct DeflateChunks<I> {
    input: I,
    compress: Compress,
    finished: bool,
}

impl<I: Iterator<Item = String>> DeflateChunks<I> {
    pub fn new(input: I) -> Self {
        Self {
            input,
            compress: Compress::new(Compression::default(), true),
            finished: false,
        }
    }

    fn compress_fragment(&mut self, data: &[u8], out: &mut Vec<u8>) -> Result<(), EncodeError> {
        let mut consumed = 0;
        while consumed < data.len() {
            out.reserve(data.len() - consumed + 64);
            let before = self.compress.total_in();
            self.compress
                .compress_vec(&data[consumed..], out, FlushCompress::None)
                .map_err(|e| EncodeError::CompressionFailed(e.to_string()))?;
            consumed += (self.compress.total_in() - before) as usize;
        }
        Ok(())
    }

    fn finish(&mut self, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        loop {
            out.reserve(64);
            let status = self
                .compress
                .compress_vec(&[], out, FlushCompress::Finish)
                .map_err(|e| EncodeError::CompressionFailed(e.to_string()))?;
            if status == Status::StreamEnd {
                trace!(total_out = self.compress.total_out(), "deflate stream complete");
                return Ok(());
            }
        }
    }
}

impl<I: Iterator<Item = String>> Iterator for DeflateChunks<I> {
    type Item = Result<Vec<u8>, EncodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let mut out = Vec::new();
        loop {
            match self.input.next() {
                Some(fragment) => {
                    if let Err(error) = self.compress_fragment(fragment.as_bytes(), &mut out) {
                        self.finished = true;
                        return Some(Err(error));
                    }
                    if !out.is_empty() {
                        return Some(Ok(out));
                    }
                }
                None => {
                    self.finished = true;
                    return match self.finish(&mut out) {
                        Ok(()) => Some(Ok(out)),
                        Err(error) => Some(Err(error)),
                    };
                }
            }
        }
    }
}

/// Regroups a byte-chunk stream into fixed-size buffers for incremental
/// transmission. All buffers except the last are exactly [`CHUNK_SIZE`]
/// bytes.
pub struct Rechunk<I> {
    input: I,
    buffer: Vec<u8>,
    done: bool,
}

impl<I: Iterator<Item = Result<Vec<u8>, EncodeError>>> Rechunk<I> {
    pub fn new(input: I) -> Self {
        Self {
            input,
            buffer: Vec::with_capacity(CHUNK_SIZE),
            done: false,
        }
    }
}

impl<I: Iterator<Item = Result<Vec<u8>, EncodeError>>> Iterator for Rechunk<I> {
    type Item = Result<Vec<u8>, EncodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            if self.buffer.len() >= CHUNK_SIZE {
                let rest = self.buffer.split_off(CHUNK_SIZE);
                let chunk = std::mem::replace(&mut self.buffer, rest);
                return Some(Ok(chunk));
            }
            match self.input.next() {
                Some(Ok(bytes)) => self.buffer.extend_from_slice(&bytes),
                Some(Err(error)) => {
                    self.done = true;
                    return Some(Err(error));
                }
                None => {
                    self.done = true;
                    if self.buffer.is_empty() {
                        return None;
                    }
                    return Some(Ok(std::mem::take(&mut self.buffer)));
                }
            }
        }
    }
}
