use crate::byte_link::{ByteLink, LinkError};

/// Terminator of every command and response line.
pub const DELIMITER: &[u8] = b"\r\n";

/// Marker the instrument splices into responses; it carries no payload.
const ERROR_MARKER: &[u8] = b"ERR!";

pub const DEFAULT_CHUNK_SIZE: usize = 4096;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Link error: {0}")]
    Link(#[from] LinkError),

    #[error("Short write: link accepted {written} of {expected} bytes")]
    ShortWrite { expected: usize, written: usize },

    #[error("Link closed before the response terminator arrived (received '{received}')")]
    ClosedBeforeDelimiter { received: String },

    #[error("UTF-8 conversion error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Line framing on top of a [`ByteLink`].
///
/// One request/response exchange at a time: a query's `write` must be
/// followed by its `read` before anything else is sent.
pub struct ScpiConnection {
    link: Box<dyn ByteLink>,
}

impl ScpiConnection {
    pub fn new(link: impl ByteLink + 'static) -> Self {
        Self {
            link: Box::new(link),
        }
    }

    pub fn open(&mut self) -> Result<(), TransportError> {
        self.link.open()?;
        Ok(())
    }

    pub fn close(&mut self) -> Result<(), TransportError> {
        self.link.close()?;
        Ok(())
    }

    /// Send one framed line, returning the payload bytes written (delimiter excluded).
    pub fn write(&mut self, message: &str) -> Result<usize, TransportError> {
        let mut buffer = Vec::with_capacity(message.len() + DELIMITER.len());
        buffer.extend_from_slice(message.as_bytes());
        buffer.extend_from_slice(DELIMITER);

        let written = self.link.write(&buffer)?;
        if written < buffer.len() {
            return Err(TransportError::ShortWrite {
                expected: buffer.len(),
                written,
            });
        }

        log::trace!("-> {}", message);
        Ok(written - DELIMITER.len())
    }

    pub fn read(&mut self) -> Result<String, TransportError> {
        self.read_with_chunk_size(DEFAULT_CHUNK_SIZE)
    }

    /// Read one response line, assembling it from as many chunks as it takes.
    ///
    /// A `chunk_size` of 0 is treated as 1, since an empty chunk means the link closed.
    pub fn read_with_chunk_size(&mut self, chunk_size: usize) -> Result<String, TransportError> {
        let chunk_size = chunk_size.max(1);
        let mut response = Vec::new();

        while !response.ends_with(DELIMITER) {
            let chunk = self.link.read(chunk_size)?;
            if chunk.is_empty() {
                return Err(TransportError::ClosedBeforeDelimiter {
                    received: String::from_utf8_lossy(&response).into_owned(),
                });
            }
            response.extend(strip_error_markers(&chunk));
        }

        response.truncate(response.len() - DELIMITER.len());
        let response = String::from_utf8(response)?;
        log::trace!("<- {}", response);
        Ok(response)
    }
}

impl std::fmt::Debug for ScpiConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScpiConnection").finish_non_exhaustive()
    }
}

/// Remove every `ERR!` occurrence from one chunk.
fn strip_error_markers(chunk: &[u8]) -> Vec<u8> {
    let mut cleaned = Vec::with_capacity(chunk.len());
    let mut rest = chunk;
    while !rest.is_empty() {
        if rest.starts_with(ERROR_MARKER) {
            rest = &rest[ERROR_MARKER.len()..];
        } else {
            cleaned.push(rest[0]);
            rest = &rest[1..];
        }
    }
    cleaned
}
