//! In-memory [`ByteLink`] for exercising drivers without hardware.
//!
//! Inbound data is scripted as a queue of chunks; every `read` hands out at
//! most one chunk (or the requested prefix of it). Outbound writes are
//! recorded and can be inspected through any clone of the link, so a test
//! can keep one handle while the controller owns the other.

use crate::byte_link::{ByteLink, LinkError};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct MemoryLinkState {
    open: bool,
    open_count: usize,
    close_count: usize,
    incoming: VecDeque<Vec<u8>>,
    written: Vec<Vec<u8>>,
    write_shortfall: usize,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryLink {
    state: Arc<Mutex<MemoryLinkState>>,
}

impl MemoryLink {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MemoryLinkState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queue a chunk exactly as the link should hand it out.
    pub fn push_chunk(&self, chunk: impl AsRef<[u8]>) -> &Self {
        self.state().incoming.push_back(chunk.as_ref().to_vec());
        self
    }

    /// Queue a complete CRLF-terminated response.
    pub fn push_response(&self, response: &str) -> &Self {
        self.push_chunk(format!("{response}\r\n"))
    }

    /// Make every subsequent write report `shortfall` fewer bytes than it was given.
    pub fn set_write_shortfall(&self, shortfall: usize) {
        self.state().write_shortfall = shortfall;
    }

    /// Raw buffers written so far, delimiters included.
    pub fn written(&self) -> Vec<Vec<u8>> {
        self.state().written.clone()
    }

    /// Written buffers decoded as text with the trailing CRLF removed.
    pub fn commands(&self) -> Vec<String> {
        self.state()
            .written
            .iter()
            .map(|bytes| {
                let text = String::from_utf8_lossy(bytes);
                text.strip_suffix("\r\n").unwrap_or(&text).to_string()
            })
            .collect()
    }

    pub fn pending_chunks(&self) -> usize {
        self.state().incoming.len()
    }

    pub fn is_open(&self) -> bool {
        self.state().open
    }

    pub fn open_count(&self) -> usize {
        self.state().open_count
    }

    pub fn close_count(&self) -> usize {
        self.state().close_count
    }
}

impl ByteLink for MemoryLink {
    fn open(&mut self) -> Result<(), LinkError> {
        let mut state = self.state();
        state.open = true;
        state.open_count += 1;
        Ok(())
    }

    fn close(&mut self) -> Result<(), LinkError> {
        let mut state = self.state();
        state.open = false;
        state.close_count += 1;
        Ok(())
    }

    fn read(&mut self, max_bytes: usize) -> Result<Vec<u8>, LinkError> {
        let mut state = self.state();
        if !state.open {
            return Err(LinkError::NotOpen);
        }

        // An exhausted script behaves like a peer that hung up
        let Some(mut chunk) = state.incoming.pop_front() else {
            return Ok(Vec::new());
        };
        if chunk.len() > max_bytes {
            let rest = chunk.split_off(max_bytes);
            state.incoming.push_front(rest);
        }
        Ok(chunk)
    }

    fn write(&mut self, bytes: &[u8]) -> Result<usize, LinkError> {
        let mut state = self.state();
        if !state.open {
            return Err(LinkError::NotOpen);
        }
        state.written.push(bytes.to_vec());
        Ok(bytes.len().saturating_sub(state.write_shortfall))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_splits_oversized_chunks() {
        let mut link = MemoryLink::new();
        link.push_chunk("abcdef");
        link.open().unwrap();

        assert_eq!(link.read(4).unwrap(), b"abcd");
        assert_eq!(link.read(4).unwrap(), b"ef");
        assert!(link.read(4).unwrap().is_empty());
    }

    #[test]
    fn test_clones_share_state() {
        let observer = MemoryLink::new();
        let mut link = observer.clone();

        link.open().unwrap();
        link.write(b"ACQ:START\r\n").unwrap();
        link.close().unwrap();

        assert_eq!(observer.commands(), vec!["ACQ:START".to_string()]);
        assert_eq!(observer.open_count(), 1);
        assert_eq!(observer.close_count(), 1);
        assert!(!observer.is_open());
    }

    #[test]
    fn test_closed_link_rejects_io() {
        let mut link = MemoryLink::new();
        assert!(matches!(link.read(1), Err(LinkError::NotOpen)));
        assert!(matches!(link.write(b"x"), Err(LinkError::NotOpen)));
    }
}
