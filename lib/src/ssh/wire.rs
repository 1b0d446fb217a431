//! This module implements the SSH binary encoding (RFC 4251 section 5)
use rug::Integer;

use crate::convert::os2ip;
use crate::error::{InputError, Result};

/// Cursor over a byte buffer holding SSH wire data
pub struct WireReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> WireReader<'a> {
    /// Create a new reader positioned at the start of `buf`
    pub fn new(buf: &'a [u8]) -> Self {
        WireReader { buf, pos: 0 }
    }

    /// Current cursor position
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Number of unread bytes
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Whether every byte has been consumed
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Consume exactly `len` raw bytes
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        if len > self.remaining() {
            return Err(InputError::format(
                self.pos,
                format!("need {} bytes, {} remaining", len, self.remaining()),
            ));
        }
        let out: &'a [u8] = &self.buf[self.pos..self.pos + len];
        self.pos += len;
        Ok(out)
    }

    /// Read a big-endian uint32
    pub fn read_u32_be(&mut self) -> Result<u32> {
        let bytes: &[u8] = self.read_bytes(4)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// Read a uint32 length followed by that many bytes
    pub fn read_length_prefixed_bytes(&mut self) -> Result<&'a [u8]> {
        let start: usize = self.pos;
        let len: usize = self.read_u32_be()? as usize;
        if len > self.remaining() {
            // rewind so the error reports where the field started
            self.pos = start;
            return Err(InputError::format(
                start,
                format!("declared length {} exceeds remaining {} bytes", len, self.buf.len() - start - 4),
            ));
        }
        self.read_bytes(len)
    }

    /// Read a length-prefixed string and skip it
    pub fn skip_length_prefixed(&mut self) -> Result<()> {
        self.read_length_prefixed_bytes().map(|_| ())
    }

    /// Read a length-prefixed `mpint` as a non-negative big-endian integer.
    ///
    /// SSH prepends a zero byte when the high bit is set; OS2IP ignores it.
    pub fn read_mpint(&mut self) -> Result<Integer> {
        let bytes: &[u8] = self.read_length_prefixed_bytes()?;
        Ok(os2ip(bytes))
    }
}

/// Encode `data` as an SSH string: 4-byte big-endian length, then the bytes
pub fn encode_ssh_string(data: &[u8]) -> Vec<u8> {
    let mut out: Vec<u8> = Vec::with_capacity(4 + data.len());
    out.extend_from_slice(&(data.len() as u32).to_be_bytes());
    out.extend_from_slice(data);
    out
}
