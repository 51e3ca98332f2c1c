/// OSC 1.0 packet decoding
///
/// A packet is either a message (address, type tags, arguments) or a bundle
/// (`#bundle`, time tag, size-prefixed sub-packets). Decoding borrows from the
/// datagram buffer: nothing is copied, and bundle contents are walked lazily
/// through `PacketStream`.

use std::borrow::Cow;
use crate::error::DecodeError;
use super::args::ArgStream;

/// Bundle header including its NUL padding
pub const BUNDLE_TAG: &[u8; 8] = b"#bundle\0";

/// Time tag meaning "immediately"
pub const IMMEDIATELY: u64 = 1;

// ============================================================================
// Byte reader
// ============================================================================

/// Big-endian cursor over a packet buffer
#[derive(Debug, Clone)]
pub(crate) struct ByteReader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> ByteReader<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    pub(crate) fn offset(&self) -> usize {
        self.offset
    }

    pub(crate) fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    pub(crate) fn peek(&self) -> Option<u8> {
        self.data.get(self.offset).copied()
    }

    /// Remaining bytes, consuming them
    pub(crate) fn rest(&mut self) -> &'a [u8] {
        let rest = &self.data[self.offset..];
        self.offset = self.data.len();
        rest
    }

    pub(crate) fn bytes(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        if self.remaining() < len {
            return Err(DecodeError::Truncated {
                offset: self.offset,
                needed: len,
                available: self.remaining(),
            });
        }
        let slice = &self.data[self.offset..self.offset + len];
        self.offset += len;
        Ok(slice)
    }

    pub(crate) fn array4(&mut self) -> Result<[u8; 4], DecodeError> {
        let b = self.bytes(4)?;
        Ok([b[0], b[1], b[2], b[3]])
    }

    pub(crate) fn i32(&mut self) -> Result<i32, DecodeError> {
        Ok(i32::from_be_bytes(self.array4()?))
    }

    pub(crate) fn u32(&mut self) -> Result<u32, DecodeError> {
        Ok(u32::from_be_bytes(self.array4()?))
    }

    pub(crate) fn f32(&mut self) -> Result<f32, DecodeError> {
        Ok(f32::from_be_bytes(self.array4()?))
    }

    pub(crate) fn u64(&mut self) -> Result<u64, DecodeError> {
        let b = self.bytes(8)?;
        let mut raw = [0u8; 8];
        raw.copy_from_slice(b);
        Ok(u64::from_be_bytes(raw))
    }

    /// NUL-terminated byte string padded to a 4-byte boundary, NUL excluded
    pub(crate) fn padded_bytes(&mut self) -> Result<&'a [u8], DecodeError> {
        let start = self.offset;
        let tail = &self.data[start..];
        let nul = tail
            .iter()
            .position(|&b| b == 0)
            .ok_or(DecodeError::UnterminatedString(start))?;
        self.bytes(padded_len(nul + 1))?;
        Ok(&tail[..nul])
    }

    /// NUL-terminated UTF-8 string padded to a 4-byte boundary
    pub(crate) fn padded_str(&mut self) -> Result<&'a str, DecodeError> {
        let start = self.offset;
        let raw = self.padded_bytes()?;
        std::str::from_utf8(raw).map_err(|_| DecodeError::InvalidUtf8(start))
    }

    /// Size-prefixed blob padded to a 4-byte boundary
    pub(crate) fn blob(&mut self) -> Result<&'a [u8], DecodeError> {
        let size = self.i32()?;
        if size < 0 {
            return Err(DecodeError::InvalidElementSize(size));
        }
        let size = size as usize;
        let padded = self.bytes(padded_len(size))?;
        Ok(&padded[..size])
    }
}

/// Round up to the next multiple of 4
pub(crate) fn padded_len(len: usize) -> usize {
    (len + 3) & !3
}

// ============================================================================
// Packet
// ============================================================================

/// A decoded OSC packet borrowing from the datagram
#[derive(Debug, Clone)]
pub enum Packet<'a> {
    /// Single addressed message
    Message(Message<'a>),
    /// Container of further packets
    Bundle(Bundle<'a>),
}

impl<'a> Packet<'a> {
    /// Decode the packet header
    ///
    /// Message arguments and bundle elements are validated when they are
    /// read, not here.
    ///
    /// # Errors
    ///
    /// Returns an error if the buffer is empty, not 4-byte aligned, or its
    /// header (address, type tag string, bundle time tag) is malformed.
    pub fn parse(data: &'a [u8]) -> Result<Self, DecodeError> {
        if data.is_empty() {
            return Err(DecodeError::Truncated { offset: 0, needed: 4, available: 0 });
        }
        if data.len() % 4 != 0 {
            return Err(DecodeError::Misaligned(data.len()));
        }

        if data.starts_with(b"#") {
            Bundle::parse(data).map(Packet::Bundle)
        } else {
            Message::parse(data).map(Packet::Message)
        }
    }

    /// Check if this packet is a bundle
    pub fn is_bundle(&self) -> bool {
        matches!(self, Packet::Bundle(_))
    }
}

// ============================================================================
// Message
// ============================================================================

/// An OSC message: address, type tags, raw argument bytes
#[derive(Debug, Clone)]
pub struct Message<'a> {
    address: &'a [u8],
    type_tags: &'a str,
    arg_data: &'a [u8],
}

impl<'a> Message<'a> {
    fn parse(data: &'a [u8]) -> Result<Self, DecodeError> {
        let mut reader = ByteReader::new(data);

        // Addresses are compared as raw bytes; only '/' is required
        let address = reader.padded_bytes()?;
        if !address.starts_with(b"/") {
            return Err(DecodeError::InvalidAddress(
                String::from_utf8_lossy(address).into_owned(),
            ));
        }

        // Messages without a type tag string carry no arguments
        let type_tags = match reader.peek() {
            Some(b',') => {
                let tags = reader.padded_str()?;
                &tags[1..]
            }
            _ => "",
        };

        Ok(Self {
            address,
            type_tags,
            arg_data: reader.rest(),
        })
    }

    /// Message address, e.g. `/model`
    ///
    /// Bytes that are not UTF-8 are shown as U+FFFD.
    pub fn address(&self) -> Cow<'a, str> {
        String::from_utf8_lossy(self.address)
    }

    /// Raw address bytes as received
    pub fn address_bytes(&self) -> &'a [u8] {
        self.address
    }

    /// Type tags without the leading comma
    pub fn type_tags(&self) -> &'a str {
        self.type_tags
    }

    /// Number of declared arguments
    pub fn arg_count(&self) -> usize {
        self.type_tags.len()
    }

    /// Lazy argument stream
    pub fn args(&self) -> ArgStream<'a> {
        ArgStream::new(self.type_tags, self.arg_data)
    }
}

// ============================================================================
// Bundle
// ============================================================================

/// An OSC bundle: time tag plus size-prefixed elements
#[derive(Debug, Clone)]
pub struct Bundle<'a> {
    time_tag: u64,
    elements: &'a [u8],
}

impl<'a> Bundle<'a> {
    fn parse(data: &'a [u8]) -> Result<Self, DecodeError> {
        let mut reader = ByteReader::new(data);

        if reader.bytes(BUNDLE_TAG.len())? != BUNDLE_TAG {
            return Err(DecodeError::InvalidBundle);
        }
        let time_tag = reader.u64()?;

        Ok(Self {
            time_tag,
            elements: reader.rest(),
        })
    }

    /// NTP time tag (`IMMEDIATELY` == 1)
    pub fn time_tag(&self) -> u64 {
        self.time_tag
    }

    /// Lazy, restartable stream of contained packets in order
    pub fn packets(&self) -> PacketStream<'a> {
        PacketStream {
            reader: ByteReader::new(self.elements),
            failed: false,
        }
    }
}

/// Iterator over the elements of a bundle
///
/// Yields each contained packet in order. After the first error the stream
/// ends.
#[derive(Debug, Clone)]
pub struct PacketStream<'a> {
    reader: ByteReader<'a>,
    failed: bool,
}

impl<'a> PacketStream<'a> {
    /// Check if all elements were consumed
    pub fn at_end(&self) -> bool {
        self.failed || self.reader.is_empty()
    }

    fn next_packet(&mut self) -> Result<Packet<'a>, DecodeError> {
        let size = self.reader.i32()?;
        if size <= 0 || size as usize > self.reader.remaining() {
            return Err(DecodeError::InvalidElementSize(size));
        }
        if size % 4 != 0 {
            return Err(DecodeError::Misaligned(size as usize));
        }
        let element = self.reader.bytes(size as usize)?;
        Packet::parse(element)
    }
}

impl<'a> Iterator for PacketStream<'a> {
    type Item = Result<Packet<'a>, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.at_end() {
            return None;
        }
        let result = self.next_packet();
        if result.is_err() {
            self.failed = true;
        }
        Some(result)
    }
}

#[cfg(test)]
#[path = "packet_tests.rs"]
mod tests;
