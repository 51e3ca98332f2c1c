/// OSC argument stream
///
/// Arguments are decoded on demand from the type tag string and the raw
/// argument bytes of a message.

use crate::error::DecodeError;
use super::packet::ByteReader;

/// A single decoded OSC argument
#[derive(Debug, Clone, PartialEq)]
pub enum Argument<'a> {
    /// `i`
    Int32(i32),
    /// `f`
    Float32(f32),
    /// `s`
    String(&'a str),
    /// `b`
    Blob(&'a [u8]),
    /// `h`
    Int64(i64),
    /// `t`
    TimeTag(u64),
    /// `d`
    Float64(f64),
    /// `S`
    Symbol(&'a str),
    /// `c`
    Char(char),
    /// `r`
    Rgba(u32),
    /// `m`
    Midi([u8; 4]),
    /// `T`
    True,
    /// `F`
    False,
    /// `N`
    Nil,
    /// `I`
    Impulse,
}

impl Argument<'_> {
    /// The type tag this argument was decoded from
    pub fn tag(&self) -> char {
        match self {
            Argument::Int32(_) => 'i',
            Argument::Float32(_) => 'f',
            Argument::String(_) => 's',
            Argument::Blob(_) => 'b',
            Argument::Int64(_) => 'h',
            Argument::TimeTag(_) => 't',
            Argument::Float64(_) => 'd',
            Argument::Symbol(_) => 'S',
            Argument::Char(_) => 'c',
            Argument::Rgba(_) => 'r',
            Argument::Midi(_) => 'm',
            Argument::True => 'T',
            Argument::False => 'F',
            Argument::Nil => 'N',
            Argument::Impulse => 'I',
        }
    }
}

/// Cursor over the arguments of one message
#[derive(Debug, Clone)]
pub struct ArgStream<'a> {
    tags: std::str::Chars<'a>,
    reader: ByteReader<'a>,
}

impl<'a> ArgStream<'a> {
    pub(crate) fn new(type_tags: &'a str, data: &'a [u8]) -> Self {
        Self {
            tags: type_tags.chars(),
            reader: ByteReader::new(data),
        }
    }

    /// Number of arguments not yet read
    pub fn remaining(&self) -> usize {
        self.tags.clone().count()
    }

    /// Check if all arguments were read
    pub fn at_end(&self) -> bool {
        self.tags.as_str().is_empty()
    }

    /// Read the next argument, which must be a float32
    ///
    /// # Errors
    ///
    /// Returns `TypeMismatch` for a non-float tag and `Truncated` when no
    /// argument or not enough data is left.
    pub fn float32(&mut self) -> Result<f32, DecodeError> {
        let offset = self.reader.offset();
        match self.tags.next() {
            Some('f') => self.reader.f32(),
            Some(found) => Err(DecodeError::TypeMismatch { expected: 'f', found }),
            None => Err(DecodeError::Truncated {
                offset,
                needed: 4,
                available: 0,
            }),
        }
    }

    /// Read the next argument, which must be an int32
    pub fn int32(&mut self) -> Result<i32, DecodeError> {
        match self.tags.next() {
            Some('i') => self.reader.i32(),
            Some(found) => Err(DecodeError::TypeMismatch { expected: 'i', found }),
            None => Err(DecodeError::Truncated {
                offset: self.reader.offset(),
                needed: 4,
                available: 0,
            }),
        }
    }

    fn decode(&mut self, tag: char) -> Result<Argument<'a>, DecodeError> {
        let reader = &mut self.reader;
        let arg = match tag {
            'i' => Argument::Int32(reader.i32()?),
            'f' => Argument::Float32(reader.f32()?),
            's' => Argument::String(reader.padded_str()?),
            'S' => Argument::Symbol(reader.padded_str()?),
            'b' => Argument::Blob(reader.blob()?),
            'h' => Argument::Int64(reader.u64()? as i64),
            't' => Argument::TimeTag(reader.u64()?),
            'd' => Argument::Float64(f64::from_bits(reader.u64()?)),
            'c' => {
                let code = reader.u32()?;
                Argument::Char(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER))
            }
            'r' => Argument::Rgba(reader.u32()?),
            'm' => Argument::Midi(reader.array4()?),
            'T' => Argument::True,
            'F' => Argument::False,
            'N' => Argument::Nil,
            'I' => Argument::Impulse,
            other => return Err(DecodeError::UnknownTypeTag(other)),
        };
        Ok(arg)
    }
}

impl<'a> Iterator for ArgStream<'a> {
    type Item = Result<Argument<'a>, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.tags.next()?;
        let result = self.decode(tag);
        if result.is_err() {
            // Stop after the first malformed argument
            self.tags = "".chars();
        }
        Some(result)
    }
}

#[cfg(test)]
#[path = "args_tests.rs"]
mod tests;
