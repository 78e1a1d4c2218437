// SPDX-License-Identifier: Apache-2.0
// Copyright Flowgate Authors

//! Wire codec traits and buffer cursors.
//!
//! Every wire object in this crate implements [`Parse`] and [`DeParse`].
//! The framing layer drives those implementations through [`Reader`] and
//! [`Writer`], cursors over a caller-supplied buffer which advance only
//! when a field has been fully consumed or produced.

use core::num::NonZero;

/// Decode a value from the front of a byte buffer.
pub trait Parse: Sized {
    /// Lower-level fault which may surface while decoding `Self`.
    type Error: core::error::Error;

    /// Decode a value from the front of `buf`.
    ///
    /// Returns the decoded value and the (nonzero) number of bytes it
    /// occupied.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] if `buf` is too short or its contents do
    /// not form a valid `Self`.
    fn parse(buf: &[u8]) -> Result<(Self, NonZero<usize>), ParseError<Self::Error>>;
}

/// Encode a value to the front of a byte buffer.
pub trait DeParse {
    /// Fault which may surface while encoding `Self`.
    type Error: core::error::Error;

    /// The number of bytes this value occupies on the wire.
    fn size(&self) -> NonZero<usize>;

    /// Write the wire representation of the value to the front of `buf`.
    ///
    /// Returns the (nonzero) number of bytes written.
    ///
    /// # Errors
    ///
    /// Returns a [`DeParseError`] if `buf` cannot hold [`size`] more bytes.
    ///
    /// [`size`]: DeParse::size
    fn write(&self, buf: &mut [u8]) -> Result<NonZero<usize>, DeParseError<Self::Error>>;
}

/// Error indicating that a buffer was shorter than an operation required.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("expected at least {expected} bytes, got {actual}")]
pub struct LengthError {
    /// The number of bytes the operation required.
    pub expected: NonZero<usize>,
    /// The number of bytes actually available.
    pub actual: usize,
}

/// Errors which may occur when decoding a wire object.
#[derive(Debug, thiserror::Error)]
pub enum ParseError<E: core::error::Error> {
    /// The buffer had fewer bytes remaining than decoding required.
    #[error(transparent)]
    LengthError(LengthError),
    /// A lower-level fault, surfaced verbatim.
    #[error(transparent)]
    FailedToParse(E),
}

/// Errors which may occur when encoding a wire object.
#[derive(Debug, thiserror::Error)]
pub enum DeParseError<E: core::error::Error> {
    /// The buffer had no room for the encoded object.
    #[error(transparent)]
    LengthError(LengthError),
    /// A lower-level fault, surfaced verbatim.
    #[error(transparent)]
    FailedToWrite(E),
}

/// A consuming cursor over an immutable byte buffer.
#[derive(Debug)]
pub struct Reader<'buf> {
    buf: &'buf [u8],
    pos: usize,
}

impl<'buf> Reader<'buf> {
    /// Create a new [`Reader`] positioned at the start of `buf`.
    #[must_use]
    pub fn new(buf: &'buf [u8]) -> Reader<'buf> {
        Reader { buf, pos: 0 }
    }

    /// The number of bytes not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Decode a `T` at the current position and advance past it.
    ///
    /// The cursor does not advance on failure: a short or malformed buffer
    /// leaves the position where it was, so the framing layer can report
    /// the offset of the field which failed to decode.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] if decoding fails or if the decoder claims
    /// to have consumed more bytes than remained in the buffer.
    pub fn parse<T: Parse>(&mut self) -> Result<(T, NonZero<usize>), ParseError<T::Error>> {
        let (value, consumed) = T::parse(&self.buf[self.pos..])?;
        match self.consume(consumed) {
            Ok(()) => Ok((value, consumed)),
            Err(e) => Err(ParseError::LengthError(e)),
        }
    }

    fn consume(&mut self, n: NonZero<usize>) -> Result<(), LengthError> {
        if n.get() > self.remaining() {
            return Err(LengthError {
                expected: n,
                actual: self.remaining(),
            });
        }
        self.pos += n.get();
        Ok(())
    }
}

/// A producing cursor over a mutable byte buffer.
#[derive(Debug)]
pub struct Writer<'buf> {
    buf: &'buf mut [u8],
    pos: usize,
}

impl<'buf> Writer<'buf> {
    /// Create a new [`Writer`] positioned at the start of `buf`.
    #[must_use]
    pub fn new(buf: &'buf mut [u8]) -> Writer<'buf> {
        Writer { buf, pos: 0 }
    }

    /// The number of bytes of room left in the buffer.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// The prefix of the buffer produced so far.
    #[must_use]
    pub fn written(&self) -> &[u8] {
        &self.buf[..self.pos]
    }

    /// Encode `value` at the current position and advance past it.
    ///
    /// The cursor does not advance on failure, leaving the buffer prefix
    /// produced so far intact.
    ///
    /// # Errors
    ///
    /// Returns a [`DeParseError`] if encoding fails or if the encoder
    /// claims to have written more bytes than remained in the buffer.
    pub fn write<T: DeParse>(
        &mut self,
        value: &T,
    ) -> Result<NonZero<usize>, DeParseError<T::Error>> {
        let written = value.write(&mut self.buf[self.pos..])?;
        match self.advance(written) {
            Ok(()) => Ok(written),
            Err(e) => Err(DeParseError::LengthError(e)),
        }
    }

    fn advance(&mut self, n: NonZero<usize>) -> Result<(), LengthError> {
        if n.get() > self.remaining() {
            return Err(LengthError {
                expected: n,
                actual: self.remaining(),
            });
        }
        self.pos += n.get();
        Ok(())
    }
}
