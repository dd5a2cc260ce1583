use bytes::Buf;
use std::{
    io::{Cursor, Read},
    num::TryFromIntError,
};
use thiserror::Error;

/// Failures while producing a frame. Nothing is emitted when encoding fails.
#[derive(Error, PartialEq, Debug)]
pub enum EncodeError {
    /// An object payload does not fit the one byte length prefix.
    #[error("payload of object {object_id:#04x} is {length} bytes, at most 255 fit a frame")]
    PayloadTooLarge { object_id: u8, length: usize },
    #[error("value does not fit its field")]
    Overflow,
}

impl From<TryFromIntError> for EncodeError {
    fn from(_: TryFromIntError) -> Self {
        Self::Overflow
    }
}

pub type EncodeResult = Result<(), EncodeError>;

pub trait Encodable {
    fn encode(&self, encoder: &mut Encoder) -> EncodeResult;

    fn encode_to_bytes(&self) -> Result<Vec<u8>, EncodeError> {
        Encoder::encode(self)
    }
}

pub struct Encoder {
    buffer: Vec<u8>,
}

impl Encoder {
    pub fn new() -> Self {
        Self {
            buffer: Vec::with_capacity(16),
        }
    }

    pub fn position(&self) -> usize {
        self.buffer.len()
    }

    pub fn write_u8(&mut self, value: u8) {
        self.buffer.push(value);
    }

    pub fn write_bytes(&mut self, value: &[u8]) {
        self.buffer.extend(value);
    }

    pub fn write_type<T>(&mut self, value: &T) -> EncodeResult
    where
        T: Encodable + ?Sized,
    {
        value.encode(self)
    }

    pub fn finish(self) -> Vec<u8> {
        self.buffer
    }

    pub fn encode<T>(value: &T) -> Result<Vec<u8>, EncodeError>
    where
        T: Encodable + ?Sized,
    {
        let mut encoder = Self::new();
        encoder.write_type(value)?;
        Ok(encoder.finish())
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

/// A malformed frame: too short for its layout, or internally inconsistent.
#[derive(Error, PartialEq, Debug, Clone)]
pub enum DecodeError {
    #[error("malformed frame: buffer ends before the declared layout")]
    MissingData,
    #[error("malformed frame: {0}")]
    InvalidData(&'static str),
}

pub type DecodeResult<T> = Result<T, DecodeError>;

pub trait Decodable<T> {
    fn decode(decoder: &mut Decoder) -> DecodeResult<T>;

    fn decode_from_bytes(buffer: &[u8]) -> DecodeResult<T>
    where
        T: Decodable<T>,
    {
        Decoder::decode(buffer)
    }
}

pub struct Decoder<'a> {
    cursor: Cursor<&'a [u8]>,
}

impl<'a> Decoder<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Self {
            cursor: Cursor::new(buffer),
        }
    }

    pub fn position(&self) -> usize {
        self.cursor.position() as usize
    }

    pub fn remaining(&self) -> usize {
        self.cursor.remaining()
    }

    pub fn read_u8(&mut self) -> DecodeResult<u8> {
        if self.cursor.remaining() < 1 {
            return Err(DecodeError::MissingData);
        }
        Ok(self.cursor.get_u8())
    }

    pub fn read_bytes(&mut self, length: usize) -> DecodeResult<Vec<u8>> {
        if self.cursor.remaining() < length {
            return Err(DecodeError::MissingData);
        }
        let mut bytes = vec![0u8; length];
        self.cursor.read_exact(&mut bytes).map_err(|_| DecodeError::MissingData)?;
        Ok(bytes)
    }

    pub fn read_type<T>(&mut self) -> DecodeResult<T>
    where
        T: Decodable<T>,
    {
        T::decode(self)
    }

    pub fn decode<T>(buffer: &'a [u8]) -> DecodeResult<T>
    where
        T: Decodable<T>,
    {
        let mut decoder = Self::new(buffer);
        let value: T = decoder.read_type()?;
        Ok(value)
    }
}
