//! Pixel sample extraction
//!
//! Turns the raw Pixel Data byte range into typed samples according to the
//! declared bit depth, pixel representation and byte order.

use super::parser::ByteRange;
use crate::error::{Error, Result};
use crate::types::{BitDepth, Endianness, PixelRepresentation};
use byteorder::{BigEndian, ByteOrder, LittleEndian};
use std::slice;

/// How samples are packed in the pixel data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleLayout {
    pub bit_depth: BitDepth,
    pub representation: PixelRepresentation,
    pub endianness: Endianness,
}

impl SampleLayout {
    /// Little endian layout using every allocated bit
    #[must_use]
    pub fn new(bits_allocated: u16, representation: PixelRepresentation) -> Self {
        Self {
            bit_depth: BitDepth::new(bits_allocated, bits_allocated),
            representation,
            endianness: Endianness::Little,
        }
    }

    #[must_use]
    pub fn with_bit_depth(self, bit_depth: BitDepth) -> Self {
        Self { bit_depth, ..self }
    }

    #[must_use]
    pub fn with_endianness(self, endianness: Endianness) -> Self {
        Self { endianness, ..self }
    }
}

/// Decoded samples in row-major order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SampleArray {
    U8(Vec<u8>),
    U16(Vec<u16>),
    I16(Vec<i16>),
}

impl SampleArray {
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::U8(v) => v.len(),
            Self::U16(v) => v.len(),
            Self::I16(v) => v.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<f64> {
        match self {
            Self::U8(v) => v.get(index).map(|&s| f64::from(s)),
            Self::U16(v) => v.get(index).map(|&s| f64::from(s)),
            Self::I16(v) => v.get(index).map(|&s| f64::from(s)),
        }
    }

    /// Sample values widened to `f64`
    #[must_use]
    pub fn values(&self) -> Samples<'_> {
        match self {
            Self::U8(v) => Samples::U8(v.iter()),
            Self::U16(v) => Samples::U16(v.iter()),
            Self::I16(v) => Samples::I16(v.iter()),
        }
    }

    /// Keep only the first `len` samples
    pub fn truncate(&mut self, len: usize) {
        match self {
            Self::U8(v) => v.truncate(len),
            Self::U16(v) => v.truncate(len),
            Self::I16(v) => v.truncate(len),
        }
    }
}

/// Iterator over a [`SampleArray`] yielding `f64`
#[derive(Debug, Clone)]
pub enum Samples<'a> {
    U8(slice::Iter<'a, u8>),
    U16(slice::Iter<'a, u16>),
    I16(slice::Iter<'a, i16>),
}

impl Iterator for Samples<'_> {
    type Item = f64;

    #[inline]
    fn next(&mut self) -> Option<f64> {
        match self {
            Self::U8(it) => it.next().map(|&s| f64::from(s)),
            Self::U16(it) => it.next().map(|&s| f64::from(s)),
            Self::I16(it) => it.next().map(|&s| f64::from(s)),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            Self::U8(it) => it.size_hint(),
            Self::U16(it) => it.size_hint(),
            Self::I16(it) => it.size_hint(),
        }
    }
}

impl ExactSizeIterator for Samples<'_> {}

/// Slice `range` out of `buffer` and reinterpret it as samples.
///
/// 8-bit data is always unsigned. 16-bit data is read in the layout's byte
/// order, masked to the stored bits ending at the high bit, and sign-extended
/// when the representation is signed.
///
/// # Errors
///
/// `UnsupportedEncoding` for bit widths other than 8 and 16,
/// `InvalidPixelData` for an odd 16-bit length, an inconsistent bit depth, or a
/// range outside the buffer.
pub fn extract_samples(buffer: &[u8], range: ByteRange, layout: &SampleLayout) -> Result<SampleArray> {
    match layout.bit_depth.allocated {
        8 => Ok(SampleArray::U8(slice_range(buffer, range)?.to_vec())),
        16 => extract_16bit(slice_range(buffer, range)?, layout),
        other => Err(Error::UnsupportedEncoding(format!(
            "{other} bits allocated (expected 8 or 16)"
        ))),
    }
}

fn slice_range(buffer: &[u8], range: ByteRange) -> Result<&[u8]> {
    range.slice(buffer).ok_or_else(|| {
        Error::InvalidPixelData(format!(
            "byte range {}..{} exceeds buffer of {} bytes",
            range.offset,
            range.offset.saturating_add(range.length),
            buffer.len()
        ))
    })
}

fn extract_16bit(bytes: &[u8], layout: &SampleLayout) -> Result<SampleArray> {
    if !bytes.len().is_multiple_of(2) {
        return Err(Error::InvalidPixelData(format!(
            "16-bit pixel data has odd length {}",
            bytes.len()
        )));
    }

    let bits = layout.bit_depth;
    if !bits.is_valid() {
        return Err(Error::InvalidPixelData(format!("inconsistent bit depth {bits}")));
    }

    let shift = bits.high_bit + 1 - bits.stored;
    let mask = if bits.stored >= 16 {
        u16::MAX
    } else {
        (1u16 << bits.stored) - 1
    };

    let raw = bytes.chunks_exact(2).map(|pair| match layout.endianness {
        Endianness::Little => LittleEndian::read_u16(pair),
        Endianness::Big => BigEndian::read_u16(pair),
    });

    if layout.representation.is_signed() {
        let unused = 16 - bits.stored;
        Ok(SampleArray::I16(
            raw.map(|v| ((((v >> shift) & mask) << unused) as i16) >> unused)
                .collect(),
        ))
    } else {
        Ok(SampleArray::U16(raw.map(|v| (v >> shift) & mask).collect()))
    }
}
