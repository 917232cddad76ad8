//! Part-10 container walking and the element catalog
//!
//! The parser never copies element values. It records where each catalogued
//! element lives in the caller's buffer and reads typed values on demand.

use super::tags::ElementTag;
use crate::error::{Error, Result};
use crate::types::{Endianness, TransferSyntax};
use byteorder::{BigEndian, ByteOrder, LittleEndian};
use dicom::core::header::{Header as _, SequenceItemHeader};
use dicom::core::{DataElementHeader, Tag, VR};
use dicom::dictionary_std::tags;
use dicom::encoding::decode::{self as element_decode, DecodeFrom};
use dicom::encoding::TransferSyntaxIndex;
use dicom::transfer_syntax::TransferSyntaxRegistry;
use log::{debug, trace, warn};
use std::collections::HashMap;

const PREAMBLE_LEN: usize = 128;
const MAGIC: &[u8; 4] = b"DICM";
const ITEM_HEADER_LEN: usize = 8;
const MAX_SEQUENCE_DEPTH: usize = 64;

/// Location of an element value inside the buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub offset: usize,
    pub length: usize,
}

impl ByteRange {
    #[must_use]
    pub fn new(offset: usize, length: usize) -> Self {
        Self { offset, length }
    }

    #[inline]
    #[must_use]
    pub fn end(&self) -> usize {
        self.offset + self.length
    }

    /// Borrow the range from `buffer`, or `None` if it does not fit
    #[must_use]
    pub fn slice<'a>(&self, buffer: &'a [u8]) -> Option<&'a [u8]> {
        let end = self.offset.checked_add(self.length)?;
        buffer.get(self.offset..end)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementDescriptor {
    pub range: ByteRange,
    pub vr: VR,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stop {
    EndOfBuffer,
    ItemDelimitation,
}

/// Index of the catalogued elements in one container
#[derive(Debug, Clone)]
pub struct ElementCatalog<'a> {
    buffer: &'a [u8],
    transfer_syntax: TransferSyntax,
    endianness: Endianness,
    elements: HashMap<ElementTag, ElementDescriptor>,
}

impl<'a> ElementCatalog<'a> {
    /// Walk the container and index the catalogued top-level elements.
    ///
    /// # Errors
    ///
    /// `MalformedContainer` when the framing is broken or truncated, and
    /// `UnsupportedEncoding` for transfer syntaxes other than the native
    /// little/big endian ones.
    pub fn parse(buffer: &'a [u8]) -> Result<Self> {
        if buffer.len() < PREAMBLE_LEN + MAGIC.len() {
            return Err(Error::MalformedContainer(format!(
                "buffer of {} bytes is too short for the preamble and DICM magic",
                buffer.len()
            )));
        }
        if &buffer[PREAMBLE_LEN..PREAMBLE_LEN + MAGIC.len()] != MAGIC {
            return Err(Error::MalformedContainer(
                "missing DICM magic after the 128-byte preamble".to_string(),
            ));
        }

        let (transfer_syntax, dataset_offset) = read_file_meta(buffer)?;
        let endianness = transfer_syntax.native_encoding().ok_or_else(|| {
            Error::UnsupportedEncoding(format!("transfer syntax {transfer_syntax}"))
        })?;
        let decoder = TransferSyntaxRegistry
            .get(&transfer_syntax.uid)
            .and_then(|ts| ts.decoder_for::<&'a [u8]>())
            .ok_or_else(|| {
                Error::UnsupportedEncoding(format!("no element decoder for {transfer_syntax}"))
            })?;
        debug!("transfer syntax {transfer_syntax}, dataset starts at offset {dataset_offset}");

        let walker = Walker {
            buffer,
            decoder: &*decoder,
        };
        let mut elements = HashMap::new();
        walker.walk(dataset_offset, Stop::EndOfBuffer, 0, Some(&mut elements))?;
        debug!("catalogued {} of {} known elements", elements.len(), ElementTag::ALL.len());

        Ok(Self {
            buffer,
            transfer_syntax,
            endianness,
            elements,
        })
    }

    #[must_use]
    pub fn buffer(&self) -> &'a [u8] {
        self.buffer
    }

    #[must_use]
    pub fn transfer_syntax(&self) -> &TransferSyntax {
        &self.transfer_syntax
    }

    #[must_use]
    pub fn endianness(&self) -> Endianness {
        self.endianness
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    #[must_use]
    pub fn contains(&self, tag: ElementTag) -> bool {
        self.elements.contains_key(&tag)
    }

    #[must_use]
    pub fn descriptor(&self, tag: ElementTag) -> Option<&ElementDescriptor> {
        self.elements.get(&tag)
    }

    /// Read a required US value.
    ///
    /// # Errors
    ///
    /// `MissingElement` if absent, `MalformedContainer` if shorter than two bytes.
    pub fn read_u16(&self, tag: ElementTag) -> Result<u16> {
        self.read_u16_opt(tag)?.ok_or(Error::MissingElement(tag))
    }

    /// Read a US value, falling back to `default` when the element is absent
    pub fn read_u16_or(&self, tag: ElementTag, default: u16) -> Result<u16> {
        Ok(self.read_u16_opt(tag)?.unwrap_or(default))
    }

    /// First value of a decimal string. Absent, empty or unparsable values are `None`.
    #[must_use]
    pub fn read_float_string(&self, tag: ElementTag) -> Option<f64> {
        let text = self.read_string(tag)?;
        let first = text.split('\\').next().unwrap_or_default().trim();
        match first.parse::<f64>() {
            Ok(value) if value.is_finite() => Some(value),
            _ => {
                warn!("ignoring unparsable {tag} value {first:?}");
                None
            }
        }
    }

    /// First value of an integer string
    #[must_use]
    pub fn read_int_string(&self, tag: ElementTag) -> Option<i64> {
        let text = self.read_string(tag)?;
        let first = text.split('\\').next().unwrap_or_default().trim();
        first.parse::<i64>().ok()
    }

    /// Text value with padding removed; empty values are `None`
    #[must_use]
    pub fn read_string(&self, tag: ElementTag) -> Option<String> {
        let bytes = self.value(tag)?;
        let text = String::from_utf8_lossy(bytes);
        let trimmed = text.trim_matches(|c: char| c == ' ' || c == '\0');
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }

    /// Location of an element's value in the buffer.
    ///
    /// # Errors
    ///
    /// `MissingElement` if the element is absent.
    pub fn read_byte_range(&self, tag: ElementTag) -> Result<ByteRange> {
        self.elements
            .get(&tag)
            .map(|descriptor| descriptor.range)
            .ok_or(Error::MissingElement(tag))
    }

    fn value(&self, tag: ElementTag) -> Option<&'a [u8]> {
        self.elements
            .get(&tag)
            .and_then(|descriptor| descriptor.range.slice(self.buffer))
    }

    fn read_u16_opt(&self, tag: ElementTag) -> Result<Option<u16>> {
        let Some(bytes) = self.value(tag) else {
            return Ok(None);
        };
        if bytes.len() < 2 {
            return Err(Error::MalformedContainer(format!(
                "{tag} holds {} bytes, expected 2",
                bytes.len()
            )));
        }
        Ok(Some(match self.endianness {
            Endianness::Little => LittleEndian::read_u16(bytes),
            Endianness::Big => BigEndian::read_u16(bytes),
        }))
    }
}

/// Reads the file meta group and returns the transfer syntax and the offset
/// of the first dataset element
fn read_file_meta(buffer: &[u8]) -> Result<(TransferSyntax, usize)> {
    let decoder = element_decode::file_header_decoder();
    let meta = Walker {
        buffer,
        decoder: &decoder,
    };
    let mut offset = PREAMBLE_LEN + MAGIC.len();
    let mut transfer_syntax = None;

    while meta.peek_tag(offset).is_some_and(|tag| tag.group() == 0x0002) {
        let (header, header_len) = meta.read_header(offset)?;
        let Some(length) = header.len.get() else {
            return Err(Error::MalformedContainer(format!(
                "undefined length for meta element {} at offset {offset}",
                fmt_tag(header.tag)
            )));
        };
        let range = meta.value_range(offset + header_len, length)?;
        if header.tag == tags::TRANSFER_SYNTAX_UID {
            let uid = String::from_utf8_lossy(&buffer[range.offset..range.end()]);
            transfer_syntax = Some(TransferSyntax::from_uid(&uid));
        }
        offset = range.end();
    }

    let transfer_syntax = transfer_syntax.ok_or_else(|| {
        Error::MalformedContainer("file meta group has no Transfer Syntax UID".to_string())
    })?;
    Ok((transfer_syntax, offset))
}

fn fmt_tag(tag: Tag) -> String {
    format!("({:04X},{:04X})", tag.group(), tag.element())
}

fn truncated(offset: usize, wanted: usize) -> Error {
    Error::MalformedContainer(format!(
        "truncated: {wanted} bytes needed at offset {offset}"
    ))
}

fn bad_header(offset: usize, error: &element_decode::Error) -> Error {
    Error::MalformedContainer(format!(
        "truncated or invalid header at offset {offset}: {error}"
    ))
}

/// Offset-tracking cursor over the buffer; header decoding is delegated to the
/// transfer syntax's element decoder
#[derive(Clone, Copy)]
struct Walker<'a, 'd> {
    buffer: &'a [u8],
    decoder: &'d dyn DecodeFrom<&'a [u8]>,
}

impl<'a> Walker<'a, '_> {
    fn source_at(&self, offset: usize) -> Result<&'a [u8]> {
        self.buffer.get(offset..).ok_or_else(|| truncated(offset, 0))
    }

    fn peek_tag(&self, offset: usize) -> Option<Tag> {
        let mut source = self.buffer.get(offset..)?;
        self.decoder.decode_tag(&mut source).ok()
    }

    fn value_range(&self, offset: usize, length: u32) -> Result<ByteRange> {
        let range = ByteRange::new(offset, length as usize);
        range
            .slice(self.buffer)
            .map(|_| range)
            .ok_or_else(|| truncated(offset, range.length))
    }

    /// Decodes the element header at `offset`, returning it with its size in bytes
    fn read_header(&self, offset: usize) -> Result<(DataElementHeader, usize)> {
        let mut source = self.source_at(offset)?;
        self.decoder
            .decode_header(&mut source)
            .map_err(|e| bad_header(offset, &e))
    }

    fn read_item_header(&self, offset: usize) -> Result<SequenceItemHeader> {
        let mut source = self.source_at(offset)?;
        self.decoder
            .decode_item_header(&mut source)
            .map_err(|e| bad_header(offset, &e))
    }

    /// Walks data elements from `offset` until `stop`, returning the offset
    /// just past the last consumed byte
    fn walk(
        &self,
        mut offset: usize,
        stop: Stop,
        depth: usize,
        mut catalog: Option<&mut HashMap<ElementTag, ElementDescriptor>>,
    ) -> Result<usize> {
        loop {
            if stop == Stop::EndOfBuffer && offset == self.buffer.len() {
                return Ok(offset);
            }

            let (header, header_len) = self.read_header(offset)?;
            let value_offset = offset + header_len;

            if header.is_item_delimiter() {
                if stop == Stop::ItemDelimitation {
                    return Ok(value_offset);
                }
                return Err(Error::MalformedContainer(format!(
                    "unexpected item delimitation at offset {offset}"
                )));
            }

            let Some(length) = header.len.get() else {
                if header.is_encapsulated_pixeldata() && depth == 0 {
                    return Err(Error::UnsupportedEncoding(
                        "encapsulated (compressed) pixel data".to_string(),
                    ));
                }
                trace!("skipping undefined-length element {} at offset {offset}", fmt_tag(header.tag));
                let force_implicit = header.vr == VR::UN;
                offset = self.skip_sequence(value_offset, depth + 1, force_implicit)?;
                continue;
            };

            let range = self.value_range(value_offset, length)?;
            if let Some(catalog) = catalog.as_deref_mut()
                && let Some(known) = ElementTag::from_tag(header.tag)
            {
                catalog.entry(known).or_insert(ElementDescriptor { range, vr: header.vr });
            }
            offset = range.end();
        }
    }

    /// Skips the items of an undefined-length sequence, returning the offset
    /// just past its delimitation item
    fn skip_sequence(&self, mut offset: usize, depth: usize, force_implicit: bool) -> Result<usize> {
        if depth > MAX_SEQUENCE_DEPTH {
            return Err(Error::MalformedContainer(format!(
                "sequences nested deeper than {MAX_SEQUENCE_DEPTH} levels"
            )));
        }

        // Undefined-length UN content is always implicit VR little endian
        let implicit = element_decode::default_reader();
        let walker = if force_implicit {
            Walker {
                buffer: self.buffer,
                decoder: &implicit,
            }
        } else {
            *self
        };

        loop {
            let item = walker.read_item_header(offset)?;
            offset += ITEM_HEADER_LEN;

            match item {
                SequenceItemHeader::SequenceDelimiter => return Ok(offset),
                SequenceItemHeader::Item { len } => {
                    offset = match len.get() {
                        Some(length) => walker.value_range(offset, length)?.end(),
                        None => walker.walk(offset, Stop::ItemDelimitation, depth, None)?,
                    };
                }
                SequenceItemHeader::ItemDelimiter => {
                    return Err(Error::MalformedContainer(format!(
                        "item delimitation outside an item at offset {}",
                        offset - ITEM_HEADER_LEN
                    )));
                }
            }
        }
    }
}
