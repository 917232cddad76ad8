//! Synthetic Part-10 containers for unit tests

use byteorder::{BigEndian, LittleEndian, WriteBytesExt};
use dicom::core::Tag;
use dicom::dictionary_std::tags;

pub(crate) const IMPLICIT_VR_LE: &str = "1.2.840.10008.1.2";
pub(crate) const EXPLICIT_VR_LE: &str = "1.2.840.10008.1.2.1";
pub(crate) const EXPLICIT_VR_BE: &str = "1.2.840.10008.1.2.2";

const LONG_LENGTH_VRS: [&[u8; 2]; 13] = [
    b"OB", b"OD", b"OF", b"OL", b"OV", b"OW", b"SQ", b"SV", b"UC", b"UN", b"UR", b"UT", b"UV",
];

/// Writes a preamble, a file meta group and dataset elements in the order they are added
pub(crate) struct DicomBuilder {
    transfer_syntax: &'static str,
    big_endian: bool,
    explicit_vr: bool,
    dataset: Vec<u8>,
}

impl DicomBuilder {
    pub(crate) fn new(transfer_syntax: &'static str) -> Self {
        Self {
            transfer_syntax,
            big_endian: transfer_syntax == EXPLICIT_VR_BE,
            explicit_vr: transfer_syntax != IMPLICIT_VR_LE,
            dataset: Vec::new(),
        }
    }

    pub(crate) fn explicit_le() -> Self {
        Self::new(EXPLICIT_VR_LE)
    }

    /// Minimal grayscale image header without pixel data.
    ///
    /// Pixel Representation is left out so tests can add it once; the parser
    /// keeps the first occurrence of a tag.
    pub(crate) fn image(self, rows: u16, cols: u16, bits_allocated: u16) -> Self {
        self.us(tags::ROWS, rows)
            .us(tags::COLUMNS, cols)
            .us(tags::BITS_ALLOCATED, bits_allocated)
            .us(tags::BITS_STORED, bits_allocated)
            .us(tags::HIGH_BIT, bits_allocated - 1)
    }

    pub(crate) fn us(self, tag: Tag, value: u16) -> Self {
        let mut bytes = Vec::new();
        self.put_u16(&mut bytes, value);
        self.element(tag, b"US", &bytes)
    }

    pub(crate) fn text(self, tag: Tag, vr: &[u8; 2], value: &str) -> Self {
        self.element(tag, vr, value.as_bytes())
    }

    pub(crate) fn pixels_u8(self, values: &[u8]) -> Self {
        self.element(tags::PIXEL_DATA, b"OB", values)
    }

    pub(crate) fn pixels_u16(self, values: &[u16]) -> Self {
        let mut bytes = Vec::with_capacity(values.len() * 2);
        for &value in values {
            self.put_u16(&mut bytes, value);
        }
        self.element(tags::PIXEL_DATA, b"OW", &bytes)
    }

    pub(crate) fn pixels_i16(self, values: &[i16]) -> Self {
        let raw: Vec<u16> = values.iter().map(|&v| v as u16).collect();
        self.pixels_u16(&raw)
    }

    /// Undefined-length sequence holding one undefined-length item
    pub(crate) fn sequence(mut self, tag: Tag, item: DicomBuilder) -> Self {
        let mut out = Vec::new();
        self.put_header(&mut out, tag, b"SQ", u32::MAX);
        self.put_raw_tag(&mut out, 0xFFFE, 0xE000);
        self.put_u32(&mut out, u32::MAX);
        out.extend_from_slice(&item.dataset);
        self.put_raw_tag(&mut out, 0xFFFE, 0xE00D);
        self.put_u32(&mut out, 0);
        self.put_raw_tag(&mut out, 0xFFFE, 0xE0DD);
        self.put_u32(&mut out, 0);
        self.dataset.extend_from_slice(&out);
        self
    }

    pub(crate) fn element(mut self, tag: Tag, vr: &[u8; 2], value: &[u8]) -> Self {
        let mut padded = value.to_vec();
        if padded.len() % 2 == 1 {
            let pad = match vr {
                b"UI" | b"OB" | b"OW" => 0,
                _ => b' ',
            };
            padded.push(pad);
        }
        let mut out = Vec::new();
        self.put_header(&mut out, tag, vr, padded.len() as u32);
        out.extend_from_slice(&padded);
        self.dataset.extend_from_slice(&out);
        self
    }

    /// Raw bytes appended after the last element
    pub(crate) fn trailing(mut self, bytes: &[u8]) -> Self {
        self.dataset.extend_from_slice(bytes);
        self
    }

    pub(crate) fn build(&self) -> Vec<u8> {
        let mut out = vec![0u8; 128];
        out.extend_from_slice(b"DICM");

        let mut uid = self.transfer_syntax.as_bytes().to_vec();
        if uid.len() % 2 == 1 {
            uid.push(0);
        }
        out.write_u16::<LittleEndian>(0x0002).unwrap();
        out.write_u16::<LittleEndian>(0x0010).unwrap();
        out.extend_from_slice(b"UI");
        out.write_u16::<LittleEndian>(uid.len() as u16).unwrap();
        out.extend_from_slice(&uid);

        out.extend_from_slice(&self.dataset);
        out
    }

    fn put_header(&self, out: &mut Vec<u8>, tag: Tag, vr: &[u8; 2], length: u32) {
        self.put_raw_tag(out, tag.group(), tag.element());
        if !self.explicit_vr {
            self.put_u32(out, length);
        } else if LONG_LENGTH_VRS.contains(&vr) {
            out.extend_from_slice(vr);
            out.extend_from_slice(&[0, 0]);
            self.put_u32(out, length);
        } else {
            out.extend_from_slice(vr);
            self.put_u16(out, length as u16);
        }
    }

    fn put_raw_tag(&self, out: &mut Vec<u8>, group: u16, element: u16) {
        self.put_u16(out, group);
        self.put_u16(out, element);
    }

    fn put_u16(&self, out: &mut Vec<u8>, value: u16) {
        if self.big_endian {
            out.write_u16::<BigEndian>(value).unwrap();
        } else {
            out.write_u16::<LittleEndian>(value).unwrap();
        }
    }

    fn put_u32(&self, out: &mut Vec<u8>, value: u32) {
        if self.big_endian {
            out.write_u32::<BigEndian>(value).unwrap();
        } else {
            out.write_u32::<LittleEndian>(value).unwrap();
        }
    }
}
