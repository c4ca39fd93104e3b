//! Compact binary form of an SML tree.
//!
//! The stream starts with the preamble `BS1` followed by the root element.
//! Every node begins with an unsigned LEB128 varint header:
//!
//! | Header | Meaning |
//! |--------|---------|
//! | `0` | end of the current element |
//! | `len << 2 \| 1` | element start, `len` bytes of UTF-8 name follow |
//! | `len << 2 \| 2` | attribute, `len` bytes of name, then a value count and the values |
//!
//! A value is `0` for null or `len + 1` followed by `len` bytes of UTF-8.
//! Layout whitespace is not stored.

use crate::sml::node::{SmlAttribute, SmlElement, SmlNode};
use crate::{Error, Result};

pub const PREAMBLE: &[u8; 3] = b"BS1";

const END: u64 = 0;
const ELEMENT: u64 = 1;
const ATTRIBUTE: u64 = 2;

fn write_varint(output: &mut Vec<u8>, mut value: u64) {
    loop {
        let byte = (value & 0x7F) as u8;
        value >>= 7;
        if value == 0 {
            output.push(byte);
            return;
        }
        output.push(byte | 0x80);
    }
}

fn write_header(output: &mut Vec<u8>, kind: u64, name: &str) {
    write_varint(output, ((name.len() as u64) << 2) | kind);
    output.extend_from_slice(name.as_bytes());
}

fn write_element(output: &mut Vec<u8>, element: &SmlElement) {
    write_header(output, ELEMENT, &element.name);
    for node in &element.nodes {
        match node {
            SmlNode::Element(child) => write_element(output, child),
            SmlNode::Attribute(attribute) => {
                write_header(output, ATTRIBUTE, &attribute.name);
                write_varint(output, attribute.values.len() as u64);
                for value in &attribute.values {
                    match value {
                        None => write_varint(output, 0),
                        Some(text) => {
                            write_varint(output, text.len() as u64 + 1);
                            output.extend_from_slice(text.as_bytes());
                        }
                    }
                }
            }
        }
    }
    write_varint(output, END);
}

/// Encodes `root` and everything below it.
#[must_use]
pub fn encode(root: &SmlElement) -> Vec<u8> {
    let mut output = Vec::with_capacity(256);
    output.extend_from_slice(PREAMBLE);
    write_element(&mut output, root);
    output
}

struct Reader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    fn read_varint(&mut self) -> Result<u64> {
        let start = self.offset;
        let mut value = 0u64;
        let mut shift = 0u32;
        loop {
            let byte = *self
                .bytes
                .get(self.offset)
                .ok_or_else(|| Error::binary(self.offset, "Unexpected end of data"))?;
            self.offset += 1;
            if shift >= 64 || (shift == 63 && byte & 0x7E != 0) {
                return Err(Error::binary(start, "Varint overflow"));
            }
            value |= u64::from(byte & 0x7F) << shift;
            if byte & 0x80 == 0 {
                return Ok(value);
            }
            shift += 7;
        }
    }

    fn read_length(&mut self, value: u64) -> Result<usize> {
        usize::try_from(value)
            .ok()
            .filter(|len| self.bytes.len() - self.offset >= *len)
            .ok_or_else(|| Error::binary(self.offset, "Length exceeds remaining data"))
    }

    fn read_string(&mut self, len: usize) -> Result<String> {
        let start = self.offset;
        let slice = &self.bytes[start..start + len];
        self.offset += len;
        String::from_utf8(slice.to_vec()).map_err(|_| Error::binary(start, "Invalid UTF-8"))
    }

    fn read_attribute(&mut self, name: String) -> Result<SmlAttribute> {
        let count = self.read_varint()?;
        let count = self.read_length(count)?;
        if count == 0 {
            return Err(Error::binary(self.offset, "Attribute without values"));
        }
        let mut values = Vec::with_capacity(count);
        for _ in 0..count {
            let header = self.read_varint()?;
            if header == 0 {
                values.push(None);
            } else {
                let len = self.read_length(header - 1)?;
                values.push(Some(self.read_string(len)?));
            }
        }
        Ok(SmlAttribute::from_parts(name, values))
    }
}

/// Decodes a tree written by [`encode`].
///
/// # Errors
///
/// Returns [`Error::Binary`] with the failing byte offset for a missing
/// preamble, truncated data, invalid UTF-8, unknown node kinds or trailing bytes.
pub fn decode(bytes: &[u8]) -> Result<SmlElement> {
    if !bytes.starts_with(PREAMBLE) {
        return Err(Error::binary(0, "Missing BS1 preamble"));
    }
    let mut reader = Reader {
        bytes,
        offset: PREAMBLE.len(),
    };

    let mut open: Vec<SmlElement> = Vec::new();
    loop {
        let position = reader.offset;
        let header = reader.read_varint()?;
        if header == END {
            let closed = open
                .pop()
                .ok_or_else(|| Error::binary(position, "Unexpected element end"))?;
            match open.last_mut() {
                Some(parent) => parent.add_element(closed),
                None => {
                    if reader.offset != bytes.len() {
                        return Err(Error::binary(reader.offset, "Trailing data after root"));
                    }
                    tracing::trace!(bytes = bytes.len(), root = %closed.name, "decoded binary SML");
                    return Ok(closed);
                }
            }
            continue;
        }

        let len = reader.read_length(header >> 2)?;
        let name = reader.read_string(len)?;
        match header & 0b11 {
            ELEMENT => open.push(SmlElement::new(name)),
            ATTRIBUTE => {
                let attribute = reader.read_attribute(name)?;
                let parent = open
                    .last_mut()
                    .ok_or_else(|| Error::binary(position, "Attribute outside of an element"))?;
                parent.push_attribute(attribute);
            }
            _ => return Err(Error::binary(position, "Unknown node kind")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_varint_boundaries() {
        for value in [0u64, 1, 127, 128, 300, u64::from(u32::MAX), u64::MAX] {
            let mut output = Vec::new();
            write_varint(&mut output, value);
            let mut reader = Reader {
                bytes: &output,
                offset: 0,
            };
            assert_eq!(reader.read_varint().unwrap(), value);
            assert_eq!(reader.offset, output.len());
        }
    }

    #[test]
    fn test_encode_layout() {
        let mut root = SmlElement::new("T");
        root.add_attribute("A", vec![None, Some("xy".to_string())])
            .unwrap();
        assert_eq!(
            encode(&root),
            vec![b'B', b'S', b'1', 0x05, b'T', 0x06, b'A', 0x02, 0x00, 0x03, b'x', b'y', 0x00]
        );
    }

    #[test]
    fn test_decode_nested() {
        let mut root = SmlElement::new("Tables");
        let mut table = SmlElement::new("Table");
        table
            .add_attribute("Column1", vec![Some("Column2".to_string())])
            .unwrap();
        root.add_element(table);
        assert_eq!(decode(&encode(&root)).unwrap(), root);
    }

    #[test]
    fn test_decode_errors() {
        assert!(matches!(decode(b"XX1"), Err(Error::Binary { offset: 0, .. })));
        assert!(decode(b"BS1").is_err());
        assert!(decode(&[b'B', b'S', b'1', 0x05, b'T']).is_err());
        assert!(decode(&[b'B', b'S', b'1', 0x05, b'T', 0x00, 0x00]).is_err());
        assert!(decode(&[b'B', b'S', b'1', 0x07, b'T', 0x00]).is_err());
        assert!(decode(&[b'B', b'S', b'1', 0x05, 0xFF, 0x00]).is_err());
    }
}
