//! # tbl
//!
//! Reading and writing TBL table documents.
//!
//! ## What is TBL?
//!
//! TBL is a plain-text table format built on SML, the Simple Markup Language.
//! A table is a `Table` element whose first line holds the column names and
//! whose following lines hold the rows. Cells are nullable strings. Tables can
//! carry metadata and can be grouped into a `Tables` collection.
//!
//! ```text
//! Table
//!     Column1 Column2 Column3
//!     "Long Value 11" Value12
//!     Value21 -
//! End
//! ```
//!
//! ## Key Features
//!
//! - **Validated model**: tables always have at least two columns, and rows are
//!   checked as they are added or parsed
//! - **Several layouts**: plain, column-aligned (optionally right-aligned per
//!   column) and minified text
//! - **Transport forms**: UTF-8/16/32 bytes with byte-order mark, base64, and a
//!   compact binary form of the underlying tree
//! - **Metadata**: titles, descriptions, keywords, per-column metadata, ordered
//!   case-insensitive custom properties and opaque custom data
//! - **Serde support**: every model type serializes, and deserialized tables are
//!   validated like parsed ones
//!
//! ## Quick Start
//!
//! ```rust
//! use tbl::TblDocument;
//!
//! let mut document = TblDocument::new(&["Column1", "Column2", "Column3"]).unwrap();
//! document.add_row(&[Some("Long Value 11"), Some("Value12")]).unwrap();
//! document.add_row(&[Some("Value21"), None]).unwrap();
//!
//! assert_eq!(
//!     document.to_aligned_string(),
//!     "Table\n\tColumn1         Column2 Column3\n\t\"Long Value 11\" Value12\n\tValue21         -\nEnd"
//! );
//!
//! let parsed: TblDocument = tbl::from_str(&document.to_string()).unwrap();
//! assert_eq!(parsed, document);
//! ```
//!
//! ### Collections of tables
//!
//! ```rust
//! use tbl::{TblDocument, TblsDocument};
//!
//! let mut tables = TblsDocument::new();
//! tables.meta.description = Some("Text".to_string());
//! tables.tables.push(TblDocument::new(&["Column1", "Column2"]).unwrap());
//!
//! assert_eq!(
//!     tables.to_minified_string(),
//!     "Tables\nMeta\nDescription Text\n-\nTable\nColumn1 Column2\n-\n-"
//! );
//! ```
//!
//! ## Safety Guarantees
//!
//! - No `unsafe` code blocks
//! - Parsing is all-or-nothing: the first violation is returned as an [`Error`]
//! - Accessors hand out borrowed views, so the model can only change through
//!   its validating methods
//!
//! ## Format Reference
//!
//! See the [`format`] module for the complete description of the format.

pub mod custom_data;
pub mod encoding;
pub mod error;
pub mod format;
pub mod macros;
pub mod meta;
pub mod options;
pub mod properties;
pub mod sml;
pub mod table;
pub mod tables;

pub use custom_data::CustomData;
pub use encoding::Encoding;
pub use error::{Error, Result};
pub use meta::{TblColumnMetaData, TblMetaData, TblsMetaData};
pub use options::FormatOptions;
pub use properties::CustomProperties;
pub use table::{Cell, TblDocument, TblMetaDataMut};
pub use tables::TblsDocument;

use sml::SmlElement;
use std::io;

/// A document that can be projected onto, and read back from, an SML tree.
///
/// Implemented by [`TblDocument`] and [`TblsDocument`]; the root functions of
/// this crate accept either.
pub trait Document: Sized {
    /// Reads the document from its root element.
    ///
    /// # Errors
    ///
    /// Returns an error if the element does not describe a valid document.
    fn from_element(element: &SmlElement, encoding: Encoding) -> Result<Self>;

    /// Projects the document onto its root element.
    fn to_element(&self, options: &FormatOptions) -> SmlElement;

    /// Encoding used for byte output.
    fn encoding(&self) -> Encoding;
}

impl Document for TblDocument {
    fn from_element(element: &SmlElement, encoding: Encoding) -> Result<Self> {
        TblDocument::parse_element(element, encoding)
    }

    fn to_element(&self, options: &FormatOptions) -> SmlElement {
        TblDocument::to_element(self, options)
    }

    fn encoding(&self) -> Encoding {
        self.encoding
    }
}

impl Document for TblsDocument {
    fn from_element(element: &SmlElement, encoding: Encoding) -> Result<Self> {
        TblsDocument::parse_element(element, encoding)
    }

    fn to_element(&self, options: &FormatOptions) -> SmlElement {
        TblsDocument::to_element(self, options)
    }

    fn encoding(&self) -> Encoding {
        self.encoding
    }
}

/// Prints a document as plain text.
///
/// # Examples
///
/// ```rust
/// use tbl::TblDocument;
///
/// let document = TblDocument::new(&["Column1", "Column2"]).unwrap();
/// assert_eq!(tbl::to_string(&document), "Table\n\tColumn1 Column2\nEnd");
/// ```
#[must_use]
pub fn to_string<D: Document>(document: &D) -> String {
    to_string_with_options(document, &FormatOptions::default())
}

/// Prints a document as text laid out per `options`.
///
/// # Examples
///
/// ```rust
/// use tbl::{FormatOptions, TblDocument};
///
/// let mut document = TblDocument::new(&["A", "B"]).unwrap();
/// document.add_row(&[Some("Long"), Some("x")]).unwrap();
///
/// let text = tbl::to_string_with_options(&document, &FormatOptions::aligned());
/// assert_eq!(text, "Table\n\tA    B\n\tLong x\nEnd");
/// ```
#[must_use]
pub fn to_string_with_options<D: Document>(document: &D, options: &FormatOptions) -> String {
    sml::ser::to_string(&document.to_element(options), &sml::PrintOptions::default())
}

/// Writes a document as plain text in its own encoding, byte-order mark
/// included.
///
/// # Examples
///
/// ```rust
/// use tbl::TblDocument;
///
/// let document = TblDocument::new(&["A", "B"]).unwrap();
/// let mut buffer = Vec::new();
/// tbl::to_writer(&mut buffer, &document).unwrap();
/// assert_eq!(&buffer[..3], &[0xEF, 0xBB, 0xBF]);
/// ```
///
/// # Errors
///
/// Returns [`Error::Io`] if writing fails.
pub fn to_writer<W, D>(mut writer: W, document: &D) -> Result<()>
where
    W: io::Write,
    D: Document,
{
    let bytes = encoding::encode(&to_string(document), document.encoding());
    writer
        .write_all(&bytes)
        .map_err(|e| Error::io(&e.to_string()))?;
    Ok(())
}

/// Parses a UTF-8 document from text.
///
/// # Examples
///
/// ```rust
/// use tbl::{TblDocument, TblsDocument};
///
/// let table: TblDocument = tbl::from_str("Table\n\tColumn1 Column2\nEnd").unwrap();
/// assert_eq!(table.column_count(), 2);
///
/// let tables: TblsDocument = tbl::from_str("Tables\nEnd").unwrap();
/// assert!(tables.tables.is_empty());
/// ```
///
/// # Errors
///
/// Returns [`Error::Syntax`] for malformed text, or the validation error of
/// the document type.
pub fn from_str<D: Document>(s: &str) -> Result<D> {
    D::from_element(&SmlElement::parse(s)?, Encoding::Utf8)
}

/// Parses an encoded document, detecting its encoding from the byte-order
/// mark.
///
/// # Examples
///
/// ```rust
/// use tbl::{Encoding, TblDocument};
///
/// let mut document = TblDocument::new(&["A", "B"]).unwrap();
/// document.encoding = Encoding::Utf16;
///
/// let parsed: TblDocument = tbl::from_slice(&document.to_bytes()).unwrap();
/// assert_eq!(parsed.encoding, Encoding::Utf16);
/// ```
///
/// # Errors
///
/// Returns [`Error::Encoding`] for undecodable bytes, otherwise as [`from_str`].
pub fn from_slice<D: Document>(bytes: &[u8]) -> Result<D> {
    let (text, encoding) = encoding::decode(bytes)?;
    D::from_element(&SmlElement::parse(&text)?, encoding)
}

/// Reads an encoded document from an I/O stream.
///
/// # Examples
///
/// ```rust
/// use std::io::Cursor;
/// use tbl::TblDocument;
///
/// let cursor = Cursor::new(b"Table\n\tA B\nEnd".to_vec());
/// let document: TblDocument = tbl::from_reader(cursor).unwrap();
/// assert_eq!(document.column_names(), &["A", "B"]);
/// ```
///
/// # Errors
///
/// Returns [`Error::Io`] if reading fails, otherwise as [`from_slice`].
pub fn from_reader<R, D>(mut reader: R) -> Result<D>
where
    R: io::Read,
    D: Document,
{
    let mut bytes = Vec::new();
    reader
        .read_to_end(&mut bytes)
        .map_err(|e| Error::io(&e.to_string()))?;
    from_slice(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn sample() -> TblDocument {
        let mut document = TblDocument::new(&["Column1", "Column2", "Column3"]).unwrap();
        document
            .add_row(&[Some("Long Value 11"), Some("Value12")])
            .unwrap();
        document.add_row(&[Some("Value21"), None]).unwrap();
        document
    }

    #[test]
    fn test_writer_reader_round_trip() {
        for encoding in [
            Encoding::Utf8,
            Encoding::Utf16,
            Encoding::Utf16Reverse,
            Encoding::Utf32,
        ] {
            let mut document = sample();
            document.encoding = encoding;
            let mut buffer = Vec::new();
            to_writer(&mut buffer, &document).unwrap();
            let back: TblDocument = from_reader(Cursor::new(buffer)).unwrap();
            assert_eq!(back, document);
        }
    }

    #[test]
    fn test_root_functions_match_methods() {
        let document = sample();
        assert_eq!(to_string(&document), document.to_string());
        let options = FormatOptions::aligned().with_whitespace_between("  ");
        assert_eq!(
            to_string_with_options(&document, &options),
            document.to_string_with_options(&options)
        );
    }

    #[test]
    fn test_from_str_wrong_document_kind() {
        assert!(matches!(
            from_str::<TblsDocument>("Table\n\tA B\nEnd"),
            Err(Error::WrongNodeKind { .. })
        ));
        assert!(matches!(
            from_str::<TblDocument>("Tables\nEnd"),
            Err(Error::WrongNodeKind { .. })
        ));
    }

    #[test]
    fn test_from_slice_invalid_utf8() {
        assert!(matches!(
            from_slice::<TblDocument>(&[0xEF, 0xBB, 0xBF, 0xFF, 0xFE, 0xFD]),
            Err(Error::Encoding(_))
        ));
    }

    #[test]
    fn test_reader_error() {
        struct Failing;
        impl io::Read for Failing {
            fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::Other, "boom"))
            }
        }
        assert!(matches!(
            from_reader::<_, TblDocument>(Failing),
            Err(Error::Io(_))
        ));
    }
}
