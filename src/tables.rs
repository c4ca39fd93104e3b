//! Collections of tables.
//!
//! A [`TblsDocument`] is a `Tables` element holding an optional `Meta`
//! element followed by any number of `Table` elements:
//!
//! ```text
//! Tables
//!     Meta
//!         Description Text
//!     End
//!     Table
//!         Column1 Column2
//!         V11 V12
//!     End
//! End
//! ```

use crate::encoding::{self, Encoding};
use crate::meta::TblsMetaData;
use crate::options::FormatOptions;
use crate::sml::{self, binary, PrintOptions, SmlElement};
use crate::table::{parse_leading_meta, TblDocument, TABLE};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const TABLES: &str = "Tables";

/// An ordered collection of tables with collection-level metadata.
///
/// # Examples
///
/// ```rust
/// use tbl::{TblDocument, TblsDocument};
///
/// let mut document = TblsDocument::new();
/// document.tables.push(TblDocument::new(&["Column1", "Column2"]).unwrap());
/// assert_eq!(
///     document.to_string(),
///     "Tables\n\tTable\n\t\tColumn1 Column2\n\tEnd\nEnd"
/// );
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TblsDocument {
    #[serde(default)]
    pub encoding: Encoding,
    #[serde(default)]
    pub tables: Vec<TblDocument>,
    #[serde(default)]
    pub meta: TblsMetaData,
}

impl TblsDocument {
    /// Creates an empty UTF-8 collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_tables(tables: Vec<TblDocument>) -> Self {
        TblsDocument {
            tables,
            ..Self::default()
        }
    }

    /// Projects the collection onto a `Tables` element.
    ///
    /// Every table is laid out with the alignment and spacing of `options`.
    /// A right-alignment mask is not passed on, since tables differ in their
    /// columns.
    #[must_use]
    pub fn to_element(&self, options: &FormatOptions) -> SmlElement {
        let mut element = SmlElement::new(TABLES);
        if self.meta.has_any() {
            let mut meta = self.meta.to_element();
            FormatOptions::apply_to_meta(&mut meta);
            element.add_element(meta);
        }
        let table_options = options.without_right_aligned();
        for table in &self.tables {
            element.add_element(table.to_element(&table_options));
        }
        element
    }

    #[must_use]
    pub fn to_string_with_options(&self, options: &FormatOptions) -> String {
        sml::ser::to_string(&self.to_element(options), &PrintOptions::default())
    }

    #[must_use]
    pub fn to_aligned_string(&self) -> String {
        self.to_string_with_options(&FormatOptions::aligned())
    }

    #[must_use]
    pub fn to_minified_string(&self) -> String {
        sml::ser::to_string(&self.to_element(&FormatOptions::new()), &PrintOptions::minified())
    }

    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        tracing::debug!(
            encoding = ?self.encoding,
            tables = self.tables.len(),
            "encoding tables document"
        );
        encoding::encode(&self.to_string(), self.encoding)
    }

    #[must_use]
    pub fn to_base64_string(&self) -> String {
        encoding::to_base64_string(&self.to_string(), self.encoding)
    }

    #[must_use]
    pub fn to_binary_tbls(&self) -> Vec<u8> {
        binary::encode(&self.to_element(&FormatOptions::new()))
    }

    /// Reads a collection from a `Tables` element. Child nodes other than
    /// `Meta` and `Table` elements are ignored.
    ///
    /// # Errors
    ///
    /// - [`Error::WrongNodeKind`] if the element is not named `Tables`
    /// - [`Error::DuplicateMeta`] for more than one `Meta` element
    /// - [`Error::OrderingViolation`] if `Meta` is not the first node
    /// - any error of [`TblDocument::parse_element`] for the nested tables
    pub fn parse_element(element: &SmlElement, encoding: Encoding) -> Result<Self> {
        element.assure_name(TABLES)?;

        let mut document = TblsDocument {
            encoding,
            ..Self::default()
        };
        if let Some(meta) = parse_leading_meta(element)? {
            document.meta = TblsMetaData::parse(meta)?;
        }
        for table in element.elements_named(TABLE) {
            document
                .tables
                .push(TblDocument::parse_element(table, encoding)?);
        }

        tracing::debug!(
            tables = document.tables.len(),
            has_meta = document.meta.has_any(),
            "parsed tables document"
        );
        Ok(document)
    }

    /// # Errors
    ///
    /// Returns [`Error::Syntax`] for malformed text and any error of
    /// [`parse_element`](Self::parse_element).
    pub fn parse(content: &str, encoding: Encoding) -> Result<Self> {
        let element = SmlElement::parse(content)?;
        Self::parse_element(&element, encoding)
    }

    /// # Errors
    ///
    /// Returns [`Error::Encoding`] for undecodable bytes, otherwise as [`parse`](Self::parse).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let (text, encoding) = encoding::decode(bytes)?;
        Self::parse(&text, encoding)
    }

    /// # Errors
    ///
    /// Returns [`Error::Encoding`] for a malformed base64 string, otherwise as
    /// [`from_bytes`](Self::from_bytes).
    pub fn from_base64_string(base64: &str) -> Result<Self> {
        Self::from_bytes(&encoding::base64_to_bytes(base64)?)
    }

    /// # Errors
    ///
    /// Returns [`Error::Binary`] for malformed input, otherwise as
    /// [`parse_element`](Self::parse_element).
    pub fn from_binary_tbls(bytes: &[u8]) -> Result<Self> {
        Self::parse_element(&binary::decode(bytes)?, Encoding::Utf8)
    }
}

impl From<Vec<TblDocument>> for TblsDocument {
    fn from(tables: Vec<TblDocument>) -> Self {
        Self::with_tables(tables)
    }
}

impl fmt::Display for TblsDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_with_options(&FormatOptions::new()))
    }
}

impl FromStr for TblsDocument {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s, Encoding::Utf8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_collection() {
        let document = TblsDocument::new();
        assert_eq!(document.to_string(), "Tables\nEnd");
        assert_eq!(document.to_minified_string(), "Tables\n-");
        assert_eq!("Tables\nEnd".parse::<TblsDocument>().unwrap(), document);
    }

    #[test]
    fn test_right_alignment_is_not_passed_on() {
        let mut table = TblDocument::new(&["A", "B"]).unwrap();
        table.add_row(&[Some("Long"), Some("x")]).unwrap();
        let document = TblsDocument::from(vec![table]);
        let options = FormatOptions::aligned().with_right_aligned(vec![true, true]);
        assert_eq!(
            document.to_string_with_options(&options),
            "Tables\n\tTable\n\t\tA    B\n\t\tLong x\n\tEnd\nEnd"
        );
    }

    #[test]
    fn test_unknown_children_are_ignored() {
        let document = TblsDocument::parse(
            "Tables\n\tNote text\n\tTable\n\t\tA B\n\tEnd\n\tOther\n\tEnd\nEnd",
            Encoding::Utf16,
        )
        .unwrap();
        assert_eq!(document.tables.len(), 1);
        assert_eq!(document.encoding, Encoding::Utf16);
        assert_eq!(document.tables[0].encoding, Encoding::Utf16);
    }

    #[test]
    fn test_wrong_root() {
        assert!(matches!(
            "Table\n\tA B\nEnd".parse::<TblsDocument>(),
            Err(Error::WrongNodeKind { .. })
        ));
    }
}
