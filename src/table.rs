//! The table document.
//!
//! A [`TblDocument`] is projected onto a `Table` element: the first attribute
//! carries the column names, every further attribute is one row, and an
//! optional `Meta` element comes first.
//!
//! ```text
//! Table
//!     Meta
//!         Title "My Table"
//!     End
//!     Column1 Column2 Column3
//!     Value11 Value12 Value13
//!     Value21 -
//! End
//! ```
//!
//! `-` is a null cell. A row may stop before the last column; the missing
//! cells are absent, which is not the same as null (see [`Cell`]).

use crate::encoding::{self, Encoding};
use crate::meta::{TblMetaData, META};
use crate::options::FormatOptions;
use crate::sml::{self, binary, PrintOptions, SmlAttribute, SmlElement, SmlNode};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::str::FromStr;

pub(crate) const TABLE: &str = "Table";

/// The content of one cell position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cell<'a> {
    /// The row ends before this column.
    Absent,
    /// An explicit null (`-`).
    Null,
    Value(&'a str),
}

/// A table with named columns, rows of nullable text cells and metadata.
///
/// Column names are fixed at construction. Rows can only be appended, and
/// every row is checked: at least two values, a non-null first value and no
/// more values than columns.
///
/// # Examples
///
/// ```rust
/// use tbl::{Cell, TblDocument};
///
/// let mut document = TblDocument::new(&["Column1", "Column2", "Column3"]).unwrap();
/// document.add_row(&[Some("Value11"), Some("Value12"), Some("Value13")]).unwrap();
/// document.add_row(&[Some("Value21"), None]).unwrap();
///
/// assert_eq!(document.cell(1, 1), Some(Cell::Null));
/// assert_eq!(document.cell(1, 2), Some(Cell::Absent));
/// assert_eq!(
///     document.to_string(),
///     "Table\n\tColumn1 Column2 Column3\n\tValue11 Value12 Value13\n\tValue21 -\nEnd"
/// );
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TableRepr", into = "TableRepr")]
pub struct TblDocument {
    pub encoding: Encoding,
    column_names: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
    meta: TblMetaData,
}

/// Serialized form, validated again on the way in.
#[derive(Serialize, Deserialize)]
struct TableRepr {
    #[serde(default)]
    encoding: Encoding,
    column_names: Vec<String>,
    #[serde(default)]
    rows: Vec<Vec<Option<String>>>,
    #[serde(default)]
    meta: TblMetaData,
}

impl TryFrom<TableRepr> for TblDocument {
    type Error = Error;

    fn try_from(repr: TableRepr) -> Result<Self> {
        let mut document = TblDocument::with_encoding(&repr.column_names, repr.encoding)?;
        for row in repr.rows {
            document.push_row(row)?;
        }
        let mut meta = repr.meta;
        meta.bind(document.column_count())?;
        document.meta = meta;
        Ok(document)
    }
}

impl From<TblDocument> for TableRepr {
    fn from(document: TblDocument) -> Self {
        TableRepr {
            encoding: document.encoding,
            column_names: document.column_names,
            rows: document.rows,
            meta: document.meta,
        }
    }
}

impl TblDocument {
    /// Creates an empty UTF-8 table.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidShape`] for fewer than two column names.
    pub fn new<S: AsRef<str>>(column_names: &[S]) -> Result<Self> {
        Self::with_encoding(column_names, Encoding::default())
    }

    /// Creates an empty table stored in `encoding`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidShape`] for fewer than two column names.
    pub fn with_encoding<S: AsRef<str>>(column_names: &[S], encoding: Encoding) -> Result<Self> {
        if column_names.len() < 2 {
            return Err(Error::invalid_shape("Table must have at least two columns"));
        }
        Ok(TblDocument {
            encoding,
            column_names: column_names
                .iter()
                .map(|name| name.as_ref().to_string())
                .collect(),
            rows: Vec::new(),
            meta: TblMetaData::new(column_names.len()),
        })
    }

    #[must_use]
    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    #[must_use]
    pub fn column_count(&self) -> usize {
        self.column_names.len()
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn row(&self, index: usize) -> Option<&[Option<String>]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<Option<String>>] {
        &self.rows
    }

    /// Returns the cell at `row`/`column`, or `None` outside the table.
    #[must_use]
    pub fn cell(&self, row: usize, column: usize) -> Option<Cell<'_>> {
        if column >= self.column_count() {
            return None;
        }
        let row = self.rows.get(row)?;
        Some(match row.get(column) {
            None => Cell::Absent,
            Some(None) => Cell::Null,
            Some(Some(value)) => Cell::Value(value),
        })
    }

    /// Appends a copy of `values` as a new row.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidShape`] for fewer than two values, a null first
    /// value, or more values than columns.
    pub fn add_row<S: AsRef<str>>(&mut self, values: &[Option<S>]) -> Result<()> {
        self.push_row(
            values
                .iter()
                .map(|value| value.as_ref().map(|v| v.as_ref().to_string()))
                .collect(),
        )
    }

    fn push_row(&mut self, values: Vec<Option<String>>) -> Result<()> {
        if values.len() < 2 {
            return Err(Error::invalid_shape("Row must have at least two values"));
        }
        if values[0].is_none() {
            return Err(Error::invalid_shape("First row value cannot be null"));
        }
        if values.len() > self.column_count() {
            return Err(Error::InvalidShape(format!(
                "Row has {} values but the table only has {} columns",
                values.len(),
                self.column_count()
            )));
        }
        self.rows.push(values);
        Ok(())
    }

    #[must_use]
    pub fn meta(&self) -> &TblMetaData {
        &self.meta
    }

    /// Mutable access to the metadata.
    ///
    /// The metadata stays bound to this table's columns: when the handle is
    /// dropped, its capacity is reset to [`column_count`](Self::column_count)
    /// and column metadata past the last column is discarded, even if the
    /// metadata was replaced through the handle.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tbl::TblDocument;
    ///
    /// let mut document = TblDocument::new(&["A", "B"]).unwrap();
    /// document.meta_mut().title = Some("Letters".to_string());
    /// assert_eq!(document.meta().title.as_deref(), Some("Letters"));
    /// ```
    pub fn meta_mut(&mut self) -> TblMetaDataMut<'_> {
        let capacity = self.column_count();
        TblMetaDataMut {
            meta: &mut self.meta,
            capacity,
        }
    }

    /// Replaces the metadata, binding it to this table's columns.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityExceeded`] if `meta` describes more columns
    /// than the table has; the current metadata is kept.
    pub fn set_meta(&mut self, mut meta: TblMetaData) -> Result<()> {
        meta.bind(self.column_count())?;
        self.meta = meta;
        Ok(())
    }

    /// Projects the table onto a `Table` element laid out per `options`.
    #[must_use]
    pub fn to_element(&self, options: &FormatOptions) -> SmlElement {
        let mut element = SmlElement::new(TABLE);
        if self.meta.has_any() {
            let mut meta = self.meta.to_element();
            FormatOptions::apply_to_meta(&mut meta);
            element.add_element(meta);
        }

        if let Some((first, rest)) = self.column_names.split_first() {
            let values: Vec<Option<String>> = rest.iter().cloned().map(Some).collect();
            element.push_attribute(SmlAttribute::from_parts(first.clone(), values));
        }

        for row in &self.rows {
            if let Some((first, rest)) = row.split_first() {
                // first cell is never null, checked in push_row
                let name = first.clone().unwrap_or_default();
                element.push_attribute(SmlAttribute::from_parts(name, rest.to_vec()));
            }
        }

        options.apply_to_body(&mut element);
        element
    }

    #[must_use]
    pub fn to_string_with_options(&self, options: &FormatOptions) -> String {
        sml::ser::to_string(&self.to_element(options), &PrintOptions::default())
    }

    /// Text output with columns padded by one space.
    #[must_use]
    pub fn to_aligned_string(&self) -> String {
        self.to_string_with_options(&FormatOptions::aligned())
    }

    /// Most compact text output: no indentation and `-` closing elements.
    #[must_use]
    pub fn to_minified_string(&self) -> String {
        sml::ser::to_string(&self.to_element(&FormatOptions::new()), &PrintOptions::minified())
    }

    /// Text output encoded in [`encoding`](Self::encoding), with byte-order mark.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        tracing::debug!(
            encoding = ?self.encoding,
            rows = self.row_count(),
            columns = self.column_count(),
            "encoding table document"
        );
        encoding::encode(&self.to_string(), self.encoding)
    }

    #[must_use]
    pub fn to_base64_string(&self) -> String {
        encoding::to_base64_string(&self.to_string(), self.encoding)
    }

    #[must_use]
    pub fn to_binary_tbl(&self) -> Vec<u8> {
        binary::encode(&self.to_element(&FormatOptions::new()))
    }

    /// Reads a table from a `Table` element.
    ///
    /// # Errors
    ///
    /// - [`Error::WrongNodeKind`] if the element is not named `Table`
    /// - [`Error::MissingColumns`] if it has no attributes
    /// - [`Error::InvalidShape`] for null column names or invalid rows
    /// - [`Error::DuplicateMeta`] for more than one `Meta` element
    /// - [`Error::UnexpectedNode`] for any other child element
    /// - [`Error::OrderingViolation`] if `Meta` is not the first node
    /// - metadata errors from [`TblMetaData::parse`]
    pub fn parse_element(element: &SmlElement, encoding: Encoding) -> Result<Self> {
        element.assure_name(TABLE)?;

        let mut attributes = element.attributes();
        let columns = attributes.next().ok_or(Error::MissingColumns)?;
        let mut column_names = Vec::with_capacity(columns.values.len() + 1);
        column_names.push(columns.name.clone());
        for value in &columns.values {
            let name = value
                .clone()
                .ok_or_else(|| Error::invalid_shape("Column name cannot be null"))?;
            column_names.push(name);
        }
        let mut document = TblDocument::with_encoding(&column_names, encoding)?;

        let meta = parse_leading_meta(element)?;
        if let Some(unexpected) = element.elements().find(|e| !e.has_name(META)) {
            return Err(Error::unexpected_node(&unexpected.name));
        }
        if let Some(meta) = meta {
            document.meta = TblMetaData::parse(meta, document.column_count())?;
        }

        for row in attributes {
            let mut values = Vec::with_capacity(row.values.len() + 1);
            values.push(Some(row.name.clone()));
            values.extend(row.values.iter().cloned());
            document.push_row(values)?;
        }

        tracing::debug!(
            columns = document.column_count(),
            rows = document.row_count(),
            has_meta = document.meta.has_any(),
            "parsed table document"
        );
        Ok(document)
    }

    /// Parses table text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Syntax`] for malformed text and any error of
    /// [`parse_element`](Self::parse_element).
    pub fn parse(content: &str, encoding: Encoding) -> Result<Self> {
        let element = SmlElement::parse(content)?;
        Self::parse_element(&element, encoding)
    }

    /// Parses encoded text, keeping the detected encoding.
    ///
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
    pub fn from_binary_tbl(bytes: &[u8]) -> Result<Self> {
        Self::parse_element(&binary::decode(bytes)?, Encoding::Utf8)
    }
}

/// Write access to the metadata of a [`TblDocument`], returned by
/// [`TblDocument::meta_mut`].
#[derive(Debug)]
pub struct TblMetaDataMut<'a> {
    meta: &'a mut TblMetaData,
    capacity: usize,
}

impl Deref for TblMetaDataMut<'_> {
    type Target = TblMetaData;

    fn deref(&self) -> &TblMetaData {
        self.meta
    }
}

impl DerefMut for TblMetaDataMut<'_> {
    fn deref_mut(&mut self) -> &mut TblMetaData {
        self.meta
    }
}

impl Drop for TblMetaDataMut<'_> {
    fn drop(&mut self) {
        self.meta.fit(self.capacity);
    }
}

/// Finds the `Meta` child of a table or tables element, enforcing that there
/// is at most one and that it is the first node.
pub(crate) fn parse_leading_meta(element: &SmlElement) -> Result<Option<&SmlElement>> {
    let mut metas = element.elements_named(META);
    let Some(meta) = metas.next() else {
        return Ok(None);
    };
    if metas.next().is_some() {
        return Err(Error::DuplicateMeta);
    }
    match element.named_nodes().first() {
        Some(SmlNode::Element(first)) if first.has_name(META) => Ok(Some(meta)),
        _ => Err(Error::OrderingViolation),
    }
}

impl fmt::Display for TblDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_with_options(&FormatOptions::new()))
    }
}

impl FromStr for TblDocument {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s, Encoding::Utf8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructor_copies_column_names() {
        let mut names = vec!["Column1".to_string(), "Column2".to_string()];
        let document = TblDocument::new(&names).unwrap();
        names[0] = "Changed".to_string();
        assert_eq!(document.column_names(), &["Column1", "Column2"]);
        assert_eq!(document.column_count(), 2);
        assert_eq!(document.encoding, Encoding::Utf8);
        assert_eq!(document.meta().capacity(), 2);
    }

    #[test]
    fn test_constructor_rejects_short_lists() {
        let empty: [&str; 0] = [];
        assert!(matches!(TblDocument::new(&empty), Err(Error::InvalidShape(_))));
        assert!(matches!(TblDocument::new(&["Column1"]), Err(Error::InvalidShape(_))));
    }

    #[test]
    fn test_add_row_validation() {
        let mut document = TblDocument::new(&["Column1", "Column2", "Column3"]).unwrap();
        let empty: [Option<&str>; 0] = [];
        assert!(document.add_row(&empty).is_err());
        assert!(document.add_row(&[Some("Value1")]).is_err());
        assert!(document.add_row(&[None, Some("Value2")]).is_err());
        assert!(document
            .add_row(&[Some("V1"), Some("V2"), Some("V3"), Some("V4")])
            .is_err());
        assert_eq!(document.row_count(), 0);

        document.add_row(&[Some("Value1"), None]).unwrap();
        assert_eq!(document.row(0), Some(&[Some("Value1".to_string()), None][..]));
    }

    #[test]
    fn test_cells() {
        let mut document = TblDocument::new(&["A", "B", "C"]).unwrap();
        document.add_row(&[Some("a"), None]).unwrap();
        assert_eq!(document.cell(0, 0), Some(Cell::Value("a")));
        assert_eq!(document.cell(0, 1), Some(Cell::Null));
        assert_eq!(document.cell(0, 2), Some(Cell::Absent));
        assert_eq!(document.cell(0, 3), None);
        assert_eq!(document.cell(1, 0), None);
    }

    #[test]
    fn test_leading_meta_rules() {
        fn parse(input: &str) -> Result<bool> {
            let element = SmlElement::parse(input).unwrap();
            parse_leading_meta(&element).map(|meta| meta.is_some())
        }
        assert!(!parse("Table\n\tA B\nEnd").unwrap());
        assert!(parse("Table\n\tMeta\n\tEnd\n\tA B\nEnd").unwrap());
        assert!(matches!(
            parse("Table\n\tA B\n\tMeta\n\tEnd\nEnd"),
            Err(Error::OrderingViolation)
        ));
        assert!(matches!(
            parse("Table\n\tMeta\n\tEnd\n\tmeta\n\tEnd\nEnd"),
            Err(Error::DuplicateMeta)
        ));
    }

    #[test]
    fn test_serde_round_trip_revalidates() {
        let mut document = TblDocument::new(&["Column1", "Column2"]).unwrap();
        document.add_row(&[Some("Value21"), None]).unwrap();
        document.meta_mut().title = Some("My Table".to_string());
        document.meta_mut().add_column_meta_data().unwrap();

        let json = serde_json::to_string(&document).unwrap();
        let back: TblDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(back, document);

        let bad_row = r#"{"column_names":["A","B"],"rows":[[null,"x"]]}"#;
        assert!(serde_json::from_str::<TblDocument>(bad_row).is_err());
        let one_column = r#"{"column_names":["A"]}"#;
        assert!(serde_json::from_str::<TblDocument>(one_column).is_err());
    }

    fn wide_meta() -> TblMetaData {
        let mut wide = TblDocument::new(&["A", "B", "C", "D"]).unwrap();
        for _ in 0..4 {
            wide.meta_mut().add_column_meta_data().unwrap();
        }
        wide.meta
    }

    #[test]
    fn test_replaced_meta_keeps_table_capacity() {
        let mut document = TblDocument::new(&["A", "B"]).unwrap();
        *document.meta_mut() = TblMetaData::new(5);
        assert_eq!(document.meta().capacity(), 2);

        *document.meta_mut() = wide_meta();
        assert_eq!(document.meta().capacity(), 2);
        assert_eq!(document.meta().columns().len(), 2);

        let back = TblDocument::parse(&document.to_string(), Encoding::Utf8).unwrap();
        assert_eq!(back, document);
    }

    #[test]
    fn test_swapped_meta_keeps_table_capacity() {
        let mut wide = TblDocument::new(&["A", "B", "C", "D"]).unwrap();
        for _ in 0..4 {
            wide.meta_mut().add_column_meta_data().unwrap();
        }
        let mut narrow = TblDocument::new(&["A", "B"]).unwrap();
        std::mem::swap(&mut *wide.meta_mut(), &mut *narrow.meta_mut());

        assert_eq!(narrow.meta().columns().len(), 2);
        assert_eq!(wide.meta().capacity(), 4);
        assert!(wide.meta().columns().is_empty());
        assert!(TblDocument::parse(&narrow.to_string(), Encoding::Utf8).is_ok());
    }

    #[test]
    fn test_set_meta_checks_capacity() {
        let mut document = TblDocument::new(&["A", "B"]).unwrap();
        document.meta_mut().title = Some("Kept".to_string());
        assert!(matches!(
            document.set_meta(wide_meta()),
            Err(Error::CapacityExceeded { capacity: 2 })
        ));
        assert_eq!(document.meta().title.as_deref(), Some("Kept"));

        let mut meta = TblMetaData::new(8);
        meta.add_column_meta_data().unwrap();
        document.set_meta(meta).unwrap();
        assert_eq!(document.meta().capacity(), 2);
        assert_eq!(document.meta().columns().len(), 1);
    }
}
