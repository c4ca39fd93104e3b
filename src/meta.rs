//! Table, column and collection metadata.
//!
//! Metadata is written as a `Meta` element, which is only emitted when at
//! least one field is set:
//!
//! ```text
//! Meta
//!     Title "Monthly Sales"
//!     Keywords sales finance
//!     Column
//!         Description "Product identifier"
//!     End
//!     CustomProperties
//!         Source ERP
//!     End
//! End
//! ```

use crate::custom_data::CustomData;
use crate::properties::CustomProperties;
use crate::sml::{SmlAttribute, SmlElement};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

pub(crate) const META: &str = "Meta";
const COLUMN: &str = "Column";
const TITLE: &str = "Title";
const DESCRIPTION: &str = "Description";
const LANGUAGE: &str = "Language";
const KEYWORDS: &str = "Keywords";

fn push_single(element: &mut SmlElement, name: &str, value: Option<&String>) {
    if let Some(value) = value {
        element.push_attribute(SmlAttribute::from_parts(
            name.to_string(),
            vec![Some(value.clone())],
        ));
    }
}

/// Metadata of one column, bound to the column at [`index`](Self::index).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TblColumnMetaData {
    index: usize,
    pub title: Option<String>,
    pub description: Option<String>,
    pub custom_data: Option<CustomData>,
}

impl TblColumnMetaData {
    fn new(index: usize) -> Self {
        TblColumnMetaData {
            index,
            title: None,
            description: None,
            custom_data: None,
        }
    }

    /// Position of the described column, fixed at creation.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn to_element(&self) -> SmlElement {
        let mut element = SmlElement::new(COLUMN);
        push_single(&mut element, TITLE, self.title.as_ref());
        push_single(&mut element, DESCRIPTION, self.description.as_ref());
        if let Some(custom_data) = &self.custom_data {
            custom_data.write(&mut element);
        }
        element
    }

    fn parse(element: &SmlElement, index: usize) -> Result<Self> {
        Ok(TblColumnMetaData {
            index,
            title: element.optional_string(TITLE)?,
            description: element.optional_string(DESCRIPTION)?,
            custom_data: CustomData::read(element)?,
        })
    }
}

/// Metadata of a single table.
///
/// Column metadata is positional: at most one entry per column, so the
/// number of entries is bounded by the capacity given at construction.
///
/// # Examples
///
/// ```rust
/// use tbl::TblDocument;
///
/// let mut document = TblDocument::new(&["Item", "Count"]).unwrap();
/// let mut meta = document.meta_mut();
/// meta.title = Some("Inventory".to_string());
/// meta.add_column_meta_data().unwrap().title = Some("Item".to_string());
/// meta.add_column_meta_data().unwrap();
/// assert!(meta.add_column_meta_data().is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "TblMetaDataRepr")]
pub struct TblMetaData {
    pub title: Option<String>,
    pub description: Option<String>,
    pub language: Option<String>,
    keywords: Option<Vec<String>>,
    #[serde(default)]
    columns: Vec<TblColumnMetaData>,
    #[serde(default)]
    pub custom_properties: CustomProperties,
    pub custom_data: Option<CustomData>,
    #[serde(skip)]
    capacity: usize,
}

/// Deserialized form. Standalone metadata is bound to exactly the columns
/// it describes; a table rebinds it to its own column count.
#[derive(Deserialize)]
struct TblMetaDataRepr {
    title: Option<String>,
    description: Option<String>,
    language: Option<String>,
    keywords: Option<Vec<String>>,
    #[serde(default)]
    columns: Vec<TblColumnMetaData>,
    #[serde(default)]
    custom_properties: CustomProperties,
    custom_data: Option<CustomData>,
}

impl TryFrom<TblMetaDataRepr> for TblMetaData {
    type Error = Error;

    fn try_from(repr: TblMetaDataRepr) -> Result<Self> {
        let capacity = repr.columns.len();
        let mut meta = TblMetaData {
            title: repr.title,
            description: repr.description,
            language: repr.language,
            keywords: repr.keywords,
            columns: repr.columns,
            custom_properties: repr.custom_properties,
            custom_data: repr.custom_data,
            capacity,
        };
        meta.bind(capacity)?;
        Ok(meta)
    }
}

impl TblMetaData {
    /// Creates empty metadata for a table with `capacity` columns.
    #[must_use]
    pub(crate) fn new(capacity: usize) -> Self {
        TblMetaData {
            capacity,
            ..Default::default()
        }
    }

    /// Maximum number of column metadata entries.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub fn keywords(&self) -> Option<&[String]> {
        self.keywords.as_deref()
    }

    /// Replaces the keywords; `None` removes them.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidShape`] for an empty list.
    pub fn set_keywords(&mut self, keywords: Option<Vec<String>>) -> Result<()> {
        if keywords.as_ref().is_some_and(Vec::is_empty) {
            return Err(Error::invalid_shape("Keywords array cannot be empty"));
        }
        self.keywords = keywords;
        Ok(())
    }

    #[must_use]
    pub fn columns(&self) -> &[TblColumnMetaData] {
        &self.columns
    }

    pub fn column_mut(&mut self, index: usize) -> Option<&mut TblColumnMetaData> {
        self.columns.get_mut(index)
    }

    /// Adds metadata for the next column without metadata.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapacityExceeded`] once every column has metadata.
    pub fn add_column_meta_data(&mut self) -> Result<&mut TblColumnMetaData> {
        let index = self.columns.len();
        if index >= self.capacity {
            return Err(Error::CapacityExceeded {
                capacity: self.capacity,
            });
        }
        self.columns.push(TblColumnMetaData::new(index));
        Ok(&mut self.columns[index])
    }

    /// Whether any field differs from its default; only then is a `Meta`
    /// element written.
    #[must_use]
    pub fn has_any(&self) -> bool {
        self.title.is_some()
            || self.description.is_some()
            || self.language.is_some()
            || self.keywords.is_some()
            || !self.columns.is_empty()
            || self.custom_properties.has_any()
            || self.custom_data.is_some()
    }

    #[must_use]
    pub fn to_element(&self) -> SmlElement {
        let mut element = SmlElement::new(META);
        push_single(&mut element, TITLE, self.title.as_ref());
        push_single(&mut element, DESCRIPTION, self.description.as_ref());
        push_single(&mut element, LANGUAGE, self.language.as_ref());
        if let Some(keywords) = &self.keywords {
            element.push_attribute(SmlAttribute::from_parts(
                KEYWORDS.to_string(),
                keywords.iter().cloned().map(Some).collect(),
            ));
        }
        for column in &self.columns {
            element.add_element(column.to_element());
        }
        self.custom_properties.serialize(&mut element);
        if let Some(custom_data) = &self.custom_data {
            custom_data.write(&mut element);
        }
        element
    }

    /// Reads a `Meta` element for a table with `capacity` columns.
    ///
    /// # Errors
    ///
    /// - [`Error::WrongNodeKind`] if the element is not named `Meta`
    /// - [`Error::CapacityExceeded`] for more `Column` elements than columns
    /// - [`Error::InvalidShape`] for duplicated or null single-value fields and null keywords
    /// - custom data and custom property errors
    pub fn parse(element: &SmlElement, capacity: usize) -> Result<Self> {
        element.assure_name(META)?;
        let mut meta = TblMetaData::new(capacity);
        meta.title = element.optional_string(TITLE)?;
        meta.description = element.optional_string(DESCRIPTION)?;
        meta.language = element.optional_string(LANGUAGE)?;
        if let Some(keywords) = element.optional_attribute(KEYWORDS)? {
            meta.keywords = Some(keywords.as_string_array()?);
        }
        for column_element in element.elements_named(COLUMN) {
            let index = meta.add_column_meta_data()?.index;
            meta.columns[index] = TblColumnMetaData::parse(column_element, index)?;
        }
        meta.custom_properties = CustomProperties::parse(element)?;
        meta.custom_data = CustomData::read(element)?;
        Ok(meta)
    }

    /// Binds deserialized metadata to a table with `capacity` columns,
    /// checking what deserialization alone cannot.
    pub(crate) fn bind(&mut self, capacity: usize) -> Result<()> {
        if self.columns.len() > capacity {
            return Err(Error::CapacityExceeded { capacity });
        }
        if let Some(position) = self
            .columns
            .iter()
            .enumerate()
            .position(|(index, column)| column.index != index)
        {
            return Err(Error::InvalidShape(format!(
                "Column metadata at position {} has index {}",
                position, self.columns[position].index
            )));
        }
        if self.keywords.as_ref().is_some_and(Vec::is_empty) {
            return Err(Error::invalid_shape("Keywords array cannot be empty"));
        }
        self.capacity = capacity;
        Ok(())
    }

    /// Rebinds to `capacity` columns, dropping column metadata past it.
    pub(crate) fn fit(&mut self, capacity: usize) {
        if self.columns.len() > capacity {
            tracing::warn!(
                columns = self.columns.len(),
                capacity,
                "dropping column metadata beyond the table's columns"
            );
            self.columns.truncate(capacity);
        }
        self.capacity = capacity;
    }
}

/// Metadata of a collection of tables.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TblsMetaData {
    pub title: Option<String>,
    pub description: Option<String>,
    pub custom_data: Option<CustomData>,
}

impl TblsMetaData {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn has_any(&self) -> bool {
        self.title.is_some() || self.description.is_some() || self.custom_data.is_some()
    }

    #[must_use]
    pub fn to_element(&self) -> SmlElement {
        let mut element = SmlElement::new(META);
        push_single(&mut element, TITLE, self.title.as_ref());
        push_single(&mut element, DESCRIPTION, self.description.as_ref());
        if let Some(custom_data) = &self.custom_data {
            custom_data.write(&mut element);
        }
        element
    }

    /// # Errors
    ///
    /// Fails like [`TblMetaData::parse`] for the fields present here.
    pub fn parse(element: &SmlElement) -> Result<Self> {
        element.assure_name(META)?;
        Ok(TblsMetaData {
            title: element.optional_string(TITLE)?,
            description: element.optional_string(DESCRIPTION)?,
            custom_data: CustomData::read(element)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROUND_TRIPS: &[&str] = &[
        "Meta\n\tTitle text\n\tDescription text\nEnd",
        "Meta\n\tCustomData text\nEnd",
        "Meta\n\tCustomData application/xyz text\nEnd",
        "Meta\n\tCustomData\n\t\tMyAttribute 123\n\tEnd\nEnd",
        "Meta\n\tLanguage EN\nEnd",
        "Meta\n\tKeywords Keyword1 Keyword2\nEnd",
        "Meta\n\tCustomProperties\n\t\tKey Value\n\tEnd\nEnd",
        "Meta\n\tColumn\n\t\tDescription Text\n\tEnd\nEnd",
        "Meta\n\tColumn\n\t\tTitle Text\n\tEnd\nEnd",
        "Meta\n\tColumn\n\t\tCustomData Text\n\tEnd\nEnd",
    ];

    fn parse(input: &str) -> Result<TblMetaData> {
        TblMetaData::parse(&SmlElement::parse(input).unwrap(), 2)
    }

    #[test]
    fn test_parse_and_write_round_trip() {
        for input in ROUND_TRIPS {
            let meta = parse(input).unwrap();
            assert_eq!(meta.to_element().to_string(), *input);
        }
    }

    #[test]
    fn test_parse_failures() {
        assert!(parse("Meta\n\tCustomData text\n\tCustomData text\nEnd").is_err());
        assert!(matches!(
            parse("Meta\n\tCustomData text\n\tCustomData\n\t\tMyAttribute 123\n\tEnd\nEnd"),
            Err(Error::ConflictingRepresentation(_))
        ));
        assert!(matches!(
            parse("Meta\n\tCustomData\n\t\tMyAttribute 123\n\tEnd\n\tCustomData text\nEnd"),
            Err(Error::ConflictingRepresentation(_))
        ));
        assert!(matches!(
            parse("Meta\n\tColumn\n\tEnd\n\tColumn\n\tEnd\n\tColumn\n\tEnd\nEnd"),
            Err(Error::CapacityExceeded { capacity: 2 })
        ));
        assert!(matches!(
            parse("Other\nEnd"),
            Err(Error::WrongNodeKind { .. })
        ));
        assert!(parse("Meta\n\tTitle a b\nEnd").is_err());
        assert!(parse("Meta\n\tKeywords a -\nEnd").is_err());
    }

    #[test]
    fn test_keywords() {
        let mut meta = TblMetaData::new(2);
        let keywords = vec!["Keyword1".to_string()];
        meta.set_keywords(Some(keywords.clone())).unwrap();

        let mut returned = meta.keywords().unwrap().to_vec();
        returned.pop();
        assert_eq!(meta.keywords(), Some(&keywords[..]));

        meta.set_keywords(None).unwrap();
        assert_eq!(meta.keywords(), None);
    }

    #[test]
    fn test_empty_keywords_rejected() {
        let mut meta = TblMetaData::new(2);
        assert!(matches!(
            meta.set_keywords(Some(vec![])),
            Err(Error::InvalidShape(_))
        ));
        assert_eq!(meta.keywords(), None);
    }

    #[test]
    fn test_columns_are_indexed_and_bounded() {
        let mut meta = TblMetaData::new(2);
        assert_eq!(meta.add_column_meta_data().unwrap().index(), 0);
        assert_eq!(meta.add_column_meta_data().unwrap().index(), 1);
        assert!(matches!(
            meta.add_column_meta_data(),
            Err(Error::CapacityExceeded { capacity: 2 })
        ));

        let mut columns = meta.columns().to_vec();
        columns.pop();
        assert_eq!(meta.columns().len(), 2);
    }

    #[test]
    fn test_has_any() {
        let mut meta = TblMetaData::new(2);
        assert!(!meta.has_any());
        meta.custom_properties.set("Key", "Value");
        assert!(meta.has_any());
        meta.custom_properties.clear();
        meta.add_column_meta_data().unwrap();
        assert!(meta.has_any());
    }

    #[test]
    fn test_bind_checks_deserialized_state() {
        let mut meta = parse("Meta\n\tColumn\n\tEnd\n\tColumn\n\tEnd\nEnd").unwrap();
        assert!(matches!(meta.bind(1), Err(Error::CapacityExceeded { capacity: 1 })));
        assert!(meta.bind(3).is_ok());
        assert_eq!(meta.capacity(), 3);

        meta.columns.swap(0, 1);
        assert!(matches!(meta.bind(3), Err(Error::InvalidShape(_))));
    }

    #[test]
    fn test_fit_truncates_to_capacity() {
        let mut meta = TblMetaData::new(4);
        for _ in 0..4 {
            meta.add_column_meta_data().unwrap();
        }
        meta.fit(2);
        assert_eq!(meta.capacity(), 2);
        assert_eq!(meta.columns().len(), 2);
        assert!(matches!(
            meta.add_column_meta_data(),
            Err(Error::CapacityExceeded { capacity: 2 })
        ));

        meta.fit(3);
        assert_eq!(meta.columns().len(), 2);
        assert_eq!(meta.add_column_meta_data().unwrap().index(), 2);
    }

    #[test]
    fn test_standalone_deserialize_is_bound_to_its_columns() {
        let meta: TblMetaData = serde_json::from_str(
            r#"{"title":"T","columns":[{"index":0},{"index":1}]}"#,
        )
        .unwrap();
        assert_eq!(meta.capacity(), 2);
        assert_eq!(meta.columns().len(), 2);

        let empty: TblMetaData = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.capacity(), 0);
        assert!(!empty.has_any());

        assert!(serde_json::from_str::<TblMetaData>(r#"{"columns":[{"index":1}]}"#).is_err());
        assert!(serde_json::from_str::<TblMetaData>(r#"{"keywords":[]}"#).is_err());
    }

    #[test]
    fn test_tables_meta_round_trip() {
        for input in &ROUND_TRIPS[..4] {
            let meta = TblsMetaData::parse(&SmlElement::parse(input).unwrap()).unwrap();
            assert_eq!(meta.to_element().to_string(), *input);
        }
        let conflicting = SmlElement::parse(
            "Meta\n\tCustomData text\n\tCustomData\n\t\tMyAttribute 123\n\tEnd\nEnd",
        )
        .unwrap();
        assert!(TblsMetaData::parse(&conflicting).is_err());
    }
}
