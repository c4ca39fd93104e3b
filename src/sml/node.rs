//! Elements and attributes of the SML tree.

use crate::sml::wsv;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// A named line carrying one or more nullable values.
///
/// Layout whitespace computed by [`SmlElement::align_attributes`] is kept on
/// the attribute but is not part of its value: two attributes with the same
/// name and values compare equal however they are padded.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SmlAttribute {
    pub name: String,
    pub values: Vec<Option<String>>,
    #[serde(skip)]
    pub(crate) whitespaces: Option<Vec<String>>,
}

impl PartialEq for SmlAttribute {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.values == other.values
    }
}

impl Eq for SmlAttribute {}

impl SmlAttribute {
    /// Creates an attribute. At least one value is required, otherwise the
    /// line would read back as an element.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidShape`] if `values` is empty.
    pub fn new(name: impl Into<String>, values: Vec<Option<String>>) -> Result<Self> {
        let name = name.into();
        if values.is_empty() {
            return Err(Error::InvalidShape(format!(
                "Attribute \"{}\" must have at least one value",
                name
            )));
        }
        Ok(Self::from_parts(name, values))
    }

    pub(crate) fn from_parts(name: String, values: Vec<Option<String>>) -> Self {
        debug_assert!(!values.is_empty(), "attribute without values");
        SmlAttribute {
            name,
            values,
            whitespaces: None,
        }
    }

    #[must_use]
    pub fn has_name(&self, name: &str) -> bool {
        eq_ignore_case(&self.name, name)
    }

    #[must_use]
    pub fn value_count(&self) -> usize {
        self.values.len()
    }

    /// # Errors
    ///
    /// Returns [`Error::InvalidShape`] if the value count lies outside `min..=max`.
    pub fn assure_value_count(&self, min: usize, max: Option<usize>) -> Result<()> {
        let count = self.values.len();
        if count < min || max.is_some_and(|max| count > max) {
            return Err(Error::InvalidShape(format!(
                "Attribute \"{}\" has an invalid value count of {}",
                self.name, count
            )));
        }
        Ok(())
    }

    /// Returns the single non-null value of this attribute.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidShape`] unless there is exactly one value and it is not null.
    pub fn as_string(&self) -> Result<&str> {
        self.assure_value_count(1, Some(1))?;
        self.values[0].as_deref().ok_or_else(|| {
            Error::InvalidShape(format!("Attribute \"{}\" has a null value", self.name))
        })
    }

    /// Returns all values, none of which may be null.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidShape`] if any value is null.
    pub fn as_string_array(&self) -> Result<Vec<String>> {
        self.values
            .iter()
            .map(|value| {
                value.clone().ok_or_else(|| {
                    Error::InvalidShape(format!(
                        "Attribute \"{}\" has a null value",
                        self.name
                    ))
                })
            })
            .collect()
    }

    /// Name followed by values, in their on-line form.
    pub(crate) fn tokens(&self) -> Vec<String> {
        std::iter::once(wsv::serialize_value(Some(&self.name)))
            .chain(self.values.iter().map(|v| wsv::serialize_value(v.as_deref())))
            .collect()
    }
}

/// A child of an element.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SmlNode {
    Element(SmlElement),
    Attribute(SmlAttribute),
}

impl SmlNode {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            SmlNode::Element(element) => &element.name,
            SmlNode::Attribute(attribute) => &attribute.name,
        }
    }

    #[must_use]
    pub fn is_element(&self) -> bool {
        matches!(self, SmlNode::Element(_))
    }

    #[must_use]
    pub fn is_element_named(&self, name: &str) -> bool {
        matches!(self, SmlNode::Element(element) if element.has_name(name))
    }

    #[must_use]
    pub fn as_element(&self) -> Option<&SmlElement> {
        match self {
            SmlNode::Element(element) => Some(element),
            SmlNode::Attribute(_) => None,
        }
    }

    #[must_use]
    pub fn as_attribute(&self) -> Option<&SmlAttribute> {
        match self {
            SmlNode::Attribute(attribute) => Some(attribute),
            SmlNode::Element(_) => None,
        }
    }
}

/// A named container of attributes and nested elements.
///
/// Lookups by name are case-insensitive, node order is preserved.
///
/// # Examples
///
/// ```rust
/// use tbl::sml::SmlElement;
///
/// let mut element = SmlElement::new("Meta");
/// element.add_attribute("Title", vec![Some("Report".to_string())]).unwrap();
///
/// assert!(element.has_attribute("title"));
/// assert_eq!(element.attribute("TITLE").unwrap().as_string().unwrap(), "Report");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmlElement {
    pub name: String,
    pub nodes: Vec<SmlNode>,
}

impl SmlElement {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        SmlElement {
            name: name.into(),
            nodes: Vec::new(),
        }
    }

    /// Parses an SML document and returns its root element.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Syntax`] for malformed text.
    pub fn parse(content: &str) -> Result<Self> {
        crate::sml::SmlDocument::parse(content).map(|document| document.root)
    }

    #[must_use]
    pub fn has_name(&self, name: &str) -> bool {
        eq_ignore_case(&self.name, name)
    }

    /// # Errors
    ///
    /// Returns [`Error::WrongNodeKind`] if the element has a different name.
    pub fn assure_name(&self, name: &str) -> Result<()> {
        if !self.has_name(name) {
            return Err(Error::wrong_node_kind(name, &self.name));
        }
        Ok(())
    }

    /// Appends an attribute.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidShape`] if `values` is empty.
    pub fn add_attribute(
        &mut self,
        name: impl Into<String>,
        values: Vec<Option<String>>,
    ) -> Result<()> {
        self.push_attribute(SmlAttribute::new(name, values)?);
        Ok(())
    }

    pub(crate) fn push_attribute(&mut self, attribute: SmlAttribute) {
        self.nodes.push(SmlNode::Attribute(attribute));
    }

    pub fn add_element(&mut self, element: SmlElement) {
        self.nodes.push(SmlNode::Element(element));
    }

    pub fn add_node(&mut self, node: SmlNode) {
        self.nodes.push(node);
    }

    pub fn attributes(&self) -> impl Iterator<Item = &SmlAttribute> {
        self.nodes.iter().filter_map(SmlNode::as_attribute)
    }

    pub fn attributes_named<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a SmlAttribute> + 'a {
        self.attributes().filter(move |a| a.has_name(name))
    }

    #[must_use]
    pub fn has_attributes(&self) -> bool {
        self.attributes().next().is_some()
    }

    #[must_use]
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes_named(name).next().is_some()
    }

    /// Returns the only attribute with this name, if any.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidShape`] if more than one attribute has this name.
    pub fn optional_attribute(&self, name: &str) -> Result<Option<&SmlAttribute>> {
        let mut matches = self.attributes().filter(|a| a.has_name(name));
        let first = matches.next();
        if matches.next().is_some() {
            return Err(Error::InvalidShape(format!(
                "Element \"{}\" contains more than one \"{}\" attribute",
                self.name, name
            )));
        }
        Ok(first)
    }

    /// Returns the only attribute with this name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if there is none and [`Error::InvalidShape`]
    /// if there are several.
    pub fn attribute(&self, name: &str) -> Result<&SmlAttribute> {
        self.optional_attribute(name)?
            .ok_or_else(|| Error::not_found(name))
    }

    /// Returns the single non-null value of an optional attribute.
    ///
    /// # Errors
    ///
    /// Fails if the attribute is duplicated or does not hold exactly one non-null value.
    pub fn optional_string(&self, name: &str) -> Result<Option<String>> {
        self.optional_attribute(name)?
            .map(|attribute| attribute.as_string().map(str::to_string))
            .transpose()
    }

    pub fn elements(&self) -> impl Iterator<Item = &SmlElement> {
        self.nodes.iter().filter_map(SmlNode::as_element)
    }

    pub fn elements_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a SmlElement> + 'a {
        self.elements().filter(move |e| e.has_name(name))
    }

    #[must_use]
    pub fn has_elements(&self) -> bool {
        self.elements().next().is_some()
    }

    #[must_use]
    pub fn has_element(&self, name: &str) -> bool {
        self.elements_named(name).next().is_some()
    }

    /// # Errors
    ///
    /// Returns [`Error::InvalidShape`] if more than one element has this name.
    pub fn optional_element(&self, name: &str) -> Result<Option<&SmlElement>> {
        let mut matches = self.elements().filter(|e| e.has_name(name));
        let first = matches.next();
        if matches.next().is_some() {
            return Err(Error::InvalidShape(format!(
                "Element \"{}\" contains more than one \"{}\" element",
                self.name, name
            )));
        }
        Ok(first)
    }

    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if there is none and [`Error::InvalidShape`]
    /// if there are several.
    pub fn element(&self, name: &str) -> Result<&SmlElement> {
        self.optional_element(name)?
            .ok_or_else(|| Error::not_found(name))
    }

    /// # Errors
    ///
    /// Returns [`Error::UnexpectedNode`] naming the first child element.
    pub fn assure_no_elements(&self) -> Result<()> {
        match self.elements().next() {
            Some(element) => Err(Error::unexpected_node(&element.name)),
            None => Ok(()),
        }
    }

    /// # Errors
    ///
    /// Returns [`Error::InvalidShape`] unless the number of child elements
    /// named `name` lies within `min..=max`.
    pub fn assure_element_count(&self, name: &str, min: usize, max: Option<usize>) -> Result<()> {
        let count = self.elements_named(name).count();
        if count < min || max.is_some_and(|max| count > max) {
            return Err(Error::InvalidShape(format!(
                "Element \"{}\" contains {} \"{}\" elements",
                self.name, count, name
            )));
        }
        Ok(())
    }

    /// Nodes that carry a name. Comments and blank lines are not kept in the
    /// tree, so this is every node.
    #[must_use]
    pub fn named_nodes(&self) -> &[SmlNode] {
        &self.nodes
    }

    /// Pads the direct attributes of this element into columns.
    ///
    /// Column widths are measured in code points of the written tokens, the
    /// name being column 0. `whitespace_between` is the minimum gap between
    /// columns. Columns from `max_columns` onward are not padded. A `true` in
    /// `right_aligned` pads that column on the left instead of the right.
    /// Padding affects text output only and is dropped by minified printing.
    pub fn align_attributes(
        &mut self,
        whitespace_between: &str,
        max_columns: Option<usize>,
        right_aligned: Option<&[bool]>,
    ) {
        let rows: Vec<Vec<String>> = self.attributes().map(SmlAttribute::tokens).collect();
        let widest = rows.iter().map(Vec::len).max().unwrap_or(0);
        let column_count = max_columns.map_or(widest, |max| max.min(widest));

        let mut widths = vec![0usize; column_count];
        for row in &rows {
            for (width, token) in widths.iter_mut().zip(row) {
                *width = (*width).max(token.chars().count());
            }
        }

        let is_right = |column: usize| {
            right_aligned
                .and_then(|mask| mask.get(column).copied())
                .unwrap_or(false)
        };
        let fill = |column: usize, token: &str| -> usize {
            widths
                .get(column)
                .map_or(0, |width| width.saturating_sub(token.chars().count()))
        };

        let attributes = self.nodes.iter_mut().filter_map(|node| match node {
            SmlNode::Attribute(attribute) => Some(attribute),
            SmlNode::Element(_) => None,
        });
        for (attribute, row) in attributes.zip(&rows) {
            let mut whitespaces = Vec::with_capacity(row.len());
            for (column, token) in row.iter().enumerate() {
                let mut gap = String::new();
                if column > 0 {
                    let previous = &row[column - 1];
                    if !is_right(column - 1) {
                        gap.push_str(&" ".repeat(fill(column - 1, previous)));
                    }
                    gap.push_str(whitespace_between);
                }
                if is_right(column) {
                    gap.push_str(&" ".repeat(fill(column, token)));
                }
                whitespaces.push(gap);
            }
            attribute.whitespaces = Some(whitespaces);
        }
    }
}

impl std::fmt::Display for SmlElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&crate::sml::ser::to_string(
            self,
            &crate::sml::ser::PrintOptions::default(),
        ))
    }
}

pub(crate) fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b) || a.to_lowercase() == b.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attribute(name: &str, values: &[Option<&str>]) -> SmlAttribute {
        SmlAttribute::new(name, values.iter().map(|v| v.map(str::to_string)).collect()).unwrap()
    }

    #[test]
    fn test_attribute_requires_values() {
        assert!(matches!(
            SmlAttribute::new("Lonely", vec![]),
            Err(Error::InvalidShape(_))
        ));
    }

    #[test]
    fn test_as_string() {
        assert_eq!(attribute("Title", &[Some("x")]).as_string().unwrap(), "x");
        assert!(attribute("Title", &[None]).as_string().is_err());
        assert!(attribute("Title", &[Some("x"), Some("y")]).as_string().is_err());
    }

    #[test]
    fn test_as_string_array() {
        assert_eq!(
            attribute("Keywords", &[Some("a"), Some("b")])
                .as_string_array()
                .unwrap(),
            vec!["a".to_string(), "b".to_string()]
        );
        assert!(attribute("Keywords", &[Some("a"), None])
            .as_string_array()
            .is_err());
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let mut element = SmlElement::new("Table");
        element.add_element(SmlElement::new("Meta"));
        element.push_attribute(attribute("Column1", &[Some("Column2")]));

        assert!(element.has_element("META"));
        assert!(element.has_attribute("column1"));
        assert!(element.element("meta").is_ok());
        assert!(matches!(element.element("Other"), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_lookup_outlives_name() {
        let mut element = SmlElement::new("Table");
        element.add_element(SmlElement::new("Meta"));
        element.add_attribute("Column1", vec![Some("Column2".to_string())]).unwrap();

        let found = {
            let name = String::from("COLUMN1");
            element.optional_attribute(&name).unwrap()
        };
        assert_eq!(found.map(|a| a.name.as_str()), Some("Column1"));

        let found = {
            let name = String::from("meta");
            element.optional_element(&name).unwrap()
        };
        assert_eq!(found.map(|e| e.name.as_str()), Some("Meta"));
        assert_eq!(element.nodes.len(), 2);
    }

    #[test]
    fn test_assure_element_count() {
        let element = SmlElement::parse("Root\n\tItem\n\tEnd\n\titem\n\tEnd\nEnd").unwrap();
        assert!(element.assure_element_count("Item", 2, Some(2)).is_ok());
        assert!(element.assure_element_count("Item", 0, None).is_ok());
        assert!(matches!(
            element.assure_element_count("Item", 0, Some(1)),
            Err(Error::InvalidShape(_))
        ));
        assert!(element.assure_element_count("Other", 1, None).is_err());
    }

    #[test]
    fn test_duplicate_lookup_fails() {
        let mut element = SmlElement::new("Meta");
        element.push_attribute(attribute("CustomData", &[Some("a")]));
        element.push_attribute(attribute("CustomData", &[Some("b")]));
        assert!(matches!(
            element.optional_attribute("CustomData"),
            Err(Error::InvalidShape(_))
        ));
    }

    #[test]
    fn test_align_attributes_left() {
        let mut element = SmlElement::new("Table");
        element.push_attribute(attribute("A", &[Some("B")]));
        element.push_attribute(attribute("Long", &[Some("C")]));
        element.align_attributes(" ", None, None);

        let first = element.attributes().next().unwrap();
        assert_eq!(
            first.whitespaces.as_deref(),
            Some(&["".to_string(), "    ".to_string()][..])
        );
    }

    #[test]
    fn test_align_attributes_right() {
        let mut element = SmlElement::new("Table");
        element.push_attribute(attribute("A", &[Some("Wide")]));
        element.push_attribute(attribute("B", &[Some("x")]));
        element.align_attributes(" ", None, Some(&[false, true]));

        let second = element.attributes().nth(1).unwrap();
        assert_eq!(
            second.whitespaces.as_deref(),
            Some(&["".to_string(), "    ".to_string()][..])
        );
    }

    #[test]
    fn test_alignment_is_not_part_of_equality() {
        let mut aligned = SmlElement::new("Table");
        aligned.push_attribute(attribute("A", &[Some("B")]));
        let plain = aligned.clone();
        aligned.align_attributes("   ", None, None);
        assert_eq!(aligned, plain);
    }
}
