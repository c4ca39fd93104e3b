//! Ordered, case-insensitive custom properties.
//!
//! This module provides [`CustomProperties`], an open-ended string-to-string
//! map attached to table metadata. It is backed by an [`IndexMap`] keyed by
//! the lower-cased key, so that:
//!
//! - **Lookups ignore case**: `Key`, `KEY` and `key` address the same entry
//! - **Casing is preserved**: the key text of the first insertion is kept
//! - **Order is preserved**: entries serialize in insertion order, and
//!   overwriting a value keeps its position
//!
//! ## Examples
//!
//! ```rust
//! use tbl::CustomProperties;
//!
//! let mut properties = CustomProperties::new();
//! properties.set("Key", "Value1");
//! properties.set("KEY", "Value2");
//!
//! assert_eq!(properties.entries(), vec![("Key".to_string(), "Value2".to_string())]);
//! ```

use crate::sml::{SmlAttribute, SmlElement};
use crate::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub(crate) const ELEMENT_NAME: &str = "CustomProperties";

/// An ordered map of custom property keys to values.
///
/// Serializes as a list of `[key, value]` pairs.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<(String, String)>", into = "Vec<(String, String)>")]
pub struct CustomProperties(IndexMap<String, (String, String)>);

fn normalize(key: &str) -> String {
    key.to_lowercase()
}

impl CustomProperties {
    /// Creates an empty map.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tbl::CustomProperties;
    ///
    /// let properties = CustomProperties::new();
    /// assert!(properties.is_empty());
    /// ```
    #[must_use]
    pub fn new() -> Self {
        CustomProperties(IndexMap::new())
    }

    /// Sets a property. An existing key, compared without case, keeps its
    /// text and position and only has its value replaced.
    pub fn set(&mut self, key: &str, value: &str) {
        match self.0.get_mut(&normalize(key)) {
            Some((_, existing)) => *existing = value.to_string(),
            None => {
                self.0
                    .insert(normalize(key), (key.to_string(), value.to_string()));
            }
        }
    }

    /// Sets several properties in order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tbl::CustomProperties;
    ///
    /// let mut properties = CustomProperties::new();
    /// properties.set_range([("Key1", "Value1"), ("Key2", "Value2")]);
    /// assert_eq!(properties.keys(), vec!["Key1".to_string(), "Key2".to_string()]);
    /// ```
    pub fn set_range<'a, I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        for (key, value) in entries {
            self.set(key, value);
        }
    }

    /// Removes a property if present. Later entries keep their relative order.
    pub fn unset(&mut self, key: &str) {
        self.0.shift_remove(&normalize(key));
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Returns the value of an existing property.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no property has this key.
    pub fn get(&self, key: &str) -> Result<&str> {
        self.get_or_null(key).ok_or_else(|| Error::not_found(key))
    }

    #[must_use]
    pub fn get_or_null(&self, key: &str) -> Option<&str> {
        self.0.get(&normalize(key)).map(|(_, value)| value.as_str())
    }

    #[must_use]
    pub fn get_or_default<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get_or_null(key).unwrap_or(default)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(&normalize(key))
    }

    /// Keys as first inserted, in order.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.iter().map(|(key, _)| key.to_string()).collect()
    }

    /// Owned copies of all entries, in order.
    #[must_use]
    pub fn entries(&self) -> Vec<(String, String)> {
        self.0.values().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .values()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn has_any(&self) -> bool {
        !self.is_empty()
    }

    /// Appends a `CustomProperties` element to `parent` unless the map is empty.
    pub(crate) fn serialize(&self, parent: &mut SmlElement) {
        if !self.has_any() {
            return;
        }
        let mut element = SmlElement::new(ELEMENT_NAME);
        for (key, value) in self.iter() {
            element.push_attribute(SmlAttribute::from_parts(
                key.to_string(),
                vec![Some(value.to_string())],
            ));
        }
        parent.add_element(element);
    }

    /// Reads the `CustomProperties` child of `parent`, if there is one.
    ///
    /// # Errors
    ///
    /// Fails if the element is duplicated, contains child elements, or an
    /// entry does not hold exactly one non-null value.
    pub(crate) fn parse(parent: &SmlElement) -> Result<Self> {
        let mut properties = CustomProperties::new();
        if let Some(element) = parent.optional_element(ELEMENT_NAME)? {
            element.assure_no_elements()?;
            for attribute in element.attributes() {
                properties.set(&attribute.name, attribute.as_string()?);
            }
        }
        Ok(properties)
    }
}

impl From<Vec<(String, String)>> for CustomProperties {
    fn from(entries: Vec<(String, String)>) -> Self {
        entries.into_iter().collect()
    }
}

impl From<CustomProperties> for Vec<(String, String)> {
    fn from(properties: CustomProperties) -> Self {
        properties.0.into_values().collect()
    }
}

impl FromIterator<(String, String)> for CustomProperties {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        let mut properties = CustomProperties::new();
        for (key, value) in iter {
            properties.set(&key, &value);
        }
        properties
    }
}

impl IntoIterator for CustomProperties {
    type Item = (String, String);
    type IntoIter = indexmap::map::IntoValues<String, (String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_values()
    }
}
