//! Opaque custom payloads attached to metadata.
//!
//! A payload is stored in one of two ways, never both on the same element:
//!
//! ```text
//! CustomData text                     # inline, text only
//! CustomData application/xyz text     # inline, media type and text
//! CustomData                          # structured sub-tree, passed through
//!     MyAttribute 123
//! End
//! ```

use crate::sml::{SmlAttribute, SmlElement};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

pub(crate) const NAME: &str = "CustomData";

/// A custom payload in one of its two representations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CustomData {
    /// A `CustomData` element, kept as an untouched sub-tree.
    Element(SmlElement),
    /// A `CustomData` attribute with an optional media type.
    Inline {
        media_type: Option<String>,
        text_content: String,
    },
}

impl CustomData {
    /// Creates an inline payload.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tbl::CustomData;
    ///
    /// let data = CustomData::inline(Some("application/json"), "{}");
    /// assert_eq!(data.text_content(), Some("{}"));
    /// ```
    #[must_use]
    pub fn inline(media_type: Option<&str>, text_content: &str) -> Self {
        CustomData::Inline {
            media_type: media_type.map(str::to_string),
            text_content: text_content.to_string(),
        }
    }

    /// Wraps a structured payload. The element is renamed to `CustomData`
    /// so that it reads back as custom data.
    #[must_use]
    pub fn element(mut element: SmlElement) -> Self {
        element.name = NAME.to_string();
        CustomData::Element(element)
    }

    #[must_use]
    pub fn text_content(&self) -> Option<&str> {
        match self {
            CustomData::Inline { text_content, .. } => Some(text_content),
            CustomData::Element(_) => None,
        }
    }

    #[must_use]
    pub fn media_type(&self) -> Option<&str> {
        match self {
            CustomData::Inline { media_type, .. } => media_type.as_deref(),
            CustomData::Element(_) => None,
        }
    }

    #[must_use]
    pub fn as_element(&self) -> Option<&SmlElement> {
        match self {
            CustomData::Element(element) => Some(element),
            CustomData::Inline { .. } => None,
        }
    }

    /// Reads the custom data of `element`.
    ///
    /// # Errors
    ///
    /// - [`Error::ConflictingRepresentation`] if both the attribute and the
    ///   element form are present
    /// - [`Error::InvalidShape`] if either form is duplicated or the attribute
    ///   does not hold one or two non-null values
    pub fn read(element: &SmlElement) -> Result<Option<Self>> {
        let attribute = element.optional_attribute(NAME)?;
        let child = element.optional_element(NAME)?;

        match (attribute, child) {
            (Some(_), Some(_)) => Err(Error::conflicting_representation(&element.name)),
            (Some(attribute), None) => {
                attribute.assure_value_count(1, Some(2))?;
                let mut values = attribute.as_string_array()?;
                let text_content = values
                    .pop()
                    .ok_or_else(|| Error::invalid_shape("CustomData attribute has no value"))?;
                Ok(Some(CustomData::Inline {
                    media_type: values.pop(),
                    text_content,
                }))
            }
            (None, Some(child)) => Ok(Some(CustomData::Element(child.clone()))),
            (None, None) => Ok(None),
        }
    }

    /// Appends this payload to `element` in its representation. The element
    /// form is always written under the name `CustomData`.
    pub fn write(&self, element: &mut SmlElement) {
        match self {
            CustomData::Element(child) => {
                let mut child = child.clone();
                child.name = NAME.to_string();
                element.add_element(child);
            }
            CustomData::Inline {
                media_type,
                text_content,
            } => {
                let values = match media_type {
                    Some(media_type) => vec![Some(media_type.clone()), Some(text_content.clone())],
                    None => vec![Some(text_content.clone())],
                };
                element.push_attribute(SmlAttribute::from_parts(NAME.to_string(), values));
            }
        }
    }
}
