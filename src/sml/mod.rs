//! The Simple Markup Language tree that TBL documents are projected onto.
//!
//! An SML document is a single root element. Elements hold an ordered mix of
//! attributes (a name plus one or more nullable values on one line) and nested
//! elements. The tree can be written as indented text, as minified text, or in
//! a compact binary form:
//!
//! ```text
//! Table
//!     Column1 Column2
//!     Value11 -
//! End
//! ```
//!
//! ## Modules
//!
//! - [`node`]: [`SmlElement`], [`SmlAttribute`] and [`SmlNode`]
//! - [`ser`]: text printing with [`PrintOptions`]
//! - [`de`]: text parsing
//! - [`binary`]: the `BS1` binary codec

pub mod binary;
pub mod de;
pub mod node;
pub mod ser;
pub(crate) mod wsv;

pub use node::{SmlAttribute, SmlElement, SmlNode};
pub use ser::PrintOptions;

use crate::encoding::{self, Encoding};
use crate::Result;

/// A root element together with the layout it is printed with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SmlDocument {
    pub root: SmlElement,
    /// `None` closes elements with the null token `-`.
    pub end_keyword: Option<String>,
    pub default_indentation: String,
}

impl SmlDocument {
    #[must_use]
    pub fn new(root: SmlElement) -> Self {
        let defaults = PrintOptions::default();
        SmlDocument {
            root,
            end_keyword: defaults.end_keyword,
            default_indentation: defaults.indentation,
        }
    }

    /// # Errors
    ///
    /// Returns [`crate::Error::Syntax`] for malformed text.
    pub fn parse(content: &str) -> Result<Self> {
        de::from_str(content)
    }

    /// # Errors
    ///
    /// Fails if the bytes are not validly encoded text or not valid SML.
    pub fn from_bytes(bytes: &[u8]) -> Result<(Self, Encoding)> {
        let (text, encoding) = encoding::decode(bytes)?;
        Ok((Self::parse(&text)?, encoding))
    }

    /// # Errors
    ///
    /// Returns [`crate::Error::Binary`] for malformed input.
    pub fn from_binary_sml(bytes: &[u8]) -> Result<Self> {
        binary::decode(bytes).map(Self::new)
    }

    fn print_options(&self) -> PrintOptions {
        PrintOptions {
            end_keyword: self.end_keyword.clone(),
            indentation: self.default_indentation.clone(),
            minified: false,
        }
    }

    #[must_use]
    pub fn to_minified_string(&self) -> String {
        ser::to_string(&self.root, &PrintOptions::minified())
    }

    #[must_use]
    pub fn to_bytes(&self, encoding: Encoding) -> Vec<u8> {
        encoding::encode(&self.to_string(), encoding)
    }

    #[must_use]
    pub fn to_binary_sml(&self) -> Vec<u8> {
        binary::encode(&self.root)
    }
}

impl std::fmt::Display for SmlDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&ser::to_string(&self.root, &self.print_options()))
    }
}

impl std::str::FromStr for SmlDocument {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
