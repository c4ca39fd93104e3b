//! Formatting options for table output.
//!
//! [`FormatOptions`] decides how the rows of a table are laid out when it is
//! printed as text. Only the table body is affected: a `Meta` block is always
//! aligned with a single space, whatever the body uses. Minified and binary
//! output ignore alignment entirely.
//!
//! ## Examples
//!
//! ```rust
//! use tbl::{FormatOptions, TblDocument};
//!
//! let mut document = TblDocument::new(&["Name", "Count"]).unwrap();
//! document.add_row(&[Some("Apples"), Some("3")]).unwrap();
//!
//! let options = FormatOptions::aligned()
//!     .with_whitespace_between("  ")
//!     .with_right_aligned(vec![false, true]);
//! assert_eq!(
//!     document.to_string_with_options(&options),
//!     "Table\n\tName    Count\n\tApples      3\nEnd"
//! );
//! ```

use crate::sml::SmlElement;
use serde::{Deserialize, Serialize};

const DEFAULT_WHITESPACE_BETWEEN: &str = " ";
const META_WHITESPACE_BETWEEN: &str = " ";

/// Layout of a table body in text output.
///
/// # Examples
///
/// ```rust
/// use tbl::FormatOptions;
///
/// // Plain output, one space between values
/// let options = FormatOptions::new();
/// assert!(!options.aligned);
///
/// // Values padded into columns
/// let options = FormatOptions::aligned().with_whitespace_between("  ");
/// assert_eq!(options.whitespace_between.as_deref(), Some("  "));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatOptions {
    /// Pad values so that columns line up.
    pub aligned: bool,
    /// Minimum gap between padded columns, one space if unset.
    pub whitespace_between: Option<String>,
    /// Per column, including the first, whether to pad on the left.
    pub right_aligned: Option<Vec<bool>>,
}

impl FormatOptions {
    /// Unaligned output.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Column-aligned output with a single space between columns.
    #[must_use]
    pub fn aligned() -> Self {
        FormatOptions {
            aligned: true,
            ..Default::default()
        }
    }

    /// Sets the minimum whitespace between aligned columns.
    #[must_use]
    pub fn with_whitespace_between(mut self, whitespace: &str) -> Self {
        self.whitespace_between = Some(whitespace.to_string());
        self
    }

    /// Sets which columns are padded on the left.
    #[must_use]
    pub fn with_right_aligned(mut self, mask: Vec<bool>) -> Self {
        self.right_aligned = Some(mask);
        self
    }

    /// Lays out the attribute rows of a table element.
    pub(crate) fn apply_to_body(&self, element: &mut SmlElement) {
        if !self.aligned {
            return;
        }
        element.align_attributes(
            self.whitespace_between
                .as_deref()
                .unwrap_or(DEFAULT_WHITESPACE_BETWEEN),
            None,
            self.right_aligned.as_deref(),
        );
    }

    /// Lays out a `Meta` element, independent of any body options.
    pub(crate) fn apply_to_meta(element: &mut SmlElement) {
        element.align_attributes(META_WHITESPACE_BETWEEN, None, None);
    }

    /// The same options without per-column masks, for bodies whose column
    /// layout is not known to the caller.
    pub(crate) fn without_right_aligned(&self) -> Self {
        FormatOptions {
            right_aligned: None,
            ..self.clone()
        }
    }
}
