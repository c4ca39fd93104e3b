//! Error types for TBL documents and the SML tree beneath them.
//!
//! Every failure is reported synchronously to the caller. Parsing is
//! all-or-nothing: the first violation aborts construction of the whole
//! document and no partially built value is returned.
//!
//! ## Error Categories
//!
//! - **Shape errors**: rows, columns, keywords or attribute values with the wrong arity
//! - **Structure errors**: wrong root element, missing columns, misplaced or duplicated `Meta`
//! - **Syntax errors**: malformed SML text, with line/column information
//! - **Transport errors**: malformed binary, byte-encoded or base64 input
//!
//! ## Examples
//!
//! ```rust
//! use tbl::{Error, TblDocument};
//!
//! let result = TblDocument::new(&["OnlyOne"]);
//! assert!(matches!(result, Err(Error::InvalidShape(_))));
//! ```

use thiserror::Error;

/// Represents all possible errors raised while building, parsing or printing
/// table documents.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(String),

    /// Malformed SML text
    #[error("Syntax error at line {line}, column {col}: {msg}")]
    Syntax { line: usize, col: usize, msg: String },

    /// Malformed binary SML
    #[error("Invalid binary data at byte {offset}: {msg}")]
    Binary { offset: usize, msg: String },

    /// Byte-level text decoding or base64 failure
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Arity or null violation on columns, rows, keywords or attribute values
    #[error("Invalid shape: {0}")]
    InvalidShape(String),

    /// A node did not carry the expected marker name
    #[error("Expected \"{expected}\" element, found \"{found}\"")]
    WrongNodeKind { expected: String, found: String },

    /// A table element without any attribute to take column names from
    #[error("Table has no column names")]
    MissingColumns,

    /// More than one `Meta` element
    #[error("Only one Meta element is allowed")]
    DuplicateMeta,

    /// `Meta` is not the first named node
    #[error("Meta element must be the first node")]
    OrderingViolation,

    /// A child element that is not allowed at this position
    #[error("Unexpected element \"{0}\"")]
    UnexpectedNode(String),

    /// Custom data given both as attribute and as element
    #[error("Conflicting custom data representations in \"{0}\"")]
    ConflictingRepresentation(String),

    /// Column metadata beyond the number of columns
    #[error("Column metadata already defined for all {capacity} columns")]
    CapacityExceeded { capacity: usize },

    /// A required property, attribute or element does not exist
    #[error("\"{0}\" does not exist")]
    NotFound(String),
}

impl Error {
    /// Creates a syntax error with line and column information.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tbl::Error;
    ///
    /// let err = Error::syntax(10, 5, "Invalid double quote in value");
    /// assert!(err.to_string().contains("line 10"));
    /// ```
    pub fn syntax(line: usize, col: usize, msg: &str) -> Self {
        Error::Syntax {
            line,
            col,
            msg: msg.to_string(),
        }
    }

    /// Creates a binary decoding error at the given byte offset.
    pub fn binary(offset: usize, msg: &str) -> Self {
        Error::Binary {
            offset,
            msg: msg.to_string(),
        }
    }

    /// Creates a shape error.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tbl::Error;
    ///
    /// let err = Error::invalid_shape("Row must have at least two values");
    /// assert!(err.to_string().contains("at least two"));
    /// ```
    pub fn invalid_shape(msg: &str) -> Self {
        Error::InvalidShape(msg.to_string())
    }

    /// Creates a node-kind mismatch error.
    pub fn wrong_node_kind(expected: &str, found: &str) -> Self {
        Error::WrongNodeKind {
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    pub fn unexpected_node(name: &str) -> Self {
        Error::UnexpectedNode(name.to_string())
    }

    pub fn conflicting_representation(name: &str) -> Self {
        Error::ConflictingRepresentation(name.to_string())
    }

    pub fn not_found(name: &str) -> Self {
        Error::NotFound(name.to_string())
    }

    /// Creates a text encoding error.
    pub fn encoding(msg: &str) -> Self {
        Error::Encoding(msg.to_string())
    }

    /// Creates an I/O error for reader/writer failures.
    pub fn io(msg: &str) -> Self {
        Error::Io(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
