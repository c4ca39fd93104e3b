//! TBL Format Reference
//!
//! This module documents the table format as implemented by this library. It
//! contains no code.
//!
//! # Overview
//!
//! A TBL document is an SML document whose root element is named `Table`.
//! SML is line based: every line is either an element start, an attribute
//! (a name followed by one or more values) or an element end. Names are
//! matched without regard to case.
//!
//! ```text
//! Table
//!     Column1 Column2 Column3
//!     Value11 Value12 Value13
//!     Value21 -
//! End
//! ```
//!
//! # Values
//!
//! Values are separated by whitespace.
//!
//! | Text | Value |
//! |------|-------|
//! | `Value` | the string `Value` |
//! | `-` | null |
//! | `"-"` | the string `-` |
//! | `""` | the empty string |
//! | `"Two Words"` | the string `Two Words` |
//! | `"Say ""hi"""` | the string `Say "hi"` |
//! | `"Line1"/"Line2"` | the string `Line1`, line feed, `Line2` |
//!
//! A value is written quoted when it is empty, equals `-`, or contains a
//! quote, a `#`, a line feed or whitespace. An unquoted `#` starts a comment
//! running to the end of the line.
//!
//! # Tables
//!
//! - The first attribute of `Table` holds the column names: its name is the
//!   first column, its values the others. A table has at least two columns
//!   and no column name is null.
//! - Every further attribute is a row. Its name is the first cell, which is
//!   never null. A row has at least two cells and at most one per column.
//!   Missing trailing cells are absent, not null.
//! - An optional `Meta` element must be the first node. It may appear once,
//!   and no other child element is allowed.
//!
//! ## Table metadata
//!
//! ```text
//! Meta
//!     Title "My Table"
//!     Description Text
//!     Language en
//!     Keywords Keyword1 Keyword2
//!     Column
//!         Title "First column"
//!     End
//!     CustomProperties
//!         Key Value
//!     End
//!     CustomData application/json {}
//! End
//! ```
//!
//! `Title`, `Description` and `Language` hold exactly one non-null value.
//! `Keywords` holds one or more non-null values. Each `Column` element
//! describes the column at its position, so there are never more `Column`
//! elements than columns. `CustomProperties` keys are case-insensitive and
//! keep their order. `CustomData` is either an attribute with an optional
//! media type and a text, or an element whose content is passed through
//! untouched, never both.
//!
//! # Collections
//!
//! A `Tables` element holds an optional `Meta` element (`Title`,
//! `Description`, `CustomData`) followed by `Table` elements.
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
//!
//! # Layouts
//!
//! ## Plain
//!
//! One tab per level of nesting, one space between values, `End` closing
//! each element.
//!
//! ## Aligned
//!
//! Values of the table body are padded so that columns line up. Widths are
//! counted in code points of the written values, quotes included, and no
//! line ends in whitespace. The gap between columns and the columns padded on
//! the left are configured with [`FormatOptions`](crate::FormatOptions):
//!
//! ```text
//! Table
//!     Column1         Column2  Column3
//!     "Long Value 11" Value12
//!     Value21         -
//! End
//! ```
//!
//! A `Meta` block is always aligned with a single space.
//!
//! ## Minified
//!
//! No indentation, one space between values, and `-` closing each element:
//!
//! ```text
//! Table
//! Column1 Column2
//! Value11 -
//! -
//! ```
//!
//! The end keyword of a document is taken from its last non-empty line, so
//! both forms read back without configuration.
//!
//! # Transport forms
//!
//! ## Bytes
//!
//! Text encoded as UTF-8, UTF-16 (big or little endian) or UTF-32, always
//! starting with its byte-order mark. Input without a mark is read as UTF-8.
//!
//! ## Base64
//!
//! `Base64|` followed by the standard base64 form of the encoded bytes and a
//! closing `|`.
//!
//! ## Binary
//!
//! The bytes `BS1` followed by one record per tree event. Every record starts
//! with an unsigned LEB128 varint:
//!
//! | Header | Record |
//! |--------|--------|
//! | `0` | end of the current element |
//! | `len << 2 \| 1` | element start, followed by `len` bytes of UTF-8 name |
//! | `len << 2 \| 2` | attribute, followed by the name, a value count and the values |
//!
//! Each attribute value is a varint `0` for null, or `len + 1` followed by
//! `len` bytes of UTF-8.
