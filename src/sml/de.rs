//! SML text parsing.
//!
//! The end keyword is not fixed: it is whatever single value stands on the
//! last non-empty line, so `End`, `Ende` or the null token `-` (as written by
//! the minified printer) are all accepted. Comments and blank lines are
//! dropped while reading.
//!
//! ```rust
//! use tbl::sml::SmlDocument;
//!
//! let document = SmlDocument::parse("Table\nColumn1 Column2\n-").unwrap();
//! assert_eq!(document.end_keyword, None);
//! assert!(document.root.has_attribute("Column1"));
//! ```

use crate::sml::node::{eq_ignore_case, SmlAttribute, SmlElement};
use crate::sml::wsv::{self, Token};
use crate::sml::SmlDocument;
use crate::{Error, Result};

struct Line {
    number: usize,
    tokens: Vec<Token>,
}

/// Parser state over the tokenized, non-empty lines of a document.
struct Parser {
    lines: Vec<Line>,
    end_keyword: Option<String>,
}

impl Parser {
    fn new(content: &str) -> Result<Self> {
        let mut lines = Vec::new();
        for (index, text) in content.split('\n').enumerate() {
            let tokens = wsv::parse_line(text, index + 1)?;
            if !tokens.is_empty() {
                lines.push(Line {
                    number: index + 1,
                    tokens,
                });
            }
        }

        let last = lines
            .last()
            .ok_or_else(|| Error::syntax(1, 1, "Document has no root element"))?;
        if last.tokens.len() != 1 {
            return Err(Error::syntax(
                last.number,
                1,
                "Last line must hold only the end keyword",
            ));
        }
        let end_keyword = last.tokens[0].value.clone();

        Ok(Parser { lines, end_keyword })
    }

    fn is_end(&self, token: &Token) -> bool {
        if token.quoted {
            return false;
        }
        match (&self.end_keyword, &token.value) {
            (None, None) => true,
            (Some(keyword), Some(value)) => eq_ignore_case(keyword, value),
            _ => false,
        }
    }

    fn element_name(line: &Line) -> Result<String> {
        line.tokens[0].value.clone().ok_or_else(|| {
            Error::syntax(
                line.number,
                1,
                "Null value as element name is not allowed",
            )
        })
    }

    /// Builds the tree with an explicit stack of open elements so that deeply
    /// nested input cannot exhaust the call stack.
    fn parse(self) -> Result<SmlDocument> {
        let mut lines = self.lines.iter();
        let first = lines
            .next()
            .ok_or_else(|| Error::syntax(1, 1, "Document has no root element"))?;
        if first.tokens.len() != 1 || self.is_end(&first.tokens[0]) {
            return Err(Error::syntax(first.number, 1, "Invalid root element start"));
        }

        let mut open = vec![SmlElement::new(Self::element_name(first)?)];
        let mut root = None;

        for line in lines {
            let Some(current) = open.last_mut() else {
                return Err(Error::syntax(
                    line.number,
                    1,
                    "Only one root element is allowed",
                ));
            };

            if line.tokens.len() > 1 {
                let name = line.tokens[0].value.clone().ok_or_else(|| {
                    Error::syntax(
                        line.number,
                        1,
                        "Null value as attribute name is not allowed",
                    )
                })?;
                let values = line.tokens[1..].iter().map(|t| t.value.clone()).collect();
                current.push_attribute(SmlAttribute::from_parts(name, values));
            } else if self.is_end(&line.tokens[0]) {
                if let Some(closed) = open.pop() {
                    match open.last_mut() {
                        Some(parent) => parent.add_element(closed),
                        None => root = Some(closed),
                    }
                }
            } else {
                open.push(SmlElement::new(Self::element_name(line)?));
            }
        }

        match (root, open.last()) {
            (Some(root), None) => {
                let mut document = SmlDocument::new(root);
                document.end_keyword = self.end_keyword;
                Ok(document)
            }
            (_, Some(unclosed)) => Err(Error::syntax(
                self.lines.last().map_or(1, |l| l.number),
                1,
                &format!("Element \"{}\" not closed", unclosed.name),
            )),
            (None, None) => Err(Error::syntax(1, 1, "Document has no root element")),
        }
    }
}

/// Parses SML text into a document.
///
/// # Errors
///
/// Returns [`Error::Syntax`] with the offending line for malformed values,
/// unclosed elements, null names or content after the root element.
pub fn from_str(content: &str) -> Result<SmlDocument> {
    let document = Parser::new(content)?.parse()?;
    tracing::trace!(
        root = %document.root.name,
        nodes = document.root.nodes.len(),
        "parsed SML document"
    );
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nested() {
        let document =
            from_str("Table\n\tMeta\n\t\tTitle \"My Table\"\n\tEnd\n\tColumn1 Column2\nEnd").unwrap();
        assert_eq!(document.end_keyword.as_deref(), Some("End"));
        let meta = document.root.element("Meta").unwrap();
        assert_eq!(meta.attribute("Title").unwrap().as_string().unwrap(), "My Table");
        assert_eq!(document.root.attributes().count(), 1);
    }

    #[test]
    fn test_comments_and_blank_lines_are_skipped() {
        let document = from_str("# header\nTable\n\n\tA B # note\nEnd\n").unwrap();
        assert_eq!(document.root.nodes.len(), 1);
    }

    #[test]
    fn test_custom_end_keyword_is_case_insensitive() {
        let document = from_str("Root\n\tChild\n\tende\nEnde").unwrap();
        assert!(document.root.has_element("child"));
    }

    #[test]
    fn test_quoted_end_keyword_is_a_name() {
        let document = from_str("Root\n\t\"End\"\n\tEnd\nEnd").unwrap();
        assert!(document.root.has_element("End"));
    }

    #[test]
    fn test_errors() {
        assert!(from_str("").is_err());
        assert!(from_str("Root\n\tChild\nEnd").is_err());
        assert!(from_str("Root\nEnd\nOther\nEnd").is_err());
        assert!(from_str("Root\n\t- value\nEnd").is_err());
        assert!(from_str("Root\n\tA B\nEnd C").is_err());
        assert!(matches!(
            from_str("Root\n\t-\nEnd"),
            Err(Error::Syntax { line: 2, .. })
        ));
    }
}
