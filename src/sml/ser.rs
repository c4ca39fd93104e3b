//! SML text printing.
//!
//! Elements print as a name line, their nodes one level deeper, and a closing
//! end-keyword line. Lines are joined with `\n` and no trailing line break is
//! written.
//!
//! ```rust
//! use tbl::sml::SmlElement;
//!
//! let mut table = SmlElement::new("Table");
//! table
//!     .add_attribute("Column1", vec![Some("Column2".to_string())])
//!     .unwrap();
//! assert_eq!(table.to_string(), "Table\n\tColumn1 Column2\nEnd");
//! ```

use crate::sml::node::{eq_ignore_case, SmlAttribute, SmlElement, SmlNode};
use crate::sml::wsv;

/// Layout choices for printing a tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrintOptions {
    /// Keyword closing an element; `None` writes the null token `-`.
    pub end_keyword: Option<String>,
    /// Prefix repeated once per nesting level.
    pub indentation: String,
    /// Drop attribute alignment and separate every token by one space.
    pub minified: bool,
}

impl Default for PrintOptions {
    fn default() -> Self {
        PrintOptions {
            end_keyword: Some("End".to_string()),
            indentation: "\t".to_string(),
            minified: false,
        }
    }
}

impl PrintOptions {
    /// Most compact layout: no indentation, `-` as end keyword.
    #[must_use]
    pub fn minified() -> Self {
        PrintOptions {
            end_keyword: None,
            indentation: String::new(),
            minified: true,
        }
    }
}

struct Printer<'a> {
    output: String,
    options: &'a PrintOptions,
}

impl<'a> Printer<'a> {
    fn new(options: &'a PrintOptions) -> Self {
        Printer {
            output: String::with_capacity(256),
            options,
        }
    }

    fn write_line_start(&mut self, depth: usize) {
        if !self.output.is_empty() {
            self.output.push('\n');
        }
        for _ in 0..depth {
            self.output.push_str(&self.options.indentation);
        }
    }

    /// Names colliding with the end keyword are quoted so they read back as names.
    fn name_token(&self, name: &str) -> String {
        let token = wsv::serialize_value(Some(name));
        match self.options.end_keyword.as_deref() {
            Some(keyword) if eq_ignore_case(name, keyword) && !token.starts_with('"') => {
                wsv::quote(name)
            }
            _ => token,
        }
    }

    fn write_element(&mut self, element: &SmlElement, depth: usize) {
        self.write_line_start(depth);
        let name = self.name_token(&element.name);
        self.output.push_str(&name);

        for node in &element.nodes {
            match node {
                SmlNode::Element(child) => self.write_element(child, depth + 1),
                SmlNode::Attribute(attribute) => self.write_attribute(attribute, depth + 1),
            }
        }

        self.write_line_start(depth);
        let end = wsv::serialize_value(self.options.end_keyword.as_deref());
        self.output.push_str(&end);
    }

    fn write_attribute(&mut self, attribute: &SmlAttribute, depth: usize) {
        self.write_line_start(depth);
        let mut tokens = attribute.tokens();
        tokens[0] = self.name_token(&attribute.name);

        let layout = attribute
            .whitespaces
            .as_ref()
            .filter(|whitespaces| !self.options.minified && whitespaces.len() == tokens.len());

        match layout {
            Some(whitespaces) => {
                for (gap, token) in whitespaces.iter().zip(&tokens) {
                    self.output.push_str(gap);
                    self.output.push_str(token);
                }
            }
            None => self.output.push_str(&tokens.join(" ")),
        }
    }
}

/// Prints `element` as a complete document.
#[must_use]
pub fn to_string(element: &SmlElement, options: &PrintOptions) -> String {
    let mut printer = Printer::new(options);
    printer.write_element(element, 0);
    printer.output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SmlElement {
        let mut root = SmlElement::new("Tables");
        let mut meta = SmlElement::new("Meta");
        meta.add_attribute("Description", vec![Some("Text".to_string())])
            .unwrap();
        root.add_element(meta);
        let mut table = SmlElement::new("Table");
        table
            .add_attribute("Column1", vec![Some("Column2".to_string())])
            .unwrap();
        table
            .add_attribute("\"Long Value\"", vec![None])
            .unwrap();
        root.add_element(table);
        root
    }

    #[test]
    fn test_default_layout() {
        assert_eq!(
            to_string(&sample(), &PrintOptions::default()),
            "Tables\n\tMeta\n\t\tDescription Text\n\tEnd\n\tTable\n\t\tColumn1 Column2\n\t\t\"\"\"Long Value\"\"\" -\n\tEnd\nEnd"
        );
    }

    #[test]
    fn test_minified_layout() {
        assert_eq!(
            to_string(&sample(), &PrintOptions::minified()),
            "Tables\nMeta\nDescription Text\n-\nTable\nColumn1 Column2\n\"\"\"Long Value\"\"\" -\n-\n-"
        );
    }

    #[test]
    fn test_end_keyword_names_are_quoted() {
        let mut root = SmlElement::new("Root");
        root.add_element(SmlElement::new("end"));
        assert_eq!(
            to_string(&root, &PrintOptions::default()),
            "Root\n\t\"end\"\n\tEnd\nEnd"
        );
        assert_eq!(
            to_string(&root, &PrintOptions::minified()),
            "Root\nend\n-\n-"
        );
    }

    #[test]
    fn test_aligned_attributes_only_in_text_layout() {
        let mut root = SmlElement::new("Table");
        root.add_attribute("A", vec![Some("B".to_string())]).unwrap();
        root.add_attribute("Long", vec![Some("C".to_string())])
            .unwrap();
        root.align_attributes(" ", None, None);

        assert_eq!(
            to_string(&root, &PrintOptions::default()),
            "Table\n\tA    B\n\tLong C\nEnd"
        );
        assert_eq!(
            to_string(&root, &PrintOptions::minified()),
            "Table\nA B\nLong C\n-"
        );
    }
}
