//! Document Writer
//!
//! Renders a [`Document`] as XML and writes it to disk behind a fixed
//! two-line preamble.

use std::fs;
use std::path::Path;

use crate::config::OutputFormat;
use crate::document::{Document, NodeId};
use crate::error::{Result, TypeError};

/// First line of every persisted document
pub const XML_DECLARATION: &str = "<?xml version=\"1.0\" ?>";

/// Second line of every persisted document
pub const GENERATOR_COMMENT: &str = "<!-- Automatically generated by ForSyDe -->";

/// Layout settings for [`render`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub format: OutputFormat,
    /// Indentation unit for one nesting level (pretty format only)
    pub indent: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            format: OutputFormat::Pretty,
            indent: "\t".to_string(),
        }
    }
}

impl RenderOptions {
    pub fn compact() -> Self {
        Self {
            format: OutputFormat::Compact,
            ..Self::default()
        }
    }
}

/// Render the document body, depth-first pre-order.
///
/// Elements without children are self-closing. Attributes appear in the
/// order they were attached.
pub fn render(document: &Document, options: &RenderOptions) -> String {
    let mut output = String::new();
    render_element(document, document.root(), 0, options, &mut output);
    if options.format == OutputFormat::Compact {
        output.push('\n');
    }
    output
}

/// Write the preamble followed by `body` to `path`, replacing any content.
///
/// The file is only created once the full text is ready, so a failure to
/// open the destination leaves nothing behind.
pub fn write(path: impl AsRef<Path>, body: &str) -> Result<usize> {
    let path = path.as_ref();
    let mut content = String::with_capacity(XML_DECLARATION.len() + GENERATOR_COMMENT.len() + body.len() + 2);
    content.push_str(XML_DECLARATION);
    content.push('\n');
    content.push_str(GENERATOR_COMMENT);
    content.push('\n');
    content.push_str(body);

    fs::write(path, &content).map_err(|source| TypeError::Persist {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(content.len())
}

fn render_element(document: &Document, id: NodeId, depth: usize, options: &RenderOptions, output: &mut String) {
    let Some(element) = document.get(id) else {
        return;
    };
    let pretty = options.format == OutputFormat::Pretty;

    if pretty {
        push_indent(output, &options.indent, depth);
    }
    output.push('<');
    output.push_str(element.tag());
    for (key, value) in element.attributes() {
        output.push(' ');
        output.push_str(key);
        output.push_str("=\"");
        escape_into(output, value);
        output.push('"');
    }

    if element.children().is_empty() {
        output.push_str("/>");
        if pretty {
            output.push('\n');
        }
        return;
    }

    output.push('>');
    if pretty {
        output.push('\n');
    }
    for child in element.children() {
        render_element(document, *child, depth + 1, options, output);
    }
    if pretty {
        push_indent(output, &options.indent, depth);
    }
    output.push_str("</");
    output.push_str(element.tag());
    output.push('>');
    if pretty {
        output.push('\n');
    }
}

fn push_indent(output: &mut String, indent: &str, depth: usize) {
    for _ in 0..depth {
        output.push_str(indent);
    }
}

// Fallback names carry generics (`Vec<i32>`), so attribute values need escaping.
fn escape_into(output: &mut String, value: &str) {
    for c in value.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            '"' => output.push_str("&quot;"),
            _ => output.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::tags;
    use tempfile::tempdir;

    fn int_document() -> Document {
        let mut doc = Document::new();
        let data_type = doc.append_child(doc.root(), tags::DATA_TYPE).unwrap();
        doc.set_attribute(data_type, tags::NAME, "int").unwrap();
        let primitive = doc.append_child(data_type, tags::PRIMITIVE).unwrap();
        doc.set_attribute(primitive, tags::NAME, "int").unwrap();
        doc.set_attribute(primitive, tags::SIZE, "4").unwrap();
        doc
    }

    #[test]
    fn test_render_empty_root() {
        let doc = Document::new();
        assert_eq!(render(&doc, &RenderOptions::default()), "<forsyde_types/>\n");
    }

    #[test]
    fn test_render_pretty() {
        let text = render(&int_document(), &RenderOptions::default());
        assert_eq!(
            text,
            "<forsyde_types>\n\
             \t<data_type name=\"int\">\n\
             \t\t<primitive name=\"int\" size=\"4\"/>\n\
             \t</data_type>\n\
             </forsyde_types>\n"
        );
    }

    #[test]
    fn test_render_compact() {
        let text = render(&int_document(), &RenderOptions::compact());
        assert_eq!(
            text,
            "<forsyde_types><data_type name=\"int\"><primitive name=\"int\" size=\"4\"/></data_type></forsyde_types>\n"
        );
    }

    #[test]
    fn test_render_custom_indent() {
        let options = RenderOptions {
            format: OutputFormat::Pretty,
            indent: "  ".to_string(),
        };
        let text = render(&int_document(), &options);
        assert!(text.contains("\n  <data_type name=\"int\">\n    <primitive"));
    }

    #[test]
    fn test_attribute_escaping() {
        let mut doc = Document::new();
        let node = doc.append_child(doc.root(), tags::DATA_TYPE).unwrap();
        doc.set_attribute(node, tags::NAME, "Vec<\"a\" & b>").unwrap();

        let text = render(&doc, &RenderOptions::compact());
        assert!(text.contains("name=\"Vec&lt;&quot;a&quot; &amp; b&gt;\""));
    }

    #[test]
    fn test_write_preamble_and_truncate() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.xml");
        fs::write(&path, "stale content that is much longer than the new document body").unwrap();

        write(&path, "<forsyde_types/>\n").unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            format!("{}\n{}\n<forsyde_types/>\n", XML_DECLARATION, GENERATOR_COMMENT)
        );
    }

    #[test]
    fn test_write_to_missing_directory() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("out.xml");

        let result = write(&path, "<forsyde_types/>\n");
        assert!(matches!(result, Err(TypeError::Persist { .. })));
        assert!(!path.exists());
    }
}
