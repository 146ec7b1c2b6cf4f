#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! HTML documents parsed with tree-sitter into an owned element tree.

use std::{fmt::Formatter, fs, path::Path};

use tracing::{debug, warn};
use tree_sitter::Node;

use super::{
    DocumentError,
    query::{NodeId, TreeQuery},
};

/// Tag given to the synthetic node that holds the top-level elements.
pub const DOCUMENT_TAG: &str = "#document";

/// Something found between an element's start and end tags.
#[derive(Clone, Debug)]
enum Content {
    /// A nested element.
    Element(NodeId),
    /// A run of text.
    Text(Fragment),
}

/// A run of text and whether the source separated it from the previous run
/// with whitespace.
#[derive(Clone, Debug)]
struct Fragment {
    /// Decoded text.
    text:   String,
    /// Whitespace (outside of any tag) sits between this run and the one
    /// before it in document order.
    spaced: bool,
}

/// One element of the arena.
#[derive(Clone, Debug)]
struct Element {
    /// Lowercase tag name.
    tag:     String,
    /// Attributes in source order, names lowercased.
    attrs:   Vec<(String, String)>,
    /// Children in source order.
    content: Vec<Content>,
    /// Enclosing element.
    parent:  Option<NodeId>,
}

impl Element {
    /// Creates an element with no attributes or content.
    fn new(tag: impl Into<String>, parent: Option<NodeId>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
            content: Vec::new(),
            parent,
        }
    }
}

/// A parsed HTML document.
#[derive(Clone)]
pub struct HtmlDocument {
    /// Element arena; index 0 is the document node.
    nodes:      Vec<Element>,
    /// Whether tree-sitter had to recover from syntax errors.
    has_errors: bool,
}

/// Returns the compiled tree-sitter HTML language.
fn html_language() -> tree_sitter::Language {
    tree_sitter_html::LANGUAGE.into()
}

impl std::fmt::Debug for HtmlDocument {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HtmlDocument")
            .field("elements", &(self.nodes.len() - 1))
            .field("has_errors", &self.has_errors)
            .finish()
    }
}

impl HtmlDocument {
    /// Reads and parses the file at `path`.
    ///
    /// A file that does not exist is reported as [`DocumentError::NotFound`],
    /// one that cannot be read as [`DocumentError::Io`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(DocumentError::NotFound(path.to_path_buf()));
        }

        let source = fs::read_to_string(path).map_err(|source| DocumentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), bytes = source.len(), "loaded document");

        Self::parse(&source)
    }

    /// Parses HTML source.
    ///
    /// Syntax errors are recovered from where tree-sitter can; the result
    /// then reports [`HtmlDocument::has_errors`].
    pub fn parse(source: &str) -> Result<Self, DocumentError> {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&html_language())
            .map_err(|e| DocumentError::Parse(format!("Failed to load HTML grammar: {e}")))?;
        let tree = parser
            .parse(source, None)
            .ok_or_else(|| DocumentError::Parse("Error parsing HTML".to_string()))?;

        let root = tree.root_node();
        let mut doc = Self {
            nodes:      vec![Element::new(DOCUMENT_TAG, None)],
            has_errors: root.has_error(),
        };
        let mut last_text_end = None;
        doc.collect(root, NodeId(0), source.as_bytes(), &mut last_text_end)?;

        if doc.has_errors {
            warn!("HTML contains syntax errors; the element tree is a best-effort recovery");
        }

        Ok(doc)
    }

    /// Whether the source had syntax errors.
    pub fn has_errors(&self) -> bool {
        self.has_errors
    }

    /// Number of elements, not counting the document node.
    pub fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    /// Whether the document has no elements at all.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Adds everything below the syntax node `node` to `parent`.
    ///
    /// `last_text_end` is the end byte of the previous text run in document
    /// order.
    fn collect(
        &mut self,
        node: Node<'_>,
        parent: NodeId,
        src: &[u8],
        last_text_end: &mut Option<usize>,
    ) -> Result<(), DocumentError> {
        let mut cursor = node.walk();
        let children = node.named_children(&mut cursor).collect::<Vec<_>>();

        for child in children {
            match child.kind() {
                "element" | "script_element" | "style_element" => {
                    let id = self.open_element(child, parent, src)?;
                    self.collect(child, id, src, last_text_end)?;
                }
                "text" | "raw_text" | "entity" => {
                    let raw = node_text(child, src)?;
                    let text = if child.kind() == "entity" {
                        decode_entity(raw)
                    } else {
                        raw.to_string()
                    };
                    let spaced = last_text_end
                        .is_some_and(|end| gap_has_space(src, end, child.start_byte()));
                    *last_text_end = Some(child.end_byte());

                    self.nodes[parent.0]
                        .content
                        .push(Content::Text(Fragment { text, spaced }));
                }
                "ERROR" => self.collect(child, parent, src, last_text_end)?,
                _ => {}
            }
        }

        Ok(())
    }

    /// Creates the arena element for an `element` syntax node and returns
    /// its id.
    fn open_element(
        &mut self,
        node: Node<'_>,
        parent: NodeId,
        src: &[u8],
    ) -> Result<NodeId, DocumentError> {
        let mut cursor = node.walk();
        let tag_node = node
            .named_children(&mut cursor)
            .find(|c| matches!(c.kind(), "start_tag" | "self_closing_tag"));

        let mut element = Element::new(String::new(), Some(parent));
        if let Some(tag_node) = tag_node {
            let mut cursor = tag_node.walk();
            for part in tag_node.named_children(&mut cursor) {
                match part.kind() {
                    "tag_name" => element.tag = node_text(part, src)?.to_ascii_lowercase(),
                    "attribute" => element.attrs.push(attribute(part, src)?),
                    _ => {}
                }
            }
        }

        let id = NodeId(self.nodes.len());
        self.nodes.push(element);
        self.nodes[parent.0].content.push(Content::Element(id));
        Ok(id)
    }

    /// Gathers the text fragments below `node`.
    fn gather_text<'a>(&'a self, node: NodeId, out: &mut Vec<&'a Fragment>) {
        for content in &self.nodes[node.0].content {
            match content {
                Content::Text(fragment) => out.push(fragment),
                Content::Element(child) => self.gather_text(*child, out),
            }
        }
    }
}

/// Source text covered by a syntax node.
fn node_text<'s>(node: Node<'_>, src: &'s [u8]) -> Result<&'s str, DocumentError> {
    node.utf8_text(src)
        .map_err(|e| DocumentError::Parse(format!("Cannot map syntax node to source text: {e}")))
}

/// Reads an `attribute` syntax node into a lowercase name and its value.
/// Attributes written without a value get an empty one.
fn attribute(node: Node<'_>, src: &[u8]) -> Result<(String, String), DocumentError> {
    let mut name = String::new();
    let mut value = String::new();
    let mut cursor = node.walk();

    for part in node.named_children(&mut cursor) {
        match part.kind() {
            "attribute_name" => name = node_text(part, src)?.to_ascii_lowercase(),
            "attribute_value" => value = node_text(part, src)?.to_string(),
            "quoted_attribute_value" => {
                let mut inner = part.walk();
                if let Some(v) = part
                    .named_children(&mut inner)
                    .find(|c| c.kind() == "attribute_value")
                {
                    value = node_text(v, src)?.to_string();
                }
            }
            _ => {}
        }
    }

    Ok((name, value))
}

/// Whether `src[from..to]` has whitespace outside of markup. Tags, comments
/// and their attributes do not count.
fn gap_has_space(src: &[u8], from: usize, to: usize) -> bool {
    let Some(gap) = src.get(from..to) else {
        return false;
    };
    let mut in_tag = false;
    for &byte in gap {
        match byte {
            b'<' => in_tag = true,
            b'>' => in_tag = false,
            b if !in_tag && b.is_ascii_whitespace() => return true,
            _ => {}
        }
    }
    false
}

/// Decodes numeric character references and the named entities likely to
/// show up in page text. Anything else is kept as written.
fn decode_entity(entity: &str) -> String {
    let Some(body) = entity
        .strip_prefix('&')
        .map(|e| e.strip_suffix(';').unwrap_or(e))
    else {
        return entity.to_string();
    };

    if let Some(number) = body.strip_prefix('#') {
        let code = match number.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16),
            None => number.parse::<u32>(),
        };
        return code
            .ok()
            .and_then(char::from_u32)
            .map_or_else(|| entity.to_string(), String::from);
    }

    match body {
        "amp" => "&",
        "lt" => "<",
        "gt" => ">",
        "quot" => "\"",
        "apos" => "'",
        "nbsp" => "\u{a0}",
        "copy" => "\u{a9}",
        "reg" => "\u{ae}",
        "mdash" => "\u{2014}",
        "ndash" => "\u{2013}",
        "hellip" => "\u{2026}",
        _ => entity,
    }
    .to_string()
}

impl TreeQuery for HtmlDocument {
    fn root(&self) -> NodeId {
        NodeId(0)
    }

    fn tag(&self, node: NodeId) -> &str {
        &self.nodes[node.0].tag
    }

    fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.nodes[node.0]
            .attrs
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    fn text(&self, node: NodeId) -> String {
        let mut fragments = Vec::new();
        self.gather_text(node, &mut fragments);

        let mut text = String::new();
        for (idx, fragment) in fragments.into_iter().enumerate() {
            if idx > 0 && fragment.spaced {
                text.push(' ');
            }
            text.push_str(&fragment.text);
        }
        text
    }

    fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.nodes[node.0]
            .content
            .iter()
            .filter_map(|c| match c {
                Content::Element(id) => Some(*id),
                Content::Text(_) => None,
            })
            .collect()
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }
}
