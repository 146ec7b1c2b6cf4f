#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! The read-only query contract rubric steps program against.

use std::fmt;

use super::DocumentError;

/// Handle to an element inside a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

/// Test applied to an attribute value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrPredicate {
    /// The attribute is present, whatever its value.
    Present,
    /// The value equals the given string.
    Equals(String),
    /// The value starts with the given string.
    StartsWith(String),
    /// The value ends with the given string.
    EndsWith(String),
    /// The value contains the given string.
    Contains(String),
}

impl AttrPredicate {
    /// Applies the predicate to an attribute value.
    pub fn matches(&self, value: &str) -> bool {
        match self {
            AttrPredicate::Present => true,
            AttrPredicate::Equals(s) => value == s,
            AttrPredicate::StartsWith(s) => value.starts_with(s.as_str()),
            AttrPredicate::EndsWith(s) => value.ends_with(s.as_str()),
            AttrPredicate::Contains(s) => value.contains(s.as_str()),
        }
    }
}

/// Describes the elements a query looks for: a tag name, classes the element
/// must carry, and attribute predicates. Empty parts match anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selector {
    /// Required tag name, lowercase.
    tag:     Option<String>,
    /// Classes that must all be present.
    classes: Vec<String>,
    /// Attribute tests that must all hold.
    attrs:   Vec<(String, AttrPredicate)>,
}

impl Selector {
    /// Selector matching every element.
    pub fn any() -> Self {
        Self::default()
    }

    /// Selector matching elements with the given tag name.
    pub fn tag(name: impl Into<String>) -> Self {
        Self {
            tag: Some(name.into().to_ascii_lowercase()),
            ..Self::default()
        }
    }

    /// Also require the class `class`.
    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    /// Also require attribute `name` to satisfy `predicate`.
    pub fn attr(mut self, name: impl Into<String>, predicate: AttrPredicate) -> Self {
        self.attrs
            .push((name.into().to_ascii_lowercase(), predicate));
        self
    }

    /// Whether `node` of `doc` matches.
    pub fn matches<D: TreeQuery + ?Sized>(&self, doc: &D, node: NodeId) -> bool {
        if let Some(tag) = &self.tag
            && doc.tag(node) != tag
        {
            return false;
        }

        self.classes.iter().all(|c| doc.has_class(node, c))
            && self
                .attrs
                .iter()
                .all(|(name, pred)| doc.attr(node, name).is_some_and(|v| pred.matches(v)))
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag.as_deref().unwrap_or("*"))?;
        for class in &self.classes {
            write!(f, ".{class}")?;
        }
        for (name, pred) in &self.attrs {
            match pred {
                AttrPredicate::Present => write!(f, "[{name}]")?,
                AttrPredicate::Equals(v) => write!(f, "[{name}=\"{v}\"]")?,
                AttrPredicate::StartsWith(v) => write!(f, "[{name}^=\"{v}\"]")?,
                AttrPredicate::EndsWith(v) => write!(f, "[{name}$=\"{v}\"]")?,
                AttrPredicate::Contains(v) => write!(f, "[{name}*=\"{v}\"]")?,
            }
        }
        Ok(())
    }
}

/// Read-only access to a parsed element tree.
///
/// Implementors supply the structural accessors; the searches are provided
/// on top of them.
pub trait TreeQuery {
    /// The document's top-level node.
    fn root(&self) -> NodeId;

    /// Lowercase tag name of `node`.
    fn tag(&self, node: NodeId) -> &str;

    /// Value of attribute `name` on `node`, if present.
    fn attr(&self, node: NodeId, name: &str) -> Option<&str>;

    /// All text inside `node`, concatenated in document order. Runs of
    /// whitespace between text in the source become a single space; markup
    /// alone separates nothing.
    fn text(&self, node: NodeId) -> String;

    /// Element children of `node`; text is skipped.
    fn children(&self, node: NodeId) -> Vec<NodeId>;

    /// Parent of `node`, `None` for the root.
    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Whitespace separated entries of the `class` attribute.
    fn classes(&self, node: NodeId) -> Vec<&str> {
        self.attr(node, "class")
            .map(|c| c.split_whitespace().collect())
            .unwrap_or_default()
    }

    /// Whether `node` carries `class`.
    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.classes(node).contains(&class)
    }

    /// Value of attribute `name`, or an error naming the element.
    fn require_attr(&self, node: NodeId, name: &str) -> Result<&str, DocumentError> {
        self.attr(node, name)
            .ok_or_else(|| DocumentError::MissingAttribute {
                tag:  self.tag(node).to_string(),
                name: name.to_string(),
            })
    }

    /// `node` followed by each of its ancestors up to the root.
    fn ancestors(&self, node: NodeId) -> Vec<NodeId> {
        let mut path = vec![node];
        let mut current = node;
        while let Some(parent) = self.parent(current) {
            path.push(parent);
            current = parent;
        }
        path
    }

    /// Every element below `node`, in document order, excluding `node`.
    fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut stack = self.children(node);
        stack.reverse();
        while let Some(next) = stack.pop() {
            found.push(next);
            let mut children = self.children(next);
            children.reverse();
            stack.extend(children);
        }
        found
    }

    /// First descendant of `scope` matching `selector`.
    fn find(&self, scope: NodeId, selector: &Selector) -> Option<NodeId> {
        self.descendants(scope)
            .into_iter()
            .find(|n| selector.matches(self, *n))
    }

    /// Every descendant of `scope` matching `selector`.
    fn find_all(&self, scope: NodeId, selector: &Selector) -> Vec<NodeId> {
        self.descendants(scope)
            .into_iter()
            .filter(|n| selector.matches(self, *n))
            .collect()
    }

    /// Whether any descendant of `scope` matches `selector`.
    fn exists(&self, scope: NodeId, selector: &Selector) -> bool {
        self.find(scope, selector).is_some()
    }

    /// Like [`TreeQuery::find`], but a missing element is an error.
    fn require(&self, scope: NodeId, selector: &Selector) -> Result<NodeId, DocumentError> {
        self.find(scope, selector)
            .ok_or_else(|| DocumentError::NoMatch(selector.to_string()))
    }

    /// Closest node that is an ancestor of both `a` and `b`. A node counts
    /// as its own ancestor.
    fn common_ancestor(&self, a: NodeId, b: NodeId) -> Option<NodeId> {
        let of_b = self.ancestors(b);
        self.ancestors(a)
            .into_iter()
            .find(|n| of_b.contains(n))
    }
}
