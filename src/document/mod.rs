#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Documents that rubric steps inspect.

use std::path::PathBuf;

/// tree-sitter backed HTML documents.
pub mod html;
/// The query contract over element trees.
pub mod query;

pub use html::HtmlDocument;
pub use query::{AttrPredicate, NodeId, Selector, TreeQuery};

/// Errors raised while loading or querying a document.
#[derive(thiserror::Error, Debug)]
pub enum DocumentError {
    /// Nothing exists at the given path.
    #[error("Cannot find {}", .0.display())]
    NotFound(PathBuf),
    /// The file exists but could not be read.
    #[error("Cannot read {}", path.display())]
    Io {
        /// Path that was read.
        path:   PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The source could not be turned into a tree.
    #[error("Cannot parse document: {0}")]
    Parse(String),
    /// An element lacks an attribute a step relies on.
    #[error("<{tag}> has no '{name}' attribute")]
    MissingAttribute {
        /// Tag of the element.
        tag:  String,
        /// Name of the attribute.
        name: String,
    },
    /// No element matched a required selector.
    #[error("No element matches '{0}'")]
    NoMatch(String),
}
