//! Document outline (bookmark) tree.

use serde::{Deserialize, Serialize};

/// One node of a document's outline tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outline {
    /// Display title of the entry.
    pub title: String,
    /// Zero-based page the entry targets, if it targets a page.
    #[serde(default)]
    pub page: Option<usize>,
    /// Child entries.
    #[serde(default)]
    pub children: Vec<Outline>,
}

impl Outline {
    /// Create a leaf entry.
    pub fn new(title: impl Into<String>, page: Option<usize>) -> Self {
        Self {
            title: title.into(),
            page,
            children: Vec::new(),
        }
    }

    /// Add a child entry.
    pub fn with_child(mut self, child: Outline) -> Self {
        self.children.push(child);
        self
    }

    /// Total number of entries in the tree, this node included.
    pub fn len(&self) -> usize {
        1 + self.children.iter().map(Outline::len).sum::<usize>()
    }

    /// Always false: an outline has at least its own node.
    pub fn is_empty(&self) -> bool {
        false
    }
}
