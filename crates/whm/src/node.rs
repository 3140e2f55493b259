//! The materialized document tree.

use crate::style::RenderState;
use crate::tag::Tag;

/// Serialized node kind word. Table containers and cells are elements whose
/// box metrics surface as structural attributes rather than styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Plain,
    Table,
    TableCell,
}

impl ElementKind {
    pub fn is_table(self) -> bool {
        matches!(self, Self::Table | Self::TableCell)
    }
}

/// A document node: either a styled element or a bare text leaf.
#[derive(Debug)]
pub enum Node {
    Element(Element),
    Data(String),
}

impl Node {
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            Node::Data(_) => None,
        }
    }
}

#[derive(Debug)]
pub struct Element {
    pub kind: ElementKind,
    pub tag: Tag,
    /// Link target bytes, taken verbatim from the source (anchors, image
    /// sources). Empty when absent.
    pub link: String,
    /// Inline content for the `Text`/`ScriptObject` pseudo-tags.
    pub text: String,
    pub style: RenderState,
    pub children: Vec<Node>,
}
