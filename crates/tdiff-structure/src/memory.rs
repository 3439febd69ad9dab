use std::fmt;
use std::hash::{Hash, Hasher};
use std::io::{self, Read};
use std::sync::Arc;

use crate::traits::{ContentSource, Named, Structured};

/// In-memory comparison input.
///
/// A `MemNode` is either a leaf or a container of ordered children, and may
/// carry byte content in both cases. Handles are reference-counted, so
/// cloning is cheap and children can be shared between trees.
///
/// Equality and hashing use the name only: two nodes with the same name on
/// different sides of a comparison are the same position.
#[derive(Clone)]
pub struct MemNode(Arc<MemNodeInner>);

struct MemNodeInner {
    name: String,
    content: Content,
    children: Option<Vec<MemNode>>,
}

enum Content {
    None,
    Bytes(Vec<u8>),
    /// Opening the content fails with an I/O error.
    Unreadable,
}

impl MemNode {
    /// A leaf with byte content.
    pub fn leaf(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self::build(name, Content::Bytes(content.into()), None)
    }

    /// A leaf whose content is UTF-8 text.
    pub fn text(name: impl Into<String>, text: &str) -> Self {
        Self::leaf(name, text.as_bytes())
    }

    /// A leaf without byte content.
    pub fn empty(name: impl Into<String>) -> Self {
        Self::build(name, Content::None, None)
    }

    /// A leaf whose content cannot be read.
    pub fn unreadable(name: impl Into<String>) -> Self {
        Self::build(name, Content::Unreadable, None)
    }

    /// A container with the given children, in order.
    pub fn container(name: impl Into<String>, children: impl IntoIterator<Item = MemNode>) -> Self {
        Self::build(name, Content::None, Some(children.into_iter().collect()))
    }

    /// The same node carrying `content` as its own bytes.
    pub fn with_content(self, content: impl Into<Vec<u8>>) -> Self {
        let children = self.0.children.clone();
        Self::build(self.0.name.clone(), Content::Bytes(content.into()), children)
    }

    fn build(name: impl Into<String>, content: Content, children: Option<Vec<MemNode>>) -> Self {
        Self(Arc::new(MemNodeInner {
            name: name.into(),
            content,
            children,
        }))
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// The byte content, if any is readable.
    pub fn content(&self) -> Option<&[u8]> {
        match &self.0.content {
            Content::Bytes(bytes) => Some(bytes.as_slice()),
            Content::None | Content::Unreadable => None,
        }
    }

    pub fn is_container(&self) -> bool {
        self.0.children.is_some()
    }

    /// Children of a container; empty for leaves.
    pub fn child_nodes(&self) -> &[MemNode] {
        self.0.children.as_deref().unwrap_or(&[])
    }

    /// Find a direct child by name.
    pub fn child(&self, name: &str) -> Option<&MemNode> {
        self.child_nodes().iter().find(|c| c.name() == name)
    }
}

impl PartialEq for MemNode {
    fn eq(&self, other: &Self) -> bool {
        self.0.name == other.0.name
    }
}

impl Eq for MemNode {}

impl Hash for MemNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.name.hash(state);
    }
}

impl fmt::Debug for MemNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("MemNode");
        s.field("name", &self.0.name);
        match &self.0.content {
            Content::None => {}
            Content::Bytes(bytes) => {
                s.field("bytes", &bytes.len());
            }
            Content::Unreadable => {
                s.field("unreadable", &true);
            }
        }
        if let Some(children) = &self.0.children {
            s.field("children", &children.len());
        }
        s.finish()
    }
}

impl Structured for MemNode {
    fn children(&self) -> Option<Vec<Self>> {
        self.0.children.clone()
    }
}

impl ContentSource for MemNode {
    fn open(&self) -> io::Result<Option<Box<dyn Read + '_>>> {
        match &self.0.content {
            Content::None => Ok(None),
            Content::Bytes(bytes) => Ok(Some(Box::new(bytes.as_slice()))),
            Content::Unreadable => Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("content of {} is unreadable", self.0.name),
            )),
        }
    }
}

impl Named for MemNode {
    fn name(&self) -> &str {
        &self.0.name
    }
}
