use std::{collections::BTreeMap, path::PathBuf};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// The children of a directory node, keyed by path segment.
///
/// A `BTreeMap` keeps the segments in lexicographic order so the rendered
/// manifest is identical across builds.
pub type Children = BTreeMap<String, Node>;

/// An entry in the virtual filesystem tree of a manifest.
///
/// At any virtual path exactly one variant is bound: a directory of further
/// entries, a file whose contents the boot loader reads from a host path, or
/// a symlink recorded by its resolved target string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A directory containing other entries.
    Directory(Children),

    /// A file backed by a host path.
    File(PathBuf),

    /// A symlink recorded by its target.
    Link(String),
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl Node {
    /// Creates a new empty directory node.
    pub fn directory() -> Self {
        Node::Directory(Children::new())
    }

    /// Returns `true` if the node is a directory.
    pub fn is_directory(&self) -> bool {
        matches!(self, Node::Directory(_))
    }

    /// Returns `true` if the node is a file.
    pub fn is_file(&self) -> bool {
        matches!(self, Node::File(_))
    }

    /// Returns `true` if the node is a leaf entry, i.e. a file or a link.
    pub fn is_leaf(&self) -> bool {
        !self.is_directory()
    }

    /// Returns the children of a directory node.
    pub fn children(&self) -> Option<&Children> {
        match self {
            Node::Directory(children) => Some(children),
            _ => None,
        }
    }

    /// Returns the children of a directory node, mutably.
    pub fn children_mut(&mut self) -> Option<&mut Children> {
        match self {
            Node::Directory(children) => Some(children),
            _ => None,
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
