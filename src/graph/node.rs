//! The two node kinds of the hierarchy graph: classes and interfaces live in separate graphs
//! because only interfaces form a DAG under `extends` — classes form a tree under `extends`,
//! and `implements` edges cross from one graph into the other.

use crate::jvm::fact::ClassFact;

/// A node of the class graph.
///
/// A node exists before its class file has necessarily been decoded: referencing a superclass
/// that hasn't been ingested yet creates a placeholder (`encountered = false`, `fact = None`),
/// which is filled in if and when that class's own file is decoded.
#[derive(Debug, Clone)]
pub struct ClassNode {
    /// The dotted binary name this node stands for.
    pub binary_name: String,
    /// The decoded class, once ingested. `None` for a forward-reference placeholder.
    pub fact: Option<ClassFact>,
    /// Whether this class's own class file has been decoded and ingested.
    pub encountered: bool,
}

impl ClassNode {
    pub(crate) fn placeholder(binary_name: String) -> Self {
        Self {
            binary_name,
            fact: None,
            encountered: false,
        }
    }
}

/// A node of the interface graph. See [`ClassNode`] for the placeholder discipline, which is
/// identical.
#[derive(Debug, Clone)]
pub struct InterfaceNode {
    /// The dotted binary name this node stands for.
    pub binary_name: String,
    /// The decoded interface, once ingested. `None` for a forward-reference placeholder.
    pub fact: Option<ClassFact>,
    /// Whether this interface's own class file has been decoded and ingested.
    pub encountered: bool,
}

impl InterfaceNode {
    pub(crate) fn placeholder(binary_name: String) -> Self {
        Self {
            binary_name,
            fact: None,
            encountered: false,
        }
    }
}
