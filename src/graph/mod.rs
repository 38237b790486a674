//! The hierarchy graph: the mutable structure a scan ingests `ClassFact`s into, and the
//! transitive closures it precomputes once ingestion finishes.

pub mod node;

use std::collections::{HashMap, HashSet};

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;

use crate::error::{Diagnostic, ScanError};
use crate::jvm::fact::ClassFact;
use node::{ClassNode, InterfaceNode};

/// The decoded, cross-referenced type hierarchy recovered from a classpath.
///
/// Edges in both graphs point from the more specific type to the less specific one (subclass to
/// superclass, sub-interface to super-interface), so that "supertypes of X" is a forward BFS and
/// "subtypes of X" is a BFS against incoming edges.
pub struct HierarchyGraph {
    classes: DiGraph<ClassNode, ()>,
    class_index: HashMap<String, NodeIndex>,
    interfaces: DiGraph<InterfaceNode, ()>,
    interface_index: HashMap<String, NodeIndex>,
    /// Direct `class implements interface` links, class index to interface index.
    implements: Vec<(NodeIndex, NodeIndex)>,
    /// Annotation type dotted name to the set of classes/interfaces that declare it.
    annotated: HashMap<String, HashSet<String>>,
    finalized: bool,
}

impl Default for HierarchyGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl HierarchyGraph {
    /// An empty graph, ready for ingestion.
    #[must_use]
    pub fn new() -> Self {
        Self {
            classes: DiGraph::new(),
            class_index: HashMap::new(),
            interfaces: DiGraph::new(),
            interface_index: HashMap::new(),
            implements: Vec::new(),
            annotated: HashMap::new(),
            finalized: false,
        }
    }

    fn class_slot(&mut self, name: &str) -> NodeIndex {
        if let Some(&index) = self.class_index.get(name) {
            return index;
        }
        let index = self.classes.add_node(ClassNode::placeholder(name.to_owned()));
        self.class_index.insert(name.to_owned(), index);
        index
    }

    fn interface_slot(&mut self, name: &str) -> NodeIndex {
        if let Some(&index) = self.interface_index.get(name) {
            return index;
        }
        let index = self.interfaces.add_node(InterfaceNode::placeholder(name.to_owned()));
        self.interface_index.insert(name.to_owned(), index);
        index
    }

    /// Ingests one decoded class file. Returns a [`Diagnostic::ShadowSkip`] if an earlier root
    /// already supplied this binary name; the fact is then dropped rather than overwriting it.
    /// Returns [`ScanError::Fatal`] if the fact is self-contradictory in a way no amount of
    /// shadowing can explain (e.g. a class declaring itself as its own superclass).
    ///
    /// Callers MUST ingest every root's facts in ascending root-index order for shadowing to
    /// resolve correctly.
    pub fn ingest(&mut self, fact: ClassFact) -> Result<Option<Diagnostic>, ScanError> {
        for annotation in &fact.annotations {
            self.annotated
                .entry(annotation.clone())
                .or_default()
                .insert(fact.binary_name.clone());
        }

        if fact.kind.is_interface_like() {
            self.ingest_interface(fact)
        } else {
            self.ingest_class(fact)
        }
    }

    fn ingest_class(&mut self, fact: ClassFact) -> Result<Option<Diagnostic>, ScanError> {
        if fact.super_name.as_deref() == Some(fact.binary_name.as_str()) {
            return Err(ScanError::fatal(format!(
                "{} declares itself as its own superclass",
                fact.binary_name
            )));
        }

        let index = self.class_slot(&fact.binary_name);
        if let Some(existing) = self.classes[index].fact.as_ref() {
            return Ok(Some(Diagnostic::shadow_skip(
                fact.binary_name,
                existing.root_index,
                fact.root_index,
            )));
        }

        let super_index = fact.super_name.as_deref().map(|name| self.class_slot(name));
        let interface_indices: Vec<_> = fact
            .interfaces
            .iter()
            .map(|name| self.interface_slot(name))
            .collect();

        self.classes[index].fact = Some(fact);
        self.classes[index].encountered = true;

        if let Some(super_index) = super_index {
            self.classes.add_edge(index, super_index, ());
        }
        for interface_index in interface_indices {
            self.implements.push((index, interface_index));
        }
        Ok(None)
    }

    fn ingest_interface(&mut self, fact: ClassFact) -> Result<Option<Diagnostic>, ScanError> {
        if fact.interfaces.iter().any(|name| name == &fact.binary_name) {
            return Err(ScanError::fatal(format!(
                "{} declares itself as its own superinterface",
                fact.binary_name
            )));
        }

        let index = self.interface_slot(&fact.binary_name);
        if let Some(existing) = self.interfaces[index].fact.as_ref() {
            return Ok(Some(Diagnostic::shadow_skip(
                fact.binary_name,
                existing.root_index,
                fact.root_index,
            )));
        }

        let extends_indices: Vec<_> = fact
            .interfaces
            .iter()
            .map(|name| self.interface_slot(name))
            .collect();

        self.interfaces[index].fact = Some(fact);
        self.interfaces[index].encountered = true;

        for super_interface in extends_indices {
            self.interfaces.add_edge(index, super_interface, ());
        }
        Ok(None)
    }

    /// Marks ingestion complete. Subsequent queries are only meaningful after this is called.
    pub fn finalize(&mut self) {
        self.finalized = true;
    }

    /// Whether [`Self::finalize`] has been called.
    #[must_use]
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// The `ClassFact` for a binary name, if it was encountered and is a class (not an
    /// interface).
    #[must_use]
    pub fn class_fact(&self, binary_name: &str) -> Option<&ClassFact> {
        self.class_index
            .get(binary_name)
            .and_then(|&i| self.classes[i].fact.as_ref())
    }

    /// The `ClassFact` for a binary name, if it was encountered and is an interface.
    #[must_use]
    pub fn interface_fact(&self, binary_name: &str) -> Option<&ClassFact> {
        self.interface_index
            .get(binary_name)
            .and_then(|&i| self.interfaces[i].fact.as_ref())
    }

    /// Every binary name that was actually decoded (as a class or as an interface), excluding
    /// forward-reference placeholders that were never filled in.
    pub fn encountered_names(&self) -> impl Iterator<Item = &str> {
        let classes = self
            .classes
            .node_weights()
            .filter(|n| n.encountered)
            .map(|n| n.binary_name.as_str());
        let interfaces = self
            .interfaces
            .node_weights()
            .filter(|n| n.encountered)
            .map(|n| n.binary_name.as_str());
        classes.chain(interfaces)
    }

    /// The dotted names of every class directly or transitively extending `binary_name`,
    /// including classes only ever referenced as a superclass (placeholders).
    #[must_use]
    pub fn all_subclasses(&self, binary_name: &str) -> Vec<String> {
        let Some(&start) = self.class_index.get(binary_name) else {
            return Vec::new();
        };
        bfs_names(&self.classes, start, Direction::Incoming)
    }

    /// The dotted names of every class `binary_name` directly or transitively extends, stopping
    /// at forward-reference placeholders that were never themselves decoded (their own
    /// superclass is unknown).
    #[must_use]
    pub fn all_superclasses(&self, binary_name: &str) -> Vec<String> {
        let Some(&start) = self.class_index.get(binary_name) else {
            return Vec::new();
        };
        bfs_names(&self.classes, start, Direction::Outgoing)
    }

    /// The dotted names of every interface directly or transitively extending `binary_name`.
    #[must_use]
    pub fn all_subinterfaces(&self, binary_name: &str) -> Vec<String> {
        let Some(&start) = self.interface_index.get(binary_name) else {
            return Vec::new();
        };
        bfs_names(&self.interfaces, start, Direction::Incoming)
    }

    /// The dotted names of every interface `binary_name` directly or transitively extends.
    #[must_use]
    pub fn all_superinterfaces_of_interface(&self, binary_name: &str) -> Vec<String> {
        let Some(&start) = self.interface_index.get(binary_name) else {
            return Vec::new();
        };
        bfs_names(&self.interfaces, start, Direction::Outgoing)
    }

    /// Every interface `binary_name` implements, directly or transitively: its own declared
    /// interfaces, those interfaces' superinterfaces, and (for a class) the declared and
    /// superinterfaces of every class it extends.
    #[must_use]
    pub fn all_superinterfaces(&self, binary_name: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut result = Vec::new();

        let class_chain = if self.class_index.contains_key(binary_name) {
            let mut chain = vec![binary_name.to_string()];
            chain.extend(self.all_superclasses(binary_name));
            chain
        } else {
            vec![binary_name.to_string()]
        };

        for class_name in &class_chain {
            let Some(&class_index) = self.class_index.get(class_name) else {
                continue;
            };
            for &(c, i) in &self.implements {
                if c == class_index {
                    let name = &self.interfaces[i].binary_name;
                    for reachable in std::iter::once(name.clone()).chain(self.all_superinterfaces_of_interface(name)) {
                        if seen.insert(reachable.clone()) {
                            result.push(reachable);
                        }
                    }
                }
            }
        }

        if self.interface_index.contains_key(binary_name) {
            for reachable in self.all_superinterfaces_of_interface(binary_name) {
                if seen.insert(reachable.clone()) {
                    result.push(reachable);
                }
            }
        }

        result
    }

    /// Every class that implements `interface_name`, directly or by inheriting the
    /// implementation from a superclass, or by implementing a sub-interface of it.
    #[must_use]
    pub fn implementing_classes(&self, interface_name: &str) -> Vec<String> {
        let Some(&target) = self.interface_index.get(interface_name) else {
            return Vec::new();
        };
        let relevant_interfaces: HashSet<NodeIndex> = std::iter::once(target)
            .chain(bfs_indices(&self.interfaces, target, Direction::Incoming))
            .collect();

        let direct_implementors: HashSet<NodeIndex> = self
            .implements
            .iter()
            .filter(|(_, i)| relevant_interfaces.contains(i))
            .map(|(c, _)| *c)
            .collect();

        let mut all = HashSet::new();
        for &class_index in &direct_implementors {
            all.insert(class_index);
            for sub in bfs_indices(&self.classes, class_index, Direction::Incoming) {
                all.insert(sub);
            }
        }

        all.into_iter()
            .filter_map(|i| self.classes[i].fact.as_ref().map(|_| self.classes[i].binary_name.clone()))
            .collect()
    }

    /// Every class or interface that declares `annotation_name` directly.
    #[must_use]
    pub fn annotated_with(&self, annotation_name: &str) -> Vec<String> {
        self.annotated
            .get(annotation_name)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }
}

fn bfs_names<N: HasBinaryName, E>(
    graph: &DiGraph<N, E>,
    start: NodeIndex,
    direction: Direction,
) -> Vec<String> {
    bfs_indices(graph, start, direction)
        .into_iter()
        .map(|i| graph[i].binary_name().to_owned())
        .collect()
}

/// Breadth-first traversal along `direction`, returning strict descendants of `start` in BFS
/// order (never `start` itself).
fn bfs_indices<N, E>(graph: &DiGraph<N, E>, start: NodeIndex, direction: Direction) -> Vec<NodeIndex> {
    let mut visited = HashSet::from([start]);
    let mut queue = std::collections::VecDeque::from([start]);
    let mut order = Vec::new();
    while let Some(current) = queue.pop_front() {
        for neighbor in graph.neighbors_directed(current, direction) {
            if visited.insert(neighbor) {
                order.push(neighbor);
                queue.push_back(neighbor);
            }
        }
    }
    order
}

trait HasBinaryName {
    fn binary_name(&self) -> &str;
}

impl HasBinaryName for ClassNode {
    fn binary_name(&self) -> &str {
        &self.binary_name
    }
}

impl HasBinaryName for InterfaceNode {
    fn binary_name(&self) -> &str {
        &self.binary_name
    }
}
