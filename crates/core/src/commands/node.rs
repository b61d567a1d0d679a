use crate::commands::binding::{Binding, Role};
use crate::commands::token::Identity;
use crate::diagnostic::Location;
use crate::member::MemberId;
use indexmap::{IndexMap, IndexSet};
use itertools::Itertools;
use petgraph::dot::{Config, Dot};
use petgraph::graph::{DiGraph, NodeIndex};
use rustc_hash::FxBuildHasher;
use std::fmt;
use std::iter;
use std::ops::{Index, IndexMut};

pub type NodeIdx = NodeIndex;
pub type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;
pub type FxIndexSet<T> = IndexSet<T, FxBuildHasher>;

/// A pattern line that visited a node, pointing at the token that named it.
#[derive(Clone, Debug)]
pub struct Declaration {
    pub member: MemberId,
    pub location: Location,
}

#[derive(Clone, Debug)]
pub struct Command {
    pub identity: Identity,
    pub parent: Option<NodeIdx>,
    pub children: FxIndexMap<Identity, NodeIdx>,
    pub aliases: FxIndexSet<String>,
    pub bindings: FxIndexMap<MemberId, Binding>,
    pub declarations: Vec<Declaration>,
}

impl Command {
    fn new(identity: Identity, parent: Option<NodeIdx>) -> Self {
        Self {
            identity,
            parent,
            children: FxIndexMap::default(),
            aliases: FxIndexSet::default(),
            bindings: FxIndexMap::default(),
            declarations: Vec::new(),
        }
    }

    /// The canonical name followed by every alias.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        iter::once(self.identity.name()).chain(self.aliases.iter().map(String::as_str))
    }

    pub fn bindings_with(&self, role: Role) -> impl Iterator<Item = &Binding> {
        self.bindings
            .values()
            .filter(move |binding| binding.role() == role)
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// The node as it would be written in a pattern, e.g. `give|g`.
    pub fn lexeme(&self) -> String {
        let mut lexeme = self.identity.to_string();
        for alias in &self.aliases {
            lexeme.push('|');
            lexeme.push_str(alias);
        }
        lexeme
    }
}

/// The namespace tree of every command declared in a batch.
///
/// Nodes live in a graph arena and are never removed, so a [`NodeIdx`] stays valid for the
/// lifetime of the tree. Each node keeps its children keyed by [`Identity`] and a plain index
/// back to its parent.
#[derive(Clone, Debug, Default)]
pub struct CommandTree {
    graph: DiGraph<Command, ()>,
    roots: FxIndexMap<Identity, NodeIdx>,
}

impl CommandTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn roots(&self) -> &FxIndexMap<Identity, NodeIdx> {
        &self.roots
    }

    /// The children of `parent`, or the top-level namespace when `parent` is `None`.
    pub fn namespace(&self, parent: Option<NodeIdx>) -> &FxIndexMap<Identity, NodeIdx> {
        match parent {
            Some(idx) => &self.graph[idx].children,
            None => &self.roots,
        }
    }

    pub fn child(&self, parent: Option<NodeIdx>, identity: &Identity) -> Option<NodeIdx> {
        self.namespace(parent).get(identity).copied()
    }

    pub fn child_or_insert(&mut self, parent: Option<NodeIdx>, identity: &Identity) -> NodeIdx {
        if let Some(idx) = self.child(parent, identity) {
            return idx;
        }

        let idx = self.graph.add_node(Command::new(identity.clone(), parent));
        match parent {
            Some(parent) => {
                self.graph[parent].children.insert(identity.clone(), idx);
                self.graph.add_edge(parent, idx, ());
            }
            None => {
                self.roots.insert(identity.clone(), idx);
            }
        }
        idx
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// `idx` followed by its parent, grandparent and so on up to the root.
    pub fn ancestors(&self, idx: NodeIdx) -> impl Iterator<Item = NodeIdx> + '_ {
        iter::successors(Some(idx), |&idx| self.graph[idx].parent)
    }

    /// Root first.
    pub fn path(&self, idx: NodeIdx) -> Vec<NodeIdx> {
        let mut path = self.ancestors(idx).collect_vec();
        path.reverse();
        path
    }

    pub fn path_string(&self, idx: NodeIdx, separator: &str) -> String {
        self.path(idx)
            .into_iter()
            .map(|idx| &self.graph[idx].identity)
            .join(separator)
    }

    /// The full pattern leading to `idx`, aliases included, e.g. `a b|1`.
    pub fn pattern(&self, idx: NodeIdx) -> String {
        self.path(idx)
            .into_iter()
            .map(|idx| self.graph[idx].lexeme())
            .join(" ")
    }

    /// Every node in pre-order, siblings in declaration order.
    pub fn walk(&self) -> Vec<NodeIdx> {
        let mut order = Vec::with_capacity(self.graph.node_count());
        let mut to_visit = self.roots.values().rev().copied().collect_vec();
        while let Some(idx) = to_visit.pop() {
            order.push(idx);
            to_visit.extend(self.graph[idx].children.values().rev().copied());
        }
        order
    }

    pub fn to_dot(&self) -> String {
        let dot = Dot::with_attr_getters(
            &self.graph,
            &[Config::EdgeNoLabel, Config::NodeNoLabel],
            &|_, _| String::new(),
            &|_, (_, command)| {
                let roles = command
                    .bindings
                    .values()
                    .map(|binding| binding.role())
                    .unique()
                    .join(", ");
                let label = if roles.is_empty() {
                    command.lexeme()
                } else {
                    format!("{}\\n[{}]", command.lexeme(), roles)
                };
                format!("label = \"{}\"", label.replace('"', "\\\""))
            },
        );
        format!("{:?}", dot)
    }
}

impl Index<NodeIdx> for CommandTree {
    type Output = Command;

    fn index(&self, idx: NodeIdx) -> &Command {
        &self.graph[idx]
    }
}

impl IndexMut<NodeIdx> for CommandTree {
    fn index_mut(&mut self, idx: NodeIdx) -> &mut Command {
        &mut self.graph[idx]
    }
}

/// One node per line, indented by depth.
impl fmt::Display for CommandTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for idx in self.walk() {
            let depth = self.ancestors(idx).count() - 1;
            writeln!(f, "{:indent$}{}", "", self.graph[idx].lexeme(), indent = depth * 2)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn insert_path(tree: &mut CommandTree, path: &[Identity]) -> NodeIdx {
        let mut current = None;
        for identity in path {
            current = Some(tree.child_or_insert(current, identity));
        }
        current.unwrap()
    }

    #[test]
    fn shared_prefixes_are_merged() {
        let mut tree = CommandTree::new();
        let a = Identity::literal("a");
        let b = Identity::argument("b");
        let first = insert_path(&mut tree, &[a.clone(), b.clone(), Identity::literal("c")]);
        let second = insert_path(&mut tree, &[a.clone(), b.clone(), Identity::literal("d")]);

        assert_ne!(first, second);
        assert_eq!(tree.node_count(), 4);
        assert_eq!(tree.roots().len(), 1);
        assert_eq!(tree[first].parent, tree[second].parent);
        assert_eq!(tree.path_string(second, " "), "a <b> d");
    }

    #[test]
    fn pattern_includes_aliases() {
        let mut tree = CommandTree::new();
        let leaf = insert_path(&mut tree, &[Identity::literal("a"), Identity::literal("b")]);
        tree[leaf].aliases.insert("1".to_string());
        assert_eq!(tree.pattern(leaf), "a b|1");
        assert_eq!(tree.path_string(leaf, "."), "a.b");
    }

    #[test]
    fn walk_is_pre_order() {
        let mut tree = CommandTree::new();
        insert_path(&mut tree, &[Identity::literal("a"), Identity::literal("b")]);
        insert_path(&mut tree, &[Identity::literal("c")]);
        insert_path(&mut tree, &[Identity::literal("a"), Identity::literal("d")]);

        let names = tree
            .walk()
            .into_iter()
            .map(|idx| tree[idx].identity.to_string())
            .collect_vec();
        assert_eq!(names, ["a", "b", "d", "c"]);
        assert_eq!(tree.to_string(), "a\n  b\n  d\nc\n");
    }

    #[test]
    fn dot_export_labels_nodes() {
        let mut tree = CommandTree::new();
        insert_path(&mut tree, &[Identity::literal("give"), Identity::argument("amount")]);
        let dot = tree.to_dot();
        assert!(dot.contains("label = \"give\""));
        assert!(dot.contains("label = \"<amount>\""));
    }
}
