use super::binding::Binding;
use super::lexer::Lexer;
use super::node::{CommandTree, FxIndexMap, FxIndexSet, NodeIdx};
use crate::member::{Member, MemberId};
use smallvec::SmallVec;

/// Everything known about one compilation batch.
///
/// Built from scratch for every batch and dropped when the batch is done, nothing carries over
/// between batches.
pub struct Environment<'m> {
    pub members: &'m [Member],
    pub tree: CommandTree,
    /// The nodes each bound member is attached to, in binding order.
    pub scopes: FxIndexMap<MemberId, SmallVec<[NodeIdx; 1]>>,
    pub(crate) lexer: Lexer,
}

impl<'m> Environment<'m> {
    pub fn new(members: &'m [Member], lex_cache: bool) -> Self {
        Self {
            members,
            tree: CommandTree::new(),
            scopes: FxIndexMap::default(),
            lexer: if lex_cache {
                Lexer::new()
            } else {
                Lexer::uncached()
            },
        }
    }

    pub fn member(&self, id: MemberId) -> &'m Member {
        &self.members[id.0]
    }

    pub fn member_ids(&self) -> impl Iterator<Item = MemberId> + use<> {
        (0..self.members.len()).map(MemberId)
    }

    /// The nodes `member` is bound to.
    pub fn scope(&self, member: MemberId) -> &[NodeIdx] {
        self.scopes.get(&member).map_or(&[], |nodes| nodes.as_slice())
    }

    pub fn binding(&self, idx: NodeIdx, member: MemberId) -> Option<&Binding> {
        self.tree[idx].bindings.get(&member)
    }

    /// Every binding in the tree, in tree order.
    pub fn bindings(&self) -> impl Iterator<Item = (NodeIdx, &Binding)> {
        self.tree.walk().into_iter().flat_map(move |idx| {
            self.tree[idx]
                .bindings
                .values()
                .map(move |binding| (idx, binding))
        })
    }

    /// Every member bound to at least one node, each once, in tree order.
    pub fn bound_members(&self) -> FxIndexSet<MemberId> {
        self.bindings().map(|(_, binding)| binding.member()).collect()
    }
}
