// src/lexer/tables/arena.rs
// Flattened copy of a `RegexElement` tree. Node ids are assigned pre-order, so
// they are stable for the lifetime of one compilation and never escape it.

use super::{char_mask::CharMask, regex::RegexElement};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    pub fn idx(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    CharSet(CharMask),
    Sequence(Vec<NodeId>),
    EitherOf(Vec<NodeId>),
    Maybe(NodeId),
    ZeroOrMoreOf(NodeId),
}

/// A `Sequence` or `EitherOf` with no children. Neither has a meaningful automaton.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptyGroup(pub &'static str);

#[derive(Debug, Clone)]
pub struct RegexArena {
    nodes: Vec<Node>,
}

impl RegexArena {
    pub fn new(root: &RegexElement) -> Result<Self, EmptyGroup> {
        let mut arena = Self { nodes: Vec::new() };
        arena.push(root)?;
        Ok(arena)
    }

    fn push(&mut self, el: &RegexElement) -> Result<NodeId, EmptyGroup> {
        let id = NodeId(self.nodes.len() as u32);
        // placeholder keeps the parent's id ahead of its children
        self.nodes.push(Node::CharSet(CharMask::EMPTY));
        let node = match el {
            RegexElement::CharSet(m) => Node::CharSet(*m),
            RegexElement::Sequence(xs) => {
                if xs.is_empty() {
                    return Err(EmptyGroup("Sequence"));
                }
                Node::Sequence(self.push_all(xs)?)
            }
            RegexElement::EitherOf(xs) => {
                if xs.is_empty() {
                    return Err(EmptyGroup("EitherOf"));
                }
                Node::EitherOf(self.push_all(xs)?)
            }
            RegexElement::Maybe(x) => Node::Maybe(self.push(x)?),
            RegexElement::ZeroOrMoreOf(x) => Node::ZeroOrMoreOf(self.push(x)?),
        };
        self.nodes[id.idx()] = node;
        Ok(id)
    }

    fn push_all(&mut self, xs: &[RegexElement]) -> Result<Vec<NodeId>, EmptyGroup> {
        xs.iter().map(|x| self.push(x)).collect()
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.idx()]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
