// src/lexer/tables/analysis.rs
// Two structural passes over a pattern arena:
//   - state indices: CharSet nodes numbered 1.. in pre-order (0 is the start state)
//   - successors:    a_i -> a_{i+1} for every pair of adjacent sequence children

use hashbrown::HashMap;

use super::{
    Transition,
    arena::{Node, NodeId, RegexArena},
};

#[derive(Debug, Clone, Default)]
pub struct Analysis {
    successors: HashMap<NodeId, NodeId>,
    state_indices: HashMap<NodeId, usize>,
    n_states: usize,
}

impl Analysis {
    pub fn new(arena: &RegexArena) -> Self {
        let mut a = Self {
            n_states: 1,
            ..Self::default()
        };
        a.assign_state_indices(arena, arena.root());
        a.assign_successors(arena, arena.root());
        a
    }

    fn assign_state_indices(&mut self, arena: &RegexArena, id: NodeId) {
        match arena.node(id) {
            Node::CharSet(_) => {
                self.state_indices.insert(id, self.n_states);
                self.n_states += 1;
            }
            Node::Sequence(xs) | Node::EitherOf(xs) => {
                for &x in xs {
                    self.assign_state_indices(arena, x);
                }
            }
            Node::Maybe(x) | Node::ZeroOrMoreOf(x) => self.assign_state_indices(arena, *x),
        }
    }

    fn assign_successors(&mut self, arena: &RegexArena, id: NodeId) {
        match arena.node(id) {
            Node::CharSet(_) => {}
            Node::Sequence(xs) => {
                for w in xs.windows(2) {
                    self.successors.insert(w[0], w[1]);
                }
                for &x in xs {
                    self.assign_successors(arena, x);
                }
            }
            Node::EitherOf(xs) => {
                for &x in xs {
                    self.assign_successors(arena, x);
                }
            }
            Node::Maybe(x) | Node::ZeroOrMoreOf(x) => self.assign_successors(arena, *x),
        }
    }

    /// Start state plus one state per CharSet node.
    #[inline]
    pub fn n_states(&self) -> usize {
        self.n_states
    }

    #[inline]
    pub fn state_index(&self, id: NodeId) -> Option<usize> {
        self.state_indices.get(&id).copied()
    }

    #[inline]
    pub fn successor(&self, id: NodeId) -> Option<NodeId> {
        self.successors.get(&id).copied()
    }

    /// Transitions that can consume the first byte of `id`.
    ///
    /// An optional or repeated node may be skipped, so its set also holds the
    /// first transitions of its successor, and so on down a chain of
    /// skippable siblings.
    pub fn first_transitions(&self, arena: &RegexArena, id: NodeId) -> Vec<Transition> {
        let mut out = Vec::new();
        self.collect_first(arena, id, &mut out);
        out
    }

    fn collect_first(&self, arena: &RegexArena, id: NodeId, out: &mut Vec<Transition>) {
        match arena.node(id) {
            Node::CharSet(mask) => {
                if let Some(target) = self.state_index(id) {
                    out.push(Transition {
                        mask: *mask,
                        target,
                    });
                }
            }
            Node::Sequence(xs) => {
                if let Some(&x) = xs.first() {
                    self.collect_first(arena, x, out);
                }
            }
            Node::EitherOf(xs) => {
                for &x in xs {
                    self.collect_first(arena, x, out);
                }
            }
            Node::Maybe(x) | Node::ZeroOrMoreOf(x) => {
                self.collect_first(arena, *x, out);
                if let Some(s) = self.successor(id) {
                    self.collect_first(arena, s, out);
                }
            }
        }
    }
}
