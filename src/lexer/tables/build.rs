// src/lexer/tables/build.rs
use std::time::Instant;

use log::debug;
use rayon::prelude::*;

use super::{
    GrammarError,
    Pattern,
    PatternTable,
    State,
    analysis::Analysis,
    arena::{Node, NodeId, RegexArena},
    reduce,
    tokens::TokenDescription,
};

// Reachable-state sets stay tiny; a sorted Vec keeps iteration order stable.
fn insert_sorted(set: &mut Vec<usize>, s: usize) {
    if let Err(pos) = set.binary_search(&s) {
        set.insert(pos, s);
    }
}

fn union_into(set: &mut Vec<usize>, other: &[usize]) {
    for &s in other {
        insert_sorted(set, s);
    }
}

struct Builder<'a> {
    arena: &'a RegexArena,
    analysis: &'a Analysis,
    states: Vec<State>,
}

impl<'a> Builder<'a> {
    fn new(arena: &'a RegexArena, analysis: &'a Analysis) -> Self {
        Self {
            arena,
            analysis,
            states: vec![State::default(); analysis.n_states()],
        }
    }

    /// Copy the first transitions of whatever follows `id` onto `current`,
    /// so skipping `id` needs no epsilon edge.
    fn splice_successor(&mut self, id: NodeId, current: usize) {
        if let Some(s) = self.analysis.successor(id) {
            let first = self.analysis.first_transitions(self.arena, s);
            self.states[current].transitions.extend(first);
        }
    }

    /// Emit edges for `id` starting at `current`; return the states reachable
    /// after `id` has matched.
    fn build(&mut self, id: NodeId, current: usize) -> Vec<usize> {
        match self.arena.node(id) {
            Node::CharSet(mask) => {
                let target = self
                    .analysis
                    .state_index(id)
                    .expect("every CharSet node has a state index");
                self.states[current].transitions.push(super::Transition {
                    mask: *mask,
                    target,
                });
                vec![target]
            }
            Node::Sequence(xs) => {
                let mut cur = vec![current];
                for &x in xs {
                    let mut next = Vec::new();
                    for &s in &cur {
                        let r = self.build(x, s);
                        union_into(&mut next, &r);
                    }
                    cur = next;
                }
                cur
            }
            Node::EitherOf(xs) => {
                let mut out = Vec::new();
                for &x in xs {
                    let r = self.build(x, current);
                    union_into(&mut out, &r);
                }
                out
            }
            Node::Maybe(x) => {
                let x = *x;
                let mut out = self.build(x, current);
                self.splice_successor(id, current);
                insert_sorted(&mut out, current);
                out
            }
            Node::ZeroOrMoreOf(x) => {
                let x = *x;
                let mut out = self.build(x, current);
                // one more round from every exit installs the loop edges
                for s in out.clone() {
                    let again = self.build(x, s);
                    union_into(&mut out, &again);
                }
                self.splice_successor(id, current);
                insert_sorted(&mut out, current);
                out
            }
        }
    }
}

/// Compile one token description into a reduced automaton.
pub fn compile_pattern(desc: &TokenDescription) -> Result<Pattern, GrammarError> {
    let kind = desc.kind;
    let arena = RegexArena::new(&desc.pattern).map_err(|e| GrammarError::EmptyGroup {
        kind,
        group: e.0,
    })?;
    let analysis = Analysis::new(&arena);

    let mut b = Builder::new(&arena, &analysis);
    let finals = b.build(arena.root(), Pattern::START);
    let mut states = b.states;
    for f in finals {
        states[f].is_final = true;
    }

    let built = states.len();
    reduce::dedup_transitions(&mut states);
    let merged = reduce::merge_states(&mut states);

    if let Some((state, overlap)) = reduce::find_overlap(&states) {
        return Err(GrammarError::OverlappingTransitions {
            kind,
            state,
            overlap,
        });
    }
    if let Some((state, target)) = reduce::find_dangling(&states) {
        return Err(GrammarError::DanglingTarget {
            kind,
            state,
            target,
        });
    }

    debug!(
        "[tables] {kind:?}: {} nodes, {built} states -> {} after {merged} merges",
        arena.len(),
        states.len()
    );

    Ok(Pattern {
        kind,
        states,
        should_emit: desc.should_emit,
    })
}

/// Compile every description. Each pattern is independent, so they are built
/// in parallel; the table is ordered by token kind regardless.
pub fn compile_patterns(descs: &[TokenDescription]) -> Result<PatternTable, GrammarError> {
    let t0 = Instant::now();
    let patterns = descs
        .par_iter()
        .map(compile_pattern)
        .collect::<Result<Vec<_>, _>>()?;
    let table = PatternTable::new(patterns)?;
    debug!(
        "[tables] compiled {} patterns ({} states) in {:?}",
        table.len(),
        table.n_states(),
        t0.elapsed()
    );
    Ok(table)
}
