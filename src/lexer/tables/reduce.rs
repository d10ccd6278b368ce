// src/lexer/tables/reduce.rs
// Post-build cleanup: drop duplicate edges, fold states with identical edge lists.

use super::{CharMask, State};

/// Sort each state's transitions and drop adjacent duplicates.
pub fn dedup_transitions(states: &mut [State]) {
    for s in states.iter_mut() {
        s.transitions.sort_unstable();
        s.transitions.dedup();
    }
}

/// First pair `(i, j)`, `0 < i < j`, with equal transition lists.
/// The start state is never a candidate.
fn find_duplicate(states: &[State]) -> Option<(usize, usize)> {
    for i in 1..states.len() {
        for j in i + 1..states.len() {
            if states[i].transitions == states[j].transitions {
                return Some((i, j));
            }
        }
    }
    None
}

/// Repeatedly delete state `i` in favour of its later twin `j` until no two
/// non-start states share a transition list. Finality is OR'd into the survivor
/// and every target is renumbered. Returns the number of states removed.
pub fn merge_states(states: &mut Vec<State>) -> usize {
    let mut removed = 0usize;
    while let Some((i, j)) = find_duplicate(states) {
        let was_final = states.remove(i).is_final;
        let survivor = j - 1;
        states[survivor].is_final |= was_final;

        for s in states.iter_mut() {
            for t in s.transitions.iter_mut() {
                if t.target == i {
                    t.target = survivor;
                } else if t.target > i {
                    t.target -= 1;
                }
            }
        }
        // retargeting can make two edges of one state identical
        dedup_transitions(states);
        removed += 1;
    }
    removed
}

/// First state whose outgoing masks overlap, with the overlapping bytes.
pub fn find_overlap(states: &[State]) -> Option<(usize, CharMask)> {
    for (i, s) in states.iter().enumerate() {
        let mut seen = CharMask::EMPTY;
        for t in &s.transitions {
            if !seen.is_disjoint(t.mask) {
                return Some((i, CharMask::from_bits(seen.bits() & t.mask.bits())));
            }
            seen = seen | t.mask;
        }
    }
    None
}

/// First `(state, target)` whose target is out of range.
pub fn find_dangling(states: &[State]) -> Option<(usize, usize)> {
    states.iter().enumerate().find_map(|(i, s)| {
        s.transitions
            .iter()
            .find(|t| t.target >= states.len())
            .map(|t| (i, t.target))
    })
}
