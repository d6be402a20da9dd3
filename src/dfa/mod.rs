//! Deterministic finite automata (SPEC_FULL.md §3-§4.7): two independent
//! construction pipelines converging on one representation.
//!
//! [`Dfa::from_nfa`] determinizes an [`Nfa`] by subset construction
//! (§4.5); [`Dfa::from_augmented_tree`] builds a DFA directly from an
//! [`AugmentedRegexTree`]'s firstpos/followpos annotations (§4.6), without
//! ever constructing an NFA. [`Dfa::minimize`] then merges
//! indistinguishable states by partition refinement (§4.7), grounded
//! line-for-line on `original_source/dfa.cpp`'s `DFA::minimize`/
//! `update_dfa`.

use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};

use crate::automaton::FiniteAutomaton;
use crate::nfa::Nfa;
use crate::regex::AugmentedRegexTree;
use crate::symbol::Symbol;

/// A deterministic finite automaton: a single start state, at most one
/// transition per symbol out of any state, and a set of accepting states
/// each carrying the token-id of the pattern that caused acceptance (§3).
#[derive(Debug, Clone)]
pub struct Dfa {
    automaton: FiniteAutomaton,
    start: usize,
    accepting: BTreeMap<usize, u32>,
}

impl Dfa {
    /// Subset construction (§4.5): determinizes `nfa` into a DFA. A DFA
    /// state is the set of NFA states reachable by epsilon closure; states
    /// are discovered by a worklist, deduplicated by bit-vector equality,
    /// so ids come out dense in discovery order.
    pub fn from_nfa(nfa: &Nfa) -> Dfa {
        let alphabet = nfa.alphabet().to_vec();
        let mut automaton = FiniteAutomaton::new();

        let mut known: HashMap<Vec<bool>, usize> = HashMap::new();
        let mut closures: Vec<Vec<bool>> = Vec::new();
        let mut accepting = BTreeMap::new();

        let d0_closure = nfa.eps_closure(nfa.start());
        let d0 = automaton.push_state();
        known.insert(d0_closure.clone(), d0);
        closures.push(d0_closure);

        let mut worklist = VecDeque::from([d0]);
        while let Some(d) = worklist.pop_front() {
            let q = closures[d].clone();
            if q[nfa.accept()] {
                accepting.insert(d, 0);
            }

            for &sym in &alphabet {
                let mut reachable = vec![false; nfa.state_count()];
                let mut any = false;
                for state in 0..nfa.state_count() {
                    if !q[state] {
                        continue;
                    }
                    for target in nfa.automaton().transitions_on(state, sym) {
                        any = true;
                        let closure = nfa.eps_closure(target);
                        for (slot, hit) in reachable.iter_mut().zip(closure) {
                            *slot |= hit;
                        }
                    }
                }
                if !any {
                    continue;
                }

                let target = *known.entry(reachable.clone()).or_insert_with(|| {
                    let id = automaton.push_state();
                    closures.push(reachable);
                    worklist.push_back(id);
                    id
                });
                automaton.add_transition(d, target, Some(sym));
            }
        }

        Dfa { automaton, start: d0, accepting }
    }

    /// Direct construction (§4.6): builds a DFA straight from `tree`'s
    /// firstpos/followpos annotations, without ever building an NFA. A DFA
    /// state is a set of leaf positions; states are discovered by a
    /// worklist, deduplicated by set equality.
    pub fn from_augmented_tree(tree: &AugmentedRegexTree) -> Dfa {
        let alphabet = tree.alphabet();
        let mut automaton = FiniteAutomaton::new();

        let mut known: HashMap<BTreeSet<usize>, usize> = HashMap::new();
        let mut sets: Vec<BTreeSet<usize>> = Vec::new();
        let mut accepting = BTreeMap::new();

        let s0_set = tree.firstpos_root().clone();
        let s0 = automaton.push_state();
        known.insert(s0_set.clone(), s0);
        sets.push(s0_set);

        let mut worklist = VecDeque::from([s0]);
        while let Some(s) = worklist.pop_front() {
            let set = sets[s].clone();
            if let Some(tag) = tree.end_marker_tag(&set) {
                accepting.insert(s, tag);
            }

            for &sym in &alphabet {
                let mut union: BTreeSet<usize> = BTreeSet::new();
                for &p in &set {
                    if tree.leaf_symbol(p) == sym {
                        union.extend(tree.followpos(p).iter().copied());
                    }
                }
                if union.is_empty() {
                    continue;
                }

                let target = *known.entry(union.clone()).or_insert_with(|| {
                    let id = automaton.push_state();
                    sets.push(union);
                    worklist.push_back(id);
                    id
                });
                automaton.add_transition(s, target, Some(sym));
            }
        }

        Dfa { automaton, start: s0, accepting }
    }

    /// Hopcroft-style partition refinement (§4.7), done in place. Initial
    /// blocks group by `(accepting?, token-id)`; each refinement pass
    /// re-partitions every block by which block each symbol's transition
    /// lands in, splitting a block the moment that grouping disagrees. The
    /// outer loop repeats full passes until a pass splits nothing, since a
    /// block processed early in a pass can still need re-splitting once a
    /// later block splits (`original_source/dfa.cpp::minimize`'s
    /// `while (old_parts_count != parts_count)`). Both construction
    /// pipelines only ever create reachable states, so there is no separate
    /// unreachable-state removal pass.
    pub fn minimize(&mut self) {
        let n = self.automaton.states.len();
        if n == 0 {
            return;
        }
        let alphabet = self.automaton.alphabet.clone();

        let mut part = vec![0usize; n];
        let mut keys: Vec<Option<u32>> = Vec::new();
        for state in 0..n {
            let key = self.accepting.get(&state).copied();
            let block = match keys.iter().position(|k| *k == key) {
                Some(pos) => pos,
                None => {
                    keys.push(key);
                    keys.len() - 1
                }
            };
            part[state] = block;
        }
        let mut parts_count = keys.len();

        let mut old_parts_count = usize::MAX;
        while old_parts_count != parts_count {
            old_parts_count = parts_count;

            let mut current_part = 0usize;
            while current_part < parts_count {
                for &sym in &alphabet {
                    let mut to: HashMap<i64, usize> = HashMap::new();
                    for state in 0..n {
                        if part[state] != current_part {
                            continue;
                        }
                        let next_part = match self.automaton.transition(state, sym) {
                            Some(next) => part[next] as i64,
                            None => -1,
                        };
                        let new_part = if to.is_empty() {
                            to.insert(next_part, current_part);
                            current_part
                        } else if let Some(&existing) = to.get(&next_part) {
                            existing
                        } else {
                            let fresh = parts_count;
                            parts_count += 1;
                            to.insert(next_part, fresh);
                            fresh
                        };
                        part[state] = new_part;
                    }
                }
                current_part += 1;
            }
        }

        self.compact(part, parts_count, &alphabet);
    }

    /// Graph compaction: one representative state per block, transitions
    /// rewritten by block membership, dense block-indexed ids.
    fn compact(&mut self, part: Vec<usize>, parts_count: usize, alphabet: &[Symbol]) {
        let mut representative: Vec<Option<usize>> = vec![None; parts_count];
        for (state, &block) in part.iter().enumerate() {
            representative[block].get_or_insert(state);
        }

        let mut compacted = FiniteAutomaton::new();
        compacted.alphabet = alphabet.to_vec();
        for _ in 0..parts_count {
            compacted.push_state();
        }
        for block in 0..parts_count {
            let rep = representative[block]
                .expect("every block produced by refinement has at least one member");
            let transitions = self.automaton.states[rep].transitions.clone();
            for t in transitions {
                let target_block = part[t.target];
                compacted.add_transition(block, target_block, t.symbol);
            }
        }

        let mut accepting = BTreeMap::new();
        for (&state, &tag) in &self.accepting {
            accepting.entry(part[state]).or_insert(tag);
        }

        self.automaton = compacted;
        self.start = part[self.start];
        self.accepting = accepting;
    }

    pub fn state_count(&self) -> usize {
        self.automaton.states.len()
    }

    pub fn alphabet(&self) -> &[Symbol] {
        &self.automaton.alphabet
    }

    pub fn start(&self) -> usize {
        self.start
    }

    /// The state reached from `state` on `symbol`, or `None` if no such
    /// transition exists.
    pub fn transition(&self, state: usize, symbol: Symbol) -> Option<usize> {
        self.automaton.transition(state, symbol)
    }

    pub fn is_accepting(&self, state: usize) -> bool {
        self.accepting.contains_key(&state)
    }

    /// The token-id recorded for `state`, if it is accepting.
    pub fn token_id(&self, state: usize) -> Option<u32> {
        self.accepting.get(&state).copied()
    }

    /// All accepting states paired with their token-id, in ascending state
    /// id order.
    pub fn accepting_states(&self) -> impl Iterator<Item = (usize, u32)> + '_ {
        self.accepting.iter().map(|(&state, &tag)| (state, tag))
    }

    /// Convenience built purely on [`Dfa::transition`] (SPEC_FULL.md
    /// §10.3): walks `word` byte by byte, failing on the first undefined
    /// transition or any transition whose symbol doesn't match the byte.
    pub fn accepts(&self, word: &[u8]) -> bool {
        let mut state = self.start;
        for &byte in word {
            match self.transition_byte(state, byte) {
                Some(next) => state = next,
                None => return false,
            }
        }
        self.is_accepting(state)
    }

    fn transition_byte(&self, state: usize, byte: u8) -> Option<usize> {
        self.automaton.states[state]
            .transitions
            .iter()
            .find(|t| t.symbol.is_some_and(|s| s.matches_byte(byte)))
            .map(|t| t.target)
    }
}
