//! Whole-pipeline property tests (SPEC_FULL.md §8): regex -> NFA -> DFA ->
//! minimize, and regex -> AugmentedRegexTree -> DFA (direct), checked
//! against each other and against a direct NFA simulation rather than an
//! external regex engine, since the byte alphabet here is a deliberately
//! narrow subset of one.

use proptest::prelude::*;
use redfa::dfa::Dfa;
use redfa::nfa::Nfa;
use redfa::regex::{AugmentedRegex, AugmentedRegexTree, Regex};

const ALPHABET: &[u8] = b"abc";

/// All byte strings over [`ALPHABET`] up to `max_len` long, shortest first.
fn words_up_to(max_len: usize) -> Vec<Vec<u8>> {
    let mut words = vec![Vec::new()];
    let mut frontier = vec![Vec::new()];
    for _ in 0..max_len {
        let mut next = Vec::new();
        for word in &frontier {
            for &b in ALPHABET {
                let mut w = word.clone();
                w.push(b);
                words.push(w.clone());
                next.push(w);
            }
        }
        frontier = next;
    }
    words
}

/// Regexes built only from `a`, `b`, `c`, `|`, `*` and parens, so every
/// generated string is guaranteed to parse under SPEC_FULL.md §4.1-§4.2.
fn random_regex() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![Just("a".to_string()), Just("b".to_string()), Just("c".to_string())];
    leaf.prop_recursive(5, 64, 5, |inner| {
        prop_oneof![
            3 => prop::collection::vec(inner.clone(), 2..4).prop_map(|v| v.join("")),
            3 => prop::collection::vec(inner.clone(), 2..4).prop_map(|v| format!("({})", v.join("|"))),
            2 => inner.clone().prop_map(|r| format!("({r})*")),
        ]
    })
}

proptest! {
    /// Invariant 1: NFA(r), DFA(NFA(r)) and minimize(DFA(NFA(r))) accept
    /// exactly the same words.
    #[test]
    fn nfa_dfa_and_minimized_dfa_agree(source in random_regex()) {
        let regex = Regex::parse(&source).unwrap();
        let nfa = Nfa::from_regex(&regex).unwrap();
        let dfa = Dfa::from_nfa(&nfa);
        let mut minimized = dfa.clone();
        minimized.minimize();

        for word in words_up_to(4) {
            let nfa_says = nfa.accepts(&word);
            prop_assert_eq!(nfa_says, dfa.accepts(&word), "dfa disagrees with nfa on {:?}", word);
            prop_assert_eq!(nfa_says, minimized.accepts(&word), "minimized dfa disagrees with nfa on {:?}", word);
        }
    }

    /// Invariant 2: direct construction from an AugmentedRegexTree accepts
    /// the same language as subset construction from the Thompson NFA.
    #[test]
    fn direct_construction_matches_subset_construction(source in random_regex()) {
        let regex = Regex::parse(&source).unwrap();
        let nfa = Nfa::from_regex(&regex).unwrap();
        let via_nfa = Dfa::from_nfa(&nfa);

        let augmented = AugmentedRegex::new(&regex);
        let tree = AugmentedRegexTree::new(&augmented).unwrap();
        let via_direct = Dfa::from_augmented_tree(&tree);

        for word in words_up_to(4) {
            prop_assert_eq!(via_nfa.accepts(&word), via_direct.accepts(&word), "mismatch on {:?}", word);
        }
    }

    /// Invariant 3: minimizing an already-minimal DFA doesn't change it.
    #[test]
    fn minimize_is_idempotent(source in random_regex()) {
        let regex = Regex::parse(&source).unwrap();
        let nfa = Nfa::from_regex(&regex).unwrap();
        let mut dfa = Dfa::from_nfa(&nfa);
        dfa.minimize();
        let state_count = dfa.state_count();

        let mut twice = dfa.clone();
        twice.minimize();
        prop_assert_eq!(twice.state_count(), state_count);
        for word in words_up_to(4) {
            prop_assert_eq!(dfa.accepts(&word), twice.accepts(&word));
        }
    }

    /// Invariant 4: after minimize, no two distinct states share both
    /// accepting status and every transition (Myhill-Nerode minimality).
    #[test]
    fn minimized_dfa_has_no_duplicate_states(source in random_regex()) {
        let regex = Regex::parse(&source).unwrap();
        let nfa = Nfa::from_regex(&regex).unwrap();
        let mut dfa = Dfa::from_nfa(&nfa);
        dfa.minimize();

        let n = dfa.state_count();
        for s1 in 0..n {
            for s2 in (s1 + 1)..n {
                let same_profile = dfa.is_accepting(s1) == dfa.is_accepting(s2)
                    && dfa.alphabet().iter().all(|&sym| dfa.transition(s1, sym) == dfa.transition(s2, sym));
                prop_assert!(!same_profile, "states {} and {} are indistinguishable", s1, s2);
            }
        }
    }
}

/// Invariant 5: eps_closure contains its argument and is a fixed point of
/// the epsilon-transition operator (covered more narrowly for
/// [`redfa::automaton::FiniteAutomaton`] itself in `src/automaton.rs`; this
/// checks it end to end through a real NFA).
#[test]
fn eps_closure_is_reflexive_and_a_fixed_point() {
    let regex = Regex::parse("a*|b(c|a)*").unwrap();
    let nfa = Nfa::from_regex(&regex).unwrap();
    for state in 0..nfa.state_count() {
        let closure = nfa.eps_closure(state);
        assert!(closure[state], "closure of {state} should contain itself");
        for (other, &reachable) in closure.iter().enumerate() {
            if reachable {
                let inner = nfa.eps_closure(other);
                for (i, &hit) in inner.iter().enumerate() {
                    assert!(!hit || closure[i], "closure not a fixed point: {other} reaches {i}");
                }
            }
        }
    }
}

/// Invariant 6: firstpos(root) corresponds exactly to the leaves whose
/// symbol can start some word of the tree's language.
#[test]
fn firstpos_root_matches_possible_first_symbols() {
    let regex = Regex::parse("a(b|c)*").unwrap();
    let augmented = AugmentedRegex::new(&regex);
    let tree = AugmentedRegexTree::new(&augmented).unwrap();

    // Only 'a' can start a word of "a(b|c)*"; firstpos(root) should name
    // exactly the leaf(ves) labelled 'a' (never 'b', 'c' or the end-marker).
    let first_symbols: Vec<_> = tree
        .firstpos_root()
        .iter()
        .map(|&leaf| tree.leaf_symbol(leaf))
        .collect();
    assert_eq!(first_symbols, vec![redfa::symbol::Symbol::Literal(b'a')]);
}

/// Concrete scenario: a tagged union via the direct construction accepts
/// both patterns and reports their distinct token-ids.
#[test]
fn augmented_union_direct_construction_accepts_both_tags() {
    let ab = Regex::parse("ab").unwrap();
    let c = Regex::parse("c").unwrap();
    let augmented = AugmentedRegex::union_tagged(&[ab, c]);
    let tree = AugmentedRegexTree::new(&augmented).unwrap();
    let dfa = Dfa::from_augmented_tree(&tree);

    assert!(dfa.accepts(b"ab"));
    assert!(dfa.accepts(b"c"));
    assert!(!dfa.accepts(b"a"));
    assert!(!dfa.accepts(b""));
}
