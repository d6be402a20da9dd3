//! # redfa
//!
//! A small compiler from regular expressions over a byte alphabet to
//! executable deterministic finite automata, implementing the classical
//! Aho-Sethi-Ullman constructions:
//!
//! * [`regex`] lexes and parses a source string into a [`regex::RegexTree`],
//!   and (for the direct construction below) annotates it as a
//!   [`regex::AugmentedRegexTree`] with firstpos/lastpos/followpos.
//! * [`nfa`] builds a Thompson-style epsilon-NFA from a regex.
//! * [`dfa`] determinizes an [`nfa::Nfa`] by subset construction, or builds
//!   a DFA directly from an [`regex::AugmentedRegexTree`]'s followpos
//!   annotations, and minimizes a DFA by Hopcroft-style partition
//!   refinement.
//!
//! ## Usage
//!
//! ```rust
//! use redfa::dfa::Dfa;
//! use redfa::nfa::Nfa;
//! use redfa::regex::Regex;
//!
//! let regex = Regex::parse("a(b|c)*").unwrap();
//! let nfa = Nfa::from_regex(&regex).unwrap();
//! let mut dfa = Dfa::from_nfa(&nfa);
//! assert!(dfa.accepts(b"abbc"));
//! assert!(!dfa.accepts(b"ba"));
//!
//! dfa.minimize();
//! assert!(dfa.accepts(b"abbc"));
//! ```
//!
//! Out of scope: a command-line driver, textual printing of automata, file
//! I/O, and any scanner/lexer front-end consuming the resulting DFAs (see
//! `DESIGN.md` and `SPEC_FULL.md` for the full rationale).

pub(crate) mod automaton;
pub mod dfa;
pub mod error;
pub mod nfa;
pub mod regex;
pub mod symbol;

pub use error::RegexError;
pub use symbol::Symbol;
