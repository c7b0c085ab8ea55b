//! This module contains the DFA implementation.
//! The DFA is used to match a string against a pattern.
//! The DFA is generated from the NFA using the subset construction algorithm.
//!
//! The compiled DFA is an immutable transition table. The state of a running match is kept
//! in a separate [`DfaRun`], so one DFA can be driven by any number of scans.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use itertools::Itertools;
use log::trace;

use crate::{escape::char_representation, invalid_state, nfa::Nfa, LexGenError, Result, StateID};

/// The DFA implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dfa {
    number_of_states: usize,
    start_state: StateID,
    final_states: BTreeSet<StateID>,
    // For each state the single target on a symbol. A missing entry means "no edge".
    transitions: Vec<BTreeMap<char, StateID>>,
}

impl Dfa {
    /// Creates a DFA without transitions.
    pub fn new<I>(number_of_states: usize, start_state: StateID, final_states: I) -> Result<Self>
    where
        I: IntoIterator<Item = StateID>,
    {
        let mut dfa = Dfa {
            number_of_states,
            start_state: StateID::default(),
            final_states: BTreeSet::new(),
            transitions: vec![BTreeMap::new(); number_of_states],
        };
        dfa.check_state(start_state)?;
        dfa.start_state = start_state;
        for state in final_states {
            dfa.add_final_state(state)?;
        }
        Ok(dfa)
    }

    /// The number of states. State ids are the range `0..number_of_states`.
    pub fn number_of_states(&self) -> usize {
        self.number_of_states
    }

    /// The start state.
    pub fn start_state(&self) -> StateID {
        self.start_state
    }

    /// The accepting states.
    pub fn final_states(&self) -> &BTreeSet<StateID> {
        &self.final_states
    }

    /// The transitions, indexed by the source state.
    pub fn transitions(&self) -> &[BTreeMap<char, StateID>] {
        &self.transitions
    }

    /// Returns true if the state is an accepting state.
    pub fn is_final(&self, state: StateID) -> bool {
        self.final_states.contains(&state)
    }

    /// The target of the transition on the symbol, if there is one.
    pub fn next_state(&self, state: StateID, symbol: char) -> Option<StateID> {
        self.transitions
            .get(state.as_usize())
            .and_then(|transitions| transitions.get(&symbol))
            .copied()
    }

    /// The symbols that label at least one transition.
    pub fn alphabet(&self) -> BTreeSet<char> {
        self.transitions
            .iter()
            .flat_map(|transitions| transitions.keys().copied())
            .collect()
    }

    fn check_state(&self, state: StateID) -> Result<()> {
        if state.as_usize() >= self.number_of_states {
            return Err(invalid_state!(
                "state {} is out of range for a DFA with {} states",
                state,
                self.number_of_states
            ));
        }
        Ok(())
    }

    /// Adds a transition. An existing transition on the same symbol is replaced.
    pub fn add_transition(&mut self, from: StateID, symbol: char, to: StateID) -> Result<()> {
        self.check_state(from)?;
        self.check_state(to)?;
        self.transitions[from].insert(symbol, to);
        Ok(())
    }

    /// Marks the state as accepting state.
    pub fn add_final_state(&mut self, state: StateID) -> Result<()> {
        self.check_state(state)?;
        self.final_states.insert(state);
        Ok(())
    }

    // Appends a new state without transitions and returns its id.
    fn add_state(&mut self) -> StateID {
        let state = StateID::new(self.number_of_states);
        self.number_of_states += 1;
        self.transitions.push(BTreeMap::new());
        state
    }

    /// Create a DFA from an NFA.
    /// The DFA is created using the subset construction algorithm.
    fn try_from_nfa(nfa: &Nfa) -> Result<Self> {
        let alphabet = nfa.alphabet();
        let start = nfa.epsilon_closure(&[nfa.start_state()].into());

        let mut dfa = Dfa::new(1, StateID::new(0), [])?;
        if !start.is_disjoint(nfa.final_states()) {
            dfa.add_final_state(dfa.start_state)?;
        }
        // The NFA state sets of the DFA states. The set of a DFA state is its identity.
        let mut subsets: BTreeMap<BTreeSet<StateID>, StateID> = BTreeMap::new();
        subsets.insert(start.clone(), dfa.start_state);
        // The work list is used to keep track of the states that need to be processed.
        let mut work_list = VecDeque::from([(dfa.start_state, start)]);

        while let Some((state, nfa_states)) = work_list.pop_front() {
            for symbol in &alphabet {
                let target_states = nfa.epsilon_closure(&nfa.move_set(&nfa_states, *symbol));
                if target_states.is_empty() {
                    continue;
                }
                let target = match subsets.get(&target_states) {
                    Some(target) => *target,
                    None => {
                        let target = dfa.add_state();
                        if !target_states.is_disjoint(nfa.final_states()) {
                            dfa.add_final_state(target)?;
                        }
                        subsets.insert(target_states.clone(), target);
                        work_list.push_back((target, target_states));
                        target
                    }
                };
                dfa.add_transition(state, *symbol, target)?;
            }
        }

        trace!(
            "Subset construction: {} NFA states -> {} DFA states",
            nfa.number_of_states(),
            dfa.number_of_states
        );
        Ok(dfa)
    }
}

impl TryFrom<&Nfa> for Dfa {
    type Error = LexGenError;

    fn try_from(nfa: &Nfa) -> Result<Self> {
        Dfa::try_from_nfa(nfa)
    }
}

impl std::fmt::Display for Dfa {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "    Start State: {}", self.start_state)?;
        writeln!(f, "    Final States: {{{}}}", self.final_states.iter().join(", "))?;
        writeln!(
            f,
            "    Alphabet: {{{}}}",
            self.alphabet().into_iter().map(char_representation).join(", ")
        )?;
        writeln!(f, "    Transitions:")?;
        writeln!(f, "        {:>5} TRANSITIONS", "STATE")?;
        for (state, transitions) in self.transitions.iter().enumerate() {
            writeln!(
                f,
                "        {:>5} {{{}}}",
                state,
                transitions
                    .iter()
                    .map(|(symbol, target)| format!("{}={}", char_representation(*symbol), target))
                    .join(", ")
            )?;
        }
        Ok(())
    }
}

/// The state of a DFA while it is driven over an input.
///
/// A run is either in a state of its DFA or dead. Once dead it stays dead until it is
/// reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DfaRun {
    current_state: Option<StateID>,
}

impl DfaRun {
    /// Creates a run positioned at the start state of the DFA.
    pub fn new(dfa: &Dfa) -> Self {
        DfaRun {
            current_state: Some(dfa.start_state()),
        }
    }

    /// The current state or `None` if the run is dead.
    pub fn current_state(&self) -> Option<StateID> {
        self.current_state
    }

    /// Follows the transition on the symbol. Without such a transition the run dies.
    ///
    /// # Panics
    /// Advancing a dead run is a contract violation of the caller.
    #[inline]
    pub fn advance(&mut self, dfa: &Dfa, symbol: char) {
        let Some(state) = self.current_state else {
            panic!("Advancing a DFA run while in dead state");
        };
        self.current_state = dfa.next_state(state, symbol);
    }

    /// Moves the run back to the start state and revives it.
    #[inline]
    pub fn reset(&mut self, dfa: &Dfa) {
        self.current_state = Some(dfa.start_state());
    }

    /// Returns true if the run is in an accepting state.
    #[inline]
    pub fn is_in_final_state(&self, dfa: &Dfa) -> bool {
        self.current_state.is_some_and(|state| dfa.is_final(state))
    }

    /// Returns true if the run is dead.
    #[inline]
    pub fn is_in_dead_state(&self) -> bool {
        self.current_state.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parser::Regex, tree::ExprTree};

    // Initialize the logger for the tests
    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn dfa_of(pattern: &str) -> Dfa {
        let tree = ExprTree::new(&Regex::new(pattern).unwrap()).unwrap();
        let nfa: Nfa = (&tree).try_into().unwrap();
        (&nfa).try_into().unwrap()
    }

    fn accepts(dfa: &Dfa, input: &str) -> bool {
        let mut run = DfaRun::new(dfa);
        for c in input.chars() {
            if run.is_in_dead_state() {
                return false;
            }
            run.advance(dfa, c);
        }
        run.is_in_final_state(dfa)
    }

    // A data type that provides test data for the subset construction tests.
    struct TestData {
        name: &'static str,
        pattern: &'static str,
        states: usize,
        final_states: usize,
        alphabet: usize,
    }

    const TEST_DATA: &[TestData] = &[
        TestData {
            name: "dragon",
            pattern: "(a|b)*abb",
            states: 5,
            final_states: 1,
            alphabet: 2,
        },
        TestData {
            name: "union",
            pattern: "a|b",
            states: 3,
            final_states: 2,
            alphabet: 2,
        },
        TestData {
            name: "star_then_literal",
            pattern: "a*a",
            states: 2,
            final_states: 1,
            alphabet: 1,
        },
        TestData {
            name: "keyword",
            pattern: "if",
            states: 3,
            final_states: 1,
            alphabet: 2,
        },
        TestData {
            name: "optional",
            pattern: "ε|x",
            states: 2,
            final_states: 2,
            alphabet: 1,
        },
    ];

    #[test]
    fn test_dfa_from_nfa() {
        init();
        for data in TEST_DATA {
            let dfa = dfa_of(data.pattern);
            assert_eq!(dfa.number_of_states(), data.states, "states of {}", data.name);
            assert_eq!(
                dfa.final_states().len(),
                data.final_states,
                "final states of {}",
                data.name
            );
            assert_eq!(
                dfa.alphabet().len(),
                data.alphabet,
                "alphabet of {}",
                data.name
            );
            assert_eq!(dfa.start_state().as_usize(), 0);
        }
    }

    #[test]
    fn test_dfa_is_deterministic() {
        for pattern in ["(a|b)*abb", "a*a", "(ab|ac)*", "[az]*", "(x|xy|xyz)*"] {
            let dfa = dfa_of(pattern);
            // The transition map admits one target per symbol, so it remains to check that
            // all targets are valid states.
            for transitions in dfa.transitions() {
                assert!(transitions
                    .values()
                    .all(|target| target.as_usize() < dfa.number_of_states()));
            }
            assert_eq!(dfa.transitions().len(), dfa.number_of_states());
        }
    }

    #[test]
    fn test_dfa_language() {
        let dfa = dfa_of("(a|b)*abb");
        assert!(accepts(&dfa, "abb"));
        assert!(accepts(&dfa, "aabbabb"));
        assert!(!accepts(&dfa, "abab"));
        assert!(!accepts(&dfa, "abbc"));
        assert!(!accepts(&dfa, ""));

        let dfa = dfa_of("ε|x");
        assert!(accepts(&dfa, ""));
        assert!(accepts(&dfa, "x"));
        assert!(!accepts(&dfa, "xx"));
    }

    #[test]
    fn test_dfa_agrees_with_regex_crate() {
        // Patterns in our syntax and in the syntax of the regex crate.
        const PATTERNS: &[(&str, &str)] = &[
            ("(a|b)*abb", "^(a|b)*abb$"),
            ("a*a", "^a*a$"),
            ("(ab|a)*b", "^(ab|a)*b$"),
            ("[ac]*(b|ε)", "^[a-c]*(b|)$"),
            ("a(ba)*|b*", "^(a(ba)*|b*)$"),
        ];
        const ALPHABET: [char; 3] = ['a', 'b', 'c'];

        // All words over the alphabet up to length 6
        let mut words = vec![String::new()];
        let mut last = vec![String::new()];
        for _ in 0..6 {
            last = last
                .iter()
                .flat_map(|w| ALPHABET.iter().map(move |c| format!("{}{}", w, c)))
                .collect();
            words.extend(last.iter().cloned());
        }

        for (pattern, reference) in PATTERNS {
            let dfa = dfa_of(pattern);
            let rx = regex::Regex::new(reference).unwrap();
            for word in &words {
                assert_eq!(
                    accepts(&dfa, word),
                    rx.is_match(word),
                    "pattern {} on input '{}'",
                    pattern,
                    word
                );
            }
        }
    }

    #[test]
    fn test_run_dies_and_resets() {
        let dfa = dfa_of("ab");
        let mut run = DfaRun::new(&dfa);
        run.advance(&dfa, 'a');
        assert!(!run.is_in_dead_state());
        assert!(!run.is_in_final_state(&dfa));
        run.advance(&dfa, 'x');
        assert!(run.is_in_dead_state());
        assert!(!run.is_in_final_state(&dfa));
        run.reset(&dfa);
        assert_eq!(run.current_state(), Some(dfa.start_state()));
        run.advance(&dfa, 'a');
        run.advance(&dfa, 'b');
        assert!(run.is_in_final_state(&dfa));
    }

    #[test]
    #[should_panic(expected = "dead state")]
    fn test_advance_dead_run_panics() {
        let dfa = dfa_of("a");
        let mut run = DfaRun::new(&dfa);
        run.advance(&dfa, 'b');
        run.advance(&dfa, 'a');
    }

    #[test]
    fn test_out_of_range_transition() {
        let mut dfa = Dfa::new(2, StateID::new(0), [StateID::new(1)]).unwrap();
        assert!(dfa.add_transition(StateID::new(0), 'a', StateID::new(2)).is_err());
        assert!(dfa.add_final_state(StateID::new(2)).is_err());
        assert!(Dfa::new(1, StateID::new(1), []).is_err());
        assert!(dfa.add_transition(StateID::new(0), 'a', StateID::new(1)).is_ok());
        assert_eq!(dfa.next_state(StateID::new(0), 'a'), Some(StateID::new(1)));
        assert_eq!(dfa.next_state(StateID::new(1), 'a'), None);
    }
}
