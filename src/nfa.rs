//! This module contains the NFA (Non-deterministic Finite Automaton) implementation.
//! The NFA is built from the expression tree of a pattern by Thompson construction and is
//! later converted to a DFA (Deterministic Finite Automaton) by subset construction.
//!
//! States are plain indices in the range `0..number_of_states`. Every fragment produced by
//! the composition functions has exactly one start state and one final state.

use std::collections::{BTreeMap, BTreeSet};

use itertools::Itertools;

use crate::{escape::char_representation, invalid_state, Result, StateID};

/// A set of NFA states.
pub type StateSet = BTreeSet<StateID>;

/// A non-deterministic finite automaton.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Nfa {
    number_of_states: usize,
    start_state: StateID,
    final_states: StateSet,
    // For each state the targets reachable on a symbol
    normal_transitions: Vec<BTreeMap<char, StateSet>>,
    // For each state the targets reachable without consuming input
    epsilon_transitions: Vec<StateSet>,
}

impl Nfa {
    /// Creates an NFA without transitions.
    pub fn new<I>(number_of_states: usize, start_state: StateID, final_states: I) -> Result<Self>
    where
        I: IntoIterator<Item = StateID>,
    {
        let final_states: StateSet = final_states.into_iter().collect();
        if let Some(state) = std::iter::once(&start_state)
            .chain(final_states.iter())
            .find(|s| s.as_usize() >= number_of_states)
        {
            return Err(invalid_state!(
                "state {} is out of range for an NFA with {} states",
                state,
                number_of_states
            ));
        }
        Ok(Nfa {
            number_of_states,
            start_state,
            final_states,
            normal_transitions: vec![BTreeMap::new(); number_of_states],
            epsilon_transitions: vec![StateSet::new(); number_of_states],
        })
    }

    /// The number of states. State ids are the range `0..number_of_states`.
    pub fn number_of_states(&self) -> usize {
        self.number_of_states
    }

    /// The start state.
    pub fn start_state(&self) -> StateID {
        self.start_state
    }

    /// The final states.
    pub fn final_states(&self) -> &StateSet {
        &self.final_states
    }

    /// The transitions on symbols, indexed by the source state.
    pub fn normal_transitions(&self) -> &[BTreeMap<char, StateSet>] {
        &self.normal_transitions
    }

    /// The epsilon transitions, indexed by the source state.
    pub fn epsilon_transitions(&self) -> &[StateSet] {
        &self.epsilon_transitions
    }

    fn check_range(&self, from: StateID, to: StateID) -> Result<()> {
        if from.as_usize() >= self.number_of_states || to.as_usize() >= self.number_of_states {
            return Err(invalid_state!(
                "transition {} -> {} is out of range for an NFA with {} states",
                from,
                to,
                self.number_of_states
            ));
        }
        Ok(())
    }

    /// Adds a transition on the given symbol.
    pub fn add_transition(&mut self, from: StateID, symbol: char, to: StateID) -> Result<()> {
        self.check_range(from, to)?;
        self.normal_transitions[from]
            .entry(symbol)
            .or_default()
            .insert(to);
        Ok(())
    }

    /// Adds a transition that consumes no input.
    pub fn add_epsilon_transition(&mut self, from: StateID, to: StateID) -> Result<()> {
        self.check_range(from, to)?;
        self.epsilon_transitions[from].insert(to);
        Ok(())
    }

    /// The symbols that label at least one transition.
    pub fn alphabet(&self) -> BTreeSet<char> {
        self.normal_transitions
            .iter()
            .flat_map(|transitions| transitions.keys().copied())
            .collect()
    }

    /// The set of states reachable from the given states by epsilon transitions only,
    /// including the given states themselves.
    pub fn epsilon_closure(&self, states: &StateSet) -> StateSet {
        let mut closure = states.clone();
        let mut work_list: Vec<StateID> = states.iter().copied().collect();
        while let Some(state) = work_list.pop() {
            for target in &self.epsilon_transitions[state] {
                if closure.insert(*target) {
                    work_list.push(*target);
                }
            }
        }
        closure
    }

    /// The set of states reachable from the given states by a transition on the symbol.
    pub fn move_set(&self, states: &StateSet, symbol: char) -> StateSet {
        states
            .iter()
            .filter_map(|state| self.normal_transitions[*state].get(&symbol))
            .flatten()
            .copied()
            .collect()
    }

    /// Returns the only final state of a Thompson fragment.
    pub(crate) fn single_final_state(&self) -> Result<StateID> {
        match self.final_states.iter().exactly_one() {
            Ok(state) => Ok(*state),
            Err(states) => Err(invalid_state!(
                "a fragment needs exactly one final state, found {}",
                states.count()
            )),
        }
    }

    /// Copies all transitions of the given NFA into this one with every state id shifted
    /// by the offset.
    fn import(&mut self, nfa: &Nfa, offset: usize) -> Result<()> {
        for (from, transitions) in nfa.normal_transitions.iter().enumerate() {
            for (symbol, targets) in transitions {
                for to in targets {
                    self.add_transition(StateID::new(from + offset), *symbol, *to + offset)?;
                }
            }
        }
        for (from, targets) in nfa.epsilon_transitions.iter().enumerate() {
            for to in targets {
                self.add_epsilon_transition(StateID::new(from + offset), *to + offset)?;
            }
        }
        Ok(())
    }

    /// A fragment that matches the single character.
    pub fn literal(c: char) -> Self {
        let mut nfa = Self::fragment(2);
        nfa.normal_transitions[0]
            .entry(c)
            .or_default()
            .insert(StateID::new(1));
        nfa
    }

    /// A fragment that matches the empty string.
    pub fn epsilon() -> Self {
        let mut nfa = Self::fragment(2);
        nfa.epsilon_transitions[0].insert(StateID::new(1));
        nfa
    }

    // A fragment with start state 0 and the last state as final state.
    fn fragment(number_of_states: usize) -> Self {
        Nfa {
            number_of_states,
            start_state: StateID::new(0),
            final_states: [StateID::new(number_of_states - 1)].into(),
            normal_transitions: vec![BTreeMap::new(); number_of_states],
            epsilon_transitions: vec![StateSet::new(); number_of_states],
        }
    }

    /// Concatenates the given fragment to this one.
    ///
    /// The states of `nfa` are shifted so that its start state coincides with the final
    /// state of this fragment. Transitions leaving the start state of `nfa` now leave the
    /// final state of this fragment.
    pub fn concat(self, nfa: Nfa) -> Result<Self> {
        let own_final = self.single_final_state()?;
        let other_final = nfa.single_final_state()?;
        let offset = self.number_of_states - 1;

        let mut result = self;
        let additional = nfa.number_of_states - 1;
        result.number_of_states += additional;
        result
            .normal_transitions
            .extend(std::iter::repeat_with(BTreeMap::new).take(additional));
        result
            .epsilon_transitions
            .extend(std::iter::repeat_with(StateSet::new).take(additional));

        let source = |from: usize| {
            if from == nfa.start_state.as_usize() {
                own_final
            } else {
                StateID::new(from + offset)
            }
        };
        for (from, transitions) in nfa.normal_transitions.iter().enumerate() {
            for (symbol, targets) in transitions {
                for to in targets {
                    result.add_transition(source(from), *symbol, *to + offset)?;
                }
            }
        }
        for (from, targets) in nfa.epsilon_transitions.iter().enumerate() {
            for to in targets {
                result.add_epsilon_transition(source(from), *to + offset)?;
            }
        }

        result.final_states = [other_final + offset].into();
        Ok(result)
    }

    /// A fragment that matches either this fragment or the given one.
    pub fn union(self, nfa: Nfa) -> Result<Self> {
        let own_final = self.single_final_state()?;
        let other_final = nfa.single_final_state()?;
        let other_offset = 1 + self.number_of_states;

        let mut result = Self::fragment(self.number_of_states + nfa.number_of_states + 2);
        let start = result.start_state;
        let end = result.single_final_state()?;
        result.import(&self, 1)?;
        result.import(&nfa, other_offset)?;
        result.add_epsilon_transition(start, self.start_state + 1)?;
        result.add_epsilon_transition(start, nfa.start_state + other_offset)?;
        result.add_epsilon_transition(own_final + 1, end)?;
        result.add_epsilon_transition(other_final + other_offset, end)?;
        Ok(result)
    }

    /// A fragment that matches zero or more repetitions of this fragment.
    pub fn closure(self) -> Result<Self> {
        let own_final = self.single_final_state()?;

        let mut result = Self::fragment(self.number_of_states + 2);
        let start = result.start_state;
        let end = result.single_final_state()?;
        result.import(&self, 1)?;
        // Enter
        result.add_epsilon_transition(start, self.start_state + 1)?;
        // Skip
        result.add_epsilon_transition(start, end)?;
        // Repeat
        result.add_epsilon_transition(own_final + 1, self.start_state + 1)?;
        // Exit
        result.add_epsilon_transition(own_final + 1, end)?;
        Ok(result)
    }
}

impl std::fmt::Display for Nfa {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "    Start State: {}", self.start_state)?;
        writeln!(f, "    Final States: {{{}}}", self.final_states.iter().join(", "))?;
        writeln!(
            f,
            "    Alphabet: {{{}}}",
            self.alphabet().into_iter().map(char_representation).join(", ")
        )?;
        writeln!(f, "    Transitions:")?;
        writeln!(f, "        {:>5} {:<30} EPSILON", "STATE", "NORMAL")?;
        for state in 0..self.number_of_states {
            let normal = self.normal_transitions[state]
                .iter()
                .map(|(symbol, targets)| {
                    format!(
                        "{}={{{}}}",
                        char_representation(*symbol),
                        targets.iter().join(", ")
                    )
                })
                .join(", ");
            writeln!(
                f,
                "        {:>5} {:<30} {{{}}}",
                state,
                normal,
                self.epsilon_transitions[state].iter().join(", ")
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(states: &[usize]) -> StateSet {
        states.iter().map(|s| StateID::new(*s)).collect()
    }

    // Checks the invariants every Thompson fragment has to hold.
    fn assert_fragment(nfa: &Nfa) {
        assert_eq!(nfa.start_state(), StateID::new(0));
        assert_eq!(nfa.final_states().len(), 1);
        let n = nfa.number_of_states();
        assert!(nfa.final_states().iter().all(|s| s.as_usize() < n));
        assert_eq!(nfa.normal_transitions().len(), n);
        assert_eq!(nfa.epsilon_transitions().len(), n);
        for transitions in nfa.normal_transitions() {
            assert!(transitions.values().flatten().all(|s| s.as_usize() < n));
        }
        for targets in nfa.epsilon_transitions() {
            assert!(targets.iter().all(|s| s.as_usize() < n));
        }
    }

    #[test]
    fn test_literal() {
        let nfa = Nfa::literal('a');
        assert_fragment(&nfa);
        assert_eq!(nfa.number_of_states(), 2);
        assert_eq!(nfa.move_set(&set(&[0]), 'a'), set(&[1]));
        assert!(nfa.move_set(&set(&[0]), 'b').is_empty());
    }

    #[test]
    fn test_epsilon() {
        let nfa = Nfa::epsilon();
        assert_fragment(&nfa);
        assert_eq!(nfa.epsilon_closure(&set(&[0])), set(&[0, 1]));
        assert!(nfa.alphabet().is_empty());
    }

    #[test]
    fn test_concat() {
        let nfa = Nfa::literal('a').concat(Nfa::literal('b')).unwrap();
        assert_fragment(&nfa);
        assert_eq!(nfa.number_of_states(), 3);
        assert_eq!(nfa.final_states(), &set(&[2]));
        assert_eq!(nfa.move_set(&set(&[0]), 'a'), set(&[1]));
        assert_eq!(nfa.move_set(&set(&[1]), 'b'), set(&[2]));
    }

    #[test]
    fn test_union() {
        let nfa = Nfa::literal('a').union(Nfa::literal('b')).unwrap();
        assert_fragment(&nfa);
        assert_eq!(nfa.number_of_states(), 6);
        assert_eq!(nfa.final_states(), &set(&[5]));
        assert_eq!(nfa.epsilon_closure(&set(&[0])), set(&[0, 1, 3]));
        assert_eq!(nfa.move_set(&set(&[1, 3]), 'b'), set(&[4]));
        assert_eq!(nfa.epsilon_closure(&set(&[4])), set(&[4, 5]));
        assert_eq!(nfa.alphabet(), BTreeSet::from(['a', 'b']));
    }

    #[test]
    fn test_closure() {
        let nfa = Nfa::literal('a').closure().unwrap();
        assert_fragment(&nfa);
        assert_eq!(nfa.number_of_states(), 4);
        assert_eq!(nfa.epsilon_closure(&set(&[0])), set(&[0, 1, 3]));
        assert_eq!(nfa.epsilon_closure(&set(&[2])), set(&[1, 2, 3]));
    }

    #[test]
    fn test_epsilon_closure_is_idempotent() {
        let nfa = Nfa::literal('a')
            .union(Nfa::epsilon())
            .unwrap()
            .closure()
            .unwrap()
            .concat(Nfa::literal('b').closure().unwrap())
            .unwrap();
        assert_fragment(&nfa);
        for state in 0..nfa.number_of_states() {
            let closure = nfa.epsilon_closure(&set(&[state]));
            assert!(closure.contains(&StateID::new(state)));
            assert_eq!(nfa.epsilon_closure(&closure), closure);
        }
        let all = set(&(0..nfa.number_of_states()).collect::<Vec<_>>());
        assert_eq!(nfa.epsilon_closure(&all), all);
    }

    #[test]
    fn test_out_of_range_transition() {
        let mut nfa = Nfa::new(2, StateID::new(0), [StateID::new(1)]).unwrap();
        assert!(nfa.add_transition(StateID::new(0), 'a', StateID::new(2)).is_err());
        assert!(nfa.add_epsilon_transition(StateID::new(5), StateID::new(1)).is_err());
        assert!(Nfa::new(2, StateID::new(2), []).is_err());
        assert!(Nfa::new(2, StateID::new(0), [StateID::new(3)]).is_err());
    }

    #[test]
    fn test_fragment_needs_single_final_state() {
        let nfa = Nfa::new(3, StateID::new(0), [StateID::new(1), StateID::new(2)]).unwrap();
        assert!(nfa.clone().closure().is_err());
        assert!(Nfa::literal('a').concat(nfa).is_err());
    }
}
