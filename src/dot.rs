//! The `dot` module contains the conversion of NFAs and DFAs to the graphviz dot format.

use std::io::Write;

use dot_writer::{Attributes, Color, DotWriter, RankDirection, Shape};

use crate::{dfa::Dfa, escape::char_representation, nfa::Nfa, StateID};

fn symbol_label(c: char) -> String {
    match c {
        '"' => "\\\"".to_string(),
        '\\' => "\\\\".to_string(),
        _ => char_representation(c),
    }
}

fn node_name(state: StateID) -> String {
    format!("node_{}", state.as_usize())
}

/// Render the NFA to a graphviz dot format.
pub fn nfa_render<W: Write>(nfa: &Nfa, label: &str, output: &mut W) {
    let mut writer = DotWriter::from(output);
    writer.set_pretty_print(true);
    let mut digraph = writer.digraph();
    digraph
        .set_label(label)
        .set_rank_direction(RankDirection::LeftRight);
    for state in (0..nfa.number_of_states()).map(StateID::new) {
        let source_id = {
            let mut source_node = digraph.node_auto();
            source_node.set_label(&state.to_string());
            if state == nfa.start_state() {
                source_node
                    .set_shape(Shape::Circle)
                    .set_color(Color::Blue)
                    .set_pen_width(3.0);
            }
            if nfa.final_states().contains(&state) {
                source_node
                    .set_shape(Shape::Circle)
                    .set_color(Color::Red)
                    .set_pen_width(3.0);
            }
            source_node.id()
        };
        for (symbol, targets) in &nfa.normal_transitions()[state] {
            for target in targets {
                digraph
                    .edge(source_id.clone(), &node_name(*target))
                    .attributes()
                    .set_label(&symbol_label(*symbol));
            }
        }
        for target in &nfa.epsilon_transitions()[state] {
            digraph
                .edge(source_id.clone(), &node_name(*target))
                .attributes()
                .set_label("ε");
        }
    }
}

/// Render a DFA to a graphviz dot format.
pub fn dfa_render<W: Write>(dfa: &Dfa, label: &str, output: &mut W) {
    let mut writer = DotWriter::from(output);
    writer.set_pretty_print(true);
    let mut digraph = writer.digraph();
    digraph
        .set_label(label)
        .set_rank_direction(RankDirection::LeftRight);
    for state in (0..dfa.number_of_states()).map(StateID::new) {
        let source_id = {
            let mut source_node = digraph.node_auto();
            source_node.set_label(&state.to_string());
            if state == dfa.start_state() {
                source_node
                    .set_shape(Shape::Circle)
                    .set_color(Color::Blue)
                    .set_pen_width(3.0);
            }
            if dfa.is_final(state) {
                source_node.set_color(Color::Red).set_pen_width(3.0);
            }
            source_node.id()
        };
        for (symbol, target) in &dfa.transitions()[state] {
            digraph
                .edge(source_id.clone(), &node_name(*target))
                .attributes()
                .set_label(&symbol_label(*symbol));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parser::Regex, tree::ExprTree};

    fn nfa(pattern: &str) -> Nfa {
        let regex = Regex::new(pattern).unwrap();
        let tree = ExprTree::new(&regex).unwrap();
        (&tree).try_into().unwrap()
    }

    #[test]
    fn test_nfa_render() {
        let nfa = nfa("a*\"");
        let mut output = Vec::new();
        nfa_render(&nfa, "a*\\\"", &mut output);
        let dot = String::from_utf8(output).unwrap();
        assert!(dot.contains("digraph"));
        assert!(dot.contains("ε"));
        assert!(dot.contains("\\\""));
        assert!(dot.contains(&node_name(StateID::new(nfa.number_of_states() - 1))));
    }

    #[test]
    fn test_dfa_render() {
        let nfa = nfa("(a|b)*abb");
        let dfa: Dfa = (&nfa).try_into().unwrap();
        let mut output = Vec::new();
        dfa_render(&dfa, "(a|b)*abb", &mut output);
        let dot = String::from_utf8(output).unwrap();
        assert!(dot.contains("digraph"));
        assert!(!dot.contains("ε"));
        assert!(dot.contains("node_4"));
    }
}
