//! This module contains the TryFrom implementations for converting the expression tree to
//! an NFA by Thompson construction.

use crate::{
    nfa::Nfa,
    tree::{ExprNode, ExprTree},
    LexGenError, Result,
};

impl TryFrom<&ExprNode> for Nfa {
    type Error = LexGenError;

    fn try_from(node: &ExprNode) -> Result<Self> {
        match node {
            ExprNode::Char(c) => Ok(Nfa::literal(*c)),
            ExprNode::Epsilon => Ok(Nfa::epsilon()),
            ExprNode::Concat(left, right) => {
                let nfa: Nfa = left.as_ref().try_into()?;
                nfa.concat(right.as_ref().try_into()?)
            }
            ExprNode::Union(left, right) => {
                let nfa: Nfa = left.as_ref().try_into()?;
                nfa.union(right.as_ref().try_into()?)
            }
            ExprNode::Closure(inner) => {
                let nfa: Nfa = inner.as_ref().try_into()?;
                nfa.closure()
            }
        }
    }
}

impl TryFrom<&ExprTree> for Nfa {
    type Error = LexGenError;

    fn try_from(tree: &ExprTree) -> Result<Self> {
        tree.root().try_into()
    }
}
