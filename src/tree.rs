//! The expression tree of a pattern.
//! The tree is built from the postfix token sequence with an operand stack.

use crate::{
    escape::char_representation,
    malformed,
    parser::{
        is_special_char, Regex, RegexTokenKind, CLOSURE, CONCAT, EPSILON, ESCAPE, UNION,
    },
    postfix::to_postfix,
    Result,
};

/// A node of the expression tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExprNode {
    /// A literal character.
    Char(char),
    /// The empty string.
    Epsilon,
    /// Either the left or the right expression.
    Union(Box<ExprNode>, Box<ExprNode>),
    /// The left expression followed by the right one.
    Concat(Box<ExprNode>, Box<ExprNode>),
    /// Zero or more repetitions of the expression.
    Closure(Box<ExprNode>),
}

impl ExprNode {
    /// The character the node is labeled with when printed.
    fn label(&self) -> String {
        match self {
            ExprNode::Char(c) if is_special_char(*c) => format!("{}{}", ESCAPE, c),
            ExprNode::Char(c) => char_representation(*c),
            ExprNode::Epsilon => EPSILON.to_string(),
            ExprNode::Union(..) => UNION.to_string(),
            ExprNode::Concat(..) => CONCAT.to_string(),
            ExprNode::Closure(_) => CLOSURE.to_string(),
        }
    }

    fn pretty_print(
        &self,
        prefix: &str,
        child_prefix: &str,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        writeln!(f, "{}{}", prefix, self.label())?;
        match self {
            ExprNode::Union(left, right) | ExprNode::Concat(left, right) => {
                left.pretty_print(
                    &format!("{}|-- ", child_prefix),
                    &format!("{}|   ", child_prefix),
                    f,
                )?;
                right.pretty_print(
                    &format!("{}\\-- ", child_prefix),
                    &format!("{}    ", child_prefix),
                    f,
                )
            }
            ExprNode::Closure(inner) => inner.pretty_print(
                &format!("{}\\-- ", child_prefix),
                &format!("{}    ", child_prefix),
                f,
            ),
            ExprNode::Char(_) | ExprNode::Epsilon => Ok(()),
        }
    }
}

/// The expression tree of a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExprTree {
    root: ExprNode,
}

impl ExprTree {
    /// Builds the expression tree of the regex.
    pub fn new(regex: &Regex) -> Result<Self> {
        let postfix = to_postfix(regex)?;
        let mut operands: Vec<ExprNode> = Vec::new();
        let pop = |operands: &mut Vec<ExprNode>| {
            operands
                .pop()
                .map(Box::new)
                .ok_or_else(|| malformed!(regex.raw(), "operator without operand"))
        };

        for token in postfix {
            let node = match token.kind() {
                RegexTokenKind::Char => ExprNode::Char(token.value()),
                RegexTokenKind::Epsilon => ExprNode::Epsilon,
                RegexTokenKind::Closure => ExprNode::Closure(pop(&mut operands)?),
                RegexTokenKind::Union => {
                    let right = pop(&mut operands)?;
                    let left = pop(&mut operands)?;
                    ExprNode::Union(left, right)
                }
                RegexTokenKind::Concat => {
                    let right = pop(&mut operands)?;
                    let left = pop(&mut operands)?;
                    ExprNode::Concat(left, right)
                }
                _ => {
                    return Err(malformed!(
                        regex.raw(),
                        format!("unexpected '{}'", token.value())
                    ))
                }
            };
            operands.push(node);
        }

        if operands.len() != 1 {
            return Err(malformed!(
                regex.raw(),
                format!(
                    "expected exactly one expression, found {}",
                    operands.len()
                )
            ));
        }
        match operands.pop() {
            Some(root) => Ok(ExprTree { root }),
            None => Err(malformed!(regex.raw(), "empty expression")),
        }
    }

    /// The root node of the tree.
    pub fn root(&self) -> &ExprNode {
        &self.root
    }
}

impl std::fmt::Display for ExprTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.root.pretty_print("    ", "    ", f)
    }
}
