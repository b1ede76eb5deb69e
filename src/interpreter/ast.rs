use std::fmt::{Debug, Formatter};
use crate::interpreter::lexer::Token;

#[derive(Clone, PartialEq)]
pub enum Expr {
    Variable(Token),
    Conditional {
        token: Token,
        /// Always an identifier; conditionals are never used as conditions.
        condition: Token,
        then: Box<Expr>,
        otherwise: Option<Box<Expr>>,
    },
}

impl Expr {
    /// Indented tree with one node per line, children prefixed by `|- `.
    pub fn to_tree_string(&self) -> String {
        let mut out = String::new();
        self.write_tree(&mut out, "", "");
        out
    }

    fn write_tree(&self, out: &mut String, indent: &str, pointer: &str) {
        out.push_str(indent);
        out.push_str(pointer);

        let indent = format!("{}|  ", indent);

        match self {
            Expr::Variable(name) => {
                out.push_str(&format!("var: '{}'\n", name.source()));
            },
            Expr::Conditional { condition, then, otherwise, .. } => {
                out.push_str("if\n");
                out.push_str(&format!("{}|- condition: '{}'\n", indent, condition.source()));
                then.write_tree(out, &indent, "|- then: ");

                if let Some(otherwise) = otherwise {
                    otherwise.write_tree(out, &indent, "|- else: ");
                }
            },
        }
    }
}

impl Expr {
    /// Graphviz DOT graph of the tree. Nodes are numbered in pre-order.
    pub fn to_dot(&self) -> String {
        let mut out = String::from("graph {\n");
        let mut next_id = 0;
        self.write_dot(&mut out, &mut next_id);
        out.push_str("}\n");
        out
    }

    fn write_dot(&self, out: &mut String, next_id: &mut usize) -> usize {
        let id = Self::dot_node(out, next_id, &match self {
            Expr::Variable(name) => format!("var: {}", name.source()),
            Expr::Conditional { .. } => String::from("if"),
        });

        if let Expr::Conditional { condition, then, otherwise, .. } = self {
            let condition = Self::dot_node(out, next_id, &format!("condition: {}", condition.source()));
            out.push_str(&format!("  n{} -- n{} [label=\"condition\"];\n", id, condition));

            let then = then.write_dot(out, next_id);
            out.push_str(&format!("  n{} -- n{} [label=\"then\"];\n", id, then));

            if let Some(otherwise) = otherwise {
                let otherwise = otherwise.write_dot(out, next_id);
                out.push_str(&format!("  n{} -- n{} [label=\"else\"];\n", id, otherwise));
            }
        }

        id
    }

    fn dot_node(out: &mut String, next_id: &mut usize, label: &str) -> usize {
        let id = *next_id;
        *next_id += 1;

        // Identifiers never contain quotes or backslashes
        out.push_str(&format!("  n{} [label=\"{}\"];\n", id, label));
        id
    }
}

impl Debug for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Expr::Variable(name) => write!(f, "{}", name.source()),
            Expr::Conditional { condition, then, otherwise: Some(otherwise), .. } =>
                write!(f, "(if {}; {:?} : {:?})", condition.source(), *then, *otherwise),
            Expr::Conditional { condition, then, otherwise: None, .. } =>
                write!(f, "(if {}; {:?})", condition.source(), *then),
        }
    }
}
