//! Turns a path string into a validated, reusable query.

use crate::ast::{BinaryOperator, Expression};
use crate::datasource::DataSourceNode;
use crate::engine::{EvaluationContext, XPathValue, evaluate};
use crate::error::XPathError;
use crate::functions::Function;
use crate::parser::parse_expression;
use std::fmt;
use std::str::FromStr;

/// A parsed and validated node-selecting expression.
///
/// Compilation rejects unknown functions, bad argument counts and expressions
/// that cannot yield nodes, so a compiled query can be evaluated any number of
/// times against any tree.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledXPath {
    source: String,
    expr: Expression,
}

/// Compiles `path`; shorthand for [`CompiledXPath::compile`].
pub fn compile(path: &str) -> Result<CompiledXPath, XPathError> {
    CompiledXPath::compile(path)
}

impl CompiledXPath {
    pub fn compile(path: &str) -> Result<Self, XPathError> {
        let expr = parse_expression(path)?;
        if !expr.is_node_set() {
            return Err(XPathError::NotANodeSet(path.to_string()));
        }
        validate(&expr)?;
        log::debug!("Compiled XPath '{}'", path);
        Ok(Self {
            source: path.to_string(),
            expr,
        })
    }

    /// The text the query was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn expression(&self) -> &Expression {
        &self.expr
    }

    /// Evaluates the query with `context` as the context node. The result is in
    /// document order without duplicates. The tree is never modified.
    pub fn select<'a, N>(&self, context: N) -> Result<NodeSet<N>, XPathError>
    where
        N: DataSourceNode<'a> + 'a,
    {
        match evaluate(&self.expr, &EvaluationContext::new(context))? {
            XPathValue::NodeSet(nodes) => Ok(NodeSet::from(nodes)),
            _ => Err(XPathError::NotANodeSet(self.source.clone())),
        }
    }
}

impl FromStr for CompiledXPath {
    type Err = XPathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::compile(s)
    }
}

impl fmt::Display for CompiledXPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn validate(expr: &Expression) -> Result<(), XPathError> {
    match expr {
        Expression::Literal(_) | Expression::Number(_) => Ok(()),
        Expression::LocationPath(path) => path
            .steps
            .iter()
            .flat_map(|step| step.predicates.iter())
            .try_for_each(validate),
        Expression::FunctionCall { name, args } => {
            Function::validate(name, args)?;
            args.iter().try_for_each(validate)
        }
        Expression::BinaryOp { left, op, right } => {
            if *op == BinaryOperator::Union && !(left.is_node_set() && right.is_node_set()) {
                return Err(XPathError::TypeError(
                    "Both operands of '|' must be node-sets".to_string(),
                ));
            }
            validate(left)?;
            validate(right)
        }
    }
}

/// The ordered result of evaluating a [`CompiledXPath`]. Finite, consumed once.
#[derive(Debug, Clone)]
pub struct NodeSet<N> {
    nodes: std::vec::IntoIter<N>,
}

impl<N> NodeSet<N> {
    pub fn empty() -> Self {
        Self::from(Vec::new())
    }
}

impl<N> From<Vec<N>> for NodeSet<N> {
    fn from(nodes: Vec<N>) -> Self {
        Self {
            nodes: nodes.into_iter(),
        }
    }
}

impl<N> Iterator for NodeSet<N> {
    type Item = N;

    fn next(&mut self) -> Option<N> {
        self.nodes.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.nodes.size_hint()
    }
}

impl<N> ExactSizeIterator for NodeSet<N> {}

impl<N> std::iter::FusedIterator for NodeSet<N> {}
