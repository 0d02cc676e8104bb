//! The evaluation engine for executing a parsed expression against a generic `DataSourceNode`.

use crate::ast::{Axis, BinaryOperator, Expression, LocationPath, NodeTest, NodeTypeTest, Step};
use crate::axes::AxisCollector;
use crate::datasource::{DataSourceNode, NodeType};
use crate::error::XPathError;
use crate::functions::{self, Function};
use std::fmt;

/// Represents the possible result types of an XPath expression evaluation.
#[derive(Debug, Clone)]
pub enum XPathValue<N> {
    NodeSet(Vec<N>),
    String(String),
    Number(f64),
    Boolean(bool),
}

impl<'a, N: DataSourceNode<'a>> XPathValue<N> {
    /// Coerces the XPath value to a boolean as per XPath 1.0 rules.
    pub fn to_bool(&self) -> bool {
        match self {
            XPathValue::NodeSet(nodes) => !nodes.is_empty(),
            XPathValue::String(s) => !s.is_empty(),
            XPathValue::Number(n) => *n != 0.0 && !n.is_nan(),
            XPathValue::Boolean(b) => *b,
        }
    }

    /// Coerces the XPath value to a number as per XPath 1.0 rules.
    pub fn to_number(&self) -> f64 {
        match self {
            XPathValue::Number(n) => *n,
            XPathValue::String(s) => s.trim().parse().unwrap_or(f64::NAN),
            XPathValue::Boolean(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            XPathValue::NodeSet(_) => self.to_string().trim().parse().unwrap_or(f64::NAN),
        }
    }
}

impl<'a, N: DataSourceNode<'a>> fmt::Display for XPathValue<N> {
    /// Coerces the XPath value to a string as per XPath 1.0 rules.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            XPathValue::NodeSet(nodes) => write!(
                f,
                "{}",
                nodes.first().map(|n| n.string_value()).unwrap_or_default()
            ),
            XPathValue::String(s) => write!(f, "{}", s),
            XPathValue::Number(n) => write!(f, "{}", n),
            XPathValue::Boolean(b) => write!(f, "{}", b),
        }
    }
}

/// The focus an expression is evaluated against.
#[derive(Debug, Clone, Copy)]
pub struct EvaluationContext<N> {
    pub context_node: N,
    /// 1-based index
    pub context_position: usize,
    pub context_size: usize,
}

impl<N> EvaluationContext<N> {
    pub fn new(context_node: N) -> Self {
        Self {
            context_node,
            context_position: 1,
            context_size: 1,
        }
    }
}

/// Evaluates an expression and returns a concrete `XPathValue`.
pub fn evaluate<'a, N>(
    expr: &Expression,
    e_ctx: &EvaluationContext<N>,
) -> Result<XPathValue<N>, XPathError>
where
    N: DataSourceNode<'a> + 'a,
{
    match expr {
        Expression::Literal(s) => Ok(XPathValue::String(s.clone())),
        Expression::Number(n) => Ok(XPathValue::Number(*n)),
        Expression::LocationPath(path) => {
            let nodes = evaluate_location_path(path, e_ctx)?;
            Ok(XPathValue::NodeSet(nodes))
        }
        Expression::FunctionCall { name, args } => {
            let function = Function::lookup(name).ok_or_else(|| XPathError::FunctionError {
                function: name.clone(),
                message: "Unknown XPath function".to_string(),
            })?;
            let mut evaluated_args = Vec::with_capacity(args.len());
            for arg in args {
                evaluated_args.push(evaluate(arg, e_ctx)?);
            }
            functions::call(function, evaluated_args, e_ctx)
        }
        Expression::BinaryOp { left, op, right } => match op {
            BinaryOperator::Or => Ok(XPathValue::Boolean(
                evaluate(left, e_ctx)?.to_bool() || evaluate(right, e_ctx)?.to_bool(),
            )),
            BinaryOperator::And => Ok(XPathValue::Boolean(
                evaluate(left, e_ctx)?.to_bool() && evaluate(right, e_ctx)?.to_bool(),
            )),
            BinaryOperator::Union => {
                match (evaluate(left, e_ctx)?, evaluate(right, e_ctx)?) {
                    (XPathValue::NodeSet(mut nodes), XPathValue::NodeSet(more)) => {
                        nodes.extend(more);
                        Ok(XPathValue::NodeSet(in_document_order(nodes)))
                    }
                    _ => Err(XPathError::TypeError(
                        "Both operands of '|' must be node-sets".to_string(),
                    )),
                }
            }
            _ => {
                let left_val = evaluate(left, e_ctx)?;
                let right_val = evaluate(right, e_ctx)?;
                Ok(XPathValue::Boolean(compare(*op, &left_val, &right_val)))
            }
        },
    }
}

fn in_document_order<'a, N: DataSourceNode<'a>>(mut nodes: Vec<N>) -> Vec<N> {
    nodes.sort();
    nodes.dedup();
    nodes
}

fn evaluate_location_path<'a, N>(
    path: &LocationPath,
    e_ctx: &EvaluationContext<N>,
) -> Result<Vec<N>, XPathError>
where
    N: DataSourceNode<'a> + 'a,
{
    let start = if path.is_absolute {
        e_ctx.context_node.root()
    } else {
        e_ctx.context_node
    };

    let mut current_nodes = vec![start];
    for step in &path.steps {
        current_nodes = evaluate_step(step, &current_nodes)?;
    }
    Ok(current_nodes)
}

/// Evaluates one step. Predicates see the axis result of each context node on
/// its own, in axis order, so `[1]` on a reverse axis is the nearest node.
fn evaluate_step<'a, N>(step: &Step, context_nodes: &[N]) -> Result<Vec<N>, XPathError>
where
    N: DataSourceNode<'a> + 'a,
{
    let mut results = Vec::new();
    for &node in context_nodes {
        let mut collector = AxisCollector::new();
        collector.collect(step.axis, node);
        let mut axis_nodes = collector.into_nodes();
        if step.axis == Axis::PrecedingSibling {
            axis_nodes.reverse();
        }

        let tested: Vec<N> = axis_nodes
            .into_iter()
            .filter(|candidate| matches_node_test(candidate, &step.node_test, step.axis))
            .collect();
        results.extend(apply_predicates(tested, &step.predicates)?);
    }
    Ok(in_document_order(results))
}

fn matches_node_test<'a, N: DataSourceNode<'a>>(node: &N, test: &NodeTest, axis: Axis) -> bool {
    let principal = if axis == Axis::Attribute {
        NodeType::Attribute
    } else {
        NodeType::Element
    };
    match test {
        NodeTest::Wildcard => node.node_type() == principal,
        NodeTest::Name { prefix, local_part } => {
            node.node_type() == principal
                && node.name().is_some_and(|q| {
                    q.local_part == local_part
                        && prefix.as_deref().is_none_or(|p| q.prefix == Some(p))
                })
        }
        NodeTest::NodeType(NodeTypeTest::Node) => true,
        NodeTest::NodeType(NodeTypeTest::Text) => node.node_type() == NodeType::Text,
        NodeTest::NodeType(NodeTypeTest::Comment) => node.node_type() == NodeType::Comment,
    }
}

fn apply_predicates<'a, N>(nodes: Vec<N>, predicates: &[Expression]) -> Result<Vec<N>, XPathError>
where
    N: DataSourceNode<'a> + 'a,
{
    let mut final_nodes = nodes;
    for predicate in predicates {
        let context_size = final_nodes.len();
        let mut kept = Vec::with_capacity(context_size);
        for (i, node) in final_nodes.into_iter().enumerate() {
            let predicate_ctx = EvaluationContext {
                context_node: node,
                context_position: i + 1,
                context_size,
            };
            let keep = match evaluate(predicate, &predicate_ctx)? {
                XPathValue::Number(n) => n == (i + 1) as f64,
                other => other.to_bool(),
            };
            if keep {
                kept.push(node);
            }
        }
        final_nodes = kept;
    }
    Ok(final_nodes)
}

/// XPath 1.0 comparison: node-sets compare existentially through their members.
fn compare<'a, N: DataSourceNode<'a>>(
    op: BinaryOperator,
    left: &XPathValue<N>,
    right: &XPathValue<N>,
) -> bool {
    match (left, right) {
        (XPathValue::NodeSet(a), XPathValue::NodeSet(b)) => a.iter().any(|x| {
            let x: XPathValue<N> = XPathValue::String(x.string_value());
            b.iter()
                .any(|y| compare_atomic(op, &x, &XPathValue::String(y.string_value())))
        }),
        (XPathValue::NodeSet(nodes), XPathValue::Boolean(_)) => {
            compare_atomic(op, &XPathValue::Boolean(!nodes.is_empty()), right)
        }
        (XPathValue::Boolean(_), XPathValue::NodeSet(nodes)) => {
            compare_atomic(op, left, &XPathValue::Boolean(!nodes.is_empty()))
        }
        (XPathValue::NodeSet(nodes), other) => nodes
            .iter()
            .any(|n| compare_atomic(op, &atomize(n, other), other)),
        (other, XPathValue::NodeSet(nodes)) => nodes
            .iter()
            .any(|n| compare_atomic(op, other, &atomize(n, other))),
        _ => compare_atomic(op, left, right),
    }
}

/// Converts a node to the kind of atomic value it is compared against.
fn atomize<'a, N: DataSourceNode<'a>>(node: &N, like: &XPathValue<N>) -> XPathValue<N> {
    let text = node.string_value();
    match like {
        XPathValue::Number(_) => XPathValue::Number(text.trim().parse().unwrap_or(f64::NAN)),
        _ => XPathValue::String(text),
    }
}

fn compare_atomic<'a, N: DataSourceNode<'a>>(
    op: BinaryOperator,
    a: &XPathValue<N>,
    b: &XPathValue<N>,
) -> bool {
    let is_bool = |v: &XPathValue<N>| matches!(v, XPathValue::Boolean(_));
    let is_number = |v: &XPathValue<N>| matches!(v, XPathValue::Number(_));
    match op {
        BinaryOperator::Equals | BinaryOperator::NotEquals => {
            let equal = if is_bool(a) || is_bool(b) {
                a.to_bool() == b.to_bool()
            } else if is_number(a) || is_number(b) {
                a.to_number() == b.to_number()
            } else {
                a.to_string() == b.to_string()
            };
            (op == BinaryOperator::Equals) == equal
        }
        BinaryOperator::LessThan => a.to_number() < b.to_number(),
        BinaryOperator::LessThanOrEqual => a.to_number() <= b.to_number(),
        BinaryOperator::GreaterThan => a.to_number() > b.to_number(),
        BinaryOperator::GreaterThanOrEqual => a.to_number() >= b.to_number(),
        BinaryOperator::Or | BinaryOperator::And | BinaryOperator::Union => false,
    }
}
