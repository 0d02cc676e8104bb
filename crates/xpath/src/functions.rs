//! Built-in XPath functions available inside predicates.

use crate::ast::Expression;
use crate::datasource::DataSourceNode;
use crate::engine::{EvaluationContext, XPathValue};
use crate::error::XPathError;

/// The closed set of functions the compiler accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    Position,
    Last,
    Count,
    Not,
    True,
    False,
    Boolean,
    String,
    LocalName,
    Name,
    Contains,
    StartsWith,
}

impl Function {
    pub fn lookup(name: &str) -> Option<Self> {
        let function = match name {
            "position" => Function::Position,
            "last" => Function::Last,
            "count" => Function::Count,
            "not" => Function::Not,
            "true" => Function::True,
            "false" => Function::False,
            "boolean" => Function::Boolean,
            "string" => Function::String,
            "local-name" => Function::LocalName,
            "name" => Function::Name,
            "contains" => Function::Contains,
            "starts-with" => Function::StartsWith,
            _ => return None,
        };
        Some(function)
    }

    /// Inclusive bounds on the number of arguments.
    pub fn arity(self) -> (usize, usize) {
        match self {
            Function::Position | Function::Last | Function::True | Function::False => (0, 0),
            Function::Count | Function::Not | Function::Boolean => (1, 1),
            Function::String | Function::LocalName | Function::Name => (0, 1),
            Function::Contains | Function::StartsWith => (2, 2),
        }
    }

    fn requires_node_set(self) -> bool {
        matches!(self, Function::Count | Function::LocalName | Function::Name)
    }

    /// Checks a call site at compile time so evaluation never meets an unknown
    /// function or a wrong argument count.
    pub fn validate(name: &str, args: &[Expression]) -> Result<Self, XPathError> {
        let function = Function::lookup(name).ok_or_else(|| XPathError::FunctionError {
            function: name.to_string(),
            message: "Unknown XPath function".to_string(),
        })?;
        let (min, max) = function.arity();
        if args.len() < min || args.len() > max {
            let expected = if min == max {
                format!("{}", min)
            } else {
                format!("{} to {}", min, max)
            };
            return Err(XPathError::FunctionError {
                function: name.to_string(),
                message: format!("Expected {} argument(s), found {}", expected, args.len()),
            });
        }
        if function.requires_node_set() && args.iter().any(|arg| !arg.is_node_set()) {
            return Err(XPathError::FunctionError {
                function: name.to_string(),
                message: "Argument must be a node-set".to_string(),
            });
        }
        Ok(function)
    }
}

/// Dispatches a call to its implementation. Arguments are already evaluated.
pub fn call<'a, N: DataSourceNode<'a>>(
    function: Function,
    mut args: Vec<XPathValue<N>>,
    e_ctx: &EvaluationContext<N>,
) -> Result<XPathValue<N>, XPathError> {
    let value = match function {
        Function::Position => XPathValue::Number(e_ctx.context_position as f64),
        Function::Last => XPathValue::Number(e_ctx.context_size as f64),
        Function::Count => XPathValue::Number(node_set_arg(&mut args, "count")?.len() as f64),
        Function::Not => XPathValue::Boolean(!args.pop().is_some_and(|arg| arg.to_bool())),
        Function::True => XPathValue::Boolean(true),
        Function::False => XPathValue::Boolean(false),
        Function::Boolean => XPathValue::Boolean(args.pop().is_some_and(|arg| arg.to_bool())),
        Function::String => match args.pop() {
            Some(arg) => XPathValue::String(arg.to_string()),
            None => XPathValue::String(e_ctx.context_node.string_value()),
        },
        Function::LocalName | Function::Name => {
            let node = if args.is_empty() {
                Some(e_ctx.context_node)
            } else {
                node_set_arg(&mut args, "name")?.first().copied()
            };
            let qualified = function == Function::Name;
            let name = node.and_then(|n| n.name()).map(|q| match q.prefix {
                Some(prefix) if qualified => format!("{}:{}", prefix, q.local_part),
                _ => q.local_part.to_string(),
            });
            XPathValue::String(name.unwrap_or_default())
        }
        Function::Contains => {
            let (haystack, needle) = two_strings(args);
            XPathValue::Boolean(haystack.contains(&needle))
        }
        Function::StartsWith => {
            let (haystack, prefix) = two_strings(args);
            XPathValue::Boolean(haystack.starts_with(&prefix))
        }
    };
    Ok(value)
}

fn node_set_arg<N>(args: &mut Vec<XPathValue<N>>, function: &str) -> Result<Vec<N>, XPathError> {
    match args.pop() {
        Some(XPathValue::NodeSet(nodes)) => Ok(nodes),
        _ => Err(XPathError::TypeError(format!(
            "{}() expects a node-set argument",
            function
        ))),
    }
}

fn two_strings<'a, N: DataSourceNode<'a>>(args: Vec<XPathValue<N>>) -> (String, String) {
    let mut strings = args.into_iter().map(|arg| arg.to_string());
    let first = strings.next().unwrap_or_default();
    let second = strings.next().unwrap_or_default();
    (first, second)
}
