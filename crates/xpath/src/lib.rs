pub mod ast;
pub mod axes;
pub mod compiler;
pub mod datasource;
pub mod engine;
pub mod error;
pub mod functions;
pub mod parser;

pub use ast::{Axis, BinaryOperator, Expression, LocationPath, NodeTest, Step};
pub use compiler::{CompiledXPath, NodeSet, compile};
pub use datasource::xml::{XmlDocument, XmlNode};
pub use datasource::{DataSourceNode, NodeType, QName, XSI_NAMESPACE};
pub use engine::{EvaluationContext, XPathValue, evaluate};

// Re-export test utilities for integration testing in downstream crates
pub use datasource::tests;
pub use error::XPathError;
pub use parser::parse_expression;
