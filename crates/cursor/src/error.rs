use thiserror::Error;
use xbind_xpath::XPathError;

/// Contract violations raised by cursor operations.
#[derive(Error, Debug, Clone)]
pub enum CursorError {
    #[error("Argument '{0}' is required")]
    MissingArgument(&'static str),

    #[error("The cursor cannot move to the given node")]
    CannotMoveToGivenNode,

    #[error("The cursor is not mutable")]
    NotMutable,

    #[error("The cursor is not positioned on a node")]
    NotPositioned,

    #[error("Query evaluation failed: {0}")]
    Query(#[from] XPathError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid type map configuration: {0}")]
    Invalid(String),
}
