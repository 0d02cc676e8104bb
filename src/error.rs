// src/error.rs
use thiserror::Error;
use xbind_cursor::{ConfigError, CursorError};
use xbind_xpath::XPathError;

/// Every failure the `xbind` front end can report.
#[derive(Error, Debug)]
pub enum BindError {
    #[error("XML parsing failed: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("Invalid query: {0}")]
    XPath(#[from] XPathError),

    #[error("Cursor error: {0}")]
    Cursor(#[from] CursorError),

    #[error("Type map error: {0}")]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
