pub mod config;
pub mod cursor;
pub mod error;
pub mod flags;
pub mod lazy;
pub mod node;
pub mod read_only;
pub mod types;

pub use config::TypeMapConfig;
pub use cursor::XmlCursor;
pub use error::{ConfigError, CursorError};
pub use flags::CursorFlags;
pub use lazy::{Deferred, Lazy, LazyCell};
pub use node::{PositionSnapshot, TypedNode};
pub use read_only::{ReadOnlyCursor, ReadOnlyCursorBuilder};
pub use types::{IncludedType, IncludedTypeMap, IncludedTypeSet, TypeDescriptor, type_marker};
