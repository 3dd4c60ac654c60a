pub mod buffer;
pub mod document;
pub mod edit;
pub mod error;
pub mod highlight;
pub mod mode;
pub mod path;
pub mod tree;
pub mod ui;
pub mod viewer;

pub use buffer::Buffer;
pub use document::{Document, FormatOptions};
pub use edit::EditOps;
pub use error::Error;
pub use path::{NodePath, Step};
pub use tree::{flatten, CollapseState, Line, LineKind};
pub use viewer::Viewer;
