pub mod collapse;
pub mod flatten;
pub mod line;

pub use collapse::CollapseState;
pub use flatten::{brackets_balanced, flatten, reassemble};
pub use line::{Bracket, FragKind, Fragment, Line, LineKind};
