//! Finding template files: an index of each theme root and a memoizing
//! locator that walks candidates from most to least specific.

mod tree;
mod locator;

pub use tree::*;
pub use locator::*;
