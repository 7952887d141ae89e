//! HTML attribute strings: a canonical, alphabetized attribute set and the
//! per-element composer that layers defaults and filters over it.

mod set;
mod composer;

pub use set::*;
pub use composer::*;
