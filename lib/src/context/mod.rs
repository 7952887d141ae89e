//! Request classification: what kind of page is this, and what is it called?

mod context;
mod kind;
mod classify;

pub use context::*;
pub use kind::*;
pub use classify::*;
