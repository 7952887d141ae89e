//! Typed, priority-ordered extension points.
//!
//! Every extension point is a type implementing [`HookPoint`], declared with
//! [`define_hook_point!`](crate::define_hook_point). Filters registered
//! against a point receive the point's `Value` and a reference to its `Input`
//! and return a new `Value`; actions only observe the `Input`.
//!
//! Chains may be *tagged*. [`Hooks::apply_tagged()`] folds a value through
//! the chain of each tag in the order given, skipping tags without a chain,
//! which is how per-context and per-element overrides are expressed.

mod point;
mod registry;

pub use point::*;
pub use registry::*;
