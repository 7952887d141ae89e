//! The data a host content runtime hands to the theme layer: stored records,
//! named options, and the state of the current request.

mod site;
mod options;
mod request;

pub use site::*;
pub use options::*;
pub use request::*;
