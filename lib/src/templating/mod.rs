//! Rendering a [`Theme`](crate::theme::Theme) through MiniJinja.

mod minijinja;

pub use self::minijinja::MiniJinjaEngine;
