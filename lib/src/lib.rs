#![doc = svgbobdoc::transform!(
//! Contextual template resolution and attribute composition for themes.
//!
//! # Overview
//!
//! Slimline sits between a content runtime, which knows what was requested,
//! and a directory of theme templates, which know how to present it. For
//! every request it answers three questions: what kind of page is this,
//! which template file renders it, and which attributes do its landmark
//! elements carry?
//!
//! ```svgbob
//!   +------+  +---------+  +-------+
//!   | Site |  | Request |  | Hooks |
//!   +--+---+  +----+----+  +---+---+
//!      |           |           |
//!      +-----------+-----------+
//!                  |
//!            +-----+-----+      +---------+
//!            |   Theme   +----->| Locator |---> child root, parent root
//!            +-----+-----+      +---------+
//!                  |
//!       +----------+-----------+
//!       |                      |
//!  +----+----+           +-----+----+
//!  | Context |           | Composer |
//!  +---------+           +----------+
//! ```
//!
//! In words:
//!
//!   * The **host** supplies plain data: the [`Site`](host::Site) records
//!     and options, and the [`Request`](host::Request) predicates and
//!     queried object.
//!
//!   * The [`Classifier`](context::Classifier) turns these into a
//!     [`Context`](context::Context): an ordered list of tags, most general
//!     first (`archive`, `date`, `month`), plus a title, a description and
//!     a thumbnail id.
//!
//!   * The [`Locator`](template::Locator) expands a base name and
//!     qualifiers into candidates (`index-archive-date`, `index-archive`,
//!     `index`) and returns the first one that exists in any theme root,
//!     memoizing the answer.
//!
//!   * The [`Composer`](attributes::Composer) merges per-element defaults
//!     with caller overrides and renders an alphabetized, escaped attribute
//!     string.
//!
//! Every derived value passes through typed [`hooks`], so an embedding
//! program can adjust tags, titles, candidates and attributes per context
//! tag or per element. The [`Theme`](theme::Theme) ties one request's
//! pieces together and the [`MiniJinjaEngine`](templating::MiniJinjaEngine)
//! exposes them to templates.
)]

#[macro_use]
pub mod error;
pub mod util;
pub mod host;
pub mod hooks;
pub mod context;
pub mod attributes;
pub mod template;
pub mod settings;
pub mod theme;
pub mod templating;

pub use theme::Theme;
pub use settings::ThemeSettings;
