use std::sync::Arc;

use crate::attributes::Attributes;
use crate::context::Context;
use crate::host::Request;
use crate::template::Resolved;

pub trait HookPoint: 'static {
    const NAME: &'static str;

    type Value: 'static;

    type Input: ?Sized + 'static;
}

#[macro_export]
macro_rules! define_hook_point {
    ($($(#[$attr:meta])* $v:vis $T:ident : $name:literal => $V:ty, $I:ty);+ $(;)?) => {
        $(
            $(#[$attr])*
            #[derive(::core::fmt::Debug, Clone, Copy)]
            $v struct $T;

            impl $crate::hooks::HookPoint for $T {
                const NAME: &'static str = $name;
                type Value = $V;
                type Input = $I;
            }
        )+
    }
}

define_hook_point! {
    /// The accumulated context tags, before any property is derived.
    pub ContextTags : "context_tags" => Vec<Arc<str>>, Request;

    /// Context title. Tagged by context tag.
    pub ContextTitle : "context_title" => String, Request;

    /// Context description (HTML). Tagged by context tag.
    pub ContextDescription : "context_description" => String, Request;

    /// Context thumbnail attachment id, `0` for none. Tagged by context tag.
    pub ContextThumbnail : "context_thumbnail" => u64, Request;

    /// Default attributes of an element. Tagged by element name.
    pub ElementDefaults : "element_defaults" => Attributes, str;

    /// The final attribute string of an element. Tagged by element name.
    pub ElementAttributes : "element_attributes" => String, str;

    /// Candidate part names, most specific first. Tagged by base name.
    pub PartCandidates : "part_candidates" => Vec<String>, str;

    /// Fired before a template part is rendered.
    pub BeforePart : "before_part" => (), Resolved;

    /// Fired after a template part is rendered.
    pub AfterPart : "after_part" => (), Resolved;

    /// The text of the document `<title>`.
    pub DocumentTitle : "document_title" => String, Context;
}
