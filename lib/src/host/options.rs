use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// A statically named option with a known value type.
pub trait OptionKey: 'static {
    const KEY: &'static str;

    type Value: DeserializeOwned + Serialize + fmt::Debug;
}

#[macro_export]
macro_rules! define_option {
    ($($(#[$attr:meta])* $v:vis $T:ident : $key:literal => $V:ty),+ $(,)?) => {
        $(
            $(#[$attr])*
            #[derive(Debug, Clone, Copy)]
            $v struct $T;

            impl $crate::host::OptionKey for $T {
                const KEY: &'static str = $key;
                type Value = $V;
            }
        )+
    }
}

define_option! {
    pub PageForPosts : "page_for_posts" => u64,
    /// Either a host-style format (`F j, Y`) or a chrono format (`%B %-d, %Y`).
    /// See [`to_strftime()`](crate::context::to_strftime).
    pub DateFormat : "date_format" => String,
}

/// Named configuration values, as stored by the host.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Options {
    map: FxHashMap<Arc<str>, Value>,
}

impl Options {
    pub fn new() -> Self {
        Options::default()
    }

    #[inline(always)]
    pub fn get_raw(&self, key: &str) -> Option<&Value> {
        self.map.get(key)
    }

    pub fn insert_raw<K, V>(&mut self, key: K, value: V) -> Option<Value>
        where K: Into<Arc<str>>, V: Into<Value>
    {
        self.map.insert(key.into(), value.into())
    }

    /// Reads `K`, returning `None` when the option is absent or holds a value
    /// of the wrong shape.
    pub fn get<K: OptionKey>(&self, _: K) -> Option<K::Value> {
        let value = self.get_raw(K::KEY)?;
        match serde_json::from_value(value.clone()) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key = K::KEY, %value, "ignoring malformed option: {e}");
                None
            }
        }
    }

    pub fn insert<K: OptionKey>(&mut self, _: K, value: K::Value) -> Option<Value> {
        let value = serde_json::to_value(value).unwrap_or(Value::Null);
        self.insert_raw(K::KEY, value)
    }

    pub fn contains<K: OptionKey>(&self, _: K) -> bool {
        self.map.contains_key(K::KEY)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// The id of the static page standing in for the archive of
    /// `post_type`. `post` reads `page_for_posts`, anything else reads
    /// `page_for_{post_type}`. Ids of `0` and numeric strings are handled the
    /// way the host stores them.
    pub fn page_for(&self, post_type: &str) -> Option<u64> {
        let value = match post_type {
            "post" => self.get_raw(PageForPosts::KEY)?,
            _ => self.get_raw(&format!("page_for_{post_type}"))?,
        };

        let id = match value {
            Value::Number(n) => n.as_u64()?,
            Value::String(s) => s.trim().parse().ok()?,
            _ => return None,
        };

        (id != 0).then_some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_options_round_trip() {
        let mut options = Options::new();
        assert!(options.get(DateFormat).is_none());

        options.insert(DateFormat, "%d/%m/%Y".into());
        assert_eq!(options.get(DateFormat).as_deref(), Some("%d/%m/%Y"));
        assert!(options.contains(DateFormat));
    }

    #[test]
    fn wrong_shape_reads_as_absent() {
        let mut options = Options::new();
        options.insert_raw("page_for_posts", "not a number");
        assert!(options.get(PageForPosts).is_none());
        assert!(options.page_for("post").is_none());
    }

    #[test]
    fn page_for_handles_zero_and_strings() {
        let mut options = Options::new();
        options.insert_raw("page_for_posts", 0);
        options.insert_raw("page_for_project", "12");
        assert_eq!(options.page_for("post"), None);
        assert_eq!(options.page_for("project"), Some(12));
        assert_eq!(options.page_for("event"), None);
    }
}
