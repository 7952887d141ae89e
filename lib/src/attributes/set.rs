use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::util::{esc_attr, sanitize_attr_name};

/// The value of a single attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AttrValue {
    Text(String),
    /// A boolean attribute. `true` renders self-valued (`hidden="hidden"`),
    /// `false` is dropped.
    Flag(bool),
}

impl AttrValue {
    /// The rendered value for an attribute called `name`, if it renders.
    pub fn value<'a>(&'a self, name: &'a str) -> Option<&'a str> {
        match self {
            AttrValue::Text(s) if s.trim().is_empty() => None,
            AttrValue::Text(s) => Some(s.trim()),
            AttrValue::Flag(true) => Some(name),
            AttrValue::Flag(false) => None,
        }
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Text(value.into())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Text(value)
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        AttrValue::Flag(value)
    }
}

/// A set of attributes, always kept in alphabetical order of their
/// (sanitized) names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Attributes {
    map: BTreeMap<String, AttrValue>,
}

impl Attributes {
    pub fn new() -> Self {
        Attributes::default()
    }

    /// Parses a query-string style list such as `id=main&class=a+b&hidden`.
    /// Keys without `=` are boolean attributes; names and values are
    /// percent-decoded.
    ///
    /// ```
    /// use slimline::attributes::Attributes;
    ///
    /// let attrs = Attributes::parse("id=main&class=site%20content&itemscope&title=");
    /// assert_eq!(attrs.render(), r#"class="site content" id="main" itemscope="itemscope""#);
    /// ```
    pub fn parse(query: &str) -> Self {
        fn decode(raw: &str) -> Cow<'_, str> {
            let raw: Cow<'_, str> = if raw.contains('+') {
                Cow::Owned(raw.replace('+', " "))
            } else {
                Cow::Borrowed(raw)
            };

            let decoded = urlencoding::decode(&raw).map(Cow::into_owned);
            match decoded {
                Ok(decoded) => Cow::Owned(decoded),
                Err(_) => raw,
            }
        }

        let query = query.trim().trim_start_matches('?');
        let mut attrs = Attributes::new();
        for pair in query.split('&').filter(|p| !p.is_empty()) {
            match pair.split_once('=') {
                Some((name, value)) => attrs.insert(&decode(name), decode(value).into_owned()),
                None => attrs.flag(&decode(pair)),
            };
        }

        attrs
    }

    /// Sets `name` to `value`, replacing any previous value. Names that
    /// sanitize to nothing are ignored.
    pub fn insert<V: Into<AttrValue>>(&mut self, name: &str, value: V) -> &mut Self {
        let name = sanitize_attr_name(name);
        if !name.is_empty() {
            self.map.insert(name, value.into());
        }

        self
    }

    /// Sets the boolean attribute `name`.
    pub fn flag(&mut self, name: &str) -> &mut Self {
        self.insert(name, true)
    }

    pub fn with<V: Into<AttrValue>>(mut self, name: &str, value: V) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.map.get(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<AttrValue> {
        self.map.remove(name)
    }

    /// Copies every attribute of `other` over `self`. Empty values in
    /// `other` still override, which is how a default is removed.
    pub fn merge(&mut self, other: Attributes) -> &mut Self {
        self.map.extend(other.map);
        self
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Attributes that will render, in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.map.iter().filter_map(|(k, v)| Some((k.as_str(), v.value(k)?)))
    }

    /// Renders `name="value"` pairs separated by single spaces. Values are
    /// escaped; empty values and unset flags are omitted.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Attributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }

            write!(f, "{name}=\"{}\"", esc_attr(value))?;
        }

        Ok(())
    }
}

impl From<&str> for Attributes {
    fn from(query: &str) -> Self {
        Attributes::parse(query)
    }
}

impl<K: AsRef<str>, V: Into<AttrValue>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attrs = Attributes::new();
        for (name, value) in iter {
            attrs.insert(name.as_ref(), value);
        }

        attrs
    }
}

impl<K: AsRef<str>, V: Into<AttrValue>, const N: usize> From<[(K, V); N]> for Attributes {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_order_does_not_matter() {
        let a = Attributes::from([("id", "x"), ("class", "y")]);
        let b = Attributes::from([("class", "y"), ("id", "x")]);
        assert_eq!(a.render(), r#"class="y" id="x""#);
        assert_eq!(a.render(), b.render());
    }

    #[test]
    fn empty_values_are_omitted() {
        let attrs = Attributes::from([("id", "x"), ("hidden", "")]);
        assert_eq!(attrs.render(), r#"id="x""#);
        assert_eq!(attrs.len(), 2);

        assert_eq!(Attributes::new().render(), "");
        assert_eq!(Attributes::from([("a", ""), ("b", "  ")]).render(), "");
    }

    #[test]
    fn flags_are_self_valued() {
        let mut attrs = Attributes::new();
        attrs.flag("itemscope").insert("hidden", false);
        assert_eq!(attrs.render(), r#"itemscope="itemscope""#);
        assert_eq!(Attributes::parse("itemscope").render(), r#"itemscope="itemscope""#);
    }

    #[test]
    fn names_and_values_are_escaped() {
        let attrs = Attributes::from([("Title", r#"Say "hi" & <go>"#), ("on\"click", "x")]);
        assert_eq!(attrs.render(), r#"onclick="x" title="Say &quot;hi&quot; &amp; &lt;go&gt;""#);
    }

    #[test]
    fn query_strings_decode() {
        let attrs = Attributes::parse("?class=a+b&data-x=%E2%9C%93&&id=");
        assert_eq!(attrs.render(), r#"class="a b" data-x="✓""#);
    }

    #[test]
    fn merge_overrides_and_can_remove() {
        let mut base = Attributes::parse("class=entry&itemscope&role=article");
        base.merge(Attributes::parse("class=entry+sticky&itemscope="));
        assert_eq!(base.render(), r#"class="entry sticky" role="article""#);
    }
}
