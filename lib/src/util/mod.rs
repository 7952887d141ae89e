use std::borrow::Cow;

/// Convert spaces to hyphens. Remove characters that aren't alphanumerics,
/// underscores, or hyphens. Convert to lowercase. Also strip leading and
/// trailing whitespace.
pub fn slugify(string: &str) -> String {
    let mut output = String::with_capacity(string.len());

    let mut need_dash = false;
    for ch in string.chars() {
        for b in deunicode::deunicode_char(ch).unwrap_or("-").bytes() {
            match b {
                b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'_' => {
                    if need_dash {
                        output.push('-');
                        need_dash = false;
                    }

                    output.push(b.to_ascii_lowercase() as char);
                }
                _ => need_dash = !output.is_empty(),
            }
        }
    }

    output
}

/// Escapes `string` for use inside a double- or single-quoted HTML
/// attribute value.
///
/// ```
/// use slimline::util::esc_attr;
///
/// assert_eq!(esc_attr("plain"), "plain");
/// assert_eq!(esc_attr(r#"a "b" & <c>'"#), "a &quot;b&quot; &amp; &lt;c&gt;&#039;");
/// ```
pub fn esc_attr(string: &str) -> Cow<'_, str> {
    let needs_escape = |c: char| matches!(c, '&' | '<' | '>' | '"' | '\'');
    if !string.contains(needs_escape) {
        return Cow::Borrowed(string);
    }

    let mut output = String::with_capacity(string.len() + 16);
    for c in string.chars() {
        match c {
            '&' => output.push_str("&amp;"),
            '<' => output.push_str("&lt;"),
            '>' => output.push_str("&gt;"),
            '"' => output.push_str("&quot;"),
            '\'' => output.push_str("&#039;"),
            c => output.push(c),
        }
    }

    Cow::Owned(output)
}

/// Strips everything but ASCII alphanumerics, `-`, `_`, `:` and `.` from an
/// attribute name and lowercases it. May return an empty string.
pub fn sanitize_attr_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.'))
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Reduces a context tag to a valid HTML class name: `A-Z`, `a-z`, `0-9`,
/// `_` and `-` survive, everything else is removed.
pub fn sanitize_html_class(tag: &str) -> String {
    tag.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("My Test String!!!1!1"), "my-test-string-1-1");
        assert_eq!(slugify("  --test_-_cool- -  "), "test_-_cool");
        assert_eq!(slugify("Æúű--cool?"), "aeuu-cool");
        assert_eq!(slugify("Company News"), "company-news");
    }

    #[test]
    fn attribute_names_are_sanitized() {
        assert_eq!(sanitize_attr_name("data-ID"), "data-id");
        assert_eq!(sanitize_attr_name("on click\"="), "onclick");
        assert_eq!(sanitize_attr_name("xml:lang"), "xml:lang");
        assert_eq!(sanitize_attr_name("\"><"), "");
    }

    #[test]
    fn html_classes_keep_case_and_dashes() {
        assert_eq!(sanitize_html_class("front-page"), "front-page");
        assert_eq!(sanitize_html_class("post_tag"), "post_tag");
        assert_eq!(sanitize_html_class("404"), "404");
        assert_eq!(sanitize_html_class("vnd.ms excel"), "vndmsexcel");
    }
}
