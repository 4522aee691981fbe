use std::sync::OnceLock;

use regex::Regex;

use crate::PATH_SEPARATOR;
use crate::error::Result;
use crate::locale::LocaleStore;

const REFERENCE_PATTERN: &str = r"#\{(?:([A-Za-z][A-Za-z0-9_]*)\.)?([^}]+)\}";

/// An embedded `#{...}` reference found inside a locale value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceToken<'a> {
    /// Byte offset of the leading `#`.
    pub start: usize,
    /// Byte offset one past the closing `}`.
    pub end: usize,
    /// Full token text, braces included.
    pub text: &'a str,
    /// Namespace prefix such as `Name` in `#{Name.first_name}`.
    pub segment: Option<&'a str>,
    /// Remaining dotted path after the namespace, or the bare key.
    pub key: &'a str,
}

fn reference_regex() -> Result<&'static Regex> {
    static RE: OnceLock<Regex> = OnceLock::new();
    if let Some(re) = RE.get() {
        return Ok(re);
    }
    let re = Regex::new(REFERENCE_PATTERN)?;
    Ok(RE.get_or_init(|| re))
}

/// Find the first reference token in `text` at or after byte offset `from`.
pub fn find_reference(text: &str, from: usize) -> Result<Option<ReferenceToken<'_>>> {
    let re = reference_regex()?;
    let Some(haystack) = text.get(from..) else {
        return Ok(None);
    };
    let Some(caps) = re.captures(haystack) else {
        return Ok(None);
    };
    let (Some(whole), Some(key)) = (caps.get(0), caps.get(2)) else {
        return Ok(None);
    };
    Ok(Some(ReferenceToken {
        start: from + whole.start(),
        end: from + whole.end(),
        text: &text[from + whole.start()..from + whole.end()],
        segment: caps.get(1).map(|m| &text[from + m.start()..from + m.end()]),
        key: &text[from + key.start()..from + key.end()],
    }))
}

/// All reference tokens in `text`, left to right.
pub fn references(text: &str) -> Result<Vec<ReferenceToken<'_>>> {
    let mut out = Vec::new();
    let mut cursor = 0;
    while let Some(token) = find_reference(text, cursor)? {
        cursor = token.end;
        out.push(token);
    }
    Ok(out)
}

/// Parent namespace of a dotted path, `None` at the root.
pub fn namespace_of(path: &str) -> Option<&str> {
    path.rfind(PATH_SEPARATOR).map(|idx| &path[..idx])
}

/// Paths to try, in order, when resolving `token` found while fetching
/// `current_path`.
///
/// `#{Segment.rest}` tries the verbatim path, then the snake_cased namespace,
/// then `rest` alone. A bare `#{key}` is looked up next to `current_path`
/// first, then at the root.
pub fn candidate_paths(token: &ReferenceToken<'_>, current_path: &str) -> Vec<String> {
    let mut candidates = Vec::with_capacity(3);
    match token.segment {
        Some(segment) => {
            candidates.push(format!("{segment}{PATH_SEPARATOR}{}", token.key));
            candidates.push(format!(
                "{}{PATH_SEPARATOR}{}",
                snake_case(segment),
                token.key
            ));
            candidates.push(token.key.to_string());
        }
        None => {
            if let Some(namespace) = namespace_of(current_path) {
                candidates.push(format!("{namespace}{PATH_SEPARATOR}{}", token.key));
            }
            candidates.push(token.key.to_string());
        }
    }
    let mut seen = std::collections::BTreeSet::new();
    candidates.retain(|path| seen.insert(path.clone()));
    candidates
}

/// First candidate path of `token` present in any of `stores`.
pub fn resolve_target(
    token: &ReferenceToken<'_>,
    current_path: &str,
    stores: &[&LocaleStore],
) -> Option<String> {
    candidate_paths(token, current_path)
        .into_iter()
        .find(|path| stores.iter().any(|store| store.contains(path)))
}

fn snake_case(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len() + 4);
    for (idx, ch) in segment.chars().enumerate() {
        if ch.is_ascii_uppercase() {
            if idx > 0 {
                out.push('_');
            }
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_namespaced_and_bare_tokens() {
        let text = "#{Name.first_name} lives on #{street_name}";
        let tokens = references(text).unwrap();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].segment, Some("Name"));
        assert_eq!(tokens[0].key, "first_name");
        assert_eq!(tokens[0].text, "#{Name.first_name}");
        assert_eq!(tokens[1].segment, None);
        assert_eq!(tokens[1].key, "street_name");
        assert_eq!(&text[tokens[1].start..tokens[1].end], "#{street_name}");
    }

    #[test]
    fn scanning_past_the_end_finds_nothing() {
        assert!(find_reference("#{a}", 4).unwrap().is_none());
        assert!(find_reference("#{a}", 40).unwrap().is_none());
        assert_eq!(find_reference("x #{a}", 1).unwrap().map(|token| token.start), Some(2));
    }

    #[test]
    fn plain_placeholders_are_not_references() {
        assert!(references("## ## ##").unwrap().is_empty());
        assert!(references("#{}").unwrap().is_empty());
        assert!(references("/[A-Z]{2}###/").unwrap().is_empty());
    }

    #[test]
    fn namespaced_candidates_follow_lookup_order() {
        let tokens = references("#{PhoneNumber.formats}").unwrap();
        assert_eq!(
            candidate_paths(&tokens[0], "anything"),
            vec!["PhoneNumber.formats", "phone_number.formats", "formats"]
        );
    }

    #[test]
    fn lowercase_namespace_deduplicates() {
        let tokens = references("#{name.first}").unwrap();
        assert_eq!(
            candidate_paths(&tokens[0], "greeting"),
            vec!["name.first", "first"]
        );
    }

    #[test]
    fn bare_candidates_are_relative_to_current_namespace() {
        let tokens = references("#{city_root}").unwrap();
        assert_eq!(
            candidate_paths(&tokens[0], "address.city"),
            vec!["address.city_root", "city_root"]
        );
        assert_eq!(candidate_paths(&tokens[0], "city"), vec!["city_root"]);
    }

    #[test]
    fn namespace_of_strips_last_segment() {
        assert_eq!(namespace_of("a.b.c"), Some("a.b"));
        assert_eq!(namespace_of("a"), None);
    }
}
