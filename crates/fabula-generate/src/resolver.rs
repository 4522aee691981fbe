use rand::RngCore;
use tracing::{debug, warn};

use fabula_core::{
    Error, LocaleStore, LocaleValue, candidate_paths, find_reference, resolve_target,
};

use crate::errors::GenerationError;
use crate::pattern::numerify_pattern;
use crate::random::random_choice;
use crate::regexify::regexify;

/// Nesting limit for `#{...}` expansion before a chain is treated as cyclic.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Delimiter marking a resolved value as a pattern to generate from.
pub const PATTERN_DELIMITER: char = '/';

/// Stores consulted by a resolution call.
///
/// Lookups try `active` first and `fallback` second.
#[derive(Debug, Clone, Copy)]
pub struct ResolutionContext<'a> {
    pub active: &'a LocaleStore,
    pub fallback: &'a LocaleStore,
    pub max_depth: usize,
}

impl<'a> ResolutionContext<'a> {
    pub fn new(active: &'a LocaleStore, fallback: &'a LocaleStore) -> Self {
        Self {
            active,
            fallback,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Clamped to at least 1 so plain values resolve.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth.max(1);
        self
    }

    /// Locate `path`, returning the value and the store it came from.
    pub fn value_at(&self, path: &str) -> Result<(&'a LocaleValue, &'a LocaleStore), Error> {
        if let Some(value) = self.active.lookup(path)? {
            return Ok((value, self.active));
        }
        if let Some(value) = self.fallback.lookup(path)? {
            return Ok((value, self.fallback));
        }
        Err(Error::PathNotFound {
            path: path.to_string(),
        })
    }
}

/// Resolve `path` to a generated string.
///
/// Collections yield a random element, `#{...}` references are expanded
/// recursively, and a result wrapped in `/.../` is generated as a pattern.
pub fn fetch(
    rng: &mut dyn RngCore,
    path: &str,
    ctx: &ResolutionContext<'_>,
) -> Result<String, GenerationError> {
    let mut chain = Vec::new();
    resolve(rng, path, ctx, &mut chain)
}

fn resolve(
    rng: &mut dyn RngCore,
    path: &str,
    ctx: &ResolutionContext<'_>,
    chain: &mut Vec<String>,
) -> Result<String, GenerationError> {
    if chain.len() >= ctx.max_depth {
        let mut chain = chain.clone();
        chain.push(path.to_string());
        warn!(
            path,
            depth = ctx.max_depth,
            "reference depth exceeded, treating as cycle"
        );
        return Err(GenerationError::CyclicReference {
            path: path.to_string(),
            chain,
        });
    }

    let (value, store) = ctx.value_at(path)?;
    debug!(
        path,
        locale = %store.name,
        fallback = !std::ptr::eq(store, ctx.active),
        "resolved locale path"
    );

    chain.push(path.to_string());
    let picked = leaf_to_string(rng, path, value)?;
    let expanded = expand_references(rng, path, picked, ctx, chain)?;
    chain.pop();

    if is_pattern(&expanded) {
        let numbered = numerify_pattern(rng, &expanded);
        return regexify(rng, &numbered);
    }
    Ok(expanded)
}

fn leaf_to_string(
    rng: &mut dyn RngCore,
    path: &str,
    value: &LocaleValue,
) -> Result<String, GenerationError> {
    let empty = || Error::EmptyList {
        path: path.to_string(),
    };
    match value {
        LocaleValue::ListOfLists(lists) => {
            if lists.is_empty() {
                return Err(empty().into());
            }
            let mut choices = Vec::with_capacity(lists.len());
            for values in lists {
                choices.push(random_choice(rng, values).ok_or_else(empty)?.as_str());
            }
            Ok(choices.join(" "))
        }
        LocaleValue::List(values) => Ok(random_choice(rng, values).ok_or_else(empty)?.clone()),
        LocaleValue::Scalar(value) => Ok(value.clone()),
        LocaleValue::Node(_) => Err(Error::UnsupportedLeafType {
            path: path.to_string(),
            found: value.kind().to_string(),
        }
        .into()),
    }
}

/// Splice resolved values over each `#{...}` token, left to right. Scanning
/// resumes after the inserted text, which is already fully expanded.
fn expand_references(
    rng: &mut dyn RngCore,
    path: &str,
    mut text: String,
    ctx: &ResolutionContext<'_>,
    chain: &mut Vec<String>,
) -> Result<String, GenerationError> {
    let mut cursor = 0;
    while let Some(token) = find_reference(&text, cursor)? {
        let (start, end) = (token.start, token.end);
        // When nothing matches, resolve the first candidate so the caller
        // sees the real lookup error for it.
        let target = resolve_target(&token, path, &[ctx.active, ctx.fallback])
            .or_else(|| candidate_paths(&token, path).into_iter().next())
            .unwrap_or_else(|| token.key.to_string());

        let value = resolve(rng, &target, ctx, chain)?;
        text.replace_range(start..end, &value);
        cursor = start + value.len();
    }
    Ok(text)
}

fn is_pattern(value: &str) -> bool {
    value.starts_with(PATTERN_DELIMITER) && value.ends_with(PATTERN_DELIMITER)
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    #[test]
    fn list_of_lists_joins_one_choice_per_list() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let value = LocaleValue::ListOfLists(vec![
            vec!["Lead".into()],
            vec!["Data".into()],
            vec!["Engineer".into()],
        ]);
        assert_eq!(
            leaf_to_string(&mut rng, "name.title", &value).unwrap(),
            "Lead Data Engineer"
        );
    }

    #[test]
    fn empty_inner_list_is_reported() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let value = LocaleValue::ListOfLists(vec![vec!["a".into()], Vec::new()]);
        let err = leaf_to_string(&mut rng, "x.y", &value).unwrap_err();
        assert!(matches!(
            err,
            GenerationError::Locale(Error::EmptyList { ref path }) if path == "x.y"
        ));
    }

    #[test]
    fn pattern_detection_needs_both_delimiters() {
        assert!(is_pattern("/abc/"));
        assert!(!is_pattern("/abc"));
        assert!(!is_pattern("a/b/c"));
    }
}
