use std::sync::OnceLock;

use rand::RngCore;
use regex::{Captures, Regex};

use crate::errors::GenerationError;
use crate::random::{random_choice, random_digit, random_int, random_letter, random_repeat};

type StageResult = Result<String, GenerationError>;

fn cached(cell: &'static OnceLock<Regex>, source: &str) -> Result<&'static Regex, GenerationError> {
    if let Some(re) = cell.get() {
        return Ok(re);
    }
    let re = Regex::new(source)?;
    Ok(cell.get_or_init(|| re))
}

/// Replace every match of `re` in `input` with the output of `replace`,
/// stopping at the first error.
fn rewrite<F>(re: &Regex, input: &str, mut replace: F) -> StageResult
where
    F: FnMut(&Captures<'_>) -> StageResult,
{
    let mut out = String::with_capacity(input.len());
    let mut last = 0;
    for caps in re.captures_iter(input) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        out.push_str(&input[last..whole.start()]);
        out.push_str(&replace(&caps)?);
        last = whole.end();
    }
    out.push_str(&input[last..]);
    Ok(out)
}

fn capture<'t>(caps: &Captures<'t>, idx: usize) -> &'t str {
    caps.get(idx).map_or("", |m| m.as_str())
}

fn parse_bound(input: &str, quantifier: &str, bound: &str) -> Result<i32, GenerationError> {
    bound
        .parse::<i32>()
        .map_err(|_| GenerationError::MalformedQuantifier {
            pattern: input.to_string(),
            quantifier: quantifier.to_string(),
        })
}

pub(super) fn strip_anchors(input: &str) -> StageResult {
    static LEADING: OnceLock<Regex> = OnceLock::new();
    static TRAILING: OnceLock<Regex> = OnceLock::new();
    let leading = cached(&LEADING, r"^/?\^?")?;
    let trailing = cached(&TRAILING, r"\$?/?$")?;
    let stripped = leading.replace(input, "");
    Ok(trailing.replace(&stripped, "").into_owned())
}

/// Validate brace quantifiers, then rewrite `{n}` to `{n,n}` and `?` to `{0,1}`.
///
/// Escaped braces such as `\{3\}` are literal text. A brace group with nothing
/// before it has no atom to repeat and is left alone.
pub(super) fn normalize_quantifiers(input: &str) -> StageResult {
    static BRACES: OnceLock<Regex> = OnceLock::new();
    static BOUNDS: OnceLock<Regex> = OnceLock::new();
    static EXACT: OnceLock<Regex> = OnceLock::new();
    static OPTIONAL: OnceLock<Regex> = OnceLock::new();
    let braces = cached(&BRACES, r"(\\)?\{([^{}]*)\}")?;
    let bounds = cached(&BOUNDS, r"^(\d+)(?:,(\d*))?$")?;

    for caps in braces.captures_iter(input) {
        let escaped = caps.get(1).is_some();
        let body = capture(&caps, 2);
        let at_start = caps.get(0).is_some_and(|whole| whole.start() == 0);
        if escaped || at_start || body.is_empty() {
            continue;
        }
        let quantifier = capture(&caps, 0);
        let Some(parts) = bounds.captures(body) else {
            return Err(GenerationError::MalformedQuantifier {
                pattern: input.to_string(),
                quantifier: quantifier.to_string(),
            });
        };
        parse_bound(input, quantifier, capture(&parts, 1))?;
        let max = capture(&parts, 2);
        if !max.is_empty() {
            parse_bound(input, quantifier, max)?;
        }
    }

    let exact = cached(&EXACT, r"(\\)?\{(\d+)\}")?;
    let optional = cached(&OPTIONAL, r"\?")?;
    let ranged = rewrite(exact, input, |caps| {
        let count = capture(caps, 2);
        Ok(if caps.get(1).is_some() {
            capture(caps, 0).to_string()
        } else {
            format!("{{{count},{count}}}")
        })
    })?;
    Ok(optional.replace_all(&ranged, "{0,1}").into_owned())
}

fn expand_quantified(
    cell: &'static OnceLock<Regex>,
    source: &str,
    rng: &mut dyn RngCore,
    input: &str,
) -> StageResult {
    let re = cached(cell, source)?;
    rewrite(re, input, |caps| {
        let quantifier = capture(caps, 0);
        let min = parse_bound(input, quantifier, capture(caps, 2))?;
        let max = parse_bound(input, quantifier, capture(caps, 3))?;
        Ok(random_repeat(rng, capture(caps, 1), min, max))
    })
}

pub(super) fn expand_class_quantifiers(rng: &mut dyn RngCore, input: &str) -> StageResult {
    static RE: OnceLock<Regex> = OnceLock::new();
    expand_quantified(&RE, r"(\[[^\]]+\])\{(\d+),(\d+)\}", rng, input)
}

pub(super) fn expand_group_quantifiers(rng: &mut dyn RngCore, input: &str) -> StageResult {
    static RE: OnceLock<Regex> = OnceLock::new();
    expand_quantified(&RE, r"(\([^)]+\))\{(\d+),(\d+)\}", rng, input)
}

pub(super) fn expand_atom_quantifiers(rng: &mut dyn RngCore, input: &str) -> StageResult {
    static RE: OnceLock<Regex> = OnceLock::new();
    expand_quantified(&RE, r"(\\?.)\{(\d+),(\d+)\}", rng, input)
}

pub(super) fn resolve_alternations(rng: &mut dyn RngCore, input: &str) -> StageResult {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = cached(&RE, r"\((.*?)\)")?;
    rewrite(re, input, |caps| {
        let branches: Vec<&str> = capture(caps, 1).split('|').collect();
        Ok(random_choice(rng, &branches)
            .copied()
            .unwrap_or_default()
            .to_string())
    })
}

pub(super) fn resolve_class_ranges(rng: &mut dyn RngCore, input: &str) -> StageResult {
    static CLASS: OnceLock<Regex> = OnceLock::new();
    static RANGE: OnceLock<Regex> = OnceLock::new();
    let class = cached(&CLASS, r"\[([^\]]+)\]")?;
    let range = cached(&RANGE, r"([^\\\]\-])-([^\\\]\-])")?;
    rewrite(class, input, |caps| {
        let members = rewrite(range, capture(caps, 1), |bounds| {
            let low = capture(bounds, 1).chars().next().unwrap_or_default();
            let high = capture(bounds, 2).chars().next().unwrap_or_default();
            let code = random_int(rng, low as i32, high as i32);
            let picked = u32::try_from(code)
                .ok()
                .and_then(char::from_u32)
                .unwrap_or(low);
            Ok(picked.to_string())
        })?;
        Ok(format!("[{members}]"))
    })
}

pub(super) fn resolve_classes(rng: &mut dyn RngCore, input: &str) -> StageResult {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = cached(&RE, r"\[([^\]]+)\]")?;
    rewrite(re, input, |caps| {
        let members: Vec<char> = capture(caps, 1).chars().collect();
        Ok(random_choice(rng, &members)
            .map(char::to_string)
            .unwrap_or_default())
    })
}

pub(super) fn resolve_shorthands(rng: &mut dyn RngCore, input: &str) -> StageResult {
    static DIGIT: OnceLock<Regex> = OnceLock::new();
    static WORD: OnceLock<Regex> = OnceLock::new();
    let digit = cached(&DIGIT, r"\\d")?;
    let word = cached(&WORD, r"\\w")?;
    let digits = rewrite(digit, input, |_| Ok(random_digit(rng).to_string()))?;
    rewrite(word, &digits, |_| Ok(random_letter(rng).to_string()))
}
