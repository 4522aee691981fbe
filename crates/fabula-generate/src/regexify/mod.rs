//! String generation from a restricted regular-expression grammar.
//!
//! Supported: anchors and `/` delimiters (ignored), `[...]` classes with
//! `a-z` ranges, `(a|b)` alternation without nesting, `{n}`, `{n,m}` and `?`
//! quantifiers, and the `\d` / `\w` escapes. Anything else (`.`, `*`, `+`,
//! `{n,}`, lookaround, nested groups) is passed through as literal text.
//!
//! Generation is a fixed sequence of whole-string rewrites. Later stages
//! read the output of earlier ones, so the order in [`RewriteStage::PIPELINE`]
//! is part of the contract.

mod stages;

use rand::RngCore;
use tracing::trace;

use crate::errors::GenerationError;

/// One whole-string rewrite pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewriteStage {
    /// Drop a leading `/^` and a trailing `$/`.
    StripAnchors,
    /// `{n}` becomes `{n,n}` and `?` becomes `{0,1}`; bad bounds are rejected.
    NormalizeQuantifiers,
    /// `[..]{m,n}` becomes the class text repeated.
    ExpandClassQuantifiers,
    /// `(..){m,n}` becomes the group text repeated.
    ExpandGroupQuantifiers,
    /// `x{m,n}` or `\d{m,n}` becomes the atom repeated.
    ExpandAtomQuantifiers,
    /// `(a|b|c)` becomes one branch.
    ResolveAlternations,
    /// Each `x-y` range inside a class becomes one character of the range.
    ResolveClassRanges,
    /// Each `[..]` becomes one of its members.
    ResolveClasses,
    /// `\d` becomes a digit, `\w` a letter.
    ResolveShorthands,
}

impl RewriteStage {
    pub const PIPELINE: [RewriteStage; 9] = [
        RewriteStage::StripAnchors,
        RewriteStage::NormalizeQuantifiers,
        RewriteStage::ExpandClassQuantifiers,
        RewriteStage::ExpandGroupQuantifiers,
        RewriteStage::ExpandAtomQuantifiers,
        RewriteStage::ResolveAlternations,
        RewriteStage::ResolveClassRanges,
        RewriteStage::ResolveClasses,
        RewriteStage::ResolveShorthands,
    ];

    pub fn name(self) -> &'static str {
        match self {
            RewriteStage::StripAnchors => "strip_anchors",
            RewriteStage::NormalizeQuantifiers => "normalize_quantifiers",
            RewriteStage::ExpandClassQuantifiers => "expand_class_quantifiers",
            RewriteStage::ExpandGroupQuantifiers => "expand_group_quantifiers",
            RewriteStage::ExpandAtomQuantifiers => "expand_atom_quantifiers",
            RewriteStage::ResolveAlternations => "resolve_alternations",
            RewriteStage::ResolveClassRanges => "resolve_class_ranges",
            RewriteStage::ResolveClasses => "resolve_classes",
            RewriteStage::ResolveShorthands => "resolve_shorthands",
        }
    }

    /// Run this stage alone on `input`.
    pub fn apply(self, rng: &mut dyn RngCore, input: &str) -> Result<String, GenerationError> {
        match self {
            RewriteStage::StripAnchors => stages::strip_anchors(input),
            RewriteStage::NormalizeQuantifiers => stages::normalize_quantifiers(input),
            RewriteStage::ExpandClassQuantifiers => stages::expand_class_quantifiers(rng, input),
            RewriteStage::ExpandGroupQuantifiers => stages::expand_group_quantifiers(rng, input),
            RewriteStage::ExpandAtomQuantifiers => stages::expand_atom_quantifiers(rng, input),
            RewriteStage::ResolveAlternations => stages::resolve_alternations(rng, input),
            RewriteStage::ResolveClassRanges => stages::resolve_class_ranges(rng, input),
            RewriteStage::ResolveClasses => stages::resolve_classes(rng, input),
            RewriteStage::ResolveShorthands => stages::resolve_shorthands(rng, input),
        }
    }
}

/// Produce one string matching `pattern`.
///
/// Fails only with `MalformedQuantifier` when a `{..}` quantifier carries
/// bounds that are not unsigned integers; other unsupported syntax is
/// rewritten best-effort.
pub fn regexify(rng: &mut dyn RngCore, pattern: &str) -> Result<String, GenerationError> {
    let mut current = pattern.to_string();
    for stage in RewriteStage::PIPELINE {
        current = stage.apply(rng, &current).map_err(|err| match err {
            GenerationError::MalformedQuantifier { quantifier, .. } => {
                GenerationError::MalformedQuantifier {
                    pattern: pattern.to_string(),
                    quantifier,
                }
            }
            other => other,
        })?;
        trace!(stage = stage.name(), output = %current, "regexify stage");
    }
    Ok(current)
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    fn run(stage: RewriteStage, input: &str) -> String {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        stage.apply(&mut rng, input).expect("stage succeeds")
    }

    #[test]
    fn strips_delimiters_and_anchors() {
        assert_eq!(run(RewriteStage::StripAnchors, "/^abc$/"), "abc");
        assert_eq!(run(RewriteStage::StripAnchors, "/abc/"), "abc");
        assert_eq!(run(RewriteStage::StripAnchors, "abc"), "abc");
    }

    #[test]
    fn normalizes_exact_and_optional_quantifiers() {
        assert_eq!(
            run(RewriteStage::NormalizeQuantifiers, "a{3}b?[x]{1,2}"),
            "a{3,3}b{0,1}[x]{1,2}"
        );
    }

    #[test]
    fn unbounded_quantifier_passes_through() {
        assert_eq!(run(RewriteStage::NormalizeQuantifiers, "a{2,}"), "a{2,}");
    }

    #[test]
    fn escaped_braces_are_not_quantifiers() {
        assert_eq!(
            run(RewriteStage::NormalizeQuantifiers, r"a\{x\}\{3}b{2}"),
            r"a\{x\}\{3}b{2,2}"
        );
    }

    #[test]
    fn rejects_non_numeric_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let err = RewriteStage::NormalizeQuantifiers
            .apply(&mut rng, "x{a,b}")
            .unwrap_err();
        assert!(matches!(
            err,
            GenerationError::MalformedQuantifier { ref quantifier, .. } if quantifier == "{a,b}"
        ));
    }

    #[test]
    fn class_repeats_keep_class_text() {
        assert_eq!(
            run(RewriteStage::ExpandClassQuantifiers, "[ab]{2,2}-"),
            "[ab][ab]-"
        );
    }

    #[test]
    fn group_repeats_keep_group_text() {
        assert_eq!(
            run(RewriteStage::ExpandGroupQuantifiers, "(x|y){3,3}"),
            "(x|y)(x|y)(x|y)"
        );
    }

    #[test]
    fn atom_repeats_escapes_whole() {
        assert_eq!(run(RewriteStage::ExpandAtomQuantifiers, r"\d{3,3}"), r"\d\d\d");
        assert_eq!(run(RewriteStage::ExpandAtomQuantifiers, "A{2,2}"), "AA");
    }

    #[test]
    fn ranges_collapse_inside_class_brackets() {
        let out = run(RewriteStage::ResolveClassRanges, "[a-a][0-0x]");
        assert_eq!(out, "[a][0x]");
    }

    #[test]
    fn inverted_range_yields_low_endpoint() {
        assert_eq!(run(RewriteStage::ResolveClassRanges, "[z-a]"), "[z]");
    }

    #[test]
    fn pipeline_order_is_fixed() {
        let names: Vec<&str> = RewriteStage::PIPELINE
            .iter()
            .map(|stage| stage.name())
            .collect();
        assert_eq!(
            names,
            vec![
                "strip_anchors",
                "normalize_quantifiers",
                "expand_class_quantifiers",
                "expand_group_quantifiers",
                "expand_atom_quantifiers",
                "resolve_alternations",
                "resolve_class_ranges",
                "resolve_classes",
                "resolve_shorthands",
            ]
        );
    }
}
